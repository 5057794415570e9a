pub use crate::config::*;
use crate::{Ballot, Election};

use log::debug;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::collections::BTreeSet;

/// A builder for assembling an election out of raw rankings.
///
/// This is the most convenient entry point when the ballots come from a
/// spreadsheet or a form: each row is a list of `(candidate name, rank)`.
///
/// ```
/// pub use instant_runoff::builder::Builder;
/// pub use instant_runoff::TieBreakingRule;
/// # use instant_runoff::VotingErrors;
///
/// let mut builder = Builder::new()
///     .candidates(&["Anna".to_string(), "Bob".to_string()])?;
///
/// builder.add_ranks(&[("Anna".to_string(), 1.0), ("Bob".to_string(), 2.0)]);
/// // No preference expressed: Anna and Bob are tied on this ballot.
/// builder.add_ranks(&[]);
///
/// let mut election = builder.build_with_seed(0);
/// let result = election.instant_runoff(TieBreakingRule::All)?;
/// assert_eq!(result.round_stats.len(), 1);
///
/// # Ok::<(), VotingErrors>(())
/// ```
#[derive(Debug, Clone, Default)]
pub struct Builder {
    _candidates: Option<BTreeSet<Candidate>>,
    _ballots: Vec<Ballot>,
}

impl Builder {
    pub fn new() -> Builder {
        Builder::default()
    }

    /// Declares the candidates of the election.
    ///
    /// Candidates that are not ranked by a ballot are ranked last on this
    /// ballot, and ranked names that are not declared are ignored.
    pub fn candidates(self, cands: &[String]) -> Result<Builder, VotingErrors> {
        let mut declared: BTreeSet<Candidate> = BTreeSet::new();
        for name in cands {
            if !declared.insert(Candidate::new(name.as_str())) {
                return Err(VotingErrors::DuplicateCandidate(name.clone()));
            }
        }
        Ok(Builder {
            _candidates: Some(declared),
            _ballots: self._ballots,
        })
    }

    /// Adds a ballot from the ranks given to each candidate name.
    ///
    /// Lower ranks are preferred. Equal ranks are ties. Candidates that are
    /// absent have no preference expressed.
    pub fn add_ranks(&mut self, ranks: &[(String, f64)]) {
        let mut ballot = Ballot::new();
        for (name, rank) in ranks {
            ballot.add_preference(Candidate::new(name.as_str()), *rank);
        }
        ballot.normalize(self._candidates.as_ref());
        debug!("add_ranks: ballot #{}: {:?}", self._ballots.len() + 1, ballot.preferences());
        self._ballots.push(ballot);
    }

    /// Adds a ballot built by the caller.
    pub fn add_ballot(&mut self, ballot: Ballot) {
        self._ballots.push(ballot);
    }

    pub fn num_ballots(&self) -> usize {
        self._ballots.len()
    }

    pub fn build<R: Rng>(self, rng: R) -> Election<R> {
        Election::new(self._ballots, self._candidates, rng)
    }

    pub fn build_with_seed(self, seed: u64) -> Election<StdRng> {
        self.build(StdRng::seed_from_u64(seed))
    }
}
