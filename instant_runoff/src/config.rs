// ********* Input data structures ***********

use std::collections::BTreeSet;
use std::error::Error;
use std::fmt::Display;
use std::iter::Sum;
use std::ops::{Add, AddAssign};
use std::str::FromStr;

/// A candidate in an election.
///
/// Candidates are plain values: two candidates with the same name are the
/// same candidate.
#[derive(Eq, PartialEq, Debug, Clone, Hash, Ord, PartialOrd)]
pub struct Candidate {
    name: String,
}

impl Candidate {
    pub fn new(name: impl Into<String>) -> Candidate {
        Candidate { name: name.into() }
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

impl Display for Candidate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name)
    }
}

impl From<&str> for Candidate {
    fn from(name: &str) -> Candidate {
        Candidate::new(name)
    }
}

/// A group of candidates that a ballot ranks equally.
///
/// The order of the candidates inside a level carries no meaning.
pub type PreferenceLevel = BTreeSet<Candidate>;

/// A number of votes, expressed in pebbles.
///
/// A pebble is the fraction of a vote that makes every split vote of a round
/// an integer: when a ballot ties `n` candidates at its top, each of them
/// receives `1/n` of a vote, i.e. `pebbles_per_vote / n` pebbles.
#[derive(Eq, PartialEq, Debug, Clone, Copy, PartialOrd, Ord, Hash, Default)]
pub struct Pebbles(pub u64);

impl Pebbles {
    pub const EMPTY: Pebbles = Pebbles(0);
}

impl Sum for Pebbles {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        Pebbles(iter.map(|p| p.0).sum())
    }
}

impl AddAssign for Pebbles {
    fn add_assign(&mut self, rhs: Pebbles) {
        self.0 += rhs.0;
    }
}

impl Add for Pebbles {
    type Output = Pebbles;
    fn add(self: Pebbles, rhs: Pebbles) -> Pebbles {
        Pebbles(self.0 + rhs.0)
    }
}

impl Display for Pebbles {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ********* Configuration **********

/// How to choose among several candidates tied for the fewest votes.
///
/// See <https://electowiki.org/wiki/Instant-runoff_voting#Handling_ties_in_IRV_elections>
#[derive(Eq, PartialEq, Debug, Clone, Copy, Hash, Default)]
pub enum TieBreakingRule {
    /// Eliminate all the tied candidates at once.
    #[default]
    All,
    /// Eliminate one of the tied candidates, drawn uniformly at random
    /// every time a tie happens.
    Random,
    /// Random voter hierarchy: a single random ordering of all the candidates
    /// is drawn when the election is created, and every tie eliminates the
    /// tied candidate that comes first in this ordering.
    Rvh,
}

impl TieBreakingRule {
    pub const ALL_RULES: [TieBreakingRule; 3] = [
        TieBreakingRule::All,
        TieBreakingRule::Random,
        TieBreakingRule::Rvh,
    ];

    /// The short name of the rule, as accepted by `FromStr`.
    pub fn name(&self) -> &'static str {
        match self {
            TieBreakingRule::All => "ALL",
            TieBreakingRule::Random => "RANDOM",
            TieBreakingRule::Rvh => "RVH",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            TieBreakingRule::All => "eliminate all tied candidates at once",
            TieBreakingRule::Random => "eliminate one tied candidate at random",
            TieBreakingRule::Rvh => {
                "random voter hierarchy (randomly determine a strict ordering of the candidates, \
                 use it to eliminate candidates)"
            }
        }
    }
}

impl Display for TieBreakingRule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl FromStr for TieBreakingRule {
    type Err = VotingErrors;

    fn from_str(s: &str) -> Result<TieBreakingRule, VotingErrors> {
        TieBreakingRule::ALL_RULES
            .iter()
            .find(|rule| rule.name().eq_ignore_ascii_case(s.trim()))
            .copied()
            .ok_or_else(|| VotingErrors::InvalidTieBreakingRule(s.to_string()))
    }
}

// ******** Output data structures *********

/// The state of an instant-runoff election.
#[derive(Eq, PartialEq, Debug, Clone)]
pub enum RunoffState {
    /// The count continues with the given round.
    Running(u32),
    /// These candidates hold an absolute majority. More than one candidate
    /// is only possible when they tie at the top.
    MajorityWinner(BTreeSet<Candidate>),
    /// All the remaining candidates are tied and none can be eliminated.
    AllTied(BTreeSet<Candidate>),
}

impl RunoffState {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, RunoffState::Running(_))
    }
}

/// Statistics for one round
#[derive(PartialEq, Debug, Clone)]
pub struct RoundStats {
    pub round: u32,
    pub num_ballots: usize,
    pub num_candidates: usize,
    /// The number of pebbles per ballot in this round.
    pub pebbles_per_vote: Pebbles,
    pub all_votes: Pebbles,
    /// Sorted by decreasing number of votes.
    pub tally: Vec<(Candidate, Pebbles)>,
    /// Percentages of all the votes, for display only. Same order as `tally`.
    pub standings: Vec<(Candidate, f64)>,
    pub most_voted: BTreeSet<Candidate>,
    pub most_votes: Pebbles,
    /// Empty when a majority was found in this round.
    pub least_voted: BTreeSet<Candidate>,
    /// The candidates removed at the end of this round. Empty for the final round.
    pub eliminated: BTreeSet<Candidate>,
    /// The state of the election after this round.
    pub state: RunoffState,
}

#[derive(PartialEq, Debug, Clone)]
pub struct RunoffResult {
    /// Terminal when returned by `Election::instant_runoff`.
    pub outcome: RunoffState,
    pub round_stats: Vec<RoundStats>,
}

impl RunoffResult {
    /// The candidates that end the election, either as majority winners or as
    /// tied finalists. None if the outcome is not terminal.
    pub fn finalists(&self) -> Option<&BTreeSet<Candidate>> {
        match &self.outcome {
            RunoffState::MajorityWinner(cands) | RunoffState::AllTied(cands) => Some(cands),
            RunoffState::Running(_) => None,
        }
    }

    pub fn winners(&self) -> Option<&BTreeSet<Candidate>> {
        match &self.outcome {
            RunoffState::MajorityWinner(cands) => Some(cands),
            _ => None,
        }
    }
}

/// Errors that prevent the algorithm from completing successfully.
#[derive(Eq, PartialEq, Debug, Clone)]
pub enum VotingErrors {
    /// The election has no ballots: the number of pebbles is undefined.
    EmptyElection,
    /// There is no candidate left to compare or to eliminate.
    NoCandidates,
    /// A ballot has no preference left.
    ExhaustedBallot,
    /// The tie-breaking rule is not one of ALL, RANDOM or RVH.
    InvalidTieBreakingRule(String),
    /// The tie-breaking order does not know this candidate.
    UnknownCandidate(String),
    DuplicateCandidate(String),
    /// The pebble count does not fit in 64 bits.
    PebbleOverflow,
    /// A round finished without reducing the number of candidates.
    NoConvergence,
}

impl Error for VotingErrors {}

impl Display for VotingErrors {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            VotingErrors::EmptyElection => write!(f, "the election has no ballots"),
            VotingErrors::NoCandidates => write!(f, "the election has no candidates left"),
            VotingErrors::ExhaustedBallot => {
                write!(f, "a ballot has no remaining preference")
            }
            VotingErrors::InvalidTieBreakingRule(rule) => {
                write!(
                    f,
                    "invalid tie-breaking rule: {:?} (expected one of ALL, RANDOM, RVH)",
                    rule
                )
            }
            VotingErrors::UnknownCandidate(name) => {
                write!(f, "candidate {:?} is not part of the election", name)
            }
            VotingErrors::DuplicateCandidate(name) => {
                write!(f, "candidate {:?} is declared more than once", name)
            }
            VotingErrors::PebbleOverflow => write!(f, "too many tied preferences to count"),
            VotingErrors::NoConvergence => {
                write!(f, "a round did not eliminate any candidate")
            }
        }
    }
}
