/*!
Instant-runoff tabulation over ballots that may tie candidates.

Every ballot ranks candidates with arbitrary numbers (only their order
matters) and may rank several candidates equally. When a ballot ties several
candidates at its top, its vote is split equally between them. To keep all the
comparisons exact, the split votes are counted in integer *pebbles*: in a
given round, one vote is worth the least common multiple of the sizes of
all the top tied groups.

```
use std::collections::BTreeSet;
use instant_runoff::*;

// There are two candidates in this election
let alice = Candidate::new("Alice");
let bob = Candidate::new("Bob");
let candidates: BTreeSet<Candidate> = [alice.clone(), bob.clone()].into_iter().collect();

// The first voter ranks Alice first and Bob second
let mut ballot1 = Ballot::new();
ballot1.add_preference(alice.clone(), 1.0);
ballot1.add_preference(bob.clone(), 2.0);
ballot1.normalize(Some(&candidates));

// The second voter does not express any preference,
// which is equivalent to ranking all candidates equally
let mut ballot2 = Ballot::new();
ballot2.normalize(Some(&candidates));

let mut election = Election::with_seed(vec![ballot1, ballot2], Some(candidates), 0);
let result = election.instant_runoff(TieBreakingRule::All)?;
let winners: BTreeSet<Candidate> = [alice].into_iter().collect();
assert_eq!(result.winners(), Some(&winners));
# Ok::<(), VotingErrors>(())
```
*/

mod ballot;
pub mod builder;
mod config;
pub mod manual;
pub mod quick_start;

use log::{debug, info};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

use std::collections::{BTreeMap, BTreeSet};
use std::fmt::Display;

pub use crate::ballot::Ballot;
pub use crate::config::*;

/// An instant-runoff election over a set of ballots.
///
/// The random generator `R` is only used by the RANDOM and RVH tie-breaking
/// rules.
pub struct Election<R = StdRng> {
    ballots: Vec<Ballot>,
    candidates: BTreeSet<Candidate>,
    round: u32,
    // A fixed random permutation of all the initial candidates, for the RVH rule.
    rvh: Vec<Candidate>,
    rng: R,
}

impl Election<StdRng> {
    /// Creates an election whose random choices are determined by the seed.
    pub fn with_seed(
        ballots: Vec<Ballot>,
        candidates: Option<BTreeSet<Candidate>>,
        seed: u64,
    ) -> Election<StdRng> {
        Election::new(ballots, candidates, StdRng::seed_from_u64(seed))
    }
}

impl<R: Rng> Election<R> {
    /// Creates a new election.
    ///
    /// Arguments:
    /// * `ballots` the ballots of the voters
    /// * `candidates` the candidates running in this election. If not provided,
    /// they are all the candidates that appear in the preferences of the ballots.
    /// * `rng` the source of randomness for tie-breaking
    ///
    /// All the ballots are normalized against the candidates: the candidates a
    /// ballot did not rank come last on this ballot.
    pub fn new(
        mut ballots: Vec<Ballot>,
        candidates: Option<BTreeSet<Candidate>>,
        mut rng: R,
    ) -> Election<R> {
        let candidates: BTreeSet<Candidate> = match candidates {
            Some(cands) => cands,
            None => ballots.iter().flat_map(|b| b.voted_candidates()).collect(),
        };
        for ballot in ballots.iter_mut() {
            ballot.normalize(Some(&candidates));
        }
        let mut rvh: Vec<Candidate> = candidates.iter().cloned().collect();
        rvh.shuffle(&mut rng);
        debug!("Election::new: tie-breaking order: {:?}", rvh);
        info!(
            "Election with {} ballots and {} candidates",
            ballots.len(),
            candidates.len()
        );
        Election {
            ballots,
            candidates,
            round: 0,
            rvh,
            rng,
        }
    }

    pub fn ballots(&self) -> &[Ballot] {
        &self.ballots
    }

    /// The candidates still running.
    pub fn candidates(&self) -> &BTreeSet<Candidate> {
        &self.candidates
    }

    /// The current round. It is 0 until the runoff starts.
    pub fn round(&self) -> u32 {
        self.round
    }

    /// The ordering used by the RVH rule, drawn once at creation.
    pub fn tie_break_order(&self) -> &[Candidate] {
        &self.rvh
    }

    /// The number of pebbles that make one vote: the least common multiple of
    /// the number of tied top preferences over all the ballots.
    pub fn all_pebbles(&self) -> Result<Pebbles, VotingErrors> {
        if self.ballots.is_empty() {
            return Err(VotingErrors::EmptyElection);
        }
        let mut res: u64 = 1;
        for ballot in self.ballots.iter() {
            let n = ballot.top_preference()?.len() as u64;
            res = lcm(res, n).ok_or(VotingErrors::PebbleOverflow)?;
        }
        Ok(Pebbles(res))
    }

    /// The total number of votes of the election, in pebbles.
    pub fn all_votes(&self) -> Result<Pebbles, VotingErrors> {
        let pebbles = self.all_pebbles()?;
        (self.ballots.len() as u64)
            .checked_mul(pebbles.0)
            .map(Pebbles)
            .ok_or(VotingErrors::PebbleOverflow)
    }

    /// The top-preference votes of each running candidate, in pebbles.
    ///
    /// Candidates that are nobody's top preference have a count of zero.
    pub fn tally(&self) -> Result<BTreeMap<Candidate, Pebbles>, VotingErrors> {
        let pebbles = self.all_pebbles()?;
        let mut counts: BTreeMap<Candidate, Pebbles> = self
            .candidates
            .iter()
            .map(|c| (c.clone(), Pebbles::EMPTY))
            .collect();
        for ballot in self.ballots.iter() {
            let top = ballot.top_preference()?;
            // Exact by construction of the number of pebbles.
            let share = Pebbles(pebbles.0 / top.len() as u64);
            for candidate in top.iter() {
                *counts.entry(candidate.clone()).or_insert(Pebbles::EMPTY) += share;
            }
        }
        Ok(counts)
    }

    /// The tally, by decreasing number of votes. Candidates with the same
    /// number of votes are listed by name.
    pub fn sorted_tally(&self) -> Result<Vec<(Candidate, Pebbles)>, VotingErrors> {
        let mut res: Vec<(Candidate, Pebbles)> = self.tally()?.into_iter().collect();
        res.sort_by(|(c1, p1), (c2, p2)| p2.cmp(p1).then_with(|| c1.cmp(c2)));
        Ok(res)
    }

    /// The share of the votes of each candidate, in percent.
    ///
    /// For display only: all the decisions are made on the tally.
    pub fn standings(&self) -> Result<BTreeMap<Candidate, f64>, VotingErrors> {
        let total = self.all_votes()?;
        Ok(self
            .tally()?
            .into_iter()
            .map(|(c, p)| (c, percentage(p, total)))
            .collect())
    }

    /// Is this number of votes (in pebbles) an absolute majority?
    pub fn is_majority(&self, votes: Pebbles) -> Result<bool, VotingErrors> {
        let total = self.all_votes()?;
        Ok(u128::from(votes.0) * 2 > u128::from(total.0))
    }

    /// The candidates tied for the most votes, and their number of votes.
    pub fn top_candidates(&self) -> Result<(BTreeSet<Candidate>, Pebbles), VotingErrors> {
        let tally = self.tally()?;
        let most_votes = *tally.values().max().ok_or(VotingErrors::NoCandidates)?;
        Ok((with_count(&tally, most_votes), most_votes))
    }

    /// The candidates tied for the fewest votes, and their number of votes.
    pub fn bottom_candidates(&self) -> Result<(BTreeSet<Candidate>, Pebbles), VotingErrors> {
        let tally = self.tally()?;
        let least_votes = *tally.values().min().ok_or(VotingErrors::NoCandidates)?;
        Ok((with_count(&tally, least_votes), least_votes))
    }

    /// Selects which of the given candidates to eliminate, according to the
    /// tie-breaking rule. A single candidate is always selected.
    pub fn to_eliminate(
        &mut self,
        candidates: &BTreeSet<Candidate>,
        rule: TieBreakingRule,
    ) -> Result<BTreeSet<Candidate>, VotingErrors> {
        if candidates.len() <= 1 {
            return if candidates.is_empty() {
                Err(VotingErrors::NoCandidates)
            } else {
                Ok(candidates.clone())
            };
        }
        let selected: BTreeSet<Candidate> = match rule {
            TieBreakingRule::All => candidates.clone(),
            TieBreakingRule::Random => {
                let pool: Vec<&Candidate> = candidates.iter().collect();
                let choice = pool.choose(&mut self.rng).ok_or(VotingErrors::NoCandidates)?;
                [(*choice).clone()].into_iter().collect()
            }
            TieBreakingRule::Rvh => {
                let first = self.rvh.iter().find(|c| candidates.contains(*c));
                match first {
                    Some(c) => [c.clone()].into_iter().collect(),
                    None => {
                        let name = candidates
                            .iter()
                            .next()
                            .map(|c| c.name().to_string())
                            .unwrap_or_default();
                        return Err(VotingErrors::UnknownCandidate(name));
                    }
                }
            }
        };
        debug!(
            "to_eliminate: rule {} selected {:?} out of {:?}",
            rule, selected, candidates
        );
        Ok(selected)
    }

    /// Removes the candidates from the election and from all the ballots.
    pub fn eliminate(&mut self, candidates: &BTreeSet<Candidate>) {
        for candidate in candidates.iter() {
            self.candidates.remove(candidate);
            for ballot in self.ballots.iter_mut() {
                ballot.remove_preference(candidate);
            }
        }
    }

    /// Runs one round of the election: checks for a majority, and otherwise
    /// eliminates the candidates with the fewest votes.
    ///
    /// The round counter moves to the next round only if the election continues.
    pub fn run_round(&mut self, rule: TieBreakingRule) -> Result<RoundStats, VotingErrors> {
        if self.round == 0 {
            self.round = 1;
        }
        let round = self.round;
        let pebbles_per_vote = self.all_pebbles()?;
        let all_votes = self.all_votes()?;
        let tally = self.sorted_tally()?;
        let standings: Vec<(Candidate, f64)> = tally
            .iter()
            .map(|(c, p)| (c.clone(), percentage(*p, all_votes)))
            .collect();
        info!("{}", self);
        for (c, p) in tally.iter() {
            info!("    {:>10} {}", p.0, c);
        }

        let mut stats = RoundStats {
            round,
            num_ballots: self.ballots.len(),
            num_candidates: self.candidates.len(),
            pebbles_per_vote,
            all_votes,
            tally,
            standings,
            most_voted: BTreeSet::new(),
            most_votes: Pebbles::EMPTY,
            least_voted: BTreeSet::new(),
            eliminated: BTreeSet::new(),
            state: RunoffState::Running(round),
        };

        let (most_voted, most_votes) = self.top_candidates()?;
        stats.most_voted = most_voted.clone();
        stats.most_votes = most_votes;
        if self.is_majority(most_votes)? {
            info!("Round {}: majority winner(s): {:?}", round, most_voted);
            stats.state = RunoffState::MajorityWinner(most_voted);
            return Ok(stats);
        }

        let (least_voted, least_votes) = self.bottom_candidates()?;
        debug!(
            "run_round: least voted: {:?} with {} pebbles",
            least_voted, least_votes
        );
        stats.least_voted = least_voted.clone();
        let eliminated = self.to_eliminate(&least_voted, rule)?;
        if eliminated == self.candidates {
            info!("Round {}: all remaining candidates are tied", round);
            stats.state = RunoffState::AllTied(eliminated);
            return Ok(stats);
        }

        let num_before = self.candidates.len();
        self.eliminate(&eliminated);
        if self.candidates.len() >= num_before {
            return Err(VotingErrors::NoConvergence);
        }
        info!("Round {}: eliminated {:?}", round, eliminated);
        stats.eliminated = eliminated;
        self.round += 1;
        stats.state = RunoffState::Running(self.round);
        Ok(stats)
    }

    /// Runs the election with instant runoff until a majority is found or
    /// all the remaining candidates are tied.
    pub fn instant_runoff(&mut self, rule: TieBreakingRule) -> Result<RunoffResult, VotingErrors> {
        info!(
            "Running instant runoff with tie-breaking rule {} ({})",
            rule,
            rule.description()
        );
        self.round = 1;
        let mut round_stats: Vec<RoundStats> = Vec::new();
        loop {
            let stats = self.run_round(rule)?;
            let state = stats.state.clone();
            round_stats.push(stats);
            if state.is_terminal() {
                return Ok(RunoffResult {
                    outcome: state,
                    round_stats,
                });
            }
        }
    }
}

impl<R> Display for Election<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Round #{} of election with {} ballots and {} candidates",
            self.round,
            self.ballots.len(),
            self.candidates.len()
        )
    }
}

fn with_count(tally: &BTreeMap<Candidate, Pebbles>, count: Pebbles) -> BTreeSet<Candidate> {
    tally
        .iter()
        .filter(|(_, p)| **p == count)
        .map(|(c, _)| c.clone())
        .collect()
}

fn percentage(votes: Pebbles, total: Pebbles) -> f64 {
    100.0 * votes.0 as f64 / total.0 as f64
}

fn gcd(mut a: u64, mut b: u64) -> u64 {
    while b != 0 {
        (a, b) = (b, a % b);
    }
    a
}

fn lcm(a: u64, b: u64) -> Option<u64> {
    if a == 0 || b == 0 {
        return Some(0);
    }
    (a / gcd(a, b)).checked_mul(b)
}
