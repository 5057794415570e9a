use log::debug;

use std::collections::{BTreeSet, HashMap};
use std::fmt::Display;

use crate::config::*;

/// The ranked preferences of one voter.
///
/// Raw ranks are recorded with [`Ballot::add_preference`] and turned into an
/// ordered list of [`PreferenceLevel`]s by [`Ballot::normalize`]. Only the
/// order of the ranks matters: smaller is preferred, equal ranks are tied.
#[derive(PartialEq, Debug, Clone, Default)]
pub struct Ballot {
    ranks: HashMap<Candidate, f64>,
    // Removed candidates never come back, even as unranked candidates of the universe.
    removed: BTreeSet<Candidate>,
    // Invariant: no level is empty, and a candidate appears in at most one level.
    preferences: Vec<PreferenceLevel>,
}

impl Ballot {
    pub fn new() -> Ballot {
        Ballot::default()
    }

    /// Records the rank of a candidate, replacing any previous rank.
    ///
    /// The preferences are only updated by the next call to [`Ballot::normalize`].
    pub fn add_preference(&mut self, candidate: Candidate, rank: f64) {
        self.ranks.insert(candidate, rank);
    }

    /// Finalizes the ballot by sorting the candidates by rank and grouping
    /// equal ranks into levels.
    ///
    /// If a universe of candidates is given, ranked candidates outside of it
    /// are dropped, and the candidates of the universe that were not ranked
    /// are all tied in one extra level at the end.
    pub fn normalize(&mut self, universe: Option<&BTreeSet<Candidate>>) {
        let mut sorted: Vec<(&Candidate, f64)> = self.ranks.iter().map(|(c, r)| (c, *r)).collect();
        sorted.sort_by(|(c1, r1), (c2, r2)| r1.total_cmp(r2).then_with(|| c1.cmp(c2)));

        let mut preferences: Vec<PreferenceLevel> = Vec::new();
        let mut cur_rank: Option<f64> = None;
        for (candidate, rank) in sorted {
            if self.removed.contains(candidate) {
                continue;
            }
            if universe.map_or(false, |u| !u.contains(candidate)) {
                debug!("normalize: dropping candidate {} outside of the universe", candidate);
                continue;
            }
            match preferences.last_mut() {
                Some(level) if cur_rank == Some(rank) => {
                    level.insert(candidate.clone());
                }
                _ => {
                    preferences.push([candidate.clone()].into_iter().collect());
                    cur_rank = Some(rank);
                }
            }
        }

        if let Some(universe) = universe {
            let unranked: PreferenceLevel = universe
                .iter()
                .filter(|c| !self.ranks.contains_key(*c) && !self.removed.contains(*c))
                .cloned()
                .collect();
            if !unranked.is_empty() {
                preferences.push(unranked);
            }
        }
        self.preferences = preferences;
    }

    pub fn preferences(&self) -> &[PreferenceLevel] {
        &self.preferences
    }

    /// The most preferred candidates of this ballot. There may be several of
    /// them if the ballot ties its first choices.
    pub fn top_preference(&self) -> Result<&PreferenceLevel, VotingErrors> {
        self.preferences.first().ok_or(VotingErrors::ExhaustedBallot)
    }

    /// Removes a candidate from the ballot. Levels that become empty are dropped.
    ///
    /// The candidate is left out of any later [`Ballot::normalize`].
    pub fn remove_preference(&mut self, candidate: &Candidate) {
        self.ranks.remove(candidate);
        self.removed.insert(candidate.clone());
        for level in self.preferences.iter_mut() {
            level.remove(candidate);
        }
        self.preferences.retain(|level| !level.is_empty());
    }

    /// All the candidates present in the preferences, from the most
    /// preferred to the least preferred.
    pub fn voted_candidates(&self) -> Vec<Candidate> {
        self.preferences.iter().flatten().cloned().collect()
    }
}

impl Display for Ballot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let lines: Vec<String> = self
            .preferences
            .iter()
            .enumerate()
            .map(|(idx, level)| {
                let names: Vec<&str> = level.iter().map(|c| c.name()).collect();
                format!("{}. {}", idx + 1, names.join(", "))
            })
            .collect();
        write!(f, "{}", lines.join("\n"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn level(names: &[&str]) -> PreferenceLevel {
        names.iter().map(|n| Candidate::new(*n)).collect()
    }

    fn abc() -> (Candidate, Candidate, Candidate) {
        (
            Candidate::new("Alice"),
            Candidate::new("Bob"),
            Candidate::new("Charlie"),
        )
    }

    #[test]
    fn add_preference_overwrites() {
        let (alice, bob, _) = abc();
        let mut ballot = Ballot::new();
        ballot.add_preference(alice.clone(), 3.0);
        ballot.add_preference(bob, 2.0);
        ballot.add_preference(alice, 1.0);
        assert!(ballot.preferences().is_empty());
        ballot.normalize(None);
        assert_eq!(ballot.preferences(), &[level(&["Alice"]), level(&["Bob"])]);
    }

    #[test]
    fn normalize_groups_ties() {
        let (alice, bob, charlie) = abc();
        let mut ballot = Ballot::new();
        ballot.add_preference(alice, 1.0);
        ballot.add_preference(bob, 2.0);
        ballot.add_preference(charlie, 1.0);
        ballot.normalize(None);
        assert_eq!(
            ballot.preferences(),
            &[level(&["Alice", "Charlie"]), level(&["Bob"])]
        );
    }

    #[test]
    fn normalize_only_uses_rank_order() {
        let (alice, bob, charlie) = abc();
        let mut ballot = Ballot::new();
        ballot.add_preference(alice, 10.5);
        ballot.add_preference(bob, -2.0);
        ballot.add_preference(charlie, 1000.0);
        ballot.normalize(None);
        assert_eq!(
            ballot.preferences(),
            &[level(&["Bob"]), level(&["Alice"]), level(&["Charlie"])]
        );
    }

    #[test]
    fn normalize_appends_unranked() {
        let (alice, bob, charlie) = abc();
        let universe: BTreeSet<Candidate> =
            [alice.clone(), bob.clone(), charlie].into_iter().collect();
        let mut ballot = Ballot::new();
        ballot.add_preference(alice, 1.0);
        ballot.add_preference(bob, 2.0);
        ballot.normalize(Some(&universe));
        assert_eq!(
            ballot.preferences(),
            &[level(&["Alice"]), level(&["Bob"]), level(&["Charlie"])]
        );
    }

    #[test]
    fn normalize_drops_candidates_outside_universe() {
        let (alice, bob, charlie) = abc();
        let universe: BTreeSet<Candidate> = [alice.clone(), bob.clone()].into_iter().collect();
        let mut ballot = Ballot::new();
        ballot.add_preference(alice, 1.0);
        ballot.add_preference(bob, 2.0);
        ballot.add_preference(charlie, 1.0);
        ballot.normalize(Some(&universe));
        assert_eq!(ballot.preferences(), &[level(&["Alice"]), level(&["Bob"])]);
    }

    #[test]
    fn normalize_empty_ballot_ties_everyone() {
        let (alice, bob, charlie) = abc();
        let universe: BTreeSet<Candidate> = [alice, bob, charlie].into_iter().collect();
        let mut ballot = Ballot::new();
        ballot.normalize(Some(&universe));
        assert_eq!(ballot.preferences(), &[level(&["Alice", "Bob", "Charlie"])]);
        assert_eq!(ballot.top_preference().unwrap().len(), 3);
    }

    #[test]
    fn normalize_is_idempotent() {
        let (alice, bob, charlie) = abc();
        let dave = Candidate::new("Dave");
        let universe: BTreeSet<Candidate> = [alice.clone(), bob.clone(), dave.clone()]
            .into_iter()
            .collect();
        let mut ballot = Ballot::new();
        ballot.add_preference(charlie, 0.0);
        ballot.add_preference(bob, 3.0);
        ballot.add_preference(alice, 3.0);
        ballot.normalize(Some(&universe));
        let first = ballot.preferences().to_vec();
        ballot.normalize(Some(&universe));
        assert_eq!(ballot.preferences(), first.as_slice());

        // Every candidate of the universe is in exactly one level.
        for c in universe.iter() {
            assert_eq!(first.iter().filter(|l| l.contains(c)).count(), 1);
        }
        assert!(first.iter().all(|l| !l.is_empty()));
        assert!(first[1].contains(&dave));
    }

    #[test]
    fn top_preference() {
        let (alice, bob, _) = abc();
        let mut ballot = Ballot::new();
        ballot.add_preference(alice, 1.0);
        ballot.add_preference(bob, 2.0);
        ballot.normalize(None);
        assert_eq!(ballot.top_preference(), Ok(&level(&["Alice"])));
    }

    #[test]
    fn top_preference_exhausted() {
        let (alice, _, _) = abc();
        let mut ballot = Ballot::new();
        ballot.add_preference(alice.clone(), 1.0);
        ballot.normalize(None);
        ballot.remove_preference(&alice);
        assert!(ballot.preferences().is_empty());
        assert_eq!(ballot.top_preference(), Err(VotingErrors::ExhaustedBallot));
    }

    #[test]
    fn remove_preference() {
        let (alice, bob, charlie) = abc();
        let mut ballot = Ballot::new();
        ballot.add_preference(alice.clone(), 1.0);
        ballot.add_preference(bob, 2.0);
        ballot.add_preference(charlie, 1.0);
        ballot.normalize(None);
        ballot.remove_preference(&alice);
        assert_eq!(
            ballot.preferences(),
            &[level(&["Charlie"]), level(&["Bob"])]
        );
    }

    #[test]
    fn removed_candidate_does_not_come_back() {
        let (alice, bob, _) = abc();
        let mut ballot = Ballot::new();
        ballot.add_preference(alice.clone(), 1.0);
        ballot.add_preference(bob, 2.0);
        ballot.normalize(None);
        ballot.remove_preference(&alice);
        ballot.normalize(None);
        assert_eq!(ballot.preferences(), &[level(&["Bob"])]);
    }

    #[test]
    fn removed_candidate_is_not_unranked() {
        let (alice, bob, charlie) = abc();
        let universe: BTreeSet<Candidate> =
            [alice.clone(), bob.clone(), charlie].into_iter().collect();
        let mut ballot = Ballot::new();
        ballot.add_preference(alice.clone(), 1.0);
        ballot.add_preference(bob, 2.0);
        ballot.normalize(Some(&universe));
        ballot.remove_preference(&alice);
        ballot.normalize(Some(&universe));
        assert_eq!(ballot.preferences(), &[level(&["Bob"]), level(&["Charlie"])]);
        assert!(!ballot.voted_candidates().contains(&alice));

        // Ranking the candidate again does not bring it back either.
        ballot.add_preference(alice.clone(), 0.0);
        ballot.normalize(Some(&universe));
        assert!(!ballot.voted_candidates().contains(&alice));
    }

    #[test]
    fn voted_candidates() {
        let (alice, bob, charlie) = abc();
        let mut ballot = Ballot::new();
        ballot.add_preference(alice.clone(), 1.0);
        ballot.add_preference(bob.clone(), -2.0);
        ballot.normalize(None);
        assert_eq!(ballot.voted_candidates(), vec![bob, alice]);
        assert!(!ballot.voted_candidates().contains(&charlie));
    }

    #[test]
    fn display() {
        let (alice, bob, charlie) = abc();
        let mut ballot = Ballot::new();
        ballot.add_preference(alice, 1.0);
        ballot.add_preference(bob, 2.0);
        ballot.add_preference(charlie, 1.0);
        ballot.normalize(None);
        assert_eq!(ballot.to_string(), "1. Alice, Charlie\n2. Bob");
    }
}
