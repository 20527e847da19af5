/*!
Ranked Pairs (Tideman) tabulation.

Every ballot is a complete ranking of the registered candidates. The ballots are
reduced to a preference matrix, each strict pairwise victory becomes a pair, the
pairs are sorted by strength and locked one by one into a graph unless they would
close a cycle. The winner is the source of that graph.

```
use ranked_pairs::{Candidate, Election};
# use ranked_pairs::VotingErrors;

let mut election = Election::new(&[
    Candidate::new("Alice"),
    Candidate::new("Bob"),
    Candidate::new("Charlie"),
])?;
election.record(&[0, 2, 1])?;
election.record(&[2, 0, 1])?;

let result = election.tabulate()?;
assert_eq!(result.winner, "Alice");
# Ok::<(), VotingErrors>(())
```
*/
pub mod builder;
mod config;
mod lock_graph;
pub mod manual;
mod pairs;
mod tally;

use log::{debug, info};

use std::collections::HashMap;

pub use crate::config::*;
pub use crate::lock_graph::{lock_pairs, resolve_winner, LockGraph};
pub use crate::pairs::{compare_pairs, extract_pairs, ordered_pairs, sort_pairs};
pub use crate::tally::{check_ballot, PreferenceMatrix};

/// One election: a fixed roster and the tally of the ballots recorded so far.
///
/// The roster is fixed at construction. Ballots refer to candidates by their
/// position in it.
#[derive(Debug, Clone)]
pub struct Election {
    candidates: Vec<Candidate>,
    candidate_ids: HashMap<String, usize>,
    tally: PreferenceMatrix,
}

impl Election {
    pub fn new(candidates: &[Candidate]) -> Result<Election, VotingErrors> {
        if candidates.is_empty() || candidates.len() > MAX_CANDIDATES {
            return Err(VotingErrors::InvalidCandidateCount(candidates.len()));
        }
        let mut candidate_ids: HashMap<String, usize> = HashMap::new();
        for (idx, c) in candidates.iter().enumerate() {
            if candidate_ids.insert(c.name.clone(), idx).is_some() {
                return Err(VotingErrors::DuplicateCandidate(c.name.clone()));
            }
        }
        Ok(Election {
            candidates: candidates.to_vec(),
            candidate_ids,
            tally: PreferenceMatrix::new(candidates.len()),
        })
    }

    pub fn from_names(names: &[String]) -> Result<Election, VotingErrors> {
        let candidates: Vec<Candidate> = names.iter().map(|n| Candidate::new(n)).collect();
        Election::new(&candidates)
    }

    pub fn candidates(&self) -> &[Candidate] {
        &self.candidates
    }

    pub fn candidate_id(&self, name: &str) -> Option<usize> {
        self.candidate_ids.get(name).cloned()
    }

    /// Records one ballot, given as candidate indices from the most to the least preferred.
    pub fn record(&mut self, ballot: &[usize]) -> Result<(), VotingErrors> {
        self.tally.record(ballot)
    }

    /// Records one ballot given as candidate names.
    pub fn record_names(&mut self, names: &[String]) -> Result<(), VotingErrors> {
        let mut ballot: Vec<usize> = Vec::with_capacity(names.len());
        for name in names.iter() {
            let cid = self
                .candidate_id(name)
                .ok_or_else(|| VotingErrors::UnknownCandidate(name.clone()))?;
            ballot.push(cid);
        }
        self.record(&ballot)
    }

    /// An empty tally sized for this election, for recording a batch of ballots separately.
    pub fn new_tally(&self) -> PreferenceMatrix {
        PreferenceMatrix::new(self.candidates.len())
    }

    pub fn merge_tally(&mut self, batch: &PreferenceMatrix) -> Result<(), VotingErrors> {
        self.tally.merge(batch)
    }

    pub fn preferences(&self) -> &PreferenceMatrix {
        &self.tally
    }

    /// The strict pairwise victories, in locking order.
    pub fn ranked_pairs(&self) -> Vec<CandidatePair> {
        ordered_pairs(&self.tally)
    }

    /// Runs the pair, lock and winner phases over the current tally.
    ///
    /// The tally is not modified: tabulating again gives the same result.
    pub fn tabulate(&self) -> Result<VotingResult, VotingErrors> {
        info!(
            "Processing {:?} ballots, {:?} candidates",
            self.tally.ballots(),
            self.candidates.len()
        );
        let pairs = self.ranked_pairs();
        let (graph, outcomes) = lock_pairs(&pairs, self.candidates.len());
        self.build_result(&pairs, &outcomes, &graph)
    }

    /// Assembles the result from the outputs of the phases.
    ///
    /// `outcomes` must hold one entry per pair, and the graph and pairs must be
    /// sized for this roster. Otherwise `MismatchedTally` is returned.
    pub fn build_result(
        &self,
        pairs: &[CandidatePair],
        outcomes: &[LockOutcome],
        graph: &LockGraph,
    ) -> Result<VotingResult, VotingErrors> {
        let n = self.candidates.len();
        if outcomes.len() != pairs.len() {
            return Err(VotingErrors::MismatchedTally {
                expected: pairs.len(),
                found: outcomes.len(),
            });
        }
        if graph.size() != n {
            return Err(VotingErrors::MismatchedTally {
                expected: n,
                found: graph.size(),
            });
        }
        if let Some(p) = pairs.iter().find(|p| p.winner >= n || p.loser >= n) {
            return Err(VotingErrors::MismatchedTally {
                expected: n,
                found: p.winner.max(p.loser) + 1,
            });
        }
        let winner_id = resolve_winner(graph)?;
        let name = |cid: usize| self.candidates[cid].name.clone();

        let pair_stats: Vec<PairStats> = pairs
            .iter()
            .zip(outcomes.iter())
            .map(|(p, outcome)| PairStats {
                winner: name(p.winner),
                loser: name(p.loser),
                margin: p.margin,
                votes: p.votes,
                outcome: *outcome,
            })
            .collect();
        let sources: Vec<String> = graph.sources().into_iter().map(&name).collect();
        if sources.len() > 1 {
            debug!(
                "build_result: several candidates without incoming edge: {:?}",
                sources
            );
        }
        let locked: Vec<(String, String)> = graph
            .locked_edges()
            .into_iter()
            .map(|(w, l)| (name(w), name(l)))
            .collect();

        info!("Winner: {}: {}", winner_id, name(winner_id));
        Ok(VotingResult {
            winner: name(winner_id),
            winner_id,
            sources,
            candidates: self.candidates.iter().map(|c| c.name.clone()).collect(),
            ballots: self.tally.ballots(),
            preferences: self.tally.rows(),
            pairs: pair_stats,
            locked,
        })
    }
}

/// Runs a complete election over the given ballots.
///
/// Arguments:
/// * `candidates` the registered candidates, in the order defining their indices
/// * `ballots` complete rankings of candidate indices, most preferred first
///
/// Stops at the first invalid ballot.
pub fn run_election(
    candidates: &[Candidate],
    ballots: &[Vec<usize>],
) -> Result<VotingResult, VotingErrors> {
    let mut election = Election::new(candidates)?;
    for (idx, c) in candidates.iter().enumerate() {
        info!("Candidate: {}: {}", idx, c.name);
    }
    for b in ballots.iter() {
        election.record(b)?;
    }
    election.tabulate()
}
