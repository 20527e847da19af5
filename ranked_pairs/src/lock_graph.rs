use log::debug;

use crate::config::*;

/// The directed graph of locked victories.
///
/// An edge `u -> v` means that the victory of `u` over `v` has been committed.
/// Edges are only added through `lock`, which keeps the graph acyclic.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct LockGraph {
    size: usize,
    // Row-major adjacency matrix.
    edges: Vec<bool>,
}

impl LockGraph {
    pub fn new(size: usize) -> LockGraph {
        LockGraph {
            size,
            edges: vec![false; size * size],
        }
    }

    pub fn size(&self) -> usize {
        self.size
    }

    fn check_bounds(&self, from: usize, to: usize) {
        assert!(
            from < self.size && to < self.size,
            "candidate index out of range: ({}, {}) for {} candidates",
            from,
            to,
            self.size
        );
    }

    fn slot(&self, from: usize, to: usize) -> usize {
        self.check_bounds(from, to);
        from * self.size + to
    }

    pub fn is_locked(&self, from: usize, to: usize) -> bool {
        self.edges[self.slot(from, to)]
    }

    /// True if adding `from -> to` would close a cycle, that is if `from` can
    /// already be reached from `to` over locked edges.
    ///
    /// Iterative depth-first search: every node is pushed at most once.
    pub fn would_cycle(&self, from: usize, to: usize) -> bool {
        self.check_bounds(from, to);
        let mut seen = vec![false; self.size];
        let mut stack: Vec<usize> = vec![to];
        seen[to] = true;
        while let Some(node) = stack.pop() {
            if node == from {
                return true;
            }
            let row = &self.edges[node * self.size..(node + 1) * self.size];
            for (next, &locked) in row.iter().enumerate() {
                if locked && !seen[next] {
                    seen[next] = true;
                    stack.push(next);
                }
            }
        }
        false
    }

    /// Commits `from -> to` unless it would close a cycle.
    pub fn lock(&mut self, from: usize, to: usize) -> LockOutcome {
        if self.would_cycle(from, to) {
            LockOutcome::Skipped
        } else {
            let s = self.slot(from, to);
            self.edges[s] = true;
            LockOutcome::Locked
        }
    }

    /// All the committed edges, ordered by origin then destination.
    pub fn locked_edges(&self) -> Vec<(usize, usize)> {
        let mut res: Vec<(usize, usize)> = Vec::new();
        for from in 0..self.size {
            for to in 0..self.size {
                if self.is_locked(from, to) {
                    res.push((from, to));
                }
            }
        }
        res
    }

    fn has_incoming(&self, node: usize) -> bool {
        (0..self.size).any(|other| self.is_locked(other, node))
    }

    /// The candidates without any incoming edge, in index order.
    pub fn sources(&self) -> Vec<usize> {
        (0..self.size).filter(|&n| !self.has_incoming(n)).collect()
    }

    /// Checks the whole graph for cycles by repeatedly peeling off sources.
    pub fn is_acyclic(&self) -> bool {
        let mut in_degree: Vec<usize> = (0..self.size)
            .map(|to| (0..self.size).filter(|&from| self.is_locked(from, to)).count())
            .collect();
        let mut ready: Vec<usize> = (0..self.size).filter(|&n| in_degree[n] == 0).collect();
        let mut removed = 0;
        while let Some(node) = ready.pop() {
            removed += 1;
            for next in 0..self.size {
                if self.is_locked(node, next) {
                    in_degree[next] -= 1;
                    if in_degree[next] == 0 {
                        ready.push(next);
                    }
                }
            }
        }
        removed == self.size
    }
}

/// Locks the pairs one after the other, in the order given.
///
/// Returns the final graph and the outcome of each pair.
pub fn lock_pairs(pairs: &[CandidatePair], num_candidates: usize) -> (LockGraph, Vec<LockOutcome>) {
    let mut graph = LockGraph::new(num_candidates);
    let mut outcomes: Vec<LockOutcome> = Vec::with_capacity(pairs.len());
    for p in pairs.iter() {
        let outcome = graph.lock(p.winner, p.loser);
        debug!(
            "lock_pairs: {} -> {} (margin {}, votes {}): {:?}",
            p.winner, p.loser, p.margin, p.votes, outcome
        );
        outcomes.push(outcome);
    }
    debug_assert!(graph.is_acyclic());
    (graph, outcomes)
}

/// The winner is the source of the locked graph. If several candidates have no
/// incoming edge, the one with the lowest index is selected.
pub fn resolve_winner(graph: &LockGraph) -> Result<usize, VotingErrors> {
    graph.sources().first().cloned().ok_or(VotingErrors::NoWinner)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detects_paths_back_to_the_origin() {
        let mut g = LockGraph::new(4);
        assert_eq!(g.lock(0, 1), LockOutcome::Locked);
        assert_eq!(g.lock(1, 2), LockOutcome::Locked);
        assert!(g.would_cycle(2, 0));
        assert!(!g.would_cycle(0, 2));
        assert!(!g.would_cycle(3, 0));
        assert!(!g.would_cycle(2, 3));
    }

    #[test]
    fn skipped_edges_leave_the_graph_unchanged() {
        let mut g = LockGraph::new(3);
        g.lock(0, 1);
        g.lock(1, 2);
        let before = g.clone();
        assert_eq!(g.lock(2, 0), LockOutcome::Skipped);
        assert_eq!(g, before);
        assert!(g.is_acyclic());
        assert_eq!(g.locked_edges(), vec![(0, 1), (1, 2)]);
    }

    #[test]
    fn self_loops_are_never_locked() {
        let mut g = LockGraph::new(2);
        assert_eq!(g.lock(1, 1), LockOutcome::Skipped);
        assert!(g.locked_edges().is_empty());
    }

    #[test]
    fn acyclic_check_spots_cycles() {
        let mut g = LockGraph::new(3);
        g.edges = vec![false, true, false, false, false, true, true, false, false];
        assert!(!g.is_acyclic());
        assert!(LockGraph::new(0).is_acyclic());
    }

    #[test]
    fn lock_pairs_follows_the_given_order() {
        let pairs = [
            CandidatePair {
                winner: 1,
                loser: 2,
                margin: 5,
                votes: 7,
            },
            CandidatePair {
                winner: 0,
                loser: 1,
                margin: 3,
                votes: 6,
            },
            CandidatePair {
                winner: 2,
                loser: 0,
                margin: 1,
                votes: 5,
            },
        ];
        let (g, outcomes) = lock_pairs(&pairs, 3);
        assert_eq!(
            outcomes,
            vec![
                LockOutcome::Locked,
                LockOutcome::Locked,
                LockOutcome::Skipped
            ]
        );
        assert_eq!(resolve_winner(&g), Ok(0));
    }

    #[test]
    fn lowest_source_wins() {
        let mut g = LockGraph::new(3);
        g.lock(0, 1);
        g.lock(2, 1);
        assert_eq!(g.sources(), vec![0, 2]);
        assert_eq!(resolve_winner(&g), Ok(0));
    }

    #[test]
    fn empty_graph_has_no_winner() {
        assert_eq!(resolve_winner(&LockGraph::new(0)), Err(VotingErrors::NoWinner));
        assert_eq!(resolve_winner(&LockGraph::new(1)), Ok(0));
    }
}
