//! Property tests for tally and locking invariants

use proptest::prelude::*;
use ranked_pairs::{lock_pairs, ordered_pairs, Election, LockOutcome, PreferenceMatrix};

fn election_strategy() -> impl Strategy<Value = (usize, Vec<Vec<usize>>)> {
    (1usize..7).prop_flat_map(|n| {
        let ballot = Just((0..n).collect::<Vec<usize>>()).prop_shuffle();
        (Just(n), prop::collection::vec(ballot, 0..25))
    })
}

fn election(n: usize, ballots: &[Vec<usize>]) -> Election {
    let names: Vec<String> = (0..n).map(|i| format!("c{}", i)).collect();
    let mut e = Election::from_names(&names).unwrap();
    for b in ballots.iter() {
        e.record(b).unwrap();
    }
    e
}

proptest! {
    #[test]
    fn locked_graph_is_acyclic((n, ballots) in election_strategy()) {
        let e = election(n, &ballots);
        let pairs = e.ranked_pairs();
        let (graph, outcomes) = lock_pairs(&pairs, n);
        prop_assert!(graph.is_acyclic());
        prop_assert_eq!(outcomes.len(), pairs.len());
        for (p, o) in pairs.iter().zip(outcomes.iter()) {
            prop_assert_eq!(graph.is_locked(p.winner, p.loser), *o == LockOutcome::Locked);
        }
        // No locked edge can be closed back into a cycle.
        for (w, l) in graph.locked_edges() {
            prop_assert!(graph.would_cycle(l, w));
        }
    }

    #[test]
    fn opposite_counts_sum_to_ballots((n, ballots) in election_strategy()) {
        let mut m = PreferenceMatrix::new(n);
        for b in ballots.iter() {
            m.record(b).unwrap();
        }
        for i in 0..n {
            prop_assert_eq!(m.get(i, i), 0);
            for j in 0..n {
                if i != j {
                    prop_assert_eq!(m.get(i, j) + m.get(j, i), ballots.len() as u64);
                }
            }
        }
    }

    #[test]
    fn winner_is_a_source_and_tabulation_repeats((n, ballots) in election_strategy()) {
        let e = election(n, &ballots);
        let first = e.tabulate().unwrap();
        let second = e.tabulate().unwrap();
        prop_assert_eq!(&first, &second);
        prop_assert_eq!(first.sources.first(), Some(&first.winner));
        prop_assert!(first.locked.iter().all(|(_, l)| *l != first.winner));
    }

    #[test]
    fn pair_order_ignores_ballot_order((n, ballots) in election_strategy()) {
        let forward = election(n, &ballots);
        let reversed: Vec<Vec<usize>> = ballots.iter().rev().cloned().collect();
        let backward = election(n, &reversed);
        prop_assert_eq!(ordered_pairs(forward.preferences()), ordered_pairs(backward.preferences()));
        prop_assert_eq!(forward.tabulate().unwrap(), backward.tabulate().unwrap());
    }

    #[test]
    fn unanimous_ballot_elects_its_top_choice(ballot in (1usize..9).prop_flat_map(|n| Just((0..n).collect::<Vec<usize>>()).prop_shuffle())) {
        let e = election(ballot.len(), &[ballot.clone()]);
        let res = e.tabulate().unwrap();
        prop_assert_eq!(res.winner_id, ballot[0]);
        prop_assert_eq!(res.sources.len(), 1);
    }
}
