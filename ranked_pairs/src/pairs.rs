use std::cmp::Ordering;

use crate::config::*;
use crate::tally::PreferenceMatrix;

/// Finds, for every unordered pair of candidates, the direction preferred by more voters.
///
/// Pairs with the same count in both directions carry no preference and are left out.
/// The pairs are returned in extraction order; see `sort_pairs` for the processing order.
pub fn extract_pairs(matrix: &PreferenceMatrix) -> Vec<CandidatePair> {
    let n = matrix.size();
    let mut pairs: Vec<CandidatePair> = Vec::new();
    for i in 0..n {
        for j in (i + 1)..n {
            let (ij, ji) = (matrix.get(i, j), matrix.get(j, i));
            match ij.cmp(&ji) {
                Ordering::Greater => pairs.push(CandidatePair {
                    winner: i,
                    loser: j,
                    margin: ij - ji,
                    votes: ij,
                }),
                Ordering::Less => pairs.push(CandidatePair {
                    winner: j,
                    loser: i,
                    margin: ji - ij,
                    votes: ji,
                }),
                Ordering::Equal => {}
            }
        }
    }
    pairs
}

/// Strength order of two pairs, strongest first:
/// larger margin, then more votes for the winner, then lower winner index, then lower loser index.
///
/// Only the values stored in the pairs are read.
pub fn compare_pairs(a: &CandidatePair, b: &CandidatePair) -> Ordering {
    b.margin
        .cmp(&a.margin)
        .then_with(|| b.votes.cmp(&a.votes))
        .then_with(|| a.winner.cmp(&b.winner))
        .then_with(|| a.loser.cmp(&b.loser))
}

pub fn sort_pairs(pairs: &mut [CandidatePair]) {
    pairs.sort_by(compare_pairs);
}

/// Extracted pairs, in the order in which they must be locked.
pub fn ordered_pairs(matrix: &PreferenceMatrix) -> Vec<CandidatePair> {
    let mut pairs = extract_pairs(matrix);
    sort_pairs(&mut pairs);
    pairs
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pair(winner: usize, loser: usize, margin: u64, votes: u64) -> CandidatePair {
        CandidatePair {
            winner,
            loser,
            margin,
            votes,
        }
    }

    #[test]
    fn tied_pair_yields_nothing() {
        let mut m = PreferenceMatrix::new(3);
        m.record(&[0, 2, 1]).unwrap();
        m.record(&[2, 0, 1]).unwrap();
        let pairs = ordered_pairs(&m);
        assert_eq!(pairs, vec![pair(0, 1, 2, 2), pair(2, 1, 2, 2)]);
    }

    #[test]
    fn one_pair_per_unordered_pair() {
        let mut m = PreferenceMatrix::new(4);
        for b in [[3, 1, 0, 2], [3, 0, 1, 2], [1, 3, 2, 0]] {
            m.record(&b).unwrap();
        }
        let pairs = extract_pairs(&m);
        for p in pairs.iter() {
            assert!(p.margin > 0);
            assert_eq!(p.votes, m.get(p.winner, p.loser));
            assert_eq!(p.margin, m.get(p.winner, p.loser) - m.get(p.loser, p.winner));
            let reversed = pairs
                .iter()
                .filter(|q| q.winner == p.loser && q.loser == p.winner)
                .count();
            assert_eq!(reversed, 0);
        }
        // 3 ballots: no tie is possible.
        assert_eq!(pairs.len(), 6);
    }

    #[test]
    fn margin_comes_first() {
        let mut pairs = vec![pair(0, 1, 1, 9), pair(2, 3, 5, 5), pair(1, 2, 3, 4)];
        sort_pairs(&mut pairs);
        assert_eq!(
            pairs,
            vec![pair(2, 3, 5, 5), pair(1, 2, 3, 4), pair(0, 1, 1, 9)]
        );
    }

    #[test]
    fn votes_then_indices_break_ties() {
        let mut pairs = vec![
            pair(3, 0, 2, 4),
            pair(1, 2, 2, 6),
            pair(0, 3, 2, 4),
            pair(0, 2, 2, 4),
        ];
        sort_pairs(&mut pairs);
        assert_eq!(
            pairs,
            vec![
                pair(1, 2, 2, 6),
                pair(0, 2, 2, 4),
                pair(0, 3, 2, 4),
                pair(3, 0, 2, 4),
            ]
        );
    }

    #[test]
    fn order_does_not_depend_on_input_order() {
        let base = vec![
            pair(0, 1, 1, 3),
            pair(2, 1, 1, 3),
            pair(0, 2, 1, 3),
            pair(3, 1, 2, 3),
        ];
        let mut a = base.clone();
        let mut b: Vec<CandidatePair> = base.iter().rev().cloned().collect();
        sort_pairs(&mut a);
        sort_pairs(&mut b);
        assert_eq!(a, b);
    }
}
