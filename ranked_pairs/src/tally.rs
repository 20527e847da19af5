use crate::config::*;

/// Pairwise preference counts for one election.
///
/// `get(w, l)` is the number of recorded ballots ranking candidate `w` above candidate `l`.
/// Counts only grow: ballots are recorded one at a time and matrices can be added together.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct PreferenceMatrix {
    size: usize,
    // Row-major, size * size entries. The diagonal stays at zero.
    counts: Vec<u64>,
    ballots: u64,
}

impl PreferenceMatrix {
    pub fn new(size: usize) -> PreferenceMatrix {
        PreferenceMatrix {
            size,
            counts: vec![0; size * size],
            ballots: 0,
        }
    }

    /// Number of candidates.
    pub fn size(&self) -> usize {
        self.size
    }

    /// Number of ballots recorded so far.
    pub fn ballots(&self) -> u64 {
        self.ballots
    }

    /// Panics if either index is outside of the roster.
    pub fn get(&self, winner: usize, loser: usize) -> u64 {
        assert!(
            winner < self.size && loser < self.size,
            "candidate index out of range: ({}, {}) for {} candidates",
            winner,
            loser,
            self.size
        );
        self.counts[winner * self.size + loser]
    }

    pub fn rows(&self) -> Vec<Vec<u64>> {
        if self.size == 0 {
            return Vec::new();
        }
        self.counts.chunks(self.size).map(|r| r.to_vec()).collect()
    }

    /// Adds the pairwise preferences of one complete ranking.
    ///
    /// `ballot[p]` is the candidate at rank position `p`, the first being the
    /// most preferred. The ballot must be a permutation of `0..size`; otherwise it is
    /// rejected and the matrix is left unchanged.
    pub fn record(&mut self, ballot: &[usize]) -> Result<(), VotingErrors> {
        check_ballot(ballot, self.size)?;
        for (pos, &winner) in ballot.iter().enumerate() {
            for &loser in &ballot[pos + 1..] {
                self.counts[winner * self.size + loser] += 1;
            }
        }
        self.ballots += 1;
        Ok(())
    }

    /// Adds the counts of a matrix tallied separately (for example on another batch of ballots).
    pub fn merge(&mut self, other: &PreferenceMatrix) -> Result<(), VotingErrors> {
        if other.size != self.size {
            return Err(VotingErrors::MismatchedTally {
                expected: self.size,
                found: other.size,
            });
        }
        for (c, o) in self.counts.iter_mut().zip(other.counts.iter()) {
            *c += *o;
        }
        self.ballots += other.ballots;
        Ok(())
    }
}

/// Checks that a ballot ranks each of the `size` candidates exactly once.
pub fn check_ballot(ballot: &[usize], size: usize) -> Result<(), VotingErrors> {
    if ballot.len() != size {
        return Err(VotingErrors::InvalidBallot(BallotDefect::WrongLength {
            expected: size,
            found: ballot.len(),
        }));
    }
    let mut seen = vec![false; size];
    for &cid in ballot {
        if cid >= size {
            return Err(VotingErrors::InvalidBallot(BallotDefect::OutOfRange(cid)));
        }
        if seen[cid] {
            return Err(VotingErrors::InvalidBallot(BallotDefect::Repeated(cid)));
        }
        seen[cid] = true;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn records_every_implied_preference() {
        let mut m = PreferenceMatrix::new(3);
        // Alice = 0, Bob = 1, Charlie = 2
        m.record(&[0, 2, 1]).unwrap();
        m.record(&[2, 0, 1]).unwrap();
        assert_eq!(m.ballots(), 2);
        assert_eq!(m.get(0, 2), 1);
        assert_eq!(m.get(2, 0), 1);
        assert_eq!(m.get(0, 1), 2);
        assert_eq!(m.get(2, 1), 2);
        assert_eq!(m.get(1, 0), 0);
        assert_eq!(m.get(1, 2), 0);
        for i in 0..3 {
            assert_eq!(m.get(i, i), 0);
        }
    }

    #[test]
    fn opposite_counts_sum_to_ballots() {
        let mut m = PreferenceMatrix::new(4);
        for b in [[0, 1, 2, 3], [3, 2, 1, 0], [1, 3, 0, 2]] {
            m.record(&b).unwrap();
        }
        for i in 0..4 {
            for j in 0..4 {
                if i != j {
                    assert_eq!(m.get(i, j) + m.get(j, i), 3);
                }
            }
        }
    }

    #[test]
    fn repeated_candidate_is_rejected_without_mutation() {
        let mut m = PreferenceMatrix::new(3);
        m.record(&[1, 0, 2]).unwrap();
        let before = m.clone();
        assert_eq!(
            m.record(&[0, 0, 2]),
            Err(VotingErrors::InvalidBallot(BallotDefect::Repeated(0)))
        );
        assert_eq!(m, before);
    }

    #[test]
    fn wrong_length_and_out_of_range_are_rejected() {
        let mut m = PreferenceMatrix::new(3);
        assert_eq!(
            m.record(&[0, 1]),
            Err(VotingErrors::InvalidBallot(BallotDefect::WrongLength {
                expected: 3,
                found: 2
            }))
        );
        assert_eq!(
            m.record(&[0, 1, 3]),
            Err(VotingErrors::InvalidBallot(BallotDefect::OutOfRange(3)))
        );
        assert_eq!(m, PreferenceMatrix::new(3));
    }

    #[test]
    fn merged_batches_equal_a_single_pass() {
        let ballots = [[0, 1, 2], [2, 1, 0], [1, 2, 0], [0, 2, 1]];
        let mut whole = PreferenceMatrix::new(3);
        for b in ballots.iter() {
            whole.record(b).unwrap();
        }
        let mut first = PreferenceMatrix::new(3);
        let mut second = PreferenceMatrix::new(3);
        for b in ballots[..1].iter() {
            first.record(b).unwrap();
        }
        for b in ballots[1..].iter() {
            second.record(b).unwrap();
        }
        first.merge(&second).unwrap();
        assert_eq!(first, whole);
    }

    #[test]
    fn merge_rejects_other_sizes() {
        let mut m = PreferenceMatrix::new(3);
        assert_eq!(
            m.merge(&PreferenceMatrix::new(2)),
            Err(VotingErrors::MismatchedTally {
                expected: 3,
                found: 2
            })
        );
    }

    #[test]
    fn rows_follow_the_roster() {
        let mut m = PreferenceMatrix::new(2);
        m.record(&[1, 0]).unwrap();
        assert_eq!(m.rows(), vec![vec![0, 0], vec![1, 0]]);
        assert!(PreferenceMatrix::new(0).rows().is_empty());
    }
}
