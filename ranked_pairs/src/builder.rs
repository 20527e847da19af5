pub use crate::config::*;
use crate::Election;

/// A builder for elections where candidates and ballots are given by name.
///
/// ```
/// pub use ranked_pairs::builder::Builder;
/// # use ranked_pairs::VotingErrors;
///
/// let mut builder = Builder::new()
///     .candidates(&["Anna".to_string(), "Bob".to_string()])?;
///
/// builder.add_vote_simple(&["Bob".to_string(), "Anna".to_string()])?;
///
/// let result = builder.tabulate()?;
/// assert_eq!(result.winner, "Bob");
///
/// # Ok::<(), VotingErrors>(())
/// ```
#[derive(Debug, Clone, Default)]
pub struct Builder {
    pub(crate) _election: Option<Election>,
}

impl Builder {
    pub fn new() -> Builder {
        Builder { _election: None }
    }

    /// Registers the candidates. Their order defines their indices.
    ///
    /// Any vote added before is discarded.
    pub fn candidates(self, cands: &[String]) -> Result<Builder, VotingErrors> {
        Ok(Builder {
            _election: Some(Election::from_names(cands)?),
        })
    }

    /// Adds a vote: every candidate name, from the most to the least preferred.
    pub fn add_vote_simple(&mut self, candidates: &[String]) -> Result<(), VotingErrors> {
        self.election_mut()?.record_names(candidates)
    }

    /// Adds a vote expressed with candidate indices.
    pub fn add_vote(&mut self, ranks: &[usize]) -> Result<(), VotingErrors> {
        self.election_mut()?.record(ranks)
    }

    pub fn tabulate(&self) -> Result<VotingResult, VotingErrors> {
        self._election
            .as_ref()
            .ok_or(VotingErrors::InvalidCandidateCount(0))?
            .tabulate()
    }

    fn election_mut(&mut self) -> Result<&mut Election, VotingErrors> {
        self._election
            .as_mut()
            .ok_or(VotingErrors::InvalidCandidateCount(0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn votes_need_candidates() {
        let mut b = Builder::new();
        assert_eq!(
            b.add_vote(&[0]),
            Err(VotingErrors::InvalidCandidateCount(0))
        );
        assert_eq!(b.tabulate(), Err(VotingErrors::InvalidCandidateCount(0)));
    }

    #[test]
    fn names_and_indices_mix() {
        let mut b = Builder::new()
            .candidates(&["A".to_string(), "B".to_string(), "C".to_string()])
            .unwrap();
        b.add_vote(&[2, 0, 1]).unwrap();
        b.add_vote_simple(&["C".to_string(), "B".to_string(), "A".to_string()])
            .unwrap();
        let res = b.tabulate().unwrap();
        assert_eq!(res.winner, "C");
        assert_eq!(res.ballots, 2);
    }
}
