// ********* Input data structures ***********

use std::error::Error;
use std::fmt::Display;

/// The largest roster an election accepts.
pub const MAX_CANDIDATES: usize = 1024;

/// A registered candidate.
///
/// The position of the candidate in the roster given to the election is its index
/// for the whole run.
#[derive(Eq, PartialEq, Debug, Clone, Hash)]
pub struct Candidate {
    pub name: String,
    /// Optional short label, as found in some configuration files.
    pub code: Option<String>,
}

impl Candidate {
    pub fn new(name: &str) -> Candidate {
        Candidate {
            name: name.to_string(),
            code: None,
        }
    }
}

/// The reason a ballot was turned away before reaching the tally.
#[derive(Eq, PartialEq, Debug, Clone, Copy, Hash)]
pub enum BallotDefect {
    /// The ballot does not rank every candidate exactly once.
    WrongLength { expected: usize, found: usize },
    /// A rank holds an index outside of the roster.
    OutOfRange(usize),
    /// The same candidate appears at two ranks.
    Repeated(usize),
}

// ******** Output data structures *********

/// A strict pairwise victory, with the counts read from the preference
/// matrix when the pairs were extracted.
#[derive(Eq, PartialEq, Debug, Clone, Copy, Hash)]
pub struct CandidatePair {
    pub winner: usize,
    pub loser: usize,
    /// Voters preferring the winner minus voters preferring the loser. Always > 0.
    pub margin: u64,
    /// Voters preferring the winner over the loser.
    pub votes: u64,
}

/// What happened to a pair during the lock phase.
#[derive(Eq, PartialEq, Debug, Clone, Copy, Hash)]
pub enum LockOutcome {
    Locked,
    /// The edge would have closed a cycle.
    Skipped,
}

#[derive(Eq, PartialEq, Debug, Clone)]
pub struct PairStats {
    pub winner: String,
    pub loser: String,
    pub margin: u64,
    pub votes: u64,
    pub outcome: LockOutcome,
}

#[derive(Eq, PartialEq, Debug, Clone)]
pub struct VotingResult {
    pub winner: String,
    pub winner_id: usize,
    /// Every candidate without an incoming locked edge, in roster order.
    /// The winner is the first one.
    pub sources: Vec<String>,
    pub candidates: Vec<String>,
    /// Number of ballots in the tally.
    pub ballots: u64,
    /// `preferences[i][j]`: voters ranking candidate i above candidate j.
    pub preferences: Vec<Vec<u64>>,
    /// The pairs in processing order.
    pub pairs: Vec<PairStats>,
    pub locked: Vec<(String, String)>,
}

/// Errors that prevent an election from being built or tabulated.
#[derive(Eq, PartialEq, Debug, Clone)]
pub enum VotingErrors {
    InvalidBallot(BallotDefect),
    /// The roster is empty or larger than `MAX_CANDIDATES`.
    InvalidCandidateCount(usize),
    DuplicateCandidate(String),
    UnknownCandidate(String),
    /// A tally, graph or pair list sized for another roster.
    MismatchedTally {
        expected: usize,
        found: usize,
    },
    NoWinner,
}

impl Error for VotingErrors {}

impl Display for VotingErrors {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            VotingErrors::InvalidBallot(BallotDefect::WrongLength { expected, found }) => write!(
                f,
                "invalid ballot: {} ranks filled, {} expected",
                found, expected
            ),
            VotingErrors::InvalidBallot(BallotDefect::OutOfRange(cid)) => {
                write!(f, "invalid ballot: unknown candidate index {}", cid)
            }
            VotingErrors::InvalidBallot(BallotDefect::Repeated(cid)) => {
                write!(f, "invalid ballot: candidate index {} ranked twice", cid)
            }
            VotingErrors::InvalidCandidateCount(n) => write!(
                f,
                "invalid number of candidates: {} (expected 1 to {})",
                n, MAX_CANDIDATES
            ),
            VotingErrors::DuplicateCandidate(name) => {
                write!(f, "candidate {:?} is registered twice", name)
            }
            VotingErrors::UnknownCandidate(name) => {
                write!(f, "candidate {:?} is not registered", name)
            }
            VotingErrors::MismatchedTally { expected, found } => write!(
                f,
                "size mismatch: {} found where the election expects {}",
                found, expected
            ),
            VotingErrors::NoWinner => write!(f, "no winner"),
        }
    }
}
