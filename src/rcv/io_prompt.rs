// Interactive entry of an election: the roster, then each voter's ranking.

use std::collections::VecDeque;
use std::io::{BufRead, Write};

use log::debug;
use snafu::prelude::*;

use ranked_pairs::{VotingErrors, MAX_CANDIDATES};

use crate::rcv::*;

// Answers are read token by token, so several answers may be typed on one line.
struct Tokens<'a, R: BufRead> {
    input: &'a mut R,
    pending: VecDeque<String>,
}

impl<'a, R: BufRead> Tokens<'a, R> {
    fn next_token(&mut self) -> BRcvResult<Option<String>> {
        loop {
            if let Some(t) = self.pending.pop_front() {
                return Ok(Some(t));
            }
            let mut line = String::new();
            let n = self.input.read_line(&mut line).context(PromptSnafu {})?;
            if n == 0 {
                return Ok(None);
            }
            self.pending
                .extend(line.split_whitespace().map(|s| s.to_string()));
        }
    }
}

fn ask<R: BufRead, W: Write>(
    tokens: &mut Tokens<R>,
    output: &mut W,
    question: &str,
) -> BRcvResult<String> {
    write!(output, "{}", question).context(PromptSnafu {})?;
    output.flush().context(PromptSnafu {})?;
    let answer = tokens.next_token()?.context(PromptClosedSnafu {})?;
    Ok(answer)
}

fn ask_number<R: BufRead, W: Write>(
    tokens: &mut Tokens<R>,
    output: &mut W,
    question: &str,
) -> BRcvResult<usize> {
    let answer = ask(tokens, output, question)?;
    let n = answer
        .parse::<usize>()
        .ok()
        .context(PromptNumberSnafu { content: answer })?;
    Ok(n)
}

/// Reads an election from the terminal.
///
/// The candidate names are asked for unless given. Every voter then enters one
/// name per rank, from the most preferred.
pub fn prompt_election<R: BufRead, W: Write>(
    input: &mut R,
    output: &mut W,
    candidates: Option<&[String]>,
) -> BRcvResult<SourceBallots> {
    let mut tokens = Tokens {
        input,
        pending: VecDeque::new(),
    };
    let names: Vec<String> = match candidates {
        Some(names) => names.to_vec(),
        None => {
            let count = ask_number(&mut tokens, output, "Number of candidates: ")?;
            if count == 0 || count > MAX_CANDIDATES {
                return Err(Box::new(RcvError::Election {
                    source: VotingErrors::InvalidCandidateCount(count),
                }));
            }
            let mut names = Vec::with_capacity(count);
            for idx in 0..count {
                names.push(ask(
                    &mut tokens,
                    output,
                    &format!("Candidate {}: ", idx + 1),
                )?);
            }
            names
        }
    };

    let voter_count = ask_number(&mut tokens, output, "Number of voters: ")?;
    let mut ballots: Vec<ParsedBallot> = Vec::new();
    for voter in 0..voter_count {
        let mut choices = Vec::with_capacity(names.len());
        for rank in 0..names.len() {
            choices.push(ask(&mut tokens, output, &format!("Rank {}: ", rank + 1))?);
        }
        writeln!(output).context(PromptSnafu {})?;
        debug!("prompt_election: voter {}: {:?}", voter + 1, choices);
        ballots.push(ParsedBallot {
            id: format!("voter-{:08}", voter + 1),
            choices,
        });
    }

    Ok(SourceBallots {
        header: Some(names),
        ballots,
    })
}
