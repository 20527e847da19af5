use std::path::Path;

use crate::rcv::*;

pub fn simplify_file_name(path: &str) -> String {
    Path::new(path)
        .file_name()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_else(|| path.to_string())
}

pub fn make_default_id(path: &str) -> impl Fn(usize) -> String {
    let simplified_file_name = simplify_file_name(path);
    move |lineno| format!("{}-{:08}", simplified_file_name, lineno)
}

/// Reads the rank written in a cell. An empty cell means the candidate was not ranked.
pub fn parse_rank(lineno: usize, cell: &str) -> BRcvResult<Option<u32>> {
    let s = cell.trim();
    if s.is_empty() {
        return Ok(None);
    }
    match s.parse::<u32>() {
        Ok(rank) => Ok(Some(rank)),
        Err(_) => Err(Box::new(RcvError::RankNotNumber {
            lineno,
            content: s.to_string(),
        })),
    }
}

/// Orders the candidates of one line by the rank they were given.
///
/// Ranks start at 1 and must be distinct. Unranked candidates are left out, so the
/// ballot comes out shorter than the roster.
pub fn assemble_choices(
    lineno: usize,
    ranks: &[(String, u32)],
    num_candidates: usize,
) -> BRcvResult<Vec<String>> {
    let mut by_position: Vec<Option<String>> = vec![None; num_candidates];
    for (cname, rank) in ranks.iter() {
        let pos = *rank as usize;
        if pos < 1 || pos > num_candidates {
            return Err(Box::new(RcvError::RankOutOfRange {
                lineno,
                rank: *rank,
                max: num_candidates,
            }));
        }
        let slot = &mut by_position[pos - 1];
        if slot.is_some() {
            return Err(Box::new(RcvError::DuplicateRank {
                lineno,
                rank: *rank,
            }));
        }
        *slot = Some(cname.clone());
    }
    Ok(by_position.into_iter().flatten().collect())
}
