// Ballots stored as CSV files.

use std::fs::File;

use log::debug;
use snafu::prelude::*;

use crate::rcv::config_reader::FileSource;
use crate::rcv::io_common::{assemble_choices, make_default_id, parse_rank};
use crate::rcv::*;

/// Ballots written as ranks: a header with the candidate names, then one line per voter with
/// the rank given to each candidate.
pub fn read_csv_ranks(path: &str, cfs: &FileSource) -> BRcvResult<SourceBallots> {
    let default_id = make_default_id(path);
    let id_idx_o = cfs.id_column_index_int()?;
    let choices_start_col = cfs.first_vote_column_index()?;
    let first_row = cfs.first_vote_row_index()?;
    if first_row == 0 {
        return Err(Box::new(RcvError::MissingHeader {
            path: path.to_string(),
        }));
    }

    let (mut records, header_lineno) = get_records(path, first_row - 1)?;
    let header = match records.next() {
        Some(r) => r.context(CsvLineParseSnafu {})?,
        None => {
            return Err(Box::new(RcvError::CsvEmpty {
                path: path.to_string(),
            }))
        }
    };
    let columns: Vec<(usize, String)> = header
        .iter()
        .enumerate()
        .skip(choices_start_col)
        .filter(|(_, name)| !name.is_empty())
        .map(|(idx, name)| (idx, name.to_string()))
        .collect();
    debug!("read_csv_ranks: {:?}: candidates {:?}", path, columns);

    let mut res: Vec<ParsedBallot> = Vec::new();
    for (idx, line_r) in records.enumerate() {
        let lineno = header_lineno + 1 + idx;
        let line = line_r.context(CsvLineParseSnafu {})?;
        if line.iter().all(|s| s.is_empty()) {
            continue;
        }
        let id = read_id(&line, id_idx_o, lineno, &default_id)?;
        let mut ranks: Vec<(String, u32)> = Vec::new();
        for (col, cname) in columns.iter() {
            if let Some(rank) = parse_rank(lineno, line.get(*col).unwrap_or(""))? {
                ranks.push((cname.clone(), rank));
            }
        }
        let choices = assemble_choices(lineno, &ranks, columns.len())?;
        res.push(ParsedBallot { id, choices });
    }

    Ok(SourceBallots {
        header: Some(columns.into_iter().map(|(_, name)| name).collect()),
        ballots: res,
    })
}

/// Ballots written as choices: one line per voter, with the names of the candidates from the
/// most to the least preferred.
pub fn read_csv_choices(path: &str, cfs: &FileSource) -> BRcvResult<SourceBallots> {
    let default_id = make_default_id(path);
    let id_idx_o = cfs.id_column_index_int()?;
    let choices_start_col = cfs.first_vote_column_index()?;
    let first_row = cfs.first_vote_row_index()?;

    let (records, first_lineno) = get_records(path, first_row)?;
    let mut res: Vec<ParsedBallot> = Vec::new();
    for (idx, line_r) in records.enumerate() {
        let lineno = first_lineno + idx;
        let line = line_r.context(CsvLineParseSnafu {})?;
        if line.iter().all(|s| s.is_empty()) {
            continue;
        }
        let id = read_id(&line, id_idx_o, lineno, &default_id)?;
        let choices: Vec<String> = line
            .iter()
            .skip(choices_start_col)
            .filter(|s| !s.is_empty())
            .map(|s| s.to_string())
            .collect();
        res.push(ParsedBallot { id, choices });
    }
    Ok(SourceBallots {
        header: None,
        ballots: res,
    })
}

fn read_id(
    line: &csv::StringRecord,
    id_idx_o: Option<usize>,
    lineno: usize,
    default_id: &impl Fn(usize) -> String,
) -> BRcvResult<String> {
    match id_idx_o {
        Some(id_idx) => {
            let id = line.get(id_idx).context(LineTooShortSnafu { lineno })?;
            Ok(id.to_string())
        }
        None => Ok(default_id(lineno)),
    }
}

// The records after the first `skip` lines, with the line number of the first record.
fn get_records(
    path: &str,
    skip: usize,
) -> BRcvResult<(csv::StringRecordsIntoIter<File>, usize)> {
    let rdr = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_path(path)
        .context(CsvOpenSnafu { path })?;
    let mut records = rdr.into_records();
    for _ in 0..skip {
        if records.next().is_none() {
            break;
        }
    }
    Ok((records, skip + 1))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_file(content: &str) -> tempfile::NamedTempFile {
        let mut f = tempfile::NamedTempFile::new().unwrap();
        f.write_all(content.as_bytes()).unwrap();
        f.flush().unwrap();
        f
    }

    fn path_of(f: &tempfile::NamedTempFile) -> String {
        f.path().display().to_string()
    }

    #[test]
    fn ranks_with_header() {
        let f = write_file("VoterID,Alice,Bob,Charlie\nv1,1,2,3\n\nv2,3,1,2\n");
        let p = path_of(&f);
        let res = read_csv_ranks(&p, &FileSource::from_input(&p, "csv", None)).unwrap();
        assert_eq!(
            res.header,
            Some(vec!["Alice".to_string(), "Bob".to_string(), "Charlie".to_string()])
        );
        assert_eq!(
            res.ballots,
            vec![
                ParsedBallot {
                    id: "v1".to_string(),
                    choices: vec!["Alice".to_string(), "Bob".to_string(), "Charlie".to_string()]
                },
                ParsedBallot {
                    id: "v2".to_string(),
                    choices: vec!["Bob".to_string(), "Charlie".to_string(), "Alice".to_string()]
                },
            ]
        );
    }

    #[test]
    fn blank_cell_gives_a_short_ballot() {
        let f = write_file("VoterID,Alice,Bob,Charlie\nv1,1,,2\n");
        let p = path_of(&f);
        let res = read_csv_ranks(&p, &FileSource::from_input(&p, "csv", None)).unwrap();
        assert_eq!(res.ballots[0].choices, vec!["Alice", "Charlie"]);
    }

    #[test]
    fn malformed_ranks_stop_the_read() {
        let f = write_file("VoterID,Alice,Bob\nv1,1,1\n");
        let p = path_of(&f);
        let err = read_csv_ranks(&p, &FileSource::from_input(&p, "csv", None)).unwrap_err();
        assert!(matches!(*err, RcvError::DuplicateRank { lineno: 2, rank: 1 }));

        let f = write_file("VoterID,Alice,Bob\nv1,1,x\n");
        let p = path_of(&f);
        let err = read_csv_ranks(&p, &FileSource::from_input(&p, "csv", None)).unwrap_err();
        assert!(matches!(*err, RcvError::RankNotNumber { lineno: 2, .. }));
    }

    #[test]
    fn empty_file() {
        let f = write_file("");
        let p = path_of(&f);
        let err = read_csv_ranks(&p, &FileSource::from_input(&p, "csv", None)).unwrap_err();
        assert!(matches!(*err, RcvError::CsvEmpty { .. }));
    }

    #[test]
    fn choices() {
        let f = write_file("id,first,second\nv1,Bob,Alice\nv2,Alice,\n");
        let p = path_of(&f);
        let res = read_csv_choices(&p, &FileSource::from_input(&p, "csv_choices", None)).unwrap();
        assert_eq!(res.header, None);
        assert_eq!(res.ballots.len(), 2);
        assert_eq!(res.ballots[0].choices, vec!["Bob", "Alice"]);
        assert_eq!(res.ballots[1].id, "v2");
        assert_eq!(res.ballots[1].choices, vec!["Alice"]);
    }

    #[test]
    fn missing_file() {
        let cfs = FileSource::from_input("/nonexistent/ballots.csv", "csv", None);
        let err = read_csv_ranks("/nonexistent/ballots.csv", &cfs).unwrap_err();
        assert!(matches!(*err, RcvError::CsvOpen { .. }));
    }
}
