// Ballots stored in Excel workbooks, with the same layout as the CSV ranks.

use calamine::{open_workbook, DataType, Reader, Xlsx};
use log::debug;
use snafu::prelude::*;

use crate::rcv::config_reader::FileSource;
use crate::rcv::io_common::{assemble_choices, make_default_id, parse_rank};
use crate::rcv::*;

pub fn read_xlsx_ranks(path: &str, cfs: &FileSource) -> BRcvResult<SourceBallots> {
    let default_id = make_default_id(path);
    let id_idx_o = cfs.id_column_index_int()?;
    let choices_start_col = cfs.first_vote_column_index()?;
    let first_row = cfs.first_vote_row_index()?;
    if first_row == 0 {
        return Err(Box::new(RcvError::MissingHeader {
            path: path.to_string(),
        }));
    }

    let wrange = get_range(path, cfs)?;
    let mut rows = wrange.rows().skip(first_row - 1);
    let header = rows.next().context(EmptyExcelSnafu { path })?;
    let columns: Vec<(usize, String)> = header
        .iter()
        .enumerate()
        .skip(choices_start_col)
        .filter_map(|(idx, cell)| match cell_text(cell) {
            Some(name) if !name.is_empty() => Some((idx, name)),
            _ => None,
        })
        .collect();
    debug!("read_xlsx_ranks: {:?}: candidates {:?}", path, columns);

    let mut res: Vec<ParsedBallot> = Vec::new();
    for (idx, row) in rows.enumerate() {
        let lineno = first_row + 1 + idx;
        if row.iter().all(|cell| matches!(cell, DataType::Empty)) {
            continue;
        }
        let id = match id_idx_o {
            Some(id_idx) => {
                let cell = row.get(id_idx).context(LineTooShortSnafu { lineno })?;
                cell_text(cell).unwrap_or_else(|| default_id(lineno))
            }
            None => default_id(lineno),
        };
        let mut ranks: Vec<(String, u32)> = Vec::new();
        for (col, cname) in columns.iter() {
            if let Some(rank) = cell_rank(lineno, row.get(*col).unwrap_or(&DataType::Empty))? {
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

fn cell_text(cell: &DataType) -> Option<String> {
    match cell {
        DataType::String(s) => Some(s.trim().to_string()),
        DataType::Int(i) => Some(i.to_string()),
        DataType::Float(f) if f.fract() == 0.0 => Some(format!("{}", *f as i64)),
        DataType::Float(f) => Some(f.to_string()),
        _ => None,
    }
}

fn cell_rank(lineno: usize, cell: &DataType) -> BRcvResult<Option<u32>> {
    match cell {
        DataType::Empty => Ok(None),
        DataType::String(s) => parse_rank(lineno, s),
        DataType::Int(_) | DataType::Float(_) => match cell_text(cell) {
            Some(s) => parse_rank(lineno, &s),
            None => Ok(None),
        },
        x => Err(Box::new(RcvError::ExcelWrongCellType {
            lineno,
            content: format!("{:?}", x),
        })),
    }
}

fn get_range(path: &str, cfs: &FileSource) -> BRcvResult<calamine::Range<DataType>> {
    let worksheet_name_o = cfs.excel_worksheet_name.clone();
    debug!(
        "get_range: path: {:?} worksheet: {:?}",
        &path, &worksheet_name_o
    );
    let mut workbook: Xlsx<_> = open_workbook(path).context(OpeningExcelSnafu { path })?;

    if let Some(worksheet_name) = worksheet_name_o {
        let wrange = workbook
            .worksheet_range(&worksheet_name)
            .context(MissingWorksheetSnafu {
                name: worksheet_name.clone(),
                path,
            })?
            .context(OpeningExcelSnafu { path })?;
        Ok(wrange)
    } else {
        let all_worksheets = workbook.worksheets();
        match all_worksheets.as_slice() {
            [] => Err(Box::new(RcvError::EmptyExcel {
                path: path.to_string(),
            })),
            [(worksheet_name, wrange)] => {
                debug!("get_range: path: {:?} worksheet: {:?}", &path, &worksheet_name);
                Ok(wrange.clone())
            }
            _ => Err(Box::new(RcvError::AmbiguousWorksheet {
                path: path.to_string(),
            })),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn numeric_cells_are_ranks() {
        assert_eq!(cell_rank(3, &DataType::Float(2.0)).unwrap(), Some(2));
        assert_eq!(cell_rank(3, &DataType::Int(1)).unwrap(), Some(1));
        assert_eq!(cell_rank(3, &DataType::String(" 4".to_string())).unwrap(), Some(4));
        assert_eq!(cell_rank(3, &DataType::Empty).unwrap(), None);
    }

    #[test]
    fn other_cells_are_errors() {
        assert!(matches!(
            *cell_rank(3, &DataType::Float(1.5)).unwrap_err(),
            RcvError::RankNotNumber { lineno: 3, .. }
        ));
        assert!(matches!(
            *cell_rank(3, &DataType::Bool(true)).unwrap_err(),
            RcvError::ExcelWrongCellType { lineno: 3, .. }
        ));
    }

    #[test]
    fn ids() {
        assert_eq!(cell_text(&DataType::Float(12.0)), Some("12".to_string()));
        assert_eq!(cell_text(&DataType::String(" v1 ".to_string())), Some("v1".to_string()));
        assert_eq!(cell_text(&DataType::Empty), None);
    }

    #[test]
    fn missing_workbook() {
        let cfs = FileSource::from_input("/nonexistent/ballots.xlsx", "xlsx", None);
        let err = read_xlsx_ranks("/nonexistent/ballots.xlsx", &cfs).unwrap_err();
        assert!(matches!(*err, RcvError::OpeningExcel { .. }));
    }
}
