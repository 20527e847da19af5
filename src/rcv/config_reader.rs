use std::fs;

use log::debug;
use snafu::prelude::*;

use crate::rcv::*;

use serde::{Deserialize, Serialize};
use serde_json::Value as JSValue;

#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct OutputSettings {
    #[serde(rename = "contestName")]
    pub contest_name: String,
    #[serde(rename = "outputDirectory")]
    pub output_directory: Option<String>,
    #[serde(rename = "contestDate")]
    pub contest_date: Option<String>,
    #[serde(rename = "contestJurisdiction")]
    pub contest_jurisdiction: Option<String>,
    #[serde(rename = "contestOffice")]
    pub contest_office: Option<String>,
}

/// The description of the contest, as written in the summary.
#[derive(Eq, PartialEq, Debug, Clone, Default, Serialize, Deserialize)]
pub struct OutputConfig {
    pub contest: String,
    pub date: Option<String>,
    pub jurisdiction: Option<String>,
    pub office: Option<String>,
}

impl OutputConfig {
    pub fn from_settings(settings: Option<&OutputSettings>) -> OutputConfig {
        match settings {
            Some(s) => OutputConfig {
                contest: s.contest_name.clone(),
                date: s.contest_date.clone(),
                jurisdiction: s.contest_jurisdiction.clone(),
                office: s.contest_office.clone(),
            },
            None => OutputConfig::default(),
        }
    }
}

#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct FileSource {
    pub provider: String,
    #[serde(rename = "filePath")]
    pub file_path: String,
    #[serde(rename = "idColumnIndex")]
    pub id_column_index: Option<JSValue>,
    #[serde(rename = "firstVoteColumnIndex")]
    _first_vote_column_index: Option<JSValue>,
    #[serde(rename = "firstVoteRowIndex")]
    _first_vote_row_index: Option<JSValue>,
    #[serde(rename = "excelWorksheetName")]
    pub excel_worksheet_name: Option<String>,
}

// Defaults for the layout written by the generator: VoterID, then one column per candidate.
const DEFAULT_ID_COLUMN: usize = 1;
const DEFAULT_FIRST_VOTE_COLUMN: usize = 2;
const DEFAULT_FIRST_VOTE_ROW: usize = 2;

impl FileSource {
    /// A source given on the command line, with the default layout.
    pub fn from_input(
        path: &str,
        provider: &str,
        excel_worksheet_name: Option<String>,
    ) -> FileSource {
        FileSource {
            provider: provider.to_string(),
            file_path: path.to_string(),
            id_column_index: Some(JSValue::from(DEFAULT_ID_COLUMN)),
            _first_vote_column_index: None,
            _first_vote_row_index: None,
            excel_worksheet_name,
        }
    }

    /// 0-based index of the first column holding votes.
    pub fn first_vote_column_index(&self) -> RcvResult<usize> {
        let x = match &self._first_vote_column_index {
            Some(js) => read_js_int(js, "firstVoteColumnIndex")?,
            None => DEFAULT_FIRST_VOTE_COLUMN,
        };
        Ok(x - 1)
    }

    /// 0-based index of the first row holding a ballot. The row before holds the header.
    pub fn first_vote_row_index(&self) -> RcvResult<usize> {
        let x = match &self._first_vote_row_index {
            Some(js) => read_js_int(js, "firstVoteRowIndex")?,
            None => DEFAULT_FIRST_VOTE_ROW,
        };
        Ok(x - 1)
    }

    /// 0-based index of the column holding the ballot ids, if any.
    pub fn id_column_index_int(&self) -> RcvResult<Option<usize>> {
        match &self.id_column_index {
            Some(js) => read_js_int(js, "idColumnIndex").map(|x| Some(x - 1)),
            None => Ok(None),
        }
    }
}

#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct RcvCandidate {
    pub name: String,
    pub code: Option<String>,
}

#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct RcvConfig {
    #[serde(rename = "outputSettings")]
    pub output_settings: OutputSettings,
    #[serde(rename = "cvrFileSources", default)]
    pub cvr_file_sources: Vec<FileSource>,
    pub candidates: Option<Vec<RcvCandidate>>,
}

pub fn read_config(path: &str) -> BRcvResult<RcvConfig> {
    let contents = fs::read_to_string(path).context(OpeningJsonSnafu { path })?;
    let config: RcvConfig =
        serde_json::from_str(contents.as_str()).context(ParsingJsonSnafu {})?;
    debug!("read_config: {:?}", config);
    Ok(config)
}

pub fn read_summary(path: &str) -> BRcvResult<JSValue> {
    let contents = fs::read_to_string(path).context(OpeningJsonSnafu { path })?;
    let js: JSValue = serde_json::from_str(contents.as_str()).context(ParsingJsonSnafu {})?;
    Ok(js)
}

// Reads a 1-based index: a number, a number in a string, or Excel-style column letters.
fn read_js_int(x: &JSValue, field: &str) -> RcvResult<usize> {
    let res: Option<usize> = match x {
        JSValue::Number(n) => n.as_u64().map(|x| x as usize),
        JSValue::String(s) if !s.is_empty() && s.chars().all(|c| c.is_ascii_alphabetic()) => {
            s.to_ascii_uppercase().chars().try_fold(0usize, |acc, c| {
                acc.checked_mul(26)?
                    .checked_add(c as usize - 'A' as usize + 1)
            })
        }
        JSValue::String(s) => s.trim().parse::<usize>().ok(),
        _ => None,
    };
    res.filter(|x| *x >= 1)
        .context(ParsingJsonNumberSnafu { field })
}
