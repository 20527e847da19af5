use log::{debug, info, warn};

use ranked_pairs::*;
use snafu::{prelude::*, Snafu};

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

use serde_json::json;
use serde_json::Map as JSMap;
use serde_json::Value as JSValue;
use text_diff::print_diff;

use crate::args::Args;
use crate::rcv::config_reader::*;

pub mod config_reader;
pub mod generate;
mod io_common;
mod io_csv;
mod io_prompt;
mod io_xlsx;

#[derive(Debug, Snafu)]
pub enum RcvError {
    #[snafu(display("Error opening file {path}"))]
    OpeningExcel {
        source: calamine::XlsxError,
        path: String,
    },
    #[snafu(display("No worksheet found in {path}"))]
    EmptyExcel { path: String },
    #[snafu(display("Worksheet {name} not found in {path}"))]
    MissingWorksheet { name: String, path: String },
    #[snafu(display("Several worksheets in {path}, the worksheet name must be provided"))]
    AmbiguousWorksheet { path: String },
    #[snafu(display("Line {lineno}: unexpected cell {content}"))]
    ExcelWrongCellType { lineno: usize, content: String },
    #[snafu(display("Error opening file {path}"))]
    OpeningJson {
        source: std::io::Error,
        path: String,
    },
    #[snafu(display("Error parsing JSON"))]
    ParsingJson { source: serde_json::Error },
    #[snafu(display("Error writing JSON"))]
    SerializingJson { source: serde_json::Error },
    #[snafu(display("Field {field} is not a valid index"))]
    ParsingJsonNumber { field: String },
    #[snafu(display("Error opening file {path}"))]
    CsvOpen { source: csv::Error, path: String },
    #[snafu(display("Error reading a CSV line"))]
    CsvLineParse { source: csv::Error },
    #[snafu(display("Error writing a CSV line"))]
    CsvWrite { source: csv::Error },
    #[snafu(display("File {path} is empty"))]
    CsvEmpty { path: String },
    #[snafu(display("File {path} has no header row with the candidate names"))]
    MissingHeader { path: String },
    #[snafu(display("Line {lineno} is too short"))]
    LineTooShort { lineno: usize },
    #[snafu(display("Line {lineno}: {content:?} is not a rank"))]
    RankNotNumber { lineno: usize, content: String },
    #[snafu(display("Line {lineno}: rank {rank} is not between 1 and {max}"))]
    RankOutOfRange { lineno: usize, rank: u32, max: usize },
    #[snafu(display("Line {lineno}: rank {rank} is given twice"))]
    DuplicateRank { lineno: usize, rank: u32 },
    #[snafu(display("Error reading the answer"))]
    Prompt { source: std::io::Error },
    #[snafu(display("The input ended before the election was complete"))]
    PromptClosed {},
    #[snafu(display("Expected a number, found {content:?}"))]
    PromptNumber { content: String },
    #[snafu(display("Error writing {path}"))]
    Writing {
        source: std::io::Error,
        path: String,
    },
    #[snafu(display("No parent directory for {path}"))]
    MissingParentDir { path: String },
    #[snafu(display("No ballots to read: provide an input or a configuration with sources"))]
    MissingInput {},
    #[snafu(display("The candidates could not be determined"))]
    MissingCandidates {},
    #[snafu(display("Unknown provider {provider}"))]
    UnknownProvider { provider: String },
    #[snafu(display("Election error: {source}"))]
    Election { source: VotingErrors },
    #[snafu(display("Ballot {ballot_id} rejected: {source}"))]
    RejectedBallot {
        ballot_id: String,
        source: VotingErrors,
    },
    #[snafu(display("Difference detected between calculated summary and reference summary"))]
    ReferenceMismatch {},
}

pub type RcvResult<T> = Result<T, RcvError>;
pub type BRcvResult<T> = Result<T, Box<RcvError>>;

/// A ballot, as read from an input.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct ParsedBallot {
    pub id: String,
    /// Candidate names, from the most to the least preferred.
    pub choices: Vec<String>,
}

/// The ballots of one source, with the candidate names found in its header.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct SourceBallots {
    pub header: Option<Vec<String>>,
    pub ballots: Vec<ParsedBallot>,
}

fn timed<T>(enabled: bool, label: &str, f: impl FnOnce() -> T) -> T {
    let start = Instant::now();
    let res = f();
    if enabled {
        info!("{} took {} µs", label, start.elapsed().as_micros());
    }
    res
}

fn read_ranking_data(root_path: &Path, cfs: &FileSource) -> BRcvResult<SourceBallots> {
    let p: PathBuf = root_path.join(&cfs.file_path);
    let path = p.display().to_string();
    info!("Reading {} ballots from {:?}", cfs.provider, path);
    match cfs.provider.as_str() {
        "csv" => io_csv::read_csv_ranks(&path, cfs),
        "csv_choices" => io_csv::read_csv_choices(&path, cfs),
        "xlsx" => io_xlsx::read_xlsx_ranks(&path, cfs),
        x => Err(Box::new(RcvError::UnknownProvider {
            provider: x.to_string(),
        })),
    }
}

// The roster given on the command line, or else in the configuration.
fn declared_candidates(args: &Args, config: &Option<RcvConfig>) -> Option<Vec<Candidate>> {
    if let Some(names) = &args.candidates {
        return Some(names.iter().map(|n| Candidate::new(n)).collect());
    }
    let cands = config.as_ref()?.candidates.as_ref()?;
    Some(
        cands
            .iter()
            .map(|c| Candidate {
                name: c.name.clone(),
                code: match c.code.clone() {
                    Some(x) if x.is_empty() => None,
                    x => x,
                },
            })
            .collect(),
    )
}

// Command line first, then the configuration, then the first header found in the sources.
fn choose_candidates(
    args: &Args,
    config: &Option<RcvConfig>,
    sources: &[SourceBallots],
) -> BRcvResult<Vec<Candidate>> {
    if let Some(cands) = declared_candidates(args, config) {
        return Ok(cands);
    }
    let header = sources
        .iter()
        .find_map(|s| s.header.clone())
        .context(MissingCandidatesSnafu {})?;
    Ok(header.iter().map(|n| Candidate::new(n)).collect())
}

/// Records the ballots, returning how many were rejected.
fn record_ballots(
    election: &mut Election,
    ballots: &[ParsedBallot],
    strict: bool,
) -> BRcvResult<u64> {
    let mut rejected: u64 = 0;
    for pb in ballots.iter() {
        if let Err(source) = election.record_names(&pb.choices) {
            if strict {
                return Err(Box::new(RcvError::RejectedBallot {
                    ballot_id: pb.id.clone(),
                    source,
                }));
            }
            warn!("record_ballots: ballot {} skipped: {}", pb.id, source);
            rejected += 1;
        }
    }
    Ok(rejected)
}

fn result_stats_to_json(rv: &VotingResult, roster: &[Candidate], rejected: u64) -> JSValue {
    let mut codes: JSMap<String, JSValue> = JSMap::new();
    for c in roster.iter() {
        if let Some(code) = &c.code {
            codes.insert(c.name.clone(), json!(code));
        }
    }

    let mut preferences: JSMap<String, JSValue> = JSMap::new();
    for (w, row) in rv.candidates.iter().zip(rv.preferences.iter()) {
        let mut counts: JSMap<String, JSValue> = JSMap::new();
        for (l, count) in rv.candidates.iter().zip(row.iter()) {
            if w != l {
                counts.insert(l.clone(), json!(count));
            }
        }
        preferences.insert(w.clone(), JSValue::Object(counts));
    }

    let pairs: Vec<JSValue> = rv
        .pairs
        .iter()
        .map(|p| {
            json!({
                "winner": p.winner,
                "loser": p.loser,
                "margin": p.margin,
                "votes": p.votes,
                "locked": p.outcome == LockOutcome::Locked,
            })
        })
        .collect();
    let locked: Vec<JSValue> = rv.locked.iter().map(|(w, l)| json!([w, l])).collect();

    json!({
        "candidates": rv.candidates,
        "codes": codes,
        "ballots": rv.ballots,
        "rejected": rejected,
        "preferences": preferences,
        "pairs": pairs,
        "locked": locked,
        "sources": rv.sources,
        "winner": rv.winner,
    })
}

fn build_summary_js(
    config: &Option<RcvConfig>,
    rv: &VotingResult,
    roster: &[Candidate],
    rejected: u64,
) -> JSValue {
    let c = OutputConfig::from_settings(config.as_ref().map(|c| &c.output_settings));
    json!({
        "config": c,
        "results": result_stats_to_json(rv, roster, rejected) })
}

// An explicit --out wins over the output directory of the configuration.
fn summary_destination(args: &Args, config: &Option<RcvConfig>, root_p: &Path) -> Option<String> {
    if args.out.is_some() {
        return args.out.clone();
    }
    let settings = &config.as_ref()?.output_settings;
    let dir = settings.output_directory.as_ref()?;
    let p: PathBuf = root_p
        .join(dir)
        .join(format!("{}_summary.json", settings.contest_name));
    Some(p.display().to_string())
}

fn write_summary(dest: &str, pretty_js_stats: &str) -> BRcvResult<()> {
    if dest == "stdout" {
        println!("{}", pretty_js_stats);
        return Ok(());
    }
    info!("Writing summary to {:?}", dest);
    if let Some(parent) = Path::new(dest).parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).context(WritingSnafu { path: dest })?;
        }
    }
    fs::write(dest, pretty_js_stats).context(WritingSnafu { path: dest })?;
    Ok(())
}

fn check_reference(reference_path: &str, pretty_js_stats: &str) -> BRcvResult<()> {
    let summary_ref = read_summary(reference_path)?;
    debug!("summary: {:?}", summary_ref);
    let pretty_js_summary_ref =
        serde_json::to_string_pretty(&summary_ref).context(SerializingJsonSnafu {})?;
    if pretty_js_summary_ref != pretty_js_stats {
        warn!("Found differences with the reference string");
        print_diff(pretty_js_summary_ref.as_str(), pretty_js_stats, "\n");
        return Err(Box::new(RcvError::ReferenceMismatch {}));
    }
    Ok(())
}

/// Reads the ballots, counts them and writes the summary. Returns the result of the count.
pub fn run_election(args: &Args) -> BRcvResult<VotingResult> {
    let (config, root_p) = match &args.config {
        Some(config_path) => {
            let config = read_config(config_path)?;
            info!("config: {:?}", config);
            let root_p = Path::new(config_path)
                .parent()
                .context(MissingParentDirSnafu { path: config_path })?
                .to_path_buf();
            (Some(config), root_p)
        }
        None => (None, PathBuf::new()),
    };

    let input_type = args.input_type.clone().unwrap_or_else(|| "csv".to_string());
    let mut sources: Vec<SourceBallots> = Vec::new();
    if input_type == "prompt" {
        let stdin = std::io::stdin();
        let mut input = stdin.lock();
        let mut output = std::io::stdout();
        let declared: Option<Vec<String>> = declared_candidates(args, &config)
            .map(|cands| cands.into_iter().map(|c| c.name).collect());
        sources.push(io_prompt::prompt_election(
            &mut input,
            &mut output,
            declared.as_deref(),
        )?);
    } else if let Some(input) = &args.input {
        let cfs = FileSource::from_input(input, &input_type, args.excel_worksheet_name.clone());
        sources.push(read_ranking_data(Path::new(""), &cfs)?);
    } else {
        let cvr_file_sources = config
            .as_ref()
            .map(|c| c.cvr_file_sources.clone())
            .unwrap_or_default();
        if cvr_file_sources.is_empty() {
            return Err(Box::new(RcvError::MissingInput {}));
        }
        for cfs in cvr_file_sources.iter() {
            sources.push(read_ranking_data(&root_p, cfs)?);
        }
    }

    let candidates = choose_candidates(args, &config, &sources)?;
    let mut election = Election::new(&candidates).context(ElectionSnafu {})?;
    for (idx, c) in candidates.iter().enumerate() {
        debug!("Candidate: {}: {}", idx, c.name);
    }

    let ballots: Vec<ParsedBallot> = sources.into_iter().flat_map(|s| s.ballots).collect();
    let rejected = timed(args.timing, "Recording preferences", || {
        record_ballots(&mut election, &ballots, args.strict)
    })?;
    if rejected > 0 {
        warn!("{} ballots rejected out of {}", rejected, ballots.len());
    }
    let pairs = timed(args.timing, "Adding pairs", || election.ranked_pairs());
    let (graph, outcomes) = timed(args.timing, "Locking pairs", || {
        lock_pairs(&pairs, candidates.len())
    });
    let result = timed(args.timing, "Getting winner", || {
        election.build_result(&pairs, &outcomes, &graph)
    })
    .context(ElectionSnafu {})?;

    let result_js = build_summary_js(&config, &result, &candidates, rejected);
    let pretty_js_stats =
        serde_json::to_string_pretty(&result_js).context(SerializingJsonSnafu {})?;

    if let Some(dest) = summary_destination(args, &config, &root_p) {
        write_summary(&dest, &pretty_js_stats)?;
    }

    if let Some(reference_path) = &args.reference {
        check_reference(reference_path, &pretty_js_stats)?;
    }

    Ok(result)
}
