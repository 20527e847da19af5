// Random ballots in the CSV ranks format, for testing and benchmarking.

use std::fs::File;
use std::io::Write;

use log::info;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use snafu::prelude::*;

use crate::args::Args;
use crate::rcv::config_reader::read_config;
use crate::rcv::*;

/// Writes one line per voter, each a uniformly random ranking of the candidates.
pub fn write_ballots<W: Write>(
    out: W,
    dest: &str,
    candidates: &[String],
    num_voters: u64,
    rng: &mut StdRng,
) -> BRcvResult<()> {
    let mut wtr = csv::Writer::from_writer(out);
    let mut header: Vec<String> = vec!["VoterID".to_string()];
    header.extend(candidates.iter().cloned());
    wtr.write_record(&header).context(CsvWriteSnafu {})?;

    let mut ranks: Vec<usize> = (1..=candidates.len()).collect();
    for voter_id in 1..=num_voters {
        ranks.shuffle(rng);
        let mut row: Vec<String> = vec![voter_id.to_string()];
        row.extend(ranks.iter().map(|r| r.to_string()));
        wtr.write_record(&row).context(CsvWriteSnafu {})?;
    }
    wtr.flush().context(WritingSnafu { path: dest })?;
    Ok(())
}

pub fn generate_election(args: &Args, num_voters: u64) -> BRcvResult<()> {
    let config_candidates: Option<Vec<String>> = match &args.config {
        Some(path) => read_config(path)?
            .candidates
            .map(|cs| cs.into_iter().map(|c| c.name).collect()),
        None => None,
    };
    let names = args
        .candidates
        .clone()
        .or(config_candidates)
        .context(MissingCandidatesSnafu {})?;

    let mut rng = match args.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    match args.out.as_deref() {
        None | Some("stdout") => {
            write_ballots(std::io::stdout(), "stdout", &names, num_voters, &mut rng)?
        }
        Some(path) => {
            let f = File::create(path).context(WritingSnafu { path })?;
            write_ballots(f, path, &names, num_voters, &mut rng)?;
        }
    }
    info!(
        "Generated {} ballots for {} candidates",
        num_voters,
        names.len()
    );
    Ok(())
}
