use clap::Parser;

/// This is a Ranked Pairs (Tideman) tabulation program.
#[derive(Parser, Debug, Clone)]
#[clap(author, version, about, long_about = None)]
pub struct Args {
    /// (file path, optional) The file containing the election description in JSON.
    /// See the manual of the ranked_pairs crate for the format.
    #[clap(short, long, value_parser)]
    pub config: Option<String>,

    /// (file path) A reference file containing the outcome of an election in JSON format. If provided, tideman will
    /// check that the tabulated output matches the reference.
    #[clap(short, long, value_parser)]
    pub reference: Option<String>,

    /// (file path, 'stdout' or empty) If specified, the summary of the election will be written in JSON format to the given
    /// location. Setting this option overrides the output directory that may be specified with the --config option.
    /// With --generate, the generated ballots are written there.
    #[clap(short, long, value_parser)]
    pub out: Option<String>,

    /// (file path or empty) The file containing the ballots. Setting this option overrides the sources that may
    /// be specified with the --config option.
    #[clap(short, long, value_parser)]
    pub input: Option<String>,

    /// (default csv) The type of the input: csv, csv_choices, xlsx or prompt.
    #[clap(long, value_parser)]
    pub input_type: Option<String>,

    /// (list of comma-separated values or not specified) If specified, the names of the candidates, in roster order.
    /// Overrides the candidates of the configuration and of the input header.
    #[clap(long, value_parser, value_delimiter = ',')]
    pub candidates: Option<Vec<String>>,

    /// When using an Excel file, indicates the name of the worksheet to use.
    #[clap(long, value_parser)]
    pub excel_worksheet_name: Option<String>,

    /// If passed as an argument, the first invalid ballot stops the count. Otherwise invalid ballots are skipped.
    #[clap(long, takes_value = false)]
    pub strict: bool,

    /// If passed as an argument, the duration of each phase of the count is logged.
    #[clap(long, takes_value = false)]
    pub timing: bool,

    /// (number of voters) Instead of counting, writes this many random ballots for the candidates in the csv format.
    #[clap(long, value_parser)]
    pub generate: Option<u64>,

    /// (number, optional) Seed for --generate. Without it, the ballots differ at every run.
    #[clap(long, value_parser)]
    pub seed: Option<u64>,

    // Other arguments
    /// If passed as an argument, will turn on verbose logging to the standard output.
    #[clap(long, takes_value = false)]
    pub verbose: bool,
}
