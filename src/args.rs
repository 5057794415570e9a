use clap::Parser;

/// Reads ballots from a spreadsheet and runs an instant-runoff election.
#[derive(Parser, Debug, Clone, Default)]
#[clap(author, version, about, long_about = None)]
pub struct Args {
    /// (file path, optional) A JSON file describing the election. Every option below overrides
    /// the corresponding entry of this file. See the `manual` module of the instant_runoff
    /// crate for the format.
    #[clap(short, long, value_parser)]
    pub config: Option<String>,

    /// (file path) The file containing the ballots: one row per ballot, one column per
    /// candidate, the cells holding the ranks. Overrides the filePath entry of the config.
    #[clap(short, long, value_parser)]
    pub input: Option<String>,

    /// (xlsx or csv) The type of the input. If not given, it is guessed from the file extension.
    #[clap(long, value_parser)]
    pub input_type: Option<String>,

    /// (default 1) The 0-based index of the first column containing candidate rankings.
    /// The default skips the timestamp column added by online forms.
    #[clap(short, long, value_parser)]
    pub first_column_index: Option<usize>,

    /// When using an Excel file, indicates the name of the worksheet to use. The first
    /// worksheet is used by default.
    #[clap(long, value_parser)]
    pub excel_worksheet_name: Option<String>,

    /// (ALL, RANDOM or RVH, default ALL) The rule to use for breaking ties between the
    /// candidates with the least preferences.
    #[clap(short, long, value_parser)]
    pub tie_breaking_rule: Option<String>,

    /// (integer) The seed of the random generator used by the RANDOM and RVH rules.
    /// The election is reproducible when a seed is given.
    #[clap(short, long, value_parser)]
    pub seed: Option<u64>,

    /// (file path, 'stdout' or empty) If specified, the summary of the election will be written
    /// in JSON format to the given location. An empty value writes no summary. Setting this
    /// option overrides the path that may be specified with the --config option.
    #[clap(short, long, value_parser)]
    pub out: Option<String>,

    // Other arguments
    /// If passed as an argument, will turn on verbose logging to the standard error.
    #[clap(long, takes_value = false)]
    pub verbose: bool,
}
