use clap::Parser;

/// This is a program to score, rank and announce the awards of a team event.
#[derive(Parser, Debug, Clone)]
#[clap(author, version, about, long_about = None)]
pub struct Args {
    /// (file path, optional) The file containing the event configuration in JSON format.
    /// For more information about the file format, read the documentation of the award_ranking crate.
    #[clap(short, long, value_parser)]
    pub config: Option<String>,
    /// (file path) A reference file containing the expected summary in JSON format. If provided, raceboard will
    /// check that the computed summary matches the reference.
    #[clap(short, long, value_parser)]
    pub reference: Option<String>,

    /// (file path, 'stdout' or empty) If specified, the summary of the awards will be written in JSON format to the given
    /// location. Setting this option overrides the path that may be specified with the --config option.
    #[clap(short, long, value_parser)]
    pub out: Option<String>,

    /// (file path or empty) The roster of the teams. Setting this option overrides the roster sources that may be
    /// specified with the --config option.
    #[clap(short, long, value_parser)]
    pub input: Option<String>,

    /// (json or xlsx, default inferred from the file extension) The type of the input.
    #[clap(long, value_parser)]
    pub input_type: Option<String>,

    /// (default: the first worksheet) When using an Excel file, indicates the name of the worksheet to use.
    #[clap(long, value_parser)]
    pub excel_worksheet_name: Option<String>,

    /// (master, collection, time-attack or all, default all) The leaderboard to show.
    #[clap(short, long, value_parser)]
    pub award: Option<String>,

    /// (next, batch or all, may be repeated) The reveal steps to apply, in order, to each leaderboard shown.
    /// Without any step, all the ranks stay hidden.
    #[clap(long, value_parser)]
    pub reveal: Vec<String>,

    // Other arguments
    /// If passed as an argument, will turn on verbose logging to the standard output.
    #[clap(long, takes_value = false)]
    pub verbose: bool,
}
