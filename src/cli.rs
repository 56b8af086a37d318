use std::path::PathBuf;

use clap::Parser;

use crate::data::loader::DEFAULT_INPUT;

/// Figure written in batch and interactive mode alike.
pub const DEFAULT_OUTPUT: &str = "clddet.png";

#[derive(Parser, Debug, Clone)]
#[command(
    author,
    version,
    about = "Cloud detection",
    long_about = None,
    after_help = "Examples:\n  clddet-plot -j 3\n  clddet-plot -j 12 -b --output profile12.png\n  RUST_LOG=debug clddet-plot -b --dump-json figure.json\n"
)]
pub struct Args {
    /// Index profile
    #[arg(short = 'j', value_name = "INDEX", default_value_t = 0)]
    pub index: u32,

    /// Batch mode, produce png only
    #[arg(short = 'b')]
    pub batch: bool,

    /// Sorted and smoothed departures file
    #[arg(long, default_value = DEFAULT_INPUT)]
    pub input: PathBuf,

    /// PNG file to write
    #[arg(long, default_value = DEFAULT_OUTPUT)]
    pub output: PathBuf,

    /// Also write the extracted figure data as JSON
    #[arg(long)]
    pub dump_json: Option<PathBuf>,
}
