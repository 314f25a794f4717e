use clap::Parser;
use std::path::PathBuf;

use crate::config::TargetKind;

#[derive(Parser, Debug)]
#[command(name = "resplot", about = "Time and frequency plots for resampler testbench captures")]
pub struct Cli {
    /// Capture log written by the testbench (IN:/MID:/OUT: lines)
    pub input: Option<PathBuf>,

    /// Config file (defaults to resplot.toml or the user config dir)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Where figures go: window, png or svg
    #[arg(short, long, value_enum)]
    pub target: Option<TargetKind>,

    /// Directory for exported figures
    #[arg(short, long)]
    pub output_dir: Option<PathBuf>,
}
