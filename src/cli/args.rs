//! Command-line argument definitions

use clap::Args;

/// Arguments for the classify command
#[derive(Args, Debug)]
pub struct ClassifyArgs {
    /// Input video file path
    pub input: String,

    /// Output the full evaluation in JSON format
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the plan command
#[derive(Args, Debug)]
pub struct PlanArgs {
    /// Input video file path
    pub input: String,

    /// Output file path (default: next to the input, mkv extension)
    #[arg(short, long)]
    pub output: Option<String>,
}

/// Arguments for the scan command
#[derive(Args, Debug)]
pub struct ScanArgs {
    /// Library directory to walk
    pub root: String,
}
