//! Command-line interface

pub mod args;
pub mod commands;

use clap::{Parser, Subcommand};

pub use args::{ClassifyArgs, PlanArgs, ScanArgs};

/// tvnorm - media normalization policy engine
#[derive(Parser, Debug)]
#[command(name = "tvnorm", version, about)]
pub struct Cli {
    /// Path to a TOML configuration file
    #[arg(long, global = true)]
    pub config: Option<String>,

    /// Enable debug-level rule tracing
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Classify a file against the normalized form
    Classify(ClassifyArgs),
    /// Show the ffmpeg command the worker would run for a file
    Plan(PlanArgs),
    /// Classify every video file under a directory
    Scan(ScanArgs),
}
