//! CLI argument parsing for the profile analyzer

use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "cronista")]
#[command(version)]
#[command(about = "Analyze exported profiles for bottlenecks", long_about = None)]
pub struct Cli {
    /// Profile file produced by export_json
    #[arg(value_name = "PROFILE")]
    pub profile: PathBuf,

    /// Flag operations above this share of total time (default: 10.0)
    #[arg(long = "percent-threshold", value_name = "PCT", default_value = "10.0")]
    pub percent_threshold: f64,

    /// Flag operations above this per-call average in seconds (default: 5.0)
    #[arg(long = "avg-threshold", value_name = "SECS", default_value = "5.0")]
    pub avg_threshold: f64,

    /// Timeline bucket width in seconds (default: 10)
    #[arg(long = "bucket-secs", value_name = "SECS", default_value = "10")]
    pub bucket_secs: u64,

    /// Maximum operations to list in the breakdown table (default: 20)
    #[arg(long = "top", value_name = "N", default_value = "20")]
    pub top: usize,

    /// Print only the bottleneck section
    #[arg(long = "bottlenecks-only")]
    pub bottlenecks_only: bool,

    /// Skip the timeline section
    #[arg(long = "no-timeline")]
    pub no_timeline: bool,

    /// Enable debug logging
    #[arg(short, long)]
    pub debug: bool,
}
