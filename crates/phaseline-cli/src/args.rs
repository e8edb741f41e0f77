//! Command-line argument definitions.

use clap::Parser;

/// Command-line arguments for the phaseline tool
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Path to the input process document (TOML)
    #[arg(help = "Path to the input file")]
    pub input: String,

    /// Path to the phase report; printed to stdout when omitted
    #[arg(short, long)]
    pub output: Option<String>,

    /// Path to configuration file (TOML)
    #[arg(short, long)]
    pub config: Option<String>,

    /// Log level (off, error, warn, info, debug, trace)
    #[arg(long, default_value = "info")]
    pub log_level: String,
}
