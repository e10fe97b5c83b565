//! Command-line interface.

pub mod commands;

use clap::{Parser, Subcommand};

/// clusterfreq - per-cluster CPU frequency constraints.
#[derive(Parser, Debug)]
#[command(name = "clusterfreq")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Configuration file path. The reference topology is used when omitted.
    #[arg(short, long, global = true)]
    pub config: Option<String>,

    /// Log level (trace, debug, info, warn, error).
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run interactively, reading attribute commands from stdin.
    Serve(commands::ServeArgs),
    /// Apply attribute writes and print the resulting bounds.
    Apply(commands::ApplyArgs),
    /// Configuration operations.
    Config(commands::ConfigArgs),
}
