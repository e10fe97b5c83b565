//! clusterfreq - unified CLI entrypoint.
//!
//! Usage:
//!   clusterfreq serve --config config/clusterfreq.toml
//!   clusterfreq apply --set lcluster_max_freq=600000
//!   clusterfreq config validate --config config/clusterfreq.toml

use anyhow::Result;
use clap::Parser;
use clusterfreq::cli::commands::{run_apply, run_config, run_serve};
use clusterfreq::cli::{Cli, Commands};
use clusterfreq::config::ConfigOverrides;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let overrides = ConfigOverrides {
        log_level: cli.log_level.clone(),
        ..Default::default()
    };
    let config_path = cli.config.as_deref();

    match cli.command {
        Commands::Serve(args) => run_serve(config_path, &overrides, args).await,
        Commands::Apply(args) => run_apply(config_path, &overrides, args),
        Commands::Config(args) => run_config(args),
    }
}
