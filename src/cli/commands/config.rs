//! Config command implementation.

use crate::attr::surface::AttributeGroup;
use crate::core::config::Config;
use anyhow::{Context, Result};
use clap::{Args, Subcommand};
use std::path::{Path, PathBuf};

/// Configuration operations.
#[derive(Args, Debug)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

/// Config subcommands.
#[derive(Subcommand, Debug)]
pub enum ConfigCommand {
    /// Validate configuration file.
    Validate {
        /// Config file path.
        #[arg(short, long, default_value = "config/clusterfreq.toml")]
        config: PathBuf,
    },
    /// Print configuration with defaults applied.
    Show {
        /// Config file path.
        #[arg(short, long, default_value = "config/clusterfreq.toml")]
        config: PathBuf,
        /// Output format (toml, json).
        #[arg(long, default_value = "toml")]
        format: String,
    },
    /// Generate a configuration template.
    Generate {
        /// Output file path.
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

/// Run the config command.
pub fn run_config(args: ConfigArgs) -> Result<()> {
    match args.command {
        ConfigCommand::Validate { config } => validate_config(&config),
        ConfigCommand::Show { config, format } => show_config(&config, &format),
        ConfigCommand::Generate { output } => generate_config(output.as_deref()),
    }
}

fn validate_config(path: &Path) -> Result<()> {
    let config = Config::from_file(path)?;
    println!("✓ Configuration is valid");

    let group = AttributeGroup::from_config(&config);
    for (index, cluster) in config.topology.clusters.iter().enumerate() {
        match cluster.frequencies {
            Some(ref table) => println!(
                "  cluster {} '{}' (first cpu {}): {} frequencies",
                index,
                cluster.name,
                cluster.first_cpu,
                table.len()
            ),
            None => println!(
                "  ⚠ cluster {} '{}' (first cpu {}): no static table, awaiting platform registration",
                index, cluster.name, cluster.first_cpu
            ),
        }
    }
    println!(
        "  attributes under '{}': {}",
        group.name,
        group.names().collect::<Vec<_>>().join(", ")
    );
    Ok(())
}

fn show_config(path: &Path, format: &str) -> Result<()> {
    let config = Config::from_file(path)?;

    match format {
        "json" => println!("{}", serde_json::to_string_pretty(&config)?),
        "toml" => println!(
            "{}",
            toml::to_string_pretty(&config).context("failed to render config")?
        ),
        other => anyhow::bail!("unknown format '{}', expected toml or json", other),
    }
    Ok(())
}

fn generate_config(output: Option<&Path>) -> Result<()> {
    let template = generate_template();
    match output {
        Some(path) => {
            std::fs::write(path, &template)
                .with_context(|| format!("failed to write {:?}", path))?;
            println!("Generated config template: {:?}", path);
        }
        None => println!("{}", template),
    }
    Ok(())
}

fn generate_template() -> String {
    r#"# clusterfreq configuration

[attributes]
group = "mtk"

[boost]
enabled = true

[telemetry]
log_level = "info"

[[topology.clusters]]
name = "little"
short_name = "l"
first_cpu = 0
# frequencies = [500000, 774000, 1070000, 1400000, 1700000, 2000000]

[[topology.clusters]]
name = "big"
short_name = "b"
first_cpu = 6
# frequencies = [774000, 1130000, 1500000, 1800000, 2050000]
"#
    .to_string()
}
