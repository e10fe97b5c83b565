//! Serve command implementation.
//!
//! Reads one command per line from stdin until EOF or Ctrl-C:
//!
//! ```text
//! read  <attribute>
//! write <attribute> <value>
//! table <cpu> <freq> [<freq>...]
//! dump
//! metrics
//! ```

use super::start_runtime;
use crate::core::config::ConfigOverrides;
use crate::core::runtime::Runtime;
use crate::freq::table::FrequencyTable;
use anyhow::Result;
use clap::Args;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};

/// Run interactively over stdin.
#[derive(Args, Debug)]
pub struct ServeArgs {
    /// Suppress the prompt.
    #[arg(long)]
    pub quiet: bool,
}

/// Run the serve command.
pub async fn run_serve(
    config_path: Option<&str>,
    overrides: &ConfigOverrides,
    args: ServeArgs,
) -> Result<()> {
    let runtime = start_runtime(config_path, overrides)?;

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut stdout = tokio::io::stdout();

    loop {
        if !args.quiet {
            stdout.write_all(b"> ").await?;
            stdout.flush().await?;
        }

        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line? else {
                    break;
                };
                let reply = execute_line(&runtime, &line);
                if !reply.is_empty() {
                    stdout.write_all(reply.as_bytes()).await?;
                    stdout.flush().await?;
                }
            }
            _ = tokio::signal::ctrl_c() => {
                tracing::info!("interrupted");
                break;
            }
        }
    }

    runtime.shutdown();
    Ok(())
}

/// Execute one command line against `runtime` and render the reply.
pub fn execute_line(runtime: &Runtime, line: &str) -> String {
    let surface = runtime.surface();
    let mut parts = line.split_whitespace();

    match (parts.next(), parts.next(), parts.next()) {
        (None, _, _) => String::new(),
        (Some("read"), Some(name), None) => match surface.show(name) {
            Ok(value) => value,
            Err(e) => format!("error {}: {}\n", e.status(), e),
        },
        (Some("write"), Some(name), Some(value)) if parts.next().is_none() => {
            format!("{}\n", surface.store_status(name, value))
        }
        (Some("table"), Some(cpu), Some(first)) => {
            let entries: Result<Vec<i32>, _> = std::iter::once(first)
                .chain(parts)
                .map(str::parse::<i32>)
                .collect();
            match (cpu.parse::<u32>(), entries) {
                (Ok(cpu), Ok(entries)) => {
                    match runtime.register_table_for_cpu(cpu, FrequencyTable::new(entries)) {
                        Ok(Some(cluster)) => format!("registered cluster {}\n", cluster),
                        Ok(None) => format!("ignored: cpu {} does not start a cluster\n", cpu),
                        Err(e) => format!("error {}: {}\n", e.errno(), e),
                    }
                }
                _ => "error: usage: table <cpu> <freq> [<freq>...]\n".to_string(),
            }
        }
        (Some("dump"), None, None) => surface
            .group()
            .names()
            .map(|name| match surface.show(name) {
                Ok(value) => format!("{}: {}", name, value),
                Err(e) => format!("{}: error {}\n", name, e.status()),
            })
            .collect(),
        (Some("metrics"), None, None) => runtime.constraints().metrics().export_prometheus(),
        _ => format!("error: unrecognized command: {}\n", line.trim()),
    }
}
