//! Apply command implementation.

use super::start_runtime;
use crate::core::config::ConfigOverrides;
use anyhow::Result;
use clap::Args;

/// Apply attribute writes in order and print every attribute afterwards.
#[derive(Args, Debug)]
pub struct ApplyArgs {
    /// Attribute write, e.g. `lcluster_max_freq=600000`. May be repeated.
    #[arg(long = "set", value_name = "NAME=VALUE")]
    pub set: Vec<String>,
}

/// Run the apply command.
pub fn run_apply(
    config_path: Option<&str>,
    overrides: &ConfigOverrides,
    args: ApplyArgs,
) -> Result<()> {
    let runtime = start_runtime(config_path, overrides)?;
    let surface = runtime.surface();

    let mut failures = 0usize;
    for assignment in &args.set {
        let Some((name, value)) = assignment.split_once('=') else {
            anyhow::bail!("expected NAME=VALUE, got: {}", assignment);
        };
        let status = surface.store_status(name, value);
        if status < 0 {
            failures += 1;
        }
        println!("{} <- {}: {}", name, value, status);
    }

    for name in surface.group().names() {
        let value = surface.show(name)?;
        print!("{}: {}", name, value);
    }

    runtime.shutdown();

    if failures > 0 {
        anyhow::bail!("{} of {} writes rejected", failures, args.set.len());
    }
    Ok(())
}
