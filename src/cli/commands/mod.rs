//! CLI command implementations.

mod apply;
mod config;
mod serve;

pub use apply::{run_apply, ApplyArgs};
pub use config::{run_config, ConfigArgs};
pub use serve::{execute_line, run_serve, ServeArgs};

use crate::attr::host::InMemoryHost;
use crate::core::config::{Config, ConfigOverrides};
use crate::core::runtime::Runtime;
use crate::freq::propagation::Collaborators;
use crate::ops::sinks::{TracingBoostSignal, TracingLimitConsumer};
use anyhow::{Context, Result};
use std::path::Path;
use std::sync::Arc;

/// Initialize tracing subscriber if the telemetry feature is enabled.
#[cfg(feature = "telemetry")]
fn init_tracing(level: &str) {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    // Ignored when a subscriber is already installed
    let _ = tracing_subscriber::registry()
        .with(fmt::layer().with_target(true).with_writer(std::io::stderr))
        .with(filter)
        .try_init();
}

#[cfg(not(feature = "telemetry"))]
fn init_tracing(_level: &str) {}

/// Load the config at `path`, or the reference topology when absent.
fn load_config(path: Option<&str>, overrides: &ConfigOverrides) -> Result<Config> {
    let mut config = match path {
        Some(path) => Config::from_file(Path::new(path))
            .with_context(|| format!("failed to load config from {:?}", path))?,
        None => Config::reference(),
    };
    config.apply_overrides(overrides);
    config.validate()?;
    Ok(config)
}

/// Load config, set up logging and start a runtime with logging collaborators.
fn start_runtime(path: Option<&str>, overrides: &ConfigOverrides) -> Result<Runtime> {
    let config = load_config(path, overrides)?;
    init_tracing(&config.telemetry.log_level);

    let collaborators = Collaborators::new(Arc::new(TracingLimitConsumer))
        .with_boost(Arc::new(TracingBoostSignal));
    Runtime::init(config, Arc::new(InMemoryHost::new()), collaborators)
}
