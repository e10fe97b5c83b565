//! Configuration parsing and validation.
//!
//! Configuration is loaded from TOML files with CLI overrides. Topology
//! (cluster count and each cluster's first core) is fixed at construction.

use crate::freq::table::FrequencyTable;
use crate::freq::ClusterId;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;

/// Top-level configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Cluster topology.
    pub topology: TopologyConfig,

    /// Attribute surface configuration.
    #[serde(default)]
    pub attributes: AttributeConfig,

    /// Scheduler boost integration.
    #[serde(default)]
    pub boost: BoostConfig,

    /// Logging configuration.
    #[serde(default)]
    pub telemetry: TelemetryConfig,
}

/// Cluster topology, in cluster index order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TopologyConfig {
    pub clusters: Vec<ClusterConfig>,
}

/// One CPU cluster.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClusterConfig {
    /// Human-readable name, e.g. "little".
    pub name: String,

    /// Attribute prefix; defaults to the first character of `name`.
    #[serde(default)]
    pub short_name: Option<String>,

    /// Index of the first core belonging to this cluster.
    pub first_cpu: u32,

    /// Static frequency table in kHz. Platform code may register it later instead.
    #[serde(default)]
    pub frequencies: Option<FrequencyTable>,
}

impl ClusterConfig {
    /// Attribute prefix for this cluster.
    pub fn short_name(&self) -> String {
        match &self.short_name {
            Some(short) => short.clone(),
            None => self.name.chars().take(1).collect(),
        }
    }
}

/// Attribute surface configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AttributeConfig {
    /// Attribute group name under the host.
    #[serde(default = "default_group")]
    pub group: String,
}

impl Default for AttributeConfig {
    fn default() -> Self {
        Self {
            group: default_group(),
        }
    }
}

/// Scheduler boost configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BoostConfig {
    /// Forward boost intent on every committed change.
    #[serde(default = "default_boost_enabled")]
    pub enabled: bool,
}

impl Default for BoostConfig {
    fn default() -> Self {
        Self {
            enabled: default_boost_enabled(),
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TelemetryConfig {
    /// Log level: "trace", "debug", "info", "warn", "error".
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
        }
    }
}

// Default value functions

fn default_group() -> String {
    "mtk".to_string()
}

fn default_boost_enabled() -> bool {
    true
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Config {
    /// Reference two-cluster topology: little cores from 0, big cores from 6.
    pub fn reference() -> Self {
        Self {
            topology: TopologyConfig {
                clusters: vec![
                    ClusterConfig {
                        name: "little".to_string(),
                        short_name: Some("l".to_string()),
                        first_cpu: 0,
                        frequencies: None,
                    },
                    ClusterConfig {
                        name: "big".to_string(),
                        short_name: Some("b".to_string()),
                        first_cpu: 6,
                        frequencies: None,
                    },
                ],
            },
            attributes: AttributeConfig::default(),
            boost: BoostConfig::default(),
            telemetry: TelemetryConfig::default(),
        }
    }

    /// Load configuration from a TOML file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file: {}", path.display()))?;
        let config: Config =
            toml::from_str(&content).with_context(|| "failed to parse config file")?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a TOML string.
    pub fn from_toml(content: &str) -> Result<Self> {
        let config: Config = toml::from_str(content).with_context(|| "failed to parse config")?;
        config.validate()?;
        Ok(config)
    }

    /// Apply CLI overrides to the configuration.
    pub fn apply_overrides(&mut self, overrides: &ConfigOverrides) {
        if let Some(ref log_level) = overrides.log_level {
            self.telemetry.log_level = log_level.clone();
        }
        if let Some(ref group) = overrides.group {
            self.attributes.group = group.clone();
        }
        if let Some(boost) = overrides.boost {
            self.boost.enabled = boost;
        }
    }

    /// Number of configured clusters.
    pub fn cluster_count(&self) -> usize {
        self.topology.clusters.len()
    }

    /// Validate configuration consistency.
    pub fn validate(&self) -> Result<()> {
        self.validate_topology()?;
        self.validate_attributes()?;
        self.validate_telemetry()?;
        Ok(())
    }

    fn validate_topology(&self) -> Result<()> {
        let clusters = &self.topology.clusters;
        if clusters.is_empty() {
            anyhow::bail!("topology.clusters must define at least one cluster");
        }

        let mut names = HashSet::new();
        let mut short_names = HashSet::new();
        for (index, cluster) in clusters.iter().enumerate() {
            if cluster.name.is_empty() {
                anyhow::bail!("topology.clusters[{}].name must not be empty", index);
            }
            if !names.insert(cluster.name.as_str()) {
                anyhow::bail!("duplicate cluster name: {}", cluster.name);
            }

            let short = cluster.short_name();
            if short.is_empty() || !short.chars().all(|c| c.is_ascii_alphanumeric()) {
                anyhow::bail!(
                    "topology.clusters[{}].short_name must be non-empty ASCII alphanumeric, got: {:?}",
                    index,
                    short
                );
            }
            if !short_names.insert(short.clone()) {
                anyhow::bail!("duplicate cluster short_name: {}", short);
            }

            if let Some(ref table) = cluster.frequencies {
                if table.is_empty() {
                    anyhow::bail!(
                        "topology.clusters[{}].frequencies has no positive entries",
                        index
                    );
                }
            }
        }

        // First cores must strictly increase so every core maps to one cluster
        for pair in clusters.windows(2) {
            if pair[1].first_cpu <= pair[0].first_cpu {
                anyhow::bail!(
                    "cluster '{}' first_cpu ({}) must be greater than '{}' first_cpu ({})",
                    pair[1].name,
                    pair[1].first_cpu,
                    pair[0].name,
                    pair[0].first_cpu
                );
            }
        }

        Ok(())
    }

    fn validate_attributes(&self) -> Result<()> {
        if self.attributes.group.is_empty() {
            anyhow::bail!("attributes.group must not be empty");
        }
        if self.attributes.group.contains('/') {
            anyhow::bail!(
                "attributes.group must not contain '/', got: {}",
                self.attributes.group
            );
        }
        Ok(())
    }

    fn validate_telemetry(&self) -> Result<()> {
        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.telemetry.log_level.as_str()) {
            anyhow::bail!(
                "telemetry.log_level must be one of {:?}, got: {}",
                valid_levels,
                self.telemetry.log_level
            );
        }
        Ok(())
    }
}

/// Maps core indices to clusters.
#[derive(Debug, Clone)]
pub struct Topology {
    first_cpus: Vec<u32>,
}

impl Topology {
    /// Derive the cpu-to-cluster map from the configured clusters.
    pub fn from_config(config: &TopologyConfig) -> Self {
        Self {
            first_cpus: config.clusters.iter().map(|c| c.first_cpu).collect(),
        }
    }

    /// Number of clusters in the topology.
    pub fn cluster_count(&self) -> usize {
        self.first_cpus.len()
    }

    /// Cluster started by `cpu`, or `None` if `cpu` is not the first core of a cluster.
    pub fn cluster_for_cpu(&self, cpu: u32) -> Option<ClusterId> {
        self.first_cpus
            .iter()
            .position(|first| *first == cpu)
            .map(ClusterId)
    }

    /// First core of `cluster`.
    pub fn first_cpu(&self, cluster: ClusterId) -> Option<u32> {
        self.first_cpus.get(cluster.index()).copied()
    }
}

/// CLI override options that can be applied to configuration.
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    /// Override log level.
    pub log_level: Option<String>,
    /// Override attribute group name.
    pub group: Option<String>,
    /// Override boost enablement.
    pub boost: Option<bool>,
}
