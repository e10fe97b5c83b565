//! Lifecycle orchestration.
//!
//! Init order: bound store → static tables → attribute group.
//! Shutdown removes the attribute group, then releases the store.
//! A failed init leaves nothing registered with the host.

use crate::attr::host::AttributeHost;
use crate::attr::surface::{AttributeGroup, AttributeSurface};
use crate::core::config::{Config, Topology};
use crate::core::error::{FreqError, FreqResult};
use crate::freq::manager::FreqConstraints;
use crate::freq::propagation::Collaborators;
use crate::freq::table::FrequencyTable;
use crate::freq::ClusterId;
use crate::ops::observability::FreqMetrics;
use anyhow::{Context, Result};
use std::sync::Arc;

/// A running constraint manager published through an attribute host.
pub struct Runtime {
    config: Arc<Config>,
    topology: Topology,
    constraints: Arc<FreqConstraints>,
    surface: AttributeSurface,
    host: Arc<dyn AttributeHost>,
    registered: bool,
}

impl Runtime {
    /// Allocate state and publish the attribute group.
    pub fn init(
        config: Config,
        host: Arc<dyn AttributeHost>,
        mut collaborators: Collaborators,
    ) -> Result<Self> {
        config.validate().context("invalid configuration")?;

        if !config.boost.enabled {
            collaborators.boost = None;
        }

        let metrics = Arc::new(FreqMetrics::new());
        let constraints = Arc::new(FreqConstraints::with_metrics(
            config.cluster_count(),
            collaborators,
            metrics.clone(),
        )?);

        for (index, cluster) in config.topology.clusters.iter().enumerate() {
            let id = ClusterId(index);
            metrics.publish_bound(id, &constraints.get(id)?);
            if let Some(ref table) = cluster.frequencies {
                constraints.register_table(id, table.clone())?;
            }
        }

        let group = AttributeGroup::from_config(&config);
        if !host.is_available() {
            tracing::error!(group = %group.name, "attribute host is not available");
            return Err(
                FreqError::registration(&group.name, "attribute host is not available").into(),
            );
        }
        if let Err(e) = host.create_group(&group) {
            tracing::error!(group = %group.name, error = %e, "attribute group registration failed");
            return Err(FreqError::registration(&group.name, e.message).into());
        }

        tracing::info!(
            group = %group.name,
            clusters = config.cluster_count(),
            boost = config.boost.enabled,
            "frequency constraints initialized"
        );

        let topology = Topology::from_config(&config.topology);
        let surface = AttributeSurface::new(group, constraints.clone());
        Ok(Self {
            config: Arc::new(config),
            topology,
            constraints,
            surface,
            host,
            registered: true,
        })
    }

    /// Validated configuration this runtime was started with.
    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn topology(&self) -> &Topology {
        &self.topology
    }

    /// Shared constraint manager.
    pub fn constraints(&self) -> &Arc<FreqConstraints> {
        &self.constraints
    }

    /// Attribute surface backing the registered group.
    pub fn surface(&self) -> &AttributeSurface {
        &self.surface
    }

    /// Platform hook: register the table reported for `cpu`.
    ///
    /// Only the first core of a cluster carries its table; other cores are
    /// ignored and `Ok(None)` is returned.
    pub fn register_table_for_cpu(
        &self,
        cpu: u32,
        table: FrequencyTable,
    ) -> FreqResult<Option<ClusterId>> {
        match self.topology.cluster_for_cpu(cpu) {
            Some(cluster) => {
                self.constraints.register_table(cluster, table)?;
                Ok(Some(cluster))
            }
            None => {
                tracing::debug!(cpu, "core does not start a cluster, table ignored");
                Ok(None)
            }
        }
    }

    /// Unpublish the attribute group and release all state.
    pub fn shutdown(mut self) {
        self.unregister();
        tracing::info!("frequency constraints shut down");
    }

    fn unregister(&mut self) {
        if self.registered {
            self.host.remove_group(&self.surface.group().name);
            self.registered = false;
        }
    }
}

impl Drop for Runtime {
    fn drop(&mut self) {
        self.unregister();
    }
}
