//! Validated bound setter.
//!
//! [`FreqConstraints`] is the context object owning the table registry, the
//! bound store and the single concurrency gate that serializes all of them.
//!
//! # Invariants
//!
//! - Stored bounds are ordered: `min <= max` whenever both are constrained.
//! - Every constrained value was a table member when it was committed.
//! - A rejected call mutates nothing and propagates nothing.
//!
//! Calls are totally ordered by gate acquisition. Propagation runs under the
//! gate, so collaborators observe commits in that same order.

use super::bound::{BoundKind, BoundStore, FrequencyBound};
use super::propagation::Collaborators;
use super::table::{FrequencyTable, TableRegistry};
use super::{normalize, ClusterId};
use crate::core::error::{FreqError, FreqResult, RejectReason};
use crate::ops::observability::FreqMetrics;
use parking_lot::Mutex;
use std::sync::Arc;

/// State guarded by the gate.
#[derive(Debug)]
struct Gated {
    tables: TableRegistry,
    bounds: BoundStore,
}

/// Per-cluster frequency constraint manager.
#[derive(Debug)]
pub struct FreqConstraints {
    gate: Mutex<Gated>,
    collaborators: Collaborators,
    metrics: Arc<FreqMetrics>,
}

impl FreqConstraints {
    /// Create a manager for `cluster_count` clusters, all unbounded and without tables.
    pub fn new(cluster_count: usize, collaborators: Collaborators) -> FreqResult<Self> {
        Self::with_metrics(cluster_count, collaborators, Arc::new(FreqMetrics::new()))
    }

    /// Create a manager reporting into an existing metrics handle.
    pub fn with_metrics(
        cluster_count: usize,
        collaborators: Collaborators,
        metrics: Arc<FreqMetrics>,
    ) -> FreqResult<Self> {
        let tables = TableRegistry::new(cluster_count)?;
        let bounds = BoundStore::new(cluster_count)?;
        Ok(Self {
            gate: Mutex::new(Gated { tables, bounds }),
            collaborators,
            metrics,
        })
    }

    /// Number of managed clusters, fixed at construction.
    pub fn cluster_count(&self) -> usize {
        self.gate.lock().bounds.cluster_count()
    }

    /// Metrics handle shared with the runtime.
    pub fn metrics(&self) -> &Arc<FreqMetrics> {
        &self.metrics
    }

    /// Install or replace the frequency table for `cluster`.
    ///
    /// Existing bounds are left as they are even if the new table no longer
    /// contains them; only future requests are checked against it.
    pub fn register_table(&self, cluster: ClusterId, table: FrequencyTable) -> FreqResult<()> {
        let entries = table.len();
        let mut gated = self.gate.lock();
        let replaced = gated.tables.register(cluster, table)?.is_some();
        drop(gated);

        tracing::info!(%cluster, entries, replaced, "frequency table registered");
        Ok(())
    }

    /// Copy of the table registered for `cluster`.
    pub fn table(&self, cluster: ClusterId) -> Option<FrequencyTable> {
        self.gate.lock().tables.get(cluster).cloned()
    }

    /// Whether `value` is the sentinel or in the cluster's table.
    pub fn is_valid(&self, cluster: ClusterId, value: i32) -> bool {
        self.gate.lock().tables.is_valid(cluster, value)
    }

    /// Snapshot of one cluster's bound.
    pub fn get(&self, cluster: ClusterId) -> FreqResult<FrequencyBound> {
        self.gate.lock().bounds.get(cluster)
    }

    /// Snapshot of every cluster's bound, in cluster order.
    pub fn snapshot(&self) -> Vec<FrequencyBound> {
        self.gate.lock().bounds.all().to_vec()
    }

    /// Validate and commit one side of a cluster's bound.
    ///
    /// Non-positive values remove the constraint. On success the boost hook
    /// and the limit consumer are notified before the gate is released.
    pub fn set_bound(
        &self,
        cluster: ClusterId,
        kind: BoundKind,
        requested: i32,
    ) -> Result<(), RejectReason> {
        let mut gated = self.gate.lock();

        let result = Self::validate(&gated, cluster, kind, requested);
        let (value, mut bound) = match result {
            Ok(ok) => ok,
            Err(e) => {
                drop(gated);
                tracing::debug!(%cluster, %kind, requested, reason = e.label(), "bound rejected");
                self.metrics.record_rejected(&e);
                return Err(e);
            }
        };

        bound.set(kind, value);
        gated.bounds.set(cluster, bound)?;
        self.metrics.record_accepted(cluster, &bound);
        tracing::debug!(%cluster, %kind, min = bound.min, max = bound.max, "bound committed");

        self.collaborators
            .propagate(cluster, gated.bounds.all(), &self.metrics);
        Ok(())
    }

    /// Set the minimum frequency for `cluster`.
    pub fn set_min(&self, cluster: ClusterId, value: i32) -> Result<(), RejectReason> {
        self.set_bound(cluster, BoundKind::Min, value)
    }

    /// Set the maximum frequency for `cluster`.
    pub fn set_max(&self, cluster: ClusterId, value: i32) -> Result<(), RejectReason> {
        self.set_bound(cluster, BoundKind::Max, value)
    }

    /// Returns the normalized value and the current bound when the request is acceptable.
    fn validate(
        gated: &Gated,
        cluster: ClusterId,
        kind: BoundKind,
        requested: i32,
    ) -> FreqResult<(i32, FrequencyBound)> {
        let current = gated.bounds.get(cluster)?;

        let value = normalize(requested);
        if !gated.tables.is_valid(cluster, value) {
            return Err(FreqError::invalid_frequency(cluster, requested));
        }

        if let Some(other) = current.conflicts_with(kind, value) {
            return Err(FreqError::OrderingViolation {
                cluster,
                kind,
                value,
                other,
            });
        }

        Ok((value, current))
    }
}
