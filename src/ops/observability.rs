//! Metrics.
//!
//! Metric namespaces:
//! - clusterfreq.bound.*
//! - clusterfreq.cluster.{index}.*
//! - clusterfreq.propagation.*

use crate::core::error::FreqError;
use crate::freq::bound::FrequencyBound;
use crate::freq::ClusterId;
use parking_lot::RwLock;
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicI64, AtomicU64, Ordering};

/// Metric names.
pub mod metrics {
    /// Accepted set_bound calls.
    pub const BOUND_ACCEPTED_TOTAL: &str = "clusterfreq.bound.accepted_total";
    /// Rejected set_bound calls, all reasons.
    pub const BOUND_REJECTED_TOTAL: &str = "clusterfreq.bound.rejected_total";
    /// Collaborator failures, all collaborators.
    pub const PROPAGATION_FAILURES_TOTAL: &str = "clusterfreq.propagation.failures_total";
    /// Committed min per cluster.
    pub const CLUSTER_MIN: &str = "clusterfreq.cluster.{index}.min_khz";
    /// Committed max per cluster.
    pub const CLUSTER_MAX: &str = "clusterfreq.cluster.{index}.max_khz";
}

/// Counter and gauge registry.
///
/// Gauges are signed so the `-1` sentinel is exported as-is.
#[derive(Debug, Default)]
pub struct MetricsRegistry {
    counters: RwLock<BTreeMap<String, AtomicU64>>,
    gauges: RwLock<BTreeMap<String, AtomicI64>>,
}

impl MetricsRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Increment a counter.
    pub fn counter_inc(&self, name: &str) {
        self.counter_add(name, 1);
    }

    /// Add to a counter.
    pub fn counter_add(&self, name: &str, value: u64) {
        let counters = self.counters.read();
        if let Some(counter) = counters.get(name) {
            counter.fetch_add(value, Ordering::Relaxed);
            return;
        }
        drop(counters);

        self.counters
            .write()
            .entry(name.to_string())
            .or_insert_with(|| AtomicU64::new(0))
            .fetch_add(value, Ordering::Relaxed);
    }

    /// Get counter value.
    pub fn counter_get(&self, name: &str) -> u64 {
        self.counters
            .read()
            .get(name)
            .map(|c| c.load(Ordering::Relaxed))
            .unwrap_or(0)
    }

    /// Set a gauge value.
    pub fn gauge_set(&self, name: &str, value: i64) {
        let gauges = self.gauges.read();
        if let Some(gauge) = gauges.get(name) {
            gauge.store(value, Ordering::Relaxed);
            return;
        }
        drop(gauges);

        self.gauges
            .write()
            .entry(name.to_string())
            .or_insert_with(|| AtomicI64::new(0))
            .store(value, Ordering::Relaxed);
    }

    /// Get gauge value, if the gauge has been set.
    pub fn gauge_get(&self, name: &str) -> Option<i64> {
        self.gauges
            .read()
            .get(name)
            .map(|g| g.load(Ordering::Relaxed))
    }

    /// Export metrics in Prometheus text format.
    pub fn export_prometheus(&self) -> String {
        let mut output = String::new();

        for (name, value) in self.counters.read().iter() {
            let prometheus_name = name.replace('.', "_");
            output.push_str(&format!(
                "# TYPE {} counter\n{} {}\n",
                prometheus_name,
                prometheus_name,
                value.load(Ordering::Relaxed)
            ));
        }

        for (name, value) in self.gauges.read().iter() {
            let prometheus_name = name.replace('.', "_");
            output.push_str(&format!(
                "# TYPE {} gauge\n{} {}\n",
                prometheus_name,
                prometheus_name,
                value.load(Ordering::Relaxed)
            ));
        }

        output
    }
}

/// Domain metrics for the bound manager.
#[derive(Debug, Default)]
pub struct FreqMetrics {
    pub registry: MetricsRegistry,
}

impl FreqMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a committed bound and publish it as gauges.
    pub fn record_accepted(&self, cluster: ClusterId, bound: &FrequencyBound) {
        self.registry.counter_inc(metrics::BOUND_ACCEPTED_TOTAL);
        self.publish_bound(cluster, bound);
    }

    /// Publish a bound without counting a commit.
    pub fn publish_bound(&self, cluster: ClusterId, bound: &FrequencyBound) {
        let index = cluster.to_string();
        self.registry.gauge_set(
            &metrics::CLUSTER_MIN.replace("{index}", &index),
            i64::from(bound.min),
        );
        self.registry.gauge_set(
            &metrics::CLUSTER_MAX.replace("{index}", &index),
            i64::from(bound.max),
        );
    }

    /// Record a rejected call under its reason.
    pub fn record_rejected(&self, error: &FreqError) {
        self.registry.counter_inc(metrics::BOUND_REJECTED_TOTAL);
        self.registry.counter_inc(&format!(
            "{}.{}",
            metrics::BOUND_REJECTED_TOTAL,
            error.label()
        ));
    }

    /// Record a swallowed collaborator failure.
    pub fn record_collaborator_failure(&self, collaborator: &str) {
        self.registry
            .counter_inc(metrics::PROPAGATION_FAILURES_TOTAL);
        self.registry.counter_inc(&format!(
            "{}.{}",
            metrics::PROPAGATION_FAILURES_TOTAL,
            collaborator
        ));
    }

    /// Total accepted bound changes.
    pub fn accepted_total(&self) -> u64 {
        self.registry.counter_get(metrics::BOUND_ACCEPTED_TOTAL)
    }

    /// Total rejected bound changes across all reasons.
    pub fn rejected_total(&self) -> u64 {
        self.registry.counter_get(metrics::BOUND_REJECTED_TOTAL)
    }

    /// Rejections for one reason label, e.g. `invalid_frequency`.
    pub fn rejected(&self, label: &str) -> u64 {
        self.registry
            .counter_get(&format!("{}.{}", metrics::BOUND_REJECTED_TOTAL, label))
    }

    /// Swallowed failures reported by `collaborator`.
    pub fn collaborator_failures(&self, collaborator: &str) -> u64 {
        self.registry.counter_get(&format!(
            "{}.{}",
            metrics::PROPAGATION_FAILURES_TOTAL,
            collaborator
        ))
    }

    /// Render all metrics in Prometheus text format.
    pub fn export_prometheus(&self) -> String {
        self.registry.export_prometheus()
    }
}
