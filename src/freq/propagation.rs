//! Propagation of committed bounds to outbound collaborators.
//!
//! Hooks run while the concurrency gate is held. Collaborators must return
//! promptly and must never call back into [`FreqConstraints`](super::FreqConstraints):
//! the gate is not reentrant and a reentrant call deadlocks.

use super::bound::FrequencyBound;
use super::ClusterId;
use crate::core::error::CollaboratorError;
use crate::ops::observability::FreqMetrics;
use std::sync::Arc;

/// Scheduler boost classification derived from one cluster's bound.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoostIntent {
    /// At least one side of the bound is constrained.
    Bounded,
    /// No constraint on either side.
    Unbounded,
}

impl BoostIntent {
    /// Intent implied by a cluster's bound after a commit.
    pub fn from_bound(bound: &FrequencyBound) -> Self {
        if bound.is_bounded() {
            Self::Bounded
        } else {
            Self::Unbounded
        }
    }
}

impl std::fmt::Display for BoostIntent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Bounded => write!(f, "all-boost"),
            Self::Unbounded => write!(f, "no-boost"),
        }
    }
}

/// Tag identifying which limit class a bound vector belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LimitKind {
    /// User-requested performance limits.
    Performance,
}

impl LimitKind {
    /// Tag name used in logs.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Performance => "perf",
        }
    }
}

impl std::fmt::Display for LimitKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Scheduler-side boost policy.
pub trait BoostSignal: Send + Sync {
    fn notify_boost(&self, intent: BoostIntent) -> Result<(), CollaboratorError>;
}

/// Downstream frequency-limit consumer.
///
/// `bounds` always holds every cluster in index order, so its length is the
/// cluster count.
pub trait LimitConsumer: Send + Sync {
    fn apply_limits(
        &self,
        kind: LimitKind,
        bounds: &[FrequencyBound],
    ) -> Result<(), CollaboratorError>;
}

/// Outbound collaborators wired into a [`FreqConstraints`](super::FreqConstraints).
#[derive(Clone)]
pub struct Collaborators {
    /// Optional scheduler boost hook; `None` skips the notify step.
    pub boost: Option<Arc<dyn BoostSignal>>,
    /// Limit consumer receiving the full bound vector.
    pub limits: Arc<dyn LimitConsumer>,
}

impl Collaborators {
    /// Collaborators with only the limit consumer wired.
    pub fn new(limits: Arc<dyn LimitConsumer>) -> Self {
        Self {
            boost: None,
            limits,
        }
    }

    /// Attach the optional boost hook.
    pub fn with_boost(mut self, boost: Arc<dyn BoostSignal>) -> Self {
        self.boost = Some(boost);
        self
    }

    /// Forward a committed change. Failures are logged and counted, never returned.
    pub(crate) fn propagate(
        &self,
        cluster: ClusterId,
        all: &[FrequencyBound],
        metrics: &FreqMetrics,
    ) {
        if let (Some(boost), Some(bound)) = (&self.boost, all.get(cluster.index())) {
            let intent = BoostIntent::from_bound(bound);
            if let Err(e) = boost.notify_boost(intent) {
                tracing::warn!(%cluster, %intent, error = %e, "boost notification failed");
                metrics.record_collaborator_failure(e.collaborator);
            }
        }

        if let Err(e) = self.limits.apply_limits(LimitKind::Performance, all) {
            tracing::warn!(%cluster, clusters = all.len(), error = %e, "limit update failed");
            metrics.record_collaborator_failure(e.collaborator);
        }
    }
}

impl std::fmt::Debug for Collaborators {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Collaborators")
            .field("boost", &self.boost.is_some())
            .finish_non_exhaustive()
    }
}
