//! Cluster bound pair and store.

use super::{ClusterId, NO_LIMIT};
use crate::core::error::{FreqError, FreqResult};
use serde::{Deserialize, Serialize};

/// Which side of a bound is being set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BoundKind {
    Min,
    Max,
}

impl BoundKind {
    /// The opposite side.
    pub fn other(self) -> Self {
        match self {
            Self::Min => Self::Max,
            Self::Max => Self::Min,
        }
    }

    /// Lowercase name used in messages and attribute names.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Min => "min",
            Self::Max => "max",
        }
    }
}

impl std::fmt::Display for BoundKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Requested `[min, max]` frequency constraint for one cluster.
///
/// Either side may be [`NO_LIMIT`]. Layout matches what the limit consumer
/// expects, so the store hands out slices of these directly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FrequencyBound {
    pub min: i32,
    pub max: i32,
}

impl FrequencyBound {
    /// Both sides unconstrained.
    pub const UNBOUNDED: Self = Self {
        min: NO_LIMIT,
        max: NO_LIMIT,
    };

    /// Value of one side.
    pub fn get(&self, kind: BoundKind) -> i32 {
        match kind {
            BoundKind::Min => self.min,
            BoundKind::Max => self.max,
        }
    }

    /// Overwrite one side without any ordering check.
    pub fn set(&mut self, kind: BoundKind, value: i32) {
        match kind {
            BoundKind::Min => self.min = value,
            BoundKind::Max => self.max = value,
        }
    }

    /// Whether either side carries a constraint.
    pub fn is_bounded(&self) -> bool {
        self.min != NO_LIMIT || self.max != NO_LIMIT
    }

    /// `min <= max` whenever both sides are constrained.
    pub fn is_ordered(&self) -> bool {
        self.min == NO_LIMIT || self.max == NO_LIMIT || self.min <= self.max
    }

    /// Check whether setting `kind` to `value` keeps the pair ordered.
    ///
    /// Returns the conflicting opposite value on violation.
    pub fn conflicts_with(&self, kind: BoundKind, value: i32) -> Option<i32> {
        let other = self.get(kind.other());
        if value == NO_LIMIT || other == NO_LIMIT {
            return None;
        }
        let violates = match kind {
            BoundKind::Min => value > other,
            BoundKind::Max => value < other,
        };
        violates.then_some(other)
    }
}

impl Default for FrequencyBound {
    fn default() -> Self {
        Self::UNBOUNDED
    }
}

/// Current bounds for every cluster.
///
/// Raw writes are crate-private: only the validated setter commits bounds.
#[derive(Debug, Clone)]
pub struct BoundStore {
    bounds: Vec<FrequencyBound>,
}

impl BoundStore {
    /// Allocate a store with every cluster unbounded.
    ///
    /// Allocation is fallible so init can fail cleanly instead of aborting.
    pub fn new(cluster_count: usize) -> FreqResult<Self> {
        let mut bounds = Vec::new();
        bounds
            .try_reserve_exact(cluster_count)
            .map_err(|_| FreqError::AllocationFailure {
                clusters: cluster_count,
            })?;
        bounds.resize(cluster_count, FrequencyBound::UNBOUNDED);
        Ok(Self { bounds })
    }

    /// Number of clusters the store was sized for.
    pub fn cluster_count(&self) -> usize {
        self.bounds.len()
    }

    /// Snapshot of one cluster's bound.
    pub fn get(&self, cluster: ClusterId) -> FreqResult<FrequencyBound> {
        self.bounds
            .get(cluster.index())
            .copied()
            .ok_or(FreqError::InvalidCluster {
                cluster,
                cluster_count: self.cluster_count(),
            })
    }

    /// All bounds in cluster order.
    pub fn all(&self) -> &[FrequencyBound] {
        &self.bounds
    }

    /// Overwrite a cluster's bound. Callers validate first.
    pub(crate) fn set(&mut self, cluster: ClusterId, bound: FrequencyBound) -> FreqResult<()> {
        let cluster_count = self.cluster_count();
        let slot = self
            .bounds
            .get_mut(cluster.index())
            .ok_or(FreqError::InvalidCluster {
                cluster,
                cluster_count,
            })?;
        *slot = bound;
        Ok(())
    }
}
