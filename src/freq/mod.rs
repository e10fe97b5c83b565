//! Per-cluster frequency constraints.
//!
//! - [`table`] - Frequency table registry and membership checks
//! - [`bound`] - Bound pair and the per-cluster bound store
//! - [`manager`] - Validated setter behind the single concurrency gate
//! - [`propagation`] - Boost intent and limit-consumer hooks

pub mod bound;
pub mod manager;
pub mod propagation;
pub mod table;

use serde::{Deserialize, Serialize};

/// Sentinel meaning "no constraint" on one side of a bound.
pub const NO_LIMIT: i32 = -1;

/// Index of a CPU cluster in `[0, cluster_count)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ClusterId(pub usize);

impl ClusterId {
    /// Index into per-cluster arrays.
    pub fn index(self) -> usize {
        self.0
    }
}

impl std::fmt::Display for ClusterId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<usize> for ClusterId {
    fn from(index: usize) -> Self {
        Self(index)
    }
}

/// Map a requested value onto the stored representation.
///
/// Non-positive requests mean "no limit".
pub fn normalize(value: i32) -> i32 {
    if value > 0 {
        value
    } else {
        NO_LIMIT
    }
}

pub use bound::{BoundKind, BoundStore, FrequencyBound};
pub use manager::FreqConstraints;
pub use propagation::{BoostIntent, BoostSignal, Collaborators, LimitConsumer, LimitKind};
pub use table::{FrequencyTable, TableRegistry};
