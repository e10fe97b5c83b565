//! Frequency table registry.
//!
//! Tables are supplied by platform code, usually once per cluster during boot.
//! A cluster with no table rejects every value except the sentinel.

use super::{ClusterId, NO_LIMIT};
use crate::core::error::{FreqError, FreqResult};
use serde::{Deserialize, Serialize};

/// Discrete operating frequencies supported by one cluster, in kHz.
///
/// Entries are kept sorted and unique so membership is a binary search.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<i32>", into = "Vec<i32>")]
pub struct FrequencyTable {
    entries: Vec<i32>,
}

impl FrequencyTable {
    /// Build a table from raw entries. Non-positive entries are dropped.
    pub fn new(entries: impl IntoIterator<Item = i32>) -> Self {
        let mut entries: Vec<i32> = entries.into_iter().filter(|f| *f > 0).collect();
        entries.sort_unstable();
        entries.dedup();
        Self { entries }
    }

    /// Exact membership test.
    pub fn contains(&self, freq: i32) -> bool {
        self.entries.binary_search(&freq).is_ok()
    }

    /// Entries in ascending order.
    pub fn entries(&self) -> &[i32] {
        &self.entries
    }

    /// Number of distinct entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Lowest supported frequency.
    pub fn min_freq(&self) -> Option<i32> {
        self.entries.first().copied()
    }

    /// Highest supported frequency.
    pub fn max_freq(&self) -> Option<i32> {
        self.entries.last().copied()
    }
}

impl From<Vec<i32>> for FrequencyTable {
    fn from(entries: Vec<i32>) -> Self {
        Self::new(entries)
    }
}

impl From<FrequencyTable> for Vec<i32> {
    fn from(table: FrequencyTable) -> Self {
        table.entries
    }
}

/// Per-cluster table slots.
///
/// Not synchronized on its own; [`FreqConstraints`](super::FreqConstraints)
/// keeps it behind the same gate as the bound store.
#[derive(Debug, Clone)]
pub struct TableRegistry {
    tables: Vec<Option<FrequencyTable>>,
}

impl TableRegistry {
    /// Create a registry with `cluster_count` empty slots.
    pub fn new(cluster_count: usize) -> FreqResult<Self> {
        let mut tables = Vec::new();
        tables
            .try_reserve_exact(cluster_count)
            .map_err(|_| FreqError::AllocationFailure {
                clusters: cluster_count,
            })?;
        tables.resize(cluster_count, None);
        Ok(Self { tables })
    }

    /// Number of cluster slots.
    pub fn cluster_count(&self) -> usize {
        self.tables.len()
    }

    /// Replace the table for `cluster`. Last write wins.
    ///
    /// Returns the previous table, if any.
    pub fn register(
        &mut self,
        cluster: ClusterId,
        table: FrequencyTable,
    ) -> FreqResult<Option<FrequencyTable>> {
        let cluster_count = self.cluster_count();
        let slot = self
            .tables
            .get_mut(cluster.index())
            .ok_or(FreqError::InvalidCluster {
                cluster,
                cluster_count,
            })?;
        Ok(slot.replace(table))
    }

    /// Table registered for `cluster`, if any.
    pub fn get(&self, cluster: ClusterId) -> Option<&FrequencyTable> {
        self.tables.get(cluster.index()).and_then(Option::as_ref)
    }

    /// True iff `value` is the sentinel or a member of the cluster's table.
    ///
    /// Unknown clusters and missing tables only accept the sentinel.
    pub fn is_valid(&self, cluster: ClusterId, value: i32) -> bool {
        if value == NO_LIMIT {
            return true;
        }
        self.get(cluster).is_some_and(|table| table.contains(value))
    }
}
