//! Error types and status-code mapping.
//!
//! Every error returned by the bound manager is synchronous and final: nothing
//! is retried internally. Rejections leave state untouched, init failures leave
//! nothing registered.

use crate::freq::bound::BoundKind;
use crate::freq::ClusterId;
use thiserror::Error;

/// Linux errno values used at the attribute surface.
pub mod errno {
    pub const ENOENT: i32 = 2;
    pub const ENOMEM: i32 = 12;
    pub const ENODEV: i32 = 19;
    pub const EINVAL: i32 = 22;
    pub const ERANGE: i32 = 34;
}

/// Error conditions raised by the frequency constraint manager.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FreqError {
    /// Value is neither the sentinel nor a member of the cluster's table.
    #[error("invalid frequency {value} for cluster {cluster}")]
    InvalidFrequency { cluster: ClusterId, value: i32 },

    /// Value would leave the cluster with `min > max`.
    #[error("{kind} {value} for cluster {cluster} conflicts with current {} {other}", .kind.other())]
    OrderingViolation {
        cluster: ClusterId,
        kind: BoundKind,
        value: i32,
        other: i32,
    },

    /// Cluster index outside `[0, cluster_count)`.
    #[error("cluster {cluster} out of range (cluster count {cluster_count})")]
    InvalidCluster {
        cluster: ClusterId,
        cluster_count: usize,
    },

    /// The bound store could not be allocated.
    #[error("failed to allocate bound store for {clusters} clusters")]
    AllocationFailure { clusters: usize },

    /// The attribute host refused or lacks a registration point.
    #[error("attribute registration failed for group '{group}': {message}")]
    RegistrationFailure { group: String, message: String },
}

/// Rejection returned by `set_bound`.
pub type RejectReason = FreqError;

impl FreqError {
    /// Create an InvalidFrequency error.
    pub fn invalid_frequency(cluster: ClusterId, value: i32) -> Self {
        Self::InvalidFrequency { cluster, value }
    }

    /// Create a RegistrationFailure error.
    pub fn registration(group: impl Into<String>, message: impl Into<String>) -> Self {
        Self::RegistrationFailure {
            group: group.into(),
            message: message.into(),
        }
    }

    /// Whether this error is a set-time rejection rather than an init failure.
    pub fn is_rejection(&self) -> bool {
        matches!(
            self,
            Self::InvalidFrequency { .. }
                | Self::OrderingViolation { .. }
                | Self::InvalidCluster { .. }
        )
    }

    /// Short stable label, used for metric names and log fields.
    pub fn label(&self) -> &'static str {
        match self {
            Self::InvalidFrequency { .. } => "invalid_frequency",
            Self::OrderingViolation { .. } => "ordering_violation",
            Self::InvalidCluster { .. } => "invalid_cluster",
            Self::AllocationFailure { .. } => "allocation_failure",
            Self::RegistrationFailure { .. } => "registration_failure",
        }
    }

    /// Negative errno reported to the host for this error.
    pub fn errno(&self) -> i32 {
        match self {
            Self::InvalidFrequency { .. }
            | Self::OrderingViolation { .. }
            | Self::InvalidCluster { .. } => -errno::EINVAL,
            Self::AllocationFailure { .. } => -errno::ENOMEM,
            Self::RegistrationFailure { .. } => -errno::ENODEV,
        }
    }
}

/// Result type using FreqError.
pub type FreqResult<T> = Result<T, FreqError>;

/// Failure reported by an outbound collaborator.
///
/// These never reach the caller of `set_bound`; they are logged and counted.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{collaborator} failed: {message}")]
pub struct CollaboratorError {
    pub collaborator: &'static str,
    pub message: String,
}

impl CollaboratorError {
    pub fn new(collaborator: &'static str, message: impl Into<String>) -> Self {
        Self {
            collaborator,
            message: message.into(),
        }
    }
}
