//! clusterfreq - per-cluster CPU frequency constraint manager.
//!
//! Maintains an independent `[min, max]` frequency bound for each CPU cluster,
//! validates every request against the cluster's hardware frequency table,
//! and forwards accepted bounds to a frequency-limit consumer and an optional
//! scheduler boost hook.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │              Attribute surface (text read / write)              │
//! └─────────────────────────────────────────────────────────────────┘
//!                                  │
//! ┌─────────────────────────────────────────────────────────────────┐
//! │           Validated setter  (single concurrency gate)           │
//! │        Table registry │ Bound store │ Cross-bound check         │
//! └─────────────────────────────────────────────────────────────────┘
//!                                  │
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                       Propagation hooks                         │
//! │            Boost intent │ Full bound vector to limits           │
//! └─────────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Module Organization
//!
//! ## Core
//! - [`core::config`] - Configuration parsing, validation and topology
//! - [`core::runtime`] - Init and shutdown lifecycle
//! - [`core::error`] - Error types and errno mapping
//!
//! ## Frequency constraints
//! - [`freq::table`] - Frequency table registry
//! - [`freq::bound`] - Bound pair and store
//! - [`freq::manager`] - Validated setter
//! - [`freq::propagation`] - Boost and limit-consumer hooks
//!
//! ## Attributes
//! - [`attr::surface`] - Text endpoints
//! - [`attr::host`] - Host registration point
//!
//! ## Operations
//! - [`ops::observability`] - Metrics
//! - [`ops::sinks`] - Logging collaborators
//!
//! ## CLI
//! - [`cli::commands`] - CLI command implementations
//!
//! # Key Invariants
//!
//! - `-1` means "no constraint" and is accepted for any cluster at any time
//! - Constrained values are members of the cluster's frequency table
//! - `min <= max` whenever both sides are constrained
//! - Rejections change nothing and notify nobody

// Core infrastructure
pub mod core;

// Bound validation and propagation
pub mod freq;

// Attribute surface
pub mod attr;

// Operations and observability
pub mod ops;

// CLI
pub mod cli;

// Re-exports for convenience
pub use self::core::{config, error, runtime};
pub use freq::{
    BoostIntent, BoostSignal, BoundKind, ClusterId, Collaborators, FreqConstraints,
    FrequencyBound, FrequencyTable, LimitConsumer, LimitKind, NO_LIMIT,
};
pub use ops::observability;
