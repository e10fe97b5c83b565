//! Operations and observability.
//!
//! - [`observability`] - Metrics registry and domain metrics
//! - [`sinks`] - Logging collaborators for standalone runs

pub mod observability;
pub mod sinks;
