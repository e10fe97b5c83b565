//! Core runtime infrastructure.
//!
//! - [`config`] - Configuration parsing, validation and topology
//! - [`runtime`] - Init and shutdown lifecycle
//! - [`error`] - Error types and errno mapping

pub mod config;
pub mod error;
pub mod runtime;
