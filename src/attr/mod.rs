//! Attribute surface.
//!
//! - [`surface`] - Text read/write endpoints over the constraint manager
//! - [`host`] - Host registration point for attribute groups

pub mod host;
pub mod surface;

pub use host::{AttributeHost, HostError, InMemoryHost};
pub use surface::{parse_freq, AttrError, Attribute, AttributeGroup, AttributeSurface};
