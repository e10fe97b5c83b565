//! Textual read/write endpoints.
//!
//! One `{min,max}` pair per cluster, named `{short}cluster_{kind}_freq`.
//! Reads format the stored value as decimal followed by a newline; writes
//! parse a signed decimal and go through the validated setter.

use crate::core::config::Config;
use crate::core::error::{errno, FreqError};
use crate::freq::bound::BoundKind;
use crate::freq::manager::FreqConstraints;
use crate::freq::ClusterId;
use std::num::IntErrorKind;
use std::sync::Arc;
use thiserror::Error;

/// Attribute-level failure.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AttrError {
    #[error("no such attribute: {name}")]
    UnknownAttribute { name: String },

    #[error("not a decimal integer: {input:?}")]
    Parse { input: String },

    #[error("value out of range: {input:?}")]
    OutOfRange { input: String },

    #[error(transparent)]
    Rejected(#[from] FreqError),
}

impl AttrError {
    /// Negative status returned to the writer.
    pub fn status(&self) -> i32 {
        match self {
            Self::UnknownAttribute { .. } => -errno::ENOENT,
            Self::Parse { .. } => -errno::EINVAL,
            Self::OutOfRange { .. } => -errno::ERANGE,
            Self::Rejected(e) => e.errno(),
        }
    }
}

/// Parse a written frequency.
///
/// Accepts an optional sign and at most one trailing newline.
pub fn parse_freq(buf: &str) -> Result<i32, AttrError> {
    let digits = buf.strip_suffix('\n').unwrap_or(buf);
    digits.parse::<i32>().map_err(|e| match e.kind() {
        IntErrorKind::PosOverflow | IntErrorKind::NegOverflow => AttrError::OutOfRange {
            input: buf.to_string(),
        },
        _ => AttrError::Parse {
            input: buf.to_string(),
        },
    })
}

/// One read/write endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attribute {
    pub name: String,
    pub cluster: ClusterId,
    pub kind: BoundKind,
}

/// Named set of attributes registered with the host as a unit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttributeGroup {
    pub name: String,
    pub attributes: Vec<Attribute>,
}

impl AttributeGroup {
    /// Build the group for every configured cluster, min before max.
    pub fn from_config(config: &Config) -> Self {
        let attributes = config
            .topology
            .clusters
            .iter()
            .enumerate()
            .flat_map(|(index, cluster)| {
                let short = cluster.short_name();
                [BoundKind::Min, BoundKind::Max]
                    .into_iter()
                    .map(move |kind| Attribute {
                        name: format!("{}cluster_{}_freq", short, kind),
                        cluster: ClusterId(index),
                        kind,
                    })
            })
            .collect();

        Self {
            name: config.attributes.group.clone(),
            attributes,
        }
    }

    /// Look up an attribute by its exposed name.
    pub fn find(&self, name: &str) -> Option<&Attribute> {
        self.attributes.iter().find(|a| a.name == name)
    }

    /// Attribute names in cluster order, min before max.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.attributes.iter().map(|a| a.name.as_str())
    }
}

/// Attribute endpoints bound to a constraint manager.
#[derive(Debug, Clone)]
pub struct AttributeSurface {
    group: AttributeGroup,
    constraints: Arc<FreqConstraints>,
}

impl AttributeSurface {
    /// Bind an attribute group to the constraint manager it reads and writes.
    pub fn new(group: AttributeGroup, constraints: Arc<FreqConstraints>) -> Self {
        Self { group, constraints }
    }

    /// The attribute group this surface serves.
    pub fn group(&self) -> &AttributeGroup {
        &self.group
    }

    fn lookup(&self, name: &str) -> Result<&Attribute, AttrError> {
        self.group
            .find(name)
            .ok_or_else(|| AttrError::UnknownAttribute {
                name: name.to_string(),
            })
    }

    /// Current value of `name` as `"{value}\n"`.
    pub fn show(&self, name: &str) -> Result<String, AttrError> {
        let attr = self.lookup(name)?;
        let bound = self.constraints.get(attr.cluster)?;
        Ok(format!("{}\n", bound.get(attr.kind)))
    }

    /// Parse and apply a write. Returns the number of bytes consumed.
    pub fn store(&self, name: &str, buf: &str) -> Result<usize, AttrError> {
        let attr = self.lookup(name)?;
        let value = parse_freq(buf)?;
        self.constraints.set_bound(attr.cluster, attr.kind, value)?;
        Ok(buf.len())
    }

    /// Like [`store`](Self::store), folded into a byte count or negative errno.
    pub fn store_status(&self, name: &str, buf: &str) -> isize {
        match self.store(name, buf) {
            Ok(count) => count as isize,
            Err(e) => {
                tracing::debug!(attribute = name, error = %e, "attribute write failed");
                e.status() as isize
            }
        }
    }
}
