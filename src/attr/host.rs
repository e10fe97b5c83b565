//! Attribute host registration point.

use super::surface::AttributeGroup;
use parking_lot::Mutex;
use std::collections::BTreeMap;
use thiserror::Error;

/// Host refused an attribute operation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct HostError {
    pub message: String,
}

impl HostError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Where attribute groups are published.
pub trait AttributeHost: Send + Sync {
    /// Whether the registration point exists at all.
    fn is_available(&self) -> bool;

    /// Publish a group. Fails if a group with the same name is already present.
    fn create_group(&self, group: &AttributeGroup) -> Result<(), HostError>;

    /// Remove a group. Unknown names are ignored.
    fn remove_group(&self, name: &str);
}

/// Process-local host keeping published groups in memory.
#[derive(Debug)]
pub struct InMemoryHost {
    available: bool,
    groups: Mutex<BTreeMap<String, Vec<String>>>,
}

impl InMemoryHost {
    pub fn new() -> Self {
        Self {
            available: true,
            groups: Mutex::new(BTreeMap::new()),
        }
    }

    /// A host without a registration point.
    pub fn unavailable() -> Self {
        Self {
            available: false,
            groups: Mutex::new(BTreeMap::new()),
        }
    }

    /// Attribute names published under `group`.
    pub fn attributes(&self, group: &str) -> Option<Vec<String>> {
        self.groups.lock().get(group).cloned()
    }

    /// Whether `group` is currently registered.
    pub fn has_group(&self, group: &str) -> bool {
        self.groups.lock().contains_key(group)
    }
}

impl Default for InMemoryHost {
    fn default() -> Self {
        Self::new()
    }
}

impl AttributeHost for InMemoryHost {
    fn is_available(&self) -> bool {
        self.available
    }

    fn create_group(&self, group: &AttributeGroup) -> Result<(), HostError> {
        if !self.available {
            return Err(HostError::new("registration point not available"));
        }
        let mut groups = self.groups.lock();
        if groups.contains_key(&group.name) {
            return Err(HostError::new(format!(
                "group '{}' already exists",
                group.name
            )));
        }
        groups.insert(
            group.name.clone(),
            group.names().map(str::to_string).collect(),
        );
        Ok(())
    }

    fn remove_group(&self, name: &str) {
        self.groups.lock().remove(name);
    }
}
