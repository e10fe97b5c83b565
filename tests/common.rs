//! Common test utilities.
//!
//! This module contains shared helpers for integration tests.
//! Import with `mod common;` in test files.

#![allow(dead_code)]

use clusterfreq::error::CollaboratorError;
use clusterfreq::{
    BoostIntent, BoostSignal, ClusterId, Collaborators, FreqConstraints, FrequencyBound,
    FrequencyTable, LimitConsumer, LimitKind,
};
use parking_lot::Mutex;
use std::io::Write;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tempfile::NamedTempFile;

/// Frequencies used throughout the scenarios, in kHz.
pub const LOW: i32 = 300_000;
pub const MID: i32 = 600_000;
pub const HIGH: i32 = 900_000;

pub const LITTLE: ClusterId = ClusterId(0);
pub const BIG: ClusterId = ClusterId(1);

/// Records every propagated call; optionally fails them.
#[derive(Default)]
pub struct RecordingCollaborator {
    pub intents: Mutex<Vec<BoostIntent>>,
    pub limits: Mutex<Vec<(LimitKind, Vec<FrequencyBound>)>>,
    pub fail: AtomicBool,
}

impl RecordingCollaborator {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn failing() -> Arc<Self> {
        let recorder = Self::default();
        recorder.fail.store(true, Ordering::SeqCst);
        Arc::new(recorder)
    }

    pub fn intents(&self) -> Vec<BoostIntent> {
        self.intents.lock().clone()
    }

    pub fn limit_calls(&self) -> Vec<(LimitKind, Vec<FrequencyBound>)> {
        self.limits.lock().clone()
    }

    pub fn last_limits(&self) -> Option<Vec<FrequencyBound>> {
        self.limits.lock().last().map(|(_, bounds)| bounds.clone())
    }

    fn result(&self, collaborator: &'static str) -> Result<(), CollaboratorError> {
        if self.fail.load(Ordering::SeqCst) {
            return Err(CollaboratorError::new(collaborator, "injected failure"));
        }
        Ok(())
    }
}

impl BoostSignal for RecordingCollaborator {
    fn notify_boost(&self, intent: BoostIntent) -> Result<(), CollaboratorError> {
        self.intents.lock().push(intent);
        self.result("boost")
    }
}

impl LimitConsumer for RecordingCollaborator {
    fn apply_limits(
        &self,
        kind: LimitKind,
        bounds: &[FrequencyBound],
    ) -> Result<(), CollaboratorError> {
        self.limits.lock().push((kind, bounds.to_vec()));
        self.result("limits")
    }
}

/// Collaborators that record into `recorder`, boost hook included.
pub fn recording(recorder: &Arc<RecordingCollaborator>) -> Collaborators {
    Collaborators::new(recorder.clone()).with_boost(recorder.clone())
}

/// The standard scenario table {300000, 600000, 900000}.
pub fn scenario_table() -> FrequencyTable {
    FrequencyTable::new([LOW, MID, HIGH])
}

/// Two clusters; cluster 0 has the scenario table, cluster 1 has none.
pub fn two_cluster_manager() -> (FreqConstraints, Arc<RecordingCollaborator>) {
    let recorder = RecordingCollaborator::new();
    let manager = FreqConstraints::new(2, recording(&recorder)).expect("allocate store");
    manager
        .register_table(LITTLE, scenario_table())
        .expect("register table");
    (manager, recorder)
}

pub fn bound(min: i32, max: i32) -> FrequencyBound {
    FrequencyBound { min, max }
}

/// Write `content` to a temporary config file.
pub fn config_file(content: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().expect("Failed to create temp file");
    file.write_all(content.as_bytes())
        .expect("Failed to write config");
    file
}

/// Two-cluster config with static tables on both clusters.
pub const REFERENCE_TOML: &str = r#"
[attributes]
group = "mtk"

[[topology.clusters]]
name = "little"
first_cpu = 0
frequencies = [300000, 600000, 900000]

[[topology.clusters]]
name = "big"
first_cpu = 6
frequencies = [500000, 1000000, 1500000]
"#;
