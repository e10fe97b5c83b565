//! Logging collaborators.
//!
//! Used by the binary when no platform limit consumer or scheduler is wired in:
//! every propagated change is emitted as a structured log event.

use crate::core::error::CollaboratorError;
use crate::freq::bound::FrequencyBound;
use crate::freq::propagation::{BoostIntent, BoostSignal, LimitConsumer, LimitKind};

/// Boost hook that logs the intent.
#[derive(Debug, Default)]
pub struct TracingBoostSignal;

impl BoostSignal for TracingBoostSignal {
    fn notify_boost(&self, intent: BoostIntent) -> Result<(), CollaboratorError> {
        tracing::info!(%intent, "sched boost");
        Ok(())
    }
}

/// Limit consumer that logs the full bound vector.
#[derive(Debug, Default)]
pub struct TracingLimitConsumer;

impl LimitConsumer for TracingLimitConsumer {
    fn apply_limits(
        &self,
        kind: LimitKind,
        bounds: &[FrequencyBound],
    ) -> Result<(), CollaboratorError> {
        let rendered = bounds
            .iter()
            .map(|b| format!("[{}, {}]", b.min, b.max))
            .collect::<Vec<_>>()
            .join(" ");
        tracing::info!(%kind, clusters = bounds.len(), bounds = %rendered, "user limits updated");
        Ok(())
    }
}
