//! Nudge gating and best-effort delivery
//!
//! Only Orange and Red buckets are nudge-eligible, and repeat alerts for an
//! unchanged tier are suppressed inside a cooldown window. Delivery goes
//! through the [`NudgeSink`] collaborator seam and is never load-bearing: a
//! failing channel is logged and the rest of the pipeline proceeds.

use crate::error::EngineError;
use crate::types::{RiskBucket, UserState};
use tracing::warn;

/// Subject line for outbound alerts
pub const NUDGE_SUBJECT: &str = "Heat alert";

/// Outbound alert channel (publish-to-topic collaborator)
pub trait NudgeSink {
    fn publish(&mut self, subject: &str, message: &str) -> Result<(), EngineError>;
}

/// Stateful nudge decision with suppression
pub struct NudgeGate;

impl NudgeGate {
    /// Decide whether an alert fires for `new_bucket` at `now`.
    ///
    /// Suppresses when the bucket matches the previous assessment's bucket
    /// and fewer than `cooldown_secs` have passed since the last nudge.
    /// Stamps `last_nudge_timestamp` when it returns true; the caller records
    /// `last_bucket` afterwards, once the assessment is final.
    pub fn should_nudge(
        state: &mut UserState,
        new_bucket: RiskBucket,
        now: i64,
        cooldown_secs: i64,
    ) -> bool {
        if !matches!(new_bucket, RiskBucket::Orange | RiskBucket::Red) {
            return false;
        }
        let unchanged = state.last_bucket == Some(new_bucket);
        if unchanged && now - state.last_nudge_timestamp < cooldown_secs {
            return false;
        }
        state.last_nudge_timestamp = now;
        true
    }
}

/// Alert copy for a nudge-eligible bucket
pub fn nudge_message(bucket: RiskBucket) -> Option<&'static str> {
    match bucket {
        RiskBucket::Red => Some("HeatShield: RED risk. Seek shade and rest now. Hydrate."),
        RiskBucket::Orange => {
            Some("HeatShield: ORANGE risk. Hydrate now; plan 5-min cool-down in ~12 min.")
        }
        RiskBucket::Green | RiskBucket::Yellow => None,
    }
}

/// Publish a nudge through the sink, best-effort.
///
/// A delivery error is logged and swallowed; state persistence and the risk
/// assessment must not depend on the alert channel. Returns whether the
/// publish succeeded.
pub fn deliver(sink: &mut dyn NudgeSink, bucket: RiskBucket) -> bool {
    let Some(message) = nudge_message(bucket) else {
        return false;
    };
    match sink.publish(NUDGE_SUBJECT, message) {
        Ok(()) => true,
        Err(e) => {
            warn!(bucket = bucket.as_str(), error = %e, "nudge delivery failed");
            false
        }
    }
}
