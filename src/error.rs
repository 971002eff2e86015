//! Error types for the HeatShield engine
//!
//! The risk computation itself is total: for any finite numeric input it
//! always produces an assessment. Errors arise only at the seams — malformed
//! stored records and the alert channel.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("Invalid JSON: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("Failed to parse record: {0}")]
    ParseError(String),

    #[error("Nudge delivery failed: {0}")]
    Delivery(String),
}
