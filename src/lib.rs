//! HeatShield - Personalized heat-stress risk engine for ambient sensor readings
//!
//! HeatShield turns a single (temperature, humidity, timestamp) sample plus a
//! mutable per-user state into an updated state and a risk assessment through
//! a deterministic pipeline: base heat index → cumulative load advancement →
//! personalization → combination and clamping → risk bucketing → nudge
//! gating.
//!
//! The engine performs no I/O. Storage of profiles/state, transport framing
//! and alert delivery are collaborators; the [`nudge::NudgeSink`] trait is
//! the seam for the outbound alert channel.

pub mod classify;
pub mod config;
pub mod engine;
pub mod error;
pub mod heat_index;
pub mod load;
pub mod nudge;
pub mod personalize;
pub mod solar;
pub mod types;

pub use config::{EngineConfig, SolarCurve};
pub use engine::{RiskEngine, SampleOutcome};
pub use error::EngineError;
pub use nudge::NudgeSink;
pub use types::{
    Clothing, Coefficients, ContextUpdate, ProfileUpdate, RiskAssessment, RiskBucket,
    SensorReading, UserProfile, UserState,
};

/// Engine version embedded in CLI output
pub const ENGINE_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Producer name for emitted records
pub const PRODUCER_NAME: &str = "heatshield";
