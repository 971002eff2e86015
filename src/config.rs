//! Engine configuration
//!
//! Configuration is an explicit struct constructed once at process start and
//! passed by reference into the engine's entry points. The core never reads
//! ambient environment state.

use serde::{Deserialize, Serialize};

/// Default site identifier used when a sample carries none
pub const DEFAULT_SITE_ID: &str = "tampa_usf_valet";

/// Seconds between allowed nudges for an unchanged risk tier
pub const DEFAULT_NUDGE_COOLDOWN_SECS: i64 = 600;

/// Parameters of the triangular solar day curve.
///
/// Local time of day is approximated by applying a fixed hour offset to the
/// UTC hour. Not true solar time and no DST handling; the approximation is
/// the contract.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SolarCurve {
    /// Offset added to the UTC hour to reach local time (e.g. -4 for ET summer)
    pub hour_offset: i32,
    /// Local hour at which solar intensity peaks
    pub peak_hour: i32,
    /// Hours from peak to zero intensity on each side
    pub half_width_hours: f64,
    /// Multiplier applied when the user reports being in shade
    pub shade_attenuation: f64,
}

impl Default for SolarCurve {
    fn default() -> Self {
        Self {
            hour_offset: -4,
            peak_hour: 13,
            half_width_hours: 3.0,
            shade_attenuation: 0.3,
        }
    }
}

/// Process-wide engine configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Site identifier applied to samples that carry none
    pub site_id: String,
    /// Solar day-curve parameters
    pub solar: SolarCurve,
    /// Minimum seconds between nudges for an unchanged risk tier
    pub nudge_cooldown_secs: i64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            site_id: DEFAULT_SITE_ID.to_string(),
            solar: SolarCurve::default(),
            nudge_cooldown_secs: DEFAULT_NUDGE_COOLDOWN_SECS,
        }
    }
}

impl EngineConfig {
    /// Load configuration from JSON; absent fields keep their defaults
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}
