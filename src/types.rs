//! Core types for the HeatShield risk engine
//!
//! This module defines the data structures that flow through each stage of the
//! engine: sensor readings, per-user profiles and state, and the derived risk
//! assessment written back after every sample.

use serde::{Deserialize, Serialize};

/// A single ambient sensor sample, one per ingest event.
///
/// The `timestamp` is seconds since epoch and is the authoritative clock for
/// all decay computations downstream.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SensorReading {
    /// Site identifier (defaulted by the ingesting collaborator when absent)
    #[serde(default)]
    pub site_id: String,
    /// Device identifier
    pub device_id: String,
    /// Seconds since epoch
    #[serde(alias = "ts")]
    pub timestamp: i64,
    /// Raw ambient temperature (celsius)
    #[serde(alias = "temp_c")]
    pub temperature_c: f64,
    /// Relative humidity (percent, 0-100)
    #[serde(alias = "rh_pct")]
    pub relative_humidity_pct: f64,
}

/// Clothing insulation class
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Clothing {
    Light,
    #[default]
    Normal,
    Heavy,
}

impl Clothing {
    /// Normalized insulation factor used by the personalization model
    pub fn factor(&self) -> f64 {
        match self {
            Clothing::Light => 0.0,
            Clothing::Normal => 0.6,
            Clothing::Heavy => 1.0,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Clothing::Light => "light",
            Clothing::Normal => "normal",
            Clothing::Heavy => "heavy",
        }
    }
}

/// Named weights controlling how strongly each personalization factor shifts
/// the heat index (degrees fahrenheit per unit of normalized factor).
///
/// Every field has a documented default so that a profile always resolves to
/// concrete numeric weights, no matter how sparse the stored record is.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Coefficients {
    /// Solar exposure weight
    pub solar: f64,
    /// Wind cooling weight (applied with a negative sign)
    pub wind: f64,
    /// Exertion weight above the level-2 baseline
    pub exertion: f64,
    /// Acclimation weight (negative: acclimation reduces perceived heat)
    pub acclimation: f64,
    /// Clothing insulation weight
    pub clothing: f64,
    /// Cumulative exertion-duration load weight
    pub duration: f64,
    /// Cumulative thermal load weight
    pub thermal: f64,
    /// Dehydration penalty weight
    pub dehydration: f64,
}

impl Default for Coefficients {
    fn default() -> Self {
        Self {
            solar: 6.0,
            wind: 4.0,
            exertion: 3.0,
            acclimation: -2.0,
            clothing: 2.0,
            duration: 2.0,
            thermal: 2.0,
            dehydration: 1.0,
        }
    }
}

/// Semi-static per-user profile, one per user per site.
///
/// A missing stored profile materializes to `UserProfile::default()`; it is
/// never an error. Mutated only via explicit profile-update requests.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UserProfile {
    /// Fallback activity intensity (1-5) when the state carries none
    pub exertion_default: u8,
    /// Heat acclimation progress (0-14 days)
    pub acclimation_days: u8,
    /// Clothing insulation class
    pub clothing: Clothing,
    /// Site wind speed (m/s, capped at 4.0 for normalization)
    pub wind_speed_mps: f64,
    /// Personalization weights
    pub coefficients: Coefficients,
}

impl Default for UserProfile {
    fn default() -> Self {
        Self {
            exertion_default: 2,
            acclimation_days: 0,
            clothing: Clothing::Normal,
            wind_speed_mps: 1.0,
            coefficients: Coefficients::default(),
        }
    }
}

impl UserProfile {
    /// Load a stored profile from JSON; sparse records fill in with defaults
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

/// Risk bucket: discretization of effective heat index into actionable tiers
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum RiskBucket {
    Green,
    Yellow,
    Orange,
    Red,
}

impl RiskBucket {
    pub fn as_str(&self) -> &'static str {
        match self {
            RiskBucket::Green => "Green",
            RiskBucket::Yellow => "Yellow",
            RiskBucket::Orange => "Orange",
            RiskBucket::Red => "Red",
        }
    }
}

/// Mutable per-user state, one per user per site — the central entity.
///
/// Created all-zero on the first context update or sensor sample for a user,
/// mutated by every ingest and every explicit context-update request. Load
/// fields are always within [0,1]; `last_update_timestamp == 0` means the
/// state has never seen a sample.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UserState {
    /// Whether the user is currently shaded (settable externally)
    pub in_shade: bool,
    /// Current activity intensity (1-5); `None` falls back to the profile
    pub exertion_level: Option<u8>,
    /// Exponentially-smoothed cumulative exertion-duration load (0-1)
    pub duration_load: f64,
    /// Exponentially-smoothed cumulative thermal load (0-1)
    pub thermal_load: f64,
    /// Minutes since the last recorded hydration event
    pub since_hydration_minutes: u32,
    /// Clock of the most recent load update (seconds since epoch)
    pub last_update_timestamp: i64,
    /// Last computed effective heat index (fahrenheit)
    pub hi_nowcast_f: f64,
    /// Last computed risk bucket
    pub risk_bucket: Option<RiskBucket>,
    /// Last computed break recommendation (minutes)
    pub next_break_eta_minutes: u32,
    /// Bucket of the previous assessment, for nudge gating
    pub last_bucket: Option<RiskBucket>,
    /// When the last nudge was allowed through (seconds since epoch)
    pub last_nudge_timestamp: i64,
    /// Timestamp of the sample that produced the current outputs
    pub updated_at: i64,
}

impl UserState {
    /// Load a stored state from JSON; sparse records fill in with defaults
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

/// The subset of state written back as the per-sample result
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskAssessment {
    /// Effective personalized heat index (fahrenheit)
    pub hi_nowcast_f: f64,
    /// Risk tier
    pub risk_bucket: RiskBucket,
    /// Recommended delay until the next rest break (minutes)
    pub next_break_eta_minutes: u32,
}

/// Explicit context-update request
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ContextUpdate {
    pub in_shade: Option<bool>,
    /// Clamped to 1-5; any numeric input is accepted
    pub exertion_level: Option<i64>,
    /// Resets `since_hydration_minutes` to zero when true
    pub hydrated_now: bool,
}

/// Partial override of the named personalization weights
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct CoefficientsUpdate {
    pub solar: Option<f64>,
    pub wind: Option<f64>,
    pub exertion: Option<f64>,
    pub acclimation: Option<f64>,
    pub clothing: Option<f64>,
    pub duration: Option<f64>,
    pub thermal: Option<f64>,
    pub dehydration: Option<f64>,
}

/// Profile-update request; only recognized keys apply, anything else in the
/// incoming document is ignored rather than stored.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ProfileUpdate {
    pub exertion_default: Option<i64>,
    pub acclimation_days: Option<i64>,
    pub clothing: Option<Clothing>,
    pub wind_speed_mps: Option<f64>,
    pub coefficients: Option<CoefficientsUpdate>,
}
