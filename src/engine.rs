//! Engine orchestration
//!
//! This module provides the public API of the HeatShield core. Each incoming
//! sample is processed end-to-end by one call: base heat index, load
//! advancement, personalization, combination and clamping, classification,
//! nudge gating. The engine performs no I/O; the caller resolves profile and
//! state from storage beforehand and persists the returned values.

use crate::classify::classify;
use crate::config::EngineConfig;
use crate::heat_index::{celsius_to_fahrenheit, heat_index_f};
use crate::load::LoadTracker;
use crate::nudge::NudgeGate;
use crate::personalize::{clamp_exertion, personalized_hi, ResolvedContext};
use crate::types::{
    ContextUpdate, ProfileUpdate, RiskAssessment, SensorReading, UserProfile, UserState,
};
use tracing::debug;

/// The personalized estimate may exceed the base index by at most this many
/// degrees fahrenheit, and may never fall below ambient temperature.
pub const PERSONALIZATION_CEILING_F: f64 = 12.0;

/// One hour without hydration saturates the dehydration penalty
pub const DEHYDRATION_SATURATION_MINUTES: f64 = 60.0;

fn round3(value: f64) -> f64 {
    (value * 1e3).round() / 1e3
}

/// Everything produced by one sample: the state to persist, the assessment,
/// the base index for the reading record, and the nudge decision.
#[derive(Debug, Clone)]
pub struct SampleOutcome {
    pub state: UserState,
    pub assessment: RiskAssessment,
    /// Unpersonalized heat index, stored alongside the raw reading
    pub hi_base_f: f64,
    pub should_nudge: bool,
}

/// The personalized heat risk engine.
///
/// Purely computational and single-threaded per invocation; holds only
/// configuration, never per-user state.
#[derive(Debug, Clone, Default)]
pub struct RiskEngine {
    config: EngineConfig,
}

impl RiskEngine {
    pub fn new(config: EngineConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Process one sensor sample against the user's profile and state.
    ///
    /// Total for finite numeric inputs: out-of-range values are clamped, a
    /// default profile/state is valid, and an assessment is always produced.
    pub fn process_sample(
        &self,
        reading: &SensorReading,
        profile: &UserProfile,
        mut state: UserState,
    ) -> SampleOutcome {
        let now = reading.timestamp;
        let temp_f = celsius_to_fahrenheit(reading.temperature_c);
        let hi_base_f = heat_index_f(temp_f, reading.relative_humidity_pct);

        let ctx = ResolvedContext::materialize(profile, &state);

        let loads = LoadTracker::advance(
            &mut state,
            now,
            hi_base_f,
            ctx.exertion_level,
            ctx.in_shade,
            ctx.wind_speed_mps,
        );

        let mut hi_eff = personalized_hi(hi_base_f, now, &ctx, &self.config.solar);

        // Cumulative penalties on top of the instantaneous estimate
        let hydration_norm =
            (loads.since_hydration_minutes as f64 / DEHYDRATION_SATURATION_MINUTES).min(1.0);
        hi_eff += ctx.coefficients.duration * loads.duration_load
            + ctx.coefficients.thermal * loads.thermal_load
            + ctx.coefficients.dehydration * hydration_norm;

        // Bound personalization and load terms to plausible limits
        hi_eff = hi_eff.min(hi_base_f + PERSONALIZATION_CEILING_F).max(temp_f);
        hi_eff = round3(hi_eff);

        let (bucket, break_eta) = classify(hi_eff);
        let should_nudge =
            NudgeGate::should_nudge(&mut state, bucket, now, self.config.nudge_cooldown_secs);

        debug!(
            device_id = %reading.device_id,
            hi_base_f,
            hi_eff,
            bucket = bucket.as_str(),
            should_nudge,
            "sample processed"
        );

        state.hi_nowcast_f = hi_eff;
        state.risk_bucket = Some(bucket);
        state.next_break_eta_minutes = break_eta;
        state.last_bucket = Some(bucket);
        state.updated_at = now;

        SampleOutcome {
            assessment: RiskAssessment {
                hi_nowcast_f: hi_eff,
                risk_bucket: bucket,
                next_break_eta_minutes: break_eta,
            },
            state,
            hi_base_f,
            should_nudge,
        }
    }

    /// Apply an explicit context update to the state.
    ///
    /// Out-of-range exertion is clamped, never rejected; `hydrated_now`
    /// resets the hydration clock.
    pub fn update_context(&self, mut state: UserState, update: &ContextUpdate) -> UserState {
        if let Some(in_shade) = update.in_shade {
            state.in_shade = in_shade;
        }
        if let Some(level) = update.exertion_level {
            state.exertion_level = Some(clamp_exertion(level));
        }
        if update.hydrated_now {
            state.since_hydration_minutes = 0;
        }
        state
    }

    /// Merge a partial profile update; only recognized keys apply, and a
    /// coefficient override touches only the named weights.
    pub fn update_profile(&self, mut profile: UserProfile, update: &ProfileUpdate) -> UserProfile {
        if let Some(level) = update.exertion_default {
            profile.exertion_default = clamp_exertion(level);
        }
        if let Some(days) = update.acclimation_days {
            profile.acclimation_days = days.clamp(0, 14) as u8;
        }
        if let Some(clothing) = update.clothing {
            profile.clothing = clothing;
        }
        if let Some(wind) = update.wind_speed_mps {
            profile.wind_speed_mps = wind.max(0.0);
        }
        if let Some(coefficients) = &update.coefficients {
            let c = &mut profile.coefficients;
            if let Some(v) = coefficients.solar {
                c.solar = v;
            }
            if let Some(v) = coefficients.wind {
                c.wind = v;
            }
            if let Some(v) = coefficients.exertion {
                c.exertion = v;
            }
            if let Some(v) = coefficients.acclimation {
                c.acclimation = v;
            }
            if let Some(v) = coefficients.clothing {
                c.clothing = v;
            }
            if let Some(v) = coefficients.duration {
                c.duration = v;
            }
            if let Some(v) = coefficients.thermal {
                c.thermal = v;
            }
            if let Some(v) = coefficients.dehydration {
                c.dehydration = v;
            }
        }
        profile
    }
}
