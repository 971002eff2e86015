//! Personalization model
//!
//! Turns the base heat index into a per-user estimate by adding weighted,
//! normalized contributions for sun, wind, exertion, acclimation and
//! clothing. All default-resolution happens once, up front, in
//! [`ResolvedContext::materialize`]; the formulas below never need defensive
//! lookups.

use crate::config::SolarCurve;
use crate::solar::solar_intensity;
use crate::types::{Coefficients, UserProfile, UserState};

/// Wind speed saturates at 4 m/s for normalization
pub const WIND_CAP_MPS: f64 = 4.0;

/// Acclimation saturates at 14 days
pub const ACCLIMATION_CAP_DAYS: u8 = 14;

/// Normalized wind contribution (0-1)
pub(crate) fn wind_norm(wind_speed_mps: f64) -> f64 {
    wind_speed_mps.clamp(0.0, WIND_CAP_MPS) / WIND_CAP_MPS
}

/// Clamp any numeric exertion input to the valid 1-5 band
pub(crate) fn clamp_exertion(level: i64) -> u8 {
    level.clamp(1, 5) as u8
}

/// Profile and state resolved to concrete values for one request.
///
/// Built once per sample or context update so downstream formulas work with
/// plain numbers.
#[derive(Debug, Clone)]
pub struct ResolvedContext {
    pub in_shade: bool,
    /// Activity intensity, already clamped to 1-5
    pub exertion_level: u8,
    pub acclimation_days: u8,
    pub wind_speed_mps: f64,
    pub clothing_factor: f64,
    pub coefficients: Coefficients,
}

impl ResolvedContext {
    /// Resolve a profile/state pair into concrete values.
    ///
    /// A state without an explicit exertion level falls back to
    /// `profile.exertion_default`.
    pub fn materialize(profile: &UserProfile, state: &UserState) -> Self {
        let exertion = state.exertion_level.unwrap_or(profile.exertion_default);
        Self {
            in_shade: state.in_shade,
            exertion_level: clamp_exertion(exertion as i64),
            acclimation_days: profile.acclimation_days.min(ACCLIMATION_CAP_DAYS),
            wind_speed_mps: profile.wind_speed_mps.max(0.0),
            clothing_factor: profile.clothing.factor(),
            coefficients: profile.coefficients.clone(),
        }
    }
}

/// Personalized heat index: base index plus the additive per-factor delta.
///
/// Not bounded a priori; the engine clamps the combined result (see
/// `engine`).
pub fn personalized_hi(
    base_hi_f: f64,
    timestamp: i64,
    ctx: &ResolvedContext,
    curve: &SolarCurve,
) -> f64 {
    let c = &ctx.coefficients;

    let solar = solar_intensity(timestamp, ctx.in_shade, curve);
    let exertion_norm = (ctx.exertion_level as f64 - 2.0) / 3.0;
    let acclim_norm = ctx.acclimation_days as f64 / ACCLIMATION_CAP_DAYS as f64;

    let delta_f = c.solar * solar - c.wind * wind_norm(ctx.wind_speed_mps)
        + c.exertion * exertion_norm
        + c.acclimation * acclim_norm
        + c.clothing * ctx.clothing_factor;

    base_hi_f + delta_f
}
