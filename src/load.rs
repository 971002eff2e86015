//! Cumulative load tracking
//!
//! First-order exponential smoothing of two bounded stress indicators:
//! exertion-duration load and thermal load, each decaying toward a target
//! derived from the current sample. Shade and wind shorten the smoothing time
//! constant, so recovery runs faster than buildup under favorable conditions.
//! Cheap, bounded and numerically stable; not a thermoregulation model.

use crate::personalize::wind_norm;
use crate::types::UserState;

/// A single step covers at most 5 minutes, bounding the influence of any gap
pub const MAX_STEP_SECS: i64 = 300;

/// Base time constant for exertion-duration load
pub const TAU_DURATION_SECS: f64 = 600.0;

/// Base time constant for thermal load
pub const TAU_THERMAL_SECS: f64 = 1200.0;

/// Thermal target is zero below this base index (fahrenheit)
pub const THERMAL_FLOOR_F: f64 = 95.0;

/// Degrees of base index spanning the 0-1 thermal target band
pub const THERMAL_SPAN_F: f64 = 30.0;

/// Loads are rounded to this many decimal places for stable persistence
const LOAD_PRECISION: f64 = 1e4;

/// The load fields updated by one tracker step
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LoadSnapshot {
    pub duration_load: f64,
    pub thermal_load: f64,
    pub since_hydration_minutes: u32,
}

/// Standard first-order exponential smoothing toward a target
fn smooth(prev: f64, target: f64, dt_secs: f64, tau_secs: f64) -> f64 {
    let tau = tau_secs.max(1.0);
    let dt = dt_secs.max(0.0);
    let alpha = 1.0 - (-dt / tau).exp();
    prev + alpha * (target - prev)
}

fn round_load(value: f64) -> f64 {
    (value.clamp(0.0, 1.0) * LOAD_PRECISION).round() / LOAD_PRECISION
}

/// Stateful tracker for cumulative heat/exertion strain
pub struct LoadTracker;

impl LoadTracker {
    /// Advance the load state to `now` and return the updated snapshot.
    ///
    /// Elapsed time is clamped to `[1, MAX_STEP_SECS]` seconds; a sample whose
    /// timestamp precedes the stored clock decays over the 1-second floor
    /// rather than producing an invalid negative step. A state that has never
    /// been updated treats `now` as its reference clock.
    /// `last_update_timestamp` is advanced to `now` unconditionally.
    pub fn advance(
        state: &mut UserState,
        now: i64,
        base_hi_f: f64,
        exertion_level: u8,
        in_shade: bool,
        wind_speed_mps: f64,
    ) -> LoadSnapshot {
        let last = if state.last_update_timestamp == 0 {
            now
        } else {
            state.last_update_timestamp
        };
        let dt = (now - last).clamp(1, MAX_STEP_SECS);

        // Per-sample targets: level 2 is the exertion baseline, 95F the
        // thermal floor (saturating at 125F)
        let exertion_target = ((exertion_level as f64 - 2.0) / 3.0).max(0.0);
        let thermal_target = ((base_hi_f - THERMAL_FLOOR_F) / THERMAL_SPAN_F).max(0.0);

        // Shade and wind aid recovery by shortening the time constants
        let shade_norm = if in_shade { 1.0 } else { 0.0 };
        let speedup = 1.0 + 0.6 * shade_norm + 0.4 * wind_norm(wind_speed_mps);
        let tau_duration = TAU_DURATION_SECS / speedup;
        let tau_thermal = TAU_THERMAL_SECS / speedup;

        let duration_load = round_load(smooth(
            state.duration_load,
            exertion_target,
            dt as f64,
            tau_duration,
        ));
        let thermal_load = round_load(smooth(
            state.thermal_load,
            thermal_target,
            dt as f64,
            tau_thermal,
        ));

        state.duration_load = duration_load;
        state.thermal_load = thermal_load;
        state.since_hydration_minutes += (dt / 60) as u32;
        state.last_update_timestamp = now;

        LoadSnapshot {
            duration_load,
            thermal_load,
            since_hydration_minutes: state.since_hydration_minutes,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_sample_uses_minimum_step() {
        let mut state = UserState::default();
        let snapshot = LoadTracker::advance(&mut state, 1_700_000_000, 125.0, 2, false, 1.0);

        // One second of smoothing toward a full thermal target barely moves
        assert!(snapshot.thermal_load > 0.0);
        assert!(snapshot.thermal_load < 0.001);
        assert_eq!(snapshot.duration_load, 0.0);
        assert_eq!(state.last_update_timestamp, 1_700_000_000);
    }

    #[test]
    fn test_step_capped_after_downtime() {
        let mut state = UserState {
            last_update_timestamp: 1_700_000_000,
            ..UserState::default()
        };
        // One hour gap, max exertion, shade + strong wind: speedup 2.0 gives
        // tau 300s for duration, and the capped 300s step gives
        // alpha = 1 - e^-1
        LoadTracker::advance(&mut state, 1_700_003_600, 80.0, 5, true, 4.0);
        assert!((state.duration_load - 0.6321).abs() < 1e-9);
    }

    #[test]
    fn test_zero_elapsed_is_noop_at_target() {
        let mut state = UserState::default();
        let now = 1_700_000_000;
        // Exertion 1 and a cool index pin both targets at zero
        LoadTracker::advance(&mut state, now, 80.0, 1, false, 0.0);
        let first = state.clone();
        LoadTracker::advance(&mut state, now, 80.0, 1, false, 0.0);

        assert_eq!(state.duration_load, first.duration_load);
        assert_eq!(state.thermal_load, first.thermal_load);
        assert_eq!(state.duration_load, 0.0);
    }

    #[test]
    fn test_backwards_timestamp_treated_as_minimum_step() {
        let mut state = UserState {
            last_update_timestamp: 1_700_000_000,
            thermal_load: 0.5,
            ..UserState::default()
        };
        LoadTracker::advance(&mut state, 1_699_990_000, 80.0, 1, false, 0.0);
        // Clock still advances, load decays by one second's worth, not by a
        // negative step
        assert_eq!(state.last_update_timestamp, 1_699_990_000);
        assert!(state.thermal_load < 0.5);
        assert!(state.thermal_load > 0.49);
    }

    #[test]
    fn test_loads_bounded_for_any_sequence() {
        let mut state = UserState::default();
        let mut now = 1_700_000_000;
        // Wildly out-of-range inputs: the targets overshoot 1.0 by far but
        // the stored loads never leave [0,1]
        for _ in 0..50 {
            now += 300;
            LoadTracker::advance(&mut state, now, 1000.0, 5, false, 0.0);
            assert!((0.0..=1.0).contains(&state.duration_load));
            assert!((0.0..=1.0).contains(&state.thermal_load));
        }
        assert_eq!(state.thermal_load, 1.0);

        for _ in 0..50 {
            now += 300;
            LoadTracker::advance(&mut state, now, -1000.0, 1, true, 4.0);
            assert!((0.0..=1.0).contains(&state.duration_load));
            assert!((0.0..=1.0).contains(&state.thermal_load));
        }
        assert_eq!(state.thermal_load, 0.0);
    }

    #[test]
    fn test_elevated_loads_recover_monotonically() {
        let mut state = UserState {
            duration_load: 0.8,
            thermal_load: 0.8,
            last_update_timestamp: 1_700_000_000,
            ..UserState::default()
        };
        let mut now = 1_700_000_000;
        let mut prev_duration = state.duration_load;
        let mut prev_thermal = state.thermal_load;

        // Shaded, resting samples 30 minutes apart trend toward zero targets
        for _ in 0..6 {
            now += 1800;
            LoadTracker::advance(&mut state, now, 85.0, 1, true, 1.0);
            assert!(state.duration_load < prev_duration);
            assert!(state.thermal_load < prev_thermal);
            prev_duration = state.duration_load;
            prev_thermal = state.thermal_load;
        }
    }

    #[test]
    fn test_hydration_minutes_accumulate() {
        let mut state = UserState {
            last_update_timestamp: 1_700_000_000,
            ..UserState::default()
        };
        LoadTracker::advance(&mut state, 1_700_000_300, 80.0, 2, false, 1.0);
        assert_eq!(state.since_hydration_minutes, 5);
        // Capped step: a long gap still only adds 5 minutes
        LoadTracker::advance(&mut state, 1_700_007_500, 80.0, 2, false, 1.0);
        assert_eq!(state.since_hydration_minutes, 10);
        // Sub-minute steps add nothing
        LoadTracker::advance(&mut state, 1_700_007_530, 80.0, 2, false, 1.0);
        assert_eq!(state.since_hydration_minutes, 10);
    }

    #[test]
    fn test_shade_and_wind_speed_recovery() {
        let base = UserState {
            duration_load: 0.8,
            last_update_timestamp: 1_700_000_000,
            ..UserState::default()
        };
        let mut exposed = base.clone();
        let mut sheltered = base;

        LoadTracker::advance(&mut exposed, 1_700_000_300, 80.0, 1, false, 0.0);
        LoadTracker::advance(&mut sheltered, 1_700_000_300, 80.0, 1, true, 4.0);

        assert!(sheltered.duration_load < exposed.duration_load);
    }
}
