//! Solar load model
//!
//! Maps a timestamp onto a triangular day curve: zero outside the active
//! window, 1.0 at the peak hour, linear shoulders in between. Shade
//! attenuates the result by a fixed factor. This is a deliberate
//! approximation, not an astronomical computation.

use crate::config::SolarCurve;
use chrono::{DateTime, Timelike};

/// Normalized solar intensity (0-1) at `timestamp` (seconds since epoch).
pub fn solar_intensity(timestamp: i64, in_shade: bool, curve: &SolarCurve) -> f64 {
    let Some(utc) = DateTime::from_timestamp(timestamp, 0) else {
        // Timestamps outside chrono's representable range carry no sun
        return 0.0;
    };

    // Whole-hour local time via the fixed regional offset
    let hour = (utc.hour() as i32 + curve.hour_offset).rem_euclid(24);
    let distance = (hour - curve.peak_hour).abs() as f64;

    let mut value = (1.0 - distance / curve.half_width_hours).max(0.0);
    if in_shade {
        value *= curve.shade_attenuation;
    }
    value.clamp(0.0, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn ts(hour: u32, minute: u32) -> i64 {
        Utc.with_ymd_and_hms(2024, 7, 15, hour, minute, 0)
            .unwrap()
            .timestamp()
    }

    #[test]
    fn test_peak_at_adjusted_one_pm() {
        // 17:00 UTC is 13:00 local under the default -4 offset
        let curve = SolarCurve::default();
        assert_eq!(solar_intensity(ts(17, 0), false, &curve), 1.0);
        assert_eq!(solar_intensity(ts(17, 59), false, &curve), 1.0);
    }

    #[test]
    fn test_linear_shoulders() {
        let curve = SolarCurve::default();
        // 15:00 UTC -> 11:00 local, two hours from peak
        let value = solar_intensity(ts(15, 0), false, &curve);
        assert!((value - (1.0 - 2.0 / 3.0)).abs() < 1e-9);
        // 19:00 UTC -> 15:00 local, symmetric shoulder
        let after = solar_intensity(ts(19, 0), false, &curve);
        assert!((value - after).abs() < 1e-9);
    }

    #[test]
    fn test_zero_outside_window() {
        let curve = SolarCurve::default();
        // 03:00 UTC -> 23:00 local
        assert_eq!(solar_intensity(ts(3, 0), false, &curve), 0.0);
        // 20:00 UTC -> 16:00 local, exactly the window edge
        assert_eq!(solar_intensity(ts(20, 0), false, &curve), 0.0);
    }

    #[test]
    fn test_shade_attenuates() {
        let curve = SolarCurve::default();
        let value = solar_intensity(ts(17, 0), true, &curve);
        assert!((value - 0.3).abs() < 1e-9);
    }

    #[test]
    fn test_custom_curve() {
        let curve = SolarCurve {
            hour_offset: -7,
            peak_hour: 12,
            half_width_hours: 4.0,
            shade_attenuation: 0.5,
        };
        // 19:00 UTC -> 12:00 local under -7
        assert_eq!(solar_intensity(ts(19, 0), false, &curve), 1.0);
        let shoulder = solar_intensity(ts(21, 0), false, &curve);
        assert!((shoulder - 0.5).abs() < 1e-9);
    }

    #[test]
    fn test_out_of_range_timestamp() {
        let curve = SolarCurve::default();
        assert_eq!(solar_intensity(i64::MAX, false, &curve), 0.0);
    }
}
