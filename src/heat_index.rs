//! Base heat index computation
//!
//! Steadman-style polynomial regression over temperature (fahrenheit) and
//! relative humidity (percent). Pure and total: any finite input produces a
//! deterministic output; range validation belongs to the ingest collaborator.

/// Convert celsius to fahrenheit
pub fn celsius_to_fahrenheit(celsius: f64) -> f64 {
    celsius * 9.0 / 5.0 + 32.0
}

/// Base heat index (fahrenheit) from ambient temperature and humidity.
///
/// Published regression coefficients; a weighted sum of T, R, T*R, T^2, R^2,
/// T^2*R, T*R^2 and T^2*R^2.
pub fn heat_index_f(temp_f: f64, relative_humidity: f64) -> f64 {
    let t = temp_f;
    let r = relative_humidity;

    -42.379 + 2.04901523 * t + 10.14333127 * r
        - 0.22475541 * t * r
        - 6.83783e-3 * t * t
        - 5.481717e-2 * r * r
        + 1.22874e-3 * t * t * r
        + 8.5282e-4 * t * r * r
        - 1.99e-6 * t * t * r * r
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_celsius_conversion() {
        assert!((celsius_to_fahrenheit(35.0) - 95.0).abs() < 1e-9);
        assert!((celsius_to_fahrenheit(0.0) - 32.0).abs() < 1e-9);
        assert!((celsius_to_fahrenheit(-40.0) + 40.0).abs() < 1e-9);
    }

    #[test]
    fn test_known_values() {
        // 95F / 50% RH
        assert!((heat_index_f(95.0, 50.0) - 105.2158).abs() < 0.01);
        // 95F / 70% RH
        assert!((heat_index_f(95.0, 70.0) - 122.6131).abs() < 0.01);
        // At moderate conditions the index sits near the air temperature
        assert!((heat_index_f(80.0, 40.0) - 79.93).abs() < 0.05);
    }

    #[test]
    fn test_deterministic() {
        let a = heat_index_f(101.3, 62.8);
        let b = heat_index_f(101.3, 62.8);
        assert_eq!(a, b);
    }

    #[test]
    fn test_monotonic_in_temperature_at_zero_humidity() {
        // With R = 0 the polynomial reduces to a concave quadratic in T whose
        // apex is far above any physical temperature, so the index strictly
        // increases with T through the working range.
        let mut prev = heat_index_f(80.0, 0.0);
        let mut t = 81.0;
        while t <= 130.0 {
            let current = heat_index_f(t, 0.0);
            assert!(current > prev, "index not increasing at T={t}");
            prev = current;
            t += 1.0;
        }
    }

    #[test]
    fn test_absurd_inputs_still_finite() {
        assert!(heat_index_f(500.0, 250.0).is_finite());
        assert!(heat_index_f(-200.0, -50.0).is_finite());
    }
}
