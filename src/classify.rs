//! Risk classification
//!
//! Buckets the effective heat index into severity tiers and maps each tier to
//! a recommended rest-break delay. Thresholds are inclusive lower bounds,
//! evaluated top-down.

use crate::types::RiskBucket;

/// Effective index at or above this is Red
pub const RED_THRESHOLD_F: f64 = 125.0;

/// Effective index at or above this is Orange
pub const ORANGE_THRESHOLD_F: f64 = 103.0;

/// Effective index at or above this is Yellow
pub const YELLOW_THRESHOLD_F: f64 = 90.0;

impl RiskBucket {
    /// Classify an effective heat index (fahrenheit)
    pub fn from_hi(hi_eff_f: f64) -> Self {
        if hi_eff_f >= RED_THRESHOLD_F {
            RiskBucket::Red
        } else if hi_eff_f >= ORANGE_THRESHOLD_F {
            RiskBucket::Orange
        } else if hi_eff_f >= YELLOW_THRESHOLD_F {
            RiskBucket::Yellow
        } else {
            RiskBucket::Green
        }
    }

    /// Recommended delay until the next rest break, in minutes
    pub fn break_eta_minutes(&self) -> u32 {
        match self {
            RiskBucket::Red => 0,
            RiskBucket::Orange => 12,
            RiskBucket::Yellow | RiskBucket::Green => 30,
        }
    }
}

/// Bucket plus break recommendation in one call
pub fn classify(hi_eff_f: f64) -> (RiskBucket, u32) {
    let bucket = RiskBucket::from_hi(hi_eff_f);
    (bucket, bucket.break_eta_minutes())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixed_boundaries() {
        assert_eq!(RiskBucket::from_hi(89.99), RiskBucket::Green);
        assert_eq!(RiskBucket::from_hi(90.0), RiskBucket::Yellow);
        assert_eq!(RiskBucket::from_hi(102.99), RiskBucket::Yellow);
        assert_eq!(RiskBucket::from_hi(103.0), RiskBucket::Orange);
        assert_eq!(RiskBucket::from_hi(124.99), RiskBucket::Orange);
        assert_eq!(RiskBucket::from_hi(125.0), RiskBucket::Red);
    }

    #[test]
    fn test_monotonic_in_index() {
        let mut prev = RiskBucket::from_hi(40.0);
        let mut hi = 40.0;
        while hi <= 150.0 {
            let bucket = RiskBucket::from_hi(hi);
            assert!(bucket >= prev, "risk decreased at hi_eff={hi}");
            prev = bucket;
            hi += 0.25;
        }
    }

    #[test]
    fn test_break_etas() {
        assert_eq!(classify(130.0), (RiskBucket::Red, 0));
        assert_eq!(classify(110.0), (RiskBucket::Orange, 12));
        assert_eq!(classify(95.0), (RiskBucket::Yellow, 30));
        assert_eq!(classify(70.0), (RiskBucket::Green, 30));
    }

    #[test]
    fn test_extremes() {
        assert_eq!(RiskBucket::from_hi(f64::MIN), RiskBucket::Green);
        assert_eq!(RiskBucket::from_hi(f64::MAX), RiskBucket::Red);
    }
}
