//! Numeric rules for ratios and thresholds

/// Floor applied to weight denominators so an empty roster yields a ratio
/// near zero instead of a division by zero.
pub const WEIGHT_EPSILON: f64 = 1e-9;

/// Tolerance for `ratio >= threshold`, so that 6/10 against 0.6 ties as met.
pub const COMPARISON_TOLERANCE: f64 = 1e-9;

/// Whether `ratio` reaches `threshold` (ties pass)
pub fn reaches(ratio: f64, threshold: f64) -> bool {
    ratio + COMPARISON_TOLERANCE >= threshold
}

/// Clamp a configured threshold into `[0, 1]`; NaN becomes 1 (unreachable).
pub fn clamp_threshold(threshold: f64) -> f64 {
    if threshold.is_nan() {
        1.0
    } else {
        threshold.clamp(0.0, 1.0)
    }
}

pub fn floor_weight(denominator: f64) -> f64 {
    if denominator.is_nan() || denominator < WEIGHT_EPSILON {
        WEIGHT_EPSILON
    } else {
        denominator
    }
}

pub fn floor_count(denominator: u64) -> f64 {
    denominator.max(1) as f64
}

/// Render a ratio as a percentage with two decimals (e.g. `66.67%`)
pub fn percent(ratio: f64) -> String {
    format!("{:.2}%", ratio * 100.0)
}

/// Render a weight without trailing zeros (e.g. `4`, `2.5`)
pub fn weight(value: f64) -> String {
    let rounded = (value * 10_000.0).round() / 10_000.0;
    if rounded.fract() == 0.0 {
        format!("{:.0}", rounded)
    } else {
        let text = format!("{:.4}", rounded);
        text.trim_end_matches('0').to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reaches_ties() {
        assert!(reaches(6.0 / 10.0, 0.6));
        assert!(reaches(0.5, 0.5));
        assert!(!reaches(0.4, 0.5));
        assert!(reaches(0.0, 0.0));
    }

    #[test]
    fn test_clamp_threshold() {
        assert_eq!(clamp_threshold(1.5), 1.0);
        assert_eq!(clamp_threshold(-0.2), 0.0);
        assert_eq!(clamp_threshold(f64::NAN), 1.0);
        assert_eq!(clamp_threshold(0.66), 0.66);
    }

    #[test]
    fn test_floors() {
        assert_eq!(floor_weight(0.0), WEIGHT_EPSILON);
        assert_eq!(floor_weight(3.5), 3.5);
        assert_eq!(floor_count(0), 1.0);
        assert_eq!(floor_count(10), 10.0);
    }

    #[test]
    fn test_formatting() {
        assert_eq!(percent(2.0 / 3.0), "66.67%");
        assert_eq!(weight(4.0), "4");
        assert_eq!(weight(2.5), "2.5");
        assert_eq!(weight(1.0 / 3.0), "0.3333");
    }
}
