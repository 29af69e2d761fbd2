//! Truncating numeric helpers shared by every derivation.
//!
//! All ratios are truncated, not rounded: [`round`] keeps two decimals and
//! [`percent`] keeps whole percentage points, both by flooring.

/// Products closer than this many ULPs to an integer are treated as that integer.
const SNAP_ULPS: f64 = 4.0;

/// Floors `x`, first snapping values that only miss an integer by float noise.
///
/// Without the snap, `0.29 * 100.0` floors to 28 and `floor(round(x) * 100)`
/// can lose a cent, which would make [`round`] non-idempotent.
fn floor_snapped(x: f64) -> f64 {
    if !x.is_finite() {
        return x;
    }
    let nearest = x.round();
    if (x - nearest).abs() <= SNAP_ULPS * f64::EPSILON * x.abs().max(1.0) {
        nearest
    } else {
        x.floor()
    }
}

/// Truncates to two decimals: `floor(x * 100) / 100`.
#[must_use]
pub fn round(x: f64) -> f64 {
    floor_snapped(x * 100.0) / 100.0
}

/// Converts a fraction to whole percentage points: `floor(x * 100)`.
#[must_use]
pub fn percent(x: f64) -> f64 {
    floor_snapped(x * 100.0)
}

/// Percentage growth from `past` to `curr`, zero when `past` is zero.
#[must_use]
pub fn growth(past: f64, curr: f64) -> f64 {
    if past == 0.0 {
        return 0.0;
    }
    percent((curr - past) / past)
}

/// Absolute change from `past` to `curr`, truncated to two decimals.
#[must_use]
pub fn delta(past: f64, curr: f64) -> f64 {
    round(curr - past)
}

/// Mean of `count` values summing to `total`, truncated to two decimals.
#[must_use]
pub fn mean(total: f64, count: usize) -> f64 {
    floor_snapped(total * 100.0 / count as f64) / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_truncates() {
        assert_eq!(round(24.055), 24.05);
        assert_eq!(round(1.4615), 1.46);
        assert_eq!(round(-1.001), -1.01);
        assert_eq!(round(0.29), 0.29);
    }

    #[test]
    fn test_round_is_idempotent() {
        let samples = [
            0.0,
            0.29,
            24.05,
            -10485.53,
            123_456_789.987,
            -987_654.321_5,
            1.0e12 + 0.37,
            3.0e-7,
        ];
        for x in samples {
            assert_eq!(round(round(x)), round(x), "round not idempotent for {}", x);
        }
        for k in -2_000_000..2_000_000 {
            let x = f64::from(k) / 100.0;
            assert_eq!(round(round(x)), round(x), "round not idempotent for {}", x);
        }
    }

    #[test]
    fn test_percent() {
        assert_eq!(percent(0.395), 39.0);
        assert_eq!(percent(0.58199), 58.0);
        assert_eq!(percent(-0.001), -1.0);
    }

    #[test]
    fn test_non_finite_passthrough() {
        assert!(round(f64::NAN).is_nan());
        assert_eq!(round(f64::INFINITY), f64::INFINITY);
        assert_eq!(percent(f64::NEG_INFINITY), f64::NEG_INFINITY);
    }

    #[test]
    fn test_growth_and_delta() {
        assert_eq!(growth(0.0, 10.0), 0.0);
        assert_eq!(growth(100.0, 110.0), 10.0);
        assert_eq!(growth(100.0, 95.5), -5.0);
        assert_eq!(delta(24.05, 26.1), 2.05);
        assert_eq!(delta(0.5, 0.5), 0.0);
    }

    #[test]
    fn test_mean() {
        assert_eq!(mean(30.0, 3), 10.0);
        assert_eq!(mean(0.75, 3), 0.25);
        assert_eq!(mean(10.0, 3), 3.33);
    }
}
