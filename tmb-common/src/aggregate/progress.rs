//! Progress ratio against a target
//!
//! A target of 0 (or an absent one) means "no goal", not "0% achieved":
//! the pair is excluded from scoring rather than counted as a failing
//! ratio. This is the single interpretation used everywhere.

/// Goal-completion fraction, clamped to `[0, 1]`
///
/// Returns `None` when there is no goal to compare against.
pub fn ratio(value: f64, target: f64) -> Option<f64> {
    if target > 0.0 {
        Some((value / target).min(1.0))
    } else {
        None
    }
}

/// Display percentage: ratio x 100, rounded, clamped to `[0, 100]`
pub fn percent(value: f64, target: f64) -> Option<u8> {
    ratio(value, target).map(|r| (r * 100.0).round().clamp(0.0, 100.0) as u8)
}
