//! Session rotation policy.
//!
//! A session groups the observations made while a target is continuously
//! exposed. Once a session has accumulated the threshold number of
//! exposures the tracking moves to the next session, so long-running
//! trackings report per-session streaks instead of one unbounded series.

/// Exposures a session holds before the tracking rotates.
pub const DEFAULT_ROTATION_THRESHOLD: i64 = 25;

/// Whether a session that now holds `exposures` non-null observations is
/// due for rotation.
#[must_use]
pub fn is_due(exposures: i64, threshold: i64) -> bool {
    exposures >= threshold
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rotates_exactly_at_the_threshold() {
        assert!(!is_due(24, DEFAULT_ROTATION_THRESHOLD));
        assert!(is_due(25, DEFAULT_ROTATION_THRESHOLD));
        assert!(is_due(26, DEFAULT_ROTATION_THRESHOLD));
    }

    #[test]
    fn threshold_is_configurable() {
        assert!(is_due(3, 3));
        assert!(!is_due(2, 3));
    }
}
