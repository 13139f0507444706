//! Per-move time budgeting.
//!
//! The host hands the engine a hard limit; the search deadline keeps a
//! fraction of it back so bookkeeping after the search never overruns.

use std::time::Duration;

use crate::engines::engine_config::MAX_WIGGLE;

/// `time_limit - time_limit * wiggle`, with `wiggle` clamped to
/// `[0, MAX_WIGGLE]`. Never zero for a non-zero limit.
pub fn deadline_budget(time_limit: Duration, wiggle: f32) -> Duration {
    if time_limit.is_zero() {
        return Duration::ZERO;
    }
    let wiggle = if wiggle.is_finite() {
        wiggle.clamp(0.0, MAX_WIGGLE)
    } else {
        0.0
    };
    time_limit
        .saturating_sub(time_limit.mul_f32(wiggle))
        .max(Duration::from_nanos(1))
}

/// Host-supplied limit if present, otherwise the configured default.
/// A zero limit from the host is treated as "not given".
pub fn resolve_time_limit(requested_ms: Option<u64>, default_ms: Option<u64>) -> Option<Duration> {
    requested_ms
        .filter(|&ms| ms > 0)
        .or(default_ms)
        .map(Duration::from_millis)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn budget_subtracts_margin() {
        let budget = deadline_budget(Duration::from_millis(1000), 0.12);
        assert!(budget >= Duration::from_millis(879) && budget <= Duration::from_millis(881));
        assert_eq!(
            deadline_budget(Duration::from_millis(500), 0.0),
            Duration::from_millis(500)
        );
    }

    #[test]
    fn margin_is_clamped() {
        let budget = deadline_budget(Duration::from_millis(1000), 5.0);
        assert!(budget >= Duration::from_millis(99) && budget <= Duration::from_millis(101));
        assert_eq!(
            deadline_budget(Duration::from_millis(10), f32::NAN),
            Duration::from_millis(10)
        );
    }

    #[test]
    fn tiny_limits_stay_positive() {
        assert!(deadline_budget(Duration::from_nanos(1), 0.9) > Duration::ZERO);
        assert_eq!(deadline_budget(Duration::ZERO, 0.5), Duration::ZERO);
    }

    #[test]
    fn host_limit_overrides_default() {
        assert_eq!(
            resolve_time_limit(Some(30), Some(1000)),
            Some(Duration::from_millis(30))
        );
        assert_eq!(
            resolve_time_limit(Some(0), Some(1000)),
            Some(Duration::from_millis(1000))
        );
        assert_eq!(resolve_time_limit(None, None), None);
    }
}
