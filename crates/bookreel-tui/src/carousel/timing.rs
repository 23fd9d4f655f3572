//! L4 Atomic Layer: Time calculation utilities for carousel transitions
//!
//! Pure functions for linear progress and interpolation.

use std::time::Duration;

/// Linear progress (0.0 to 1.0) of `elapsed` within `duration`
///
/// A zero duration is complete immediately.
#[inline]
pub fn progress(elapsed: Duration, duration: Duration) -> f64 {
    if duration.is_zero() {
        return 1.0;
    }
    let ratio = elapsed.as_secs_f64() / duration.as_secs_f64();
    ratio.clamp(0.0, 1.0)
}

/// Time left of `duration` after `elapsed`
#[inline]
pub fn remaining(elapsed: Duration, duration: Duration) -> Duration {
    duration.saturating_sub(elapsed)
}

/// Linear interpolation between two values
#[inline]
pub fn lerp(from: f64, to: f64, t: f64) -> f64 {
    from + (to - from) * t
}

/// Linear interpolation for column offsets
#[inline]
pub fn lerp_u16(from: u16, to: u16, t: f64) -> u16 {
    lerp(from as f64, to as f64, t).round() as u16
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_progress() {
        let total = Duration::from_millis(3000);
        assert!((progress(Duration::ZERO, total) - 0.0).abs() < 0.001);
        assert!((progress(Duration::from_millis(1500), total) - 0.5).abs() < 0.001);
        assert!((progress(Duration::from_millis(9000), total) - 1.0).abs() < 0.001);
    }

    #[test]
    fn test_progress_zero_duration() {
        assert!((progress(Duration::ZERO, Duration::ZERO) - 1.0).abs() < 0.001);
    }

    #[test]
    fn test_remaining_saturates() {
        let total = Duration::from_millis(3000);
        assert_eq!(remaining(Duration::from_millis(1000), total), Duration::from_millis(2000));
        assert_eq!(remaining(Duration::from_millis(4000), total), Duration::ZERO);
    }

    #[test]
    fn test_lerp_u16() {
        assert_eq!(lerp_u16(0, 40, 0.0), 0);
        assert_eq!(lerp_u16(0, 40, 0.5), 20);
        assert_eq!(lerp_u16(0, 40, 1.0), 40);
    }
}
