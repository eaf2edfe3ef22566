use std::time::Duration;

const INITIAL_INTERVAL_MILLIS: u64 = 400;
const INTERVAL_STEP_MILLIS: u64 = 30;
const MIN_INTERVAL_MILLIS: u64 = 100;

/// Delay between gravity ticks at `level`.
///
/// Starts at 400 ms on level 1 and shortens by 30 ms per level down to a floor
/// of 100 ms. The board never waits on its own; a driver uses this to pace its
/// calls to [`Board::move_down_one_step`](crate::Board::move_down_one_step).
///
/// # Example
///
/// ```
/// use std::time::Duration;
///
/// use quadris_engine::gravity_interval;
///
/// assert_eq!(gravity_interval(1), Duration::from_millis(400));
/// assert_eq!(gravity_interval(3), Duration::from_millis(340));
/// assert_eq!(gravity_interval(50), Duration::from_millis(100));
/// ```
#[must_use]
pub fn gravity_interval(level: u64) -> Duration {
    let reduction = level.saturating_sub(1).saturating_mul(INTERVAL_STEP_MILLIS);
    let millis = INITIAL_INTERVAL_MILLIS
        .saturating_sub(reduction)
        .max(MIN_INTERVAL_MILLIS);
    Duration::from_millis(millis)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_interval_never_increases() {
        let mut prev = gravity_interval(1);
        for level in 2..30 {
            let interval = gravity_interval(level);
            assert!(interval <= prev);
            assert!(interval >= Duration::from_millis(MIN_INTERVAL_MILLIS));
            prev = interval;
        }
    }

    #[test]
    fn test_floor_reached_at_level_11() {
        assert_eq!(gravity_interval(10), Duration::from_millis(130));
        assert_eq!(gravity_interval(11), Duration::from_millis(100));
        assert_eq!(gravity_interval(u64::MAX), Duration::from_millis(100));
    }
}
