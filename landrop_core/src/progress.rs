//! Pure progress arithmetic plus the sink trait transfer code reports into.
//!
//! The math lives apart from any terminal rendering so both sides of a
//! transfer can drive whatever display they like.

/// Fraction of the transfer done, clamped to `0.0..=1.0`.
///
/// A zero-byte transfer counts as already complete.
pub fn ratio(done: u64, total: u64) -> f64 {
    if total == 0 {
        return 1.0;
    }
    (done as f64 / total as f64).min(1.0)
}

/// Whole percent in `0..=100`. Only a complete transfer reports 100, so
/// rounding can never announce completion early.
pub fn percent(done: u64, total: u64) -> u8 {
    if is_complete(done, total) {
        return 100;
    }
    ((ratio(done, total) * 100.0) as u8).min(99)
}

pub fn is_complete(done: u64, total: u64) -> bool {
    done >= total
}

/// Coarse progress band, used by displays that color the bar.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Band {
    /// Under 33 percent.
    Low,
    /// 33 to 65 percent.
    Mid,
    /// 66 percent and up.
    High,
}

impl Band {
    pub fn of(done: u64, total: u64) -> Band {
        let pct = percent(done, total);
        if pct < 33 {
            Band::Low
        } else if pct < 66 {
            Band::Mid
        } else {
            Band::High
        }
    }
}

/// Receives `(bytes_done, bytes_total)` after every chunk of a transfer.
///
/// Calls arrive with monotonically non-decreasing `done`, ending at
/// `done == total` exactly when the transfer succeeds.
pub trait ProgressSink {
    fn update(&mut self, done: u64, total: u64);
}

/// Sink that discards every update.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullProgress;

impl ProgressSink for NullProgress {
    fn update(&mut self, _done: u64, _total: u64) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_total_is_complete() {
        assert_eq!(ratio(0, 0), 1.0);
        assert_eq!(percent(0, 0), 100);
        assert!(is_complete(0, 0));
    }

    #[test]
    fn percent_reaches_100_only_at_the_end() {
        assert_eq!(percent(0, 1000), 0);
        assert_eq!(percent(999, 1000), 99);
        assert_eq!(percent(1000, 1000), 100);
    }

    #[test]
    fn percent_never_rounds_up_to_100() {
        // f64 math on huge totals must not report completion early.
        let total = u64::MAX;
        assert_eq!(percent(total - 1, total), 99);
    }

    #[test]
    fn band_edges() {
        assert_eq!(Band::of(32, 100), Band::Low);
        assert_eq!(Band::of(33, 100), Band::Mid);
        assert_eq!(Band::of(65, 100), Band::Mid);
        assert_eq!(Band::of(66, 100), Band::High);
        assert_eq!(Band::of(100, 100), Band::High);
    }

    #[test]
    fn ratio_clamps_overshoot() {
        assert_eq!(ratio(20, 10), 1.0);
        assert_eq!(percent(20, 10), 100);
    }
}
