use std::sync::OnceLock;
use std::time::{Duration, Instant};

/// Monotonic time since the first call in this process.
pub fn get_monotonic_time() -> Duration {
    static START: OnceLock<Instant> = OnceLock::new();
    START.get_or_init(Instant::now).elapsed()
}

/// Rounds a logical offset at the point of commit.
///
/// Intermediate layout math stays in floating point; only final box edges go
/// through this, so rounding error never compounds across solver iterations.
pub fn round_at_commit(value: f64) -> f64 {
    value.round()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn monotonic_time_is_monotonic() {
        let a = get_monotonic_time();
        let b = get_monotonic_time();
        assert!(b >= a);
    }

    #[test]
    fn commit_rounding_is_nearest() {
        assert_eq!(round_at_commit(1.4), 1.);
        assert_eq!(round_at_commit(1.5), 2.);
        assert_eq!(round_at_commit(-0.5), -1.);
    }
}
