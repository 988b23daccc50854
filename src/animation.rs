use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

use keyframe::functions::EaseOutCubic;
use keyframe::EasingFunction;

use crate::utils::get_monotonic_time;

/// Shareable lazy clock.
///
/// Fetches the time once and retains it until the host's event loop advances
/// it, so every animation and timer evaluated within one dispatch sees the
/// same instant. Tests construct it with a fixed time and step it manually.
#[derive(Debug, Default, Clone)]
pub struct Clock {
    inner: Rc<RefCell<Option<Duration>>>,
}

impl Clock {
    /// Creates a frozen clock at the given time.
    pub fn with_time(time: Duration) -> Self {
        Self {
            inner: Rc::new(RefCell::new(Some(time))),
        }
    }

    /// Returns the current time, fetching it on first use.
    pub fn now(&self) -> Duration {
        *self
            .inner
            .borrow_mut()
            .get_or_insert_with(get_monotonic_time)
    }

    /// Pins the clock to the given time.
    pub fn set(&mut self, time: Duration) {
        *self.inner.borrow_mut() = Some(time);
    }

    /// Clears the stored time so it's re-fetched on the next read.
    pub fn clear(&mut self) {
        *self.inner.borrow_mut() = None;
    }
}

impl PartialEq for Clock {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }
}

impl Eq for Clock {}

/// A single eased value transition, driven by explicit time updates.
#[derive(Debug)]
pub struct Animation {
    from: f64,
    to: f64,
    duration: Duration,
    start_time: Duration,
    current_time: Duration,
}

impl Animation {
    pub fn new(start_time: Duration, from: f64, to: f64, over: Duration) -> Self {
        Self {
            from,
            to,
            duration: over,
            start_time,
            current_time: start_time,
        }
    }

    pub fn set_current_time(&mut self, time: Duration) {
        self.current_time = time;
    }

    pub fn is_done(&self) -> bool {
        self.current_time >= self.start_time + self.duration
    }

    pub fn to(&self) -> f64 {
        self.to
    }

    pub fn value(&self) -> f64 {
        if self.duration.is_zero() {
            return self.to;
        }
        let passed = self
            .current_time
            .saturating_sub(self.start_time)
            .as_secs_f64();
        let total = self.duration.as_secs_f64();
        let x = (passed / total).clamp(0., 1.);
        EaseOutCubic.y(x) * (self.to - self.from) + self.from
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn frozen_clock() {
        let mut clock = Clock::with_time(Duration::ZERO);
        assert_eq!(clock.now(), Duration::ZERO);

        clock.set(Duration::from_millis(100));
        assert_eq!(clock.now(), Duration::from_millis(100));
    }

    #[test]
    fn clones_share_time() {
        let mut clock = Clock::with_time(Duration::ZERO);
        let other = clock.clone();
        clock.set(Duration::from_millis(70));
        assert_eq!(other.now(), Duration::from_millis(70));
        assert_eq!(clock, other);
    }

    #[test]
    fn animation_endpoints() {
        let mut anim = Animation::new(Duration::ZERO, 0., 48., Duration::from_millis(200));
        assert_eq!(anim.value(), 0.);
        assert!(!anim.is_done());

        anim.set_current_time(Duration::from_millis(200));
        assert_eq!(anim.value(), 48.);
        assert!(anim.is_done());
    }

    #[test]
    fn zero_duration_completes_instantly() {
        let anim = Animation::new(Duration::ZERO, 5., -3., Duration::ZERO);
        assert_eq!(anim.value(), -3.);
        assert!(anim.is_done());
    }
}
