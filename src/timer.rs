//! Restartable one-shot timer for window message loops.

use embassy_time::{
    Duration,
    Instant,
};

/// Fires once `period` after it was (re)started, then stays disarmed until
/// restarted.
#[derive(Debug, Clone, Copy)]
pub struct WindowTimer {
    period: Duration,
    deadline: Option<Instant>,
}

impl WindowTimer {
    pub const fn new(period: Duration) -> Self {
        Self {
            period,
            deadline: None,
        }
    }

    pub fn start(&mut self, now: Instant) {
        self.deadline = Some(now + self.period);
    }

    /// Re-arm for another period counted from `now`.
    pub fn restart(&mut self, now: Instant) {
        self.start(now);
    }

    pub fn cancel(&mut self) {
        self.deadline = None;
    }

    pub const fn is_active(&self) -> bool {
        self.deadline.is_some()
    }

    /// `true` exactly once when the deadline has passed.
    pub fn poll(&mut self, now: Instant) -> bool {
        match self.deadline {
            Some(deadline) if now >= deadline => {
                self.deadline = None;
                true
            }
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fires_once_after_period() {
        let mut timer = WindowTimer::new(Duration::from_millis(20));
        let t0 = Instant::from_millis(1000);
        timer.start(t0);
        assert!(!timer.poll(t0 + Duration::from_millis(19)));
        assert!(timer.poll(t0 + Duration::from_millis(20)));
        assert!(!timer.is_active());
        assert!(!timer.poll(t0 + Duration::from_millis(60)));
    }

    #[test]
    fn restart_and_cancel() {
        let mut timer = WindowTimer::new(Duration::from_millis(20));
        let t0 = Instant::from_millis(0);
        timer.start(t0);
        timer.restart(t0 + Duration::from_millis(15));
        assert!(!timer.poll(t0 + Duration::from_millis(30)));
        assert!(timer.poll(t0 + Duration::from_millis(35)));

        timer.start(t0);
        timer.cancel();
        assert!(!timer.is_active());
        assert!(!timer.poll(t0 + Duration::from_millis(100)));
    }
}
