//! Animation service: time-to-progress tracks with easing.
//!
//! An [`Animation`] has a period and a list of items, each covering a time
//! window inside the period. Polling maps the current time to an eased
//! progress in `0..=ANIM_RANGE` for every item whose window is active and
//! hands `(key, progress)` to the caller, which decides what the key means.

use alloc::vec::Vec;

use embassy_time::{
    Duration,
    Instant,
};

/// Full-scale animation progress.
pub const ANIM_RANGE: i32 = 32767;

/// Curve shape mapping linear progress to eased progress.
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Easing {
    Linear,
    /// Slow start.
    Accel,
    /// Slow end.
    Decel,
    /// Slow start and slow end.
    AccelDecel,
}

impl Easing {
    /// Ease a linear progress value. Input is clamped to `0..=ANIM_RANGE`;
    /// `0` and `ANIM_RANGE` map to themselves for every curve.
    pub fn apply(self, progress: i32) -> i32 {
        let p = i64::from(progress.clamp(0, ANIM_RANGE));
        let r = i64::from(ANIM_RANGE);
        let eased = match self {
            Self::Linear => p,
            Self::Accel => p * p / r,
            Self::Decel => r - (r - p) * (r - p) / r,
            Self::AccelDecel => {
                if 2 * p <= r {
                    2 * p * p / r
                } else {
                    r - 2 * (r - p) * (r - p) / r
                }
            }
        };
        eased as i32
    }
}

/// How often an animation runs through its period.
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Repeat {
    Once,
    Forever,
}

#[derive(Debug, Clone, Copy)]
struct Item<K> {
    start: Duration,
    end: Duration,
    easing: Easing,
    key: K,
}

#[derive(Debug, Clone, Copy)]
enum Run {
    Stopped,
    Running {
        started: Instant,
        last_slice: Option<Instant>,
        repeat: Repeat,
    },
}

/// A set of eased items sharing one period.
#[derive(Debug, Clone)]
pub struct Animation<K> {
    period: Duration,
    min_slice: Duration,
    items: Vec<Item<K>>,
    run: Run,
}

impl<K: Copy> Animation<K> {
    /// New, stopped animation. Slices closer together than `min_slice` are
    /// skipped when polling.
    pub const fn new(period: Duration, min_slice: Duration) -> Self {
        Self {
            period,
            min_slice,
            items: Vec::new(),
            run: Run::Stopped,
        }
    }

    /// Add an item active during `[start, end)` of each period.
    pub fn add_item(&mut self, start: Duration, end: Duration, easing: Easing, key: K) -> &mut Self {
        debug_assert!(start < end && end <= self.period, "item outside animation period");
        self.items.push(Item {
            start,
            end,
            easing,
            key,
        });
        self
    }

    pub fn start(&mut self, now: Instant, repeat: Repeat) {
        self.run = Run::Running {
            started: now,
            last_slice: None,
            repeat,
        };
    }

    pub fn stop(&mut self) {
        self.run = Run::Stopped;
    }

    pub const fn is_running(&self) -> bool {
        matches!(self.run, Run::Running { .. })
    }

    /// Run one slice at `now` if the minimum slice interval has passed.
    ///
    /// Returns `true` when a slice ran, i.e. when the caller should redraw.
    pub fn poll(&mut self, now: Instant, mut apply: impl FnMut(K, i32)) -> bool {
        let Run::Running {
            started,
            last_slice,
            repeat,
        } = &mut self.run
        else {
            return false;
        };
        if let Some(last) = *last_slice
            && now.saturating_duration_since(last) < self.min_slice
        {
            return false;
        }
        *last_slice = Some(now);

        let elapsed = now.saturating_duration_since(*started);
        if *repeat == Repeat::Once && elapsed >= self.period {
            for item in self.items.iter().filter(|item| item.end == self.period) {
                apply(item.key, ANIM_RANGE);
            }
            self.run = Run::Stopped;
            return true;
        }
        self.sample_at(elapsed, apply);
        true
    }

    /// Evaluate the looping animation at `elapsed` since start, without
    /// touching its run state.
    pub fn sample_at(&self, elapsed: Duration, mut apply: impl FnMut(K, i32)) {
        let period = self.period.as_ticks();
        if period == 0 {
            return;
        }
        let t = elapsed.as_ticks() % period;
        for item in &self.items {
            let (start, end) = (item.start.as_ticks(), item.end.as_ticks());
            if (start..end).contains(&t) {
                let linear = (t - start) * ANIM_RANGE as u64 / (end - start);
                apply(item.key, item.easing.apply(linear as i32));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL: [Easing; 4] = [Easing::Linear, Easing::Accel, Easing::Decel, Easing::AccelDecel];

    #[test]
    fn easing_endpoints() {
        for easing in ALL {
            assert_eq!(easing.apply(0), 0);
            assert_eq!(easing.apply(ANIM_RANGE), ANIM_RANGE);
            assert_eq!(easing.apply(-5), 0);
            assert_eq!(easing.apply(ANIM_RANGE + 5), ANIM_RANGE);
        }
    }

    #[test]
    fn easing_is_monotonic() {
        for easing in ALL {
            let mut prev = 0;
            for p in (0..=ANIM_RANGE).step_by(97) {
                let v = easing.apply(p);
                assert!(v >= prev, "{easing:?} not monotonic at {p}");
                prev = v;
            }
        }
    }

    #[test]
    fn easing_shapes() {
        let half = ANIM_RANGE / 2;
        assert!(Easing::Accel.apply(half) < half);
        assert!(Easing::Decel.apply(half) > half);
        assert!((Easing::AccelDecel.apply(half) - half).abs() <= 2);
        assert!(Easing::AccelDecel.apply(ANIM_RANGE / 4) < ANIM_RANGE / 4);
    }

    #[test]
    fn poll_respects_min_slice() {
        let mut anim = Animation::new(Duration::from_millis(1000), Duration::from_millis(20));
        anim.add_item(Duration::from_millis(0), Duration::from_millis(1000), Easing::Linear, ());
        let t0 = Instant::from_millis(100);
        anim.start(t0, Repeat::Forever);

        let mut calls = 0;
        assert!(anim.poll(t0, |_, _| calls += 1));
        assert!(!anim.poll(t0 + Duration::from_millis(19), |_, _| calls += 1));
        assert!(anim.poll(t0 + Duration::from_millis(20), |_, _| calls += 1));
        assert_eq!(calls, 2);
    }

    #[test]
    fn forever_loops_over_period() {
        let mut anim = Animation::new(Duration::from_millis(1000), Duration::from_millis(0));
        anim.add_item(Duration::from_millis(0), Duration::from_millis(1000), Easing::Linear, ());
        let t0 = Instant::from_millis(0);
        anim.start(t0, Repeat::Forever);

        let mut a = -1;
        let mut b = -1;
        anim.poll(t0 + Duration::from_millis(250), |_, p| a = p);
        anim.poll(t0 + Duration::from_millis(1250), |_, p| b = p);
        assert_eq!(a, b);
        assert_eq!(a, ANIM_RANGE / 4);
        assert!(anim.is_running());
    }

    #[test]
    fn items_only_fire_inside_their_window() {
        let mut anim = Animation::new(Duration::from_millis(300), Duration::from_millis(0));
        anim.add_item(Duration::from_millis(0), Duration::from_millis(100), Easing::Linear, 'a')
            .add_item(Duration::from_millis(100), Duration::from_millis(200), Easing::Linear, 'b')
            .add_item(Duration::from_millis(200), Duration::from_millis(300), Easing::Linear, 'c');

        let mut seen = Vec::new();
        anim.sample_at(Duration::from_millis(150), |k, p| seen.push((k, p)));
        assert_eq!(seen, [('b', ANIM_RANGE / 2)]);

        seen.clear();
        anim.sample_at(Duration::from_millis(200), |k, p| seen.push((k, p)));
        assert_eq!(seen, [('c', 0)]);
    }

    #[test]
    fn once_finishes_and_stops() {
        let mut anim = Animation::new(Duration::from_millis(100), Duration::from_millis(0));
        anim.add_item(Duration::from_millis(0), Duration::from_millis(100), Easing::Decel, 7u8);
        let t0 = Instant::from_millis(5);
        anim.start(t0, Repeat::Once);

        let mut last = None;
        assert!(anim.poll(t0 + Duration::from_millis(150), |k, p| last = Some((k, p))));
        assert_eq!(last, Some((7, ANIM_RANGE)));
        assert!(!anim.is_running());
        assert!(!anim.poll(t0 + Duration::from_millis(200), |_, _| unreachable!()));
    }

    #[test]
    fn stopped_animation_does_nothing() {
        let mut anim: Animation<()> = Animation::new(Duration::from_millis(100), Duration::from_millis(0));
        assert!(!anim.poll(Instant::from_millis(0), |_, _| {}));
        anim.start(Instant::from_millis(0), Repeat::Forever);
        anim.stop();
        assert!(!anim.is_running());
    }
}
