//! Compositor tunables.

use embassy_time::Duration;

/// Largest per-axis light jump the incremental lit pass can absorb. Bigger
/// jumps get an unlit full refresh first.
pub const REFRESH_THRESHOLD: u32 = 64;

/// Highest accepted decay factor. Anything at or above 1000 would never let
/// the momentum settle.
const MAX_DECAY_PERMILLE: i32 = 999;

/// Timing and physics knobs of the light compositor.
///
/// ```rust
/// use embassy_time::Duration;
/// use lightcone::Config;
///
/// let config = Config::default()
///     .with_coast_tick(Duration::from_millis(10))
///     .with_decay_permille(850);
/// assert_eq!(config.decay_permille(), 850);
/// ```
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Config {
    refresh_threshold: u32,
    coast_tick: Duration,
    decay_permille: i32,
    bob_period: Duration,
    sweep_segment: Duration,
    slice: Duration,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            refresh_threshold: REFRESH_THRESHOLD,
            coast_tick: Duration::from_millis(20),
            decay_permille: 900,
            bob_period: Duration::from_millis(8000),
            sweep_segment: Duration::from_millis(7000),
            slice: Duration::from_millis(20),
        }
    }
}

impl Config {
    /// Per-axis jump (pixels) above which an unlit full refresh precedes the
    /// lit pass. The compositor hands the same value to its mapper, which
    /// grows the lit pass by it.
    #[must_use]
    pub const fn with_refresh_threshold(mut self, pixels: u32) -> Self {
        self.refresh_threshold = pixels;
        self
    }

    /// Interval of the momentum decay timer.
    #[must_use]
    pub const fn with_coast_tick(mut self, tick: Duration) -> Self {
        self.coast_tick = tick;
        self
    }

    /// Fraction of momentum kept per tick, in permille, clamped to `0..=999`.
    #[must_use]
    pub const fn with_decay_permille(mut self, permille: i32) -> Self {
        self.decay_permille = if permille < 0 {
            0
        } else if permille > MAX_DECAY_PERMILLE {
            MAX_DECAY_PERMILLE
        } else {
            permille
        };
        self
    }

    /// Period of the vertical idle bob.
    #[must_use]
    pub const fn with_bob_period(mut self, period: Duration) -> Self {
        self.bob_period = period;
        self
    }

    /// Length of each of the six horizontal sweep segments.
    #[must_use]
    pub const fn with_sweep_segment(mut self, segment: Duration) -> Self {
        self.sweep_segment = segment;
        self
    }

    /// Minimum interval between two animation slices.
    #[must_use]
    pub const fn with_slice(mut self, slice: Duration) -> Self {
        self.slice = slice;
        self
    }

    pub const fn refresh_threshold(&self) -> u32 {
        self.refresh_threshold
    }

    pub const fn coast_tick(&self) -> Duration {
        self.coast_tick
    }

    pub const fn decay_permille(&self) -> i32 {
        self.decay_permille
    }

    pub const fn bob_period(&self) -> Duration {
        self.bob_period
    }

    pub const fn sweep_segment(&self) -> Duration {
        self.sweep_segment
    }

    pub const fn slice(&self) -> Duration {
        self.slice
    }
}
