//! Idle light motion.
//!
//! Two looping animations move the light while nobody touches the screen:
//! a sinusoidal vertical bob and a six-segment horizontal sweep that swings
//! around one extreme, crosses to the other, swings there and crosses back.
//! Both stay within 3/4 of the half extent around the centre.

use embassy_time::{
    Duration,
    Instant,
};
use embedded_graphics::prelude::*;

use crate::{
    anim::{
        ANIM_RANGE,
        Animation,
        Easing,
        Repeat,
    },
    config::Config,
    trig::{
        cos_hq,
        sin_hq,
    },
};

/// Horizontal extreme a sweep segment starts from.
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Right,
    Left,
}

impl Side {
    const fn sign(self) -> i32 {
        match self {
            Self::Right => 1,
            Self::Left => -1,
        }
    }
}

/// The curve an animation item drives.
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Track {
    /// Vertical sine bob over one full turn.
    Bob,
    /// Horizontal cosine swing leaving and returning to one extreme.
    Swing(Side),
    /// Horizontal straight pass from one extreme to the other.
    Pass(Side),
}

impl Track {
    /// Write this track's coordinate for `progress` into `light`.
    pub fn apply(self, size: Size, progress: i32, light: &mut Point) {
        match self {
            Self::Bob => light.y = bob(size.height, progress),
            Self::Swing(side) => light.x = swing(size.width, progress, side),
            Self::Pass(side) => light.x = pass(size.width, progress, side),
        }
    }
}

/// Sweep segments in order, each one segment long.
const SWEEP: [(Easing, Track); 6] = [
    (Easing::Accel, Track::Swing(Side::Right)),
    (Easing::Decel, Track::Swing(Side::Right)),
    (Easing::AccelDecel, Track::Pass(Side::Right)),
    (Easing::Accel, Track::Swing(Side::Left)),
    (Easing::Decel, Track::Swing(Side::Left)),
    (Easing::AccelDecel, Track::Pass(Side::Left)),
];

/// Centre and amplitude along an axis of `extent` pixels.
const fn span(extent: u32) -> (i32, i32) {
    let half = (extent / 2) as i32;
    (half, half * 3 / 4)
}

const fn degrees(progress: i32) -> i32 {
    progress * 360 / ANIM_RANGE
}

/// Vertical bob: one sine period over the full progress range.
pub fn bob(height: u32, progress: i32) -> i32 {
    let (half, amp) = span(height);
    half + ((sin_hq(degrees(progress) * 1000) * amp) >> 16)
}

/// Cosine swing starting and ending at `side`, passing the opposite extreme
/// halfway.
pub fn swing(width: u32, progress: i32, side: Side) -> i32 {
    let (half, amp) = span(width);
    half + side.sign() * ((cos_hq(degrees(progress) * 1000) * amp) >> 16)
}

/// Straight pass from `side` to the opposite extreme.
pub fn pass(width: u32, progress: i32, side: Side) -> i32 {
    let (half, amp) = span(width);
    let v = side.sign();
    half + v * amp - v * (progress * amp * 2) / ANIM_RANGE
}

/// The two idle animations and the base light position they produce.
#[derive(Debug, Clone)]
pub struct IdleMotion {
    size: Size,
    position: Point,
    bob: Animation<Track>,
    sweep: Animation<Track>,
}

impl IdleMotion {
    pub fn new(size: Size, config: &Config) -> Self {
        let period = config.bob_period();
        let mut bob = Animation::new(period, config.slice());
        bob.add_item(Duration::from_ticks(0), period, Easing::Linear, Track::Bob);

        let segment = config.sweep_segment();
        let mut sweep = Animation::new(segment * SWEEP.len() as u32, config.slice());
        for (i, &(easing, track)) in SWEEP.iter().enumerate() {
            let i = i as u32;
            sweep.add_item(segment * i, segment * (i + 1), easing, track);
        }

        Self {
            size,
            position: Point::zero(),
            bob,
            sweep,
        }
    }

    /// Start both animations looping forever.
    pub fn start(&mut self, now: Instant) {
        self.bob.start(now, Repeat::Forever);
        self.sweep.start(now, Repeat::Forever);
    }

    pub fn stop(&mut self) {
        self.bob.stop();
        self.sweep.stop();
    }

    pub const fn is_running(&self) -> bool {
        self.bob.is_running() || self.sweep.is_running()
    }

    /// Current base position. `(0, 0)` until the first slice ran.
    pub const fn position(&self) -> Point {
        self.position
    }

    /// Step both animations; `true` if either ran a slice.
    pub fn poll(&mut self, now: Instant) -> bool {
        let size = self.size;
        let bobbed = self.bob.poll(now, |track, p| track.apply(size, p, &mut self.position));
        let swept = self.sweep.poll(now, |track, p| track.apply(size, p, &mut self.position));
        bobbed || swept
    }

    /// Base position `elapsed` after start, without advancing anything.
    pub fn sample_at(&self, elapsed: Duration) -> Point {
        let mut light = self.position;
        self.bob.sample_at(elapsed, |track, p| track.apply(self.size, p, &mut light));
        self.sweep.sample_at(elapsed, |track, p| track.apply(self.size, p, &mut light));
        light
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SIZE: Size = Size::new(480, 272);

    fn motion() -> IdleMotion {
        IdleMotion::new(SIZE, &Config::default())
    }

    #[test]
    fn bob_stays_within_three_quarters_of_half_height() {
        let (mut lo, mut hi) = (i32::MAX, i32::MIN);
        for p in 0..=ANIM_RANGE {
            let y = bob(272, p);
            lo = lo.min(y);
            hi = hi.max(y);
        }
        assert_eq!(hi, 136 + 102);
        assert_eq!(lo, 136 - 102);
        assert_eq!(bob(272, 0), 136);
    }

    #[test]
    fn vertical_bob_repeats_every_8000() {
        let m = motion();
        for ms in [0, 500, 1999, 2001, 4000, 6001, 7999] {
            let a = m.sample_at(Duration::from_millis(ms)).y;
            let b = m.sample_at(Duration::from_millis(ms + 8000)).y;
            assert_eq!(a, b, "at {ms} ms");
        }
        assert_eq!(m.sample_at(Duration::from_millis(2001)).y, 238);
        assert_eq!(m.sample_at(Duration::from_millis(6001)).y, 34);
    }

    #[test]
    fn horizontal_sweep_cycles_in_42000() {
        let m = motion();
        for ms in [0, 3500, 7000, 17_500, 30_000, 41_999] {
            let a = m.sample_at(Duration::from_millis(ms)).x;
            let b = m.sample_at(Duration::from_millis(ms + 42_000)).x;
            assert_eq!(a, b, "at {ms} ms");
        }
    }

    #[test]
    fn horizontal_sweep_is_continuous_at_segment_boundaries() {
        let m = motion();
        for k in 1..=6u64 {
            let boundary = k * 7000;
            let before = m.sample_at(Duration::from_millis(boundary - 1)).x;
            let at = m.sample_at(Duration::from_millis(boundary)).x;
            assert!((before - at).abs() <= 2, "jump at {boundary} ms: {before} -> {at}");
        }
    }

    #[test]
    fn sweep_visits_both_extremes() {
        let right = 240 + 180;
        let left = 240 - 180;
        assert_eq!(swing(480, 0, Side::Right), right);
        assert_eq!(swing(480, ANIM_RANGE / 2 + 1, Side::Right), left);
        assert_eq!(pass(480, 0, Side::Right), right);
        assert_eq!(pass(480, ANIM_RANGE, Side::Right), left);
        assert_eq!(pass(480, 0, Side::Left), left);
        assert_eq!(pass(480, ANIM_RANGE, Side::Left), right);
        assert_eq!(swing(480, 0, Side::Left), left);
    }

    #[test]
    fn poll_moves_base_position() {
        let mut m = motion();
        assert_eq!(m.position(), Point::zero());
        let t0 = Instant::from_millis(0);
        m.start(t0);
        assert!(m.poll(t0));
        assert_eq!(m.position(), Point::new(420, 136));

        assert!(!m.poll(t0 + Duration::from_millis(5)));
        assert!(m.poll(t0 + Duration::from_millis(2001)));
        assert_eq!(m.position().y, 238);

        m.stop();
        assert!(!m.is_running());
        assert!(!m.poll(t0 + Duration::from_millis(4000)));
    }
}
