//! Touch-driven light cone.
//!
//! [`InteractiveLightCompositor`] owns the light position of one window. The
//! light follows the pointer while it is held, coasts back onto the idle
//! motion after release, and otherwise rides the idle motion. Every paint
//! relights the base image at the current position and blits the result.
//!
//! All state changes come in through `&mut self` calls made by a single
//! dispatch loop: pointer events, [`poll`](InteractiveLightCompositor::poll)
//! for timer ticks and animation slices, and
//! [`paint`](InteractiveLightCompositor::paint) when the window is invalid.

use embassy_time::Instant;
use embedded_graphics::prelude::*;

use crate::{
    config::Config,
    momentum::Momentum,
    motion::IdleMotion,
    normal_map::{
        Color,
        NormalMapping,
        Pass,
    },
    pointer::PointerEvent,
    timer::WindowTimer,
    window::Window,
};

/// What currently drives the light. The idle motion runs underneath all of
/// them.
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Light sits on the idle motion.
    Idle,
    /// Light follows the pointer.
    Dragging,
    /// Pointer released, momentum decaying back onto the idle motion.
    Coasting,
}

/// Light bookkeeping of one window.
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LightState {
    /// Last pointer position seen during a drag.
    pub pointer: Point,
    pub pressed: bool,
    pub momentum: Momentum,
    /// Position of the previous paint.
    pub last: Point,
}

pub struct InteractiveLightCompositor<M> {
    mapper: M,
    config: Config,
    light: LightState,
    motion: IdleMotion,
    timer: WindowTimer,
}

impl<M: NormalMapping> InteractiveLightCompositor<M> {
    /// Set up the light for a freshly created window of `size`.
    ///
    /// `mapper` must already hold the base image. It takes over the refresh
    /// threshold of `config` and gets one unlit pass so the destination is
    /// valid before the first paint, then the idle motion starts looping.
    pub fn create(mut mapper: M, size: Size, config: Config, now: Instant) -> Self {
        let light = LightState::default();
        let mut motion = IdleMotion::new(size, &config);
        mapper.set_refresh_threshold(config.refresh_threshold());
        mapper.compose(motion.position(), Pass::Unlit);
        motion.start(now);
        info!("light compositor up, {}x{}", size.width, size.height);
        Self {
            mapper,
            config,
            light,
            motion,
            timer: WindowTimer::new(config.coast_tick()),
        }
    }

    pub const fn phase(&self) -> Phase {
        if self.light.pressed {
            Phase::Dragging
        } else if self.timer.is_active() {
            Phase::Coasting
        } else {
            Phase::Idle
        }
    }

    pub const fn light(&self) -> &LightState {
        &self.light
    }

    pub const fn config(&self) -> &Config {
        &self.config
    }

    pub const fn mapper(&self) -> &M {
        &self.mapper
    }

    /// Where the idle motion currently puts the light.
    pub const fn base_position(&self) -> Point {
        self.motion.position()
    }

    /// Where the next paint puts the light.
    pub fn effective_position(&self) -> Point {
        if self.light.pressed {
            self.light.pointer
        } else {
            self.motion.position() + self.light.momentum.offset()
        }
    }

    /// Handle a pointer event in window coordinates.
    pub fn pointer(&mut self, event: PointerEvent, window: &mut Window, now: Instant) {
        match event {
            PointerEvent::Down(p) => {
                self.light.pointer = p;
                self.light.pressed = true;
                window.set_capture();
                debug!("drag from {}", p);
            }
            PointerEvent::Move(p) if self.light.pressed => {
                self.light.pointer = p;
            }
            PointerEvent::Up(p) if self.light.pressed => {
                self.light.pointer = p;
                self.light.pressed = false;
                self.light.momentum.release(p, self.motion.position());
                self.timer.start(now);
                window.release_capture();
                debug!("released at {}, momentum {}", p, self.light.momentum.offset());
            }
            PointerEvent::Move(_) | PointerEvent::Up(_) => return,
        }
        window.invalidate();
    }

    /// Run a due momentum tick and the next animation slice.
    pub fn poll(&mut self, now: Instant, window: &mut Window) {
        if self.timer.poll(now) {
            self.tick(now);
            window.invalidate();
        }
        if self.motion.poll(now) {
            window.invalidate();
        }
    }

    fn tick(&mut self, now: Instant) {
        if self.light.momentum.decay(self.config.decay_permille()) {
            self.timer.restart(now);
        } else {
            self.timer.cancel();
            debug!("momentum settled");
        }
    }

    /// Whether moving the light to `at` needs an unlit full refresh first.
    pub fn needs_full_refresh(&self, at: Point) -> bool {
        let d = at - self.light.last;
        let limit = self.config.refresh_threshold() as i32;
        d.x.abs() > limit || d.y.abs() > limit
    }

    /// Relight at the effective position and blit to `target` at the window
    /// origin. `(0, 0)` means no light and skips compositing.
    pub fn paint<D>(&mut self, window: &Window, target: &mut D) -> Result<(), D::Error>
    where
        D: DrawTarget<Color = Color>,
    {
        let at = self.effective_position();
        if at != Point::zero() {
            if self.needs_full_refresh(at) {
                trace!("full refresh, {} -> {}", self.light.last, at);
                self.mapper.compose(at, Pass::Unlit);
            }
            self.mapper.compose(at, Pass::Lit);
        }
        self.light.last = at;
        self.mapper.write_at(target, window.origin())
    }

    /// Stop the animations and the timer and release the surfaces.
    pub fn delete(mut self) {
        self.motion.stop();
        self.timer.cancel();
        info!("light compositor down");
    }
}
