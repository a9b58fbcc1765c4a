//! Pointer input.
//!
//! [`PointerTracker`] turns sampled pointer states into press, move and
//! release edges. [`VirtualPointer`] stands in for a touch panel on boards
//! that only have a D-pad.

use embedded_graphics::prelude::*;

/// One sample of the pointer device.
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PointerState {
    pub position: Point,
    pub pressed: bool,
}

#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerEvent {
    Down(Point),
    Move(Point),
    Up(Point),
}

impl PointerEvent {
    pub const fn position(self) -> Point {
        match self {
            Self::Down(p) | Self::Move(p) | Self::Up(p) => p,
        }
    }

    /// Same event moved by `-origin`, e.g. from screen to window coordinates.
    #[must_use]
    pub fn relative_to(self, origin: Point) -> Self {
        match self {
            Self::Down(p) => Self::Down(p - origin),
            Self::Move(p) => Self::Move(p - origin),
            Self::Up(p) => Self::Up(p - origin),
        }
    }
}

/// Edge detector over pointer samples.
#[derive(Debug, Clone, Copy, Default)]
pub struct PointerTracker {
    previous: PointerState,
}

impl PointerTracker {
    /// Feed one sample. Moves are reported only while pressed and only when
    /// the position changed.
    pub fn update(&mut self, state: PointerState) -> Option<PointerEvent> {
        let prev = core::mem::replace(&mut self.previous, state);
        match (prev.pressed, state.pressed) {
            (false, true) => Some(PointerEvent::Down(state.position)),
            (true, true) if prev.position != state.position => Some(PointerEvent::Move(state.position)),
            (true, false) => Some(PointerEvent::Up(state.position)),
            _ => None,
        }
    }
}

/// Directional pad plus a "touch" button.
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Pad {
    pub up: bool,
    pub down: bool,
    pub left: bool,
    pub right: bool,
    pub press: bool,
}

/// Fastest cursor speed, pixels per sample.
const MAX_STEP: i32 = 8;

/// Cursor steered by a [`Pad`]. Holding a direction accelerates the cursor
/// up to [`MAX_STEP`] pixels per sample; it never leaves `bounds`.
#[derive(Debug, Clone, Copy)]
pub struct VirtualPointer {
    bounds: Size,
    position: Point,
    heading: Point,
    held: u32,
}

impl VirtualPointer {
    /// Cursor parked in the middle of `bounds`.
    pub fn new(bounds: Size) -> Self {
        Self {
            bounds,
            position: Point::new((bounds.width / 2) as i32, (bounds.height / 2) as i32),
            heading: Point::zero(),
            held: 0,
        }
    }

    pub const fn position(&self) -> Point {
        self.position
    }

    pub fn update(&mut self, pad: Pad) -> PointerState {
        let dir = Point::new(
            i32::from(pad.right) - i32::from(pad.left),
            i32::from(pad.down) - i32::from(pad.up),
        );
        if dir != self.heading {
            self.heading = dir;
            self.held = 0;
        }
        if dir != Point::zero() {
            self.held = self.held.saturating_add(1);
            let step = (1 + self.held / 4).min(MAX_STEP as u32) as i32;
            let max = Point::new(self.bounds.width as i32 - 1, self.bounds.height as i32 - 1);
            self.position = (self.position + dir * step).component_max(Point::zero()).component_min(max);
        }
        PointerState {
            position: self.position,
            pressed: pad.press,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state(x: i32, y: i32, pressed: bool) -> PointerState {
        PointerState {
            position: Point::new(x, y),
            pressed,
        }
    }

    #[test]
    fn tracker_reports_edges() {
        let mut t = PointerTracker::default();
        assert_eq!(t.update(state(5, 5, false)), None);
        assert_eq!(t.update(state(5, 5, true)), Some(PointerEvent::Down(Point::new(5, 5))));
        assert_eq!(t.update(state(5, 5, true)), None);
        assert_eq!(t.update(state(9, 5, true)), Some(PointerEvent::Move(Point::new(9, 5))));
        assert_eq!(t.update(state(9, 6, false)), Some(PointerEvent::Up(Point::new(9, 6))));
        assert_eq!(t.update(state(20, 6, false)), None);
    }

    #[test]
    fn events_translate_to_window_space() {
        let e = PointerEvent::Move(Point::new(40, 30)).relative_to(Point::new(32, 21));
        assert_eq!(e, PointerEvent::Move(Point::new(8, 9)));
        assert_eq!(e.position(), Point::new(8, 9));
    }

    #[test]
    fn virtual_pointer_accelerates_and_clamps() {
        let mut v = VirtualPointer::new(Size::new(100, 50));
        assert_eq!(v.position(), Point::new(50, 25));

        let right = Pad {
            right: true,
            ..Pad::default()
        };
        assert_eq!(v.update(right).position, Point::new(51, 25));
        for _ in 0..3 {
            v.update(right);
        }
        assert_eq!(v.position(), Point::new(55, 25));

        for _ in 0..50 {
            v.update(right);
        }
        assert_eq!(v.position().x, 99);

        let s = v.update(Pad {
            up: true,
            press: true,
            ..Pad::default()
        });
        assert!(s.pressed);
        assert_eq!(s.position, Point::new(99, 24));
    }
}
