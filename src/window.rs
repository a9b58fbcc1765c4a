//! Minimal window: where the composited surface lands on screen, whether it
//! needs repainting and whether it holds the pointer.

use embedded_graphics::{
    prelude::*,
    primitives::Rectangle,
};

#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Window {
    origin: Point,
    size: Size,
    invalid: bool,
    captured: bool,
}

impl Window {
    /// A new window starts out invalid so its first paint happens right away.
    pub const fn new(origin: Point, size: Size) -> Self {
        Self {
            origin,
            size,
            invalid: true,
            captured: false,
        }
    }

    pub const fn origin(&self) -> Point {
        self.origin
    }

    pub const fn size(&self) -> Size {
        self.size
    }

    pub const fn bounds(&self) -> Rectangle {
        Rectangle::new(self.origin, self.size)
    }

    /// Request a repaint.
    pub fn invalidate(&mut self) {
        self.invalid = true;
    }

    pub const fn is_invalid(&self) -> bool {
        self.invalid
    }

    /// Consume a pending repaint request.
    pub fn take_invalid(&mut self) -> bool {
        core::mem::replace(&mut self.invalid, false)
    }

    /// Route all pointer input here until released, wherever it lands.
    pub fn set_capture(&mut self) {
        self.captured = true;
    }

    pub fn release_capture(&mut self) {
        self.captured = false;
    }

    pub const fn has_capture(&self) -> bool {
        self.captured
    }

    /// Whether a pointer event at screen position `p` belongs to this window.
    pub fn accepts(&self, p: Point) -> bool {
        self.captured || self.bounds().contains(p)
    }

    /// Screen to window coordinates.
    pub fn to_local(&self, p: Point) -> Point {
        p - self.origin
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_invalid_and_takes_once() {
        let mut w = Window::new(Point::new(10, 20), Size::new(100, 50));
        assert!(w.take_invalid());
        assert!(!w.take_invalid());
        w.invalidate();
        assert!(w.is_invalid());
    }

    #[test]
    fn capture_extends_pointer_routing() {
        let mut w = Window::new(Point::new(10, 20), Size::new(100, 50));
        assert!(w.accepts(Point::new(10, 20)));
        assert!(!w.accepts(Point::new(110, 20)));
        w.set_capture();
        assert!(w.accepts(Point::new(300, 300)));
        w.release_capture();
        assert!(!w.has_capture());
        assert!(!w.accepts(Point::new(300, 300)));
    }

    #[test]
    fn converts_to_local_coordinates() {
        let w = Window::new(Point::new(32, 21), Size::new(256, 128));
        assert_eq!(w.to_local(Point::new(40, 30)), Point::new(8, 9));
    }
}
