//! Release momentum ("fling") with integer decay.

use embedded_graphics::prelude::*;

/// Offset left over when the pointer is released, shrinking every tick.
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Momentum {
    offset: Point,
}

impl Momentum {
    /// Capture the gap between the release point and the position the light
    /// would otherwise sit at.
    pub fn release(&mut self, pointer: Point, base: Point) {
        self.offset = pointer - base;
    }

    /// Scale both components by `permille / 1000`, truncating toward zero.
    /// `permille` is clamped to `0..=999` so every tick shrinks the offset.
    ///
    /// Returns `true` while any component is still non-zero.
    pub fn decay(&mut self, permille: i32) -> bool {
        let permille = permille.clamp(0, 999);
        self.offset.x = self.offset.x * permille / 1000;
        self.offset.y = self.offset.y * permille / 1000;
        !self.is_settled()
    }

    pub const fn offset(&self) -> Point {
        self.offset
    }

    pub const fn is_settled(&self) -> bool {
        self.offset.x == 0 && self.offset.y == 0
    }
}
