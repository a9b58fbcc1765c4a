//! Offscreen drawing surfaces.

use alloc::{
    vec,
    vec::Vec,
};
use core::convert::Infallible;

use embedded_graphics::{
    prelude::*,
    primitives::Rectangle,
};

/// Fixed-size in-memory pixel buffer.
///
/// Draw into it with anything from `embedded-graphics`, then copy it to the
/// screen in one go with [`write_at`](Surface::write_at).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Surface<C> {
    size: Size,
    pixels: Vec<C>,
}

impl<C: PixelColor> Surface<C> {
    pub fn new(size: Size, fill: C) -> Self {
        Self {
            size,
            pixels: vec![fill; (size.width * size.height) as usize],
        }
    }

    pub fn pixel(&self, p: Point) -> Option<C> {
        self.index(p).map(|i| self.pixels[i])
    }

    /// Row-major pixel data.
    pub fn pixels(&self) -> &[C] {
        &self.pixels
    }

    pub(crate) fn pixels_mut(&mut self) -> &mut [C] {
        &mut self.pixels
    }

    /// Blit the whole surface to `target` with its top-left corner at `origin`.
    pub fn write_at<D>(&self, target: &mut D, origin: Point) -> Result<(), D::Error>
    where
        D: DrawTarget<Color = C>,
    {
        let area = Rectangle::new(origin, self.size);
        target.fill_contiguous(&area, self.pixels.iter().copied())
    }

    fn index(&self, Point { x, y }: Point) -> Option<usize> {
        let (w, h) = (self.size.width as i32, self.size.height as i32);
        (x >= 0 && x < w && y >= 0 && y < h).then(|| (y * w + x) as usize)
    }
}

impl<C: PixelColor> DrawTarget for Surface<C> {
    type Color = C;
    type Error = Infallible;

    fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        for Pixel(p, color) in pixels {
            if let Some(i) = self.index(p) {
                self.pixels[i] = color;
            }
        }
        Ok(())
    }

    fn clear(&mut self, color: Self::Color) -> Result<(), Self::Error> {
        self.pixels.fill(color);
        Ok(())
    }
}

impl<C> OriginDimensions for Surface<C> {
    fn size(&self) -> Size {
        self.size
    }
}

#[cfg(test)]
mod tests {
    use embedded_graphics::{
        mock_display::MockDisplay,
        pixelcolor::Rgb565,
        primitives::PrimitiveStyle,
    };

    use super::*;

    #[test]
    fn draws_are_clipped() {
        let mut surface = Surface::new(Size::new(4, 3), Rgb565::BLACK);
        Rectangle::new(Point::new(2, 1), Size::new(10, 10))
            .into_styled(PrimitiveStyle::with_fill(Rgb565::RED))
            .draw(&mut surface)
            .unwrap();

        assert_eq!(surface.pixel(Point::new(1, 1)), Some(Rgb565::BLACK));
        assert_eq!(surface.pixel(Point::new(3, 2)), Some(Rgb565::RED));
        assert_eq!(surface.pixel(Point::new(4, 0)), None);
        assert_eq!(surface.pixel(Point::new(-1, 0)), None);
    }

    #[test]
    fn write_at_blits_to_origin() {
        let mut surface = Surface::new(Size::new(2, 2), Rgb565::BLUE);
        surface.draw_iter([Pixel(Point::new(1, 1), Rgb565::RED)]).unwrap();

        let mut display = MockDisplay::<Rgb565>::new();
        surface.write_at(&mut display, Point::new(5, 3)).unwrap();

        assert_eq!(display.get_pixel(Point::new(5, 3)), Some(Rgb565::BLUE));
        assert_eq!(display.get_pixel(Point::new(6, 4)), Some(Rgb565::RED));
        assert_eq!(display.get_pixel(Point::new(4, 3)), None);
    }
}
