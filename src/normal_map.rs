//! Normal-mapping compositor.
//!
//! A static base image is relit by a light sprite. Every pixel carries a
//! deflection from the normal map which shifts where the sprite is sampled,
//! so flat artwork picks up highlights as if its surface had relief.

use alloc::vec::Vec;

use embedded_graphics::{
    image::ImageDrawable,
    pixelcolor::{
        Rgb565,
        Rgb888,
    },
    prelude::*,
    primitives::Rectangle,
};

use crate::{
    config::REFRESH_THRESHOLD,
    error::{
        Error,
        Result,
    },
    surface::Surface,
};

/// Pixel format of composited surfaces.
pub type Color = Rgb565;

/// Base brightness of unlit pixels, out of 255.
pub const DEFAULT_AMBIENT: u8 = 96;

// ── Normal map ──────────────────────────────────────────────────────────────

/// Per-pixel deflection vectors.
///
/// Each entry packs a signed x deflection in the high byte and a signed y
/// deflection in the low byte.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalMap {
    size: Size,
    data: Vec<u16>,
    max_deflection: u32,
}

impl NormalMap {
    pub const fn pack(dx: i8, dy: i8) -> u16 {
        ((dx as u8 as u16) << 8) | dy as u8 as u16
    }

    pub const fn unpack(entry: u16) -> (i8, i8) {
        ((entry >> 8) as u8 as i8, entry as u8 as i8)
    }

    /// Wrap packed entries, one per pixel in row-major order.
    pub fn from_raw(size: Size, data: Vec<u16>) -> Result<Self> {
        let expected = (size.width * size.height) as usize;
        if data.len() != expected {
            return Err(Error::DataLength {
                expected,
                found: data.len(),
            });
        }
        Ok(Self {
            size,
            max_deflection: max_deflection(&data),
            data,
        })
    }

    /// A map without relief: the sprite is sampled where it is drawn.
    pub fn flat(size: Size) -> Self {
        Self {
            size,
            data: alloc::vec![0; (size.width * size.height) as usize],
            max_deflection: 0,
        }
    }

    /// Derive deflections from a height field by central differences.
    ///
    /// `strength` scales the slope; results saturate at ±127. Higher ground
    /// tilts towards lower ground, so ridges catch the light on their flanks.
    pub fn from_height(size: Size, strength: i32, height: impl Fn(Point) -> i32) -> Self {
        let mut data = Vec::with_capacity((size.width * size.height) as usize);
        for y in 0..size.height as i32 {
            for x in 0..size.width as i32 {
                let sx = height(Point::new(x - 1, y)) - height(Point::new(x + 1, y));
                let sy = height(Point::new(x, y - 1)) - height(Point::new(x, y + 1));
                data.push(Self::pack(saturate(sx * strength / 2), saturate(sy * strength / 2)));
            }
        }
        Self {
            size,
            max_deflection: max_deflection(&data),
            data,
        }
    }

    /// Decode a tangent-space normal-map image: red is x, green is y, both
    /// centred on 128.
    pub fn from_image<I>(image: &I) -> Self
    where
        I: ImageDrawable<Color = Rgb888>,
    {
        let size = image.size();
        let mut decoded = Surface::new(size, Rgb888::new(128, 128, 0));
        let Ok(()) = image.draw(&mut decoded);
        let data: Vec<u16> = decoded
            .pixels()
            .iter()
            .map(|c| Self::pack(centred(c.r()), centred(c.g())))
            .collect();
        Self {
            size,
            max_deflection: max_deflection(&data),
            data,
        }
    }

    pub const fn size(&self) -> Size {
        self.size
    }

    /// Largest deflection on either axis, in pixels.
    pub const fn max_deflection(&self) -> u32 {
        self.max_deflection
    }

    pub fn deflection(&self, p: Point) -> Point {
        let (w, h) = (self.size.width as i32, self.size.height as i32);
        if p.x < 0 || p.x >= w || p.y < 0 || p.y >= h {
            return Point::zero();
        }
        self.deflection_at((p.y * w + p.x) as usize)
    }

    fn deflection_at(&self, index: usize) -> Point {
        let (dx, dy) = Self::unpack(self.data[index]);
        Point::new(i32::from(dx), i32::from(dy))
    }
}

fn max_deflection(data: &[u16]) -> u32 {
    data.iter()
        .map(|&e| {
            let (dx, dy) = NormalMap::unpack(e);
            u32::from(dx.unsigned_abs().max(dy.unsigned_abs()))
        })
        .max()
        .unwrap_or(0)
}

fn saturate(v: i32) -> i8 {
    v.clamp(-127, 127) as i8
}

fn centred(channel: u8) -> i8 {
    (i16::from(channel) - 128) as i8
}

// ── Light sprite ────────────────────────────────────────────────────────────

/// 8-bit light intensity bitmap, centred on the light position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LightSprite {
    size: Size,
    intensity: Vec<u8>,
}

impl LightSprite {
    pub fn from_raw(size: Size, intensity: Vec<u8>) -> Result<Self> {
        let expected = (size.width * size.height) as usize;
        if intensity.len() != expected {
            return Err(Error::DataLength {
                expected,
                found: intensity.len(),
            });
        }
        Ok(Self { size, intensity })
    }

    /// Round light cone with quadratic falloff, full intensity in the middle.
    pub fn cone(diameter: u32) -> Self {
        let r = (diameter / 2).max(1) as i32;
        let r2 = r * r;
        let mut intensity = Vec::with_capacity((diameter * diameter) as usize);
        for y in 0..diameter as i32 {
            for x in 0..diameter as i32 {
                let d2 = (x - r) * (x - r) + (y - r) * (y - r);
                let level = if d2 >= r2 { 0 } else { 255 * (r2 - d2) / r2 };
                intensity.push(level as u8);
            }
        }
        Self {
            size: Size::new(diameter, diameter),
            intensity,
        }
    }

    pub const fn size(&self) -> Size {
        self.size
    }

    /// Offset of the light position inside the sprite.
    pub const fn center(&self) -> Point {
        Point::new((self.size.width / 2) as i32, (self.size.height / 2) as i32)
    }

    /// Intensity at `p` in sprite coordinates, zero outside.
    pub fn intensity_at(&self, p: Point) -> u8 {
        let (w, h) = (self.size.width as i32, self.size.height as i32);
        if p.x < 0 || p.x >= w || p.y < 0 || p.y >= h {
            return 0;
        }
        self.intensity[(p.y * w + p.x) as usize]
    }
}

// ── Composition ─────────────────────────────────────────────────────────────

/// Which light contribution a composition pass includes.
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pass {
    /// Whole surface, base image at ambient level only.
    Unlit,
    /// Incremental pass around the light.
    Lit,
}

/// Recombines a base image, a normal map and a light into an offscreen
/// surface, and blits that surface.
pub trait NormalMapping {
    fn compose(&mut self, at: Point, pass: Pass);

    /// Largest per-axis light jump between two lit passes that must not
    /// leave a stale highlight behind.
    fn set_refresh_threshold(&mut self, pixels: u32);

    fn write_at<D>(&self, target: &mut D, origin: Point) -> Result<(), D::Error>
    where
        D: DrawTarget<Color = Color>;
}

/// Everything one normal-mapping pass reads and writes.
///
/// The destination surface, the base image surface and the normal map
/// always share one size.
#[derive(Debug, Clone)]
pub struct CompositionContext<'a> {
    dest: Surface<Color>,
    image: Surface<Color>,
    light: Option<&'a LightSprite>,
    normals: &'a NormalMap,
    ambient: u8,
    threshold: u32,
}

impl<'a> CompositionContext<'a> {
    /// Build a context around an already rendered base image surface.
    pub fn new(image: Surface<Color>, normals: &'a NormalMap, light: &'a LightSprite) -> Result<Self> {
        let size = image.size();
        if normals.size() != size {
            return Err(Error::SizeMismatch {
                expected: size,
                found: normals.size(),
            });
        }
        Ok(Self {
            dest: Surface::new(size, Color::BLACK),
            image,
            light: Some(light),
            normals,
            ambient: DEFAULT_AMBIENT,
            threshold: REFRESH_THRESHOLD,
        })
    }

    /// Create both surfaces sized to `base` and copy `base` into the source.
    pub fn from_image<I>(base: &I, normals: &'a NormalMap, light: &'a LightSprite) -> Result<Self>
    where
        I: ImageDrawable<Color = Color>,
    {
        let mut image = Surface::new(base.size(), Color::BLACK);
        let Ok(()) = base.draw(&mut image);
        Self::new(image, normals, light)
    }

    #[must_use]
    pub const fn with_ambient(mut self, ambient: u8) -> Self {
        self.ambient = ambient;
        self
    }

    pub fn size(&self) -> Size {
        self.image.size()
    }

    pub const fn destination(&self) -> &Surface<Color> {
        &self.dest
    }

    pub const fn source(&self) -> &Surface<Color> {
        &self.image
    }

    pub const fn light(&self) -> Option<&'a LightSprite> {
        self.light
    }

    /// One normal-mapping pass with the current light reference.
    ///
    /// Without a light the whole destination is rewritten at ambient level.
    /// With a light only the area the light can reach is rewritten, grown by
    /// the refresh threshold ([`REFRESH_THRESHOLD`] unless changed) so a light
    /// that moved at most that far on both axes leaves no stale highlight
    /// behind.
    pub fn normal_mapping(&mut self, at: Point) {
        let ambient = u16::from(self.ambient);
        let width = self.image.size().width as i32;
        let lit = self.light.map(|sprite| (sprite, self.lit_region(at, sprite)));
        let normals = self.normals;
        let image = self.image.pixels();
        let dest = self.dest.pixels_mut();

        let Some((sprite, region)) = lit else {
            for (out, &base) in dest.iter_mut().zip(image) {
                *out = shade(base, ambient);
            }
            return;
        };

        let origin = sprite.center() - at;
        for y in region.rows() {
            for x in region.columns() {
                let index = (y * width + x) as usize;
                let sample = Point::new(x, y) + normals.deflection_at(index) + origin;
                let level = ambient + u16::from(sprite.intensity_at(sample));
                dest[index] = shade(image[index], level);
            }
        }
    }

    fn lit_region(&self, at: Point, sprite: &LightSprite) -> Rectangle {
        let margin = (self.normals.max_deflection() + self.threshold) as i32;
        let reach = Rectangle::new(
            at - sprite.center() - Point::new(margin, margin),
            sprite.size() + Size::new(2 * margin as u32, 2 * margin as u32),
        );
        reach.intersection(&Rectangle::new(Point::zero(), self.image.size()))
    }
}

impl NormalMapping for CompositionContext<'_> {
    fn compose(&mut self, at: Point, pass: Pass) {
        match pass {
            Pass::Lit => self.normal_mapping(at),
            Pass::Unlit => {
                let light = self.light.take();
                self.normal_mapping(at);
                self.light = light;
            }
        }
    }

    fn set_refresh_threshold(&mut self, pixels: u32) {
        self.threshold = pixels;
    }

    fn write_at<D>(&self, target: &mut D, origin: Point) -> Result<(), D::Error>
    where
        D: DrawTarget<Color = Color>,
    {
        self.dest.write_at(target, origin)
    }
}

/// Scale a colour by `level / 255`, saturating each channel.
fn shade(c: Color, level: u16) -> Color {
    let scale = |v: u8, max: u8| (u16::from(v) * level / 255).min(u16::from(max)) as u8;
    Color::new(
        scale(c.r(), Color::MAX_R),
        scale(c.g(), Color::MAX_G),
        scale(c.b(), Color::MAX_B),
    )
}
