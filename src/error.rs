//! Construction-time errors.
//!
//! The running compositor has no recoverable failures; these only guard the
//! size invariants checked when surfaces, normal maps and contexts are built.

use core::fmt;

use embedded_graphics::geometry::Size;

#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// Two buffers that must share dimensions do not.
    SizeMismatch { expected: Size, found: Size },
    /// Raw per-pixel data does not hold exactly one entry per pixel.
    DataLength { expected: usize, found: usize },
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SizeMismatch { expected, found } => write!(
                f,
                "size mismatch: expected {}x{}, found {}x{}",
                expected.width, expected.height, found.width, found.height
            ),
            Self::DataLength { expected, found } => write!(
                f,
                "pixel data holds {found} entries, expected {expected}"
            ),
        }
    }
}

impl core::error::Error for Error {}

pub type Result<T, E = Error> = core::result::Result<T, E>;
