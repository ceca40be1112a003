use crate::core::data::complex::Complex;
use thiserror::Error;

#[derive(Debug, Copy, Clone, PartialEq, Error)]
pub enum ViewportError {
    #[error("viewport size must be positive and finite: {width}x{height}")]
    InvalidSize { width: f64, height: f64 },
    #[error("viewport origin must be finite: ({min_x}, {min_y})")]
    NonFiniteOrigin { min_x: f64, min_y: f64 },
}

/// A rectangle in the complex plane.
///
/// `min_y` is the bottom edge; pixel row 0 maps to [`Viewport::max_y`].
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Viewport {
    min_x: f64,
    min_y: f64,
    width: f64,
    height: f64,
}

impl Viewport {
    pub fn new(min_x: f64, min_y: f64, width: f64, height: f64) -> Result<Self, ViewportError> {
        if !min_x.is_finite() || !min_y.is_finite() {
            return Err(ViewportError::NonFiniteOrigin { min_x, min_y });
        }

        // `!(x > 0.0)` also rejects NaN.
        if !(width > 0.0 && height > 0.0) || !width.is_finite() || !height.is_finite() {
            return Err(ViewportError::InvalidSize { width, height });
        }

        Ok(Self {
            min_x,
            min_y,
            width,
            height,
        })
    }

    /// The full view shown at startup.
    #[must_use]
    pub const fn initial() -> Self {
        Self {
            min_x: -2.5,
            min_y: -1.0,
            width: 3.5,
            height: 2.0,
        }
    }

    /// Builds the rectangle spanned by two opposite corners, in any order.
    pub fn from_corners(a: Complex, b: Complex) -> Result<Self, ViewportError> {
        Self::new(
            a.real.min(b.real),
            a.imag.min(b.imag),
            (b.real - a.real).abs(),
            (b.imag - a.imag).abs(),
        )
    }

    #[must_use]
    pub fn min_x(&self) -> f64 {
        self.min_x
    }

    #[must_use]
    pub fn min_y(&self) -> f64 {
        self.min_y
    }

    #[must_use]
    pub fn width(&self) -> f64 {
        self.width
    }

    #[must_use]
    pub fn height(&self) -> f64 {
        self.height
    }

    #[must_use]
    pub fn max_x(&self) -> f64 {
        self.min_x + self.width
    }

    #[must_use]
    pub fn max_y(&self) -> f64 {
        self.min_y + self.height
    }

    /// Maps a (possibly fractional) pixel position onto the complex plane.
    ///
    /// `pixel_x`/`pixel_y` already include the sub-pixel offset, so the pixel
    /// centre of column `w` is `w + 0.5`.
    #[must_use]
    #[inline]
    pub fn map_pixel(&self, pixel_x: f64, pixel_y: f64, pixel_width: u32, pixel_height: u32) -> Complex {
        Complex {
            real: self.min_x + pixel_x / f64::from(pixel_width) * self.width,
            imag: self.max_y() - pixel_y / f64::from(pixel_height) * self.height,
        }
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self::initial()
    }
}
