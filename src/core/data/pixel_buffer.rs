use crate::core::data::colour::Colour;
use crate::core::data::tile::{Tile, TileResult};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PixelBufferError {
    #[error("pixel buffer dimensions must be positive: {width}x{height}")]
    InvalidDimensions { width: u32, height: u32 },
    #[error("pixel at x:{x}, y:{y} outside of {width}x{height} buffer")]
    PixelOutsideBounds {
        x: u32,
        y: u32,
        width: u32,
        height: u32,
    },
    #[error("tile {index} extends outside of {width}x{height} buffer")]
    TileOutsideBounds {
        index: usize,
        width: u32,
        height: u32,
    },
    #[error("tile {index} covers {expected} pixels but result holds {actual}")]
    TileSizeMismatch {
        index: usize,
        expected: usize,
        actual: usize,
    },
}

/// A `width × height` grid of colours indexed `[x][y]`.
///
/// Storage is column-major so a column tile is one contiguous slice.
/// `None` marks a pixel that has not been written (or belongs to a failed tile).
#[derive(Debug, Clone, PartialEq)]
pub struct PixelBuffer {
    width: u32,
    height: u32,
    pixels: Vec<Option<Colour>>,
}

impl PixelBuffer {
    pub fn new(width: u32, height: u32) -> Result<Self, PixelBufferError> {
        if width == 0 || height == 0 {
            return Err(PixelBufferError::InvalidDimensions { width, height });
        }

        Ok(Self {
            width,
            height,
            pixels: vec![None; width as usize * height as usize],
        })
    }

    #[must_use]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[must_use]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// The colour at `(x, y)`, or `None` if unwritten or out of bounds.
    #[must_use]
    pub fn pixel(&self, x: u32, y: u32) -> Option<Colour> {
        if x >= self.width || y >= self.height {
            return None;
        }

        self.pixels[self.index(x, y)]
    }

    pub fn set_pixel(&mut self, x: u32, y: u32, colour: Colour) -> Result<(), PixelBufferError> {
        if x >= self.width || y >= self.height {
            return Err(PixelBufferError::PixelOutsideBounds {
                x,
                y,
                width: self.width,
                height: self.height,
            });
        }

        let index = self.index(x, y);
        self.pixels[index] = Some(colour);
        Ok(())
    }

    pub fn write_tile(&mut self, tile: &Tile, result: &TileResult) -> Result<(), PixelBufferError> {
        self.check_tile(tile)?;

        if result.colours.len() != tile.pixel_count() {
            return Err(PixelBufferError::TileSizeMismatch {
                index: tile.index,
                expected: tile.pixel_count(),
                actual: result.colours.len(),
            });
        }

        let column_height = tile.height() as usize;
        for (x, column) in (tile.x_start..tile.x_end).zip(result.colours.chunks(column_height)) {
            let start = self.index(x, tile.y_start);
            for (slot, colour) in self.pixels[start..start + column_height].iter_mut().zip(column) {
                *slot = Some(*colour);
            }
        }

        Ok(())
    }

    /// Resets every pixel of `tile` to the unwritten sentinel.
    pub fn clear_tile(&mut self, tile: &Tile) -> Result<(), PixelBufferError> {
        self.check_tile(tile)?;

        let column_height = tile.height() as usize;
        for x in tile.x_start..tile.x_end {
            let start = self.index(x, tile.y_start);
            self.pixels[start..start + column_height].fill(None);
        }

        Ok(())
    }

    #[must_use]
    pub fn unwritten_count(&self) -> usize {
        self.pixels.iter().filter(|pixel| pixel.is_none()).count()
    }

    #[must_use]
    pub fn is_fully_written(&self) -> bool {
        self.pixels.iter().all(Option::is_some)
    }

    /// Row-major packed RGB bytes; unwritten pixels take `background`.
    #[must_use]
    pub fn to_rgb_bytes(&self, background: Colour) -> Vec<u8> {
        let mut bytes = Vec::with_capacity(self.pixels.len() * 3);

        for y in 0..self.height {
            for x in 0..self.width {
                let colour = self.pixels[self.index(x, y)].unwrap_or(background);
                bytes.extend_from_slice(&colour.to_rgb8());
            }
        }

        bytes
    }

    fn index(&self, x: u32, y: u32) -> usize {
        x as usize * self.height as usize + y as usize
    }

    fn check_tile(&self, tile: &Tile) -> Result<(), PixelBufferError> {
        if tile.x_end > self.width
            || tile.y_end > self.height
            || tile.x_start > tile.x_end
            || tile.y_start > tile.y_end
        {
            return Err(PixelBufferError::TileOutsideBounds {
                index: tile.index,
                width: self.width,
                height: self.height,
            });
        }

        Ok(())
    }
}
