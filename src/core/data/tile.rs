use crate::core::data::colour::Colour;
use std::str::FromStr;
use thiserror::Error;

/// How an image is split into independently rendered tiles.
///
/// Tiles are always numbered column-of-tiles first, so ascending tile index
/// walks the image left to right.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub enum TileLayout {
    /// One tile per pixel column.
    #[default]
    Columns,
    /// One tile per pixel row.
    Rows,
    /// Square blocks of `size` pixels; edge blocks are clipped to the image.
    Blocks { size: u32 },
}

impl TileLayout {
    #[must_use]
    pub fn tiles(self, pixel_width: u32, pixel_height: u32) -> Vec<Tile> {
        match self {
            Self::Columns => (0..pixel_width)
                .enumerate()
                .map(|(index, x)| Tile::new(index, x..x + 1, 0..pixel_height))
                .collect(),
            Self::Rows => (0..pixel_height)
                .enumerate()
                .map(|(index, y)| Tile::new(index, 0..pixel_width, y..y + 1))
                .collect(),
            Self::Blocks { size } => {
                let size = size.max(1);
                let mut tiles = Vec::new();

                for x in (0..pixel_width).step_by(size as usize) {
                    for y in (0..pixel_height).step_by(size as usize) {
                        let x_end = x.saturating_add(size).min(pixel_width);
                        let y_end = y.saturating_add(size).min(pixel_height);
                        tiles.push(Tile::new(tiles.len(), x..x_end, y..y_end));
                    }
                }

                tiles
            }
        }
    }

    #[must_use]
    pub fn tile_count(self, pixel_width: u32, pixel_height: u32) -> usize {
        match self {
            Self::Columns => pixel_width as usize,
            Self::Rows => pixel_height as usize,
            Self::Blocks { size } => {
                let size = size.max(1);
                pixel_width.div_ceil(size) as usize * pixel_height.div_ceil(size) as usize
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown tile layout '{0}', expected columns, rows or blocks:<size>")]
pub struct TileLayoutParseError(pub String);

impl FromStr for TileLayout {
    type Err = TileLayoutParseError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let trimmed = value.trim().to_ascii_lowercase();

        match trimmed.as_str() {
            "columns" | "column" => Ok(Self::Columns),
            "rows" | "row" => Ok(Self::Rows),
            other => other
                .strip_prefix("blocks:")
                .and_then(|size| size.parse::<u32>().ok())
                .filter(|&size| size > 0)
                .map(|size| Self::Blocks { size })
                .ok_or_else(|| TileLayoutParseError(value.to_string())),
        }
    }
}

/// A rectangular range of pixels rendered as one unit of work.
///
/// Ranges are half-open: `x_start..x_end`, `y_start..y_end`.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Tile {
    pub index: usize,
    pub x_start: u32,
    pub x_end: u32,
    pub y_start: u32,
    pub y_end: u32,
}

impl Tile {
    #[must_use]
    pub fn new(index: usize, x: std::ops::Range<u32>, y: std::ops::Range<u32>) -> Self {
        Self {
            index,
            x_start: x.start,
            x_end: x.end,
            y_start: y.start,
            y_end: y.end,
        }
    }

    #[must_use]
    pub fn width(&self) -> u32 {
        self.x_end - self.x_start
    }

    #[must_use]
    pub fn height(&self) -> u32 {
        self.y_end - self.y_start
    }

    #[must_use]
    pub fn pixel_count(&self) -> usize {
        self.width() as usize * self.height() as usize
    }

    /// Pixel coordinates in column-major order, the order of [`TileResult::colours`].
    pub fn pixels(&self) -> impl Iterator<Item = (u32, u32)> + use<> {
        let (y_start, y_end) = (self.y_start, self.y_end);
        (self.x_start..self.x_end).flat_map(move |x| (y_start..y_end).map(move |y| (x, y)))
    }
}

/// Colours for one tile, tagged with the tile index for in-order reassembly.
#[derive(Debug, Clone, PartialEq)]
pub struct TileResult {
    pub index: usize,
    pub colours: Vec<Colour>,
}
