use std::num::ParseIntError;
use std::str::FromStr;

use thiserror::Error;

use crate::core::data::point::Point;
use crate::core::data::viewport::{Viewport, ViewportError};

/// Maps a screen-space drag rectangle onto `viewport`, giving the zoomed-in view.
///
/// Corners may be given in any order. A selection with zero width or height is
/// rejected rather than producing a degenerate viewport.
pub fn zoom_to_selection(
    viewport: &Viewport,
    start: Point,
    end: Point,
    pixel_width: u32,
    pixel_height: u32,
) -> Result<Viewport, ViewportError> {
    let a = viewport.map_pixel(f64::from(start.x), f64::from(start.y), pixel_width, pixel_height);
    let b = viewport.map_pixel(f64::from(end.x), f64::from(end.y), pixel_width, pixel_height);

    Viewport::from_corners(a, b)
}

/// A drag rectangle between two screen points.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Selection {
    pub start: Point,
    pub end: Point,
}

impl Selection {
    #[must_use]
    pub const fn new(start: Point, end: Point) -> Self {
        Self { start, end }
    }

    pub fn apply(
        &self,
        viewport: &Viewport,
        pixel_width: u32,
        pixel_height: u32,
    ) -> Result<Viewport, ViewportError> {
        zoom_to_selection(viewport, self.start, self.end, pixel_width, pixel_height)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SelectionParseError {
    #[error("selection needs four comma separated values x1,y1,x2,y2, got {0}")]
    WrongArity(usize),
    #[error("invalid selection coordinate: {0}")]
    InvalidCoordinate(#[from] ParseIntError),
}

impl FromStr for Selection {
    type Err = SelectionParseError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let parts = value
            .split(',')
            .map(|part| part.trim().parse::<i32>())
            .collect::<Result<Vec<_>, _>>()?;

        match parts.as_slice() {
            &[x1, y1, x2, y2] => Ok(Self::new(Point::new(x1, y1), Point::new(x2, y2))),
            other => Err(SelectionParseError::WrongArity(other.len())),
        }
    }
}
