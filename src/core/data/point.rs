/// A screen-space pixel coordinate, as reported by the presentation layer.
///
/// Signed so that drag selections released outside the image still map cleanly.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Default)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    #[must_use]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}
