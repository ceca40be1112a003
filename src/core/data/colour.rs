use std::ops::{AddAssign, Div};

/// An RGB colour with components in `[0, 1]`.
#[derive(Debug, Copy, Clone, PartialEq, Default)]
pub struct Colour {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

impl Colour {
    pub const BLACK: Self = Self {
        r: 0.0,
        g: 0.0,
        b: 0.0,
    };

    pub const WHITE: Self = Self {
        r: 1.0,
        g: 1.0,
        b: 1.0,
    };

    #[must_use]
    pub const fn new(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b }
    }

    #[must_use]
    pub fn is_black(&self) -> bool {
        self.r == 0.0 && self.g == 0.0 && self.b == 0.0
    }

    /// Clamps every component into `[0, 1]`. NaN components become 0.
    #[must_use]
    pub fn clamped(self) -> Self {
        Self {
            r: clamp_component(self.r),
            g: clamp_component(self.g),
            b: clamp_component(self.b),
        }
    }

    /// 8-bit RGB, rounding to nearest.
    #[must_use]
    pub fn to_rgb8(self) -> [u8; 3] {
        let c = self.clamped();
        [to_byte(c.r), to_byte(c.g), to_byte(c.b)]
    }
}

fn clamp_component(value: f32) -> f32 {
    if value.is_nan() { 0.0 } else { value.clamp(0.0, 1.0) }
}

fn to_byte(value: f32) -> u8 {
    (value * 255.0 + 0.5) as u8
}

impl AddAssign for Colour {
    fn add_assign(&mut self, other: Self) {
        self.r += other.r;
        self.g += other.g;
        self.b += other.b;
    }
}

impl Div<f32> for Colour {
    type Output = Self;

    fn div(self, divisor: f32) -> Self {
        Self {
            r: self.r / divisor,
            g: self.g / divisor,
            b: self.b / divisor,
        }
    }
}
