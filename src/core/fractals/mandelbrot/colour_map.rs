use crate::core::actions::render_tiles::ports::colour_map::ColourMap;
use crate::core::data::colour::Colour;

/// Black inside the set, black→green far from it, green→white near the boundary.
///
/// `c = cbrt(iterations / max_iterations)`; above a quotient of 0.5 the colour
/// is `(c, 1, c)`, otherwise `(0, c, 0)`.
#[must_use]
pub fn colour_for(iterations: u32, max_iterations: u32) -> Colour {
    if iterations >= max_iterations {
        return Colour::BLACK;
    }

    let quotient = f64::from(iterations) / f64::from(max_iterations);
    let c = quotient.cbrt() as f32;

    if quotient > 0.5 {
        Colour::new(c, 1.0, c)
    } else {
        Colour::new(0.0, c, 0.0)
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct GreenWhiteGradient;

impl ColourMap for GreenWhiteGradient {
    #[inline]
    fn map(&self, iterations: u32, max_iterations: u32) -> Colour {
        colour_for(iterations, max_iterations)
    }

    fn display_name(&self) -> &str {
        "Green-white gradient"
    }
}
