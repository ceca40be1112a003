use rand::Rng;

use crate::core::actions::cancellation::{CancelToken, Cancelled};
use crate::core::actions::render_tiles::ports::colour_map::ColourMap;
use crate::core::actions::render_tiles::ports::pixel_sampler::PixelSampler;
use crate::core::data::colour::Colour;
use crate::core::data::render_config::RenderConfig;
use crate::core::data::viewport::Viewport;
use crate::core::fractals::mandelbrot::colour_map::GreenWhiteGradient;
use crate::core::fractals::mandelbrot::escape_time::escape_iterations;

const PIXEL_CENTRE: f64 = 0.5;

/// Supersampling Mandelbrot pixel sampler.
///
/// A single sample is taken at the pixel centre; more samples are jittered
/// uniformly inside the pixel and their mapped colours averaged.
#[derive(Debug, Clone)]
pub struct MandelbrotSampler<M = GreenWhiteGradient> {
    colour_map: M,
}

impl Default for MandelbrotSampler<GreenWhiteGradient> {
    fn default() -> Self {
        Self::new(GreenWhiteGradient)
    }
}

impl<M: ColourMap> MandelbrotSampler<M> {
    #[must_use]
    pub fn new(colour_map: M) -> Self {
        Self { colour_map }
    }
}

impl<M: ColourMap> PixelSampler for MandelbrotSampler<M> {
    fn sample<R, C>(
        &self,
        pixel_x: u32,
        pixel_y: u32,
        viewport: &Viewport,
        config: &RenderConfig,
        rng: &mut R,
        cancel: &C,
    ) -> Result<Colour, Cancelled>
    where
        R: Rng + ?Sized,
        C: CancelToken + ?Sized,
    {
        let samples = config.super_samples.max(1);
        let mut sum = Colour::BLACK;

        for _ in 0..samples {
            if cancel.is_cancelled() {
                return Err(Cancelled);
            }

            let (offset_x, offset_y) = if samples == 1 {
                (PIXEL_CENTRE, PIXEL_CENTRE)
            } else {
                (rng.gen_range(0.0..1.0), rng.gen_range(0.0..1.0))
            };

            let c = viewport.map_pixel(
                f64::from(pixel_x) + offset_x,
                f64::from(pixel_y) + offset_y,
                config.pixel_width,
                config.pixel_height,
            );
            let iterations = escape_iterations(c.real, c.imag, config.max_iterations);

            sum += self.colour_map.map(iterations, config.max_iterations);
        }

        Ok((sum / samples as f32).clamped())
    }
}
