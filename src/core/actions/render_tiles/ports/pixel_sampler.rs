use rand::Rng;

use crate::core::actions::cancellation::{CancelToken, Cancelled};
use crate::core::data::colour::Colour;
use crate::core::data::render_config::RenderConfig;
use crate::core::data::viewport::Viewport;

/// Computes the final colour of one pixel.
///
/// Implementations poll `cancel` before every sample and return
/// [`Cancelled`] as soon as it fires; the partial pixel is discarded.
pub trait PixelSampler: Send + Sync {
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
        C: CancelToken + ?Sized;
}
