use std::any::Any;
use std::panic::{self, AssertUnwindSafe};

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use thiserror::Error;
use tracing::warn;

use crate::core::actions::cancellation::{CancelToken, Cancelled};
use crate::core::actions::render_tiles::ports::pixel_sampler::PixelSampler;
use crate::core::data::render_config::RenderConfig;
use crate::core::data::tile::{Tile, TileResult};
use crate::core::data::viewport::Viewport;

/// A tile whose computation panicked. Its pixels are left unwritten.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("tile {index} failed: {message}")]
pub struct TileFailure {
    pub index: usize,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq)]
pub enum TileOutcome {
    Rendered(TileResult),
    Failed(TileFailure),
    Cancelled,
}

/// Renders every pixel of `tile` in column-major order.
///
/// This is the whole contract a remote or local executor has to honour:
/// given the same inputs (and rng state) it returns the same index-tagged colours.
pub fn render_tile<S, R, C>(
    tile: &Tile,
    viewport: &Viewport,
    config: &RenderConfig,
    sampler: &S,
    rng: &mut R,
    cancel: &C,
) -> Result<TileResult, Cancelled>
where
    S: PixelSampler + ?Sized,
    R: Rng + ?Sized,
    C: CancelToken + ?Sized,
{
    let mut colours = Vec::with_capacity(tile.pixel_count());

    for (x, y) in tile.pixels() {
        colours.push(sampler.sample(x, y, viewport, config, rng, cancel)?);
    }

    Ok(TileResult {
        index: tile.index,
        colours,
    })
}

/// Runs [`render_tile`] with a per-tile rng, turning a panic into [`TileOutcome::Failed`].
pub(crate) fn run_tile_guarded<S, C>(
    tile: &Tile,
    viewport: &Viewport,
    config: &RenderConfig,
    sampler: &S,
    base_seed: u64,
    cancel: &C,
) -> TileOutcome
where
    S: PixelSampler + ?Sized,
    C: CancelToken + ?Sized,
{
    let rendered = panic::catch_unwind(AssertUnwindSafe(|| {
        let mut rng = StdRng::seed_from_u64(tile_seed(base_seed, tile.index));
        render_tile(tile, viewport, config, sampler, &mut rng, cancel)
    }));

    match rendered {
        Ok(Ok(result)) => TileOutcome::Rendered(result),
        Ok(Err(Cancelled)) => TileOutcome::Cancelled,
        Err(payload) => {
            let failure = TileFailure {
                index: tile.index,
                message: panic_message(payload.as_ref()),
            };
            warn!(tile = tile.index, error = %failure.message, "tile render failed");
            TileOutcome::Failed(failure)
        }
    }
}

/// Derives an independent rng stream per tile from the render seed.
#[must_use]
pub fn tile_seed(base_seed: u64, index: usize) -> u64 {
    base_seed ^ (index as u64).wrapping_add(1).wrapping_mul(0x9E37_79B9_7F4A_7C15)
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic".to_string()
    }
}
