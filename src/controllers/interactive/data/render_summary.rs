use std::time::Duration;

use crate::core::actions::render_tiles::tile_job::TileFailure;

/// Lifecycle of a single render.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RenderStatus {
    Rendering,
    Completed,
    Cancelled,
    /// Every tile was attempted but some panicked; their pixels stay unwritten.
    FailedPartial { failed_tiles: Vec<TileFailure> },
}

impl RenderStatus {
    #[must_use]
    pub fn is_terminal(&self) -> bool {
        !matches!(self, Self::Rendering)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderSummary {
    pub generation: u64,
    pub status: RenderStatus,
    pub elapsed: Duration,
}
