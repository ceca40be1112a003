use crate::core::data::tile::TileLayout;

/// Worker pool size and tile decomposition, fixed for the engine's lifetime.
///
/// `threads: None` lets rayon pick one worker per available core.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
pub struct EngineSettings {
    pub threads: Option<usize>,
    pub tile_layout: TileLayout,
}

impl EngineSettings {
    #[must_use]
    pub fn with_threads(mut self, threads: usize) -> Self {
        self.threads = Some(threads);
        self
    }

    #[must_use]
    pub fn with_tile_layout(mut self, tile_layout: TileLayout) -> Self {
        self.tile_layout = tile_layout;
        self
    }
}
