use std::path::Path;

use tracing::{info, warn};

use crate::controllers::interactive::Explorer;
use crate::controllers::interactive::data::render_summary::RenderStatus;
use crate::controllers::interactive::RenderResult;
use crate::controllers::ports::file_presenter::FilePresenterPort;
use crate::core::actions::render_tiles::ports::pixel_sampler::PixelSampler;
use crate::core::navigation::zoom::Selection;

/// Replays a sequence of zoom selections and renders the final view once.
pub struct BatchController<P: FilePresenterPort, S: PixelSampler + 'static> {
    presenter: P,
    explorer: Explorer<S>,
    last_result: Option<RenderResult>,
}

impl<P: FilePresenterPort, S: PixelSampler + 'static> BatchController<P, S> {
    pub fn new(presenter: P, explorer: Explorer<S>) -> Self {
        Self {
            presenter,
            explorer,
            last_result: None,
        }
    }

    #[must_use]
    pub fn explorer(&self) -> &Explorer<S> {
        &self.explorer
    }

    #[must_use]
    pub fn last_result(&self) -> Option<&RenderResult> {
        self.last_result.as_ref()
    }

    pub fn generate(&mut self, zooms: &[Selection]) -> Result<&RenderResult, Box<dyn std::error::Error>> {
        for selection in zooms {
            self.explorer.navigate_to_selection(selection.start, selection.end)?;
        }

        let viewport = self.explorer.viewport();
        let config = self.explorer.config();

        info!(
            width = config.pixel_width,
            height = config.pixel_height,
            super_samples = config.super_samples,
            max_iterations = config.max_iterations,
            zoom_depth = self.explorer.history().len(),
            min_x = viewport.min_x(),
            min_y = viewport.min_y(),
            view_width = viewport.width(),
            view_height = viewport.height(),
            "rendering mandelbrot set"
        );

        let result = self.explorer.render()?.await_result();

        match &result.status {
            RenderStatus::FailedPartial { failed_tiles } => {
                warn!(failed_tiles = failed_tiles.len(), "some tiles failed and were left blank");
            }
            status => {
                info!(?status, "calculation time: {} ms", result.elapsed.as_millis());
            }
        }

        Ok(self.last_result.insert(result))
    }

    pub fn write(&self, filepath: &Path) -> std::io::Result<()> {
        if let Some(result) = &self.last_result {
            self.presenter.present(&result.buffer, filepath)?;
            info!(path = %filepath.display(), "image written");
        }

        Ok(())
    }
}
