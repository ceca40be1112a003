use tracing::debug;

use crate::controllers::interactive::engine::RenderEngine;
use crate::controllers::interactive::errors::render_error::RenderError;
use crate::controllers::interactive::handle::RenderHandle;
use crate::core::actions::render_tiles::ports::pixel_sampler::PixelSampler;
use crate::core::data::complex::Complex;
use crate::core::data::point::Point;
use crate::core::data::render_config::{RenderConfig, RenderConfigError};
use crate::core::data::viewport::{Viewport, ViewportError};
use crate::core::fractals::mandelbrot::sampler::MandelbrotSampler;
use crate::core::navigation::history::ViewportHistory;
use crate::core::navigation::zoom::zoom_to_selection;

/// A zoomable view onto the set: the current viewport, the way back, and the
/// engine that draws it.
pub struct Explorer<S: PixelSampler + 'static = MandelbrotSampler> {
    engine: RenderEngine<S>,
    history: ViewportHistory,
    viewport: Viewport,
    config: RenderConfig,
}

impl<S: PixelSampler + 'static> Explorer<S> {
    pub fn new(engine: RenderEngine<S>, config: RenderConfig) -> Result<Self, RenderConfigError> {
        config.validate()?;

        Ok(Self {
            engine,
            history: ViewportHistory::new(),
            viewport: Viewport::initial(),
            config,
        })
    }

    #[must_use]
    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    #[must_use]
    pub fn config(&self) -> &RenderConfig {
        &self.config
    }

    /// Replaces the render settings used from the next render on.
    pub fn set_config(&mut self, config: RenderConfig) -> Result<(), RenderConfigError> {
        config.validate()?;
        self.config = config;
        Ok(())
    }

    #[must_use]
    pub fn history(&self) -> &ViewportHistory {
        &self.history
    }

    #[must_use]
    pub fn engine(&self) -> &RenderEngine<S> {
        &self.engine
    }

    pub fn render(&self) -> Result<RenderHandle, RenderError> {
        self.engine.render(self.viewport, self.config)
    }

    /// Makes the selected screen rectangle the current viewport without rendering.
    ///
    /// The selection is validated before anything is pushed, so a degenerate
    /// drag leaves both the viewport and the history as they were.
    pub fn navigate_to_selection(&mut self, start: Point, end: Point) -> Result<Viewport, ViewportError> {
        let zoomed = zoom_to_selection(
            &self.viewport,
            start,
            end,
            self.config.pixel_width,
            self.config.pixel_height,
        )?;

        self.history.push(self.viewport);
        self.viewport = zoomed;

        debug!(
            depth = self.history.len(),
            min_x = zoomed.min_x(),
            min_y = zoomed.min_y(),
            width = zoomed.width(),
            height = zoomed.height(),
            "zoomed in"
        );

        Ok(zoomed)
    }

    pub fn zoom_in(&mut self, start: Point, end: Point) -> Result<RenderHandle, RenderError> {
        self.navigate_to_selection(start, end)?;
        self.render()
    }

    /// Returns to the previous viewport without rendering.
    pub fn navigate_back(&mut self) -> Option<Viewport> {
        let previous = self.history.pop()?;
        self.viewport = previous;

        debug!(depth = self.history.len(), "zoomed out");

        Some(previous)
    }

    /// Re-renders the previous viewport, or returns `None` at the outermost view.
    pub fn zoom_out(&mut self) -> Result<Option<RenderHandle>, RenderError> {
        if self.navigate_back().is_none() {
            return Ok(None);
        }

        self.render().map(Some)
    }

    #[must_use]
    pub fn can_zoom_out(&self) -> bool {
        !self.history.is_empty()
    }

    /// The complex coordinate under a screen position, for a cursor readout.
    #[must_use]
    pub fn point_at(&self, point: Point) -> Complex {
        self.viewport.map_pixel(
            f64::from(point.x),
            f64::from(point.y),
            self.config.pixel_width,
            self.config.pixel_height,
        )
    }
}
