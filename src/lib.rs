mod controllers;
mod core;
mod input;
mod presenters;

pub use crate::controllers::cli::batch::BatchController;
pub use crate::controllers::interactive::data::engine_settings::EngineSettings;
pub use crate::controllers::interactive::data::render_summary::{RenderStatus, RenderSummary};
pub use crate::controllers::interactive::errors::render_error::RenderError;
pub use crate::controllers::interactive::events::render_event::RenderEvent;
pub use crate::controllers::interactive::ports::observer::RenderObserver;
pub use crate::controllers::interactive::{
    EngineState, Explorer, RenderEngine, RenderHandle, RenderResult, build_worker_pool,
};
pub use crate::controllers::ports::file_presenter::FilePresenterPort;
pub use crate::core::actions::cancellation::{CancelToken, CancellationToken, Cancelled, NeverCancel};
pub use crate::core::actions::render_tiles::ports::colour_map::ColourMap;
pub use crate::core::actions::render_tiles::ports::pixel_sampler::PixelSampler;
pub use crate::core::actions::render_tiles::tile_job::{TileFailure, TileOutcome, render_tile, tile_seed};
pub use crate::core::actions::render_tiles::tile_scheduler::{ScheduleReport, TileScheduler, TileSink};
pub use crate::core::data::colour::Colour;
pub use crate::core::data::complex::Complex;
pub use crate::core::data::pixel_buffer::{PixelBuffer, PixelBufferError};
pub use crate::core::data::point::Point;
pub use crate::core::data::render_config::{RenderConfig, RenderConfigError};
pub use crate::core::data::tile::{Tile, TileLayout, TileLayoutParseError, TileResult};
pub use crate::core::data::viewport::{Viewport, ViewportError};
pub use crate::core::fractals::mandelbrot::colour_map::{GreenWhiteGradient, colour_for};
pub use crate::core::fractals::mandelbrot::escape_time::escape_iterations;
pub use crate::core::fractals::mandelbrot::sampler::MandelbrotSampler;
pub use crate::core::navigation::history::ViewportHistory;
pub use crate::core::navigation::zoom::{Selection, SelectionParseError, zoom_to_selection};
pub use crate::input::cli::args::CliArgs;
pub use crate::presenters::file::ppm::PpmFilePresenter;
