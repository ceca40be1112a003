use rayon::ThreadPoolBuildError;
use thiserror::Error;

use crate::core::data::pixel_buffer::PixelBufferError;
use crate::core::data::render_config::RenderConfigError;
use crate::core::data::viewport::ViewportError;

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("invalid render config: {0}")]
    InvalidConfig(#[from] RenderConfigError),
    #[error(
        "buffer is {actual_width}x{actual_height} but the render needs {expected_width}x{expected_height}"
    )]
    BufferMismatch {
        expected_width: u32,
        expected_height: u32,
        actual_width: u32,
        actual_height: u32,
    },
    #[error("invalid viewport: {0}")]
    Viewport(#[from] ViewportError),
    #[error("pixel buffer error: {0}")]
    PixelBuffer(#[from] PixelBufferError),
    #[error("failed to build render worker pool: {0}")]
    WorkerPool(#[from] ThreadPoolBuildError),
    #[error("render engine has been shut down")]
    ShutDown,
}
