use thiserror::Error;

pub const MIN_SUPER_SAMPLES: u32 = 1;
pub const MAX_SUPER_SAMPLES: u32 = 32;
pub const MIN_MAX_ITERATIONS: u32 = 100;
pub const MAX_MAX_ITERATIONS: u32 = 5000;

const DEFAULT_PIXEL_WIDTH: u32 = 1024;
const DEFAULT_PIXEL_HEIGHT: u32 = 768;
const DEFAULT_SUPER_SAMPLES: u32 = 1;
const DEFAULT_MAX_ITERATIONS: u32 = 1000;

#[derive(Debug, Copy, Clone, PartialEq, Eq, Error)]
pub enum RenderConfigError {
    #[error("pixel dimensions must be positive: {width}x{height}")]
    InvalidDimensions { width: u32, height: u32 },
    #[error("super samples must be within 1..=32: {value}")]
    SuperSamplesOutOfRange { value: u32 },
    #[error("max iterations must be within 100..=5000: {value}")]
    MaxIterationsOutOfRange { value: u32 },
}

/// Parameters for a single render call.
///
/// The engine rejects out-of-range values with [`RenderConfig::validate`];
/// clamping is left to the caller through [`RenderConfig::clamped`].
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct RenderConfig {
    pub pixel_width: u32,
    pub pixel_height: u32,
    pub super_samples: u32,
    pub max_iterations: u32,
    /// Seed for jittered supersampling. `None` draws a fresh seed per render.
    pub seed: Option<u64>,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            pixel_width: DEFAULT_PIXEL_WIDTH,
            pixel_height: DEFAULT_PIXEL_HEIGHT,
            super_samples: DEFAULT_SUPER_SAMPLES,
            max_iterations: DEFAULT_MAX_ITERATIONS,
            seed: None,
        }
    }
}

impl RenderConfig {
    pub fn new(
        pixel_width: u32,
        pixel_height: u32,
        super_samples: u32,
        max_iterations: u32,
    ) -> Result<Self, RenderConfigError> {
        let config = Self {
            pixel_width,
            pixel_height,
            super_samples,
            max_iterations,
            seed: None,
        };

        config.validate()?;
        Ok(config)
    }

    /// Pulls `super_samples` and `max_iterations` into their allowed ranges.
    ///
    /// Pixel dimensions are not clamped; a zero dimension is still an error.
    pub fn clamped(
        pixel_width: u32,
        pixel_height: u32,
        super_samples: u32,
        max_iterations: u32,
    ) -> Result<Self, RenderConfigError> {
        Self::new(
            pixel_width,
            pixel_height,
            super_samples.clamp(MIN_SUPER_SAMPLES, MAX_SUPER_SAMPLES),
            max_iterations.clamp(MIN_MAX_ITERATIONS, MAX_MAX_ITERATIONS),
        )
    }

    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn validate(&self) -> Result<(), RenderConfigError> {
        if self.pixel_width == 0 || self.pixel_height == 0 {
            return Err(RenderConfigError::InvalidDimensions {
                width: self.pixel_width,
                height: self.pixel_height,
            });
        }

        if !(MIN_SUPER_SAMPLES..=MAX_SUPER_SAMPLES).contains(&self.super_samples) {
            return Err(RenderConfigError::SuperSamplesOutOfRange {
                value: self.super_samples,
            });
        }

        if !(MIN_MAX_ITERATIONS..=MAX_MAX_ITERATIONS).contains(&self.max_iterations) {
            return Err(RenderConfigError::MaxIterationsOutOfRange {
                value: self.max_iterations,
            });
        }

        Ok(())
    }

    #[must_use]
    pub fn pixel_count(&self) -> usize {
        self.pixel_width as usize * self.pixel_height as usize
    }
}
