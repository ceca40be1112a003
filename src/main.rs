use clap::Parser;
use tracing::warn;

use mandelbrot_viewer::{
    BatchController, CliArgs, EngineSettings, Explorer, PpmFilePresenter, RenderConfig,
    RenderEngine,
};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt::init();

    let args = CliArgs::parse();
    let requested = args.requested_config();

    let mut config = RenderConfig::clamped(
        requested.pixel_width,
        requested.pixel_height,
        requested.super_samples,
        requested.max_iterations,
    )?;
    config.seed = requested.seed;

    if config != requested {
        warn!(
            super_samples = config.super_samples,
            max_iterations = config.max_iterations,
            "render settings clamped to the supported range"
        );
    }

    let settings = EngineSettings {
        threads: args.threads,
        tile_layout: args.tiles,
    };
    let engine = RenderEngine::new(settings)?;
    let explorer = Explorer::new(engine, config)?;

    let mut controller = BatchController::new(PpmFilePresenter::new(), explorer);
    controller.generate(&args.zooms)?;
    controller.write(&args.output)?;

    Ok(())
}
