use std::path::PathBuf;

use clap::Parser;

use crate::core::data::render_config::RenderConfig;
use crate::core::data::tile::TileLayout;
use crate::core::navigation::zoom::Selection;

/// Render the Mandelbrot set to a binary PPM image.
///
/// Each `--zoom` is a drag rectangle in screen pixels, applied to the view
/// produced by the previous one.
#[derive(Parser, Debug, Clone)]
#[command(name = "mandelbrot_viewer", version)]
pub struct CliArgs {
    /// Image width in pixels
    #[arg(long, default_value_t = 1024)]
    pub width: u32,

    /// Image height in pixels
    #[arg(long, default_value_t = 768)]
    pub height: u32,

    /// Samples per pixel, clamped to 1..=32
    #[arg(long, default_value_t = 1)]
    pub super_samples: u32,

    /// Iteration limit, clamped to 100..=5000
    #[arg(long, default_value_t = 1000)]
    pub max_iterations: u32,

    /// Seed for jittered supersampling
    #[arg(long)]
    pub seed: Option<u64>,

    /// Worker threads (defaults to one per core)
    #[arg(long)]
    pub threads: Option<usize>,

    /// Tile layout: columns, rows or blocks:<size>
    #[arg(long, default_value = "columns")]
    pub tiles: TileLayout,

    /// Zoom selection x1,y1,x2,y2 in screen pixels; may be repeated
    #[arg(long = "zoom", value_name = "X1,Y1,X2,Y2", allow_hyphen_values = true)]
    pub zooms: Vec<Selection>,

    /// Output file
    #[arg(short, long, default_value = "output/mandelbrot.ppm")]
    pub output: PathBuf,
}

impl CliArgs {
    /// The requested settings exactly as given, before any clamping.
    #[must_use]
    pub fn requested_config(&self) -> RenderConfig {
        RenderConfig {
            pixel_width: self.width,
            pixel_height: self.height,
            super_samples: self.super_samples,
            max_iterations: self.max_iterations,
            seed: self.seed,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::data::point::Point;

    #[test]
    fn test_defaults_match_viewer() {
        let args = CliArgs::try_parse_from(["mandelbrot_viewer"]).unwrap();

        assert_eq!(args.requested_config(), RenderConfig::default());
        assert_eq!(args.tiles, TileLayout::Columns);
        assert!(args.zooms.is_empty());
        assert_eq!(args.output, PathBuf::from("output/mandelbrot.ppm"));
    }

    #[test]
    fn test_parses_all_flags() {
        let args = CliArgs::try_parse_from([
            "mandelbrot_viewer",
            "--width",
            "320",
            "--height",
            "200",
            "--super-samples",
            "4",
            "--max-iterations",
            "2500",
            "--seed",
            "9",
            "--threads",
            "3",
            "--tiles",
            "blocks:16",
            "--zoom",
            "10,10,100,80",
            "--zoom",
            "-5,0,40,30",
            "--output",
            "out.ppm",
        ])
        .unwrap();

        assert_eq!(
            args.requested_config(),
            RenderConfig::new(320, 200, 4, 2500).unwrap().with_seed(9)
        );
        assert_eq!(args.threads, Some(3));
        assert_eq!(args.tiles, TileLayout::Blocks { size: 16 });
        assert_eq!(
            args.zooms,
            vec![
                Selection::new(Point::new(10, 10), Point::new(100, 80)),
                Selection::new(Point::new(-5, 0), Point::new(40, 30)),
            ]
        );
        assert_eq!(args.output, PathBuf::from("out.ppm"));
    }

    #[test]
    fn test_rejects_bad_tile_layout() {
        assert!(CliArgs::try_parse_from(["mandelbrot_viewer", "--tiles", "hexagons"]).is_err());
    }

    #[test]
    fn test_rejects_malformed_zoom() {
        assert!(CliArgs::try_parse_from(["mandelbrot_viewer", "--zoom", "1,2,3"]).is_err());
    }
}
