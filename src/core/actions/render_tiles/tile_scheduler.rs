use std::collections::BTreeMap;
use std::sync::Arc;
use std::sync::mpsc;

use rayon::ThreadPool;
use tracing::debug;

use crate::core::actions::cancellation::CancelToken;
use crate::core::actions::progress::ProgressCounter;
use crate::core::actions::render_tiles::ports::pixel_sampler::PixelSampler;
use crate::core::actions::render_tiles::tile_job::{TileFailure, TileOutcome, run_tile_guarded};
use crate::core::data::render_config::RenderConfig;
use crate::core::data::tile::{Tile, TileLayout, TileResult};
use crate::core::data::viewport::Viewport;

/// Receives tiles from the scheduler, always on the calling thread and in
/// ascending tile index order.
pub trait TileSink {
    fn tile_ready(&mut self, tile: &Tile, result: TileResult);

    fn tile_failed(&mut self, _tile: &Tile, _failure: &TileFailure) {}

    /// Called with a strictly increasing percentage of finished tiles.
    fn progress(&mut self, _percent: u8) {}
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScheduleReport {
    pub total_tiles: usize,
    pub delivered_tiles: usize,
    pub failed: Vec<TileFailure>,
    pub cancelled: bool,
}

impl ScheduleReport {
    #[must_use]
    pub fn is_complete(&self) -> bool {
        !self.cancelled && self.failed.is_empty() && self.delivered_tiles == self.total_tiles
    }
}

/// Fans the tiles of one render out over a rayon pool and reassembles them in order.
///
/// Workers never touch the sink. Each finished tile is sent back over a channel
/// and held in a reorder buffer until every lower-indexed tile has been handed on.
pub struct TileScheduler {
    pool: Arc<ThreadPool>,
    layout: TileLayout,
}

impl TileScheduler {
    #[must_use]
    pub fn new(pool: Arc<ThreadPool>, layout: TileLayout) -> Self {
        Self { pool, layout }
    }

    #[must_use]
    pub fn layout(&self) -> TileLayout {
        self.layout
    }

    #[must_use]
    pub fn thread_count(&self) -> usize {
        self.pool.current_num_threads()
    }

    #[must_use]
    pub fn tile_count(&self, config: &RenderConfig) -> usize {
        self.layout
            .tile_count(config.pixel_width, config.pixel_height)
    }

    /// Renders every tile and blocks until all spawned work has finished.
    ///
    /// Once `cancel` fires no further tile is delivered to `sink`, and tiles that
    /// have not started yet are skipped. Must not be called from a worker of the
    /// scheduler's own pool.
    pub fn schedule_render<S, C, K>(
        &self,
        viewport: &Viewport,
        config: &RenderConfig,
        sampler: &S,
        cancel: &C,
        sink: &mut K,
    ) -> ScheduleReport
    where
        S: PixelSampler + ?Sized,
        C: CancelToken + ?Sized,
        K: TileSink + ?Sized,
    {
        let tiles = self.layout.tiles(config.pixel_width, config.pixel_height);
        let progress = ProgressCounter::new(tiles.len());
        let base_seed = config.seed.unwrap_or_else(rand::random);

        let mut report = ScheduleReport {
            total_tiles: tiles.len(),
            ..ScheduleReport::default()
        };

        debug!(
            tiles = tiles.len(),
            layout = ?self.layout,
            threads = self.pool.current_num_threads(),
            "scheduling render"
        );

        self.pool.in_place_scope(|scope| {
            let (sender, receiver) = mpsc::channel::<(usize, TileOutcome)>();

            for tile in &tiles {
                let tile = *tile;
                let sender = sender.clone();
                let progress = &progress;

                scope.spawn(move |_| {
                    let outcome = if cancel.is_cancelled() {
                        TileOutcome::Cancelled
                    } else {
                        run_tile_guarded(&tile, viewport, config, sampler, base_seed, cancel)
                    };

                    if !matches!(outcome, TileOutcome::Cancelled) {
                        progress.record_completion();
                    }

                    // The collector stops listening once the render is cancelled.
                    let _ = sender.send((tile.index, outcome));
                });
            }

            drop(sender);

            let mut pending = BTreeMap::new();
            let mut next_index = 0;
            let mut last_percent = 0;

            'collect: for (index, outcome) in receiver {
                pending.insert(index, outcome);

                let percent = progress.percent();
                if percent > last_percent {
                    last_percent = percent;
                    sink.progress(percent);
                }

                while let Some(outcome) = pending.remove(&next_index) {
                    if cancel.is_cancelled() {
                        report.cancelled = true;
                        break 'collect;
                    }

                    let tile = &tiles[next_index];

                    match outcome {
                        TileOutcome::Rendered(result) => {
                            sink.tile_ready(tile, result);
                            report.delivered_tiles += 1;
                        }
                        TileOutcome::Failed(failure) => {
                            sink.tile_failed(tile, &failure);
                            report.failed.push(failure);
                        }
                        TileOutcome::Cancelled => {
                            report.cancelled = true;
                            break 'collect;
                        }
                    }

                    next_index += 1;
                }
            }
        });

        debug!(
            delivered = report.delivered_tiles,
            failed = report.failed.len(),
            cancelled = report.cancelled,
            "render scheduled"
        );

        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::actions::cancellation::{CancellationToken, Cancelled, NeverCancel};
    use crate::core::data::colour::Colour;
    use crate::core::data::pixel_buffer::PixelBuffer;
    use crate::core::fractals::mandelbrot::sampler::MandelbrotSampler;
    use rand::Rng;
    use rayon::ThreadPoolBuilder;

    struct CoordinateSampler;

    impl PixelSampler for CoordinateSampler {
        fn sample<R, C>(
            &self,
            pixel_x: u32,
            pixel_y: u32,
            _: &Viewport,
            _: &RenderConfig,
            _: &mut R,
            _: &C,
        ) -> Result<Colour, Cancelled>
        where
            R: Rng + ?Sized,
            C: CancelToken + ?Sized,
        {
            Ok(Colour::new(pixel_x as f32, pixel_y as f32, 1.0))
        }
    }

    struct PanicsOnColumn(u32);

    impl PixelSampler for PanicsOnColumn {
        fn sample<R, C>(
            &self,
            pixel_x: u32,
            pixel_y: u32,
            viewport: &Viewport,
            config: &RenderConfig,
            rng: &mut R,
            cancel: &C,
        ) -> Result<Colour, Cancelled>
        where
            R: Rng + ?Sized,
            C: CancelToken + ?Sized,
        {
            if pixel_x == self.0 {
                panic!("column {} is poisoned", pixel_x);
            }
            CoordinateSampler.sample(pixel_x, pixel_y, viewport, config, rng, cancel)
        }
    }

    /// Cancels the render from inside column `column`, then panics there.
    struct CancelsThenPanics {
        token: CancellationToken,
        column: u32,
    }

    impl PixelSampler for CancelsThenPanics {
        fn sample<R, C>(
            &self,
            pixel_x: u32,
            pixel_y: u32,
            viewport: &Viewport,
            config: &RenderConfig,
            rng: &mut R,
            cancel: &C,
        ) -> Result<Colour, Cancelled>
        where
            R: Rng + ?Sized,
            C: CancelToken + ?Sized,
        {
            if pixel_x == self.column {
                self.token.cancel();
                panic!("column {} failed after cancel", pixel_x);
            }
            CoordinateSampler.sample(pixel_x, pixel_y, viewport, config, rng, cancel)
        }
    }

    #[derive(Default)]
    struct RecordingSink {
        delivered: Vec<usize>,
        failed: Vec<usize>,
        progress: Vec<u8>,
    }

    impl TileSink for RecordingSink {
        fn tile_ready(&mut self, tile: &Tile, result: TileResult) {
            assert_eq!(tile.index, result.index);
            assert_eq!(tile.pixel_count(), result.colours.len());
            self.delivered.push(tile.index);
        }

        fn tile_failed(&mut self, tile: &Tile, _: &TileFailure) {
            self.failed.push(tile.index);
        }

        fn progress(&mut self, percent: u8) {
            self.progress.push(percent);
        }
    }

    struct BufferSink<'a>(&'a mut PixelBuffer);

    impl TileSink for BufferSink<'_> {
        fn tile_ready(&mut self, tile: &Tile, result: TileResult) {
            self.0.write_tile(tile, &result).unwrap();
        }
    }

    /// Cancels the render as soon as the first tile arrives.
    struct CancelAfterFirstTile {
        token: CancellationToken,
        delivered: usize,
    }

    impl TileSink for CancelAfterFirstTile {
        fn tile_ready(&mut self, _: &Tile, _: TileResult) {
            self.delivered += 1;
            self.token.cancel();
        }
    }

    fn scheduler(layout: TileLayout) -> TileScheduler {
        let pool = ThreadPoolBuilder::new().num_threads(4).build().unwrap();
        TileScheduler::new(Arc::new(pool), layout)
    }

    fn config(width: u32, height: u32) -> RenderConfig {
        RenderConfig::new(width, height, 1, 200).unwrap()
    }

    #[test]
    fn test_tiles_are_delivered_in_ascending_order() {
        for layout in [
            TileLayout::Columns,
            TileLayout::Rows,
            TileLayout::Blocks { size: 3 },
        ] {
            let scheduler = scheduler(layout);
            let config = config(17, 11);
            let mut sink = RecordingSink::default();

            let report = scheduler.schedule_render(
                &Viewport::initial(),
                &config,
                &CoordinateSampler,
                &NeverCancel,
                &mut sink,
            );

            let expected: Vec<usize> = (0..scheduler.tile_count(&config)).collect();
            assert_eq!(sink.delivered, expected, "layout {:?}", layout);
            assert!(report.is_complete());
        }
    }

    #[test]
    fn test_layouts_produce_identical_images() {
        let config = config(24, 16);
        let viewport = Viewport::initial();
        let sampler: MandelbrotSampler = MandelbrotSampler::default();

        let render = |layout| {
            let mut buffer = PixelBuffer::new(24, 16).unwrap();
            scheduler(layout).schedule_render(
                &viewport,
                &config,
                &sampler,
                &NeverCancel,
                &mut BufferSink(&mut buffer),
            );
            buffer
        };

        let columns = render(TileLayout::Columns);
        assert!(columns.is_fully_written());
        assert_eq!(columns, render(TileLayout::Rows));
        assert_eq!(columns, render(TileLayout::Blocks { size: 5 }));
    }

    #[test]
    fn test_seeded_supersampled_render_is_reproducible() {
        let config = RenderConfig::new(12, 8, 4, 200).unwrap().with_seed(1234);
        let sampler: MandelbrotSampler = MandelbrotSampler::default();
        let scheduler = scheduler(TileLayout::Columns);

        let render = || {
            let mut buffer = PixelBuffer::new(12, 8).unwrap();
            scheduler.schedule_render(
                &Viewport::initial(),
                &config,
                &sampler,
                &NeverCancel,
                &mut BufferSink(&mut buffer),
            );
            buffer
        };

        assert_eq!(render(), render());
    }

    #[test]
    fn test_progress_is_increasing_and_reaches_100() {
        let scheduler = scheduler(TileLayout::Columns);
        let mut sink = RecordingSink::default();

        scheduler.schedule_render(
            &Viewport::initial(),
            &config(40, 10),
            &CoordinateSampler,
            &NeverCancel,
            &mut sink,
        );

        assert!(sink.progress.windows(2).all(|pair| pair[0] < pair[1]));
        assert_eq!(sink.progress.last(), Some(&100));
    }

    #[test]
    fn test_cancelled_before_start_delivers_nothing() {
        let scheduler = scheduler(TileLayout::Columns);
        let token = CancellationToken::new();
        token.cancel();
        let mut sink = RecordingSink::default();

        let report = scheduler.schedule_render(
            &Viewport::initial(),
            &config(8, 8),
            &CoordinateSampler,
            &token,
            &mut sink,
        );

        assert!(report.cancelled);
        assert_eq!(report.delivered_tiles, 0);
        assert!(sink.delivered.is_empty());
        assert!(!report.is_complete());
    }

    #[test]
    fn test_no_tiles_delivered_after_cancellation() {
        let scheduler = scheduler(TileLayout::Columns);
        let token = CancellationToken::new();
        let mut sink = CancelAfterFirstTile {
            token: token.clone(),
            delivered: 0,
        };

        let report = scheduler.schedule_render(
            &Viewport::initial(),
            &config(16, 4),
            &CoordinateSampler,
            &token,
            &mut sink,
        );

        assert!(report.cancelled);
        assert_eq!(sink.delivered, 1);
        assert_eq!(report.delivered_tiles, 1);
    }

    #[test]
    fn test_panicking_tile_is_reported_and_others_complete() {
        let scheduler = scheduler(TileLayout::Columns);
        let mut sink = RecordingSink::default();

        let report = scheduler.schedule_render(
            &Viewport::initial(),
            &config(6, 3),
            &PanicsOnColumn(2),
            &NeverCancel,
            &mut sink,
        );

        assert!(!report.cancelled);
        assert_eq!(report.delivered_tiles, 5);
        assert_eq!(sink.delivered, vec![0, 1, 3, 4, 5]);
        assert_eq!(sink.failed, vec![2]);
        assert_eq!(report.failed.len(), 1);
        assert_eq!(report.failed[0].index, 2);
        assert_eq!(report.failed[0].message, "column 2 is poisoned");
        assert!(!report.is_complete());
    }

    #[test]
    fn test_failure_after_cancellation_reports_cancelled_only() {
        let scheduler = scheduler(TileLayout::Columns);
        let token = CancellationToken::new();
        let sampler = CancelsThenPanics {
            token: token.clone(),
            column: 0,
        };
        let mut sink = RecordingSink::default();

        let report = scheduler.schedule_render(
            &Viewport::initial(),
            &config(6, 3),
            &sampler,
            &token,
            &mut sink,
        );

        assert!(report.cancelled);
        assert!(report.failed.is_empty());
        assert!(sink.failed.is_empty());
        assert!(sink.delivered.is_empty());
        assert_eq!(report.delivered_tiles, 0);
    }
}
