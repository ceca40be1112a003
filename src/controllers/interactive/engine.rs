use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Condvar, Mutex, MutexGuard, PoisonError};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use rayon::{ThreadPool, ThreadPoolBuilder};
use tracing::{debug, info, warn};

use crate::controllers::interactive::data::engine_settings::EngineSettings;
use crate::controllers::interactive::data::render_summary::{RenderStatus, RenderSummary};
use crate::controllers::interactive::errors::render_error::RenderError;
use crate::controllers::interactive::events::render_event::RenderEvent;
use crate::controllers::interactive::handle::{HandleShared, RenderHandle, RenderResult};
use crate::controllers::interactive::ports::observer::RenderObserver;
use crate::core::actions::render_tiles::ports::pixel_sampler::PixelSampler;
use crate::core::actions::render_tiles::tile_job::TileFailure;
use crate::core::actions::render_tiles::tile_scheduler::{ScheduleReport, TileScheduler, TileSink};
use crate::core::data::pixel_buffer::PixelBuffer;
use crate::core::data::render_config::RenderConfig;
use crate::core::data::tile::{Tile, TileLayout, TileResult};
use crate::core::data::viewport::Viewport;
use crate::core::fractals::mandelbrot::sampler::MandelbrotSampler;

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum EngineState {
    Idle,
    Rendering,
}

struct RenderJob {
    generation: u64,
    viewport: Viewport,
    config: RenderConfig,
    buffer: PixelBuffer,
    handle: Arc<HandleShared>,
    submitted: Instant,
}

struct SharedState<S> {
    generation: AtomicU64,
    pending: Mutex<Option<RenderJob>>,
    wake: Condvar,
    shutdown: AtomicBool,
    active: AtomicBool,
    scheduler: TileScheduler,
    sampler: S,
    observer: Option<Arc<dyn RenderObserver>>,
}

impl<S> SharedState<S> {
    fn lock_pending(&self) -> MutexGuard<'_, Option<RenderJob>> {
        self.pending.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn notify(&self, event: RenderEvent) {
        if let Some(observer) = &self.observer {
            observer.on_event(event);
        }
    }

    /// Resolves a job that never reached the worker pool. Its buffer is returned untouched.
    fn resolve_unstarted(&self, job: RenderJob) {
        debug!(generation = job.generation, "render superseded before it started");
        let elapsed = job.submitted.elapsed();
        self.resolve(job.handle, job.buffer, job.generation, RenderStatus::Cancelled, elapsed);
    }

    fn resolve(
        &self,
        handle: Arc<HandleShared>,
        buffer: PixelBuffer,
        generation: u64,
        status: RenderStatus,
        elapsed: Duration,
    ) {
        self.notify(RenderEvent::Finished(RenderSummary {
            generation,
            status: status.clone(),
            elapsed,
        }));

        handle.finish(RenderResult {
            buffer,
            status,
            elapsed,
            generation,
        });
    }
}

/// Builds the bounded pool that every tile of every render runs on.
pub fn build_worker_pool(threads: Option<usize>) -> Result<ThreadPool, RenderError> {
    let pool = ThreadPoolBuilder::new()
        .num_threads(threads.unwrap_or(0))
        .thread_name(|index| format!("render-worker-{index}"))
        .build()?;

    Ok(pool)
}

/// Runs renders one at a time on a dedicated dispatcher thread.
///
/// Submitting a render bumps the engine generation. The render in flight
/// watches the generation through its cancel token and stops once it changes,
/// and a render still waiting for the dispatcher is resolved as cancelled
/// straight away. Only the newest request ever runs to completion.
pub struct RenderEngine<S: PixelSampler + 'static = MandelbrotSampler> {
    shared: Arc<SharedState<S>>,
    worker: Option<JoinHandle<()>>,
}

impl RenderEngine<MandelbrotSampler> {
    pub fn new(settings: EngineSettings) -> Result<Self, RenderError> {
        Self::build(settings, None)
    }

    pub fn with_observer(
        settings: EngineSettings,
        observer: Arc<dyn RenderObserver>,
    ) -> Result<Self, RenderError> {
        Self::build(settings, Some(observer))
    }

    fn build(
        settings: EngineSettings,
        observer: Option<Arc<dyn RenderObserver>>,
    ) -> Result<Self, RenderError> {
        let pool = build_worker_pool(settings.threads)?;

        Ok(Self::from_parts(
            Arc::new(pool),
            settings.tile_layout,
            MandelbrotSampler::default(),
            observer,
        ))
    }
}

impl<S: PixelSampler + 'static> RenderEngine<S> {
    /// Assembles an engine around an existing pool and sampler.
    pub fn from_parts(
        pool: Arc<ThreadPool>,
        tile_layout: TileLayout,
        sampler: S,
        observer: Option<Arc<dyn RenderObserver>>,
    ) -> Self {
        let shared = Arc::new(SharedState {
            generation: AtomicU64::new(0),
            pending: Mutex::new(None),
            wake: Condvar::new(),
            shutdown: AtomicBool::new(false),
            active: AtomicBool::new(false),
            scheduler: TileScheduler::new(pool, tile_layout),
            sampler,
            observer,
        });

        let worker_shared = Arc::clone(&shared);

        let worker = thread::Builder::new()
            .name("render-dispatcher".to_string())
            .spawn(move || Self::worker_loop(&worker_shared));

        let worker = match worker {
            Ok(worker) => Some(worker),
            Err(error) => {
                warn!(%error, "failed to spawn render dispatcher");
                shared.shutdown.store(true, Ordering::Release);
                None
            }
        };

        Self { shared, worker }
    }

    /// Starts rendering into a freshly allocated buffer and returns immediately.
    pub fn render(&self, viewport: Viewport, config: RenderConfig) -> Result<RenderHandle, RenderError> {
        config.validate()?;
        let buffer = PixelBuffer::new(config.pixel_width, config.pixel_height)?;

        self.submit(viewport, config, buffer)
    }

    /// Starts rendering into `buffer`, which must match the config's pixel dimensions.
    pub fn render_into(
        &self,
        viewport: Viewport,
        config: RenderConfig,
        buffer: PixelBuffer,
    ) -> Result<RenderHandle, RenderError> {
        config.validate()?;

        if buffer.width() != config.pixel_width || buffer.height() != config.pixel_height {
            return Err(RenderError::BufferMismatch {
                expected_width: config.pixel_width,
                expected_height: config.pixel_height,
                actual_width: buffer.width(),
                actual_height: buffer.height(),
            });
        }

        self.submit(viewport, config, buffer)
    }

    pub fn render_blocking(
        &self,
        viewport: Viewport,
        config: RenderConfig,
    ) -> Result<RenderResult, RenderError> {
        Ok(self.render(viewport, config)?.await_result())
    }

    /// Cancels the running render and any render still waiting to start.
    pub fn cancel_current(&self) {
        self.shared.generation.fetch_add(1, Ordering::SeqCst);

        let superseded = self.shared.lock_pending().take();
        if let Some(job) = superseded {
            self.shared.resolve_unstarted(job);
        }
    }

    #[must_use]
    pub fn state(&self) -> EngineState {
        if self.shared.active.load(Ordering::Acquire) || self.shared.lock_pending().is_some() {
            EngineState::Rendering
        } else {
            EngineState::Idle
        }
    }

    #[must_use]
    pub fn current_generation(&self) -> u64 {
        self.shared.generation.load(Ordering::Acquire)
    }

    #[must_use]
    pub fn tile_layout(&self) -> TileLayout {
        self.shared.scheduler.layout()
    }

    #[must_use]
    pub fn thread_count(&self) -> usize {
        self.shared.scheduler.thread_count()
    }

    /// Stops the dispatcher. The render in flight ends as cancelled, as does a pending one.
    pub fn shutdown(&mut self) {
        {
            // Set under the lock so the dispatcher cannot miss the wake-up
            // between its shutdown check and `wait`.
            let _pending = self.shared.lock_pending();
            self.shared.shutdown.store(true, Ordering::Release);
        }
        self.shared.wake.notify_all();

        if let Some(handle) = self.worker.take() {
            let _ = handle.join();
        }

        let pending = self.shared.lock_pending().take();
        if let Some(job) = pending {
            self.shared.resolve_unstarted(job);
        }
    }

    fn submit(
        &self,
        viewport: Viewport,
        config: RenderConfig,
        buffer: PixelBuffer,
    ) -> Result<RenderHandle, RenderError> {
        if self.shared.shutdown.load(Ordering::Acquire) {
            return Err(RenderError::ShutDown);
        }

        let generation = self.shared.generation.fetch_add(1, Ordering::SeqCst) + 1;
        let handle = RenderHandle::new(generation);

        let job = RenderJob {
            generation,
            viewport,
            config,
            buffer,
            handle: handle.shared(),
            submitted: Instant::now(),
        };

        let superseded = self.shared.lock_pending().replace(job);
        self.shared.wake.notify_one();

        if let Some(job) = superseded {
            self.shared.resolve_unstarted(job);
        }

        debug!(generation, "render submitted");

        Ok(handle)
    }

    fn worker_loop(shared: &SharedState<S>) {
        loop {
            let job = {
                let mut guard = shared.lock_pending();
                loop {
                    if shared.shutdown.load(Ordering::Acquire) {
                        return;
                    }

                    if let Some(job) = guard.take() {
                        shared.active.store(true, Ordering::Release);
                        break job;
                    }

                    guard = shared
                        .wake
                        .wait(guard)
                        .unwrap_or_else(PoisonError::into_inner);
                }
            };

            Self::run_job(shared, job);
        }
    }

    fn run_job(shared: &SharedState<S>, job: RenderJob) {
        let RenderJob {
            generation,
            viewport,
            config,
            mut buffer,
            handle,
            submitted: _,
        } = job;

        let cancel_token = || {
            shared.shutdown.load(Ordering::Relaxed)
                || generation != shared.generation.load(Ordering::Relaxed)
                || handle.is_cancelled()
        };

        info!(
            generation,
            width = config.pixel_width,
            height = config.pixel_height,
            super_samples = config.super_samples,
            max_iterations = config.max_iterations,
            "render started"
        );

        let start = Instant::now();
        let report = {
            let mut writer = BufferWriter {
                buffer: &mut buffer,
                handle: &handle,
                shared,
                generation,
            };

            shared
                .scheduler
                .schedule_render(&viewport, &config, &shared.sampler, &cancel_token, &mut writer)
        };
        let elapsed = start.elapsed();

        let status = status_from_report(report);

        match &status {
            RenderStatus::Completed => {
                info!(generation, elapsed_ms = elapsed.as_millis() as u64, "render completed");
            }
            RenderStatus::Cancelled => {
                debug!(generation, elapsed_ms = elapsed.as_millis() as u64, "render cancelled");
            }
            RenderStatus::FailedPartial { failed_tiles } => {
                warn!(
                    generation,
                    failed_tiles = failed_tiles.len(),
                    elapsed_ms = elapsed.as_millis() as u64,
                    "render finished with failed tiles"
                );
            }
            RenderStatus::Rendering => {}
        }

        shared.active.store(false, Ordering::Release);
        shared.resolve(handle, buffer, generation, status, elapsed);
    }
}

impl<S: PixelSampler + 'static> Drop for RenderEngine<S> {
    fn drop(&mut self) {
        self.shutdown();
    }
}

fn status_from_report(report: ScheduleReport) -> RenderStatus {
    if report.cancelled {
        RenderStatus::Cancelled
    } else if !report.failed.is_empty() {
        RenderStatus::FailedPartial {
            failed_tiles: report.failed,
        }
    } else {
        RenderStatus::Completed
    }
}

/// Collector-side sink: the only code that writes into the render's buffer.
struct BufferWriter<'a, S> {
    buffer: &'a mut PixelBuffer,
    handle: &'a HandleShared,
    shared: &'a SharedState<S>,
    generation: u64,
}

impl<S> TileSink for BufferWriter<'_, S> {
    fn tile_ready(&mut self, tile: &Tile, result: TileResult) {
        if let Err(error) = self.buffer.write_tile(tile, &result) {
            warn!(generation = self.generation, %error, "discarding tile");
        }
    }

    fn tile_failed(&mut self, tile: &Tile, _failure: &TileFailure) {
        if let Err(error) = self.buffer.clear_tile(tile) {
            warn!(generation = self.generation, %error, "could not reset failed tile");
        }
    }

    fn progress(&mut self, percent: u8) {
        self.handle.set_progress(percent);
        self.shared.notify(RenderEvent::Progress {
            generation: self.generation,
            percent,
        });
    }
}
