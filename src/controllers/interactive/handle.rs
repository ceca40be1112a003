use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::{Arc, Condvar, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use crate::controllers::interactive::data::render_summary::RenderStatus;
use crate::core::actions::cancellation::{CancelToken, CancellationToken};
use crate::core::data::pixel_buffer::PixelBuffer;

/// Everything a finished render hands back to its caller.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderResult {
    pub buffer: PixelBuffer,
    pub status: RenderStatus,
    pub elapsed: Duration,
    pub generation: u64,
}

struct HandleSlot {
    status: RenderStatus,
    result: Option<RenderResult>,
}

/// State shared between a [`RenderHandle`] and the engine's dispatcher.
pub(crate) struct HandleShared {
    cancel: CancellationToken,
    progress: AtomicU8,
    slot: Mutex<HandleSlot>,
    finished: Condvar,
}

impl HandleShared {
    fn new() -> Self {
        Self {
            cancel: CancellationToken::new(),
            progress: AtomicU8::new(0),
            slot: Mutex::new(HandleSlot {
                status: RenderStatus::Rendering,
                result: None,
            }),
            finished: Condvar::new(),
        }
    }

    pub(crate) fn is_cancelled(&self) -> bool {
        self.cancel.is_cancelled()
    }

    /// Progress only ever moves forward.
    pub(crate) fn set_progress(&self, percent: u8) {
        self.progress.fetch_max(percent.min(100), Ordering::AcqRel);
    }

    pub(crate) fn finish(&self, result: RenderResult) {
        if result.status == RenderStatus::Completed {
            self.set_progress(100);
        }

        let mut slot = self.lock_slot();
        slot.status = result.status.clone();
        slot.result = Some(result);
        drop(slot);

        self.finished.notify_all();
    }

    fn lock_slot(&self) -> MutexGuard<'_, HandleSlot> {
        self.slot.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// The caller's view of one submitted render.
pub struct RenderHandle {
    generation: u64,
    shared: Arc<HandleShared>,
}

impl RenderHandle {
    pub(crate) fn new(generation: u64) -> Self {
        Self {
            generation,
            shared: Arc::new(HandleShared::new()),
        }
    }

    pub(crate) fn shared(&self) -> Arc<HandleShared> {
        Arc::clone(&self.shared)
    }

    #[must_use]
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Requests cancellation. Safe to call any number of times, before or after completion.
    pub fn cancel(&self) {
        self.shared.cancel.cancel();
    }

    #[must_use]
    pub fn progress(&self) -> u8 {
        self.shared.progress.load(Ordering::Acquire)
    }

    #[must_use]
    pub fn status(&self) -> RenderStatus {
        self.shared.lock_slot().status.clone()
    }

    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.shared.lock_slot().status.is_terminal()
    }

    /// Blocks until the render reaches a terminal status.
    pub fn wait(&self) -> RenderStatus {
        let mut slot = self.shared.lock_slot();

        while !slot.status.is_terminal() {
            slot = self
                .shared
                .finished
                .wait(slot)
                .unwrap_or_else(PoisonError::into_inner);
        }

        slot.status.clone()
    }

    /// Blocks until the render finishes and takes back the buffer.
    pub fn await_result(self) -> RenderResult {
        let mut slot = self.shared.lock_slot();

        loop {
            if let Some(result) = slot.result.take() {
                return result;
            }

            slot = self
                .shared
                .finished
                .wait(slot)
                .unwrap_or_else(PoisonError::into_inner);
        }
    }
}

impl std::fmt::Debug for RenderHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RenderHandle")
            .field("generation", &self.generation)
            .field("progress", &self.progress())
            .field("status", &self.status())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    fn result(status: RenderStatus) -> RenderResult {
        RenderResult {
            buffer: PixelBuffer::new(2, 2).unwrap(),
            status,
            elapsed: Duration::from_millis(5),
            generation: 1,
        }
    }

    #[test]
    fn test_new_handle_is_rendering() {
        let handle = RenderHandle::new(3);

        assert_eq!(handle.generation(), 3);
        assert_eq!(handle.status(), RenderStatus::Rendering);
        assert_eq!(handle.progress(), 0);
        assert!(!handle.is_finished());
    }

    #[test]
    fn test_progress_is_monotonic() {
        let handle = RenderHandle::new(1);
        let shared = handle.shared();

        shared.set_progress(40);
        shared.set_progress(20);
        assert_eq!(handle.progress(), 40);

        shared.set_progress(250);
        assert_eq!(handle.progress(), 100);
    }

    #[test]
    fn test_completed_pins_progress_to_100() {
        let handle = RenderHandle::new(1);
        handle.shared().set_progress(60);

        handle.shared().finish(result(RenderStatus::Completed));

        assert_eq!(handle.progress(), 100);
        assert_eq!(handle.wait(), RenderStatus::Completed);
    }

    #[test]
    fn test_cancelled_keeps_partial_progress() {
        let handle = RenderHandle::new(1);
        handle.shared().set_progress(30);

        handle.shared().finish(result(RenderStatus::Cancelled));

        assert_eq!(handle.progress(), 30);
        assert!(handle.is_finished());
    }

    #[test]
    fn test_cancel_is_idempotent() {
        let handle = RenderHandle::new(1);

        handle.cancel();
        handle.cancel();

        assert!(handle.shared().is_cancelled());
    }

    #[test]
    fn test_await_result_blocks_until_finished() {
        let handle = RenderHandle::new(7);
        let shared = handle.shared();

        let finisher = thread::spawn(move || {
            thread::sleep(Duration::from_millis(20));
            shared.finish(result(RenderStatus::Completed));
        });

        let result = handle.await_result();
        finisher.join().unwrap();

        assert_eq!(result.status, RenderStatus::Completed);
        assert_eq!(result.elapsed, Duration::from_millis(5));
    }
}
