use crate::controllers::interactive::events::render_event::RenderEvent;

/// Called from the engine's dispatcher thread; implementations must not block.
pub trait RenderObserver: Send + Sync {
    fn on_event(&self, event: RenderEvent);
}
