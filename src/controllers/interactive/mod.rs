//! Interactive rendering: the background render engine and the zoomable
//! explorer session built on it.
//!
//! The engine follows the ports & adapters pattern:
//! - **Input**: a `Viewport` plus a `RenderConfig` per render
//! - **Output**: a `RenderHandle` per render and the `RenderObserver` port for
//!   progress and completion events
//! - **Core**: tile scheduling and sampling from `core/`

pub mod data;
mod engine;
pub mod errors;
pub mod events;
mod explorer;
mod handle;
pub mod ports;

pub use engine::{EngineState, RenderEngine, build_worker_pool};
pub use explorer::Explorer;
pub use handle::{RenderHandle, RenderResult};
