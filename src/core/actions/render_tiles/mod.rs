//! Tile decomposition and concurrent execution of a render.
//!
//! [`tile_job::render_tile`] is the unit of work: a pure function of a tile,
//! a viewport and a config. [`tile_scheduler::TileScheduler`] fans tiles out
//! onto a rayon pool and hands finished tiles back in index order.

pub mod ports;
pub mod tile_job;
pub mod tile_scheduler;
