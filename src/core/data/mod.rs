pub mod colour;
pub mod complex;
pub mod pixel_buffer;
pub mod point;
pub mod render_config;
pub mod tile;
pub mod viewport;
