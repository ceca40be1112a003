pub mod engine_settings;
pub mod render_summary;
