use crate::core::data::colour::Colour;

/// Maps an escape-time iteration count to a colour. Must be total and pure.
pub trait ColourMap: Send + Sync {
    fn map(&self, iterations: u32, max_iterations: u32) -> Colour;

    fn display_name(&self) -> &str;
}
