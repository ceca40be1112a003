//! Ports through which the render engine reports to the presentation layer.

pub mod observer;
