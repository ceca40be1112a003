//! Input adapters that turn outside requests into controller calls.

pub mod cli;
