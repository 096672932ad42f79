//! User interface rendering
//!
//! This module draws a [`crate::app::RenderRequest`] onto the terminal:
//! - `render` - Main rendering entry point
//! - `help` - Help overlay
//! - `utils` - Shared utilities

mod help;
mod render;
mod utils;

pub use render::render;
