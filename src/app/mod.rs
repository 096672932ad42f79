//! Session state and logic
//!
//! This module is organized into submodules:
//! - `state` - Session struct, refresh and projection
//! - `navigation` - Selection movement and scrolling
//! - `input` - Keyboard input handling per mode
//! - `process_ops` - Kill and priority flows
//! - `render_model` - The render request handed to the UI
//! - `filter` / `sort` - The filter/sort pipeline
//! - `tree_builder` - Process tree construction
//! - `cli` - Command-line argument parsing

pub mod cli;
mod filter;
mod input;
mod navigation;
mod process_ops;
mod render_model;
mod sort;
mod state;
mod tree_builder;
mod view_mode;

#[cfg(test)]
mod testing;

pub use filter::{apply_filters, children_of, parse_query, ProcessFilter};
pub use input::KeyAction;
pub use render_model::{RenderRequest, RenderRow};
pub use sort::{sort_processes, top_by_cpu, top_by_memory, SortDirection, SortField};
pub use state::{ProjectedRow, Session, SessionConfig};
pub use tree_builder::{ProcessTree, TreeNode, TreeRow};
pub use view_mode::SessionMode;
