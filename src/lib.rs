//! Linux Process Manager library
//!
//! - `system` - `/proc` parsing, snapshots, identity lookup and process control
//! - `app` - Tree builder, filter/sort pipeline and the interactive session
//! - `ui` - Terminal drawing of a render request
//! - `constants` - Shared constants

pub mod app;
pub mod constants;
pub mod system;
pub mod ui;
