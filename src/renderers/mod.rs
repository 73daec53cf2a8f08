//! Renderers module for the tablature editor
//!
//! Export logic that turns the workspace into output formats. Only the
//! plain-text tab format exists.

pub mod text;

pub use text::{export_text, BLOCK_SEPARATOR};
