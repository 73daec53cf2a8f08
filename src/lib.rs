//! Tablature Editor WASM Module
//!
//! Editing core of a plain-text guitar tablature workspace: stave grids,
//! tunings, text blocks and notation legends, plus import and export of
//! the text tab format.

pub mod models;
pub mod workspace;
pub mod input;
pub mod parse;
pub mod renderers;
pub mod io;
pub mod api;

// Re-export commonly used types
pub use models::core::*;
pub use models::{EditorConfig, EditorError, EditorResult, Stave, TextBlock, Tuning};
pub use workspace::{Component, ComponentId, ComponentKind, Workspace, WorkspaceMember};

use wasm_bindgen::prelude::*;

// This is like the `main` function, but for WASM modules.
#[wasm_bindgen(start)]
pub fn main() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();

    #[cfg(feature = "console_log")]
    init_logger();

    log::info!("Tablature editor WASM module initialized");
}

#[cfg(feature = "console_log")]
fn init_logger() {
    if console_log::init_with_level(log::Level::Debug).is_err() {
        api::helpers::log_warn("logger already initialized");
    }
}
