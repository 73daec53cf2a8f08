//! Tablature editor WASM API
//!
//! This module provides the JavaScript-facing API for the editor.
//!
//! # Module Structure
//!
//! - `helpers`: Shared utilities for serialization, validation, error handling, and logging
//! - `types`: Snapshot views returned to JavaScript
//! - `core`: The exported functions, grouped by editing concern

pub mod helpers;
pub mod types;
pub mod core;

// Re-export all public functions to keep a flat public API
pub use self::core::*;
