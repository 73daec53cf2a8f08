//! Parsing module for the tablature editor
//!
//! Converts plain-text tab files back into component construction data.

pub mod import;

// Re-export commonly used types
pub use import::{import_text, ProjectItem};
