//! Models module for the tablature editor
//!
//! This module contains the data models of the stave grid system and the
//! simpler workspace components.

pub mod core;
pub mod tuning;
pub mod stave;
pub mod text_block;
pub mod legend;
pub mod errors;
pub mod config;

// Re-export commonly used types
pub use self::core::*;
pub use tuning::{Tuning, TuningChange};
pub use stave::{Articulation, Stave, StaveInit};
pub use text_block::{TextBlock, TextInit};
pub use legend::{LegendEntry, NotationLegend};
pub use errors::{EditorError, EditorResult};
pub use config::EditorConfig;
