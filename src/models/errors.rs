//! Error types for the tablature editor core
//!
//! Structural validation errors (dimensions, tunings, cell coordinates) are
//! returned before any state is touched, so a failed call always leaves the
//! grid invariant intact.

use thiserror::Error;

use crate::workspace::ComponentId;

/// Top-level error type for editor operations
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EditorError {
    /// Non-positive column count, row count or tuning size
    #[error("Invalid dimension: {what} must be at least 1 (got {value})")]
    InvalidDimension { what: &'static str, value: usize },

    /// Tuning input missing a separator, or without any usable label
    #[error("Invalid tuning: {0}")]
    InvalidTuning(String),

    /// Import text contained no stave or text blocks
    #[error("Import failed: {0}")]
    ImportFormat(String),

    /// Cell coordinates outside the current grid bounds
    #[error("Cell ({x}, {y}) out of range for {columns}x{rows} grid")]
    OutOfRangeCell {
        x: usize,
        y: usize,
        columns: usize,
        rows: usize,
    },

    /// Character that cannot be stored in a grid cell
    #[error("Invalid cell value: {0:?}")]
    InvalidCellValue(char),

    /// Legend symbol or description rejected by the entry editor
    #[error("Invalid legend entry: {0}")]
    InvalidLegendEntry(String),

    /// No component with this id in the workspace
    #[error("Unknown component: {0}")]
    UnknownComponent(ComponentId),

    /// Import requested for something other than a `.txt` file
    #[error("Unsupported file type: '{0}' (expected 'txt')")]
    UnsupportedFileType(String),

    /// File collaborator failure
    #[error("I/O error: {0}")]
    Io(String),

    /// Editor configuration could not be loaded
    #[error("Invalid configuration: {0}")]
    Config(String),
}

impl EditorError {
    pub fn invalid_dimension(what: &'static str, value: usize) -> Self {
        EditorError::InvalidDimension { what, value }
    }
}

impl From<std::io::Error> for EditorError {
    fn from(err: std::io::Error) -> Self {
        EditorError::Io(err.to_string())
    }
}

pub type EditorResult<T> = Result<T, EditorError>;
