//! Tuning-edit popup state
//!
//! The popup holds the keyboard while open. Submitting an invalid tuning
//! keeps it open with the error attached; cancelling discards the draft.

use serde::Serialize;

use super::focus::FocusLease;
use crate::models::{EditorError, Tuning};
use crate::workspace::ComponentId;

#[derive(Clone, Debug, PartialEq)]
pub struct TuningPopover {
    stave: ComponentId,
    draft: String,
    lease: FocusLease,
    error: Option<EditorError>,
}

/// What the UI needs to draw the popup
#[derive(Serialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PopoverView {
    pub stave: ComponentId,
    pub draft: String,
    pub error: Option<String>,
}

impl TuningPopover {
    pub fn open(stave: ComponentId, current: &Tuning, lease: FocusLease) -> Self {
        Self {
            stave,
            draft: current.joined(),
            lease,
            error: None,
        }
    }

    pub fn stave(&self) -> ComponentId {
        self.stave
    }

    pub fn lease(&self) -> FocusLease {
        self.lease
    }

    pub fn draft(&self) -> &str {
        &self.draft
    }

    pub fn set_draft(&mut self, text: &str) {
        self.draft = text.to_string();
        self.error = None;
    }

    pub fn error(&self) -> Option<&EditorError> {
        self.error.as_ref()
    }

    pub fn reject(&mut self, error: EditorError) {
        self.error = Some(error);
    }

    pub fn view(&self) -> PopoverView {
        PopoverView {
            stave: self.stave,
            draft: self.draft.clone(),
            error: self.error.as_ref().map(ToString::to_string),
        }
    }
}
