//! Shared types for the WASM API
//!
//! Views handed to JavaScript. They borrow from the workspace and are only
//! built for serialization.

use serde::Serialize;

use crate::input::focus::FocusOwner;
use crate::input::popover::PopoverView;
use crate::workspace::{Component, ComponentId, Workspace};

/// One component together with its handle
#[derive(Serialize, Debug)]
pub struct ComponentSnapshot<'a> {
    pub id: ComponentId,
    pub component: &'a Component,
}

/// Full editor state as seen by the UI
#[derive(Serialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct WorkspaceSnapshot<'a> {
    pub components: Vec<ComponentSnapshot<'a>>,
    pub focus: Option<FocusOwner>,
    pub popover: Option<PopoverView>,
    pub resizing: bool,
}

impl<'a> WorkspaceSnapshot<'a> {
    pub fn of(workspace: &'a Workspace) -> Self {
        Self {
            components: workspace
                .iter()
                .map(|(id, component)| ComponentSnapshot { id, component })
                .collect(),
            focus: workspace.focus_holder(),
            popover: workspace.popover().map(|popover| popover.view()),
            resizing: workspace.is_resizing(),
        }
    }
}
