//! WASM API over the editor workspace
//!
//! The workspace lives in WASM-owned storage; JavaScript addresses
//! components by their numeric id and re-reads state through
//! `getWorkspaceSnapshot` after each edit.

use std::sync::Mutex;

use js_sys;
use lazy_static::lazy_static;
use wasm_bindgen::prelude::*;

use super::helpers::{
    deserialize, editor_error, serialize, single_char, validate_index, validation_error,
};
use super::types::WorkspaceSnapshot;
use crate::input::keys::{Key, KeyEvent};
use crate::input::resize::ResizeGeometry;
use crate::io::{parse_imported_file, ImportedFile};
use crate::models::{Direction, EditorConfig, EditorResult};
use crate::workspace::{ComponentId, Workspace, WorkspaceMember};
use crate::{wasm_info, wasm_log, wasm_warn};

// WASM-owned workspace storage (canonical source of truth)
lazy_static! {
    static ref WORKSPACE: Mutex<Option<Workspace>> = Mutex::new(None);
}

/// Run a view over the stored workspace
fn view<T>(context: &str, f: impl FnOnce(&mut Workspace) -> Result<T, JsValue>) -> Result<T, JsValue> {
    let mut guard = WORKSPACE
        .lock()
        .map_err(|_| validation_error(format!("{}: workspace storage is poisoned", context)))?;
    match guard.as_mut() {
        Some(workspace) => f(workspace),
        None => {
            wasm_warn!("{}: no workspace loaded", context);
            Err(JsValue::from_str("No workspace loaded"))
        }
    }
}

/// Run an edit against the stored workspace, converting editor errors
fn edit<T>(context: &str, f: impl FnOnce(&mut Workspace) -> EditorResult<T>) -> Result<T, JsValue> {
    view(context, |workspace| f(workspace).map_err(|e| editor_error(context, e)))
}

// ============================================================================
// Workspace lifecycle
// ============================================================================

/// Create an empty workspace and store it internally
///
/// `config_yaml` optionally overrides the editor defaults.
#[wasm_bindgen(js_name = createWorkspace)]
pub fn create_workspace(config_yaml: Option<String>) -> Result<JsValue, JsValue> {
    wasm_info!("createWorkspace called");

    let config = match config_yaml.as_deref() {
        Some(source) => {
            EditorConfig::from_yaml(source).map_err(|e| editor_error("createWorkspace", e))?
        }
        None => EditorConfig::default(),
    };
    wasm_log!(
        "  default tuning '{}', length {}",
        config.default_tuning,
        config.default_length
    );

    let workspace = Workspace::new(config);
    let result = serialize(&WorkspaceSnapshot::of(&workspace), "Serialization error")?;

    *WORKSPACE
        .lock()
        .map_err(|_| validation_error("createWorkspace: workspace storage is poisoned"))? =
        Some(workspace);

    wasm_info!("createWorkspace completed successfully");
    Ok(result)
}

/// Replace the editor configuration of the current workspace
#[wasm_bindgen(js_name = configureWorkspace)]
pub fn configure_workspace(config_yaml: &str) -> Result<(), JsValue> {
    wasm_info!("configureWorkspace called");
    edit("configureWorkspace", |ws| {
        ws.set_config(EditorConfig::from_yaml(config_yaml)?);
        Ok(())
    })
}

/// Get the current workspace snapshot
#[wasm_bindgen(js_name = getWorkspaceSnapshot)]
pub fn get_workspace_snapshot() -> Result<JsValue, JsValue> {
    view("getWorkspaceSnapshot", |ws| {
        serialize(&WorkspaceSnapshot::of(ws), "Snapshot serialization error")
    })
}

/// Component ids in workspace order
#[wasm_bindgen(js_name = getComponentIds)]
pub fn get_component_ids() -> Result<js_sys::Array, JsValue> {
    view("getComponentIds", |ws| {
        Ok(ws
            .ids()
            .into_iter()
            .map(|id| JsValue::from(id.0))
            .collect::<js_sys::Array>())
    })
}

// ============================================================================
// Component management
// ============================================================================

#[wasm_bindgen(js_name = addStave)]
pub fn add_stave() -> Result<u32, JsValue> {
    wasm_info!("addStave called");
    edit("addStave", |ws| ws.add_stave().map(|id| id.0))
}

#[wasm_bindgen(js_name = addTextBlock)]
pub fn add_text_block(markup: &str) -> Result<u32, JsValue> {
    wasm_info!("addTextBlock called");
    edit("addTextBlock", |ws| Ok(ws.add_text_block(markup).0))
}

#[wasm_bindgen(js_name = addLegend)]
pub fn add_legend() -> Result<u32, JsValue> {
    wasm_info!("addLegend called");
    edit("addLegend", |ws| Ok(ws.add_legend().0))
}

#[wasm_bindgen(js_name = removeComponent)]
pub fn remove_component(id: u32) -> Result<(), JsValue> {
    wasm_info!("removeComponent called: id={}", id);
    edit("removeComponent", |ws| ws.remove(ComponentId(id)).map(|_| ()))
}

/// Duplicate a component; the copy is placed right after it
#[wasm_bindgen(js_name = duplicateComponent)]
pub fn duplicate_component(id: u32) -> Result<u32, JsValue> {
    wasm_info!("duplicateComponent called: id={}", id);
    edit("duplicateComponent", |ws| ws.duplicate(ComponentId(id)).map(|copy| copy.0))
}

#[wasm_bindgen(js_name = moveComponentUp)]
pub fn move_component_up(id: u32) -> Result<bool, JsValue> {
    edit("moveComponentUp", |ws| ws.move_up(ComponentId(id)))
}

#[wasm_bindgen(js_name = moveComponentDown)]
pub fn move_component_down(id: u32) -> Result<bool, JsValue> {
    edit("moveComponentDown", |ws| ws.move_down(ComponentId(id)))
}

/// Plain-text rendering of a single component
#[wasm_bindgen(js_name = serializeComponent)]
pub fn serialize_component(id: u32) -> Result<String, JsValue> {
    view("serializeComponent", |ws| match ws.get(ComponentId(id)) {
        Some(component) => Ok(component.serialize()),
        None => Err(validation_error(format!("serializeComponent: unknown component #{}", id))),
    })
}

// ============================================================================
// Grid editing
// ============================================================================

#[wasm_bindgen(js_name = clickCell)]
pub fn click_cell(id: u32, x: usize, y: usize) -> Result<(), JsValue> {
    wasm_log!("clickCell called: id={}, x={}, y={}", id, x, y);
    edit("clickCell", |ws| ws.click_cell(ComponentId(id), x, y))
}

#[wasm_bindgen(js_name = setCell)]
pub fn set_cell(id: u32, x: usize, y: usize, value: &str) -> Result<(), JsValue> {
    wasm_log!("setCell called: id={}, x={}, y={}, value='{}'", id, x, y, value);
    let value = single_char(value, "setCell").map_err(validation_error)?;
    edit("setCell", |ws| {
        ws.stave_mut(ComponentId(id))?.grid_mut().set_cell(x, y, value)
    })
}

#[wasm_bindgen(js_name = clearCell)]
pub fn clear_cell(id: u32, x: usize, y: usize) -> Result<(), JsValue> {
    edit("clearCell", |ws| ws.stave_mut(ComponentId(id))?.grid_mut().clear_cell(x, y))
}

#[wasm_bindgen(js_name = setInputDirection)]
pub fn set_input_direction(id: u32, direction: Direction) -> Result<(), JsValue> {
    edit("setInputDirection", |ws| {
        ws.stave_mut(ComponentId(id))?.grid_mut().set_direction(direction);
        Ok(())
    })
}

/// Route a DOM `keydown` to the focused element
///
/// Returns `{handled, changed, releaseFocus}`; unknown keys are reported as
/// not handled.
#[wasm_bindgen(js_name = keyDown)]
pub fn key_down(key: &str, alt: bool) -> Result<JsValue, JsValue> {
    let Some(key) = Key::from_dom(key) else {
        wasm_log!("keyDown ignored: '{}'", key);
        return serialize(&crate::input::KeyOutcome::default(), "Serialization error");
    };
    let event = KeyEvent { key, alt };
    let outcome = edit("keyDown", |ws| ws.key_down(event))?;
    serialize(&outcome, "Serialization error")
}

/// Pointer-down outside every focusable element
#[wasm_bindgen(js_name = releaseFocus)]
pub fn release_focus() -> Result<(), JsValue> {
    edit("releaseFocus", |ws| {
        ws.release_focus();
        Ok(())
    })
}

// ============================================================================
// Articulation
// ============================================================================

/// Add or remove the articulation row; returns whether it now exists
#[wasm_bindgen(js_name = toggleArticulation)]
pub fn toggle_articulation(id: u32) -> Result<bool, JsValue> {
    wasm_info!("toggleArticulation called: id={}", id);
    edit("toggleArticulation", |ws| {
        let scaffold = ws.config().articulation_scaffold.clone();
        Ok(ws
            .stave_mut(ComponentId(id))?
            .toggle_articulation(Some(&scaffold)))
    })
}

#[wasm_bindgen(js_name = clearArticulation)]
pub fn clear_articulation(id: u32) -> Result<(), JsValue> {
    edit("clearArticulation", |ws| {
        ws.stave_mut(ComponentId(id))?.clear_articulation();
        Ok(())
    })
}

#[wasm_bindgen(js_name = clickArticulation)]
pub fn click_articulation(id: u32, x: usize) -> Result<(), JsValue> {
    edit("clickArticulation", |ws| ws.click_articulation(ComponentId(id), x))
}

// ============================================================================
// Length / resize
// ============================================================================

/// Set the column count from the length input field
#[wasm_bindgen(js_name = resizeStave)]
pub fn resize_stave(id: u32, columns: usize) -> Result<bool, JsValue> {
    wasm_info!("resizeStave called: id={}, columns={}", id, columns);
    edit("resizeStave", |ws| ws.resize_stave(ComponentId(id), columns))
}

/// Start a resize-handle drag
///
/// `geometry_js` is `{gridLeft, cellWidth, limitRight}` in pixels.
#[wasm_bindgen(js_name = beginResize)]
pub fn begin_resize(id: u32, geometry_js: JsValue) -> Result<(), JsValue> {
    let geometry: ResizeGeometry = deserialize(geometry_js, "Resize geometry error")?;
    edit("beginResize", |ws| ws.begin_resize(ComponentId(id), geometry))
}

/// Returns the new column count, or `undefined` when unchanged
#[wasm_bindgen(js_name = dragResize)]
pub fn drag_resize(pointer_x: f64) -> Result<Option<usize>, JsValue> {
    edit("dragResize", |ws| ws.drag_resize(pointer_x))
}

#[wasm_bindgen(js_name = endResize)]
pub fn end_resize() -> Result<Option<usize>, JsValue> {
    edit("endResize", |ws| Ok(ws.end_resize()))
}

// ============================================================================
// Tuning popup
// ============================================================================

#[wasm_bindgen(js_name = openTuningPopover)]
pub fn open_tuning_popover(id: u32) -> Result<JsValue, JsValue> {
    view("openTuningPopover", |ws| {
        let popover = ws
            .open_tuning_popover(ComponentId(id))
            .map_err(|e| editor_error("openTuningPopover", e))?;
        serialize(&popover.view(), "Serialization error")
    })
}

/// Commit popup input; the popup stays open on an invalid tuning
#[wasm_bindgen(js_name = submitTuning)]
pub fn submit_tuning(input: &str) -> Result<JsValue, JsValue> {
    wasm_info!("submitTuning called: '{}'", input);
    let change = edit("submitTuning", |ws| ws.submit_tuning(input))?;
    serialize(&change, "Serialization error")
}

#[wasm_bindgen(js_name = cancelTuning)]
pub fn cancel_tuning() -> Result<(), JsValue> {
    edit("cancelTuning", |ws| {
        ws.cancel_tuning();
        Ok(())
    })
}

// ============================================================================
// Text blocks and legends
// ============================================================================

/// Store the contentEditable markup of a text block
#[wasm_bindgen(js_name = setText)]
pub fn set_text(id: u32, markup: &str) -> Result<(), JsValue> {
    edit("setText", |ws| ws.set_text(ComponentId(id), markup))
}

#[wasm_bindgen(js_name = focusTextBlock)]
pub fn focus_text_block(id: u32) -> Result<(), JsValue> {
    edit("focusTextBlock", |ws| ws.focus_text_block(ComponentId(id)))
}

#[wasm_bindgen(js_name = addLegendEntry)]
pub fn add_legend_entry(id: u32, symbol: &str, description: &str) -> Result<usize, JsValue> {
    edit("addLegendEntry", |ws| {
        ws.legend_mut(ComponentId(id))?.add_entry(symbol, description)
    })
}

#[wasm_bindgen(js_name = removeLegendEntry)]
pub fn remove_legend_entry(id: u32, index: usize) -> Result<(), JsValue> {
    view("removeLegendEntry", |ws| {
        let legend = ws
            .legend_mut(ComponentId(id))
            .map_err(|e| editor_error("removeLegendEntry", e))?;
        validate_index(index, legend.entries().len(), "Legend entry").map_err(validation_error)?;
        legend.remove_entry(index);
        Ok(())
    })
}

#[wasm_bindgen(js_name = editLegendEntry)]
pub fn edit_legend_entry(
    id: u32,
    index: usize,
    symbol: Option<String>,
    description: Option<String>,
) -> Result<(), JsValue> {
    edit("editLegendEntry", |ws| {
        ws.legend_mut(ComponentId(id))?
            .edit_entry(index, symbol.as_deref(), description.as_deref())
    })
}

// ============================================================================
// Import / export
// ============================================================================

/// Export the workspace as plain-text tab
#[wasm_bindgen(js_name = exportText)]
pub fn export_text() -> Result<String, JsValue> {
    wasm_info!("exportText called");
    view("exportText", |ws| Ok(ws.export_text()))
}

/// Replace the workspace with the contents of an imported file
///
/// `extension` comes from the host's file dialog; only `txt` is accepted.
/// On failure the workspace is left unchanged.
#[wasm_bindgen(js_name = importFile)]
pub fn import_file(extension: &str, contents: &str) -> Result<js_sys::Array, JsValue> {
    wasm_info!("importFile called: extension='{}', {} bytes", extension, contents.len());

    let file = ImportedFile {
        extension: extension.to_string(),
        contents: contents.to_string(),
    };
    let ids = edit("importFile", |ws| {
        let items = parse_imported_file(&file)?;
        ws.load_project(&items)
    })?;

    wasm_info!("importFile completed: {} components", ids.len());
    Ok(ids.into_iter().map(|id| JsValue::from(id.0)).collect())
}
