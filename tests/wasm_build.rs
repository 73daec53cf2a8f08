//! WASM build test
//!
//! This module tests that the WASM module can be built and the exported API
//! works against the stored workspace.

#![cfg(target_arch = "wasm32")]

use plectrm_wasm::api::*;
use wasm_bindgen::JsValue;
use wasm_bindgen_test::*;

wasm_bindgen_test_configure!(run_in_browser);

#[wasm_bindgen_test]
fn test_workspace_creation() {
    let snapshot = create_workspace(None);
    assert!(snapshot.is_ok());
    assert_eq!(export_text().unwrap(), "");
}

#[wasm_bindgen_test]
fn test_edit_and_export() {
    create_workspace(Some("default_tuning: \"E/A\"\ndefault_length: 3\n".to_string())).unwrap();
    let id = add_stave().unwrap();

    click_cell(id, 0, 0).unwrap();
    let outcome = key_down("5", false).unwrap();
    assert!(outcome.is_object());

    assert_eq!(export_text().unwrap(), "A |---|\nE |5--|\n");
}

#[wasm_bindgen_test]
fn test_invalid_tuning_is_reported() {
    create_workspace(None).unwrap();
    let id = add_stave().unwrap();

    open_tuning_popover(id).unwrap();
    let result: Result<JsValue, JsValue> = submit_tuning("EADGBE");
    assert!(result.is_err());
    cancel_tuning().unwrap();
}

#[wasm_bindgen_test]
fn test_import_file() {
    create_workspace(None).unwrap();
    let ids = import_file("txt", "E |---|\nA |---|\n").unwrap();
    assert_eq!(ids.length(), 1);

    assert!(import_file("pdf", "E |---|").is_err());
    assert_eq!(get_component_ids().unwrap().length(), 1);
}
