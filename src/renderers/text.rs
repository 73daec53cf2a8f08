//! Plain-text export
//!
//! Every component renders its own fragment; fragments are joined in
//! workspace order with one blank line between them and the file ends
//! with a single newline.

use crate::workspace::{Workspace, WorkspaceMember};

/// Separator placed between two component fragments
pub const BLOCK_SEPARATOR: &str = "\n\n";

pub fn export_text(workspace: &Workspace) -> String {
    let fragments: Vec<String> = workspace
        .iter()
        .map(|(_, component)| component.serialize())
        .collect();

    if fragments.is_empty() {
        return String::new();
    }

    let mut out = fragments.join(BLOCK_SEPARATOR);
    out.push('\n');
    log::debug!(
        "exported {} components ({} bytes)",
        fragments.len(),
        out.len()
    );
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::EditorConfig;

    fn small_config() -> EditorConfig {
        EditorConfig {
            default_tuning: "E/A".into(),
            default_length: 3,
            ..EditorConfig::default()
        }
    }

    #[test]
    fn test_empty_workspace_exports_nothing() {
        assert_eq!(export_text(&Workspace::default()), "");
    }

    #[test]
    fn test_fragments_joined_by_blank_line() {
        let mut ws = Workspace::new(small_config());
        ws.add_text_block("Intro");
        let id = ws.add_stave().unwrap();
        ws.stave_mut(id).unwrap().grid_mut().set_cell(1, 0, '5').unwrap();

        assert_eq!(export_text(&ws), "Intro\n\nA |---|\nE |-5-|\n");
    }

    #[test]
    fn test_export_follows_workspace_order() {
        let mut ws = Workspace::new(small_config());
        let first = ws.add_text_block("one");
        ws.add_text_block("two");
        ws.move_down(first).unwrap();
        assert_eq!(ws.export_text(), "two\n\none\n");
    }
}
