//! Plain-text tab import
//!
//! Reads a file in the export format back into component construction
//! data. Lines are classified one at a time:
//!
//! - a stave starts on a line that contains `-`, `|` and an ASCII letter
//!   or digit, or that has the exact shape of an exported row (`e |0|`)
//! - while a stave is open:
//!   - two or more `|` plus a letter or digit: `label|row|...`, one string
//!   - exactly one `|`: the articulation line, its closing `|` dropped
//! - anything else: text; blank lines end a text block
//!
//! Stave lines are listed highest string first, so each new line is
//! inserted at the front of the tuning and of the rows.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::models::stave::{ARTICULATION_INDENT, ARTICULATION_TERMINATOR};
use crate::models::tuning::MAX_LABEL_LEN;
use crate::models::{EditorError, EditorResult, StaveInit, TextBlock, TextInit, PLACEHOLDER};

static LABEL_NOISE: Lazy<Regex> = Lazy::new(|| Regex::new(r"[^A-Za-z#]").expect("valid regex"));

/// A single exported row: short label, then bar-enclosed cells
static EXPORTED_ROW: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z#]{1,2} ?\|[^|\s]+\|$").expect("valid regex"));

/// One component to create, in workspace order
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(tag = "kind", content = "contents", rename_all = "snake_case")]
pub enum ProjectItem {
    Stave(StaveInit),
    Text(TextInit),
}

fn has_alphanumeric(line: &str) -> bool {
    line.chars().any(|c| c.is_ascii_alphanumeric())
}

/// Whether a trimmed line opens a stave block
fn starts_stave(line: &str) -> bool {
    (line.contains('-') && line.contains('|') && has_alphanumeric(line))
        || EXPORTED_ROW.is_match(line)
}

/// Whether a trimmed line belongs to an already open stave block
fn continues_stave(line: &str) -> bool {
    match line.matches('|').count() {
        0 => false,
        1 => true,
        _ => has_alphanumeric(line),
    }
}

#[derive(Default)]
struct StaveBlock {
    labels: Vec<String>,
    rows: Vec<Vec<char>>,
    articulation: Option<String>,
}

impl StaveBlock {
    fn push_line(&mut self, raw: &str, trimmed: &str) {
        let bars: Vec<usize> = trimmed.match_indices('|').map(|(i, _)| i).collect();
        match bars.as_slice() {
            [_] => {
                let text = raw
                    .strip_prefix(ARTICULATION_INDENT)
                    .unwrap_or_else(|| raw.trim_start())
                    .trim_end();
                let text = text.strip_suffix(ARTICULATION_TERMINATOR).unwrap_or(text);
                self.articulation = Some(text.to_string());
            }
            [first, second, ..] => {
                let label: String = LABEL_NOISE
                    .replace_all(&trimmed[..*first], "")
                    .chars()
                    .take(MAX_LABEL_LEN)
                    .collect();
                if label.is_empty() {
                    log::debug!("import: skipping stave line without a label: {:?}", trimmed);
                    return;
                }
                let row = trimmed[first + 1..*second].chars().collect();
                self.labels.insert(0, label);
                self.rows.insert(0, row);
            }
            [] => {}
        }
    }

    /// Pad rows to a common width and produce construction data
    fn finish(self) -> Option<StaveInit> {
        let width = self.rows.iter().map(Vec::len).max().unwrap_or(0);
        if self.labels.is_empty() || width == 0 {
            log::warn!("import: dropping stave block without strings or columns");
            return None;
        }

        let cells = self
            .rows
            .into_iter()
            .map(|mut row| {
                row.resize(width, PLACEHOLDER);
                row
            })
            .collect();

        Some(StaveInit {
            tuning: self.labels,
            length: width,
            cells,
            articulation: self.articulation,
        })
    }
}

#[derive(Default)]
struct ImportState {
    items: Vec<ProjectItem>,
    stave: Option<StaveBlock>,
    text: Vec<String>,
}

impl ImportState {
    fn flush_stave(&mut self) {
        if let Some(init) = self.stave.take().and_then(StaveBlock::finish) {
            self.items.push(ProjectItem::Stave(init));
        }
    }

    fn flush_text(&mut self) {
        if self.text.is_empty() {
            return;
        }
        let block = TextBlock::from_lines(std::mem::take(&mut self.text));
        self.items.push(ProjectItem::Text(block.init()));
    }

    fn line(&mut self, raw: &str) {
        let trimmed = raw.trim();
        let in_stave = if self.stave.is_some() {
            continues_stave(trimmed)
        } else {
            starts_stave(trimmed)
        };
        if in_stave {
            self.flush_text();
            self.stave.get_or_insert_with(StaveBlock::default).push_line(raw, trimmed);
        } else {
            self.flush_stave();
            if trimmed.is_empty() {
                self.flush_text();
            } else {
                self.text.push(trimmed.to_string());
            }
        }
    }

    fn finish(mut self) -> Vec<ProjectItem> {
        self.flush_stave();
        self.flush_text();
        self.items
    }
}

/// Parse exported text into components
///
/// Fails with `ImportFormat` when nothing recognizable is found; in that
/// case the caller should leave the workspace untouched.
pub fn import_text(contents: &str) -> EditorResult<Vec<ProjectItem>> {
    let mut state = ImportState::default();
    for raw in contents.split('\n') {
        state.line(raw);
    }
    let items = state.finish();

    if items.is_empty() {
        return Err(EditorError::ImportFormat(
            "found nothing to import".to_string(),
        ));
    }
    log::info!("import: parsed {} components", items.len());
    Ok(items)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stave(item: &ProjectItem) -> &StaveInit {
        match item {
            ProjectItem::Stave(init) => init,
            other => panic!("expected stave, got {:?}", other),
        }
    }

    #[test]
    fn test_two_row_block() {
        let items = import_text("E |---|\nA |---|\n").unwrap();
        assert_eq!(items.len(), 1);
        let init = stave(&items[0]);
        assert_eq!(init.tuning, vec!["A", "E"]);
        assert_eq!(init.length, 3);
        assert!(init.cells.iter().flatten().all(|c| *c == PLACEHOLDER));
        assert_eq!(init.articulation, None);
    }

    #[test]
    fn test_rows_are_padded_to_widest() {
        let items = import_text("e |--3|\nB |-|\nG |-----|").unwrap();
        let init = stave(&items[0]);
        assert_eq!(init.length, 5);
        assert_eq!(init.cells[2], vec!['-', '-', '3', '-', '-']);
        assert!(init.cells.iter().all(|row| row.len() == 5));
    }

    #[test]
    fn test_labels_are_cleaned() {
        let items = import_text(" F#|--|\n Bb |-0|\n 3x|--|").unwrap();
        let init = stave(&items[0]);
        assert_eq!(init.tuning, vec!["x", "Bb", "F#"]);
    }

    #[test]
    fn test_articulation_line_keeps_inner_spacing() {
        let items = import_text("e |----|\nE |----|\n   x--|   \n").unwrap();
        let init = stave(&items[0]);
        assert_eq!(init.articulation.as_deref(), Some(" x--"));
    }

    #[test]
    fn test_fully_fretted_row_stays_in_block() {
        let items = import_text("D |---|\nA |000|\nE |---|\n").unwrap();
        assert_eq!(items.len(), 1);
        let init = stave(&items[0]);
        assert_eq!(init.tuning, vec!["E", "A", "D"]);
        assert_eq!(init.cells[1], vec!['0', '0', '0']);
    }

    #[test]
    fn test_single_column_chord() {
        let items = import_text("G |0|\nD |2|\nA |3|\n  x|\n").unwrap();
        assert_eq!(items.len(), 1);
        let init = stave(&items[0]);
        assert_eq!(init.tuning, vec!["A", "D", "G"]);
        assert_eq!(init.length, 1);
        assert_eq!(init.articulation.as_deref(), Some("x"));
    }

    #[test]
    fn test_blank_articulation_line() {
        let items = import_text("e |--|\nE |--|\n  |\n").unwrap();
        assert_eq!(stave(&items[0]).articulation.as_deref(), Some(""));
    }

    #[test]
    fn test_text_without_dashes_does_not_open_a_stave() {
        let items = import_text("Capo 2 | let ring | slow\n").unwrap();
        assert!(matches!(items[0], ProjectItem::Text(_)));
    }

    #[test]
    fn test_text_blocks_split_on_blank_lines() {
        let items = import_text("Intro\nplay twice\n\nOutro\n").unwrap();
        assert_eq!(
            items,
            vec![
                ProjectItem::Text(TextInit {
                    contents: "Intro<div>play twice</div>".into()
                }),
                ProjectItem::Text(TextInit {
                    contents: "Outro".into()
                }),
            ]
        );
    }

    #[test]
    fn test_content_switch_flushes_block() {
        let items = import_text("Verse\ne |-|\nE |-|\nChorus").unwrap();
        assert_eq!(items.len(), 3);
        assert!(matches!(items[0], ProjectItem::Text(_)));
        assert_eq!(stave(&items[1]).tuning, vec!["E", "e"]);
        assert!(matches!(items[2], ProjectItem::Text(_)));
    }

    #[test]
    fn test_empty_input_is_an_error() {
        assert!(matches!(import_text(""), Err(EditorError::ImportFormat(_))));
        assert!(matches!(import_text("\n \n\n"), Err(EditorError::ImportFormat(_))));
    }

    #[test]
    fn test_project_item_json_shape() {
        let item = ProjectItem::Text(TextInit {
            contents: "hi".into(),
        });
        let json = serde_json::to_value(&item).unwrap();
        assert_eq!(json, serde_json::json!({"kind": "text", "contents": {"contents": "hi"}}));
    }
}
