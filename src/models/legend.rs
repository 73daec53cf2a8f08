//! Notation legend component
//!
//! A boxed list of technique symbols and what they mean, e.g. `PM` for
//! palm mute.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use super::errors::{EditorError, EditorResult};

pub const MAX_SYMBOL_LEN: usize = 3;
pub const MAX_DESCRIPTION_LEN: usize = 26;

const DIVIDER: &str = "***********************************";

static ENTRY_TEXT: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[A-Za-z/# ]+$").expect("valid regex"));

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct LegendEntry {
    pub symbol: String,
    pub description: String,
}

fn clean_field(input: &str, max_len: usize, field: &str) -> EditorResult<String> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(EditorError::InvalidLegendEntry(format!("{} is empty", field)));
    }
    if !ENTRY_TEXT.is_match(trimmed) {
        return Err(EditorError::InvalidLegendEntry(format!(
            "{} '{}' may only contain letters, '/', '#' and spaces",
            field, trimmed
        )));
    }
    Ok(trimmed.chars().take(max_len).collect::<String>().trim_end().to_string())
}

impl LegendEntry {
    /// Validate and truncate a symbol/description pair
    pub fn new(symbol: &str, description: &str) -> EditorResult<Self> {
        Ok(Self {
            symbol: clean_field(symbol, MAX_SYMBOL_LEN, "symbol")?,
            description: clean_field(description, MAX_DESCRIPTION_LEN, "description")?,
        })
    }

    pub fn render(&self) -> String {
        format!("| {:<width$} {}", self.symbol, self.description, width = MAX_SYMBOL_LEN)
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct NotationLegend {
    entries: Vec<LegendEntry>,
}

impl NotationLegend {
    pub fn new(entries: Vec<LegendEntry>) -> Self {
        Self { entries }
    }

    pub fn entries(&self) -> &[LegendEntry] {
        &self.entries
    }

    pub fn add_entry(&mut self, symbol: &str, description: &str) -> EditorResult<usize> {
        self.entries.push(LegendEntry::new(symbol, description)?);
        Ok(self.entries.len() - 1)
    }

    pub fn remove_entry(&mut self, index: usize) -> Option<LegendEntry> {
        if index < self.entries.len() {
            Some(self.entries.remove(index))
        } else {
            None
        }
    }

    /// Edit one or both fields; nothing changes if either is invalid
    pub fn edit_entry(
        &mut self,
        index: usize,
        symbol: Option<&str>,
        description: Option<&str>,
    ) -> EditorResult<()> {
        let entry = self.entries.get(index).ok_or_else(|| {
            EditorError::InvalidLegendEntry(format!("no entry at index {}", index))
        })?;
        let updated = LegendEntry::new(
            symbol.unwrap_or(entry.symbol.as_str()),
            description.unwrap_or(entry.description.as_str()),
        )?;
        self.entries[index] = updated;
        Ok(())
    }

    pub fn duplicate(&self) -> Self {
        self.clone()
    }

    pub fn serialize(&self) -> String {
        let mut lines = Vec::with_capacity(self.entries.len() + 2);
        lines.push(DIVIDER.to_string());
        lines.extend(self.entries.iter().map(LegendEntry::render));
        lines.push(DIVIDER.to_string());
        lines.join("\n")
    }
}

impl Default for NotationLegend {
    fn default() -> Self {
        Self {
            entries: vec![
                LegendEntry {
                    symbol: "PM".into(),
                    description: "Palm Mute".into(),
                },
                LegendEntry {
                    symbol: "/".into(),
                    description: "Slide Up".into(),
                },
            ],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_serialize() {
        let legend = NotationLegend::default();
        assert_eq!(
            legend.serialize(),
            format!("{d}\n| PM  Palm Mute\n| /   Slide Up\n{d}", d = DIVIDER)
        );
    }

    #[test]
    fn test_entry_truncates() {
        let entry = LegendEntry::new("  PMAB ", "A very long description of a technique").unwrap();
        assert_eq!(entry.symbol, "PMA");
        assert_eq!(entry.description.chars().count(), MAX_DESCRIPTION_LEN);
    }

    #[test]
    fn test_entry_rejects_invalid_text() {
        assert!(LegendEntry::new("", "x").is_err());
        assert!(LegendEntry::new("h", "hammer-on").is_err());
        assert!(LegendEntry::new("5", "five").is_err());
    }

    #[test]
    fn test_edit_and_remove() {
        let mut legend = NotationLegend::default();
        legend.edit_entry(1, None, Some("Slide Down")).unwrap();
        assert_eq!(legend.entries()[1].description, "Slide Down");
        assert_eq!(legend.entries()[1].symbol, "/");

        assert!(legend.edit_entry(0, Some("P-M"), None).is_err());
        assert_eq!(legend.entries()[0].symbol, "PM");

        let idx = legend.add_entry("H", "Hammer On").unwrap();
        assert_eq!(idx, 2);
        assert_eq!(legend.remove_entry(0).unwrap().symbol, "PM");
        assert!(legend.remove_entry(9).is_none());
        assert_eq!(legend.entries().len(), 2);
    }
}
