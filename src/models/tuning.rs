//! Tuning Manager
//!
//! A tuning is the ordered list of string labels of a stave, lowest string
//! first. Changing the number of strings maps onto adding or removing grid
//! rows at one edge of the row stack; which edge is decided by comparing the
//! `/`-joined forms of the old and new tunings.

use serde::{Deserialize, Serialize};

use super::core::RowEdge;
use super::errors::{EditorError, EditorResult};

/// Separator used by tuning input and the joined form
pub const TUNING_SEPARATOR: char = '/';

/// Longest accepted string label ("F#", "Bb")
pub const MAX_LABEL_LEN: usize = 2;

/// Ordered string labels, lowest string first
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
#[serde(try_from = "Vec<String>", into = "Vec<String>")]
pub struct Tuning {
    labels: Vec<String>,
}

/// Structural effect of replacing one tuning with another
#[derive(Serialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(tag = "change", rename_all = "snake_case")]
pub enum TuningChange {
    /// Same string count, only the labels differ
    Relabel,
    Grow { rows: usize, edge: RowEdge },
    Shrink { rows: usize, edge: RowEdge },
}

impl Tuning {
    /// Build a tuning from labels, trimming each one
    pub fn new<I, S>(labels: I) -> EditorResult<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let labels: Vec<String> = labels
            .into_iter()
            .map(|label| label.as_ref().trim().to_string())
            .collect();

        if labels.is_empty() {
            return Err(EditorError::InvalidTuning("tuning needs at least one string".into()));
        }
        if let Some(label) = labels.iter().find(|label| label.is_empty()) {
            return Err(EditorError::InvalidTuning(format!("empty string label {:?}", label)));
        }
        if let Some(label) = labels.iter().find(|label| label.chars().count() > MAX_LABEL_LEN) {
            return Err(EditorError::InvalidTuning(format!(
                "string label '{}' longer than {} characters",
                label, MAX_LABEL_LEN
            )));
        }

        Ok(Self { labels })
    }

    /// Parse tuning popup input such as `E/A/D/G/B/e`
    ///
    /// The input must contain at least one `/`; empty segments are dropped.
    pub fn parse(input: &str) -> EditorResult<Self> {
        let input = input.trim();
        if !input.contains(TUNING_SEPARATOR) {
            return Err(EditorError::InvalidTuning(format!(
                "strings must be separated by '{}'",
                TUNING_SEPARATOR
            )));
        }

        let labels: Vec<&str> = input
            .split(TUNING_SEPARATOR)
            .map(str::trim)
            .filter(|label| !label.is_empty())
            .collect();

        Self::new(labels)
    }

    /// Standard six-string guitar tuning
    pub fn standard() -> Self {
        Self {
            labels: ["E", "A", "D", "G", "B", "e"].iter().map(|s| s.to_string()).collect(),
        }
    }

    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    pub fn label(&self, index: usize) -> Option<&str> {
        self.labels.get(index).map(String::as_str)
    }

    pub fn joined(&self) -> String {
        self.labels.join("/")
    }

    /// Decide how the grid must change to go from `self` to `next`
    pub fn plan_change(&self, next: &Tuning) -> TuningChange {
        let prev_joined = self.joined();
        let next_joined = next.joined();

        if next.len() > self.len() {
            // Strings appended at the end map to the highest rows
            let edge = if next_joined.starts_with(&format!("{}/", prev_joined)) {
                RowEdge::High
            } else {
                RowEdge::Low
            };
            TuningChange::Grow { rows: next.len() - self.len(), edge }
        } else if next.len() < self.len() {
            let edge = if prev_joined.starts_with(&format!("{}/", next_joined)) {
                RowEdge::High
            } else {
                RowEdge::Low
            };
            TuningChange::Shrink { rows: self.len() - next.len(), edge }
        } else {
            TuningChange::Relabel
        }
    }

    /// Whether any label carries an accidental (`#`, or `b` after the note)
    pub fn has_accidentals(&self) -> bool {
        self.labels.iter().any(|label| {
            label
                .chars()
                .enumerate()
                .any(|(i, c)| c == '#' || (i > 0 && c == 'b'))
        })
    }

    /// Display/export form of one label, always three characters wide
    /// when labels are at most two characters long
    pub fn render_label(&self, index: usize) -> Option<String> {
        let label = self.label(index)?;
        if self.has_accidentals() && label.chars().count() > 1 {
            Some(format!("{}|", label))
        } else {
            Some(format!("{} |", label))
        }
    }

    /// Rendered labels top line first (highest string first)
    pub fn rendered_labels(&self) -> Vec<String> {
        (0..self.len())
            .rev()
            .filter_map(|i| self.render_label(i))
            .collect()
    }
}

impl Default for Tuning {
    fn default() -> Self {
        Self::standard()
    }
}

impl TryFrom<Vec<String>> for Tuning {
    type Error = EditorError;

    fn try_from(labels: Vec<String>) -> Result<Self, Self::Error> {
        Tuning::new(labels)
    }
}

impl From<Tuning> for Vec<String> {
    fn from(tuning: Tuning) -> Self {
        tuning.labels
    }
}

impl std::fmt::Display for Tuning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.joined())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tuning(s: &str) -> Tuning {
        Tuning::parse(s).unwrap()
    }

    #[test]
    fn test_parse_standard() {
        let t = tuning("E/A/D/G/B/e");
        assert_eq!(t, Tuning::standard());
        assert_eq!(t.joined(), "E/A/D/G/B/e");
    }

    #[test]
    fn test_parse_requires_separator() {
        assert!(matches!(Tuning::parse("EADGBe"), Err(EditorError::InvalidTuning(_))));
        assert!(matches!(Tuning::parse("///"), Err(EditorError::InvalidTuning(_))));
        assert_eq!(tuning("E/").labels(), ["E"]);
    }

    #[test]
    fn test_parse_drops_empty_segments_and_trims() {
        assert_eq!(tuning(" D / A//D/G ").labels(), ["D", "A", "D", "G"]);
    }

    #[test]
    fn test_rejects_long_labels() {
        assert!(Tuning::parse("E/Abc").is_err());
    }

    #[test]
    fn test_plan_append_grows_high() {
        let prev = tuning("E/A/D");
        assert_eq!(
            prev.plan_change(&tuning("E/A/D/G")),
            TuningChange::Grow { rows: 1, edge: RowEdge::High }
        );
    }

    #[test]
    fn test_plan_prepend_grows_low() {
        let prev = tuning("E/A/D");
        assert_eq!(
            prev.plan_change(&tuning("B/E/A/D")),
            TuningChange::Grow { rows: 1, edge: RowEdge::Low }
        );
    }

    #[test]
    fn test_plan_shrink_edges() {
        let prev = tuning("B/E/A/D/G/B/e");
        assert_eq!(
            prev.plan_change(&tuning("B/E/A/D/G")),
            TuningChange::Shrink { rows: 2, edge: RowEdge::High }
        );
        assert_eq!(
            prev.plan_change(&tuning("E/A/D/G/B/e")),
            TuningChange::Shrink { rows: 1, edge: RowEdge::Low }
        );
    }

    #[test]
    fn test_plan_relabel() {
        assert_eq!(
            tuning("E/A/D/G/B/e").plan_change(&tuning("D/A/D/G/B/e")),
            TuningChange::Relabel
        );
    }

    #[test]
    fn test_render_label_padding() {
        let plain = Tuning::standard();
        assert!(!plain.has_accidentals());
        assert_eq!(plain.render_label(0).unwrap(), "E |");
        assert_eq!(plain.render_label(5).unwrap(), "e |");

        let sharp = tuning("F#/B/E");
        assert!(sharp.has_accidentals());
        assert_eq!(sharp.render_label(0).unwrap(), "F#|");
        assert_eq!(sharp.render_label(1).unwrap(), "B |");
    }

    #[test]
    fn test_lowercase_b_string_is_not_an_accidental() {
        assert!(!tuning("E/A/D/G/b/e").has_accidentals());
        assert!(tuning("Eb/Ab/Db").has_accidentals());
    }

    #[test]
    fn test_rendered_labels_highest_first() {
        assert_eq!(
            tuning("E/A/D").rendered_labels(),
            vec!["D |".to_string(), "A |".to_string(), "E |".to_string()]
        );
    }
}
