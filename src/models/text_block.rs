//! Free-text block component
//!
//! The UI edits text blocks as contentEditable markup: the first line is
//! stored bare and every following line is wrapped in `<div>…</div>`.
//! Internally a block is just its list of lines.

use serde::{Deserialize, Serialize};

const LINE_OPEN: &str = "<div>";
const LINE_CLOSE: &str = "</div>";
const LINE_BREAK: &str = "<br>";

/// Construction data for a text block, as produced by the import parser
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq, Eq)]
pub struct TextInit {
    /// Rich-text markup in the UI storage convention
    pub contents: String,
}

#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq, Eq)]
pub struct TextBlock {
    lines: Vec<String>,
}

impl TextBlock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_lines<I, S>(lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            lines: lines.into_iter().map(Into::into).collect(),
        }
    }

    /// Parse contentEditable markup
    pub fn from_rich_text(markup: &str) -> Self {
        let mut lines = Vec::new();

        let (head, mut rest) = match markup.find(LINE_OPEN) {
            Some(at) => (&markup[..at], &markup[at..]),
            None => (markup, ""),
        };
        if !head.is_empty() || rest.is_empty() {
            lines.extend(head.split('\n').map(|line| line.trim_end().to_string()));
        }

        while let Some(start) = rest.find(LINE_OPEN) {
            let body = &rest[start + LINE_OPEN.len()..];
            let (line, next) = match body.find(LINE_CLOSE) {
                Some(end) => (&body[..end], &body[end + LINE_CLOSE.len()..]),
                None => (body, ""),
            };
            lines.push(line.replace(LINE_BREAK, "").trim_end().to_string());
            rest = next;
        }

        Self { lines }
    }

    /// Markup in the UI storage convention
    pub fn to_rich_text(&self) -> String {
        let mut out = String::new();
        for (i, line) in self.lines.iter().enumerate() {
            if i == 0 {
                out.push_str(line);
            } else if line.is_empty() {
                out.push_str("<div><br></div>");
            } else {
                out.push_str(LINE_OPEN);
                out.push_str(line);
                out.push_str(LINE_CLOSE);
            }
        }
        out
    }

    pub fn init(&self) -> TextInit {
        TextInit {
            contents: self.to_rich_text(),
        }
    }

    pub fn from_init(init: &TextInit) -> Self {
        Self::from_rich_text(&init.contents)
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    pub fn set_text(&mut self, markup: &str) {
        *self = Self::from_rich_text(markup);
    }

    pub fn is_blank(&self) -> bool {
        self.lines.iter().all(|line| line.trim().is_empty())
    }

    pub fn duplicate(&self) -> Self {
        self.clone()
    }

    /// Plain text, one line per stored line, trailing blank lines dropped
    pub fn serialize(&self) -> String {
        self.lines.join("\n").trim_end().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rich_text_single_line() {
        let block = TextBlock::from_rich_text("Intro riff  ");
        assert_eq!(block.lines(), ["Intro riff"]);
        assert_eq!(block.serialize(), "Intro riff");
    }

    #[test]
    fn test_rich_text_div_lines() {
        let block = TextBlock::from_rich_text("Verse<div>play twice</div><div><br></div><div>end</div>");
        assert_eq!(block.lines(), ["Verse", "play twice", "", "end"]);
        assert_eq!(block.serialize(), "Verse\nplay twice\n\nend");
    }

    #[test]
    fn test_rich_text_roundtrip() {
        let block = TextBlock::from_lines(["a", "b", "", "c"]);
        let markup = block.to_rich_text();
        assert_eq!(markup, "a<div>b</div><div><br></div><div>c</div>");
        assert_eq!(TextBlock::from_rich_text(&markup), block);
    }

    #[test]
    fn test_markup_starting_with_div() {
        let block = TextBlock::from_rich_text("<div>only</div>");
        assert_eq!(block.lines(), ["only"]);
    }

    #[test]
    fn test_empty_block() {
        let block = TextBlock::from_rich_text("");
        assert!(block.is_blank());
        assert_eq!(block.serialize(), "");
    }
}
