//! Stave component
//!
//! A stave composes a tuning, a grid with one row per string, and an
//! optional articulation row of free-form annotation characters.

use serde::{Deserialize, Serialize};

use super::core::{Cell, CellSource, Grid};
use super::errors::{EditorError, EditorResult};
use super::tuning::{Tuning, TuningChange};

/// Default column count of a new stave
pub const DEFAULT_STAVE_LENGTH: usize = 24;

/// Blank value of an articulation cell
pub const ARTICULATION_BLANK: char = ' ';

/// Content of a freshly added articulation row
pub const DEFAULT_ARTICULATION_SCAFFOLD: &str = "PM----";

/// Indent placed before the articulation line in exported text
pub const ARTICULATION_INDENT: &str = "  ";

/// Closes the articulation line in exported text, like the bar after a row
pub const ARTICULATION_TERMINATOR: char = '|';

/// Characters an articulation cell may hold
pub fn is_articulation_char(c: char) -> bool {
    !c.is_control() && c != ARTICULATION_TERMINATOR
}

/// Annotation row drawn beneath the grid (palm mutes, let-ring, ...)
#[derive(Serialize, Clone, Debug, PartialEq)]
pub struct Articulation {
    cells: Vec<Cell>,
    cursor: usize,
    focus: bool,
}

impl Articulation {
    /// One character of `text` per column; missing columns and
    /// characters a cell cannot hold are blank
    pub fn new(columns: usize, text: &str) -> Self {
        let mut chars = text.chars();
        let cells = (0..columns)
            .map(|x| {
                let value = chars
                    .next()
                    .filter(|c| is_articulation_char(*c))
                    .unwrap_or(ARTICULATION_BLANK);
                Cell::new(x, value)
            })
            .collect();

        Self {
            cells,
            cursor: 0,
            focus: false,
        }
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    pub fn text(&self) -> String {
        self.cells.iter().map(|cell| cell.value).collect()
    }

    /// Truncate or extend with blanks, then reindex
    pub fn resize(&mut self, columns: usize) {
        self.cells.resize(columns, Cell::new(0, ARTICULATION_BLANK));
        for (x, cell) in self.cells.iter_mut().enumerate() {
            cell.index = x;
        }
        self.cursor = self.cursor.min(columns.saturating_sub(1));
    }

    pub fn set(&mut self, x: usize, value: char) -> EditorResult<()> {
        let len = self.cells.len();
        let cell = self.cells.get_mut(x).ok_or(EditorError::OutOfRangeCell {
            x,
            y: 0,
            columns: len,
            rows: 1,
        })?;
        if !is_articulation_char(value) {
            return Err(EditorError::InvalidCellValue(value));
        }
        cell.value = value;
        Ok(())
    }

    /// Blank every cell
    pub fn clear(&mut self) {
        for cell in &mut self.cells {
            cell.value = ARTICULATION_BLANK;
        }
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn click(&mut self, x: usize) -> EditorResult<()> {
        if x >= self.cells.len() {
            return Err(EditorError::OutOfRangeCell {
                x,
                y: 0,
                columns: self.cells.len(),
                rows: 1,
            });
        }
        self.cursor = x;
        self.focus = true;
        Ok(())
    }

    pub fn blur(&mut self) {
        self.focus = false;
    }

    pub fn has_focus(&self) -> bool {
        self.focus
    }

    pub fn move_left(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
    }

    pub fn move_right(&mut self) {
        self.cursor = (self.cursor + 1).min(self.cells.len().saturating_sub(1));
    }

    /// Write at the cursor and move right
    pub fn type_char(&mut self, value: char) -> EditorResult<()> {
        self.set(self.cursor, value)?;
        self.move_right();
        Ok(())
    }

    /// Blank the cursor cell and move left
    pub fn backspace(&mut self) -> EditorResult<()> {
        self.set(self.cursor, ARTICULATION_BLANK)?;
        self.move_left();
        Ok(())
    }
}

/// Construction data for a stave, as produced by the import parser
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct StaveInit {
    /// Labels, lowest string first
    pub tuning: Vec<String>,

    /// Column count
    pub length: usize,

    /// Values by row (row 0 = lowest string), any shape
    #[serde(default)]
    pub cells: Vec<Vec<char>>,

    /// Articulation row text, if the stave has one
    #[serde(default)]
    pub articulation: Option<String>,
}

/// One editable tablature block
#[derive(Serialize, Clone, Debug, PartialEq)]
pub struct Stave {
    tuning: Tuning,
    grid: Grid,
    articulation: Option<Articulation>,
}

impl Stave {
    pub fn new(tuning: Tuning, length: usize, source: CellSource) -> EditorResult<Self> {
        let grid = Grid::new(length, tuning.len(), source)?;
        Ok(Self {
            tuning,
            grid,
            articulation: None,
        })
    }

    pub fn from_init(init: StaveInit) -> EditorResult<Self> {
        let tuning = Tuning::new(&init.tuning)?;
        let mut stave = Self::new(tuning, init.length, CellSource::Clone(init.cells))?;
        if let Some(text) = init.articulation {
            stave.add_articulation(&text);
        }
        Ok(stave)
    }

    /// Construction data that rebuilds this stave
    pub fn init(&self) -> StaveInit {
        StaveInit {
            tuning: self.tuning.labels().to_vec(),
            length: self.grid.columns(),
            cells: self.grid.values(),
            articulation: self.articulation.as_ref().map(Articulation::text),
        }
    }

    pub fn tuning(&self) -> &Tuning {
        &self.tuning
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn grid_mut(&mut self) -> &mut Grid {
        &mut self.grid
    }

    pub fn columns(&self) -> usize {
        self.grid.columns()
    }

    pub fn articulation(&self) -> Option<&Articulation> {
        self.articulation.as_ref()
    }

    pub fn articulation_mut(&mut self) -> Option<&mut Articulation> {
        self.articulation.as_mut()
    }

    /// Replace the tuning; rows are added or removed at the edge chosen by
    /// `Tuning::plan_change`
    pub fn set_tuning(&mut self, next: Tuning) -> EditorResult<TuningChange> {
        let change = self.tuning.plan_change(&next);
        match change {
            TuningChange::Relabel => {}
            TuningChange::Grow { edge, .. } | TuningChange::Shrink { edge, .. } => {
                self.grid.change_tuning(next.len(), edge)?;
            }
        }
        log::info!("tuning changed: {} -> {} ({:?})", self.tuning, next, change);
        self.tuning = next;
        Ok(change)
    }

    /// Parse popup input and apply it; the prior tuning is kept on error
    pub fn set_tuning_str(&mut self, input: &str) -> EditorResult<TuningChange> {
        let next = Tuning::parse(input)?;
        self.set_tuning(next)
    }

    /// Change the column count of the grid and the articulation row
    pub fn resize(&mut self, columns: usize) -> EditorResult<bool> {
        let changed = self.grid.resize_columns(columns)?;
        if let Some(articulation) = self.articulation.as_mut() {
            articulation.resize(columns);
        }
        Ok(changed)
    }

    pub fn add_articulation(&mut self, text: &str) {
        self.articulation = Some(Articulation::new(self.grid.columns(), text));
    }

    pub fn remove_articulation(&mut self) -> Option<Articulation> {
        self.articulation.take()
    }

    /// Add the articulation row (pre-filled from `initial` or the default
    /// scaffold) or remove it if present. Returns whether it now exists.
    pub fn toggle_articulation(&mut self, initial: Option<&str>) -> bool {
        if self.articulation.is_some() {
            self.articulation = None;
            false
        } else {
            self.add_articulation(initial.unwrap_or(DEFAULT_ARTICULATION_SCAFFOLD));
            true
        }
    }

    /// Blank the articulation row, keeping it in place
    pub fn clear_articulation(&mut self) {
        if let Some(articulation) = self.articulation.as_mut() {
            articulation.clear();
        }
    }

    /// Deep copy of values, tuning, length and articulation; no shared state
    pub fn duplicate(&self) -> Self {
        let mut grid = self.grid.clone();
        grid.blur();
        let articulation = self.articulation.as_ref().map(|a| {
            let mut copy = a.clone();
            copy.blur();
            copy
        });
        Self {
            tuning: self.tuning.clone(),
            grid,
            articulation,
        }
    }

    /// Plain-text tab block, highest string first
    pub fn serialize(&self) -> String {
        let mut lines = Vec::with_capacity(self.tuning.len() + 1);
        for y in (0..self.tuning.len()).rev() {
            let label = self.tuning.render_label(y).unwrap_or_default();
            let row = self.grid.row_text(y).unwrap_or_default();
            lines.push(format!("{}{}|", label, row));
        }
        if let Some(articulation) = &self.articulation {
            lines.push(format!(
                "{}{}{}",
                ARTICULATION_INDENT,
                articulation.text(),
                ARTICULATION_TERMINATOR
            ));
        }
        lines.join("\n")
    }
}

impl Default for Stave {
    fn default() -> Self {
        let tuning = Tuning::standard();
        let grid = Grid::new(DEFAULT_STAVE_LENGTH, tuning.len(), CellSource::Empty)
            .unwrap_or_else(|_| unreachable!("default dimensions are non-zero"));
        Self {
            tuning,
            grid,
            articulation: None,
        }
    }
}
