//! Core data structures for the tablature editor
//!
//! This module defines the Cell-based grid that backs every stave: a
//! rectangular matrix of single-character tab positions plus the entry
//! cursor that walks it.
//!
//! Rows are stored low string first: row `y` holds the string `tuning[y]`,
//! so row 0 is the bottom line of the rendered stave and row `rows - 1` is
//! the top line.

use serde::{Deserialize, Serialize};
use serde_repr::{Deserialize_repr, Serialize_repr};
use wasm_bindgen::prelude::*;

use super::errors::{EditorError, EditorResult};

/// Value of an empty grid cell
pub const PLACEHOLDER: char = '-';

/// The fundamental unit of a tab grid
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub struct Cell {
    /// Row-major position cache (`row * columns + col`), rebuilt on reflow
    pub index: usize,

    /// Single printable character, or `PLACEHOLDER` when unset
    pub value: char,
}

impl Cell {
    pub fn new(index: usize, value: char) -> Self {
        Self { index, value }
    }

    pub fn placeholder(index: usize) -> Self {
        Self::new(index, PLACEHOLDER)
    }

    pub fn is_placeholder(&self) -> bool {
        self.value == PLACEHOLDER
    }
}

/// Check whether a character may be stored in a grid cell
///
/// `|` is reserved as the stave delimiter of the text format.
pub fn is_valid_cell_value(c: char) -> bool {
    !c.is_control() && !c.is_whitespace() && c != '|'
}

/// Column/row coordinate inside a grid
#[derive(Serialize, Deserialize, Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct GridPos {
    pub x: usize,
    pub y: usize,
}

impl GridPos {
    pub fn new(x: usize, y: usize) -> Self {
        Self { x, y }
    }
}

/// Direction the cursor auto-advances in after a keystroke
#[wasm_bindgen]
#[repr(u8)]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize_repr, Deserialize_repr)]
pub enum Direction {
    /// Along a string (column by column)
    Horizontal = 0,

    /// Across strings at one time position
    Vertical = 1,
}

impl Direction {
    pub fn toggled(self) -> Self {
        match self {
            Direction::Horizontal => Direction::Vertical,
            Direction::Vertical => Direction::Horizontal,
        }
    }
}

impl Default for Direction {
    fn default() -> Self {
        Direction::Horizontal
    }
}

/// Transient cursor/input state, only meaningful while the grid has focus
#[derive(Serialize, Deserialize, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CursorState {
    pub active: GridPos,
    pub last_clicked: GridPos,
    pub focus: bool,
    pub direction: Direction,
}

/// Where the initial cell values of a new grid come from
#[derive(Clone, Debug, Default, PartialEq)]
pub enum CellSource {
    /// Every cell starts as `PLACEHOLDER`
    #[default]
    Empty,

    /// Copy values by (row, col) from a prior matrix of any shape
    Clone(Vec<Vec<char>>),
}

/// Which end of the row stack a tuning change grows or shrinks
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RowEdge {
    /// Highest row indices (last tuning entries, top of the rendered stave)
    High,

    /// Row 0 upwards (first tuning entries, bottom of the rendered stave)
    Low,
}

/// The Grid Engine: cell matrix, entry cursor and cached text rendering
#[derive(Serialize, Clone, Debug, PartialEq)]
pub struct Grid {
    rows: Vec<Vec<Cell>>,
    columns: usize,
    cursor: CursorState,

    /// Rendered text, rebuilt synchronously after every mutation
    text: String,
}

impl Grid {
    /// Build a `rows x columns` grid, optionally cloning values by position
    pub fn new(columns: usize, rows: usize, source: CellSource) -> EditorResult<Self> {
        if columns < 1 {
            return Err(EditorError::invalid_dimension("columns", columns));
        }
        if rows < 1 {
            return Err(EditorError::invalid_dimension("rows", rows));
        }

        let clone = match &source {
            CellSource::Empty => None,
            CellSource::Clone(values) => Some(values),
        };

        let rows: Vec<Vec<Cell>> = (0..rows)
            .map(|y| {
                (0..columns)
                    .map(|x| {
                        let value = clone
                            .and_then(|values| values.get(y))
                            .and_then(|row| row.get(x))
                            .copied()
                            .filter(|c| is_valid_cell_value(*c))
                            .unwrap_or(PLACEHOLDER);
                        Cell::new(y * columns + x, value)
                    })
                    .collect()
            })
            .collect();

        let mut grid = Self {
            rows,
            columns,
            cursor: CursorState::default(),
            text: String::new(),
        };
        grid.render();
        Ok(grid)
    }

    pub fn columns(&self) -> usize {
        self.columns
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn rows(&self) -> &[Vec<Cell>] {
        &self.rows
    }

    pub fn cell(&self, x: usize, y: usize) -> Option<&Cell> {
        self.rows.get(y).and_then(|row| row.get(x))
    }

    pub fn value(&self, x: usize, y: usize) -> Option<char> {
        self.cell(x, y).map(|cell| cell.value)
    }

    /// Snapshot of all values, usable as a `CellSource::Clone`
    pub fn values(&self) -> Vec<Vec<char>> {
        self.rows
            .iter()
            .map(|row| row.iter().map(|cell| cell.value).collect())
            .collect()
    }

    pub fn cursor(&self) -> &CursorState {
        &self.cursor
    }

    fn check_bounds(&self, x: usize, y: usize) -> EditorResult<()> {
        if x >= self.columns || y >= self.rows.len() {
            log::warn!(
                "cell ({}, {}) outside {}x{} grid",
                x,
                y,
                self.columns,
                self.rows.len()
            );
            return Err(EditorError::OutOfRangeCell {
                x,
                y,
                columns: self.columns,
                rows: self.rows.len(),
            });
        }
        Ok(())
    }

    /// Write one cell and re-render the grid text
    pub fn set_cell(&mut self, x: usize, y: usize, value: char) -> EditorResult<()> {
        self.check_bounds(x, y)?;
        if !is_valid_cell_value(value) {
            return Err(EditorError::InvalidCellValue(value));
        }
        self.rows[y][x].value = value;
        self.render();
        Ok(())
    }

    /// Reset one cell to the placeholder
    pub fn clear_cell(&mut self, x: usize, y: usize) -> EditorResult<()> {
        self.set_cell(x, y, PLACEHOLDER)
    }

    /// Truncate or extend every row on the right
    ///
    /// Returns `Ok(false)` when the width is already `new_len`.
    pub fn resize_columns(&mut self, new_len: usize) -> EditorResult<bool> {
        if new_len < 1 {
            return Err(EditorError::invalid_dimension("columns", new_len));
        }
        if new_len == self.columns {
            return Ok(false);
        }

        for row in &mut self.rows {
            row.resize(new_len, Cell::placeholder(0));
        }
        log::debug!("grid resized: {} -> {} columns", self.columns, new_len);
        self.columns = new_len;
        self.reflow();
        Ok(true)
    }

    /// Add or remove rows at one edge until there are `new_rows`
    ///
    /// Removed rows are discarded; added rows are placeholder-filled.
    pub fn change_tuning(&mut self, new_rows: usize, edge: RowEdge) -> EditorResult<bool> {
        if new_rows < 1 {
            return Err(EditorError::invalid_dimension("rows", new_rows));
        }
        let current = self.rows.len();
        if new_rows == current {
            return Ok(false);
        }

        let columns = self.columns;
        let blank_row = || vec![Cell::placeholder(0); columns];

        if new_rows > current {
            let added = new_rows - current;
            match edge {
                RowEdge::High => self.rows.extend((0..added).map(|_| blank_row())),
                RowEdge::Low => {
                    self.rows.splice(0..0, (0..added).map(|_| blank_row()));
                }
            }
        } else {
            let removed = current - new_rows;
            match edge {
                RowEdge::High => self.rows.truncate(new_rows),
                RowEdge::Low => {
                    self.rows.drain(0..removed);
                }
            }
        }

        log::debug!("grid rows changed: {} -> {} ({:?})", current, new_rows, edge);
        self.reflow();
        Ok(true)
    }

    fn reflow(&mut self) {
        let columns = self.columns;
        for (y, row) in self.rows.iter_mut().enumerate() {
            for (x, cell) in row.iter_mut().enumerate() {
                cell.index = y * columns + x;
            }
        }
        self.clamp_cursor();
        self.render();
    }

    fn clamp_cursor(&mut self) {
        let max_x = self.columns - 1;
        let max_y = self.rows.len() - 1;
        for pos in [&mut self.cursor.active, &mut self.cursor.last_clicked] {
            pos.x = pos.x.min(max_x);
            pos.y = pos.y.min(max_y);
        }
    }

    fn render(&mut self) {
        let mut text = String::with_capacity(self.rows.len() * (self.columns + 1));
        for (i, row) in self.rows.iter().rev().enumerate() {
            if i > 0 {
                text.push('\n');
            }
            text.extend(row.iter().map(|cell| cell.value));
        }
        self.text = text;
    }

    /// Rendered grid text, top line (highest row) first
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Newline-joined grid text, top line (highest row) first
    pub fn serialize(&self) -> String {
        self.text.clone()
    }

    /// Concatenated values of one row
    pub fn row_text(&self, y: usize) -> Option<String> {
        self.rows
            .get(y)
            .map(|row| row.iter().map(|cell| cell.value).collect())
    }

    // ------------------------------------------------------------------
    // Cursor
    // ------------------------------------------------------------------

    /// Focus the grid on a clicked cell
    ///
    /// Clicking the same cell twice in a row flips the input direction.
    pub fn click(&mut self, x: usize, y: usize) -> EditorResult<()> {
        self.check_bounds(x, y)?;
        let pos = GridPos::new(x, y);
        if self.cursor.focus && pos == self.cursor.last_clicked {
            self.cursor.direction = self.cursor.direction.toggled();
        }
        self.cursor.active = pos;
        self.cursor.last_clicked = pos;
        self.cursor.focus = true;
        Ok(())
    }

    pub fn focus(&mut self) {
        self.cursor.focus = true;
    }

    pub fn blur(&mut self) {
        self.cursor.focus = false;
    }

    pub fn has_focus(&self) -> bool {
        self.cursor.focus
    }

    pub fn active(&self) -> GridPos {
        self.cursor.active
    }

    pub fn set_active(&mut self, x: usize, y: usize) -> EditorResult<()> {
        self.check_bounds(x, y)?;
        self.cursor.active = GridPos::new(x, y);
        Ok(())
    }

    pub fn direction(&self) -> Direction {
        self.cursor.direction
    }

    pub fn set_direction(&mut self, direction: Direction) {
        self.cursor.direction = direction;
    }

    pub fn toggle_direction(&mut self) {
        self.cursor.direction = self.cursor.direction.toggled();
    }

    /// Move the cursor one cell forward along the input direction
    ///
    /// Horizontal: next column, carrying into the next row (row index
    /// saturates at the last row). Vertical: next lower row index, carrying
    /// into the top row of the next column (column saturates at the last
    /// column).
    pub fn advance_pointer(&mut self) -> GridPos {
        let GridPos { x, y } = self.cursor.active;
        let last_x = self.columns - 1;
        let last_y = self.rows.len() - 1;

        self.cursor.active = match self.cursor.direction {
            Direction::Horizontal if x < last_x => GridPos::new(x + 1, y),
            Direction::Horizontal => GridPos::new(0, (y + 1).min(last_y)),
            Direction::Vertical if y > 0 => GridPos::new(x, y - 1),
            Direction::Vertical => GridPos::new((x + 1).min(last_x), last_y),
        };
        self.cursor.active
    }

    /// Exact inverse of `advance_pointer`
    pub fn retreat_pointer(&mut self) -> GridPos {
        let GridPos { x, y } = self.cursor.active;
        let last_x = self.columns - 1;
        let last_y = self.rows.len() - 1;

        self.cursor.active = match self.cursor.direction {
            Direction::Horizontal if x > 0 => GridPos::new(x - 1, y),
            Direction::Horizontal => GridPos::new(last_x, y.saturating_sub(1)),
            Direction::Vertical if y < last_y => GridPos::new(x, y + 1),
            Direction::Vertical => GridPos::new(x.saturating_sub(1), 0),
        };
        self.cursor.active
    }

    /// Move one cell along the input direction, wrapping inside the current
    /// row or column without carrying
    pub fn step_within_line(&mut self, forward: bool) -> GridPos {
        let GridPos { x, y } = self.cursor.active;
        let columns = self.columns;
        let rows = self.rows.len();

        self.cursor.active = match (self.cursor.direction, forward) {
            (Direction::Horizontal, true) => GridPos::new((x + 1) % columns, y),
            (Direction::Horizontal, false) => GridPos::new((x + columns - 1) % columns, y),
            (Direction::Vertical, true) => GridPos::new(x, (y + rows - 1) % rows),
            (Direction::Vertical, false) => GridPos::new(x, (y + 1) % rows),
        };
        self.cursor.active
    }

    /// Write at the cursor
    pub fn set_active_cell(&mut self, value: char) -> EditorResult<()> {
        let GridPos { x, y } = self.cursor.active;
        self.set_cell(x, y, value)
    }

    /// Check that every row has `columns` cells and every index is row-major
    pub fn validate(&self) -> bool {
        self.rows.iter().enumerate().all(|(y, row)| {
            row.len() == self.columns
                && row
                    .iter()
                    .enumerate()
                    .all(|(x, cell)| cell.index == y * self.columns + x)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grid(columns: usize, rows: usize) -> Grid {
        Grid::new(columns, rows, CellSource::Empty).unwrap()
    }

    #[test]
    fn test_new_rejects_zero_dimensions() {
        assert!(matches!(
            Grid::new(0, 6, CellSource::Empty),
            Err(EditorError::InvalidDimension { what: "columns", .. })
        ));
        assert!(matches!(
            Grid::new(4, 0, CellSource::Empty),
            Err(EditorError::InvalidDimension { what: "rows", .. })
        ));
    }

    #[test]
    fn test_new_grid_is_placeholders_with_row_major_indexes() {
        let g = grid(4, 3);
        assert_eq!(g.row_count(), 3);
        assert_eq!(g.columns(), 4);
        assert!(g.validate());
        assert_eq!(g.cell(3, 2).unwrap().index, 11);
        assert!(g.rows().iter().flatten().all(Cell::is_placeholder));
        assert_eq!(g.text(), "----\n----\n----");
    }

    #[test]
    fn test_clone_source_copies_by_position() {
        let source = vec![vec!['1', '2', '3'], vec!['4']];
        let g = Grid::new(2, 3, CellSource::Clone(source)).unwrap();

        assert_eq!(g.row_text(0).unwrap(), "12");
        assert_eq!(g.row_text(1).unwrap(), "4-");
        assert_eq!(g.row_text(2).unwrap(), "--");
        assert!(g.validate());
    }

    #[test]
    fn test_set_cell_rerenders_immediately() {
        let mut g = grid(3, 2);
        g.set_cell(0, 0, '3').unwrap();
        // Row 0 is the bottom line
        assert_eq!(g.text(), "---\n3--");
        g.set_cell(2, 1, 'h').unwrap();
        assert_eq!(g.serialize(), "--h\n3--");
    }

    #[test]
    fn test_set_cell_rejects_out_of_range_and_bad_values() {
        let mut g = grid(3, 2);
        assert!(matches!(
            g.set_cell(3, 0, '1'),
            Err(EditorError::OutOfRangeCell { x: 3, y: 0, .. })
        ));
        assert_eq!(g.set_cell(0, 0, '|'), Err(EditorError::InvalidCellValue('|')));
        assert_eq!(g.set_cell(0, 0, ' '), Err(EditorError::InvalidCellValue(' ')));
        assert_eq!(g.text(), "---\n---");
    }

    #[test]
    fn test_resize_shrink_then_grow_restores_surviving_cells() {
        let mut g = grid(5, 2);
        for x in 0..5 {
            g.set_cell(x, 0, char::from_digit(x as u32, 10).unwrap()).unwrap();
        }

        assert!(g.resize_columns(3).unwrap());
        assert_eq!(g.row_text(0).unwrap(), "012");
        assert!(g.validate());

        assert!(g.resize_columns(5).unwrap());
        assert_eq!(g.row_text(0).unwrap(), "012--");
        assert_eq!(g.row_text(1).unwrap(), "-----");
        assert!(g.validate());
    }

    #[test]
    fn test_resize_is_idempotent() {
        let mut g = grid(5, 2);
        assert!(g.resize_columns(8).unwrap());
        let once = g.clone();
        assert!(!g.resize_columns(8).unwrap());
        assert_eq!(g, once);
    }

    #[test]
    fn test_resize_rejects_zero_and_clamps_cursor() {
        let mut g = grid(5, 2);
        g.click(4, 1).unwrap();
        assert!(g.resize_columns(0).is_err());
        assert_eq!(g.columns(), 5);

        g.resize_columns(2).unwrap();
        assert_eq!(g.active(), GridPos::new(1, 1));
    }

    #[test]
    fn test_change_tuning_high_edge_keeps_row_indexes() {
        let mut g = grid(2, 3);
        g.set_cell(0, 0, 'a').unwrap();
        g.set_cell(0, 2, 'c').unwrap();

        g.change_tuning(4, RowEdge::High).unwrap();
        assert_eq!(g.row_count(), 4);
        assert_eq!(g.value(0, 0), Some('a'));
        assert_eq!(g.value(0, 2), Some('c'));
        assert_eq!(g.row_text(3).unwrap(), "--");
        assert!(g.validate());
    }

    #[test]
    fn test_change_tuning_low_edge_shifts_rows_up() {
        let mut g = grid(2, 3);
        g.set_cell(0, 0, 'a').unwrap();

        g.change_tuning(5, RowEdge::Low).unwrap();
        assert_eq!(g.row_count(), 5);
        assert_eq!(g.value(0, 2), Some('a'));
        assert_eq!(g.row_text(0).unwrap(), "--");

        g.change_tuning(3, RowEdge::Low).unwrap();
        assert_eq!(g.value(0, 0), Some('a'));
        assert!(g.validate());
    }

    #[test]
    fn test_change_tuning_shrink_high_discards_top_rows() {
        let mut g = grid(2, 3);
        g.set_cell(1, 2, 'x').unwrap();
        g.click(0, 2).unwrap();

        g.change_tuning(2, RowEdge::High).unwrap();
        assert_eq!(g.values(), vec![vec!['-', '-'], vec!['-', '-']]);
        assert_eq!(g.active(), GridPos::new(0, 1));
    }

    #[test]
    fn test_horizontal_advance_wraps_to_next_row() {
        let mut g = grid(3, 2);
        g.set_direction(Direction::Horizontal);
        g.set_active(2, 0).unwrap();
        assert_eq!(g.advance_pointer(), GridPos::new(0, 1));
        assert_eq!(g.retreat_pointer(), GridPos::new(2, 0));
    }

    #[test]
    fn test_vertical_advance_wraps_to_top_of_next_column() {
        let mut g = grid(3, 2);
        g.set_direction(Direction::Vertical);
        g.set_active(0, 1).unwrap();
        assert_eq!(g.advance_pointer(), GridPos::new(0, 0));
        assert_eq!(g.advance_pointer(), GridPos::new(1, 1));
        assert_eq!(g.retreat_pointer(), GridPos::new(0, 0));
    }

    #[test]
    fn test_carry_saturates_at_grid_edge() {
        let mut g = grid(3, 2);
        g.set_direction(Direction::Vertical);
        g.set_active(2, 0).unwrap();
        assert_eq!(g.advance_pointer(), GridPos::new(2, 1));

        g.set_direction(Direction::Horizontal);
        g.set_active(2, 1).unwrap();
        assert_eq!(g.advance_pointer(), GridPos::new(0, 1));

        g.set_active(0, 0).unwrap();
        assert_eq!(g.retreat_pointer(), GridPos::new(2, 0));
    }

    #[test]
    fn test_step_within_line_does_not_carry() {
        let mut g = grid(3, 2);
        g.set_active(2, 0).unwrap();
        assert_eq!(g.step_within_line(true), GridPos::new(0, 0));
        assert_eq!(g.step_within_line(false), GridPos::new(2, 0));

        g.set_direction(Direction::Vertical);
        g.set_active(1, 0).unwrap();
        assert_eq!(g.step_within_line(true), GridPos::new(1, 1));
        assert_eq!(g.step_within_line(false), GridPos::new(1, 0));
    }

    #[test]
    fn test_double_click_toggles_direction() {
        let mut g = grid(3, 2);
        g.click(1, 1).unwrap();
        assert_eq!(g.direction(), Direction::Horizontal);
        g.click(1, 1).unwrap();
        assert_eq!(g.direction(), Direction::Vertical);
        g.click(0, 1).unwrap();
        assert_eq!(g.direction(), Direction::Vertical);

        g.blur();
        g.click(0, 1).unwrap();
        assert_eq!(g.direction(), Direction::Vertical);
        assert!(g.has_focus());
    }
}
