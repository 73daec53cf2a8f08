//! Keyboard handling for stave grids and articulation rows

use serde::{Deserialize, Serialize};

use crate::models::stave::{is_articulation_char, Articulation, ARTICULATION_BLANK};
use crate::models::{Direction, EditorResult, Grid};

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub enum Key {
    ArrowLeft,
    ArrowRight,
    ArrowUp,
    ArrowDown,
    Backspace,
    Space,
    Escape,
    Char(char),
}

impl Key {
    /// Map a DOM `KeyboardEvent.key` value
    pub fn from_dom(key: &str) -> Option<Key> {
        match key {
            "ArrowLeft" => Some(Key::ArrowLeft),
            "ArrowRight" => Some(Key::ArrowRight),
            "ArrowUp" => Some(Key::ArrowUp),
            "ArrowDown" => Some(Key::ArrowDown),
            "Backspace" => Some(Key::Backspace),
            "Escape" => Some(Key::Escape),
            " " | "Spacebar" => Some(Key::Space),
            _ => {
                let mut chars = key.chars();
                match (chars.next(), chars.next()) {
                    (Some(c), None) => Some(Key::Char(c)),
                    _ => None,
                }
            }
        }
    }
}

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub struct KeyEvent {
    pub key: Key,
    #[serde(default)]
    pub alt: bool,
}

impl KeyEvent {
    pub fn new(key: Key) -> Self {
        Self { key, alt: false }
    }

    pub fn with_alt(key: Key) -> Self {
        Self { key, alt: true }
    }
}

/// What a key press did
#[derive(Serialize, Clone, Copy, Debug, Default, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct KeyOutcome {
    /// The key was consumed (the host should suppress its default action)
    pub handled: bool,

    /// Cell contents changed
    pub changed: bool,

    /// The focused element gives up focus
    pub release_focus: bool,
}

impl KeyOutcome {
    fn moved() -> Self {
        Self {
            handled: true,
            ..Self::default()
        }
    }

    fn edited() -> Self {
        Self {
            handled: true,
            changed: true,
            release_focus: false,
        }
    }

    fn escape() -> Self {
        Self {
            handled: true,
            changed: false,
            release_focus: true,
        }
    }
}

/// Characters accepted as tab-grid input
pub fn is_grid_entry_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, '/' | '~' | '-')
}

/// Move along `axis`; with `within_line` the move wraps inside the current
/// row or column and the input direction is left untouched.
fn traverse(grid: &mut Grid, axis: Direction, forward: bool, within_line: bool) {
    if within_line {
        let saved = grid.direction();
        grid.set_direction(axis);
        grid.step_within_line(forward);
        grid.set_direction(saved);
    } else {
        grid.set_direction(axis);
        if forward {
            grid.advance_pointer();
        } else {
            grid.retreat_pointer();
        }
    }
}

fn step(grid: &mut Grid, forward: bool, within_line: bool) {
    let direction = grid.direction();
    traverse(grid, direction, forward, within_line);
}

pub fn handle_grid_key(grid: &mut Grid, event: KeyEvent) -> EditorResult<KeyOutcome> {
    let alt = event.alt;
    let outcome = match event.key {
        Key::ArrowRight => {
            traverse(grid, Direction::Horizontal, true, alt);
            KeyOutcome::moved()
        }
        Key::ArrowLeft => {
            traverse(grid, Direction::Horizontal, false, alt);
            KeyOutcome::moved()
        }
        // Row 0 is the bottom line, so "down" advances towards it
        Key::ArrowDown => {
            traverse(grid, Direction::Vertical, true, alt);
            KeyOutcome::moved()
        }
        Key::ArrowUp => {
            traverse(grid, Direction::Vertical, false, alt);
            KeyOutcome::moved()
        }
        Key::Backspace => {
            let pos = grid.active();
            grid.clear_cell(pos.x, pos.y)?;
            step(grid, false, alt);
            KeyOutcome::edited()
        }
        Key::Space => {
            grid.toggle_direction();
            KeyOutcome::moved()
        }
        Key::Escape => KeyOutcome::escape(),
        Key::Char(c) if is_grid_entry_char(c) => {
            grid.set_active_cell(c)?;
            if !alt {
                step(grid, true, false);
            }
            KeyOutcome::edited()
        }
        Key::Char(_) => KeyOutcome::default(),
    };
    Ok(outcome)
}

pub fn handle_articulation_key(
    articulation: &mut Articulation,
    event: KeyEvent,
) -> EditorResult<KeyOutcome> {
    let outcome = match event.key {
        Key::ArrowLeft => {
            articulation.move_left();
            KeyOutcome::moved()
        }
        Key::ArrowRight => {
            articulation.move_right();
            KeyOutcome::moved()
        }
        Key::Backspace => {
            articulation.backspace()?;
            KeyOutcome::edited()
        }
        Key::Space => {
            articulation.type_char(ARTICULATION_BLANK)?;
            KeyOutcome::edited()
        }
        Key::Escape => KeyOutcome::escape(),
        Key::Char(c) if c.is_ascii_graphic() && is_articulation_char(c) => {
            articulation.type_char(c)?;
            KeyOutcome::edited()
        }
        Key::ArrowUp | Key::ArrowDown | Key::Char(_) => KeyOutcome::default(),
    };
    Ok(outcome)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{CellSource, GridPos};

    fn grid(columns: usize, rows: usize) -> Grid {
        let mut g = Grid::new(columns, rows, CellSource::Empty).unwrap();
        g.click(0, 0).unwrap();
        g
    }

    fn press(g: &mut Grid, key: Key) -> KeyOutcome {
        handle_grid_key(g, KeyEvent::new(key)).unwrap()
    }

    #[test]
    fn test_from_dom() {
        assert_eq!(Key::from_dom("ArrowUp"), Some(Key::ArrowUp));
        assert_eq!(Key::from_dom(" "), Some(Key::Space));
        assert_eq!(Key::from_dom("7"), Some(Key::Char('7')));
        assert_eq!(Key::from_dom("Shift"), None);
    }

    #[test]
    fn test_typing_writes_and_advances() {
        let mut g = grid(3, 2);
        let outcome = press(&mut g, Key::Char('1'));
        assert!(outcome.changed);
        press(&mut g, Key::Char('2'));
        assert_eq!(g.row_text(0).unwrap(), "12-");
        assert_eq!(g.active(), GridPos::new(2, 0));
    }

    #[test]
    fn test_rejected_characters_are_not_handled() {
        let mut g = grid(3, 2);
        let outcome = press(&mut g, Key::Char('!'));
        assert!(!outcome.handled);
        assert_eq!(g.row_text(0).unwrap(), "---");
    }

    #[test]
    fn test_alt_typing_stays_put() {
        let mut g = grid(3, 2);
        handle_grid_key(&mut g, KeyEvent::with_alt(Key::Char('h'))).unwrap();
        assert_eq!(g.value(0, 0), Some('h'));
        assert_eq!(g.active(), GridPos::new(0, 0));
    }

    #[test]
    fn test_backspace_clears_then_retreats() {
        let mut g = grid(3, 2);
        press(&mut g, Key::Char('5'));
        press(&mut g, Key::ArrowLeft);
        assert_eq!(g.active(), GridPos::new(0, 0));
        g.set_active(1, 0).unwrap();
        g.set_cell(1, 0, '7').unwrap();
        press(&mut g, Key::Backspace);
        assert_eq!(g.value(1, 0), Some('-'));
        assert_eq!(g.active(), GridPos::new(0, 0));
    }

    #[test]
    fn test_arrows_set_direction_unless_alt() {
        let mut g = grid(3, 2);
        press(&mut g, Key::ArrowUp);
        assert_eq!(g.direction(), Direction::Vertical);
        assert_eq!(g.active(), GridPos::new(0, 1));

        handle_grid_key(&mut g, KeyEvent::with_alt(Key::ArrowRight)).unwrap();
        assert_eq!(g.direction(), Direction::Vertical);
        assert_eq!(g.active(), GridPos::new(1, 1));
    }

    #[test]
    fn test_alt_arrow_wraps_within_row() {
        let mut g = grid(3, 2);
        g.set_active(2, 0).unwrap();
        handle_grid_key(&mut g, KeyEvent::with_alt(Key::ArrowRight)).unwrap();
        assert_eq!(g.active(), GridPos::new(0, 0));
    }

    #[test]
    fn test_space_toggles_and_escape_releases() {
        let mut g = grid(3, 2);
        press(&mut g, Key::Space);
        assert_eq!(g.direction(), Direction::Vertical);
        assert!(press(&mut g, Key::Escape).release_focus);
    }

    #[test]
    fn test_articulation_keys() {
        let mut a = Articulation::new(4, "");
        a.click(0).unwrap();
        for key in [Key::Char('P'), Key::Char('M'), Key::Space, Key::Char('x')] {
            handle_articulation_key(&mut a, KeyEvent::new(key)).unwrap();
        }
        assert_eq!(a.text(), "PM x");
        assert_eq!(a.cursor(), 3);

        // Bars are rejected
        let outcome = handle_articulation_key(&mut a, KeyEvent::new(Key::Char('|'))).unwrap();
        assert!(!outcome.handled);
        assert_eq!(a.text(), "PM x");

        handle_articulation_key(&mut a, KeyEvent::new(Key::Backspace)).unwrap();
        assert_eq!(a.text(), "PM  ");
        assert!(!handle_articulation_key(&mut a, KeyEvent::new(Key::ArrowUp))
            .unwrap()
            .handled);
    }
}
