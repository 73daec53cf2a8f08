//! Length/Resize controller
//!
//! A drag on a stave's resize handle maps the pointer position to a column
//! count. Changes are applied live; ending or cancelling the drag simply
//! drops the session.

use serde::{Deserialize, Serialize};

use crate::models::{EditorError, EditorResult};
use crate::workspace::ComponentId;

/// Pixel geometry captured when the drag starts
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ResizeGeometry {
    /// Left edge of the grid
    pub grid_left: f64,

    /// Width of one cell
    pub cell_width: f64,

    /// Right edge of the workspace; the pointer is clamped to it
    pub limit_right: f64,
}

#[derive(Clone, Debug, PartialEq)]
pub struct ResizeDrag {
    stave: ComponentId,
    start_columns: usize,
    current: usize,
    max_columns: usize,
    geometry: ResizeGeometry,
}

fn clamp_columns(raw: f64, max_columns: usize) -> usize {
    if !raw.is_finite() {
        return 1;
    }
    raw.trunc().clamp(1.0, max_columns.max(1) as f64) as usize
}

impl ResizeDrag {
    pub fn begin(
        stave: ComponentId,
        start_columns: usize,
        geometry: ResizeGeometry,
        max_columns: usize,
    ) -> EditorResult<Self> {
        if !(geometry.cell_width.is_finite() && geometry.cell_width > 0.0) {
            return Err(EditorError::invalid_dimension("cell width", 0));
        }
        if max_columns < 1 {
            return Err(EditorError::invalid_dimension("max columns", max_columns));
        }
        Ok(Self {
            stave,
            start_columns,
            current: start_columns,
            max_columns,
            geometry,
        })
    }

    pub fn stave(&self) -> ComponentId {
        self.stave
    }

    pub fn current(&self) -> usize {
        self.current
    }

    pub fn start_columns(&self) -> usize {
        self.start_columns
    }

    /// Column count for an absolute pointer position
    pub fn columns_at(&self, pointer_x: f64) -> usize {
        let g = &self.geometry;
        let x = pointer_x.min(g.limit_right);
        clamp_columns((x - g.grid_left) / g.cell_width, self.max_columns)
    }

    /// Column count for a pointer movement relative to the drag start
    pub fn columns_for_delta(&self, delta_px: f64) -> usize {
        let steps = (delta_px / self.geometry.cell_width).trunc();
        clamp_columns(self.start_columns as f64 + steps, self.max_columns)
    }

    /// Track the pointer; returns the new column count when it changed
    pub fn update(&mut self, pointer_x: f64) -> Option<usize> {
        let columns = self.columns_at(pointer_x);
        if columns == self.current {
            None
        } else {
            self.current = columns;
            Some(columns)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn drag() -> ResizeDrag {
        let geometry = ResizeGeometry {
            grid_left: 100.0,
            cell_width: 10.0,
            limit_right: 500.0,
        };
        ResizeDrag::begin(ComponentId(1), 24, geometry, 30).unwrap()
    }

    #[test]
    fn test_columns_at() {
        let d = drag();
        assert_eq!(d.columns_at(155.0), 5);
        assert_eq!(d.columns_at(159.9), 5);
        assert_eq!(d.columns_at(90.0), 1);
        assert_eq!(d.columns_at(10_000.0), 30);
    }

    #[test]
    fn test_columns_at_is_clamped_to_limit() {
        let geometry = ResizeGeometry {
            grid_left: 0.0,
            cell_width: 10.0,
            limit_right: 120.0,
        };
        let d = ResizeDrag::begin(ComponentId(1), 5, geometry, 70).unwrap();
        assert_eq!(d.columns_at(400.0), 12);
    }

    #[test]
    fn test_columns_for_delta() {
        let d = drag();
        assert_eq!(d.columns_for_delta(0.0), 24);
        assert_eq!(d.columns_for_delta(-35.0), 21);
        assert_eq!(d.columns_for_delta(-1000.0), 1);
        assert_eq!(d.columns_for_delta(1000.0), 30);
    }

    #[test]
    fn test_update_reports_changes_only() {
        let mut d = drag();
        assert_eq!(d.update(340.0), None);
        assert_eq!(d.update(350.0), Some(25));
        assert_eq!(d.update(351.0), None);
        assert_eq!(d.current(), 25);
    }

    #[test]
    fn test_begin_rejects_zero_cell_width() {
        let geometry = ResizeGeometry {
            grid_left: 0.0,
            cell_width: 0.0,
            limit_right: 10.0,
        };
        assert!(ResizeDrag::begin(ComponentId(1), 5, geometry, 70).is_err());
    }
}
