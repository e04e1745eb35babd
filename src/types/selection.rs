//! Selection and drag-gesture state.

use serde::{Deserialize, Serialize};

/// An in-progress rectangular drag selection in image coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DragSelection {
    pub start_x: f64,
    pub start_y: f64,
    pub current_x: f64,
    pub current_y: f64,
}

impl DragSelection {
    /// Start a drag at a point (zero-size rectangle).
    #[must_use]
    pub fn begin(x: f64, y: f64) -> Self {
        DragSelection {
            start_x: x,
            start_y: y,
            current_x: x,
            current_y: y,
        }
    }

    /// Normalized bounds `(x1, y1, x2, y2)` with `x1 <= x2`, `y1 <= y2`.
    #[must_use]
    pub fn bounds(&self) -> (f64, f64, f64, f64) {
        (
            self.start_x.min(self.current_x),
            self.start_y.min(self.current_y),
            self.start_x.max(self.current_x),
            self.start_y.max(self.current_y),
        )
    }
}

/// Which axis a grid line cuts across.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum LineAxis {
    /// A horizontal line (partitions rows), positioned by its y value.
    Horizontal,
    /// A vertical line (partitions columns), positioned by its x value.
    Vertical,
}

/// An in-progress grid-line drag.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DragLine {
    pub axis: LineAxis,
    /// Index into the document's line vector for that axis.
    pub index: usize,
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::float_cmp, clippy::panic)]
mod tests {
    use super::*;

    #[test]
    fn bounds_normalize_inverted_drag() {
        let mut drag = DragSelection::begin(100.0, 80.0);
        drag.current_x = 20.0;
        drag.current_y = 10.0;
        assert_eq!(drag.bounds(), (20.0, 10.0, 100.0, 80.0));
    }
}
