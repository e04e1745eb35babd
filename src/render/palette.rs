//! Overlay colors.

/// Grid line stroke.
pub const GRID_LINE: &str = "#3b82f6";
/// Grid line being dragged.
pub const GRID_LINE_ACTIVE: &str = "#10b981";

/// Selected cell border.
pub const SELECTED_BORDER: &str = "#ef4444";
/// Selected cell fill.
pub const SELECTED_FILL: &str = "rgba(239, 68, 68, 0.3)";

/// Linked cell border.
pub const LINKED_BORDER: &str = "#f59e0b";
/// Linked cell fill.
pub const LINKED_FILL: &str = "rgba(245, 158, 11, 0.1)";

/// Deleted footprint shading.
pub const DELETED_FILL: &str = "rgba(100, 100, 100, 0.15)";

/// Drag-selection rectangle stroke.
pub const DRAG_BORDER: &str = "#4299e1";
/// Drag-selection rectangle fill.
pub const DRAG_FILL: &str = "rgba(66, 153, 225, 0.3)";

/// Cell label badge background.
pub const LABEL_BG: &str = "rgba(0, 0, 0, 0.7)";
/// Cell label text.
pub const LABEL_FG: &str = "#ffffff";
