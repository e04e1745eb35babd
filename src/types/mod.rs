//! Core data types shared across the crate.

mod cell;
mod link;
mod selection;

pub use cell::Cell;
pub use link::{is_valid_link_url, CellLink};
pub use selection::{DragLine, DragSelection, LineAxis};
