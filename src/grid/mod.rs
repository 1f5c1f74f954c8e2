//! Cell/row rendering contracts and the roving focus controller.

pub mod cell;
pub mod focus;
pub mod row;

pub use cell::{cell_spec, CellProps, CellSpec};
pub use focus::{FocusState, RovingFocus};
pub use row::{plan_row, row_class_name, CellSlot, SlotKind};
