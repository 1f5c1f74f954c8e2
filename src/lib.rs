//! gridview - data-grid interaction core for the web
//!
//! Selection, roving focus, and fill-handle drags for a virtualized
//! grid widget, in the browser via WebAssembly:
//! - Cell/row rendering contract with ARIA semantics and column spanning
//! - Exactly one keyboard tab stop across the whole grid
//! - Rectangular and column-only fill drags with copy-on-write commits
//! - Pure interaction logic, natively testable; DOM layer wasm32 only
//!
//! # Usage (JavaScript)
//!
//! ```javascript
//! import init, { DataGrid } from 'gridview';
//! await init();
//! const grid = new DataGrid(container, { columnOnlyFill: false });
//! grid.setColumns([{ key: 'x', editable: true }]);
//! grid.setRows(rows);
//! grid.setRenderCallback(() => requestAnimationFrame(() => grid.render()));
//! grid.render();
//! ```

// Interaction core (platform-independent)
pub mod error;
pub mod fill;
pub mod grid;
pub mod types;

// DOM layer (wasm32)
#[cfg(target_arch = "wasm32")]
pub mod view;

use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
pub use view::DataGrid;

pub use error::{GridError, Result};
pub use fill::FillEngine;
pub use grid::{CellSpec, RovingFocus};
pub use types::*;

/// Get the library version
#[must_use]
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}
