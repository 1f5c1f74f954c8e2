//! Fill-handle drag engine.
//!
//! Range geometry and the gesture/commit state machine are pure and test
//! natively; the DOM handle and its window-listener plumbing are wasm32
//! only.

pub mod engine;
#[cfg(target_arch = "wasm32")]
pub(crate) mod handle;
pub mod range;

pub use engine::{FillEngine, PRIMARY_BUTTON};
pub use range::{column_only_range, committed_range, fill_to_end_range, rectangular_range};
