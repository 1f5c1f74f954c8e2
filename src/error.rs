//! Structured error types for gridview.
//!
//! Interaction-level failures (out-of-range positions, gestures with no
//! recorded hover) are deliberately *not* errors; they are silent no-ops
//! per the grid's contract. The variants here cover the fallible edges:
//! DOM node construction and host-supplied configuration.

/// All errors that can occur while building or configuring the grid.
#[derive(Debug, thiserror::Error)]
pub enum GridError {
    /// A required DOM node could not be created or attached.
    #[error("DOM error: {0}")]
    Dom(String),

    /// Invalid column configuration (duplicate keys, bad span, ...).
    #[error("Invalid column config: {0}")]
    Column(String),

    /// A JS-supplied payload (columns, rows) failed to deserialize.
    #[error("Deserialization error: {0}")]
    Deserialize(String),

    /// Catch-all for string errors.
    #[error("{0}")]
    Other(String),
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, GridError>;

impl From<String> for GridError {
    fn from(s: String) -> Self {
        Self::Other(s)
    }
}

impl From<&str> for GridError {
    fn from(s: &str) -> Self {
        Self::Other(s.to_string())
    }
}

#[cfg(target_arch = "wasm32")]
impl From<GridError> for wasm_bindgen::JsValue {
    fn from(e: GridError) -> Self {
        wasm_bindgen::JsValue::from_str(&e.to_string())
    }
}
