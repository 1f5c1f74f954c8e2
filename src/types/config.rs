//! Grid-level configuration.

/// Topology of a fill drag.
///
/// Both modes share the same gesture lifecycle (start, hover, release,
/// teardown); only the committed-range computation differs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FillMode {
    /// Drag may cross rows or columns; the committed range is the
    /// bounding rectangle collapsed to whichever axis moved.
    #[default]
    Rectangular,
    /// Drag is constrained to the source column; only the row span
    /// between source and hover commits.
    ColumnOnly,
}

/// Configuration for the interaction core.
#[derive(Debug, Clone)]
pub struct GridConfig {
    pub fill_mode: FillMode,
    /// Whether double-clicking the fill handle fills down to the last row.
    pub double_click_fill: bool,
    /// Prefix for every CSS class the renderers emit (`{prefix}-cell`,
    /// `{prefix}-row-even`, ...). Hosts theme against these.
    pub class_prefix: String,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            fill_mode: FillMode::default(),
            double_click_fill: true,
            class_prefix: "gv".to_string(),
        }
    }
}

impl GridConfig {
    /// `{prefix}-{suffix}`, e.g. `gv-cell-copied`.
    pub fn class(&self, suffix: &str) -> String {
        format!("{}-{}", self.class_prefix, suffix)
    }
}
