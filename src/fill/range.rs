//! Committed-range computation for fill gestures.
//!
//! Pure geometry, kept free of DOM types so it tests natively. The
//! gesture lifecycle lives in [`super::engine`]; this module only answers
//! "given where the drag started and where it ended, which cells commit".

use crate::types::{FillMode, Position, SelectedRange};

/// Rectangular fill: bounding rectangle between source and hover,
/// collapsed to one axis.
///
/// A single gesture commits to either a vertical or a horizontal fill:
/// if the pointer crossed rows the column range collapses to the source
/// column; otherwise the row range collapses to the source row and the
/// fill spans columns. The source cell stays inside the returned range
/// and is skipped at commit time.
pub fn rectangular_range(source: Position, hovered: Position) -> SelectedRange {
    let crossed_rows = hovered.row_idx != source.row_idx;

    let (row_a, row_b) = if crossed_rows {
        (source.row_idx, hovered.row_idx)
    } else {
        (source.row_idx, source.row_idx)
    };

    let (col_a, col_b) = if crossed_rows {
        (source.idx, source.idx)
    } else {
        (source.idx, hovered.idx)
    };

    SelectedRange::new(row_a, row_b, col_a, col_b)
}

/// Column-only fill: the row span between source and hover, in the
/// source column.
///
/// Convention (identical for both directions): the source row is always
/// excluded, the hovered row always included, every intermediate row
/// covered exactly once. Returns `None` when the hover never left the
/// source row.
pub fn column_only_range(source: Position, hovered_row: usize) -> Option<SelectedRange> {
    let src = source.row_idx;
    if hovered_row == src {
        return None;
    }
    let (start, end) = if hovered_row > src {
        (src + 1, hovered_row)
    } else {
        (hovered_row, src - 1)
    };
    Some(SelectedRange::new(start, end, source.idx, source.idx))
}

/// Double-click shortcut: from the row after the source to the last row,
/// in the source column. `None` when the source is already the last row
/// or out of range.
pub fn fill_to_end_range(source: Position, row_count: usize) -> Option<SelectedRange> {
    if row_count == 0 || source.row_idx + 1 >= row_count {
        return None;
    }
    Some(SelectedRange::new(
        source.row_idx + 1,
        row_count - 1,
        source.idx,
        source.idx,
    ))
}

/// Dispatch on the configured topology. `None` means the gesture commits
/// nothing.
pub fn committed_range(
    mode: FillMode,
    source: Position,
    hovered: Position,
) -> Option<SelectedRange> {
    match mode {
        FillMode::Rectangular => Some(rectangular_range(source, hovered)),
        FillMode::ColumnOnly => column_only_range(source, hovered.row_idx),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
mod tests {
    use super::*;

    #[test]
    fn test_rectangular_row_dominant() {
        // Pointer crossed rows: column range collapses to the source column.
        let range = rectangular_range(Position::new(1, 2), Position::new(5, 4));
        assert_eq!(range, SelectedRange::new(1, 5, 2, 2));
    }

    #[test]
    fn test_rectangular_same_row_spans_columns() {
        let range = rectangular_range(Position::new(3, 4), Position::new(3, 1));
        assert_eq!(range, SelectedRange::new(3, 3, 1, 4));
    }

    #[test]
    fn test_rectangular_upward() {
        let range = rectangular_range(Position::new(6, 0), Position::new(2, 0));
        assert_eq!(range, SelectedRange::new(2, 6, 0, 0));
    }

    #[test]
    fn test_column_only_downward_excludes_source() {
        let range = column_only_range(Position::new(0, 3), 3).unwrap();
        assert_eq!(range, SelectedRange::new(1, 3, 3, 3));
    }

    #[test]
    fn test_column_only_upward_excludes_source() {
        // Chosen convention: source excluded, hover included, same as downward.
        let range = column_only_range(Position::new(5, 2), 2).unwrap();
        assert_eq!(range, SelectedRange::new(2, 4, 2, 2));
    }

    #[test]
    fn test_column_only_same_row_is_noop() {
        assert_eq!(column_only_range(Position::new(4, 1), 4), None);
    }

    #[test]
    fn test_fill_to_end() {
        let range = fill_to_end_range(Position::new(1, 0), 5).unwrap();
        assert_eq!(range, SelectedRange::new(2, 4, 0, 0));
    }

    #[test]
    fn test_fill_to_end_from_last_row_is_noop() {
        assert_eq!(fill_to_end_range(Position::new(4, 0), 5), None);
        assert_eq!(fill_to_end_range(Position::new(0, 0), 0), None);
    }
}
