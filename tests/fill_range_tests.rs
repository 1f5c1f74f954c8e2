//! Parameterized tests pinning the committed-range conventions for both
//! fill topologies and both drag directions.

#[allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::panic
)]
mod tests {
    use test_case::test_case;

    use gridview::fill::{column_only_range, fill_to_end_range, rectangular_range};
    use gridview::types::Position;

    // (source row, hovered row) -> committed inclusive row bounds.
    // Source always excluded, hover always included, both directions.
    #[test_case(0, 3 => Some((1, 3)) ; "downward")]
    #[test_case(0, 1 => Some((1, 1)) ; "downward by one")]
    #[test_case(5, 2 => Some((2, 4)) ; "upward")]
    #[test_case(5, 4 => Some((4, 4)) ; "upward by one")]
    #[test_case(4, 4 => None ; "no row movement")]
    fn column_only_rows(source_row: usize, hovered_row: usize) -> Option<(usize, usize)> {
        column_only_range(Position::new(source_row, 2), hovered_row)
            .map(|range| (range.start_row, range.end_row))
    }

    #[test]
    fn test_column_only_stays_in_the_source_column() {
        let range = column_only_range(Position::new(0, 7), 4).unwrap();
        assert_eq!((range.start_col, range.end_col), (7, 7));
    }

    // (source, hover) -> (rows, cols) of the committed rectangle.
    #[test_case((1, 2), (5, 4) => ((1, 5), (2, 2)) ; "rows moved collapses columns")]
    #[test_case((5, 2), (1, 0) => ((1, 5), (2, 2)) ; "upward rows also collapse columns")]
    #[test_case((3, 1), (3, 4) => ((3, 3), (1, 4)) ; "same row spans columns")]
    #[test_case((3, 4), (3, 1) => ((3, 3), (1, 4)) ; "leftward same row")]
    #[test_case((2, 2), (2, 2) => ((2, 2), (2, 2)) ; "no movement is the single source cell")]
    fn rectangular(
        source: (usize, usize),
        hover: (usize, usize),
    ) -> ((usize, usize), (usize, usize)) {
        let range = rectangular_range(
            Position::new(source.0, source.1),
            Position::new(hover.0, hover.1),
        );
        (
            (range.start_row, range.end_row),
            (range.start_col, range.end_col),
        )
    }

    // (source row, row count) -> committed inclusive row bounds.
    #[test_case(0, 5 => Some((1, 4)) ; "from first row")]
    #[test_case(3, 5 => Some((4, 4)) ; "from second to last row")]
    #[test_case(4, 5 => None ; "from last row")]
    #[test_case(0, 0 => None ; "empty collection")]
    fn fill_down_to_end(source_row: usize, row_count: usize) -> Option<(usize, usize)> {
        fill_to_end_range(Position::new(source_row, 0), row_count)
            .map(|range| (range.start_row, range.end_row))
    }
}
