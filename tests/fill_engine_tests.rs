//! Tests for the fill-handle drag engine: gesture protocol, commit
//! semantics, and rows-changed notification.

#[allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::panic
)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use gridview::fill::{FillEngine, PRIMARY_BUTTON};
    use gridview::types::{
        Column, Editable, FillEvent, FillMode, Position, RowsChange,
    };

    #[derive(Debug, Clone, PartialEq, Eq)]
    struct Row {
        x: i64,
        y: i64,
    }

    fn rows(n: i64) -> Vec<Row> {
        (0..n).map(|i| Row { x: i * 10, y: i }).collect()
    }

    fn columns() -> Vec<Column<Row>> {
        vec![
            Column::new("x", 0).with_editable(Editable::Always),
            Column::new("y", 1).with_editable(Editable::Always),
        ]
    }

    /// Fill callback copying the source cell's value into the target
    /// cell, whatever columns those are.
    fn copy_field(event: FillEvent<'_, Row>) -> Row {
        let value = match event.source_column_key {
            "x" => event.source_row.x,
            _ => event.source_row.y,
        };
        let mut row = event.target_row;
        match event.target_column_key {
            "x" => row.x = value,
            "y" => row.y = value,
            _ => {}
        }
        row
    }

    type Notifications = Rc<RefCell<Vec<(Vec<Row>, RowsChange)>>>;

    /// Engine wired to collect notifications and drag-end counts.
    fn harness(
        mode: FillMode,
        editable: impl Fn(Position) -> bool + 'static,
    ) -> (FillEngine<Row>, Notifications, Rc<RefCell<usize>>) {
        let notifications: Notifications = Rc::new(RefCell::new(Vec::new()));
        let drag_ends = Rc::new(RefCell::new(0));

        let sink = Rc::clone(&notifications);
        let ends = Rc::clone(&drag_ends);
        let engine = FillEngine::new(mode, Box::new(editable), Box::new(copy_field))
            .on_rows_change(Box::new(move |updated, change| {
                sink.borrow_mut().push((updated, change));
            }))
            .on_drag_end(Box::new(move || {
                *ends.borrow_mut() += 1;
            }));
        (engine, notifications, drag_ends)
    }

    fn drag(
        engine: &mut FillEngine<Row>,
        rows: &[Row],
        columns: &[Column<Row>],
        source: Position,
        hovers: &[Position],
    ) {
        assert!(engine.begin_drag(PRIMARY_BUTTON));
        for hover in hovers {
            engine.drag_over(*hover);
        }
        engine.release(rows, columns, source);
    }

    // ================================================================
    // Commit semantics
    // ================================================================

    #[test]
    fn test_five_row_copy_scenario() {
        // Select (0, "x"), drag to (3, "x"): rows 1-3 take row 0's x,
        // rows 0 and 4 stay untouched, changed set is {1, 2, 3}.
        let rows = rows(5);
        let cols = columns();
        let (mut engine, notifications, _) = harness(FillMode::Rectangular, |_| true);

        drag(
            &mut engine,
            &rows,
            &cols,
            Position::new(0, 0),
            &[Position::new(3, 0)],
        );

        let log = notifications.borrow();
        assert_eq!(log.len(), 1);
        let (updated, change) = &log[0];
        assert_eq!(change.indexes, vec![1, 2, 3]);
        assert_eq!(change.column_keys, vec!["x".to_string()]);
        assert_eq!(updated.len(), 5);
        for i in 1..=3 {
            assert_eq!(updated[i].x, 0);
            assert_eq!(updated[i].y, rows[i].y); // other fields untouched
        }
        assert_eq!(updated[0], rows[0]);
        assert_eq!(updated[4], rows[4]);
    }

    #[test]
    fn test_non_editable_row_is_excluded() {
        let rows = rows(5);
        let cols = columns();
        let (mut engine, notifications, _) =
            harness(FillMode::Rectangular, |pos| pos.row_idx != 2);

        drag(
            &mut engine,
            &rows,
            &cols,
            Position::new(0, 0),
            &[Position::new(3, 0)],
        );

        let log = notifications.borrow();
        assert_eq!(log.len(), 1);
        let (updated, change) = &log[0];
        assert_eq!(change.indexes, vec![1, 3]);
        assert_eq!(updated[2], rows[2]);
    }

    #[test]
    fn test_identity_fill_fires_no_notification() {
        let rows = rows(5);
        let cols = columns();
        let notifications: Notifications = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&notifications);
        let mut engine = FillEngine::new(
            FillMode::Rectangular,
            Box::new(|_| true),
            Box::new(|event: FillEvent<'_, Row>| event.target_row),
        )
        .on_rows_change(Box::new(move |updated, change| {
            sink.borrow_mut().push((updated, change));
        }));

        drag(
            &mut engine,
            &rows,
            &cols,
            Position::new(0, 0),
            &[Position::new(4, 0)],
        );

        assert!(notifications.borrow().is_empty());
    }

    #[test]
    fn test_last_hover_before_release_wins() {
        // Intermediate jitter does not affect the committed range.
        let rows = rows(6);
        let cols = columns();
        let (mut engine, notifications, _) = harness(FillMode::ColumnOnly, |_| true);

        drag(
            &mut engine,
            &rows,
            &cols,
            Position::new(0, 0),
            &[
                Position::new(5, 0),
                Position::new(1, 0),
                Position::new(3, 0),
            ],
        );

        let log = notifications.borrow();
        assert_eq!(log[0].1.indexes, vec![1, 2, 3]);
    }

    #[test]
    fn test_rectangular_same_row_spans_columns() {
        // Hover differs only in column: one row, columns [1, 2].
        let row_set = vec![
            Row { x: 1, y: 100 },
            Row { x: 2, y: 200 },
        ];
        let cols = vec![
            Column::new("x", 0).with_editable(Editable::Always),
            Column::new("y", 1).with_editable(Editable::Always),
        ];
        let (mut engine, notifications, _) = harness(FillMode::Rectangular, |_| true);

        drag(
            &mut engine,
            &row_set,
            &cols,
            Position::new(1, 0),
            &[Position::new(1, 1)],
        );

        let log = notifications.borrow();
        assert_eq!(log.len(), 1);
        let (updated, change) = &log[0];
        assert_eq!(change.indexes, vec![1]);
        assert_eq!(change.column_keys, vec!["x".to_string(), "y".to_string()]);
        // y took the value of x's source row; x itself is the source cell.
        assert_eq!(updated[1], Row { x: 2, y: 2 });
        assert_eq!(updated[0], row_set[0]);
    }

    #[test]
    fn test_source_cell_is_never_filled() {
        let rows = rows(4);
        let cols = columns();
        let (mut engine, notifications, _) = harness(FillMode::Rectangular, |_| true);

        // Upward drag over the source.
        drag(
            &mut engine,
            &rows,
            &cols,
            Position::new(3, 0),
            &[Position::new(0, 0)],
        );

        let log = notifications.borrow();
        let (updated, change) = &log[0];
        assert!(!change.indexes.contains(&3));
        assert_eq!(updated[3], rows[3]);
        assert_eq!(change.indexes, vec![0, 1, 2]);
    }

    #[test]
    fn test_column_only_upward_regression() {
        // Pinned convention: source excluded, hover included, both
        // directions. Source row 5, hover row 2 -> rows [2, 4].
        let rows = rows(8);
        let cols = columns();
        let (mut engine, notifications, _) = harness(FillMode::ColumnOnly, |_| true);

        drag(
            &mut engine,
            &rows,
            &cols,
            Position::new(5, 1),
            &[Position::new(2, 1)],
        );

        let log = notifications.borrow();
        assert_eq!(log[0].1.indexes, vec![2, 3, 4]);
        assert_eq!(log[0].1.column_keys, vec!["y".to_string()]);
    }

    // ================================================================
    // Double-click shortcut
    // ================================================================

    #[test]
    fn test_double_click_fills_down_to_last_row() {
        let rows = rows(5);
        let cols = columns();
        let (mut engine, notifications, drag_ends) = harness(FillMode::ColumnOnly, |_| true);

        engine.fill_to_end(&rows, &cols, Position::new(1, 0));

        let log = notifications.borrow();
        assert_eq!(log.len(), 1);
        assert_eq!(log[0].1.indexes, vec![2, 3, 4]);
        for i in 2..=4 {
            assert_eq!(log[0].0[i].x, 10);
        }
        // Not a drag: the drag-end observer is not involved.
        assert_eq!(*drag_ends.borrow(), 0);
    }

    #[test]
    fn test_double_click_from_last_row_is_noop() {
        let rows = rows(5);
        let cols = columns();
        let (mut engine, notifications, _) = harness(FillMode::ColumnOnly, |_| true);

        engine.fill_to_end(&rows, &cols, Position::new(4, 0));

        assert!(notifications.borrow().is_empty());
    }

    // ================================================================
    // Gesture protocol & guards
    // ================================================================

    #[test]
    fn test_drag_end_observer_fires_with_and_without_commit() {
        let rows = rows(3);
        let cols = columns();
        let (mut engine, notifications, drag_ends) = harness(FillMode::ColumnOnly, |_| true);

        // Commit path.
        drag(
            &mut engine,
            &rows,
            &cols,
            Position::new(0, 0),
            &[Position::new(2, 0)],
        );
        // Release with no recorded hover: benign no-op, still torn down.
        assert!(engine.begin_drag(PRIMARY_BUTTON));
        engine.release(&rows, &cols, Position::new(0, 0));

        assert_eq!(notifications.borrow().len(), 1);
        assert_eq!(*drag_ends.borrow(), 2);
        assert!(!engine.is_dragging());
    }

    #[test]
    fn test_empty_rows_is_a_noop() {
        let cols = columns();
        let (mut engine, notifications, _) = harness(FillMode::Rectangular, |_| true);

        drag(
            &mut engine,
            &[],
            &cols,
            Position::new(0, 0),
            &[Position::new(2, 0)],
        );

        assert!(notifications.borrow().is_empty());
    }

    #[test]
    fn test_out_of_range_source_is_a_noop() {
        let rows = rows(3);
        let cols = columns();
        let (mut engine, notifications, _) = harness(FillMode::Rectangular, |_| true);

        drag(
            &mut engine,
            &rows,
            &cols,
            Position::new(7, 0),
            &[Position::new(1, 0)],
        );

        assert!(notifications.borrow().is_empty());
    }

    #[test]
    fn test_hover_past_mounted_rows_is_clipped() {
        // Virtualization may report hovers beyond the supplied window.
        let rows = rows(3);
        let cols = columns();
        let (mut engine, notifications, _) = harness(FillMode::ColumnOnly, |_| true);

        drag(
            &mut engine,
            &rows,
            &cols,
            Position::new(0, 0),
            &[Position::new(9, 0)],
        );

        let log = notifications.borrow();
        assert_eq!(log[0].1.indexes, vec![1, 2]);
    }

    #[test]
    fn test_secondary_button_does_not_start_a_gesture() {
        let rows = rows(3);
        let cols = columns();
        let (mut engine, notifications, drag_ends) = harness(FillMode::ColumnOnly, |_| true);

        assert!(!engine.begin_drag(2));
        engine.drag_over(Position::new(2, 0));
        engine.release(&rows, &cols, Position::new(0, 0));

        assert!(notifications.borrow().is_empty());
        // Release still notifies teardown observers.
        assert_eq!(*drag_ends.borrow(), 1);
    }

    #[test]
    fn test_preview_tracks_the_marker() {
        let (mut engine, _, _) = harness(FillMode::Rectangular, |_| true);
        let source = Position::new(1, 1);

        assert!(engine.preview_range(source).is_none());
        engine.begin_drag(PRIMARY_BUTTON);
        engine.drag_over(Position::new(4, 1));
        let range = engine.preview_range(source).unwrap();
        assert_eq!((range.start_row, range.end_row), (1, 4));
        assert!(engine.is_dragged_over(source, Position::new(3, 1)));
        assert!(!engine.is_dragged_over(source, source));
    }
}
