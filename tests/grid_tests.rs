//! Tests for the cell/row rendering contracts and the roving focus
//! invariant.

#[allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::panic
)]
mod tests {
    use gridview::grid::{cell_spec, plan_row, CellProps, RovingFocus, SlotKind};
    use gridview::types::{Column, Editable, GridConfig, Position};

    #[derive(Debug, Clone, PartialEq, Eq)]
    struct Item {
        label: String,
        kind: u8,
    }

    fn item(label: &str, kind: u8) -> Item {
        Item {
            label: label.to_string(),
            kind,
        }
    }

    fn label_column(idx: usize) -> Column<Item> {
        Column::new(format!("c{idx}"), idx).with_formatter(|row: &Item| row.label.clone())
    }

    // ================================================================
    // Cell contract
    // ================================================================

    #[test]
    fn test_cell_spec_full_surface() {
        let config = GridConfig::default();
        let column = label_column(4)
            .with_editable(Editable::PerRow(Box::new(|row: &Item| row.kind == 0)))
            .with_cell_class(|row: &Item| (row.kind == 1).then(|| "kind-b".to_string()));
        let row = item("hello", 1);

        let spec = cell_spec(
            &config,
            &CellProps {
                column: &column,
                row: &row,
                col_span: Some(2),
                is_selected: true,
                is_copied: true,
                is_dragged_over: true,
                tab_index: 0,
            },
        );

        assert_eq!(spec.aria_colindex, 5);
        assert_eq!(spec.aria_colspan, Some(2));
        assert!(spec.aria_selected);
        assert!(spec.aria_readonly); // kind != 0
        assert_eq!(spec.tab_index, 0);
        assert_eq!(spec.content.as_deref(), Some("hello"));
        // Composition order: base, copied, dragged-over, column class.
        assert_eq!(
            spec.class_name,
            "gv-cell gv-cell-copied gv-cell-dragged-over kind-b"
        );
    }

    #[test]
    fn test_cell_spec_memoization_contract() {
        // Identical inputs, identical output; one changed flag, new output.
        let config = GridConfig::default();
        let column = label_column(0);
        let row = item("v", 0);
        let props = |dragged: bool| CellProps {
            column: &column,
            row: &row,
            col_span: None,
            is_selected: false,
            is_copied: false,
            is_dragged_over: dragged,
            tab_index: -1,
        };

        assert_eq!(cell_spec(&config, &props(false)), cell_spec(&config, &props(false)));
        assert_ne!(cell_spec(&config, &props(false)), cell_spec(&config, &props(true)));
    }

    #[test]
    fn test_custom_class_prefix() {
        let config = GridConfig {
            class_prefix: "dg".to_string(),
            ..GridConfig::default()
        };
        let column = label_column(0);
        let row = item("v", 0);
        let spec = cell_spec(
            &config,
            &CellProps {
                column: &column,
                row: &row,
                col_span: None,
                is_selected: false,
                is_copied: true,
                is_dragged_over: false,
                tab_index: -1,
            },
        );
        assert_eq!(spec.class_name, "dg-cell dg-cell-copied");
    }

    // ================================================================
    // Row contract
    // ================================================================

    #[test]
    fn test_span_of_three_yields_three_nodes() {
        // A column declaring a span of 3 at index 1 over 5 columns:
        // index 0 alone, merged node for 1-3, index 4 alone.
        let mut columns: Vec<Column<Item>> = (0..5).map(label_column).collect();
        columns[1] = label_column(1).with_col_span(|_| Some(3));
        let row = item("r", 0);

        let slots = plan_row(&columns, &row, None, None, &[], &|_| false, false);

        assert_eq!(slots.len(), 3);
        assert_eq!(slots[0].idx, 0);
        assert_eq!(slots[1].idx, 1);
        assert_eq!(slots[1].col_span, Some(3));
        assert_eq!(slots[2].idx, 4);
    }

    #[test]
    fn test_editor_replaces_selected_cell_only() {
        let columns: Vec<Column<Item>> = (0..3).map(label_column).collect();
        let row = item("r", 0);

        let slots = plan_row(&columns, &row, None, Some(&[1]), &[], &|_| false, true);

        assert_eq!(slots[1].kind, SlotKind::Editor);
        assert!(slots
            .iter()
            .enumerate()
            .all(|(i, s)| i == 1 || s.kind == SlotKind::Cell));
    }

    #[test]
    fn test_no_selection_means_no_handle_slot() {
        let columns: Vec<Column<Item>> = (0..3).map(label_column).collect();
        let row = item("r", 0);

        let slots = plan_row(&columns, &row, None, None, &[], &|_| false, false);

        assert!(slots.iter().all(|s| !s.has_drag_handle));
    }

    // ================================================================
    // Roving focus invariant
    // ================================================================

    #[test]
    fn test_every_valid_selection_yields_exactly_one_tab_stop() {
        const ROWS: usize = 6;
        const COLS: usize = 4;
        let mut focus = RovingFocus::new();

        for row_idx in 0..ROWS {
            for idx in 0..COLS {
                focus.select(Position::new(row_idx, idx), row_idx % 2 == 0);

                let mut stops = 0;
                for r in 0..ROWS {
                    if focus.row_tab_index(r) == 0 {
                        stops += 1;
                    }
                    for c in 0..COLS {
                        if focus.cell_tab_index(Position::new(r, c)) == 0 {
                            stops += 1;
                        }
                    }
                }
                assert_eq!(stops, 1, "one tab stop after selecting ({row_idx}, {idx})");
            }
        }

        focus.clear();
        for r in 0..ROWS {
            assert_eq!(focus.row_tab_index(r), -1);
            for c in 0..COLS {
                assert_eq!(focus.cell_tab_index(Position::new(r, c)), -1);
            }
        }
    }

    #[test]
    fn test_pointer_and_keyboard_focus_paths() {
        let mut focus = RovingFocus::new();

        // Pointer: the browser focuses the element itself.
        focus.select(Position::new(0, 0), true);
        assert_eq!(focus.take_pending_focus(), None);

        // Keyboard/programmatic: focus must be moved imperatively.
        focus.select(Position::new(2, 1), false);
        assert_eq!(focus.take_pending_focus(), Some(Position::new(2, 1)));
        assert_eq!(focus.take_pending_focus(), None);
    }
}
