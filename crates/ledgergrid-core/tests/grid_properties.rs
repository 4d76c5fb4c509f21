//! Property-based tests for grid invariants.
//!
//! Tests validate:
//! 1. Every data row's amount is round(quantity * rate, 2)
//! 2. Each subtotal equals the sum of the amounts since the previous one
//! 3. Subtotal recalculation is idempotent
//! 4. Sorting hides subtotals and clearing the sort brings them back
//! 5. Tab past the last cell appends a row and focuses it
//! 6. Escape restores the pre-edit value

use ledgergrid_core::{
    CellValue, ColumnSpec, ColumnType, EditInput, Grid, GridKey, GridMode, GridOptions, Row, RowId,
};
use ledgergrid_engine::engine::{format_amount, recalculate_subtotals, round2};
use proptest::prelude::*;

fn columns() -> Vec<ColumnSpec> {
    vec![
        ColumnSpec::new("id", "Id", ColumnType::Readonly),
        ColumnSpec::new("qty", "Qty", ColumnType::Number),
        ColumnSpec::new("rate", "Rate", ColumnType::Rate),
        ColumnSpec::new("amount", "Amount", ColumnType::Amount),
        ColumnSpec::new("del", "", ColumnType::Action),
    ]
}

fn grid_from(rows: &[(i64, u32)]) -> Grid {
    let rows = rows
        .iter()
        .enumerate()
        .map(|(i, &(qty, cents))| {
            Row::new(RowId(0))
                .with("id", format!("P{}", i + 1))
                .with("qty", qty)
                .with("rate", format!("{}.{:02}", cents / 100, cents % 100))
        })
        .collect();
    Grid::new(columns(), rows, GridOptions::default()).unwrap()
}

#[derive(Clone, Debug)]
enum Op {
    Insert,
    Delete(usize),
    SetQty(usize, i64),
    SetRate(usize, u32),
    TypeQty(usize, u8),
    AddSubtotal,
    ToggleSort(usize),
}

fn op() -> impl Strategy<Value = Op> {
    prop_oneof![
        Just(Op::Insert),
        (0usize..12).prop_map(Op::Delete),
        (0usize..12, 0i64..500).prop_map(|(i, q)| Op::SetQty(i, q)),
        (0usize..12, 0u32..100_000).prop_map(|(i, r)| Op::SetRate(i, r)),
        (0usize..12, 0u8..10).prop_map(|(i, d)| Op::TypeQty(i, d)),
        Just(Op::AddSubtotal),
        (0usize..4).prop_map(Op::ToggleSort),
    ]
}

fn rows_strategy() -> impl Strategy<Value = Vec<(i64, u32)>> {
    prop::collection::vec((0i64..100, 0u32..10_000), 0..8)
}

fn apply(grid: &mut Grid, op: &Op) {
    let len = grid.rows().len();
    match *op {
        Op::Insert => {
            grid.insert_rows(None);
        }
        Op::Delete(i) if i < len => {
            let id = grid.rows()[i].id;
            grid.delete_row(id);
        }
        Op::SetQty(i, q) if i < len && !grid.rows()[i].is_subtotal() => {
            grid.set_cell(i, "qty", CellValue::Number(q as f64)).unwrap();
        }
        Op::SetRate(i, r) if i < len && !grid.rows()[i].is_subtotal() => {
            let rate = format!("{}.{:02}", r / 100, r % 100);
            grid.set_cell(i, "rate", CellValue::text(rate)).unwrap();
        }
        Op::TypeQty(i, d) if i < grid.visible_len() => {
            if grid.click(i, 1).is_ok() {
                grid.input(EditInput::Char(char::from(b'0' + d)));
                grid.key(GridKey::Enter);
            }
        }
        Op::AddSubtotal => {
            grid.add_subtotal();
        }
        Op::ToggleSort(c) => {
            grid.toggle_sort(c).unwrap();
        }
        _ => {}
    }
}

fn amount_of(row: &Row) -> f64 {
    row.get("amount").map(CellValue::as_number_or_zero).unwrap_or(0.0)
}

fn expected_amount(row: &Row) -> String {
    let q = row.get("qty").map(CellValue::as_number_or_zero).unwrap_or(0.0);
    let r = row.get("rate").map(CellValue::as_number_or_zero).unwrap_or(0.0);
    format_amount(q * r)
}

// ===== Property 1 & 2: Amounts and subtotals =====

proptest! {
    #[test]
    fn amounts_follow_quantity_times_rate(rows in rows_strategy(), ops in prop::collection::vec(op(), 0..30)) {
        let mut grid = grid_from(&rows);
        for op in &ops {
            apply(&mut grid, op);
        }
        grid.clear_sort();
        grid.commit_edit();
        for row in grid.rows().iter().filter(|r| !r.is_subtotal()) {
            prop_assert_eq!(row.get("amount"), Some(&CellValue::Text(expected_amount(row))));
        }
    }

    #[test]
    fn subtotals_sum_their_range(rows in rows_strategy(), ops in prop::collection::vec(op(), 0..30)) {
        let mut grid = grid_from(&rows);
        for op in &ops {
            apply(&mut grid, op);
        }
        grid.clear_sort();
        grid.commit_edit();
        prop_assert_eq!(grid.mode(), GridMode::Normal);

        let mut running = 0.0;
        for (i, row) in grid.rows().iter().enumerate() {
            if row.is_subtotal() {
                let stamped = row.get("amount").map(|v| v.to_string()).unwrap_or_default();
                prop_assert_eq!(stamped, format_amount(round2(running)));
                prop_assert_eq!(row.subtotal_end_index(), i.checked_sub(1));
                running = 0.0;
            } else {
                running += amount_of(row);
            }
        }
    }
}

// ===== Property 3: Idempotence =====

proptest! {
    #[test]
    fn recalculation_is_idempotent(rows in rows_strategy(), ops in prop::collection::vec(op(), 0..20)) {
        let mut grid = grid_from(&rows);
        for op in &ops {
            apply(&mut grid, op);
        }
        let mut once = grid.rows().to_vec();
        recalculate_subtotals(&mut once, Some("amount"));
        let mut twice = once.clone();
        recalculate_subtotals(&mut twice, Some("amount"));
        prop_assert_eq!(once, twice);
    }

    #[test]
    fn subtotal_guard_tracks_positive_rows(rows in rows_strategy()) {
        let mut grid = grid_from(&rows);
        if grid.add_subtotal().is_some() {
            prop_assert!(!grid.can_add_subtotal());
            prop_assert!(grid.add_subtotal().is_none());

            let ids = grid.insert_rows(Some(1));
            let index = grid.rows().iter().position(|r| r.id == ids[0]).unwrap();
            grid.set_cell(index, "qty", CellValue::Number(1.0)).unwrap();
            grid.set_cell(index, "rate", CellValue::text("1.00")).unwrap();
            prop_assert!(grid.can_add_subtotal());
        } else {
            prop_assert!(!grid.can_add_subtotal());
        }
    }
}

// ===== Property 4: Sorted mode =====

proptest! {
    #[test]
    fn sorting_hides_and_restores_subtotals(
        rows in rows_strategy(),
        ops in prop::collection::vec(op(), 0..20),
        column in 0usize..4,
    ) {
        let mut grid = grid_from(&rows);
        for op in &ops {
            apply(&mut grid, op);
        }
        grid.clear_sort();
        let subtotals = grid.rows().iter().filter(|r| r.is_subtotal()).count();
        let total = grid.rows().len();

        grid.toggle_sort(column).unwrap();
        prop_assert_eq!(grid.mode(), GridMode::Sorted);
        prop_assert!(grid.visible_rows().iter().all(|r| !r.is_subtotal()));
        prop_assert_eq!(grid.visible_len(), total - subtotals);

        grid.clear_sort();
        prop_assert_eq!(grid.mode(), GridMode::Normal);
        prop_assert_eq!(grid.visible_len(), total);
        prop_assert_eq!(grid.visible_rows().iter().filter(|r| r.is_subtotal()).count(), subtotals);
    }
}

// ===== Property 5 & 6: Editing =====

proptest! {
    #[test]
    fn tab_past_last_cell_appends_and_focuses(rows in prop::collection::vec((0i64..100, 0u32..10_000), 1..8), enter in any::<bool>()) {
        let mut grid = grid_from(&rows);
        let last = grid.visible_len() - 1;
        grid.click(last, 2).unwrap();
        grid.key(if enter { GridKey::Enter } else { GridKey::Tab });

        prop_assert_eq!(grid.rows().len(), rows.len() + 1);
        prop_assert!(!grid.edit_state().is_idle());
        let new_id = grid.rows()[rows.len()].id;
        prop_assert_eq!(grid.pending_focus(), Some((new_id, 1)));

        let view = grid.render();
        prop_assert!(grid.view_settled(&view.row_ids()));
        prop_assert_eq!(grid.edit_state().cell(), Some((new_id, 1)));
    }

    #[test]
    fn escape_restores_pre_edit_value(
        rows in prop::collection::vec((0i64..100, 0u32..10_000), 1..8),
        row in 0usize..8,
        column in 1usize..3,
        typed in "[0-9.]{0,6}",
        backspaces in 0usize..4,
    ) {
        let mut grid = grid_from(&rows);
        let row = row % grid.visible_len();
        let before = grid.rows().to_vec();

        grid.click(row, column).unwrap();
        for _ in 0..backspaces {
            grid.input(EditInput::Backspace);
        }
        for c in typed.chars() {
            grid.input(EditInput::Char(c));
        }
        grid.key(GridKey::Escape);

        prop_assert!(grid.edit_state().is_idle());
        prop_assert_eq!(grid.rows(), &before[..]);
    }
}
