//! Derived amounts and running subtotals.
//!
//! An amount column is `round(quantity * rate, 2)` rendered with two decimals.
//! A subtotal row holds the sum of the amounts of the data rows between it and
//! the previous subtotal (or the start of the grid). All functions here work
//! on plain row slices so the same code serves the committed sequence and any
//! snapshot restored from it.

use super::column::{ColumnSpec, ColumnType};
use super::format::{format_amount, round2};
use super::row::{Row, RowKind};
use super::value::CellValue;

/// Which columns feed the derived amount.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AmountRule {
    pub amount: String,
    pub quantity: Option<String>,
    pub rate: Option<String>,
}

impl AmountRule {
    /// Resolve the rule from column types: the first `amount` column, fed by
    /// the first `number` column and the first `rate` column.
    ///
    /// Only the first amount column is honoured; any further ones behave like
    /// readonly text.
    pub fn resolve(columns: &[ColumnSpec]) -> Option<AmountRule> {
        let mut amounts = columns.iter().filter(|c| c.kind == ColumnType::Amount);
        let amount = amounts.next()?;
        let extra: Vec<&str> = amounts.map(|c| c.id.as_str()).collect();
        if !extra.is_empty() {
            tracing::warn!(
                amount = %amount.id,
                ignored = ?extra,
                "multiple amount columns; only the first is computed"
            );
        }
        let first_of = |kind: ColumnType| {
            columns
                .iter()
                .find(|c| c.kind == kind)
                .map(|c| c.id.clone())
        };
        Some(AmountRule {
            amount: amount.id.clone(),
            quantity: first_of(ColumnType::Number),
            rate: first_of(ColumnType::Rate),
        })
    }

    /// Name the quantity and rate columns explicitly.
    pub fn explicit(amount: &str, quantity: &str, rate: &str) -> AmountRule {
        AmountRule {
            amount: amount.to_string(),
            quantity: Some(quantity.to_string()),
            rate: Some(rate.to_string()),
        }
    }

    /// Whether writing `column_id` changes the derived amount.
    pub fn is_input(&self, column_id: &str) -> bool {
        self.quantity.as_deref() == Some(column_id) || self.rate.as_deref() == Some(column_id)
    }

    /// The amount a data row should carry, or `None` when the rule has no
    /// inputs to compute it from.
    pub fn compute(&self, row: &Row) -> Option<String> {
        let quantity = self.quantity.as_deref()?;
        let rate = self.rate.as_deref()?;
        let q = row.get(quantity).map(CellValue::as_number_or_zero).unwrap_or(0.0);
        let r = row.get(rate).map(CellValue::as_number_or_zero).unwrap_or(0.0);
        Some(format_amount(q * r))
    }

    /// Store the computed amount on a data row. Subtotal rows are left alone.
    pub fn apply(&self, row: &mut Row) {
        if row.is_subtotal() {
            return;
        }
        if let Some(amount) = self.compute(row) {
            row.set(&self.amount, CellValue::Text(amount));
        }
    }
}

/// Parsed amount of a row; missing or unparsable amounts count as zero.
pub fn row_amount(row: &Row, amount_column: Option<&str>) -> f64 {
    amount_column
        .and_then(|col| row.get(col))
        .map(CellValue::as_number_or_zero)
        .unwrap_or(0.0)
}

/// Restamp every subtotal row in a single pass.
///
/// Each subtotal gets the rounded running sum of the data rows since the
/// previous subtotal and records the index just before itself as the end of
/// its range. Running it twice changes nothing.
pub fn recalculate_subtotals(rows: &mut [Row], amount_column: Option<&str>) {
    let mut running = 0.0;
    for index in 0..rows.len() {
        if rows[index].is_subtotal() {
            let row = &mut rows[index];
            row.kind = RowKind::Subtotal {
                end_index: index.checked_sub(1),
            };
            if let Some(col) = amount_column {
                row.set(col, CellValue::Text(format_amount(round2(running))));
            }
            running = 0.0;
        } else {
            running += row_amount(&rows[index], amount_column);
        }
    }
}

pub fn last_subtotal_index(rows: &[Row]) -> Option<usize> {
    rows.iter().rposition(Row::is_subtotal)
}

/// Index of the last data row after the last subtotal with a positive amount.
fn last_qualifying_row(rows: &[Row], amount_column: Option<&str>) -> Option<usize> {
    let start = last_subtotal_index(rows).map_or(0, |i| i + 1);
    (start..rows.len())
        .rev()
        .find(|&i| !rows[i].is_subtotal() && row_amount(&rows[i], amount_column) > 0.0)
}

/// True iff some row after the last subtotal (or the start) has an amount > 0.
pub fn can_add_subtotal(rows: &[Row], amount_column: Option<&str>) -> bool {
    last_qualifying_row(rows, amount_column).is_some()
}

/// Where a new subtotal row goes: right after the last qualifying row.
pub fn subtotal_insert_position(rows: &[Row], amount_column: Option<&str>) -> Option<usize> {
    last_qualifying_row(rows, amount_column).map(|i| i + 1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::RowId;

    fn data(id: u64, amount: &str) -> Row {
        Row::new(RowId(id)).with("amount", amount)
    }

    fn columns() -> Vec<ColumnSpec> {
        vec![
            ColumnSpec::new("id", "Id", ColumnType::Readonly),
            ColumnSpec::new("qty", "Qty", ColumnType::Number),
            ColumnSpec::new("rate", "Rate", ColumnType::Rate),
            ColumnSpec::new("amount", "Amount", ColumnType::Amount),
        ]
    }

    #[test]
    fn test_resolve_uses_first_number_and_rate() {
        let rule = AmountRule::resolve(&columns()).unwrap();
        assert_eq!(rule, AmountRule::explicit("amount", "qty", "rate"));
        assert!(rule.is_input("qty"));
        assert!(!rule.is_input("id"));
    }

    #[test]
    fn test_resolve_without_amount_column() {
        let cols = vec![ColumnSpec::new("name", "Name", ColumnType::String)];
        assert!(AmountRule::resolve(&cols).is_none());
    }

    #[test]
    fn test_resolve_keeps_first_of_several_amounts() {
        let mut cols = columns();
        cols.push(ColumnSpec::new("amount2", "Again", ColumnType::Amount));
        assert_eq!(AmountRule::resolve(&cols).unwrap().amount, "amount");
    }

    #[test]
    fn test_compute_amount() {
        let rule = AmountRule::resolve(&columns()).unwrap();
        let mut row = Row::new(RowId(1)).with("qty", 2i64).with("rate", "10.00");
        rule.apply(&mut row);
        assert_eq!(row.get("amount"), Some(&CellValue::text("20.00")));

        let mut junk = Row::new(RowId(2)).with("qty", "x").with("rate", "5");
        rule.apply(&mut junk);
        assert_eq!(junk.get("amount"), Some(&CellValue::text("0.00")));
    }

    #[test]
    fn test_recalculate_stamps_running_sums() {
        let mut rows = vec![
            data(1, "20.00"),
            data(2, "15.00"),
            Row::subtotal(RowId(3)),
            data(4, "1.10"),
            data(5, "bogus"),
            data(6, "2.20"),
            Row::subtotal(RowId(7)),
        ];
        recalculate_subtotals(&mut rows, Some("amount"));
        assert_eq!(rows[2].get("amount"), Some(&CellValue::text("35.00")));
        assert_eq!(rows[2].subtotal_end_index(), Some(1));
        assert_eq!(rows[6].get("amount"), Some(&CellValue::text("3.30")));
        assert_eq!(rows[6].subtotal_end_index(), Some(5));

        let snapshot = rows.clone();
        recalculate_subtotals(&mut rows, Some("amount"));
        assert_eq!(rows, snapshot);
    }

    #[test]
    fn test_leading_subtotal_is_zero() {
        let mut rows = vec![Row::subtotal(RowId(1)), data(2, "5")];
        recalculate_subtotals(&mut rows, Some("amount"));
        assert_eq!(rows[0].get("amount"), Some(&CellValue::text("0.00")));
        assert_eq!(rows[0].subtotal_end_index(), None);
    }

    #[test]
    fn test_can_add_subtotal_only_after_last_subtotal() {
        let mut rows = vec![data(1, "20.00"), Row::subtotal(RowId(2))];
        assert!(!can_add_subtotal(&rows, Some("amount")));
        rows.push(data(3, "0.00"));
        assert!(!can_add_subtotal(&rows, Some("amount")));
        rows.push(data(4, "1.00"));
        rows.push(data(5, "0.00"));
        assert!(can_add_subtotal(&rows, Some("amount")));
        assert_eq!(subtotal_insert_position(&rows, Some("amount")), Some(4));
    }

    #[test]
    fn test_no_amount_column_never_qualifies() {
        let rows = vec![data(1, "20.00")];
        assert!(!can_add_subtotal(&rows, None));
    }
}
