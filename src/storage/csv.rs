//! CSV export of the committed rows, subtotals included.

use crate::error::Result;
use ledgergrid_engine::engine::{CellValue, ColumnSpec, ColumnType, Row, display_value};
use std::io::Write;
use std::path::Path;

pub fn write_csv(path: &Path, columns: &[ColumnSpec], rows: &[Row]) -> Result<()> {
    let mut file = std::fs::File::create(path)?;
    write_csv_to(&mut file, columns, rows)?;
    tracing::info!(path = %path.display(), rows = rows.len(), "csv exported");
    Ok(())
}

/// Write a header line and one line per row. Action columns are left out.
pub fn write_csv_to<W: Write>(out: &mut W, columns: &[ColumnSpec], rows: &[Row]) -> Result<()> {
    let exported: Vec<&ColumnSpec> = columns
        .iter()
        .filter(|c| c.kind != ColumnType::Action)
        .collect();

    let header: Vec<String> = exported
        .iter()
        .map(|c| {
            let label = if c.header.is_empty() { &c.id } else { &c.header };
            escape_csv_field(label)
        })
        .collect();
    writeln!(out, "{}", header.join(","))?;

    for row in rows {
        let fields: Vec<String> = if row.is_subtotal() {
            subtotal_fields(&exported, row)
        } else {
            exported
                .iter()
                .map(|c| export_value(c, row.get(&c.id)))
                .collect()
        };
        let fields: Vec<String> = fields.iter().map(|f| escape_csv_field(f)).collect();
        writeln!(out, "{}", fields.join(","))?;
    }
    Ok(())
}

/// Checkboxes export as `true`/`false`; everything else as displayed.
fn export_value(column: &ColumnSpec, value: Option<&CellValue>) -> String {
    match column.kind {
        ColumnType::Checkbox => value.is_some_and(|v| v.as_bool()).to_string(),
        _ => display_value(column, value),
    }
}

/// "Subtotal" in the first column, the sum under the amount column.
fn subtotal_fields(columns: &[&ColumnSpec], row: &Row) -> Vec<String> {
    columns
        .iter()
        .enumerate()
        .map(|(i, c)| {
            if c.kind == ColumnType::Amount {
                display_value(c, row.get(&c.id))
            } else if i == 0 {
                "Subtotal".to_string()
            } else {
                String::new()
            }
        })
        .collect()
}

/// Escape a field for CSV output
fn escape_csv_field(field: &str) -> String {
    if field.contains(',') || field.contains('"') || field.contains('\n') || field.contains('\r') {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}
