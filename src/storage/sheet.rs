//! TOML sheet files: `[[columns]]` followed by `[[rows]]`.
//!
//! ```toml
//! title = "Invoice"
//!
//! [[columns]]
//! id = "qty"
//! header = "Qty"
//! type = "number"
//!
//! [[rows]]
//! qty = 2
//!
//! [[rows]]
//! is_subtotal = true
//! ```

use crate::error::{AppError, Result};
use ledgergrid_engine::engine::{CellValue, ColumnSpec, Row, RowId, RowKind};
use serde::Deserialize;
use std::collections::HashSet;
use std::path::Path;

/// Row key that marks a subtotal row.
const SUBTOTAL_KEY: &str = "is_subtotal";

/// A loaded sheet, ready to hand to [`ledgergrid_core::Grid::new`].
#[derive(Clone, Debug, PartialEq)]
pub struct Sheet {
    pub title: Option<String>,
    pub columns: Vec<ColumnSpec>,
    pub rows: Vec<Row>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct SheetFile {
    title: Option<String>,
    columns: Vec<ColumnSpec>,
    #[serde(default)]
    rows: Vec<toml::Table>,
}

pub fn parse_sheet(path: &Path) -> Result<Sheet> {
    let content = std::fs::read_to_string(path)?;
    parse_sheet_str(&content)
}

pub fn parse_sheet_str(content: &str) -> Result<Sheet> {
    let file: SheetFile = toml::from_str(content)?;
    let known: HashSet<&str> = file.columns.iter().map(|c| c.id.as_str()).collect();

    let mut rows = Vec::with_capacity(file.rows.len());
    for (index, table) in file.rows.iter().enumerate() {
        // Ids are reassigned by the grid on load.
        let mut row = Row::new(RowId(index as u64));
        for (key, value) in table {
            if key == SUBTOTAL_KEY {
                match value {
                    toml::Value::Boolean(true) => row.kind = RowKind::Subtotal { end_index: None },
                    toml::Value::Boolean(false) => {}
                    _ => {
                        return Err(AppError::Sheet(format!(
                            "row {}: {} must be a boolean",
                            index + 1,
                            SUBTOTAL_KEY
                        )));
                    }
                }
                continue;
            }
            if !known.contains(key.as_str()) {
                return Err(AppError::Sheet(format!(
                    "row {}: unknown column '{}'",
                    index + 1,
                    key
                )));
            }
            let value = cell_from_toml(value).ok_or_else(|| {
                AppError::Sheet(format!(
                    "row {}: unsupported value for '{}'",
                    index + 1,
                    key
                ))
            })?;
            row.set(key, value);
        }
        rows.push(row);
    }

    tracing::debug!(columns = file.columns.len(), rows = rows.len(), "sheet parsed");
    Ok(Sheet {
        title: file.title,
        columns: file.columns,
        rows,
    })
}

fn cell_from_toml(value: &toml::Value) -> Option<CellValue> {
    match value {
        toml::Value::String(s) => Some(CellValue::Text(s.clone())),
        toml::Value::Integer(n) => Some(CellValue::Number(*n as f64)),
        toml::Value::Float(n) => Some(CellValue::Number(*n)),
        toml::Value::Boolean(b) => Some(CellValue::Bool(*b)),
        _ => None,
    }
}

fn cell_to_toml(value: &CellValue) -> toml::Value {
    match value {
        CellValue::Bool(b) => toml::Value::Boolean(*b),
        CellValue::Number(n) if n.fract() == 0.0 && n.abs() < 1e15 => {
            toml::Value::Integer(*n as i64)
        }
        CellValue::Number(n) => toml::Value::Float(*n),
        CellValue::Text(s) => toml::Value::String(s.clone()),
    }
}

/// Render a sheet back to TOML.
pub fn sheet_to_string(title: Option<&str>, columns: &[ColumnSpec], rows: &[Row]) -> Result<String> {
    let mut doc = toml::Table::new();
    if let Some(title) = title {
        doc.insert("title".to_string(), toml::Value::String(title.to_string()));
    }

    let columns = columns
        .iter()
        .map(toml::Value::try_from)
        .collect::<std::result::Result<Vec<_>, _>>()?;
    doc.insert("columns".to_string(), toml::Value::Array(columns));

    let rows = rows
        .iter()
        .map(|row| {
            let mut table = toml::Table::new();
            if row.is_subtotal() {
                table.insert(SUBTOTAL_KEY.to_string(), toml::Value::Boolean(true));
            }
            for (key, value) in &row.cells {
                table.insert(key.clone(), cell_to_toml(value));
            }
            toml::Value::Table(table)
        })
        .collect();
    doc.insert("rows".to_string(), toml::Value::Array(rows));

    Ok(toml::to_string(&doc)?)
}

pub fn write_sheet(path: &Path, title: Option<&str>, columns: &[ColumnSpec], rows: &[Row]) -> Result<()> {
    let content = sheet_to_string(title, columns, rows)?;
    std::fs::write(path, content)?;
    tracing::info!(path = %path.display(), rows = rows.len(), "sheet saved");
    Ok(())
}
