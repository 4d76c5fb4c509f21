//! Storage for TOML sheet files and CSV export

mod csv;
mod sheet;

pub use csv::{write_csv, write_csv_to};
pub use sheet::{Sheet, parse_sheet, parse_sheet_str, sheet_to_string, write_sheet};
