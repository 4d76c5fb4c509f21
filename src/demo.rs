//! Built-in invoice shown when no sheet is given.

use crate::error::Result;
use crate::storage::{Sheet, parse_sheet_str};

pub(crate) const DEMO_SHEET: &str = r#"
title = "Invoice"

[[columns]]
id = "item"
header = "Item"
type = "readonly"
width = 96

[[columns]]
id = "description"
header = "Description"
type = "string"
width = 200

[[columns]]
id = "unit"
header = "Unit"
type = "listbox"
width = 64
options = [
  { value = "h", label = "Hours" },
  { value = "d", label = "Days" },
  { value = "pc", label = "Pieces" },
]

[[columns]]
id = "qty"
header = "Qty"
type = "number"
width = 56

[[columns]]
id = "rate"
header = "Rate"
type = "rate"
width = 80

[[columns]]
id = "amount"
header = "Amount"
type = "amount"
width = 96

[[columns]]
id = "billable"
header = "Bill"
type = "checkbox"
width = 40

[[columns]]
id = "delete"
header = ""
type = "action"
width = 32

[[rows]]
item = "P1"
description = "Site survey"
unit = "d"
qty = 2
rate = "10.00"
billable = true

[[rows]]
item = "P2"
description = "Cabling"
unit = "h"
qty = 3
rate = "5.00"
billable = true

[[rows]]
is_subtotal = true

[[rows]]
item = "P3"
description = "Patch panels"
unit = "pc"
qty = 4
rate = "12.50"
billable = false
"#;

pub fn demo_sheet() -> Result<Sheet> {
    parse_sheet_str(DEMO_SHEET)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_demo_sheet_parses() {
        let sheet = demo_sheet().unwrap();
        assert_eq!(sheet.columns.len(), 8);
        assert_eq!(sheet.rows.len(), 4);
        assert!(sheet.rows[2].is_subtotal());
    }
}
