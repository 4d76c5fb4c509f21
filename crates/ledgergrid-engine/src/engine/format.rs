//! Input filtering and display formatting per column type.

use regex::Regex;
use std::sync::LazyLock;

use super::column::{ColumnSpec, ColumnType, InputFilter};
use super::value::CellValue;

/// Largest value a numeric cell accepts while typing; larger input is clamped.
pub const MAX_NUMERIC_INPUT: f64 = 99999.0;

pub const CHECKED_ICON: &str = "☑";
pub const UNCHECKED_ICON: &str = "☐";
pub const DELETE_ICON: &str = "✕";

static NUMERIC_LOOKING: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*-?(\d+\.?\d*|\.\d+)\s*$").expect("static regex is valid")
});

/// Round half away from zero to two decimals.
pub fn round2(n: f64) -> f64 {
    (n * 100.0).round() / 100.0
}

/// Fixed two-decimal rendering used for amounts and subtotals.
pub fn format_amount(n: f64) -> String {
    let rounded = round2(n);
    // Avoid "-0.00" for values that round to zero.
    if rounded == 0.0 {
        "0.00".to_string()
    } else {
        format!("{:.2}", rounded)
    }
}

/// Up to `max_fraction` decimals, trailing zeros dropped.
pub fn format_trimmed(n: f64, max_fraction: usize) -> String {
    let s = format!("{:.*}", max_fraction, n);
    if s.contains('.') {
        let s = s.trim_end_matches('0').trim_end_matches('.');
        if s == "-0" { "0".to_string() } else { s.to_string() }
    } else {
        s
    }
}

pub fn looks_numeric(s: &str) -> bool {
    NUMERIC_LOOKING.is_match(s)
}

/// Filter a keystroke-by-keystroke buffer for a column type.
///
/// Free-text columns pass through untouched. Numeric columns keep only the
/// characters they accept, collapse redundant leading zeros, turn an empty or
/// lone "." buffer into "0" and clamp the value to [`MAX_NUMERIC_INPUT`].
pub fn live_format(kind: ColumnType, input: &str) -> String {
    let formatted = match kind.input_filter() {
        InputFilter::Digits => format_digits(input),
        InputFilter::Decimal { max_fraction } => format_decimal(input, max_fraction),
        _ => return input.to_string(),
    };
    if formatted != input {
        tracing::trace!(column_type = kind.name(), input, formatted = %formatted, "filtered input");
    }
    formatted
}

fn collapse_leading_zeros(int_part: &str) -> &str {
    let trimmed = int_part.trim_start_matches('0');
    if trimmed.is_empty() { "0" } else { trimmed }
}

fn clamp_numeric(formatted: String) -> String {
    let value = formatted
        .trim_end_matches('.')
        .parse::<f64>()
        .unwrap_or(0.0);
    if value > MAX_NUMERIC_INPUT {
        tracing::debug!(value, "numeric input clamped");
        format_trimmed(MAX_NUMERIC_INPUT, 0)
    } else {
        formatted
    }
}

fn format_digits(input: &str) -> String {
    let digits: String = input.chars().filter(|c| c.is_ascii_digit()).collect();
    clamp_numeric(collapse_leading_zeros(&digits).to_string())
}

fn format_decimal(input: &str, max_fraction: usize) -> String {
    let mut int_part = String::new();
    let mut frac_part = String::new();
    let mut seen_dot = false;
    for c in input.chars() {
        match c {
            '0'..='9' if seen_dot => {
                if frac_part.len() < max_fraction {
                    frac_part.push(c);
                }
            }
            '0'..='9' => int_part.push(c),
            '.' if !seen_dot => seen_dot = true,
            _ => {}
        }
    }

    if int_part.is_empty() && frac_part.is_empty() {
        // "" and "." both mean zero.
        return "0".to_string();
    }

    let mut out = collapse_leading_zeros(&int_part).to_string();
    if seen_dot {
        out.push('.');
        out.push_str(&frac_part);
    }
    clamp_numeric(out)
}

/// Normalize an edit buffer into the value stored when the edit is committed.
///
/// Numeric columns store numbers (integer for `number`, float for `rate`); a
/// trailing decimal point is dropped and empty input becomes zero. Other
/// columns store what was typed.
pub fn commit_value(kind: ColumnType, input: &str) -> CellValue {
    match kind.input_filter() {
        InputFilter::Digits | InputFilter::Decimal { .. } => {
            let formatted = live_format(kind, input);
            let text = formatted.trim_end_matches('.');
            let n = if text.is_empty() {
                0.0
            } else {
                text.parse::<f64>().unwrap_or(0.0)
            };
            if kind.input_filter() == InputFilter::Digits {
                CellValue::Number(n.trunc())
            } else {
                CellValue::Number(n)
            }
        }
        _ => CellValue::text(input),
    }
}

/// Text shown for a cell that is not being edited.
pub fn display_value(column: &ColumnSpec, value: Option<&CellValue>) -> String {
    let empty = CellValue::default();
    let value = value.unwrap_or(&empty);
    match column.kind {
        ColumnType::Readonly => display_readonly(value),
        ColumnType::String => value.to_string(),
        ColumnType::Number => format_trimmed(value.as_number_or_zero().trunc(), 0),
        ColumnType::Rate => format_trimmed(value.as_number_or_zero(), 3),
        ColumnType::Amount => format_amount(value.as_number_or_zero()),
        ColumnType::Checkbox => {
            if value.as_bool() {
                CHECKED_ICON.to_string()
            } else {
                UNCHECKED_ICON.to_string()
            }
        }
        ColumnType::Action => DELETE_ICON.to_string(),
        ColumnType::Listbox => column
            .option_label(value)
            .map(str::to_string)
            .unwrap_or_else(|| value.to_string()),
    }
}

/// Readonly rendering: numbers and numeric-looking text get two decimals,
/// anything else shows as stored.
pub fn display_readonly(value: &CellValue) -> String {
    match value {
        CellValue::Number(n) => format_amount(*n),
        CellValue::Text(s) if looks_numeric(s) => format_amount(value.as_number_or_zero()),
        _ => value.to_string(),
    }
}

/// Text used when the edit buffer is first opened on a cell.
pub fn edit_text(column: &ColumnSpec, value: Option<&CellValue>) -> String {
    match column.kind {
        ColumnType::Number | ColumnType::Rate => display_value(column, value),
        _ => value.map(|v| v.to_string()).unwrap_or_default(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_digits_strip_and_collapse() {
        assert_eq!(live_format(ColumnType::Number, "0012a3"), "123");
        assert_eq!(live_format(ColumnType::Number, "000"), "0");
        assert_eq!(live_format(ColumnType::Number, ""), "0");
        assert_eq!(live_format(ColumnType::Number, "1.5"), "15");
    }

    #[test]
    fn test_digits_clamp() {
        assert_eq!(live_format(ColumnType::Number, "123456"), "99999");
        assert_eq!(live_format(ColumnType::Number, "99999"), "99999");
    }

    #[test]
    fn test_decimal_single_dot_and_fraction_cap() {
        assert_eq!(live_format(ColumnType::Rate, "1.2.3"), "1.23");
        assert_eq!(live_format(ColumnType::Rate, "2.34567"), "2.345");
        assert_eq!(live_format(ColumnType::Rate, "0."), "0.");
        assert_eq!(live_format(ColumnType::Rate, "00.5"), "0.5");
        assert_eq!(live_format(ColumnType::Rate, ".5"), "0.5");
        assert_eq!(live_format(ColumnType::Rate, "."), "0");
        assert_eq!(live_format(ColumnType::Rate, ""), "0");
        assert_eq!(live_format(ColumnType::Rate, "007"), "7");
        assert_eq!(live_format(ColumnType::Rate, "x9y"), "9");
    }

    #[test]
    fn test_decimal_clamp() {
        assert_eq!(live_format(ColumnType::Rate, "100000.5"), "99999");
        assert_eq!(live_format(ColumnType::Rate, "99999.5"), "99999");
    }

    #[test]
    fn test_free_text_untouched() {
        assert_eq!(live_format(ColumnType::String, " 00x. "), " 00x. ");
    }

    #[test]
    fn test_commit_value() {
        assert_eq!(commit_value(ColumnType::Number, "42"), CellValue::Number(42.0));
        assert_eq!(commit_value(ColumnType::Rate, "2.5."), CellValue::Number(2.5));
        assert_eq!(commit_value(ColumnType::Rate, "3."), CellValue::Number(3.0));
        assert_eq!(commit_value(ColumnType::Rate, ""), CellValue::Number(0.0));
        assert_eq!(commit_value(ColumnType::Number, "abc"), CellValue::Number(0.0));
        assert_eq!(commit_value(ColumnType::String, "abc"), CellValue::text("abc"));
    }

    #[test]
    fn test_format_amount() {
        assert_eq!(format_amount(20.0), "20.00");
        assert_eq!(format_amount(0.1 + 0.2), "0.30");
        assert_eq!(format_amount(-0.001), "0.00");
    }

    #[test]
    fn test_display_per_type() {
        let readonly = ColumnSpec::new("id", "Id", ColumnType::Readonly);
        assert_eq!(display_value(&readonly, Some(&CellValue::text("P1"))), "P1");
        assert_eq!(display_value(&readonly, Some(&CellValue::text("12.5"))), "12.50");

        let number = ColumnSpec::new("qty", "Qty", ColumnType::Number);
        assert_eq!(display_value(&number, Some(&CellValue::Number(2.0))), "2");
        assert_eq!(display_value(&number, Some(&CellValue::text("junk"))), "0");

        let rate = ColumnSpec::new("rate", "Rate", ColumnType::Rate);
        assert_eq!(display_value(&rate, Some(&CellValue::text("10.00"))), "10");
        assert_eq!(display_value(&rate, Some(&CellValue::Number(2.125))), "2.125");

        assert_eq!(display_readonly(&CellValue::text("INV-7")), "INV-7");
        assert_eq!(display_readonly(&CellValue::Number(4.5)), "4.50");

        let amount = ColumnSpec::new("amount", "Amount", ColumnType::Amount);
        assert_eq!(display_value(&amount, Some(&CellValue::text("35"))), "35.00");

        let check = ColumnSpec::new("ok", "Ok", ColumnType::Checkbox);
        assert_eq!(display_value(&check, Some(&CellValue::Bool(false))), UNCHECKED_ICON);

        let action = ColumnSpec::new("del", "", ColumnType::Action);
        assert_eq!(display_value(&action, None), DELETE_ICON);
    }

    #[test]
    fn test_looks_numeric() {
        assert!(looks_numeric("12"));
        assert!(looks_numeric("-3.5"));
        assert!(looks_numeric(".5"));
        assert!(!looks_numeric("P1"));
        assert!(!looks_numeric(""));
    }
}
