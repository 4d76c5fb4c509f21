//! Column type contract.
//!
//! Every column carries a [`ColumnType`]. What a type permits (editing, sorting,
//! numeric comparison, default value, accepted keystrokes) lives in a single
//! static table, [`TypeRules`], looked up by type instead of being spread across
//! the callers.

use serde::{Deserialize, Serialize};

use super::value::CellValue;

/// Default column width, in width units.
pub const DEFAULT_COLUMN_WIDTH: u32 = 120;

/// The closed set of column kinds a grid understands.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColumnType {
    String,
    Number,
    Rate,
    Amount,
    Readonly,
    Checkbox,
    Action,
    Listbox,
}

/// Value a freshly inserted row gets in a column.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DefaultValue {
    Zero,
    Checked,
    Empty,
}

/// Which keystrokes a column accepts while its cell is being edited.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InputFilter {
    /// Anything goes.
    FreeText,
    /// Digits only, integer result.
    Digits,
    /// Digits and a single decimal point.
    Decimal { max_fraction: usize },
    /// Boolean toggle, no text input.
    Toggle,
    /// Cycles through configured options, no text input.
    Choice,
    /// The cell never becomes editable.
    Locked,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TypeRules {
    pub editable: bool,
    pub sortable: bool,
    pub numeric: bool,
    pub default: DefaultValue,
    pub input: InputFilter,
}

const fn rules(
    editable: bool,
    sortable: bool,
    numeric: bool,
    default: DefaultValue,
    input: InputFilter,
) -> TypeRules {
    TypeRules {
        editable,
        sortable,
        numeric,
        default,
        input,
    }
}

// Indexed by `ColumnType as usize`; keep in declaration order.
static TYPE_RULES: [TypeRules; 8] = [
    // String
    rules(true, true, false, DefaultValue::Empty, InputFilter::FreeText),
    // Number
    rules(true, true, true, DefaultValue::Zero, InputFilter::Digits),
    // Rate
    rules(
        true,
        true,
        true,
        DefaultValue::Zero,
        InputFilter::Decimal { max_fraction: 3 },
    ),
    // Amount
    rules(false, true, true, DefaultValue::Zero, InputFilter::Locked),
    // Readonly
    rules(false, true, false, DefaultValue::Empty, InputFilter::Locked),
    // Checkbox
    rules(true, false, false, DefaultValue::Checked, InputFilter::Toggle),
    // Action
    rules(false, false, false, DefaultValue::Empty, InputFilter::Locked),
    // Listbox
    rules(true, true, false, DefaultValue::Empty, InputFilter::Choice),
];

impl ColumnType {
    pub const ALL: [ColumnType; 8] = [
        ColumnType::String,
        ColumnType::Number,
        ColumnType::Rate,
        ColumnType::Amount,
        ColumnType::Readonly,
        ColumnType::Checkbox,
        ColumnType::Action,
        ColumnType::Listbox,
    ];

    pub fn rules(self) -> &'static TypeRules {
        &TYPE_RULES[self as usize]
    }

    pub fn is_editable(self) -> bool {
        self.rules().editable
    }

    pub fn is_sortable(self) -> bool {
        self.rules().sortable
    }

    pub fn is_numeric(self) -> bool {
        self.rules().numeric
    }

    pub fn input_filter(self) -> InputFilter {
        self.rules().input
    }

    pub fn default_value(self) -> CellValue {
        match self.rules().default {
            DefaultValue::Zero => CellValue::Number(0.0),
            DefaultValue::Checked => CellValue::Bool(true),
            DefaultValue::Empty => CellValue::default(),
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            ColumnType::String => "string",
            ColumnType::Number => "number",
            ColumnType::Rate => "rate",
            ColumnType::Amount => "amount",
            ColumnType::Readonly => "readonly",
            ColumnType::Checkbox => "checkbox",
            ColumnType::Action => "action",
            ColumnType::Listbox => "listbox",
        }
    }
}

/// One choice of a listbox column.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "ListOptionRepr")]
pub struct ListOption {
    pub value: String,
    pub label: String,
}

/// Options may be written as a bare string (value doubles as label) or as a
/// `{ value, label }` table.
#[derive(Deserialize)]
#[serde(untagged)]
enum ListOptionRepr {
    Bare(String),
    Full { value: String, label: Option<String> },
}

impl From<ListOptionRepr> for ListOption {
    fn from(repr: ListOptionRepr) -> Self {
        match repr {
            ListOptionRepr::Bare(value) => ListOption::new(&value, &value),
            ListOptionRepr::Full { value, label } => {
                let label = label.unwrap_or_else(|| value.clone());
                ListOption { value, label }
            }
        }
    }
}

impl ListOption {
    pub fn new(value: &str, label: &str) -> ListOption {
        ListOption {
            value: value.to_string(),
            label: label.to_string(),
        }
    }
}

/// Column configuration supplied by the caller.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ColumnSpec {
    pub id: String,
    #[serde(default)]
    pub header: String,
    #[serde(rename = "type")]
    pub kind: ColumnType,
    #[serde(default = "default_width")]
    pub width: u32,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<ListOption>,
}

fn default_width() -> u32 {
    DEFAULT_COLUMN_WIDTH
}

impl ColumnSpec {
    pub fn new(id: &str, header: &str, kind: ColumnType) -> ColumnSpec {
        ColumnSpec {
            id: id.to_string(),
            header: header.to_string(),
            kind,
            width: DEFAULT_COLUMN_WIDTH,
            options: Vec::new(),
        }
    }

    pub fn with_width(mut self, width: u32) -> ColumnSpec {
        self.width = width;
        self
    }

    pub fn with_options(mut self, options: Vec<ListOption>) -> ColumnSpec {
        self.options = options;
        self
    }

    /// Label of the option matching `value`, if any.
    pub fn option_label(&self, value: &CellValue) -> Option<&str> {
        let key = value.to_string();
        self.options
            .iter()
            .find(|opt| opt.value == key)
            .map(|opt| opt.label.as_str())
    }

    /// Position of `value` among the options, if present.
    pub fn option_index(&self, value: &CellValue) -> Option<usize> {
        let key = value.to_string();
        self.options.iter().position(|opt| opt.value == key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rules_table_matches_declaration_order() {
        for kind in ColumnType::ALL {
            let rules = kind.rules();
            match kind {
                ColumnType::Amount | ColumnType::Readonly | ColumnType::Action => {
                    assert!(!rules.editable, "{} must not be editable", kind.name());
                    assert_eq!(rules.input, InputFilter::Locked);
                }
                _ => assert!(rules.editable, "{} must be editable", kind.name()),
            }
        }
        assert_eq!(
            ColumnType::Rate.input_filter(),
            InputFilter::Decimal { max_fraction: 3 }
        );
    }

    #[test]
    fn test_sortable_excludes_action_and_checkbox() {
        let unsortable: Vec<_> = ColumnType::ALL
            .into_iter()
            .filter(|k| !k.is_sortable())
            .collect();
        assert_eq!(unsortable, vec![ColumnType::Checkbox, ColumnType::Action]);
    }

    #[test]
    fn test_default_values() {
        assert_eq!(ColumnType::Number.default_value(), CellValue::Number(0.0));
        assert_eq!(ColumnType::Rate.default_value(), CellValue::Number(0.0));
        assert_eq!(ColumnType::Checkbox.default_value(), CellValue::Bool(true));
        assert_eq!(ColumnType::String.default_value(), CellValue::text(""));
        assert_eq!(ColumnType::Listbox.default_value(), CellValue::text(""));
    }

    #[test]
    fn test_option_lookup() {
        let col = ColumnSpec::new("unit", "Unit", ColumnType::Listbox).with_options(vec![
            ListOption::new("h", "Hours"),
            ListOption::new("d", "Days"),
        ]);
        assert_eq!(col.option_label(&CellValue::text("d")), Some("Days"));
        assert_eq!(col.option_index(&CellValue::text("h")), Some(0));
        assert_eq!(col.option_label(&CellValue::text("w")), None);
    }
}
