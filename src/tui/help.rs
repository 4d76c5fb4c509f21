//! Help text content for the help modal

pub fn get_help_text() -> Vec<String> {
    vec![
        "Navigation:",
        "  Arrow keys   Move cursor",
        "  Tab          Next column",
        "  Mouse        Click a cell to edit it",
        "",
        "Editing:",
        "  Enter/Space  Edit cell (toggle a checkbox)",
        "  Tab/Enter    Commit and move to the next editable cell",
        "  Esc          Revert the cell",
        "  Up/Down      Commit and move (cycle options in a list)",
        "",
        "Rows:",
        "  o            Insert rows at the end",
        "  d / Delete   Delete the row under the cursor",
        "  S            Add a subtotal for the rows above",
        "",
        "Columns:",
        "  s            Sort by column (asc, desc, off)",
        "  +/-          Adjust column width",
        "  Drag header edge to resize",
        "",
        "Other:",
        "  Ctrl+S       Save sheet",
        "  ?            Toggle this help",
        "  q            Quit",
    ]
    .into_iter()
    .map(str::to_string)
    .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_help_mentions_every_command_key() {
        let text = get_help_text().join("\n");
        for key in ["Ctrl+S", "  s ", "  S ", "  o ", "+/-", "Esc"] {
            assert!(text.contains(key), "help is missing {:?}", key);
        }
    }
}
