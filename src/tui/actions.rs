use super::app::App;
use super::keymap::Action;

/// Result of applying an action.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ApplyResult {
    Continue,
    Quit,
}

/// Apply an action to the application state.
///
/// Returns `ApplyResult::Quit` if the application should exit.
pub fn apply_action(app: &mut App, action: Action) -> ApplyResult {
    // Any other action drops a pending quit confirmation.
    if action != Action::Quit {
        app.confirm_quit = false;
    }
    match action {
        Action::Move(dx, dy) => app.move_cursor(dx, dy),
        Action::Click => app.activate(),
        Action::Blur => app.blur(),
        Action::ToggleSort => app.toggle_sort_at_cursor(),
        Action::AddSubtotal => app.add_subtotal(),
        Action::InsertRows => app.insert_rows(),
        Action::DeleteRow => app.delete_cursor_row(),
        Action::IncColWidth => app.increase_column_width(),
        Action::DecColWidth => app.decrease_column_width(),
        Action::Save => app.save_file(),
        Action::ToggleHelp => {
            app.help_modal = !app.help_modal;
            app.help_scroll = 0;
        }
        Action::Quit => {
            if app.is_modified() && !app.confirm_quit {
                app.confirm_quit = true;
                app.status_message = "Unsaved changes. Press q again to quit".to_string();
            } else {
                return ApplyResult::Quit;
            }
        }
        Action::Input(input) => app.grid.input(input),
        Action::Key(key) => {
            app.grid.key(key);
            app.sync_cursor_to_edit();
        }
    }
    ApplyResult::Continue
}
