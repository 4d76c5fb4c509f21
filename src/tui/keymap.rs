//! Keymap translation layer.
//!
//! Keeps key handling separate from app behavior. While a cell is being
//! edited most keys go to the grid; otherwise they drive the cursor and the
//! grid-level commands.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ledgergrid_core::{ColumnType, EditInput, GridKey};

/// What the keyboard is currently talking to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Context {
    /// Moving around; nothing is being edited.
    Navigate,
    /// A cell of this type is being edited.
    Edit(ColumnType),
}

/// Every action a key can trigger.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Action {
    Move(i32, i32),
    /// Click the cell under the cursor.
    Click,
    /// Click outside the grid.
    Blur,
    ToggleSort,
    AddSubtotal,
    InsertRows,
    DeleteRow,
    IncColWidth,
    DecColWidth,
    Save,
    ToggleHelp,
    Quit,
    /// Keystroke for the editable cell.
    Input(EditInput),
    /// Tab, Enter or Escape for the editable cell.
    Key(GridKey),
}

pub fn status_hint() -> &'static str {
    "arrows:move  Enter:edit  s:sort  S:subtotal  o:insert  d:delete  +/-:width  C-s:save  ?:help  q:quit"
}

/// Translate a key event to an action.
///
/// Returns `None` if the key has no binding in the current context.
pub fn translate(context: Context, key: KeyEvent) -> Option<Action> {
    if key.modifiers.contains(KeyModifiers::CONTROL) {
        return match key.code {
            KeyCode::Char('s') => Some(Action::Save),
            KeyCode::Char('c') => Some(Action::Quit),
            _ => None,
        };
    }
    match context {
        Context::Navigate => translate_navigate(key),
        Context::Edit(kind) => translate_edit(kind, key),
    }
}

fn translate_navigate(key: KeyEvent) -> Option<Action> {
    let action = match key.code {
        KeyCode::Left => Action::Move(-1, 0),
        KeyCode::Right | KeyCode::Tab => Action::Move(1, 0),
        KeyCode::Up => Action::Move(0, -1),
        KeyCode::Down => Action::Move(0, 1),
        KeyCode::Enter | KeyCode::Char(' ') => Action::Click,
        KeyCode::Esc => Action::Blur,
        KeyCode::Char('s') => Action::ToggleSort,
        KeyCode::Char('S') => Action::AddSubtotal,
        KeyCode::Char('o') => Action::InsertRows,
        KeyCode::Char('d') | KeyCode::Delete => Action::DeleteRow,
        KeyCode::Char('+') | KeyCode::Char('=') => Action::IncColWidth,
        KeyCode::Char('-') => Action::DecColWidth,
        KeyCode::Char('?') => Action::ToggleHelp,
        KeyCode::Char('q') => Action::Quit,
        _ => return None,
    };
    Some(action)
}

fn translate_edit(kind: ColumnType, key: KeyEvent) -> Option<Action> {
    let action = match (kind, key.code) {
        (_, KeyCode::Tab) => Action::Key(GridKey::Tab),
        (_, KeyCode::Enter) => Action::Key(GridKey::Enter),
        (_, KeyCode::Esc) => Action::Key(GridKey::Escape),
        (ColumnType::Checkbox, KeyCode::Char(' ')) => Action::Input(EditInput::Toggle),
        (ColumnType::Listbox, KeyCode::Left | KeyCode::Up) => {
            Action::Input(EditInput::PreviousOption)
        }
        (ColumnType::Listbox, KeyCode::Right | KeyCode::Down) => {
            Action::Input(EditInput::NextOption)
        }
        (_, KeyCode::Up) => Action::Move(0, -1),
        (_, KeyCode::Down) => Action::Move(0, 1),
        (_, KeyCode::Backspace) => Action::Input(EditInput::Backspace),
        (_, KeyCode::Char(c)) => Action::Input(EditInput::Char(c)),
        _ => return None,
    };
    Some(action)
}
