use crossterm::event::{self, Event, KeyCode, KeyEventKind, MouseButton, MouseEvent, MouseEventKind};
use ratatui::prelude::*;
use std::io;

use super::actions::{ApplyResult, apply_action};
use super::app::{App, UNITS_PER_CELL};
use super::keymap::{Context, translate};
use super::ui::{self, GridHit};

/// Pointer x in width units, so drags move widths in whole cells.
fn pointer_units(x: u16) -> i32 {
    i32::from(x) * UNITS_PER_CELL as i32
}

pub(crate) fn handle_mouse_event(app: &mut App, terminal_area: Rect, mouse: MouseEvent) {
    if app.help_modal {
        return;
    }
    let [_cell_bar, grid_area, _status_area] = ui::split_main_chunks(terminal_area);

    match mouse.kind {
        MouseEventKind::Down(MouseButton::Left) => {
            match ui::hit_test(app, grid_area, mouse.column, mouse.row) {
                GridHit::ResizeHandle(column) => {
                    app.grid
                        .widths_mut()
                        .pointer_down(column, pointer_units(mouse.column));
                }
                GridHit::Header(column) => app.toggle_sort(column),
                GridHit::Cell { row, column } => app.click_cell(row, column),
                GridHit::Gap => {}
                GridHit::Outside => app.blur(),
            }
        }
        MouseEventKind::Drag(MouseButton::Left) => {
            if let Some(width) = app.grid.widths_mut().pointer_move(pointer_units(mouse.column)) {
                app.status_message = format!("Column width {}", width);
            }
        }
        MouseEventKind::Up(MouseButton::Left) => {
            if let Some((column, width)) = app.grid.widths_mut().pointer_up(pointer_units(mouse.column)) {
                tracing::debug!(column, width, "column drag finished");
            }
        }
        _ => {}
    }
}

pub fn run_app<B: Backend>(terminal: &mut Terminal<B>, app: &mut App) -> io::Result<()> {
    loop {
        let view = app.grid.render();
        let mut drawn = Vec::new();
        terminal.draw(|f| drawn = ui::draw(f, app, &view))?;

        // Focus waiting on freshly appended rows lands once they are on screen.
        if app.settle_view(&drawn) {
            continue;
        }

        match event::read()? {
            Event::Key(key) => {
                // Only process key press events (Windows reports Press + Release)
                if key.kind != KeyEventKind::Press {
                    continue;
                }

                // Help modal takes over input
                if app.help_modal {
                    match key.code {
                        KeyCode::Esc | KeyCode::Char('q') | KeyCode::Char('?') => {
                            app.close_help_modal();
                        }
                        KeyCode::Down => app.scroll_help_by(1),
                        KeyCode::Up => app.scroll_help_by(-1),
                        KeyCode::PageDown => app.scroll_help_by(12),
                        KeyCode::PageUp => app.scroll_help_by(-12),
                        _ => {}
                    }
                    continue;
                }

                app.status_message.clear();
                let context = match app.editing_kind() {
                    Some(kind) => Context::Edit(kind),
                    None => Context::Navigate,
                };
                if let Some(action) = translate(context, key)
                    && apply_action(app, action) == ApplyResult::Quit
                {
                    return Ok(());
                }
            }
            Event::Mouse(mouse) => {
                let size = terminal.size()?;
                handle_mouse_event(app, Rect::new(0, 0, size.width, size.height), mouse);
            }
            Event::FocusLost => {
                // A drag that leaves the window never sees its pointer-up.
                app.grid.widths_mut().end_drag();
            }
            _ => {}
        }
    }
}
