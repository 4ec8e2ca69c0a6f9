use crossterm::event::{
    self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseButton, MouseEvent,
    MouseEventKind,
};
use gridsheet_core::StyleOp;
use ratatui::prelude::*;
use std::io;
use std::time::Duration;

use super::app::{App, Mode};
use super::ui;

/// How long to wait for input before checking on background imports.
const EVENT_POLL_INTERVAL: Duration = Duration::from_millis(100);

fn handle_mouse_event(app: &mut App, terminal_area: Rect, mouse: MouseEvent) {
    if app.mode != Mode::Normal {
        return;
    }

    let [_formula_area, grid_area, _status_area] = ui::split_main_chunks(terminal_area);
    let target = ui::grid_cell_at(app, grid_area, mouse.column, mouse.row);
    match (mouse.kind, target) {
        (MouseEventKind::Down(MouseButton::Left), Some(cell_ref)) => app.mouse_press(cell_ref),
        (MouseEventKind::Drag(MouseButton::Left), Some(cell_ref)) => app.mouse_drag(cell_ref),
        (MouseEventKind::Up(MouseButton::Left), _) => app.mouse_release(),
        _ => {}
    }
}

/// Handle a key in normal mode. Returns true if the app should quit.
fn handle_normal_key(app: &mut App, key: KeyEvent) -> bool {
    if key.modifiers.contains(KeyModifiers::CONTROL) {
        if key.code == KeyCode::Char('r') {
            app.redo();
        }
        return false;
    }

    app.status_message.clear();
    match key.code {
        KeyCode::Left | KeyCode::Char('h') => app.move_cursor(-1, 0),
        KeyCode::Right | KeyCode::Char('l') | KeyCode::Tab => app.move_cursor(1, 0),
        KeyCode::Up | KeyCode::Char('k') => app.move_cursor(0, -1),
        KeyCode::Down | KeyCode::Char('j') => app.move_cursor(0, 1),
        KeyCode::Enter | KeyCode::Char('i') | KeyCode::F(2) => app.enter_edit_mode(),
        KeyCode::Char('=') => app.enter_formula_mode(),
        KeyCode::Char(':') => app.enter_command_mode(),
        KeyCode::Char('u') => app.undo(),
        KeyCode::Char('B') => app.apply_style(StyleOp::ToggleBold),
        KeyCode::Char('I') => app.apply_style(StyleOp::ToggleItalic),
        KeyCode::Char('U') => app.apply_style(StyleOp::Uppercase),
        KeyCode::Char('L') => app.apply_style(StyleOp::Lowercase),
        KeyCode::Char('x') | KeyCode::Delete => app.clear_current_cell(),
        KeyCode::Char('m') => app.mark_drag_source(),
        KeyCode::Char('p') => app.drop_at_cursor(),
        KeyCode::Esc => {
            app.core.clear_selection();
            app.drag_source = None;
        }
        KeyCode::Char('q') => return app.execute_command("q"),
        _ => {}
    }
    false
}

/// Handle a key while typing into the input buffer.
/// Returns true if the app should quit.
fn handle_input_key(app: &mut App, key: KeyEvent) -> bool {
    match key.code {
        KeyCode::Esc => app.cancel_input(),
        KeyCode::Enter => return app.submit_input(),
        KeyCode::Backspace => app.backspace(),
        KeyCode::Left => app.cursor_left(),
        KeyCode::Right => app.cursor_right(),
        KeyCode::Home => app.input_cursor = 0,
        KeyCode::End => app.input_cursor = app.input.len(),
        KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
            app.insert_char(c)
        }
        _ => {}
    }
    false
}

pub fn run_app<B: Backend>(terminal: &mut Terminal<B>, app: &mut App) -> io::Result<()> {
    loop {
        app.poll_imports();
        terminal.draw(|f| ui::draw(f, app))?;

        if !event::poll(EVENT_POLL_INTERVAL)? {
            continue;
        }

        match event::read()? {
            Event::Key(key) => {
                // Only process key press events (Windows reports Press + Release)
                if key.kind != KeyEventKind::Press {
                    continue;
                }
                let quit = match app.mode {
                    Mode::Normal => handle_normal_key(app, key),
                    Mode::Edit | Mode::Formula | Mode::Command => handle_input_key(app, key),
                };
                if quit {
                    return Ok(());
                }
            }
            Event::Mouse(mouse) => {
                let size = terminal.size()?;
                handle_mouse_event(app, Rect::new(0, 0, size.width, size.height), mouse);
            }
            _ => {}
        }
    }
}
