use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseEvent, MouseEventKind};
use folio_core::ContactField;

use crate::app::{point_in_rect, App, Screen};
use crate::tui::AppEvent;

/// Convert a character index to a byte index for UTF-8 safe string operations
fn char_to_byte_index(s: &str, char_idx: usize) -> usize {
    s.char_indices()
        .nth(char_idx)
        .map(|(i, _)| i)
        .unwrap_or(s.len())
}

pub async fn handle_event(app: &mut App, event: AppEvent) -> Result<()> {
    match event {
        AppEvent::Key(key) => handle_key(app, key),
        AppEvent::Mouse(mouse) => handle_mouse(app, mouse),
        AppEvent::Resize(_, _) => {}
        AppEvent::Frame(now) => app.on_frame(now),
    }
    Ok(())
}

fn handle_key(app: &mut App, key: KeyEvent) {
    // Global keys that work in any mode
    if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
        app.should_quit = true;
        return;
    }

    if app.assistant.is_open() {
        handle_assistant_key(app, key);
        return;
    }

    match app.screen {
        Screen::Home => handle_home_key(app, key),
        Screen::Contact => handle_contact_key(app, key),
    }
}

fn handle_home_key(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Char('q') => app.should_quit = true,
        KeyCode::Char('a') => app.toggle_assistant(),
        KeyCode::Char('m') => app.open_contact(),
        KeyCode::Char('o') => {
            if let Some(logo) = app.centre_logo().cloned() {
                app.open_logo(logo);
            }
        }
        KeyCode::Esc => app.status = None,
        _ => {}
    }
}

fn handle_assistant_key(app: &mut App, key: KeyEvent) {
    if key.code == KeyCode::Esc {
        app.escape_assistant();
        return;
    }

    // Keystrokes before focus settles do not reach the input
    if !app.assistant.is_input_focused() {
        if key.code == KeyCode::Char('a') {
            app.toggle_assistant();
        }
        return;
    }

    match key.code {
        KeyCode::Enter => {
            app.submit_chat();
        }
        KeyCode::Backspace => {
            if app.chat_cursor > 0 {
                app.chat_cursor -= 1;
                let byte_idx = char_to_byte_index(&app.chat_input, app.chat_cursor);
                app.chat_input.remove(byte_idx);
            }
        }
        KeyCode::Delete => {
            if app.chat_cursor < app.chat_input.chars().count() {
                let byte_idx = char_to_byte_index(&app.chat_input, app.chat_cursor);
                app.chat_input.remove(byte_idx);
            }
        }
        KeyCode::Left => {
            app.chat_cursor = app.chat_cursor.saturating_sub(1);
        }
        KeyCode::Right => {
            if app.chat_cursor < app.chat_input.chars().count() {
                app.chat_cursor += 1;
            }
        }
        KeyCode::Home => app.chat_cursor = 0,
        KeyCode::End => app.chat_cursor = app.chat_input.chars().count(),
        KeyCode::Up => app.chat_scroll = app.chat_scroll.saturating_sub(1),
        KeyCode::Down => app.chat_scroll = app.chat_scroll.saturating_add(1),
        KeyCode::Char(c) => {
            let byte_idx = char_to_byte_index(&app.chat_input, app.chat_cursor);
            app.chat_input.insert(byte_idx, c);
            app.chat_cursor += 1;
        }
        _ => {}
    }
}

fn handle_contact_key(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Esc => {
            app.screen = Screen::Home;
            app.status = None;
        }
        KeyCode::Tab | KeyCode::Down => {
            app.contact.focus = app.contact.focus.next();
        }
        KeyCode::BackTab | KeyCode::Up => {
            app.contact.focus = app.contact.focus.prev();
        }
        KeyCode::Enter => {
            if app.contact.focus == ContactField::Message {
                app.submit_contact();
            } else {
                app.contact.focus = app.contact.focus.next();
            }
        }
        KeyCode::Backspace => {
            if app.contact.is_sending() {
                return;
            }
            app.contact.acknowledge();
            let focus = app.contact.focus;
            app.contact.form.field_mut(focus).pop();
        }
        KeyCode::Char(c) => {
            if app.contact.is_sending() {
                return;
            }
            app.contact.acknowledge();
            let focus = app.contact.focus;
            app.contact.form.field_mut(focus).push(c);
        }
        _ => {}
    }
}

fn handle_mouse(app: &mut App, mouse: MouseEvent) {
    let x = mouse.column;
    let y = mouse.row;

    match mouse.kind {
        MouseEventKind::Moved | MouseEventKind::Drag(_) => {
            app.hover_marquee(x, y);
        }
        MouseEventKind::Down(MouseButton::Left) => {
            if let Some(logo) = app.logo_at_point(x, y).cloned() {
                app.open_logo(logo);
            }
        }
        MouseEventKind::ScrollDown => {
            if app.assistant.is_open() && in_chat(app, x, y) {
                app.chat_scroll = app.chat_scroll.saturating_add(3);
            }
        }
        MouseEventKind::ScrollUp => {
            if app.assistant.is_open() && in_chat(app, x, y) {
                app.chat_scroll = app.chat_scroll.saturating_sub(3);
            }
        }
        _ => {}
    }
}

fn in_chat(app: &App, x: u16, y: u16) -> bool {
    app.chat_area.map(|r| point_in_rect(x, y, r)).unwrap_or(false)
}
