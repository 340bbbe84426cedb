use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use super::app::{App, Form, Pane, UiError};
use crate::model::ListId;

/// Result of handling a key press.
#[derive(Debug, PartialEq, Eq)]
pub enum KeyAction {
    Quit,
    /// Submit the login modal.
    Auth,
    /// The selected list changed and must be sent to the server.
    SaveList,
    DeleteList(ListId),
    Reload,
    Continue,
}

/// Handle a key press. Returns an action indicating what the event loop
/// should do, or the selection error that aborted the interaction.
pub fn handle_key(app: &mut App, key: KeyEvent) -> Result<KeyAction, UiError> {
    if app.show_help {
        if matches!(key.code, KeyCode::Char('?') | KeyCode::Esc | KeyCode::Char('q')) {
            app.show_help = false;
        }
        return Ok(KeyAction::Continue);
    }
    if app.login_visible() {
        return Ok(handle_login(app, key));
    }
    if app.form.is_some() {
        return handle_form(app, key);
    }

    match key.code {
        KeyCode::Char('q') | KeyCode::Esc => Ok(KeyAction::Quit),
        KeyCode::Char('j') | KeyCode::Down => {
            app.move_down();
            Ok(KeyAction::Continue)
        }
        KeyCode::Char('k') | KeyCode::Up => {
            app.move_up();
            Ok(KeyAction::Continue)
        }
        KeyCode::Tab | KeyCode::Char('h') | KeyCode::Char('l') | KeyCode::Left | KeyCode::Right => {
            app.toggle_focus();
            Ok(KeyAction::Continue)
        }
        KeyCode::Enter => {
            match app.focus {
                Pane::Manager => {
                    if let Some(id) = app.list_under_cursor() {
                        app.change_task_list(id)?;
                        app.focus = Pane::List;
                    }
                }
                Pane::List => {
                    if let Some(id) = app.task_under_cursor() {
                        app.change_task(id)?;
                    }
                }
            }
            Ok(KeyAction::Continue)
        }
        KeyCode::Char('x') => {
            app.done()?;
            Ok(KeyAction::SaveList)
        }
        KeyCode::Char('d') => {
            app.delete_task()?;
            Ok(KeyAction::SaveList)
        }
        KeyCode::Char('D') => {
            let id = app.selected_list().ok_or(UiError::NoListSelected)?.id();
            Ok(KeyAction::DeleteList(id))
        }
        KeyCode::Char('a') => {
            app.open_task_form();
            Ok(KeyAction::Continue)
        }
        KeyCode::Char('L') => {
            app.open_list_form();
            Ok(KeyAction::Continue)
        }
        KeyCode::Char('t') => {
            app.switch_theme();
            Ok(KeyAction::Continue)
        }
        KeyCode::Char('r') => Ok(KeyAction::Reload),
        KeyCode::Char('?') => {
            app.show_help = true;
            Ok(KeyAction::Continue)
        }
        _ => Ok(KeyAction::Continue),
    }
}

fn handle_login(app: &mut App, key: KeyEvent) -> KeyAction {
    if key.code == KeyCode::Esc {
        return KeyAction::Quit;
    }
    if key.code == KeyCode::Enter {
        return KeyAction::Auth;
    }
    let Some(form) = app.login_form_mut() else {
        return KeyAction::Continue;
    };
    match key.code {
        KeyCode::Tab | KeyCode::BackTab | KeyCode::Up | KeyCode::Down => form.next_field(),
        KeyCode::Backspace => {
            form.focused_buf_mut().pop();
        }
        KeyCode::Char('u') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            form.focused_buf_mut().clear();
        }
        KeyCode::Char(c) => form.focused_buf_mut().push(c),
        _ => {}
    }
    KeyAction::Continue
}

fn handle_form(app: &mut App, key: KeyEvent) -> Result<KeyAction, UiError> {
    match key.code {
        KeyCode::Esc => {
            app.close_form();
            return Ok(KeyAction::Continue);
        }
        KeyCode::Enter => {
            let changed = if matches!(app.form, Some(Form::Task(_))) {
                app.submit_task_form()?
            } else {
                app.submit_list_form()
            };
            return Ok(if changed {
                KeyAction::SaveList
            } else {
                KeyAction::Continue
            });
        }
        _ => {}
    }

    let buf = match &mut app.form {
        Some(Form::Task(form)) => match key.code {
            KeyCode::Tab | KeyCode::Down => {
                form.next_field();
                return Ok(KeyAction::Continue);
            }
            KeyCode::BackTab | KeyCode::Up => {
                form.prev_field();
                return Ok(KeyAction::Continue);
            }
            _ => form.focused_buf_mut(),
        },
        Some(Form::List(name)) => name,
        None => return Ok(KeyAction::Continue),
    };
    match key.code {
        KeyCode::Backspace => {
            buf.pop();
        }
        KeyCode::Char('u') if key.modifiers.contains(KeyModifiers::CONTROL) => buf.clear(),
        KeyCode::Char(c) => buf.push(c),
        _ => {}
    }
    Ok(KeyAction::Continue)
}
