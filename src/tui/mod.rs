pub mod app;
mod event;
pub mod view;

use std::io;
use std::time::{Duration, Instant};

use anyhow::Result;
use crossterm::event::{self as ct_event, Event, KeyEventKind};
use crossterm::execute;
use crossterm::terminal::{self, EnterAlternateScreen, LeaveAlternateScreen};
use log::{error, info};
use ratatui::prelude::*;

use crate::model::ListId;
use crate::request::{Request, Transport};
use app::{App, ToastKind};
use event::KeyAction;

/// How often the loop wakes up to expire toasts when no key is pressed.
const TICK: Duration = Duration::from_millis(200);

pub fn run<T: Transport>(app: &mut App, request: &mut Request<T>) -> Result<()> {
    if let Err(e) = request.get_config(app) {
        error!("config: {e}");
    }

    terminal::enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run_loop(&mut terminal, app, request);

    terminal::disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;

    result
}

fn run_loop<T: Transport>(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    request: &mut Request<T>,
) -> Result<()> {
    let mut dirty = true;
    loop {
        if app.notifications.expire(Instant::now()) {
            dirty = true;
        }
        if dirty {
            terminal.draw(|frame| view::render(frame, app))?;
            dirty = false;
        }

        if !ct_event::poll(TICK)? {
            continue;
        }
        match ct_event::read()? {
            Event::Key(key) if key.kind == KeyEventKind::Press => {
                dirty = true;
                let action = match event::handle_key(app, key) {
                    Ok(action) => action,
                    Err(e) => {
                        error!("key {:?}: {e}", key.code);
                        continue;
                    }
                };
                match action {
                    KeyAction::Quit => return Ok(()),
                    KeyAction::Auth => request.auth(app),
                    KeyAction::SaveList => request.save_task_list(app),
                    KeyAction::Reload => request.get_task_list_list(app),
                    KeyAction::DeleteList(id) => delete_list(app, request, id),
                    KeyAction::Continue => {}
                }
            }
            Event::Resize(..) => dirty = true,
            _ => {}
        }
    }
}

fn delete_list<T: Transport>(app: &mut App, request: &Request<T>, id: ListId) {
    let Some(name) = app.manager.list(id).map(|l| l.name.clone()) else {
        return;
    };
    match request.delete_list(app, &name) {
        Ok(true) => {
            info!("deleted list '{name}'");
            app.remove_list(id);
        }
        Ok(false) => {
            let msg = app.strings().list_not_deleted;
            app.notify(msg, ToastKind::Error);
        }
        Err(e) => error!("deleteList '{name}': {e}"),
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::i18n::Lang;
    use crate::model::TaskList;
    use crate::request::testing::FakeTransport;
    use app::Theme;

    fn app_with(names: &[&str]) -> (App, Vec<ListId>) {
        let mut app = App::new(Lang::Ru, Theme::Light, Duration::from_secs(2));
        let ids = names
            .iter()
            .map(|name| app.manager.add_list(TaskList::new(*name)).unwrap())
            .collect();
        (app, ids)
    }

    #[test]
    fn delete_list_removes_list_when_server_confirms() {
        let request = Request::new(
            FakeTransport::default().reply(200, json!({"status": "success", "message": "success"})),
        );
        let (mut app, ids) = app_with(&["Work", "Home"]);
        app.change_task_list(ids[0]).unwrap();

        delete_list(&mut app, &request, ids[0]);

        assert!(app.manager.find_by_name("Work").is_none());
        assert!(app.manager.find_by_name("Home").is_some());
        assert!(app.selected_list().is_none());
        assert_eq!(
            request.transport().calls.borrow()[0],
            ("/api/deleteList".to_string(), json!({"taskList": "Work"}))
        );
    }

    #[test]
    fn delete_list_keeps_list_and_warns_when_server_refuses() {
        let request = Request::new(
            FakeTransport::default().reply(200, json!({"status": "error", "message": "not found"})),
        );
        let (mut app, ids) = app_with(&["Work"]);

        delete_list(&mut app, &request, ids[0]);

        assert!(app.manager.find_by_name("Work").is_some());
        let expected = app.strings().list_not_deleted;
        assert!(app
            .notifications
            .iter()
            .any(|t| t.message == expected && t.kind == ToastKind::Error));
    }

    #[test]
    fn delete_list_keeps_list_on_transport_failure() {
        let request = Request::new(FakeTransport::default().fail("connection refused"));
        let (mut app, ids) = app_with(&["Work"]);

        delete_list(&mut app, &request, ids[0]);

        assert!(app.manager.find_by_name("Work").is_some());
        assert!(app.notifications.is_empty());
    }

    #[test]
    fn delete_list_ignores_unknown_id() {
        let request = Request::new(FakeTransport::default());
        let (mut app, ids) = app_with(&["Work"]);
        app.remove_list(ids[0]);

        delete_list(&mut app, &request, ids[0]);

        assert!(request.transport().calls.borrow().is_empty());
    }
}
