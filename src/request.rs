//! Synchronisation between the in-memory task lists and the server.
//!
//! [`Request::response`] performs a single JSON call; the other methods chain
//! calls into the operations the interface needs. Each chain runs its calls
//! one after another and logs failures instead of retrying them.

use std::time::Duration;

use log::{debug, error, info, warn};
use serde_json::{json, Value};

use crate::api::{self, Envelope, ServerConfig, TaskArray};
use crate::model::{Task, TaskList};
use crate::tui::app::{App, ToastKind};

#[derive(Debug, thiserror::Error)]
pub enum RequestError {
    #[error("HTTP error ({0})")]
    Status(u16),
    #[error("transport error: {0}")]
    Transport(String),
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("login or password is empty")]
    EmptyCredentials,
    #[error("no task list selected")]
    NoListSelected,
}

/// Raw outcome of one HTTP exchange.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpReply {
    pub status: u16,
    pub body: String,
}

impl HttpReply {
    pub fn is_ok(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Sends a JSON body to an API path with `POST`.
///
/// Non-2xx replies are returned as values; only failures to talk to the
/// server at all are errors.
pub trait Transport {
    fn post(&self, path: &str, body: &Value) -> Result<HttpReply, RequestError>;
}

/// [`Transport`] over a `ureq` agent. The agent keeps the session cookie the
/// server sets on `/api/auth`.
pub struct UreqTransport {
    base_url: String,
    agent: ureq::Agent,
}

impl UreqTransport {
    pub fn new(base_url: &str, timeout: Duration) -> Self {
        let agent = ureq::AgentBuilder::new()
            .timeout_connect(timeout)
            .timeout_read(timeout)
            .timeout_write(timeout)
            .build();
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            agent,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

impl Transport for UreqTransport {
    fn post(&self, path: &str, body: &Value) -> Result<HttpReply, RequestError> {
        let url = format!("{}{path}", self.base_url);
        debug!("POST {url}");
        match self.agent.post(&url).send_json(body) {
            Ok(resp) => {
                let status = resp.status();
                let body = resp
                    .into_string()
                    .map_err(|e| RequestError::Transport(e.to_string()))?;
                Ok(HttpReply { status, body })
            }
            Err(ureq::Error::Status(status, resp)) => Ok(HttpReply {
                status,
                body: resp.into_string().unwrap_or_default(),
            }),
            Err(ureq::Error::Transport(e)) => Err(RequestError::Transport(e.to_string())),
        }
    }
}

pub struct Request<T: Transport> {
    transport: T,
    login: Option<String>,
}

impl<T: Transport> Request<T> {
    pub fn new(transport: T) -> Self {
        Self {
            transport,
            login: None,
        }
    }

    /// The login of the authenticated session, once known.
    pub fn login(&self) -> Option<&str> {
        self.login.as_deref()
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Send one request and decode the reply envelope.
    ///
    /// A string `message` in the reply is shown as a toast whose kind follows
    /// the reply's `status`.
    pub fn response(
        &self,
        app: &mut App,
        path: &str,
        body: &Value,
    ) -> Result<Envelope, RequestError> {
        let reply = self.transport.post(path, body)?;
        if !reply.is_ok() {
            return Err(RequestError::Status(reply.status));
        }
        let envelope: Envelope = serde_json::from_str(&reply.body)?;
        if let Some(text) = envelope.text() {
            let kind = envelope
                .status
                .as_deref()
                .map(ToastKind::from_status)
                .unwrap_or(ToastKind::Info);
            app.notify(text, kind);
        }
        Ok(envelope)
    }

    /// Fetch the server configuration and act on it.
    ///
    /// If the session is already authenticated the login modal is hidden and
    /// all lists are loaded.
    pub fn get_config(&mut self, app: &mut App) -> Result<(), RequestError> {
        let envelope = self.response(app, api::CONFIG, &json!({}))?;
        let config: ServerConfig = envelope.payload().unwrap_or_else(|e| {
            warn!("unexpected config payload: {e}");
            ServerConfig::default()
        });

        if envelope.is_success() && config.color_date_alert {
            app.date_alert = true;
        }
        if let Some(login) = envelope.login {
            info!("session already authenticated as '{login}'");
            app.hide_login();
            self.login = Some(login);
            self.get_task_list_list(app);
        }
        if let Some(lang) = config.lang.as_deref() {
            app.set_lang(lang);
        }
        Ok(())
    }

    /// Authenticate with the credentials typed into the login modal, then
    /// load all lists.
    pub fn auth(&mut self, app: &mut App) {
        if let Err(e) = self.try_auth(app) {
            error!("auth: {e}");
        }
    }

    fn try_auth(&mut self, app: &mut App) -> Result<(), RequestError> {
        let (login, password) = app.credentials();
        if login.is_empty() || password.is_empty() {
            let msg = app.strings().fill_fields;
            app.notify(msg, ToastKind::Error);
            return Err(RequestError::EmptyCredentials);
        }
        let body = serde_json::to_value(api::Credentials {
            login: &login,
            password: &password,
        })?;
        let envelope = self.response(app, api::AUTH, &body)?;
        if envelope.is_success() {
            info!("authenticated as '{login}'");
            self.login = Some(login);
            app.hide_login();
            self.get_task_list_list(app);
        }
        Ok(())
    }

    /// Replace the server copy of the selected list with its full task array.
    pub fn save_task_list(&self, app: &mut App) {
        if let Err(e) = self.try_save_task_list(app) {
            error!("saveTaskList: {e}");
        }
    }

    fn try_save_task_list(&self, app: &mut App) -> Result<(), RequestError> {
        let list = app.selected_list().ok_or(RequestError::NoListSelected)?;
        let body = serde_json::to_value(api::SaveTaskList::from_list(list))?;
        debug!("saving list '{}' ({} tasks)", list.name, list.len());
        self.response(app, api::SAVE_TASK_LIST, &body)?;
        app.set_task(None);
        Ok(())
    }

    /// Rebuild the task manager from the server: fetch the list names, then
    /// each list's tasks in turn.
    pub fn get_task_list_list(&self, app: &mut App) {
        if let Err(e) = self.try_get_task_list_list(app) {
            error!("getTaskListList: {e}");
        }
    }

    fn try_get_task_list_list(&self, app: &mut App) -> Result<(), RequestError> {
        let envelope = self.response(app, api::GET_TASK_LIST_LIST, &json!({}))?;
        let names: Vec<String> = envelope.payload()?;
        app.reset_lists();
        for name in names {
            let id = match app.manager.add_list(TaskList::new(name.as_str())) {
                Ok(id) => id,
                Err(e) => {
                    warn!("skipping list from server: {e}");
                    continue;
                }
            };
            app.set_task_list(Some(id));
            self.get_task_list(app, &name);
        }
        app.clamp_cursors();
        info!("loaded {} task lists", app.manager.lists().len());
        Ok(())
    }

    /// Fetch one list's tasks and append them to the selected list.
    pub fn get_task_list(&self, app: &mut App, name: &str) {
        if let Err(e) = self.try_get_task_list(app, name) {
            error!("getTaskList '{name}': {e}");
        }
    }

    fn try_get_task_list(&self, app: &mut App, name: &str) -> Result<(), RequestError> {
        let body = serde_json::to_value(api::ListName { task_list: name })?;
        let envelope = self.response(app, api::GET_TASK_LIST, &body)?;
        let array: TaskArray = envelope.payload()?;
        let list = app
            .selected_list_mut()
            .ok_or(RequestError::NoListSelected)?;
        for record in array.data {
            list.add_task(Task::from(record));
        }
        Ok(())
    }

    /// Ask the server to delete a list. Returns whether it reported success.
    pub fn delete_list(&self, app: &mut App, name: &str) -> Result<bool, RequestError> {
        let body = serde_json::to_value(api::ListName { task_list: name })?;
        let envelope = self.response(app, api::DELETE_LIST, &body)?;
        Ok(envelope.text() == Some(api::STATUS_SUCCESS))
    }
}


#[cfg(test)]
mod tests {
    use super::testing::FakeTransport;
    use super::*;
    use crate::i18n::Lang;
    use crate::tui::app::Theme;

    fn app() -> App {
        App::new(Lang::Ru, Theme::Light, Duration::from_secs(2))
    }

    fn names(app: &App) -> Vec<String> {
        app.manager.lists().iter().map(|l| l.name.clone()).collect()
    }

    #[test]
    fn non_2xx_is_an_error_regardless_of_body() {
        let req = Request::new(
            FakeTransport::default().reply(500, json!({"status": "error", "message": "boom"})),
        );
        let mut app = app();
        let err = req.response(&mut app, api::CONFIG, &json!({})).unwrap_err();
        assert!(matches!(err, RequestError::Status(500)));
        assert!(app.notifications.is_empty());
    }

    #[test]
    fn string_message_becomes_toast() {
        let req = Request::new(
            FakeTransport::default()
                .reply(200, json!({"status": "error", "message": "Nope"}))
                .reply(200, json!({"message": "Hello"}))
                .reply(200, json!({"status": "success", "message": ["a"]})),
        );
        let mut app = app();
        req.response(&mut app, "/api/x", &json!({})).unwrap();
        req.response(&mut app, "/api/x", &json!({})).unwrap();
        req.response(&mut app, "/api/x", &json!({})).unwrap();
        let toasts: Vec<_> = app
            .notifications
            .iter()
            .map(|t| (t.message.clone(), t.kind))
            .collect();
        assert_eq!(
            toasts,
            vec![
                ("Nope".to_string(), ToastKind::Error),
                ("Hello".to_string(), ToastKind::Info),
            ]
        );
    }

    #[test]
    fn malformed_body_is_json_error() {
        let transport = FakeTransport::default();
        transport.replies.borrow_mut().push_back(Ok(HttpReply {
            status: 200,
            body: "<html>".into(),
        }));
        let req = Request::new(transport);
        let err = req.response(&mut app(), api::CONFIG, &json!({})).unwrap_err();
        assert!(matches!(err, RequestError::Json(_)));
    }

    #[test]
    fn auth_with_empty_fields_makes_no_call() {
        let mut req = Request::new(FakeTransport::default());
        let mut app = app();
        app.login_form_mut().unwrap().login = "  ivan ".into();
        req.auth(&mut app);

        assert!(req.transport().calls.borrow().is_empty());
        let toast = app.notifications.iter().last().unwrap();
        assert_eq!(toast.message, "Заполните поля");
        assert_eq!(toast.kind, ToastKind::Error);
        assert!(app.login_visible());
        assert!(req.login().is_none());
    }

    #[test]
    fn auth_success_hides_modal_and_loads_lists() {
        let mut req = Request::new(
            FakeTransport::default()
                .reply(200, json!({"status": "success", "message": "Welcome"}))
                .reply(200, json!({"status": "success", "message": ["Work"]}))
                .reply(200, json!({"status": "success", "message": {"data": [
                    {"name": "report", "description": "", "done": false, "lvl": 1}
                ]}})),
        );
        let mut app = app();
        {
            let form = app.login_form_mut().unwrap();
            form.login = " ivan ".into();
            form.password = "secret".into();
        }
        req.auth(&mut app);

        let calls = req.transport().calls.borrow();
        assert_eq!(calls[0].0, api::AUTH);
        assert_eq!(calls[0].1, json!({"login": "ivan", "password": "secret"}));
        assert_eq!(calls[1].0, api::GET_TASK_LIST_LIST);
        assert_eq!(calls[2].1, json!({"taskList": "Work"}));
        assert!(!app.login_visible());
        assert_eq!(req.login(), Some("ivan"));
        assert_eq!(app.manager.find_by_name("Work").unwrap().len(), 1);
    }

    #[test]
    fn auth_rejected_keeps_modal() {
        let mut req = Request::new(
            FakeTransport::default()
                .reply(200, json!({"status": "error", "message": "Wrong password"})),
        );
        let mut app = app();
        {
            let form = app.login_form_mut().unwrap();
            form.login = "ivan".into();
            form.password = "bad".into();
        }
        req.auth(&mut app);
        assert_eq!(req.transport().paths(), vec![api::AUTH]);
        assert!(app.login_visible());
        assert!(req.login().is_none());
    }

    #[test]
    fn get_task_list_list_builds_each_list_in_order() {
        let req = Request::new(
            FakeTransport::default()
                .reply(200, json!({"status": "success", "message": ["Work", "Home"]}))
                .reply(200, json!({"status": "success", "message": {"data": [
                    {"name": "report", "description": "q1", "done": false,
                     "date": "2024-03-15", "lvl": 3},
                    {"name": "call", "description": "", "done": true, "lvl": 0}
                ]}}))
                .reply(200, json!({"status": "success", "message": {"data": [
                    {"name": "dishes", "description": "", "done": false, "lvl": 1}
                ]}})),
        );
        let mut app = app();
        req.get_task_list_list(&mut app);

        assert_eq!(names(&app), vec!["Work", "Home"]);
        let work = app.manager.find_by_name("Work").unwrap();
        let task_names: Vec<&str> = work.tasks().iter().map(|t| t.name.as_str()).collect();
        assert_eq!(task_names, ["report", "call"]);
        assert_eq!(work.tasks()[0].lvl, 3);
        assert!(work.tasks()[1].done);
        let home = app.manager.find_by_name("Home").unwrap();
        assert_eq!(home.len(), 1);

        let calls = req.transport().calls.borrow();
        assert_eq!(calls.len(), 3);
        assert_eq!(calls[1], (api::GET_TASK_LIST.to_string(), json!({"taskList": "Work"})));
        assert_eq!(calls[2], (api::GET_TASK_LIST.to_string(), json!({"taskList": "Home"})));
        // The last list fetched stays selected.
        assert_eq!(app.selected_list().unwrap().name, "Home");
    }

    #[test]
    fn reload_replaces_existing_lists() {
        let req = Request::new(
            FakeTransport::default()
                .reply(200, json!({"status": "success", "message": ["Work"]}))
                .reply(200, json!({"status": "success", "message": {"data": []}})),
        );
        let mut app = app();
        app.manager.add_list(TaskList::new("Work")).unwrap();
        app.manager.add_list(TaskList::new("Stale")).unwrap();
        req.get_task_list_list(&mut app);
        assert_eq!(names(&app), vec!["Work"]);
    }

    #[test]
    fn failed_fetch_leaves_manager_partially_populated() {
        let req = Request::new(
            FakeTransport::default()
                .reply(200, json!({"status": "success", "message": ["Work", "Home"]}))
                .fail("connection reset")
                .reply(200, json!({"status": "success", "message": {"data": [
                    {"name": "dishes", "done": false, "lvl": 1}
                ]}})),
        );
        let mut app = app();
        req.get_task_list_list(&mut app);
        assert_eq!(names(&app), vec!["Work", "Home"]);
        assert!(app.manager.find_by_name("Work").unwrap().is_empty());
        assert_eq!(app.manager.find_by_name("Home").unwrap().len(), 1);
    }

    #[test]
    fn save_after_deleting_last_task_sends_empty_array() {
        let req = Request::new(
            FakeTransport::default().reply(200, json!({"status": "success", "message": "Saved"})),
        );
        let mut app = app();
        let mut list = TaskList::new("Work");
        let task_id = list.add_task(Task::new("only", "", false, None, 0));
        let list_id = app.manager.add_list(list).unwrap();
        app.change_task_list(list_id).unwrap();
        app.change_task(task_id).unwrap();
        app.delete_task().unwrap();

        req.save_task_list(&mut app);

        let calls = req.transport().calls.borrow();
        assert_eq!(
            calls[0],
            (
                api::SAVE_TASK_LIST.to_string(),
                json!({"taskList": "Work", "data": {"data": []}})
            )
        );
        assert!(app.selected_task().is_none());
    }

    #[test]
    fn save_clears_selected_task() {
        let req = Request::new(
            FakeTransport::default().reply(200, json!({"status": "success", "message": "Saved"})),
        );
        let mut app = app();
        let mut list = TaskList::new("Work");
        let task_id = list.add_task(Task::new("a", "", false, None, 0));
        let list_id = app.manager.add_list(list).unwrap();
        app.change_task_list(list_id).unwrap();
        app.change_task(task_id).unwrap();
        app.done().unwrap();

        req.save_task_list(&mut app);

        let calls = req.transport().calls.borrow();
        assert_eq!(calls[0].1["data"]["data"][0]["done"], json!(true));
        assert!(app.selected_task().is_none());
        assert_eq!(app.selected_list().unwrap().name, "Work");
    }

    #[test]
    fn save_without_selected_list_sends_nothing() {
        let req = Request::new(FakeTransport::default());
        let mut app = app();
        req.save_task_list(&mut app);
        assert!(req.transport().calls.borrow().is_empty());
    }

    #[test]
    fn get_config_applies_settings_and_loads_when_logged_in() {
        let mut req = Request::new(
            FakeTransport::default()
                .reply(200, json!({
                    "status": "success",
                    "message": {"lang": "en", "color-date-alert": true},
                    "login": "ivan"
                }))
                .reply(200, json!({"status": "success", "message": []})),
        );
        let mut app = app();
        req.get_config(&mut app).unwrap();

        assert!(app.date_alert);
        assert!(!app.login_visible());
        assert_eq!(app.lang, Lang::En);
        assert_eq!(req.login(), Some("ivan"));
        assert_eq!(
            req.transport().paths(),
            vec![api::CONFIG, api::GET_TASK_LIST_LIST]
        );
    }

    #[test]
    fn get_config_without_session_keeps_modal() {
        let mut req = Request::new(FakeTransport::default().reply(
            200,
            json!({"status": "success", "message": {"lang": "ru", "color-date-alert": false}}),
        ));
        let mut app = app();
        req.get_config(&mut app).unwrap();
        assert!(!app.date_alert);
        assert!(app.login_visible());
        assert_eq!(req.transport().paths(), vec![api::CONFIG]);
    }

    #[test]
    fn get_config_propagates_http_errors() {
        let mut req = Request::new(FakeTransport::default().reply(404, json!({})));
        assert!(matches!(
            req.get_config(&mut app()),
            Err(RequestError::Status(404))
        ));
    }

    #[test]
    fn delete_list_reports_success_from_message() {
        let req = Request::new(
            FakeTransport::default()
                .reply(200, json!({"status": "success", "message": "success"}))
                .reply(200, json!({"status": "error", "message": "not found"})),
        );
        let mut app = app();
        assert!(req.delete_list(&mut app, "Work").unwrap());
        assert!(!req.delete_list(&mut app, "Gone").unwrap());
        let calls = req.transport().calls.borrow();
        assert_eq!(calls[0], (api::DELETE_LIST.to_string(), json!({"taskList": "Work"})));
    }
}
