use std::time::{Duration, Instant};

use log::{info, warn};

use crate::i18n::{Lang, Strings};
use crate::input::{parse_due_date, parse_priority};
use crate::model::{ListId, Task, TaskId, TaskList, TaskManager};

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum UiError {
    #[error("no task list selected")]
    NoListSelected,
    #[error("no task selected")]
    NoTaskSelected,
    #[error("task list {0} not found")]
    ListNotFound(ListId),
    #[error("task {0} not found")]
    TaskNotFound(TaskId),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastKind {
    Info,
    Success,
    Error,
}

impl ToastKind {
    /// Map a server `status` value onto a toast kind.
    pub fn from_status(status: &str) -> Self {
        match status {
            "success" => Self::Success,
            "error" => Self::Error,
            _ => Self::Info,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Toast {
    pub message: String,
    pub kind: ToastKind,
    pub shown_at: Instant,
}

/// Transient messages that disappear after `ttl`.
#[derive(Debug)]
pub struct Notifications {
    toasts: Vec<Toast>,
    ttl: Duration,
}

impl Notifications {
    pub fn new(ttl: Duration) -> Self {
        Self {
            toasts: Vec::new(),
            ttl,
        }
    }

    pub fn push(&mut self, message: &str, kind: ToastKind, now: Instant) {
        self.toasts.push(Toast {
            message: message.to_string(),
            kind,
            shown_at: now,
        });
    }

    /// Drop expired toasts. Returns true if any were removed.
    pub fn expire(&mut self, now: Instant) -> bool {
        let before = self.toasts.len();
        let ttl = self.ttl;
        self.toasts
            .retain(|t| now.saturating_duration_since(t.shown_at) < ttl);
        self.toasts.len() != before
    }

    pub fn iter(&self) -> impl Iterator<Item = &Toast> {
        self.toasts.iter()
    }

    pub fn is_empty(&self) -> bool {
        self.toasts.is_empty()
    }

    pub fn drain(&mut self) -> Vec<Toast> {
        std::mem::take(&mut self.toasts)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Theme {
    Light,
    Dark,
}

impl Theme {
    pub fn toggled(self) -> Self {
        match self {
            Self::Light => Self::Dark,
            Self::Dark => Self::Light,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pane {
    Manager,
    List,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LoginField {
    #[default]
    Login,
    Password,
}

#[derive(Debug, Default)]
pub struct LoginForm {
    pub login: String,
    pub password: String,
    pub focused: LoginField,
}

impl LoginForm {
    pub fn focused_buf_mut(&mut self) -> &mut String {
        match self.focused {
            LoginField::Login => &mut self.login,
            LoginField::Password => &mut self.password,
        }
    }

    pub fn next_field(&mut self) {
        self.focused = match self.focused {
            LoginField::Login => LoginField::Password,
            LoginField::Password => LoginField::Login,
        };
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskField {
    Name,
    Description,
    Priority,
    Date,
}

pub struct TaskForm {
    pub name: String,
    pub description: String,
    pub priority: String,
    pub date: String,
    pub focused: TaskField,
}

impl TaskForm {
    pub fn new() -> Self {
        Self {
            name: String::new(),
            description: String::new(),
            priority: String::new(),
            date: String::new(),
            focused: TaskField::Name,
        }
    }

    pub fn focused_buf_mut(&mut self) -> &mut String {
        match self.focused {
            TaskField::Name => &mut self.name,
            TaskField::Description => &mut self.description,
            TaskField::Priority => &mut self.priority,
            TaskField::Date => &mut self.date,
        }
    }

    pub fn next_field(&mut self) {
        self.focused = match self.focused {
            TaskField::Name => TaskField::Description,
            TaskField::Description => TaskField::Priority,
            TaskField::Priority => TaskField::Date,
            TaskField::Date => TaskField::Name,
        };
    }

    pub fn prev_field(&mut self) {
        self.focused = match self.focused {
            TaskField::Name => TaskField::Date,
            TaskField::Description => TaskField::Name,
            TaskField::Priority => TaskField::Description,
            TaskField::Date => TaskField::Priority,
        };
    }
}

/// An open input overlay.
pub enum Form {
    Task(TaskForm),
    List(String),
}

/// View-model of the client: the task lists plus everything the screen
/// needs to know about selection, overlays and toasts.
pub struct App {
    pub manager: TaskManager,
    selected_list: Option<ListId>,
    selected_task: Option<TaskId>,
    pub notifications: Notifications,
    pub theme: Theme,
    pub lang: Lang,
    pub date_alert: bool,
    login: Option<LoginForm>,
    pub form: Option<Form>,
    pub focus: Pane,
    pub manager_cursor: usize,
    pub list_cursor: usize,
    pub show_help: bool,
}

impl App {
    pub fn new(lang: Lang, theme: Theme, toast_ttl: Duration) -> Self {
        Self {
            manager: TaskManager::new(),
            selected_list: None,
            selected_task: None,
            notifications: Notifications::new(toast_ttl),
            theme,
            lang,
            date_alert: false,
            login: Some(LoginForm::default()),
            form: None,
            focus: Pane::Manager,
            manager_cursor: 0,
            list_cursor: 0,
            show_help: false,
        }
    }

    pub fn strings(&self) -> &'static Strings {
        self.lang.strings()
    }

    pub fn notify(&mut self, message: &str, kind: ToastKind) {
        self.notifications.push(message, kind, Instant::now());
    }

    /// Switch UI language. Unknown codes are ignored.
    pub fn set_lang(&mut self, code: &str) {
        match Lang::parse(code) {
            Some(lang) => {
                self.lang = lang;
                info!("UI language set to '{}'", lang.as_str());
            }
            None => warn!("unsupported UI language '{code}'"),
        }
    }

    pub fn switch_theme(&mut self) {
        self.theme = self.theme.toggled();
        info!("theme switched to {:?}", self.theme);
    }

    // ── Login modal ──────────────────────────────────────────────────

    pub fn login_visible(&self) -> bool {
        self.login.is_some()
    }

    pub fn hide_login(&mut self) {
        self.login = None;
    }

    pub fn login_form(&self) -> Option<&LoginForm> {
        self.login.as_ref()
    }

    pub fn login_form_mut(&mut self) -> Option<&mut LoginForm> {
        self.login.as_mut()
    }

    /// Trimmed login and password from the modal; empty when it is hidden.
    pub fn credentials(&self) -> (String, String) {
        match &self.login {
            Some(form) => (
                form.login.trim().to_string(),
                form.password.trim().to_string(),
            ),
            None => (String::new(), String::new()),
        }
    }

    // ── Selection ────────────────────────────────────────────────────

    pub fn selected_list(&self) -> Option<&TaskList> {
        self.selected_list.and_then(|id| self.manager.list(id))
    }

    pub fn selected_list_mut(&mut self) -> Option<&mut TaskList> {
        let id = self.selected_list?;
        self.manager.list_mut(id)
    }

    pub fn selected_task(&self) -> Option<&Task> {
        let id = self.selected_task?;
        self.selected_list()?.task(id)
    }

    pub fn set_task_list(&mut self, id: Option<ListId>) {
        self.selected_list = id;
    }

    pub fn set_task(&mut self, id: Option<TaskId>) {
        self.selected_task = id;
    }

    /// Drop all lists and any selection pointing into them.
    pub fn reset_lists(&mut self) {
        self.manager.clear();
        self.selected_list = None;
        self.selected_task = None;
    }

    pub fn change_task_list(&mut self, id: ListId) -> Result<(), UiError> {
        if self.manager.list(id).is_none() {
            return Err(UiError::ListNotFound(id));
        }
        if self.selected_list != Some(id) {
            self.selected_task = None;
            self.list_cursor = 0;
        }
        self.selected_list = Some(id);
        Ok(())
    }

    pub fn change_task(&mut self, id: TaskId) -> Result<(), UiError> {
        let list = self.selected_list().ok_or(UiError::NoListSelected)?;
        if list.task(id).is_none() {
            return Err(UiError::TaskNotFound(id));
        }
        self.selected_task = Some(id);
        Ok(())
    }

    /// Remove the selected task from its list. The caller saves the list.
    pub fn delete_task(&mut self) -> Result<Task, UiError> {
        let task_id = self.selected_task.ok_or(UiError::NoTaskSelected)?;
        let list = self.selected_list_mut().ok_or(UiError::NoListSelected)?;
        let task = list
            .remove_task(task_id)
            .ok_or(UiError::TaskNotFound(task_id))?;
        self.selected_task = None;
        self.clamp_cursors();
        Ok(task)
    }

    /// Mark the selected task done. The caller saves the list.
    pub fn done(&mut self) -> Result<(), UiError> {
        let task_id = self.selected_task.ok_or(UiError::NoTaskSelected)?;
        let list = self.selected_list_mut().ok_or(UiError::NoListSelected)?;
        list.task_mut(task_id)
            .ok_or(UiError::TaskNotFound(task_id))?
            .done_task();
        Ok(())
    }

    /// Remove a list locally after the server confirmed its deletion.
    pub fn remove_list(&mut self, id: ListId) {
        self.manager.remove_list(id);
        if self.selected_list == Some(id) {
            self.selected_list = None;
            self.selected_task = None;
        }
        self.clamp_cursors();
    }

    // ── Forms ────────────────────────────────────────────────────────

    pub fn open_task_form(&mut self) {
        self.form = Some(Form::Task(TaskForm::new()));
    }

    pub fn open_list_form(&mut self) {
        self.form = Some(Form::List(String::new()));
    }

    pub fn close_form(&mut self) {
        self.form = None;
    }

    /// Validate the new-task form and add the task to the selected list.
    ///
    /// Invalid input is reported with a toast and leaves the form open
    /// (`Ok(false)`). `Ok(true)` means the list changed and must be saved.
    pub fn submit_task_form(&mut self) -> Result<bool, UiError> {
        let Some(Form::Task(form)) = &self.form else {
            return Ok(false);
        };
        let strings = self.strings();

        if form.name.trim().is_empty() {
            self.notify(strings.empty_name, ToastKind::Error);
            return Ok(false);
        }
        let date = match parse_due_date(&form.date) {
            Ok(date) => date,
            Err(e) => {
                warn!("new task rejected: {e}");
                self.notify(strings.invalid_date, ToastKind::Error);
                return Ok(false);
            }
        };
        let lvl = match parse_priority(&form.priority) {
            Ok(lvl) => lvl,
            Err(e) => {
                warn!("new task rejected: {e}");
                self.notify(strings.invalid_priority, ToastKind::Error);
                return Ok(false);
            }
        };
        let task = Task::new(form.name.trim(), form.description.trim(), false, date, lvl);

        let list = self.selected_list_mut().ok_or(UiError::NoListSelected)?;
        list.add_task(task);
        self.form = None;
        Ok(true)
    }

    /// Create the list typed into the new-list form and select it.
    /// Returns true if a list was created and must be saved.
    pub fn submit_list_form(&mut self) -> bool {
        let Some(Form::List(name)) = &self.form else {
            return false;
        };
        let name = name.trim().to_string();
        let strings = self.strings();
        if name.is_empty() {
            self.notify(strings.empty_name, ToastKind::Error);
            return false;
        }
        match self.manager.add_list(TaskList::new(name)) {
            Ok(id) => {
                self.selected_list = Some(id);
                self.selected_task = None;
                self.manager_cursor = self.manager.lists().len() - 1;
                self.list_cursor = 0;
                self.form = None;
                true
            }
            Err(e) => {
                warn!("new list rejected: {e}");
                self.notify(strings.list_exists, ToastKind::Error);
                false
            }
        }
    }

    // ── Cursors ──────────────────────────────────────────────────────

    pub fn move_up(&mut self) {
        let cursor = self.cursor_mut();
        *cursor = cursor.saturating_sub(1);
    }

    pub fn move_down(&mut self) {
        let len = self.focused_len();
        let cursor = self.cursor_mut();
        if len > 0 && *cursor < len - 1 {
            *cursor += 1;
        }
    }

    pub fn toggle_focus(&mut self) {
        self.focus = match self.focus {
            Pane::Manager => Pane::List,
            Pane::List => Pane::Manager,
        };
    }

    /// Clamp cursors after lists or tasks change.
    pub fn clamp_cursors(&mut self) {
        let lists = self.manager.lists().len();
        self.manager_cursor = self.manager_cursor.min(lists.saturating_sub(1));
        let tasks = self.selected_list().map_or(0, TaskList::len);
        self.list_cursor = self.list_cursor.min(tasks.saturating_sub(1));
    }

    pub fn list_under_cursor(&self) -> Option<ListId> {
        self.manager
            .lists()
            .get(self.manager_cursor)
            .map(TaskList::id)
    }

    pub fn task_under_cursor(&self) -> Option<TaskId> {
        self.selected_list()?
            .tasks()
            .get(self.list_cursor)
            .map(Task::id)
    }

    fn focused_len(&self) -> usize {
        match self.focus {
            Pane::Manager => self.manager.lists().len(),
            Pane::List => self.selected_list().map_or(0, TaskList::len),
        }
    }

    fn cursor_mut(&mut self) -> &mut usize {
        match self.focus {
            Pane::Manager => &mut self.manager_cursor,
            Pane::List => &mut self.list_cursor,
        }
    }
}
