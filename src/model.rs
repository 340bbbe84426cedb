use std::fmt;

use chrono::NaiveDate;
use uuid::Uuid;

/// Opaque identifier of a task, assigned when the task is created.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TaskId(Uuid);

/// Opaque identifier of a task list, assigned when the list is created.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListId(Uuid);

impl TaskId {
    fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl ListId {
    fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Display for ListId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ModelError {
    #[error("task list '{0}' already exists")]
    DuplicateList(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Task {
    id: TaskId,
    pub name: String,
    pub description: String,
    pub done: bool,
    pub date: Option<NaiveDate>,
    pub lvl: i64,
}

impl Task {
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        done: bool,
        date: Option<NaiveDate>,
        lvl: i64,
    ) -> Self {
        Self {
            id: TaskId::new(),
            name: name.into(),
            description: description.into(),
            done,
            date,
            lvl,
        }
    }

    pub fn id(&self) -> TaskId {
        self.id
    }

    /// Mark the task done. Calling it again leaves the task done.
    pub fn done_task(&mut self) {
        self.done = true;
    }

    /// Returns display icon: x=done, .=open
    pub fn icon(&self) -> &'static str {
        if self.done {
            "x"
        } else {
            "."
        }
    }
}

/// A named, ordered collection of tasks.
#[derive(Debug, Clone, PartialEq)]
pub struct TaskList {
    id: ListId,
    pub name: String,
    tasks: Vec<Task>,
}

impl TaskList {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: ListId::new(),
            name: name.into(),
            tasks: Vec::new(),
        }
    }

    pub fn id(&self) -> ListId {
        self.id
    }

    pub fn add_task(&mut self, task: Task) -> TaskId {
        let id = task.id();
        self.tasks.push(task);
        id
    }

    pub fn remove_task(&mut self, id: TaskId) -> Option<Task> {
        let pos = self.tasks.iter().position(|t| t.id == id)?;
        Some(self.tasks.remove(pos))
    }

    /// First task with the given name. Names may repeat; prefer ids.
    pub fn find_by_name(&self, name: &str) -> Option<&Task> {
        self.tasks.iter().find(|t| t.name == name)
    }

    pub fn task(&self, id: TaskId) -> Option<&Task> {
        self.tasks.iter().find(|t| t.id == id)
    }

    pub fn task_mut(&mut self, id: TaskId) -> Option<&mut Task> {
        self.tasks.iter_mut().find(|t| t.id == id)
    }

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }
}

/// All task lists of the current session.
///
/// List names double as the server-side key, so they are kept unique.
#[derive(Debug, Default)]
pub struct TaskManager {
    lists: Vec<TaskList>,
}

impl TaskManager {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_list(&mut self, list: TaskList) -> Result<ListId, ModelError> {
        if self.find_by_name(&list.name).is_some() {
            return Err(ModelError::DuplicateList(list.name));
        }
        let id = list.id();
        self.lists.push(list);
        Ok(id)
    }

    pub fn remove_list(&mut self, id: ListId) -> Option<TaskList> {
        let pos = self.lists.iter().position(|l| l.id == id)?;
        Some(self.lists.remove(pos))
    }

    pub fn find_by_name(&self, name: &str) -> Option<&TaskList> {
        self.lists.iter().find(|l| l.name == name)
    }

    pub fn list(&self, id: ListId) -> Option<&TaskList> {
        self.lists.iter().find(|l| l.id == id)
    }

    pub fn list_mut(&mut self, id: ListId) -> Option<&mut TaskList> {
        self.lists.iter_mut().find(|l| l.id == id)
    }

    pub fn lists(&self) -> &[TaskList] {
        &self.lists
    }

    pub fn clear(&mut self) {
        self.lists.clear();
    }
}
