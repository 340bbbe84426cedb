//! Wire types for the to-do server's JSON API.
//!
//! Every endpoint is a `POST` with a JSON body and answers with an
//! [`Envelope`]; the shape of `message` depends on the endpoint.

use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::model::{Task, TaskList};

pub const CONFIG: &str = "/api/config";
pub const AUTH: &str = "/api/auth";
pub const SAVE_TASK_LIST: &str = "/api/saveTaskList";
pub const GET_TASK_LIST_LIST: &str = "/api/getTaskListList";
pub const GET_TASK_LIST: &str = "/api/getTaskList";
pub const DELETE_LIST: &str = "/api/deleteList";

/// The `status` value the server uses for successful calls.
pub const STATUS_SUCCESS: &str = "success";

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Envelope {
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub message: Value,
    #[serde(default)]
    pub login: Option<String>,
}

impl Envelope {
    pub fn is_success(&self) -> bool {
        self.status.as_deref() == Some(STATUS_SUCCESS)
    }

    /// The `message` field, when the server sent a plain string.
    pub fn text(&self) -> Option<&str> {
        self.message.as_str()
    }

    /// Decode `message` into an endpoint-specific payload.
    pub fn payload<T: for<'de> Deserialize<'de>>(&self) -> serde_json::Result<T> {
        T::deserialize(&self.message)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ServerConfig {
    #[serde(default)]
    pub lang: Option<String>,
    #[serde(rename = "color-date-alert", default)]
    pub color_date_alert: bool,
}

#[derive(Debug, Serialize)]
pub struct Credentials<'a> {
    pub login: &'a str,
    pub password: &'a str,
}

#[derive(Debug, Serialize)]
pub struct ListName<'a> {
    #[serde(rename = "taskList")]
    pub task_list: &'a str,
}

#[derive(Debug, Serialize)]
pub struct SaveTaskList<'a> {
    #[serde(rename = "taskList")]
    pub task_list: &'a str,
    pub data: TaskArray,
}

impl<'a> SaveTaskList<'a> {
    pub fn from_list(list: &'a TaskList) -> Self {
        Self {
            task_list: &list.name,
            data: TaskArray {
                data: list.tasks().iter().map(TaskRecord::from).collect(),
            },
        }
    }
}

/// `{"data": [...]}`, the container the server stores a list's tasks in.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TaskArray {
    #[serde(default)]
    pub data: Vec<TaskRecord>,
}

/// A task as it travels over the wire. Ids are local and never sent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskRecord {
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub done: bool,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "deserialize_date"
    )]
    pub date: Option<NaiveDate>,
    #[serde(default, deserialize_with = "deserialize_lvl")]
    pub lvl: i64,
}

impl From<&Task> for TaskRecord {
    fn from(task: &Task) -> Self {
        Self {
            name: task.name.clone(),
            description: task.description.clone(),
            done: task.done,
            date: task.date,
            lvl: task.lvl,
        }
    }
}

impl From<TaskRecord> for Task {
    fn from(record: TaskRecord) -> Self {
        Task::new(
            record.name,
            record.description,
            record.done,
            record.date,
            record.lvl,
        )
    }
}

/// Accepts `null`, `YYYY-MM-DD`, or an ISO-8601 timestamp (date part only).
/// Unparseable strings are treated as "no deadline" rather than failing the
/// whole list.
fn deserialize_date<'de, D>(deserializer: D) -> Result<Option<NaiveDate>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    Ok(raw.as_deref().and_then(parse_wire_date))
}

fn parse_wire_date(raw: &str) -> Option<NaiveDate> {
    let parsed = raw
        .get(..10)
        .and_then(|head| NaiveDate::parse_from_str(head, "%Y-%m-%d").ok());
    if parsed.is_none() {
        log::warn!("ignoring unparseable task date '{raw}'");
    }
    parsed
}

/// Older clients stored the priority as a string; accept both.
fn deserialize_lvl<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(match value {
        Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().map(|f| f as i64))
            .unwrap_or(0),
        Value::String(s) => s.trim().parse().unwrap_or(0),
        _ => 0,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn envelope_with_string_message() {
        let env: Envelope =
            serde_json::from_value(json!({"status": "success", "message": "Saved"})).unwrap();
        assert!(env.is_success());
        assert_eq!(env.text(), Some("Saved"));
        assert!(env.login.is_none());
    }

    #[test]
    fn envelope_config_payload() {
        let env: Envelope = serde_json::from_value(json!({
            "status": "success",
            "message": {"lang": "en", "color-date-alert": true},
            "login": "ivan"
        }))
        .unwrap();
        let cfg: ServerConfig = env.payload().unwrap();
        assert_eq!(cfg.lang.as_deref(), Some("en"));
        assert!(cfg.color_date_alert);
        assert_eq!(env.login.as_deref(), Some("ivan"));
        assert_eq!(env.text(), None);
    }

    #[test]
    fn save_body_shape() {
        let mut list = TaskList::new("Work");
        list.add_task(Task::new(
            "report",
            "quarterly",
            false,
            NaiveDate::from_ymd_opt(2024, 3, 15),
            2,
        ));
        list.add_task(Task::new("call", "", true, None, 0));
        let body = serde_json::to_value(SaveTaskList::from_list(&list)).unwrap();
        assert_eq!(
            body,
            json!({
                "taskList": "Work",
                "data": {"data": [
                    {"name": "report", "description": "quarterly", "done": false,
                     "date": "2024-03-15", "lvl": 2},
                    {"name": "call", "description": "", "done": true, "lvl": 0}
                ]}
            })
        );
    }

    #[test]
    fn task_record_accepts_loose_input() {
        let arr: TaskArray = serde_json::from_value(json!({"data": [
            {"name": "a", "description": "d", "done": false,
             "date": "2024-03-15T00:00:00.000Z", "lvl": 3},
            {"name": "b", "date": null, "lvl": "7"},
            {"name": "c", "date": "garbage"},
            {"name": "d", "lvl": 2.0}
        ]}))
        .unwrap();
        assert_eq!(arr.data[0].date, NaiveDate::from_ymd_opt(2024, 3, 15));
        assert_eq!(arr.data[0].lvl, 3);
        assert_eq!(arr.data[1].date, None);
        assert_eq!(arr.data[1].lvl, 7);
        assert!(!arr.data[1].done);
        assert_eq!(arr.data[2].date, None);
        assert_eq!(arr.data[2].lvl, 0);
        assert_eq!(arr.data[3].lvl, 2);
    }

    #[test]
    fn record_to_task_gets_fresh_id() {
        let record = TaskRecord {
            name: "a".into(),
            description: String::new(),
            done: true,
            date: None,
            lvl: 1,
        };
        let t1 = Task::from(record.clone());
        let t2 = Task::from(record);
        assert_ne!(t1.id(), t2.id());
        assert!(t1.done);
    }
}
