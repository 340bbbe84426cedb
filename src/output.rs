use serde::Serialize;

use crate::api::TaskRecord;
use crate::input::format_due_date;
use crate::model::{TaskList, TaskManager};

#[derive(Serialize)]
pub struct ListSummary<'a> {
    pub name: &'a str,
    pub tasks: usize,
    pub done: usize,
}

pub fn list_summaries(manager: &TaskManager) -> Vec<ListSummary<'_>> {
    manager
        .lists()
        .iter()
        .map(|list| ListSummary {
            name: &list.name,
            tasks: list.len(),
            done: list.tasks().iter().filter(|t| t.done).count(),
        })
        .collect()
}

pub fn task_records(list: &TaskList) -> Vec<TaskRecord> {
    list.tasks().iter().map(TaskRecord::from).collect()
}

pub fn format_list_summaries(manager: &TaskManager) -> String {
    let mut out = String::new();
    for s in list_summaries(manager) {
        out.push_str(&format!("{} ({}/{})\n", s.name, s.done, s.tasks));
    }
    out
}

pub fn format_task_list(list: &TaskList) -> String {
    let mut out = String::new();
    for task in list.tasks() {
        let due = task
            .date
            .map(|d| format!(" (due {})", format_due_date(d)))
            .unwrap_or_default();
        let desc = if task.description.is_empty() {
            String::new()
        } else {
            format!("  {}", task.description)
        };
        out.push_str(&format!(
            "{} [{}] {}{}{}\n",
            task.icon(),
            task.lvl,
            task.name,
            due,
            desc
        ));
    }
    out
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;
    use crate::model::Task;

    fn manager() -> TaskManager {
        let mut manager = TaskManager::new();
        let mut work = TaskList::new("Work");
        work.add_task(Task::new(
            "report",
            "quarterly",
            false,
            NaiveDate::from_ymd_opt(2024, 3, 15),
            2,
        ));
        work.add_task(Task::new("call", "", true, None, 0));
        manager.add_list(work).unwrap();
        manager.add_list(TaskList::new("Home")).unwrap();
        manager
    }

    #[test]
    fn summaries() {
        let out = format_list_summaries(&manager());
        assert_eq!(out, "Work (1/2)\nHome (0/0)\n");
    }

    #[test]
    fn task_lines() {
        let manager = manager();
        let out = format_task_list(manager.find_by_name("Work").unwrap());
        assert_eq!(
            out,
            ". [2] report (due 15.3.2024)  quarterly\nx [0] call\n"
        );
    }

    #[test]
    fn summaries_serialize() {
        let manager = manager();
        let json = serde_json::to_value(list_summaries(&manager)).unwrap();
        assert_eq!(json[0]["name"], "Work");
        assert_eq!(json[0]["tasks"], 2);
        assert_eq!(json[0]["done"], 1);
    }
}
