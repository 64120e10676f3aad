//! Core data model: tasks, their type-specific details, and the read-only
//! reference entities (users, projects).
//!
//! Type-specific data lives in the `TaskDetails` tagged variant rather than a
//! flat bag of sometimes-meaningful fields; rendering, validation and
//! filtering dispatch on the tag.

use chrono::{Duration, Local, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::fields::{Priority, Severity, Status, TaskType};

pub type TaskId = u64;

/// The primary work item managed by the dashboard.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Task {
    pub id: TaskId,
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub priority: Priority,
    pub status: Status,
    pub project_id: Option<u64>,
    pub assignee_id: Option<u64>,
    pub due: Option<NaiveDate>,
    #[serde(default)]
    pub subtasks: Vec<Subtask>,
    #[serde(flatten)]
    pub details: TaskDetails,
    pub created_at_utc: i64,
    pub updated_at_utc: i64,
}

impl Task {
    pub fn task_type(&self) -> TaskType {
        self.details.kind()
    }

    /// "2/5" style subtask completion summary, or "-" when there are none.
    pub fn subtask_progress(&self) -> String {
        if self.subtasks.is_empty() {
            return "-".into();
        }
        let done = self.subtasks.iter().filter(|s| s.completed).count();
        format!("{}/{}", done, self.subtasks.len())
    }
}

/// Type-specific task data, tagged by task type.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "task_type", rename_all = "kebab-case")]
pub enum TaskDetails {
    Feature {
        #[serde(default)]
        acceptance_criteria: Vec<String>,
    },
    Bug {
        severity: Severity,
        #[serde(default)]
        steps_to_reproduce: String,
    },
    Chore,
}

impl TaskDetails {
    pub fn kind(&self) -> TaskType {
        match self {
            TaskDetails::Feature { .. } => TaskType::Feature,
            TaskDetails::Bug { .. } => TaskType::Bug,
            TaskDetails::Chore => TaskType::Chore,
        }
    }
}

/// An ordered checklist entry under a task.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Subtask {
    pub id: u64,
    pub title: String,
    pub completed: bool,
}

/// Read-only reference data: a person tasks can be assigned to.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: u64,
    pub name: String,
}

/// Read-only reference data: a project tasks can belong to.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Project {
    pub id: u64,
    pub name: String,
}

/// The validated field set a form submission delegates upward.
///
/// Ids and timestamps are the API's business; subtasks carried over from an
/// edited task keep their id, rows added in the form submit `None`.
#[derive(Debug, Clone)]
pub struct TaskDraft {
    pub title: String,
    pub description: String,
    pub priority: Priority,
    pub status: Status,
    pub project_id: Option<u64>,
    pub assignee_id: Option<u64>,
    pub due: Option<NaiveDate>,
    pub subtasks: Vec<SubtaskDraft>,
    pub details: TaskDetails,
}

#[derive(Debug, Clone)]
pub struct SubtaskDraft {
    pub id: Option<u64>,
    pub title: String,
    pub completed: bool,
}

/// Parse human due-date input: "today", "tomorrow", "in Nd" or `YYYY-MM-DD`.
pub fn parse_due_input(s: &str) -> Option<NaiveDate> {
    let s = s.trim().to_lowercase();
    let today = Local::now().date_naive();

    match s.as_str() {
        "today" => return Some(today),
        "tomorrow" => return Some(today + Duration::days(1)),
        _ => {}
    }

    if let Some(rest) = s.strip_prefix("in ") {
        if let Some(nd) = rest.strip_suffix('d') {
            if let Ok(days) = nd.trim().parse::<i64>() {
                return Some(today + Duration::days(days));
            }
        }
    }

    NaiveDate::parse_from_str(&s, "%Y-%m-%d").ok()
}

/// Format a due date relative to today ("today", "tomorrow", "in 3d", "2d late").
pub fn format_due_relative(due: Option<NaiveDate>, today: NaiveDate) -> String {
    match due {
        None => "-".into(),
        Some(d) => {
            let days = (d - today).num_days();
            match days {
                0 => "today".into(),
                1 => "tomorrow".into(),
                n if n > 1 => format!("in {n}d"),
                n => format!("{}d late", -n),
            }
        }
    }
}

/// Truncate a string to a maximum width, adding ellipsis if needed.
pub fn truncate(s: &str, width: usize) -> String {
    if s.chars().count() <= width {
        s.to_string()
    } else {
        let mut out = String::new();
        for (i, ch) in s.chars().enumerate() {
            if i + 1 >= width {
                out.push('…');
                break;
            }
            out.push(ch);
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn details_tag_matches_task_type() {
        let bug = TaskDetails::Bug {
            severity: Severity::Blocker,
            steps_to_reproduce: "open, click, crash".into(),
        };
        assert_eq!(bug.kind(), TaskType::Bug);
        assert_eq!(TaskDetails::Chore.kind(), TaskType::Chore);
    }

    #[test]
    fn due_input_accepts_relative_and_iso_forms() {
        let today = Local::now().date_naive();
        assert_eq!(parse_due_input("today"), Some(today));
        assert_eq!(parse_due_input("tomorrow"), Some(today + Duration::days(1)));
        assert_eq!(parse_due_input("in 3d"), Some(today + Duration::days(3)));
        assert_eq!(
            parse_due_input("2031-01-15"),
            NaiveDate::from_ymd_opt(2031, 1, 15)
        );
        assert_eq!(parse_due_input("soonish"), None);
    }

    #[test]
    fn due_formatting_is_relative() {
        let today = NaiveDate::from_ymd_opt(2026, 6, 1).unwrap();
        assert_eq!(format_due_relative(None, today), "-");
        assert_eq!(format_due_relative(Some(today), today), "today");
        assert_eq!(
            format_due_relative(Some(today + Duration::days(4)), today),
            "in 4d"
        );
        assert_eq!(
            format_due_relative(Some(today - Duration::days(2)), today),
            "2d late"
        );
    }

    #[test]
    fn subtask_progress_counts_completed() {
        let task = Task {
            id: 1,
            title: "t".into(),
            description: String::new(),
            priority: Priority::Low,
            status: Status::Todo,
            project_id: None,
            assignee_id: None,
            due: None,
            subtasks: vec![
                Subtask { id: 1, title: "a".into(), completed: true },
                Subtask { id: 2, title: "b".into(), completed: false },
            ],
            details: TaskDetails::Chore,
            created_at_utc: 0,
            updated_at_utc: 0,
        };
        assert_eq!(task.subtask_progress(), "1/2");
    }
}
