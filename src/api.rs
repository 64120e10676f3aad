//! The in-process mock API the dashboard talks to.
//!
//! Every operation is genuinely asynchronous: it sleeps for the configured
//! latency before touching the store, and can be switched into a failing mode
//! so callers' error paths can be exercised. The store itself is an
//! implementation detail; consumers see only the response envelope.

use std::fmt;
use std::fs::File;
use std::io::Read;
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::fields::{Priority, Severity, Status, TaskType};
use crate::model::{Project, Subtask, Task, TaskDetails, TaskDraft, TaskId, User};

/// Result envelope carried by every fetch/mutate operation.
#[derive(Debug, Clone)]
pub struct ApiResponse<T> {
    pub data: T,
}

/// Failure surfaced by a rejected operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    /// The referenced task id is unknown to the store.
    NotFound(TaskId),
    /// Simulated transport/server failure.
    Unavailable(&'static str),
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::NotFound(id) => write!(f, "task {id} not found"),
            ApiError::Unavailable(op) => write!(f, "{op} request failed"),
        }
    }
}

impl std::error::Error for ApiError {}

pub type ApiResult<T> = Result<ApiResponse<T>, ApiError>;

/// Filter criteria interpreted entirely by the API.
///
/// `Default` means "no filtering".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterCriteria {
    pub project_id: Option<u64>,
    pub assignee_id: Option<u64>,
    pub status: Option<Status>,
    pub task_type: Option<TaskType>,
}

impl FilterCriteria {
    pub fn is_empty(&self) -> bool {
        self.project_id.is_none()
            && self.assignee_id.is_none()
            && self.status.is_none()
            && self.task_type.is_none()
    }

    fn matches(&self, task: &Task) -> bool {
        if let Some(pid) = self.project_id {
            if task.project_id != Some(pid) {
                return false;
            }
        }
        if let Some(aid) = self.assignee_id {
            if task.assignee_id != Some(aid) {
                return false;
            }
        }
        if let Some(status) = self.status {
            if task.status != status {
                return false;
            }
        }
        if let Some(kind) = self.task_type {
            if task.task_type() != kind {
                return false;
            }
        }
        true
    }
}

/// Initial contents of the mock store, loadable from a JSON file.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct SeedData {
    #[serde(default)]
    pub tasks: Vec<Task>,
    #[serde(default)]
    pub users: Vec<User>,
    #[serde(default)]
    pub projects: Vec<Project>,
}

impl SeedData {
    /// Load seed data from a JSON file, falling back to the built-in sample
    /// set when the file is missing or malformed.
    pub fn load(path: &Path) -> Self {
        let mut buf = String::new();
        match File::open(path).and_then(|mut f| f.read_to_string(&mut buf)) {
            Ok(_) => match serde_json::from_str(&buf) {
                Ok(seed) => seed,
                Err(e) => {
                    log::warn!("malformed seed file {}: {e}; using sample data", path.display());
                    sample_seed()
                }
            },
            Err(e) => {
                log::warn!("cannot read seed file {}: {e}; using sample data", path.display());
                sample_seed()
            }
        }
    }
}

struct Store {
    tasks: Vec<Task>,
    users: Vec<User>,
    projects: Vec<Project>,
}

impl Store {
    fn next_task_id(&self) -> TaskId {
        self.tasks.iter().map(|t| t.id).max().unwrap_or(0) + 1
    }

    fn next_subtask_id(&self) -> u64 {
        self.tasks
            .iter()
            .flat_map(|t| t.subtasks.iter().map(|s| s.id))
            .max()
            .unwrap_or(0)
            + 1
    }
}

/// Asynchronous in-memory mock of the task service.
pub struct MockApi {
    store: Mutex<Store>,
    latency: Duration,
    failing: AtomicBool,
}

impl MockApi {
    pub fn new(seed: SeedData) -> Self {
        MockApi {
            store: Mutex::new(Store {
                tasks: seed.tasks,
                users: seed.users,
                projects: seed.projects,
            }),
            latency: Duration::from_millis(150),
            failing: AtomicBool::new(false),
        }
    }

    /// Zero-latency instance for tests.
    pub fn instant(seed: SeedData) -> Self {
        MockApi {
            latency: Duration::ZERO,
            ..Self::new(seed)
        }
    }

    /// When set, every subsequent operation fails with `ApiError::Unavailable`.
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    async fn simulate(&self, op: &'static str) -> Result<(), ApiError> {
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }
        if self.failing.load(Ordering::SeqCst) {
            return Err(ApiError::Unavailable(op));
        }
        Ok(())
    }

    pub async fn fetch_tasks(&self, criteria: &FilterCriteria) -> ApiResult<Vec<Task>> {
        self.simulate("fetch tasks").await?;
        let store = self.store.lock().unwrap();
        let tasks = store
            .tasks
            .iter()
            .filter(|t| criteria.matches(t))
            .cloned()
            .collect();
        Ok(ApiResponse { data: tasks })
    }

    pub async fn fetch_users(&self) -> ApiResult<Vec<User>> {
        self.simulate("fetch users").await?;
        let store = self.store.lock().unwrap();
        Ok(ApiResponse { data: store.users.clone() })
    }

    pub async fn fetch_projects(&self) -> ApiResult<Vec<Project>> {
        self.simulate("fetch projects").await?;
        let store = self.store.lock().unwrap();
        Ok(ApiResponse { data: store.projects.clone() })
    }

    /// Create a task from the draft. The store assigns the id and timestamps
    /// and returns the canonical task.
    pub async fn create_task(&self, draft: TaskDraft) -> ApiResult<Task> {
        self.simulate("create task").await?;
        let mut store = self.store.lock().unwrap();
        let now = chrono::Utc::now().timestamp();
        let id = store.next_task_id();
        let mut next_sub = store.next_subtask_id();
        let task = Task {
            id,
            title: draft.title,
            description: draft.description,
            priority: draft.priority,
            status: draft.status,
            project_id: draft.project_id,
            assignee_id: draft.assignee_id,
            due: draft.due,
            subtasks: draft
                .subtasks
                .into_iter()
                .map(|s| {
                    let id = s.id.unwrap_or_else(|| {
                        let id = next_sub;
                        next_sub += 1;
                        id
                    });
                    Subtask { id, title: s.title, completed: s.completed }
                })
                .collect(),
            details: draft.details,
            created_at_utc: now,
            updated_at_utc: now,
        };
        // Newest first, so an unfiltered fetch matches the dashboard's order.
        store.tasks.insert(0, task.clone());
        Ok(ApiResponse { data: task })
    }

    /// Replace the task with the given id using the draft fields and return
    /// the full canonical task.
    pub async fn update_task(&self, id: TaskId, draft: TaskDraft) -> ApiResult<Task> {
        self.simulate("update task").await?;
        let mut store = self.store.lock().unwrap();
        let mut next_sub = store.next_subtask_id();
        let pos = store
            .tasks
            .iter()
            .position(|t| t.id == id)
            .ok_or(ApiError::NotFound(id))?;
        let created = store.tasks[pos].created_at_utc;
        let task = Task {
            id,
            title: draft.title,
            description: draft.description,
            priority: draft.priority,
            status: draft.status,
            project_id: draft.project_id,
            assignee_id: draft.assignee_id,
            due: draft.due,
            subtasks: draft
                .subtasks
                .into_iter()
                .map(|s| {
                    let id = s.id.unwrap_or_else(|| {
                        let id = next_sub;
                        next_sub += 1;
                        id
                    });
                    Subtask { id, title: s.title, completed: s.completed }
                })
                .collect(),
            details: draft.details,
            created_at_utc: created,
            updated_at_utc: chrono::Utc::now().timestamp(),
        };
        store.tasks[pos] = task.clone();
        Ok(ApiResponse { data: task })
    }

    /// Remove the task with the given id. Fails if the id is unknown.
    pub async fn delete_task(&self, id: TaskId) -> Result<(), ApiError> {
        self.simulate("delete task").await?;
        let mut store = self.store.lock().unwrap();
        let pos = store
            .tasks
            .iter()
            .position(|t| t.id == id)
            .ok_or(ApiError::NotFound(id))?;
        store.tasks.remove(pos);
        Ok(())
    }
}

/// Built-in demo data used when no seed file is supplied.
pub fn sample_seed() -> SeedData {
    let users = vec![
        User { id: 1, name: "Alice Chen".into() },
        User { id: 2, name: "Bruno Costa".into() },
        User { id: 3, name: "Priya Nair".into() },
    ];
    let projects = vec![
        Project { id: 1, name: "Website Redesign".into() },
        Project { id: 2, name: "Mobile App".into() },
    ];
    let tasks = vec![
        Task {
            id: 1,
            title: "Login page times out on slow connections".into(),
            description: "Session token expires before the redirect completes.".into(),
            priority: Priority::High,
            status: Status::InProgress,
            project_id: Some(1),
            assignee_id: Some(1),
            due: NaiveDate::from_ymd_opt(2026, 9, 15),
            subtasks: vec![
                Subtask { id: 1, title: "Reproduce behind throttled proxy".into(), completed: true },
                Subtask { id: 2, title: "Extend token TTL".into(), completed: false },
            ],
            details: TaskDetails::Bug {
                severity: Severity::Critical,
                steps_to_reproduce: "Throttle to 2G, open /login, submit credentials.".into(),
            },
            created_at_utc: 1_756_000_000,
            updated_at_utc: 1_756_100_000,
        },
        Task {
            id: 2,
            title: "Dark mode".into(),
            description: "Theme toggle persisted per user.".into(),
            priority: Priority::Medium,
            status: Status::Todo,
            project_id: Some(2),
            assignee_id: Some(2),
            due: None,
            subtasks: Vec::new(),
            details: TaskDetails::Feature {
                acceptance_criteria: vec![
                    "Toggle available in settings".into(),
                    "Preference survives restart".into(),
                ],
            },
            created_at_utc: 1_756_000_500,
            updated_at_utc: 1_756_000_500,
        },
        Task {
            id: 3,
            title: "Rotate API keys".into(),
            description: String::new(),
            priority: Priority::Low,
            status: Status::Todo,
            project_id: Some(1),
            assignee_id: None,
            due: NaiveDate::from_ymd_opt(2026, 10, 1),
            subtasks: Vec::new(),
            details: TaskDetails::Chore,
            created_at_utc: 1_756_001_000,
            updated_at_utc: 1_756_001_000,
        },
        Task {
            id: 4,
            title: "Export board to CSV".into(),
            description: "Requested by the reporting team.".into(),
            priority: Priority::Medium,
            status: Status::Done,
            project_id: Some(2),
            assignee_id: Some(3),
            due: None,
            subtasks: vec![Subtask { id: 3, title: "Column mapping".into(), completed: true }],
            details: TaskDetails::Feature { acceptance_criteria: Vec::new() },
            created_at_utc: 1_755_900_000,
            updated_at_utc: 1_756_050_000,
        },
    ];
    SeedData { tasks, users, projects }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn draft(title: &str) -> TaskDraft {
        TaskDraft {
            title: title.into(),
            description: String::new(),
            priority: Priority::Low,
            status: Status::Todo,
            project_id: None,
            assignee_id: None,
            due: None,
            subtasks: Vec::new(),
            details: TaskDetails::Chore,
        }
    }

    #[tokio::test]
    async fn create_assigns_fresh_ids_and_prepends() {
        let api = MockApi::instant(sample_seed());
        let created = api.create_task(draft("new one")).await.unwrap().data;
        assert_eq!(created.id, 5);
        let tasks = api.fetch_tasks(&FilterCriteria::default()).await.unwrap().data;
        assert_eq!(tasks[0].id, created.id);
    }

    #[tokio::test]
    async fn create_assigns_subtask_ids_only_where_missing() {
        let api = MockApi::instant(sample_seed());
        let mut d = draft("with subs");
        d.subtasks = vec![
            crate::model::SubtaskDraft { id: Some(2), title: "kept".into(), completed: true },
            crate::model::SubtaskDraft { id: None, title: "fresh".into(), completed: false },
        ];
        let task = api.create_task(d).await.unwrap().data;
        assert_eq!(task.subtasks[0].id, 2);
        // Highest existing subtask id in the sample set is 3.
        assert_eq!(task.subtasks[1].id, 4);
    }

    #[tokio::test]
    async fn update_preserves_created_timestamp_and_position() {
        let api = MockApi::instant(sample_seed());
        let before = api.fetch_tasks(&FilterCriteria::default()).await.unwrap().data;
        let updated = api.update_task(2, draft("renamed")).await.unwrap().data;
        assert_eq!(updated.title, "renamed");
        assert_eq!(updated.created_at_utc, before.iter().find(|t| t.id == 2).unwrap().created_at_utc);
        let after = api.fetch_tasks(&FilterCriteria::default()).await.unwrap().data;
        let ids: Vec<_> = after.iter().map(|t| t.id).collect();
        assert_eq!(ids, before.iter().map(|t| t.id).collect::<Vec<_>>());
    }

    #[tokio::test]
    async fn delete_unknown_id_fails() {
        let api = MockApi::instant(sample_seed());
        assert_eq!(api.delete_task(99).await, Err(ApiError::NotFound(99)));
        api.delete_task(3).await.unwrap();
        assert_eq!(api.delete_task(3).await, Err(ApiError::NotFound(3)));
    }

    #[tokio::test]
    async fn criteria_filter_tasks_server_side() {
        let api = MockApi::instant(sample_seed());
        let criteria = FilterCriteria { project_id: Some(1), ..Default::default() };
        let tasks = api.fetch_tasks(&criteria).await.unwrap().data;
        assert!(tasks.iter().all(|t| t.project_id == Some(1)));
        assert_eq!(tasks.len(), 2);

        let criteria = FilterCriteria {
            task_type: Some(TaskType::Feature),
            status: Some(Status::Todo),
            ..Default::default()
        };
        let tasks = api.fetch_tasks(&criteria).await.unwrap().data;
        assert_eq!(tasks.len(), 1);
        assert_eq!(tasks[0].id, 2);
    }

    #[test]
    fn seed_loads_from_json_file() {
        let path = std::env::temp_dir().join("taskboard_seed_ok.json");
        std::fs::write(
            &path,
            r#"{
                "tasks": [],
                "users": [{ "id": 9, "name": "Dana" }],
                "projects": [{ "id": 4, "name": "Intranet" }]
            }"#,
        )
        .unwrap();
        let seed = SeedData::load(&path);
        std::fs::remove_file(&path).ok();

        assert!(seed.tasks.is_empty());
        assert_eq!(seed.users.len(), 1);
        assert_eq!(seed.users[0].name, "Dana");
        assert_eq!(seed.projects[0].id, 4);
    }

    #[test]
    fn seed_falls_back_to_sample_on_missing_or_malformed_file() {
        let missing = std::env::temp_dir().join("taskboard_seed_does_not_exist.json");
        let seed = SeedData::load(&missing);
        assert_eq!(seed.tasks.len(), sample_seed().tasks.len());

        let path = std::env::temp_dir().join("taskboard_seed_bad.json");
        std::fs::write(&path, "{ not json").unwrap();
        let seed = SeedData::load(&path);
        std::fs::remove_file(&path).ok();
        assert_eq!(seed.users.len(), sample_seed().users.len());
        assert_eq!(seed.projects.len(), sample_seed().projects.len());
    }

    #[tokio::test]
    async fn failing_mode_rejects_every_operation() {
        let api = MockApi::instant(sample_seed());
        api.set_failing(true);
        assert!(api.fetch_tasks(&FilterCriteria::default()).await.is_err());
        assert!(api.fetch_users().await.is_err());
        assert!(api.create_task(draft("x")).await.is_err());
        assert!(api.delete_task(1).await.is_err());
        api.set_failing(false);
        assert!(api.fetch_users().await.is_ok());
    }
}
