//! Dashboard orchestration: the single owner of the canonical task, user and
//! project lists.
//!
//! Asynchronous operations run on the tokio runtime and report back with one
//! `DataEvent` over a channel; `Dashboard::apply` is the only place those
//! events mutate shared state. Child views get read-only slices and request
//! mutations by having the app spawn one of the operations below.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::Sender;
use std::sync::Arc;

use crate::api::{ApiError, FilterCriteria, MockApi};
use crate::form::{FormMode, FormSession};
use crate::model::{Project, Task, TaskDraft, TaskId, User};

/// Cancellation token tied to the app's lifetime.
///
/// The initial load holds a clone and checks it before delivering results, so
/// a resolution arriving after teardown is dropped instead of applied.
#[derive(Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// Completion message from an asynchronous data operation.
#[derive(Debug)]
pub enum DataEvent {
    InitialLoaded {
        tasks: Vec<Task>,
        users: Vec<User>,
        projects: Vec<Project>,
    },
    InitialLoadFailed(ApiError),
    TasksReplaced(Vec<Task>),
    FilterFetchFailed(ApiError),
    TaskCreated(Task),
    TaskUpdated(Task),
    TaskDeleted(TaskId),
    SaveFailed(ApiError),
    DeleteFailed(ApiError),
}

/// Canonical dashboard state.
#[derive(Default)]
pub struct Dashboard {
    pub tasks: Vec<Task>,
    pub users: Vec<User>,
    pub projects: Vec<Project>,
    pub filters: FilterCriteria,
    /// One mutating call in flight at a time; while set, the UI disables the
    /// list and form controls.
    pub loading: bool,
    /// Blocking alert from a failed delete or save.
    pub alert: Option<String>,
    pub form: Option<FormSession>,
}

impl Dashboard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark an operation as spawned. Cleared by `apply` on completion.
    pub fn begin_operation(&mut self) {
        self.loading = true;
    }

    /// Open the form in create mode with schema defaults.
    pub fn open_create(&mut self) {
        self.form = Some(FormSession::new_create(
            self.users.clone(),
            self.projects.clone(),
        ));
    }

    /// Open the form in edit mode for the given task. No-op when the id is
    /// not in the canonical list.
    pub fn open_edit(&mut self, id: TaskId) -> bool {
        match self.tasks.iter().find(|t| t.id == id) {
            Some(task) => {
                self.form = Some(FormSession::from_task(
                    task,
                    self.users.clone(),
                    self.projects.clone(),
                ));
                true
            }
            None => false,
        }
    }

    /// Discard uncommitted edits and clear any edit target.
    pub fn close_form(&mut self) {
        self.form = None;
    }

    pub fn form_mode(&self) -> Option<FormMode> {
        self.form.as_ref().map(|f| f.mode)
    }

    /// Apply a completion event. This is the single writer for the canonical
    /// lists; every event also clears the loading flag.
    pub fn apply(&mut self, event: DataEvent) {
        self.loading = false;
        match event {
            DataEvent::InitialLoaded { tasks, users, projects } => {
                self.tasks = tasks;
                self.users = users;
                self.projects = projects;
            }
            DataEvent::InitialLoadFailed(e) => {
                // Logged only; the lists stay at their prior (empty) state.
                log::error!("initial load failed: {e}");
            }
            DataEvent::TasksReplaced(tasks) => {
                self.tasks = tasks;
            }
            DataEvent::FilterFetchFailed(e) => {
                log::error!("filtered fetch failed: {e}");
            }
            DataEvent::TaskCreated(task) => {
                self.tasks.insert(0, task);
                self.form = None;
            }
            DataEvent::TaskUpdated(task) => {
                if let Some(existing) = self.tasks.iter_mut().find(|t| t.id == task.id) {
                    *existing = task;
                }
                self.form = None;
            }
            DataEvent::TaskDeleted(id) => {
                self.tasks.retain(|t| t.id != id);
            }
            DataEvent::SaveFailed(e) => {
                // The form stays open with the user's edits intact.
                self.alert = Some(format!("Failed to save task: {e}"));
            }
            DataEvent::DeleteFailed(e) => {
                self.alert = Some(format!("Failed to delete task: {e}"));
            }
        }
    }
}

/// Concurrently fetch tasks, users and projects, then deliver a single
/// all-or-nothing event. Nothing is sent once the token is cancelled.
pub async fn load_initial(api: Arc<MockApi>, tx: Sender<DataEvent>, token: CancelToken) {
    let criteria = FilterCriteria::default();
    let result = tokio::try_join!(
        api.fetch_tasks(&criteria),
        api.fetch_users(),
        api.fetch_projects(),
    );
    if token.is_cancelled() {
        return;
    }
    let event = match result {
        Ok((tasks, users, projects)) => DataEvent::InitialLoaded {
            tasks: tasks.data,
            users: users.data,
            projects: projects.data,
        },
        Err(e) => DataEvent::InitialLoadFailed(e),
    };
    let _ = tx.send(event);
}

/// Re-fetch the task list for the given criteria, replacing it wholesale.
pub async fn refetch_tasks(api: Arc<MockApi>, criteria: FilterCriteria, tx: Sender<DataEvent>) {
    let event = match api.fetch_tasks(&criteria).await {
        Ok(res) => DataEvent::TasksReplaced(res.data),
        Err(e) => DataEvent::FilterFetchFailed(e),
    };
    let _ = tx.send(event);
}

/// Create a task from the draft; the API returns the canonical task.
pub async fn create_task(api: Arc<MockApi>, draft: TaskDraft, tx: Sender<DataEvent>) {
    let event = match api.create_task(draft).await {
        Ok(res) => DataEvent::TaskCreated(res.data),
        Err(e) => DataEvent::SaveFailed(e),
    };
    let _ = tx.send(event);
}

/// Update the task with the given id; the API returns the canonical task.
pub async fn update_task(api: Arc<MockApi>, id: TaskId, draft: TaskDraft, tx: Sender<DataEvent>) {
    let event = match api.update_task(id, draft).await {
        Ok(res) => DataEvent::TaskUpdated(res.data),
        Err(e) => DataEvent::SaveFailed(e),
    };
    let _ = tx.send(event);
}

/// Delete the task with the given id. The caller is responsible for having
/// confirmed the action with the user first.
pub async fn delete_task(api: Arc<MockApi>, id: TaskId, tx: Sender<DataEvent>) {
    let event = match api.delete_task(id).await {
        Ok(()) => DataEvent::TaskDeleted(id),
        Err(e) => DataEvent::DeleteFailed(e),
    };
    let _ = tx.send(event);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::{sample_seed, SeedData};
    use crate::fields::{Priority, Status};
    use crate::model::TaskDetails;
    use std::sync::mpsc;

    fn seeded() -> (Arc<MockApi>, Dashboard, mpsc::Sender<DataEvent>, mpsc::Receiver<DataEvent>) {
        let api = Arc::new(MockApi::instant(sample_seed()));
        let (tx, rx) = mpsc::channel();
        (api, Dashboard::new(), tx, rx)
    }

    async fn load(api: &Arc<MockApi>, dash: &mut Dashboard, tx: &mpsc::Sender<DataEvent>, rx: &mpsc::Receiver<DataEvent>) {
        dash.begin_operation();
        load_initial(api.clone(), tx.clone(), CancelToken::new()).await;
        dash.apply(rx.try_recv().unwrap());
    }

    fn small_seed() -> SeedData {
        let mut seed = sample_seed();
        seed.tasks.truncate(3);
        seed.users.truncate(2);
        seed.projects.truncate(1);
        seed
    }

    #[tokio::test]
    async fn initial_load_populates_all_three_lists_once() {
        let api = Arc::new(MockApi::instant(small_seed()));
        let (tx, rx) = mpsc::channel();
        let mut dash = Dashboard::new();
        dash.begin_operation();
        load_initial(api.clone(), tx.clone(), CancelToken::new()).await;
        dash.apply(rx.try_recv().unwrap());
        assert_eq!(dash.tasks.len(), 3);
        assert_eq!(dash.users.len(), 2);
        assert_eq!(dash.projects.len(), 1);
        assert!(!dash.loading);
        // Exactly one completion event was delivered.
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn cancelled_load_delivers_nothing() {
        let api = Arc::new(MockApi::instant(sample_seed()));
        let (tx, rx) = mpsc::channel();
        let token = CancelToken::new();
        token.cancel();
        load_initial(api, tx, token).await;
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn load_failure_is_silent_and_leaves_lists_empty() {
        let (api, mut dash, tx, rx) = seeded();
        api.set_failing(true);
        dash.begin_operation();
        load_initial(api.clone(), tx.clone(), CancelToken::new()).await;
        dash.apply(rx.try_recv().unwrap());
        assert!(dash.tasks.is_empty());
        assert!(dash.users.is_empty());
        assert!(dash.alert.is_none());
        assert!(!dash.loading);
    }

    #[tokio::test]
    async fn create_prepends_canonical_task_and_closes_form() {
        let (api, mut dash, tx, rx) = seeded();
        load(&api, &mut dash, &tx, &rx).await;

        dash.open_create();
        let mut form = dash.form.take().unwrap();
        form.title = crate::tui::input::InputField::with_value("brand new");
        let draft = form.draft();
        dash.form = Some(form);

        dash.begin_operation();
        create_task(api.clone(), draft, tx.clone()).await;
        dash.apply(rx.try_recv().unwrap());

        assert_eq!(dash.tasks[0].title, "brand new");
        assert_eq!(dash.tasks[0].id, 5); // id assigned by the API
        assert!(dash.form.is_none());
        assert!(!dash.loading);
    }

    #[tokio::test]
    async fn update_replaces_matching_entry_preserving_order() {
        let (api, mut dash, tx, rx) = seeded();
        load(&api, &mut dash, &tx, &rx).await;
        let ids_before: Vec<TaskId> = dash.tasks.iter().map(|t| t.id).collect();

        assert!(dash.open_edit(2));
        let mut form = dash.form.take().unwrap();
        form.title = crate::tui::input::InputField::with_value("Dark mode v2");
        let draft = form.draft();
        dash.form = Some(form);

        dash.begin_operation();
        update_task(api.clone(), 2, draft, tx.clone()).await;
        dash.apply(rx.try_recv().unwrap());

        assert_eq!(dash.tasks.iter().map(|t| t.id).collect::<Vec<_>>(), ids_before);
        assert_eq!(dash.tasks.iter().find(|t| t.id == 2).unwrap().title, "Dark mode v2");
        assert!(dash.form.is_none());
    }

    #[tokio::test]
    async fn edit_unknown_id_is_a_noop() {
        let (api, mut dash, tx, rx) = seeded();
        load(&api, &mut dash, &tx, &rx).await;
        assert!(!dash.open_edit(999));
        assert!(dash.form.is_none());
    }

    #[tokio::test]
    async fn save_failure_keeps_form_open_with_alert() {
        let (api, mut dash, tx, rx) = seeded();
        load(&api, &mut dash, &tx, &rx).await;

        dash.open_create();
        let draft = TaskDraft {
            title: "doomed".into(),
            description: String::new(),
            priority: Priority::Low,
            status: Status::Todo,
            project_id: None,
            assignee_id: None,
            due: None,
            subtasks: Vec::new(),
            details: TaskDetails::Chore,
        };
        api.set_failing(true);
        dash.begin_operation();
        create_task(api.clone(), draft, tx.clone()).await;
        dash.apply(rx.try_recv().unwrap());

        assert!(dash.form.is_some());
        assert!(dash.alert.is_some());
        assert_eq!(dash.tasks.len(), 4);
        assert!(!dash.loading);
    }

    #[tokio::test]
    async fn delete_removes_by_id_and_failure_leaves_list_unchanged() {
        let (api, mut dash, tx, rx) = seeded();
        load(&api, &mut dash, &tx, &rx).await;

        dash.begin_operation();
        delete_task(api.clone(), 3, tx.clone()).await;
        dash.apply(rx.try_recv().unwrap());
        assert!(dash.tasks.iter().all(|t| t.id != 3));
        assert!(dash.alert.is_none());

        let before: Vec<TaskId> = dash.tasks.iter().map(|t| t.id).collect();
        api.set_failing(true);
        dash.begin_operation();
        delete_task(api.clone(), 1, tx.clone()).await;
        dash.apply(rx.try_recv().unwrap());
        assert_eq!(dash.tasks.iter().map(|t| t.id).collect::<Vec<_>>(), before);
        assert!(dash.alert.is_some());
    }

    #[tokio::test]
    async fn filter_change_replaces_list_wholesale() {
        let (api, mut dash, tx, rx) = seeded();
        load(&api, &mut dash, &tx, &rx).await;
        assert_eq!(dash.tasks.len(), 4);

        let criteria = FilterCriteria { project_id: Some(1), ..Default::default() };
        dash.filters = criteria.clone();
        dash.begin_operation();
        refetch_tasks(api.clone(), criteria, tx.clone()).await;
        dash.apply(rx.try_recv().unwrap());

        assert_eq!(dash.tasks.len(), 2);
        assert!(dash.tasks.iter().all(|t| t.project_id == Some(1)));
    }
}
