//! Form session state for creating and editing tasks.
//!
//! The set of visible fields depends on the selected task type (Bug adds
//! severity and steps-to-reproduce, Feature adds the acceptance-criteria row
//! editor), and the subtask/criteria editors grow and shrink, so navigation
//! is positional over a computed field list instead of fixed global orders.
//! Values for hidden type-specific fields are retained in the session; they
//! only become meaningful again when the matching type is reselected.

use crate::fields::{Priority, Severity, Status, TaskType};
use crate::model::{parse_due_input, Project, SubtaskDraft, Task, TaskDetails, TaskDraft, TaskId, User};
use crate::tui::input::InputField;

/// Whether the session creates a new task or edits an existing one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormMode {
    Create,
    Edit(TaskId),
}

/// Identity of a form field at the current moment.
///
/// Row variants carry the row position, which is only stable until the next
/// append/remove; the session recomputes the visible list after every change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldId {
    Title,
    Type,
    Priority,
    Status,
    Project,
    Assignee,
    Due,
    Description,
    Severity,
    Steps,
    Criterion(usize),
    AddCriterion,
    SubtaskTitle(usize),
    SubtaskDone(usize),
    AddSubtask,
}

/// A subtask row in the editor.
///
/// `key` is a session-local identifier from a monotonic counter; it lets a
/// row added moments ago be removed before any submit ever happens. `id` is
/// the server id when the row came from an edited task, `None` for new rows.
pub struct SubtaskRow {
    pub key: u64,
    pub id: Option<u64>,
    pub title: InputField,
    pub completed: bool,
}

/// An acceptance-criterion row in the editor.
pub struct CriterionRow {
    pub key: u64,
    pub text: InputField,
}

/// Live, uncommitted state of an open create/edit form.
pub struct FormSession {
    pub mode: FormMode,
    pub title: InputField,
    pub description: InputField,
    pub due: InputField,
    pub steps: InputField,
    pub type_sel: usize,
    pub priority_sel: usize,
    pub status_sel: usize,
    pub severity_sel: usize,
    /// 0 = no project, 1.. = index into `projects` + 1.
    pub project_sel: usize,
    /// 0 = unassigned, 1.. = index into `users` + 1.
    pub assignee_sel: usize,
    pub criteria: Vec<CriterionRow>,
    pub subtasks: Vec<SubtaskRow>,
    pub users: Vec<User>,
    pub projects: Vec<Project>,
    cursor: usize,
    next_key: u64,
}

impl FormSession {
    /// Open in create mode with schema defaults. The first project, when any
    /// exist, is preselected.
    pub fn new_create(users: Vec<User>, projects: Vec<Project>) -> Self {
        let project_sel = if projects.is_empty() { 0 } else { 1 };
        FormSession {
            mode: FormMode::Create,
            title: InputField::new(),
            description: InputField::new(),
            due: InputField::new(),
            steps: InputField::new(),
            type_sel: 0,
            priority_sel: 0,
            status_sel: 0,
            severity_sel: severity_index(Severity::DEFAULT),
            project_sel,
            assignee_sel: 0,
            criteria: Vec::new(),
            subtasks: Vec::new(),
            users,
            projects,
            cursor: 0,
            next_key: 1,
        }
    }

    /// Open in edit mode with every field initialized from the task.
    pub fn from_task(task: &Task, users: Vec<User>, projects: Vec<Project>) -> Self {
        let mut form = Self::new_create(users, projects);
        form.mode = FormMode::Edit(task.id);
        form.title = InputField::with_value(&task.title);
        form.description = InputField::with_value(&task.description);
        form.due = InputField::with_value(
            &task.due.map(|d| d.to_string()).unwrap_or_default(),
        );
        form.type_sel = TaskType::ALL
            .iter()
            .position(|&t| t == task.task_type())
            .unwrap_or(0);
        form.priority_sel = Priority::ALL
            .iter()
            .position(|&p| p == task.priority)
            .unwrap_or(0);
        form.status_sel = Status::ALL
            .iter()
            .position(|&s| s == task.status)
            .unwrap_or(0);
        form.project_sel = task
            .project_id
            .and_then(|pid| form.projects.iter().position(|p| p.id == pid))
            .map(|i| i + 1)
            .unwrap_or(0);
        form.assignee_sel = task
            .assignee_id
            .and_then(|aid| form.users.iter().position(|u| u.id == aid))
            .map(|i| i + 1)
            .unwrap_or(0);
        match &task.details {
            TaskDetails::Bug { severity, steps_to_reproduce } => {
                form.severity_sel = severity_index(*severity);
                form.steps = InputField::with_value(steps_to_reproduce);
            }
            TaskDetails::Feature { acceptance_criteria } => {
                for c in acceptance_criteria {
                    let key = form.take_key();
                    form.criteria.push(CriterionRow {
                        key,
                        text: InputField::with_value(c),
                    });
                }
            }
            TaskDetails::Chore => {}
        }
        for s in &task.subtasks {
            let key = form.take_key();
            form.subtasks.push(SubtaskRow {
                key,
                id: Some(s.id),
                title: InputField::with_value(&s.title),
                completed: s.completed,
            });
        }
        form
    }

    fn take_key(&mut self) -> u64 {
        let key = self.next_key;
        self.next_key += 1;
        key
    }

    pub fn task_type(&self) -> TaskType {
        TaskType::ALL[self.type_sel]
    }

    pub fn severity(&self) -> Severity {
        Severity::ALL[self.severity_sel]
    }

    pub fn selected_project_id(&self) -> Option<u64> {
        self.project_sel
            .checked_sub(1)
            .and_then(|i| self.projects.get(i))
            .map(|p| p.id)
    }

    pub fn selected_assignee_id(&self) -> Option<u64> {
        self.assignee_sel
            .checked_sub(1)
            .and_then(|i| self.users.get(i))
            .map(|u| u.id)
    }

    /// The fields visible for the current type selection, in navigation order.
    pub fn visible_fields(&self) -> Vec<FieldId> {
        let mut fields = vec![
            FieldId::Title,
            FieldId::Type,
            FieldId::Priority,
            FieldId::Status,
            FieldId::Project,
            FieldId::Assignee,
            FieldId::Due,
            FieldId::Description,
        ];
        match self.task_type() {
            TaskType::Bug => {
                fields.push(FieldId::Severity);
                fields.push(FieldId::Steps);
            }
            TaskType::Feature => {
                for i in 0..self.criteria.len() {
                    fields.push(FieldId::Criterion(i));
                }
                fields.push(FieldId::AddCriterion);
            }
            TaskType::Chore => {}
        }
        for i in 0..self.subtasks.len() {
            fields.push(FieldId::SubtaskTitle(i));
            fields.push(FieldId::SubtaskDone(i));
        }
        fields.push(FieldId::AddSubtask);
        fields
    }

    pub fn current_field(&self) -> FieldId {
        let fields = self.visible_fields();
        fields[self.cursor.min(fields.len() - 1)]
    }

    pub fn next_field(&mut self) {
        let len = self.visible_fields().len();
        self.cursor = (self.cursor.min(len - 1) + 1) % len;
    }

    pub fn prev_field(&mut self) {
        let len = self.visible_fields().len();
        let cur = self.cursor.min(len - 1);
        self.cursor = if cur == 0 { len - 1 } else { cur - 1 };
    }

    fn clamp_cursor(&mut self) {
        let len = self.visible_fields().len();
        if self.cursor >= len {
            self.cursor = len - 1;
        }
    }

    /// Move the cursor to the given field if it is currently visible.
    pub fn focus(&mut self, target: FieldId) {
        if let Some(pos) = self.visible_fields().iter().position(|&f| f == target) {
            self.cursor = pos;
        }
    }

    fn active_input_mut(&mut self) -> Option<&mut InputField> {
        match self.current_field() {
            FieldId::Title => Some(&mut self.title),
            FieldId::Description => Some(&mut self.description),
            FieldId::Due => Some(&mut self.due),
            FieldId::Steps => Some(&mut self.steps),
            FieldId::Criterion(i) => self.criteria.get_mut(i).map(|r| &mut r.text),
            FieldId::SubtaskTitle(i) => self.subtasks.get_mut(i).map(|r| &mut r.title),
            _ => None,
        }
    }

    pub fn handle_char(&mut self, c: char) {
        if let Some(field) = self.active_input_mut() {
            field.handle_char(c);
        }
    }

    pub fn handle_backspace(&mut self) {
        if let Some(field) = self.active_input_mut() {
            field.handle_backspace();
        }
    }

    pub fn handle_delete(&mut self) {
        if let Some(field) = self.active_input_mut() {
            field.handle_delete();
        }
    }

    /// Left/right arrows: cursor movement on text fields, cycling on selectors.
    pub fn handle_left_right(&mut self, right: bool) {
        match self.current_field() {
            FieldId::Type => {
                self.type_sel = cycle(self.type_sel, TaskType::ALL.len(), right);
                // The visible list may have shrunk under the cursor.
                self.clamp_cursor();
            }
            FieldId::Priority => {
                self.priority_sel = cycle(self.priority_sel, Priority::ALL.len(), right);
            }
            FieldId::Status => {
                self.status_sel = cycle(self.status_sel, Status::ALL.len(), right);
            }
            FieldId::Severity => {
                self.severity_sel = cycle(self.severity_sel, Severity::ALL.len(), right);
            }
            FieldId::Project => {
                self.project_sel = cycle(self.project_sel, self.projects.len() + 1, right);
            }
            FieldId::Assignee => {
                self.assignee_sel = cycle(self.assignee_sel, self.users.len() + 1, right);
            }
            FieldId::SubtaskDone(i) => {
                if let Some(row) = self.subtasks.get_mut(i) {
                    row.completed = !row.completed;
                }
            }
            _ => {
                if let Some(field) = self.active_input_mut() {
                    if right {
                        field.move_cursor_right();
                    } else {
                        field.move_cursor_left();
                    }
                }
            }
        }
    }

    /// Append an empty subtask row and focus its title.
    pub fn add_subtask(&mut self) {
        let key = self.take_key();
        self.subtasks.push(SubtaskRow {
            key,
            id: None,
            title: InputField::new(),
            completed: false,
        });
        self.focus(FieldId::SubtaskTitle(self.subtasks.len() - 1));
    }

    /// Append an empty criterion row and focus it.
    pub fn add_criterion(&mut self) {
        let key = self.take_key();
        self.criteria.push(CriterionRow { key, text: InputField::new() });
        self.focus(FieldId::Criterion(self.criteria.len() - 1));
    }

    pub fn remove_subtask(&mut self, pos: usize) {
        if pos < self.subtasks.len() {
            self.subtasks.remove(pos);
            self.clamp_cursor();
        }
    }

    pub fn remove_criterion(&mut self, pos: usize) {
        if pos < self.criteria.len() {
            self.criteria.remove(pos);
            self.clamp_cursor();
        }
    }

    /// Remove the list row under the cursor, if the cursor is on one.
    pub fn remove_current_row(&mut self) -> bool {
        match self.current_field() {
            FieldId::Criterion(i) => {
                self.remove_criterion(i);
                true
            }
            FieldId::SubtaskTitle(i) | FieldId::SubtaskDone(i) => {
                self.remove_subtask(i);
                true
            }
            _ => false,
        }
    }

    /// Handle Enter on the current field.
    ///
    /// Returns true when the press means "submit the form"; row buttons and
    /// the completed toggle consume the press instead.
    pub fn press_enter(&mut self) -> bool {
        match self.current_field() {
            FieldId::AddSubtask => {
                self.add_subtask();
                false
            }
            FieldId::AddCriterion => {
                self.add_criterion();
                false
            }
            FieldId::SubtaskDone(i) => {
                if let Some(row) = self.subtasks.get_mut(i) {
                    row.completed = !row.completed;
                }
                false
            }
            _ => true,
        }
    }

    /// Title is required; nothing else blocks a submit.
    pub fn is_valid(&self) -> bool {
        !self.title.is_blank()
    }

    /// Assemble the validated field set for submission. Blank criterion rows
    /// are dropped; subtask rows submit their server id when they have one.
    pub fn draft(&self) -> TaskDraft {
        let details = match self.task_type() {
            TaskType::Bug => TaskDetails::Bug {
                severity: self.severity(),
                steps_to_reproduce: self.steps.value.trim().to_string(),
            },
            TaskType::Feature => TaskDetails::Feature {
                acceptance_criteria: self
                    .criteria
                    .iter()
                    .map(|r| r.text.value.trim().to_string())
                    .filter(|c| !c.is_empty())
                    .collect(),
            },
            TaskType::Chore => TaskDetails::Chore,
        };
        TaskDraft {
            title: self.title.value.trim().to_string(),
            description: self.description.value.trim().to_string(),
            priority: Priority::ALL[self.priority_sel],
            status: Status::ALL[self.status_sel],
            project_id: self.selected_project_id(),
            assignee_id: self.selected_assignee_id(),
            due: parse_due_input(&self.due.value),
            subtasks: self
                .subtasks
                .iter()
                .map(|r| SubtaskDraft {
                    id: r.id,
                    title: r.title.value.trim().to_string(),
                    completed: r.completed,
                })
                .collect(),
            details,
        }
    }
}

fn cycle(current: usize, len: usize, right: bool) -> usize {
    if len == 0 {
        return 0;
    }
    if right {
        (current + 1) % len
    } else if current == 0 {
        len - 1
    } else {
        current - 1
    }
}

fn severity_index(severity: Severity) -> usize {
    Severity::ALL.iter().position(|&s| s == severity).unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fields::Severity;
    use crate::model::Subtask;

    fn users() -> Vec<User> {
        vec![
            User { id: 10, name: "Alice".into() },
            User { id: 11, name: "Bruno".into() },
        ]
    }

    fn projects() -> Vec<Project> {
        vec![
            Project { id: 7, name: "Website".into() },
            Project { id: 8, name: "Mobile".into() },
        ]
    }

    fn set_type(form: &mut FormSession, kind: TaskType) {
        form.focus(FieldId::Type);
        while form.task_type() != kind {
            form.handle_left_right(true);
        }
    }

    #[test]
    fn create_defaults_follow_schema_order() {
        let form = FormSession::new_create(users(), projects());
        assert_eq!(form.task_type(), TaskType::Feature);
        assert_eq!(Priority::ALL[form.priority_sel], Priority::Low);
        assert_eq!(Status::ALL[form.status_sel], Status::Todo);
        assert_eq!(form.severity(), Severity::Major);
        // First project preselected when any exist.
        assert_eq!(form.selected_project_id(), Some(7));
        assert_eq!(form.selected_assignee_id(), None);
    }

    #[test]
    fn no_projects_means_no_default_project() {
        let form = FormSession::new_create(users(), Vec::new());
        assert_eq!(form.selected_project_id(), None);
    }

    #[test]
    fn type_toggle_drives_field_visibility() {
        let mut form = FormSession::new_create(users(), projects());

        set_type(&mut form, TaskType::Bug);
        let fields = form.visible_fields();
        assert!(fields.contains(&FieldId::Severity));
        assert!(fields.contains(&FieldId::Steps));
        assert!(!fields.contains(&FieldId::AddCriterion));

        set_type(&mut form, TaskType::Feature);
        let fields = form.visible_fields();
        assert!(!fields.contains(&FieldId::Severity));
        assert!(!fields.contains(&FieldId::Steps));
        assert!(fields.contains(&FieldId::AddCriterion));

        set_type(&mut form, TaskType::Chore);
        let fields = form.visible_fields();
        assert!(!fields.contains(&FieldId::Severity));
        assert!(!fields.contains(&FieldId::AddCriterion));
        // The subtask editor is always present.
        assert!(fields.contains(&FieldId::AddSubtask));
    }

    #[test]
    fn hidden_type_fields_are_retained() {
        let mut form = FormSession::new_create(users(), projects());
        set_type(&mut form, TaskType::Bug);
        form.focus(FieldId::Steps);
        for c in "step one".chars() {
            form.handle_char(c);
        }
        set_type(&mut form, TaskType::Chore);
        set_type(&mut form, TaskType::Bug);
        assert_eq!(form.steps.value, "step one");
    }

    #[test]
    fn subtask_rows_append_and_remove_by_position() {
        let mut form = FormSession::new_create(users(), projects());
        form.add_subtask();
        for c in "first".chars() {
            form.handle_char(c);
        }
        form.add_subtask();
        for c in "second".chars() {
            form.handle_char(c);
        }
        form.focus(FieldId::SubtaskDone(1));
        form.handle_left_right(true);
        assert!(form.subtasks[1].completed);

        let keys: Vec<u64> = form.subtasks.iter().map(|r| r.key).collect();
        assert_ne!(keys[0], keys[1]);

        form.remove_subtask(0);
        assert_eq!(form.subtasks.len(), 1);
        assert_eq!(form.subtasks[0].title.value, "second");
        assert!(form.subtasks[0].completed);
        assert_eq!(form.subtasks[0].key, keys[1]);
    }

    #[test]
    fn enter_on_row_buttons_does_not_submit() {
        let mut form = FormSession::new_create(users(), projects());
        form.focus(FieldId::AddSubtask);
        assert!(!form.press_enter());
        assert_eq!(form.subtasks.len(), 1);
        // Focus landed on the new row's title.
        assert_eq!(form.current_field(), FieldId::SubtaskTitle(0));

        form.focus(FieldId::AddCriterion);
        assert!(!form.press_enter());
        assert_eq!(form.criteria.len(), 1);

        form.focus(FieldId::Title);
        assert!(form.press_enter());
    }

    #[test]
    fn blank_title_blocks_submission() {
        let mut form = FormSession::new_create(users(), projects());
        assert!(!form.is_valid());
        form.focus(FieldId::Title);
        form.handle_char(' ');
        assert!(!form.is_valid());
        form.handle_char('x');
        assert!(form.is_valid());
    }

    #[test]
    fn draft_dispatches_on_selected_type() {
        let mut form = FormSession::new_create(users(), projects());
        form.title = InputField::with_value("Crash on save");
        set_type(&mut form, TaskType::Bug);
        form.steps = InputField::with_value("open, save, crash");
        let draft = form.draft();
        assert_eq!(
            draft.details,
            TaskDetails::Bug {
                severity: Severity::Major,
                steps_to_reproduce: "open, save, crash".into()
            }
        );

        set_type(&mut form, TaskType::Feature);
        form.add_criterion();
        for c in "works offline".chars() {
            form.handle_char(c);
        }
        form.add_criterion(); // left blank, dropped from the draft
        let draft = form.draft();
        assert_eq!(
            draft.details,
            TaskDetails::Feature { acceptance_criteria: vec!["works offline".into()] }
        );
    }

    #[test]
    fn edit_mode_initializes_from_task() {
        let task = Task {
            id: 42,
            title: "Fix flaky logout".into(),
            description: "intermittent".into(),
            priority: crate::fields::Priority::High,
            status: crate::fields::Status::InProgress,
            project_id: Some(8),
            assignee_id: Some(11),
            due: chrono::NaiveDate::from_ymd_opt(2026, 12, 1),
            subtasks: vec![Subtask { id: 5, title: "add trace".into(), completed: true }],
            details: TaskDetails::Bug {
                severity: Severity::Blocker,
                steps_to_reproduce: "logout twice".into(),
            },
            created_at_utc: 0,
            updated_at_utc: 0,
        };
        let form = FormSession::from_task(&task, users(), projects());
        assert_eq!(form.mode, FormMode::Edit(42));
        assert_eq!(form.title.value, "Fix flaky logout");
        assert_eq!(form.task_type(), TaskType::Bug);
        assert_eq!(form.severity(), Severity::Blocker);
        assert_eq!(form.steps.value, "logout twice");
        assert_eq!(form.selected_project_id(), Some(8));
        assert_eq!(form.selected_assignee_id(), Some(11));
        assert_eq!(form.due.value, "2026-12-01");
        assert_eq!(form.subtasks.len(), 1);
        assert_eq!(form.subtasks[0].id, Some(5));

        let draft = form.draft();
        assert_eq!(draft.subtasks[0].id, Some(5));
        assert_eq!(draft.due, chrono::NaiveDate::from_ymd_opt(2026, 12, 1));
    }

    #[test]
    fn navigation_wraps_and_survives_list_shrink() {
        let mut form = FormSession::new_create(users(), projects());
        let len = form.visible_fields().len();
        for _ in 0..len {
            form.next_field();
        }
        assert_eq!(form.current_field(), FieldId::Title);
        form.prev_field();
        assert_eq!(form.current_field(), FieldId::AddSubtask);

        // Park the cursor on the last subtask row, then remove it.
        form.add_subtask();
        form.focus(FieldId::SubtaskDone(0));
        assert!(form.remove_current_row());
        assert_eq!(form.subtasks.len(), 0);
        // Cursor stays in range.
        let _ = form.current_field();
    }
}
