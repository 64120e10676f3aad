//! Main application logic for the terminal user interface.
//!
//! The `App` owns the `Dashboard` state, a tokio runtime for the mock API
//! calls, and the channel those calls report back on. The event loop drains
//! completed `DataEvent`s into `Dashboard::apply`, renders the current
//! screen, then polls for keyboard input, so the UI stays responsive while a
//! request is in flight and the loading flag disables the mutating controls.

use std::io;
use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::Arc;
use std::time::Duration;

use chrono::Local;
use crossterm::event::{self, Event, KeyCode, KeyModifiers};
use ratatui::{
    backend::Backend,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Clear, Paragraph, Row, Table, TableState, Wrap},
    Frame, Terminal,
};

use crate::api::MockApi;
use crate::dashboard::{self, CancelToken, Dashboard, DataEvent};
use crate::fields::{Priority, Status, TaskType};
use crate::form::{FieldId, FormMode, FormSession};
use crate::model::{format_due_relative, truncate, TaskId};
use crate::tui::colors::{DARK_GREEN, DARK_RED, GOLD, SLATE};
use crate::tui::filter::{FilterBar, CONTROL_NAMES};
use crate::tui::input::InputField;
use crate::tui::utils::centered_rect;

/// Current screen of the dashboard.
#[derive(Clone, Copy, PartialEq)]
enum AppState {
    TaskList,
    TaskForm,
    ConfirmDelete,
    Help,
}

/// Main application state for the terminal user interface.
pub struct App {
    state: AppState,
    dashboard: Dashboard,
    api: Arc<MockApi>,
    runtime: tokio::runtime::Runtime,
    tx: Sender<DataEvent>,
    rx: Receiver<DataEvent>,
    live: CancelToken,
    list_state: TableState,
    filter_bar: FilterBar,
    filter_focus: bool,
    pending_delete: Option<TaskId>,
    status_message: String,
}

impl App {
    /// Create the app and kick off the initial reference-data load.
    pub fn new(api: Arc<MockApi>) -> io::Result<Self> {
        let runtime = tokio::runtime::Runtime::new()?;
        let (tx, rx) = mpsc::channel();
        let live = CancelToken::new();

        let mut dashboard = Dashboard::new();
        dashboard.begin_operation();
        runtime.spawn(dashboard::load_initial(api.clone(), tx.clone(), live.clone()));

        Ok(App {
            state: AppState::TaskList,
            dashboard,
            api,
            runtime,
            tx,
            rx,
            live,
            list_state: TableState::default(),
            filter_bar: FilterBar::new(),
            filter_focus: false,
            pending_delete: None,
            status_message: String::new(),
        })
    }

    /// Main event loop: apply completed operations, render, poll input.
    pub fn run<B: Backend>(&mut self, terminal: &mut Terminal<B>) -> io::Result<()> {
        loop {
            self.drain_data_events();
            terminal.draw(|f| self.render(f))?;
            if self.handle_input()? {
                break;
            }
        }
        // Anything still in flight must not land after teardown.
        self.live.cancel();
        Ok(())
    }

    fn drain_data_events(&mut self) {
        while let Ok(event) = self.rx.try_recv() {
            match &event {
                DataEvent::InitialLoaded { tasks, .. } => {
                    self.status_message = format!("Loaded {} tasks", tasks.len());
                }
                DataEvent::TaskCreated(task) => {
                    self.status_message = format!("Task #{} created", task.id);
                    self.state = AppState::TaskList;
                }
                DataEvent::TaskUpdated(task) => {
                    self.status_message = format!("Task #{} updated", task.id);
                    self.state = AppState::TaskList;
                }
                DataEvent::TaskDeleted(id) => {
                    self.status_message = format!("Task #{id} deleted");
                }
                DataEvent::TasksReplaced(tasks) => {
                    self.status_message = format!("{} tasks match", tasks.len());
                }
                _ => {}
            }
            self.dashboard.apply(event);
            self.fix_selection();
        }
    }

    /// Keep the table selection inside the (possibly shrunk) task list.
    fn fix_selection(&mut self) {
        let len = self.dashboard.tasks.len();
        match self.list_state.selected() {
            _ if len == 0 => self.list_state.select(None),
            None => self.list_state.select(Some(0)),
            Some(i) if i >= len => self.list_state.select(Some(len - 1)),
            _ => {}
        }
    }

    fn selected_task_id(&self) -> Option<TaskId> {
        self.list_state
            .selected()
            .and_then(|i| self.dashboard.tasks.get(i))
            .map(|t| t.id)
    }

    fn project_name(&self, id: Option<u64>) -> &str {
        id.and_then(|pid| self.dashboard.projects.iter().find(|p| p.id == pid))
            .map(|p| p.name.as_str())
            .unwrap_or("-")
    }

    fn user_name(&self, id: Option<u64>) -> &str {
        id.and_then(|uid| self.dashboard.users.iter().find(|u| u.id == uid))
            .map(|u| u.name.as_str())
            .unwrap_or("-")
    }

    // --- spawned operations -------------------------------------------------

    fn spawn_refetch(&mut self) {
        self.dashboard.begin_operation();
        let criteria = self.dashboard.filters.clone();
        self.runtime.spawn(dashboard::refetch_tasks(
            self.api.clone(),
            criteria,
            self.tx.clone(),
        ));
    }

    fn spawn_delete(&mut self, id: TaskId) {
        self.dashboard.begin_operation();
        self.runtime
            .spawn(dashboard::delete_task(self.api.clone(), id, self.tx.clone()));
    }

    fn submit_form(&mut self) {
        let Some(form) = self.dashboard.form.as_ref() else {
            return;
        };
        if !form.is_valid() {
            self.status_message = "Title is required".to_string();
            return;
        }
        let draft = form.draft();
        let mode = form.mode;
        self.dashboard.begin_operation();
        match mode {
            FormMode::Create => {
                self.runtime.spawn(dashboard::create_task(
                    self.api.clone(),
                    draft,
                    self.tx.clone(),
                ));
            }
            FormMode::Edit(id) => {
                self.runtime.spawn(dashboard::update_task(
                    self.api.clone(),
                    id,
                    draft,
                    self.tx.clone(),
                ));
            }
        }
    }

    // --- input handling -----------------------------------------------------

    /// Poll for and handle keyboard events. Returns true to quit.
    fn handle_input(&mut self) -> io::Result<bool> {
        if !event::poll(Duration::from_millis(50))? {
            return Ok(false);
        }
        let Event::Key(key) = event::read()? else {
            return Ok(false);
        };

        // A failed save/delete is a blocking alert: the next key dismisses it.
        if self.dashboard.alert.is_some() {
            if matches!(key.code, KeyCode::Enter | KeyCode::Esc | KeyCode::Char(_)) {
                self.dashboard.alert = None;
            }
            return Ok(false);
        }

        match self.state {
            AppState::TaskList => self.handle_task_list_input(key.code, key.modifiers),
            AppState::TaskForm => self.handle_form_input(key.code, key.modifiers),
            AppState::ConfirmDelete => self.handle_confirm_input(key.code),
            AppState::Help => {
                self.state = AppState::TaskList;
                Ok(false)
            }
        }
    }

    fn handle_task_list_input(
        &mut self,
        key: KeyCode,
        modifiers: KeyModifiers,
    ) -> io::Result<bool> {
        if self.filter_focus {
            self.handle_filter_input(key);
            return Ok(false);
        }

        let loading = self.dashboard.loading;
        match key {
            KeyCode::Char('q') | KeyCode::Esc => return Ok(true),
            KeyCode::Char('c') if modifiers.contains(KeyModifiers::CONTROL) => return Ok(true),
            KeyCode::Up => {
                if let Some(selected) = self.list_state.selected() {
                    if selected > 0 {
                        self.list_state.select(Some(selected - 1));
                    }
                } else {
                    self.fix_selection();
                }
            }
            KeyCode::Down => {
                if let Some(selected) = self.list_state.selected() {
                    if selected + 1 < self.dashboard.tasks.len() {
                        self.list_state.select(Some(selected + 1));
                    }
                } else {
                    self.fix_selection();
                }
            }
            KeyCode::Char('a') if !loading => {
                self.dashboard.open_create();
                self.state = AppState::TaskForm;
            }
            KeyCode::Char('e') if !loading => {
                if let Some(id) = self.selected_task_id() {
                    if self.dashboard.open_edit(id) {
                        self.state = AppState::TaskForm;
                    }
                }
            }
            KeyCode::Char('d') if !loading => {
                if let Some(id) = self.selected_task_id() {
                    self.pending_delete = Some(id);
                    self.state = AppState::ConfirmDelete;
                }
            }
            KeyCode::Char('f') => {
                self.filter_focus = true;
                self.status_message =
                    "Filter: Tab next control, ←/→ change, x clear, Esc done".to_string();
            }
            KeyCode::Char('r') if !loading => {
                self.spawn_refetch();
            }
            KeyCode::Char('h') => {
                self.state = AppState::Help;
            }
            _ => {}
        }
        Ok(false)
    }

    fn handle_filter_input(&mut self, key: KeyCode) {
        match key {
            KeyCode::Esc | KeyCode::Enter => {
                self.filter_focus = false;
                self.status_message.clear();
            }
            KeyCode::Tab | KeyCode::Down => self.filter_bar.next_control(),
            KeyCode::BackTab | KeyCode::Up => self.filter_bar.prev_control(),
            KeyCode::Left | KeyCode::Right if !self.dashboard.loading => {
                let changed = self.filter_bar.cycle(
                    key == KeyCode::Right,
                    &self.dashboard.projects,
                    &self.dashboard.users,
                );
                if changed {
                    self.apply_filters();
                }
            }
            KeyCode::Char('x') if !self.dashboard.loading => {
                if self.filter_bar.clear() {
                    self.apply_filters();
                }
            }
            _ => {}
        }
    }

    /// Emit the complete criteria and replace the list via a server re-fetch.
    fn apply_filters(&mut self) {
        self.dashboard.filters = self
            .filter_bar
            .criteria(&self.dashboard.projects, &self.dashboard.users);
        self.spawn_refetch();
    }

    fn handle_form_input(&mut self, key: KeyCode, modifiers: KeyModifiers) -> io::Result<bool> {
        let Some(form) = self.dashboard.form.as_mut() else {
            self.state = AppState::TaskList;
            return Ok(false);
        };
        match key {
            KeyCode::Esc => {
                self.dashboard.close_form();
                self.state = AppState::TaskList;
            }
            KeyCode::Tab | KeyCode::Down => form.next_field(),
            KeyCode::BackTab | KeyCode::Up => form.prev_field(),
            KeyCode::Left => form.handle_left_right(false),
            KeyCode::Right => form.handle_left_right(true),
            KeyCode::Backspace => form.handle_backspace(),
            KeyCode::Delete => form.handle_delete(),
            KeyCode::Char('d') if modifiers.contains(KeyModifiers::CONTROL) => {
                if form.remove_current_row() {
                    self.status_message = "Row removed".to_string();
                }
            }
            KeyCode::Enter => {
                if form.press_enter() {
                    if self.dashboard.loading {
                        self.status_message = "Save already in flight".to_string();
                    } else {
                        self.submit_form();
                    }
                }
            }
            KeyCode::Char(c) => form.handle_char(c),
            _ => {}
        }
        Ok(false)
    }

    fn handle_confirm_input(&mut self, key: KeyCode) -> io::Result<bool> {
        match key {
            KeyCode::Char('y') | KeyCode::Char('Y') | KeyCode::Enter => {
                if let Some(id) = self.pending_delete.take() {
                    self.spawn_delete(id);
                }
                self.state = AppState::TaskList;
            }
            KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => {
                self.pending_delete = None;
                self.state = AppState::TaskList;
            }
            _ => {}
        }
        Ok(false)
    }

    // --- rendering ----------------------------------------------------------

    fn render(&mut self, f: &mut Frame) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3),
                Constraint::Min(0),
                Constraint::Length(1),
            ])
            .split(f.area());

        self.render_filter_bar(f, chunks[0]);
        match self.state {
            AppState::TaskList => self.render_task_list(f, chunks[1]),
            AppState::TaskForm => self.render_task_form(f, chunks[1]),
            AppState::ConfirmDelete => {
                self.render_task_list(f, chunks[1]);
                self.render_confirm(f, chunks[1]);
            }
            AppState::Help => self.render_help(f, chunks[1]),
        }
        self.render_status_bar(f, chunks[2]);

        if self.dashboard.alert.is_some() {
            self.render_alert(f, f.area());
        }
    }

    fn render_filter_bar(&mut self, f: &mut Frame, area: Rect) {
        let columns = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([
                Constraint::Percentage(25),
                Constraint::Percentage(25),
                Constraint::Percentage(25),
                Constraint::Percentage(25),
            ])
            .split(area);

        for (i, name) in CONTROL_NAMES.iter().enumerate() {
            let focused = self.filter_focus && self.filter_bar.focused == i;
            let border = if focused {
                Style::default().fg(GOLD)
            } else {
                Style::default()
            };
            let value = self.filter_bar.control_value(
                i,
                &self.dashboard.projects,
                &self.dashboard.users,
            );
            let widget = Paragraph::new(format!("< {value} >"))
                .alignment(Alignment::Center)
                .block(
                    Block::default()
                        .borders(Borders::ALL)
                        .title(*name)
                        .border_style(border),
                );
            f.render_widget(widget, columns[i]);
        }
    }

    fn render_task_list(&mut self, f: &mut Frame, area: Rect) {
        let today = Local::now().date_naive();

        let header_cells = [
            "ID", "Type", "Status", "Priority", "Project", "Assignee", "Due", "Subs", "Title",
        ]
        .iter()
        .map(|h| Cell::from(*h).style(Style::default().add_modifier(Modifier::BOLD)));
        let header = Row::new(header_cells)
            .style(Style::default().bg(Color::Blue).fg(Color::White))
            .height(1);

        let rows: Vec<Row> = self
            .dashboard
            .tasks
            .iter()
            .map(|task| {
                let type_color = match task.task_type() {
                    TaskType::Feature => DARK_GREEN,
                    TaskType::Bug => DARK_RED,
                    TaskType::Chore => SLATE,
                };
                let style = match task.status {
                    Status::Done => Style::default().fg(Color::DarkGray),
                    Status::InProgress => {
                        Style::default().fg(type_color).add_modifier(Modifier::BOLD)
                    }
                    Status::Todo => Style::default().fg(Color::White),
                };
                Row::new(vec![
                    Cell::from(task.id.to_string()),
                    Cell::from(task.task_type().label()),
                    Cell::from(task.status.label()),
                    Cell::from(task.priority.label()),
                    Cell::from(truncate(self.project_name(task.project_id), 14)),
                    Cell::from(truncate(self.user_name(task.assignee_id), 14)),
                    Cell::from(format_due_relative(task.due, today)),
                    Cell::from(task.subtask_progress()),
                    Cell::from(task.title.clone()),
                ])
                .style(style)
            })
            .collect();

        let widths = [
            Constraint::Length(4),
            Constraint::Length(8),
            Constraint::Length(12),
            Constraint::Length(9),
            Constraint::Length(15),
            Constraint::Length(15),
            Constraint::Length(9),
            Constraint::Length(5),
            Constraint::Min(20),
        ];

        let title = if self.dashboard.loading {
            format!("Tasks ({}) - loading...", self.dashboard.tasks.len())
        } else {
            format!("Tasks ({}) - 'h' for help", self.dashboard.tasks.len())
        };

        let table = Table::new(rows, widths)
            .header(header)
            .block(Block::default().borders(Borders::ALL).title(title))
            .row_highlight_style(Style::default().bg(Color::Gray).fg(Color::Black))
            .highlight_symbol(">> ");

        f.render_stateful_widget(table, area, &mut self.list_state);
    }

    /// Field label, display text, and the input backing it (for the cursor).
    fn form_field_view<'a>(
        &self,
        form: &'a FormSession,
        field: FieldId,
    ) -> (String, String, Option<&'a InputField>) {
        match field {
            FieldId::Title => {
                let label = if form.title.is_blank() {
                    "Title * (required)".to_string()
                } else {
                    "Title *".to_string()
                };
                (label, form.title.value.clone(), Some(&form.title))
            }
            FieldId::Type => (
                "Task Type".into(),
                format!("< {} >", form.task_type().label()),
                None,
            ),
            FieldId::Priority => (
                "Priority".into(),
                format!("< {} >", Priority::ALL[form.priority_sel].label()),
                None,
            ),
            FieldId::Status => (
                "Status".into(),
                format!("< {} >", Status::ALL[form.status_sel].label()),
                None,
            ),
            FieldId::Project => {
                let name = form
                    .selected_project_id()
                    .and_then(|pid| form.projects.iter().find(|p| p.id == pid))
                    .map(|p| p.name.clone())
                    .unwrap_or_else(|| "-- Select Project --".into());
                ("Project".into(), format!("< {name} >"), None)
            }
            FieldId::Assignee => {
                let name = form
                    .selected_assignee_id()
                    .and_then(|uid| form.users.iter().find(|u| u.id == uid))
                    .map(|u| u.name.clone())
                    .unwrap_or_else(|| "Unassigned".into());
                ("Assignee".into(), format!("< {name} >"), None)
            }
            FieldId::Due => (
                "Due (YYYY-MM-DD, today, tomorrow, in Nd)".into(),
                form.due.value.clone(),
                Some(&form.due),
            ),
            FieldId::Description => (
                "Description".into(),
                form.description.value.clone(),
                Some(&form.description),
            ),
            FieldId::Severity => (
                "Severity".into(),
                format!("< {} >", form.severity().label()),
                None,
            ),
            FieldId::Steps => (
                "Steps to Reproduce".into(),
                form.steps.value.clone(),
                Some(&form.steps),
            ),
            FieldId::Criterion(i) => (
                format!("Criterion {} (Ctrl+D removes)", i + 1),
                form.criteria[i].text.value.clone(),
                Some(&form.criteria[i].text),
            ),
            FieldId::AddCriterion => (String::new(), "[ + Add Criterion ]".into(), None),
            FieldId::SubtaskTitle(i) => (
                format!("Subtask {} (Ctrl+D removes)", i + 1),
                form.subtasks[i].title.value.clone(),
                Some(&form.subtasks[i].title),
            ),
            FieldId::SubtaskDone(i) => {
                let mark = if form.subtasks[i].completed { "x" } else { " " };
                (
                    format!("Subtask {} Done", i + 1),
                    format!("< [{mark}] >"),
                    None,
                )
            }
            FieldId::AddSubtask => (String::new(), "[ + Add Subtask ]".into(), None),
        }
    }

    fn render_task_form(&mut self, f: &mut Frame, area: Rect) {
        let Some(form) = self.dashboard.form.as_ref() else {
            return;
        };

        let heading = match form.mode {
            FormMode::Create => "Create New Task".to_string(),
            FormMode::Edit(id) => format!("Edit Task #{id}"),
        };
        let outer = Block::default().borders(Borders::ALL).title(heading);
        let inner = outer.inner(area);
        f.render_widget(outer, area);

        let fields = form.visible_fields();
        let cursor = fields
            .iter()
            .position(|&fld| fld == form.current_field())
            .unwrap_or(0);

        // Scroll the field list so the focused field stays on screen.
        let rows_fit = ((inner.height.saturating_sub(2)) / 3).max(1) as usize;
        let first = cursor.saturating_sub(rows_fit - 1);
        let visible = &fields[first..fields.len().min(first + rows_fit)];

        let mut constraints: Vec<Constraint> =
            visible.iter().map(|_| Constraint::Length(3)).collect();
        constraints.push(Constraint::Min(0));
        let slots = Layout::default()
            .direction(Direction::Vertical)
            .constraints(constraints)
            .split(inner);

        let mut cursor_pos: Option<(u16, u16)> = None;
        for (slot, &field) in slots.iter().zip(visible.iter()) {
            let focused = field == form.current_field();
            let border = if focused {
                Style::default().fg(GOLD)
            } else {
                Style::default()
            };
            let (label, text, input) = self.form_field_view(form, field);
            let widget = Paragraph::new(text).block(
                Block::default()
                    .borders(Borders::ALL)
                    .title(label)
                    .border_style(border),
            );
            f.render_widget(widget, *slot);
            if focused {
                if let Some(input) = input {
                    cursor_pos = Some((slot.x + input.cursor as u16 + 1, slot.y + 1));
                }
            }
        }

        let submit_hint = if !form.is_valid() {
            "Enter: Save (blocked: title required)"
        } else if self.dashboard.loading {
            "Enter: Save (saving...)"
        } else {
            "Enter: Save"
        };
        let instructions = Paragraph::new(format!(
            "Tab/↑↓: Navigate  ←/→: Change selectors  {submit_hint}  Esc: Cancel"
        ))
        .wrap(Wrap { trim: true });
        if let Some(last) = slots.last() {
            f.render_widget(instructions, *last);
        }

        if let Some((x, y)) = cursor_pos {
            f.set_cursor_position((x, y));
        }
    }

    fn render_confirm(&mut self, f: &mut Frame, area: Rect) {
        let block = Block::default()
            .title("Confirm Delete")
            .borders(Borders::ALL)
            .style(Style::default().bg(DARK_RED));

        let area = centered_rect(50, 20, area);
        f.render_widget(Clear, area);

        let target = self
            .pending_delete
            .map(|id| format!("Delete task #{id}?"))
            .unwrap_or_default();
        let text = vec![
            Line::from(""),
            Line::from(Span::styled(
                target,
                Style::default().add_modifier(Modifier::BOLD),
            )),
            Line::from(""),
            Line::from("Press 'y' to confirm, 'n' to cancel"),
        ];

        let paragraph = Paragraph::new(text)
            .block(block)
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true });
        f.render_widget(paragraph, area);
    }

    fn render_alert(&mut self, f: &mut Frame, area: Rect) {
        let message = self.dashboard.alert.clone().unwrap_or_default();
        let block = Block::default()
            .title("Error")
            .borders(Borders::ALL)
            .style(Style::default().bg(DARK_RED).fg(Color::White));

        let area = centered_rect(50, 20, area);
        f.render_widget(Clear, area);

        let text = vec![
            Line::from(""),
            Line::from(message),
            Line::from(""),
            Line::from("Press Enter to dismiss"),
        ];
        let paragraph = Paragraph::new(text)
            .block(block)
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true });
        f.render_widget(paragraph, area);
    }

    fn render_help(&mut self, f: &mut Frame, area: Rect) {
        let help_text = vec![
            Line::from(Span::styled(
                "Task Dashboard Help",
                Style::default().add_modifier(Modifier::BOLD),
            )),
            Line::from(""),
            Line::from(Span::styled(
                "Task List:",
                Style::default().add_modifier(Modifier::BOLD),
            )),
            Line::from("  ↑/↓          Navigate tasks"),
            Line::from("  a            Create a new task"),
            Line::from("  e            Edit the selected task"),
            Line::from("  d            Delete the selected task (asks first)"),
            Line::from("  f            Focus the filter bar"),
            Line::from("  r            Re-fetch with the current filters"),
            Line::from("  h            Show this help"),
            Line::from("  q/Esc        Quit"),
            Line::from(""),
            Line::from(Span::styled(
                "Filter Bar:",
                Style::default().add_modifier(Modifier::BOLD),
            )),
            Line::from("  Tab/↑↓       Switch control"),
            Line::from("  ←/→          Change the focused filter (re-fetches)"),
            Line::from("  x            Clear all filters"),
            Line::from("  Esc/Enter    Back to the list"),
            Line::from(""),
            Line::from(Span::styled(
                "Task Form:",
                Style::default().add_modifier(Modifier::BOLD),
            )),
            Line::from("  Tab/↑↓       Navigate fields"),
            Line::from("  ←/→          Change selectors / move the cursor"),
            Line::from("  Enter        Save, or press an [ + Add ] button"),
            Line::from("  Ctrl+D       Remove the subtask/criterion row"),
            Line::from("  Esc          Cancel and discard changes"),
            Line::from(""),
            Line::from("Bug tasks add Severity and Steps to Reproduce;"),
            Line::from("Feature tasks add the Acceptance Criteria editor."),
        ];

        let paragraph = Paragraph::new(help_text)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .title("Help - press any key to return"),
            )
            .wrap(Wrap { trim: true });
        f.render_widget(paragraph, area);
    }

    fn render_status_bar(&mut self, f: &mut Frame, area: Rect) {
        let status_text = if self.dashboard.loading {
            "Loading...".to_string()
        } else if !self.status_message.is_empty() {
            self.status_message.clone()
        } else {
            match self.state {
                AppState::TaskList => format!(
                    "Tasks: {} | a add  e edit  d delete  f filter  h help",
                    self.dashboard.tasks.len()
                ),
                AppState::TaskForm => match self.dashboard.form_mode() {
                    Some(FormMode::Edit(id)) => format!("Edit Task #{id}"),
                    _ => "Create New Task".to_string(),
                },
                AppState::ConfirmDelete => "Confirm Delete".to_string(),
                AppState::Help => "Help".to_string(),
            }
        };

        let status = Paragraph::new(status_text)
            .style(Style::default().bg(Color::Blue).fg(Color::White))
            .alignment(Alignment::Left);
        f.render_widget(status, area);
    }
}
