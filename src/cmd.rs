//! Command implementations for the CLI interface.
//!
//! The dashboard is the primary interface; `list` exists for scripting
//! against the same filtered fetch the dashboard uses, and `completions`
//! generates shell completion scripts.

use std::sync::Arc;

use chrono::Local;
use clap::Subcommand;
use clap_complete::{generate, Shell};

use crate::api::{FilterCriteria, MockApi};
use crate::fields::{Status, TaskType};
use crate::model::{format_due_relative, truncate, Task};
use crate::tui::run::run_dashboard;

#[derive(Subcommand)]
pub enum Commands {
    /// Launch the interactive dashboard.
    Ui,

    /// List tasks with optional filters.
    List {
        /// Filter by project ID.
        #[arg(long)]
        project: Option<u64>,
        /// Filter by assignee user ID.
        #[arg(long)]
        assignee: Option<u64>,
        /// Filter by status: todo | in-progress | done.
        #[arg(long, value_enum)]
        status: Option<Status>,
        /// Filter by task type: feature | bug | chore.
        #[arg(long = "type", value_enum)]
        task_type: Option<TaskType>,
    },

    /// Generate shell completion scripts.
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// Launch the terminal user interface.
pub fn cmd_ui(api: Arc<MockApi>) {
    if let Err(e) = run_dashboard(api) {
        eprintln!("UI error: {e}");
        std::process::exit(1);
    }
}

/// List tasks through the same filtered fetch the dashboard uses.
pub fn cmd_list(
    api: Arc<MockApi>,
    project: Option<u64>,
    assignee: Option<u64>,
    status: Option<Status>,
    task_type: Option<TaskType>,
) {
    let criteria = FilterCriteria {
        project_id: project,
        assignee_id: assignee,
        status,
        task_type,
    };

    let runtime = match tokio::runtime::Runtime::new() {
        Ok(rt) => rt,
        Err(e) => {
            eprintln!("Failed to start runtime: {e}");
            std::process::exit(1);
        }
    };

    let result = runtime.block_on(async {
        let tasks = api.fetch_tasks(&criteria).await?;
        let users = api.fetch_users().await?;
        let projects = api.fetch_projects().await?;
        Ok::<_, crate::api::ApiError>((tasks.data, users.data, projects.data))
    });

    match result {
        Ok((tasks, users, projects)) => print_table(&tasks, &users, &projects),
        Err(e) => {
            eprintln!("Failed to fetch tasks: {e}");
            std::process::exit(1);
        }
    }
}

fn print_table(tasks: &[Task], users: &[crate::model::User], projects: &[crate::model::Project]) {
    let today = Local::now().date_naive();
    println!(
        "{:<4} {:<8} {:<12} {:<9} {:<16} {:<16} {:<10} {:<5} {}",
        "ID", "Type", "Status", "Priority", "Project", "Assignee", "Due", "Subs", "Title"
    );
    for t in tasks {
        let project = t
            .project_id
            .and_then(|pid| projects.iter().find(|p| p.id == pid))
            .map(|p| p.name.as_str())
            .unwrap_or("-");
        let assignee = t
            .assignee_id
            .and_then(|uid| users.iter().find(|u| u.id == uid))
            .map(|u| u.name.as_str())
            .unwrap_or("-");
        println!(
            "{:<4} {:<8} {:<12} {:<9} {:<16} {:<16} {:<10} {:<5} {}",
            t.id,
            t.task_type().label(),
            t.status.label(),
            t.priority.label(),
            truncate(project, 16),
            truncate(assignee, 16),
            format_due_relative(t.due, today),
            t.subtask_progress(),
            truncate(&t.title, 48),
        );
    }
    println!("{} task(s)", tasks.len());
}

/// Generate shell completion scripts.
pub fn cmd_completions(shell: Shell) {
    use crate::cli::Cli;
    use clap::CommandFactory;

    let mut app = Cli::command();
    let app_name = app.get_name().to_string();
    generate(shell, &mut app, app_name, &mut std::io::stdout());
}
