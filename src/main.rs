//! # Taskboard - Task Management Dashboard
//!
//! A terminal task dashboard over an in-memory mock API, for trialling
//! workflows before a real backend exists.
//!
//! ## Key Features
//!
//! - **Typed Tasks**: Feature, Bug, and Chore tasks, each with its own extra
//!   fields (acceptance criteria, severity and reproduction steps)
//! - **Full CRUD**: Create, edit, and delete tasks through a dynamic form
//! - **Server-Style Filtering**: Project, assignee, status, and type filters
//!   re-fetch the list through the API rather than filtering locally
//! - **Simulated Latency**: The mock API answers asynchronously, so the UI
//!   exercises the same loading and error paths a network client would
//!
//! ## Quick Start
//!
//! ```bash
//! # Launch the dashboard with built-in demo data
//! taskboard ui
//!
//! # Or with your own seed file
//! taskboard --seed tasks.json ui
//!
//! # List tasks non-interactively
//! taskboard list --status todo --type bug
//! ```
//!
//! Data lives only in memory: quitting the dashboard discards all changes.

use std::sync::Arc;

use clap::Parser;

pub mod api;
pub mod cli;
pub mod cmd;
pub mod dashboard;
pub mod fields;
pub mod form;
pub mod model;
pub mod tui {
    pub mod app;
    pub mod colors;
    pub mod filter;
    pub mod input;
    pub mod run;
    pub mod utils;
}

use api::{sample_seed, MockApi, SeedData};
use cli::Cli;
use cmd::{cmd_completions, cmd_list, cmd_ui, Commands};

/// Route log output to a file when the alternate screen is active,
/// otherwise stderr.
fn init_logging(interactive: bool) {
    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"));
    if interactive {
        match std::fs::File::create("taskboard.log") {
            Ok(file) => {
                builder.target(env_logger::Target::Pipe(Box::new(file)));
            }
            Err(_) => {
                // No log file, better to drop output than scribble on the UI.
                builder.filter_level(log::LevelFilter::Off);
            }
        }
    }
    builder.init();
}

fn main() {
    let cli = Cli::parse();
    let command = cli.command.unwrap_or(Commands::Ui);

    init_logging(matches!(command, Commands::Ui));

    let seed = match cli.seed.as_deref() {
        Some(path) => SeedData::load(path),
        None => sample_seed(),
    };
    let api = Arc::new(MockApi::new(seed));

    match command {
        Commands::Ui => cmd_ui(api),
        Commands::List {
            project,
            assignee,
            status,
            task_type,
        } => cmd_list(api, project, assignee, status, task_type),
        Commands::Completions { shell } => cmd_completions(shell),
    }
}
