use std::path::PathBuf;

use clap::Parser;

use crate::cmd::Commands;

/// Task dashboard over an in-memory mock API.
/// Seed data defaults to a built-in set or a JSON file passed via --seed.
#[derive(Parser)]
#[command(name = "taskboard", version, about = "Task management dashboard")]
pub struct Cli {
    /// Path to a JSON seed file for the mock API.
    #[arg(long, global = true)]
    pub seed: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}
