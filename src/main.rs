//! # tt - Consultant task tracker CLI
//!
//! A file-backed command-line client for tracking consultant tasks, the
//! cross-team "external dependencies" that gate them, and team workload
//! statistics.
//!
//! ## Key Features
//!
//! - **Task board across employees**: every task carries its owner, priority
//!   bucket, derived status and progress color.
//! - **External dependency tracking**: dependencies have their own status and
//!   date window; an overdue, not-completed dependency blocks task completion
//!   and is surfaced as "Overdue" without ever being stored that way.
//! - **Filtering and search**: priority, status, employee and free-text
//!   criteria combine with AND, with "All" sentinels meaning no filter.
//! - **Statistics**: completion rate, delayed and due-tomorrow counts, and a
//!   monthly completion trend.
//! - **Sync with scoping**: admins pull the whole collection, consultants
//!   only their own employee; a failed fetch falls back to the cached
//!   snapshot.
//!
//! ## Quick Start
//!
//! ```bash
//! # Log in and pull the collection
//! tt login me.json
//! tt sync
//!
//! # Most critical work first
//! tt list --status Pending
//!
//! # What is everyone waiting on?
//! tt deps
//! tt dep-update DEP-17 --status completed --comment "client signed off"
//!
//! # Close out a task (blocked unless its dependencies allow it)
//! tt complete TSK-4
//!
//! # Reporting
//! tt stats
//! tt trend
//! ```
//!
//! Data is stored locally in `~/.tasktrack/`: the employee snapshot, the
//! session user, and (optionally) a `remote/` export directory standing in
//! for the task API.

use std::path::PathBuf;

use clap::Parser;
use flexi_logger::Logger;

pub mod agg;
pub mod classify;
pub mod cli;
pub mod cmd;
pub mod dates;
pub mod deps;
pub mod employee;
pub mod error;
pub mod fields;
pub mod gateway;
pub mod session;
pub mod store;
pub mod task;

use cli::Cli;
use cmd::*;
use store::Store;

fn main() {
    let _logger = Logger::try_with_env_or_str("warn")
        .map(|l| l.log_to_stderr())
        .and_then(|l| l.start())
        .ok();

    let cli = Cli::parse();

    // Completions need no data directory at all.
    if let Commands::Completions { shell } = &cli.command {
        cmd_completions(*shell);
        return;
    }

    let data_dir = cli.data_dir.unwrap_or_else(|| {
        let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
        PathBuf::from(home).join(".tasktrack")
    });
    if let Err(e) = std::fs::create_dir_all(&data_dir) {
        eprintln!("Failed to create data directory {}: {}", data_dir.display(), e);
        std::process::exit(1);
    }

    let store_path = data_dir.join("employees.json");
    let session_path = data_dir.join("session.json");
    let default_remote = data_dir.join("remote");

    let mut store = Store::load(&store_path);

    match cli.command {
        Commands::Completions { .. } => unreachable!("completions handled above"),

        Commands::List { priority, status, employee, search, sort, limit } =>
            cmd_list(&store, priority, status, employee, search, sort, limit),

        Commands::View { task_id } => cmd_view(&store, &task_id),

        Commands::Employees => cmd_employees(&store),

        Commands::Deps => cmd_deps(&store),

        Commands::DepUpdate { dep_id, status, comment, remote } =>
            cmd_dep_update(&mut store, &store_path, &dep_id, status, comment, remote.as_deref()),

        Commands::Todo { task_id, remote } =>
            cmd_todo(&mut store, &store_path, &task_id, remote.as_deref()),

        Commands::Start { task_id, remote } =>
            cmd_start(&mut store, &store_path, &task_id, remote.as_deref()),

        Commands::Complete { task_id, force, remote } =>
            cmd_complete(&mut store, &store_path, &task_id, force, remote.as_deref()),

        Commands::Stats => cmd_stats(&store),

        Commands::Trend { months } => cmd_trend(&store, months),

        Commands::Sync { remote } =>
            cmd_sync(&mut store, &store_path, &session_path, remote.as_deref().unwrap_or(&default_remote)),

        Commands::Import { input } => cmd_import(&mut store, &store_path, &input),

        Commands::Login { input } => cmd_login(&session_path, &input),

        Commands::Logout { all } => cmd_logout(&session_path, &store_path, all),

        Commands::Whoami => cmd_whoami(&session_path),
    }
}
