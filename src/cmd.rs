//! Command implementations for the CLI interface.
//!
//! Each handler loads or receives the store snapshot, runs the relevant core
//! functions and prints plain-text tables. Errors surface here as stderr
//! messages and a non-zero exit; the library layer below never terminates
//! the process.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use clap::Subcommand;
use clap_complete::{generate, Shell};
use log::warn;

use crate::agg::{compute_stats, filter_tasks, flatten_tasks, monthly_completion_trend, sort_by_priority, FlatTask, TaskFilter};
use crate::classify::{
    derived_state, effective_status_color, priority_color, priority_label, progress_color, state_label,
};
use crate::dates::{days_until, parse_when_opt};
use crate::deps::{collect_dependencies, effective_status, task_is_unblocked, update_dependency};
use crate::error::Error;
use crate::fields::{DependencyStatus, EffectiveStatus, SortDirection};
use crate::gateway::{fetch_employees, FileApi, TaskApi};
use crate::session;
use crate::store::Store;
use crate::task::TaskPatch;

#[derive(Subcommand)]
pub enum Commands {
    /// List tasks across all employees with filters and priority sorting.
    List {
        /// Priority bucket: Critical | High | Medium | Normal | Low | All.
        #[arg(long)]
        priority: Option<String>,
        /// Derived status: Pending | "In Progress" | Completed | All.
        #[arg(long)]
        status: Option<String>,
        /// Only tasks owned by this employee id.
        #[arg(long)]
        employee: Option<String>,
        /// Case-insensitive substring match on title and client name.
        #[arg(long)]
        search: Option<String>,
        /// Sort direction over numeric priority.
        #[arg(long, value_enum, default_value_t = SortDirection::Ascending)]
        sort: SortDirection,
        /// Limit number of rows printed.
        #[arg(long)]
        limit: Option<usize>,
    },

    /// View a single task with its dependencies.
    View {
        /// Task id to view.
        task_id: String,
    },

    /// List employees with their performance figures.
    Employees,

    /// List every external dependency with its effective (clock-aware) status.
    Deps,

    /// Update one dependency's status and comment, wherever it lives.
    DepUpdate {
        /// Dependency id to update.
        dep_id: String,
        /// New status: pending | in-process | completed.
        #[arg(long, value_enum)]
        status: DependencyStatus,
        /// Replacement comment.
        #[arg(long)]
        comment: Option<String>,
        /// Remote export directory to push the task patch to.
        #[arg(long)]
        remote: Option<PathBuf>,
    },

    /// Place a task back in the to-do column.
    Todo {
        task_id: String,
        #[arg(long)]
        remote: Option<PathBuf>,
    },

    /// Move a task from to-do to in progress.
    Start {
        task_id: String,
        #[arg(long)]
        remote: Option<PathBuf>,
    },

    /// Mark a task completed: progress 100, completion date stamped.
    Complete {
        task_id: String,
        /// Complete even while an overdue dependency still blocks the task.
        #[arg(long)]
        force: bool,
        #[arg(long)]
        remote: Option<PathBuf>,
    },

    /// Print summary statistics over the whole collection.
    Stats,

    /// Print the monthly completion trend.
    Trend {
        /// How many trailing calendar months to report.
        #[arg(long, default_value_t = 6)]
        months: u32,
    },

    /// Refresh the local collection from the remote export, scoped to the
    /// logged-in user. Falls back to the cached collection when the remote
    /// is unreachable.
    Sync {
        /// Remote export directory (default: <data-dir>/remote).
        #[arg(long)]
        remote: Option<PathBuf>,
    },

    /// Replace the local collection from an employees JSON snapshot.
    Import {
        /// Snapshot file to import.
        input: PathBuf,
    },

    /// Store the session user from a JSON file.
    Login {
        /// User JSON file.
        input: PathBuf,
    },

    /// Clear the stored session.
    Logout {
        /// Also wipe the cached employee snapshot.
        #[arg(long)]
        all: bool,
    },

    /// Show the logged-in user.
    Whoami,

    /// Generate shell completion scripts.
    Completions {
        /// Shell to generate completions for.
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// List tasks with filters, sorted by priority.
pub fn cmd_list(
    store: &Store,
    priority: Option<String>,
    status: Option<String>,
    employee: Option<String>,
    search: Option<String>,
    sort: SortDirection,
    limit: Option<usize>,
) {
    let filter = TaskFilter { priority, status, employee_id: employee, search };
    let flat = flatten_tasks(&store.employees);
    let mut rows = sort_by_priority(filter_tasks(&flat, &filter), sort);
    if let Some(n) = limit {
        rows.truncate(n);
    }
    print_task_table(&rows, Utc::now());
}

/// View detailed information about a single task.
pub fn cmd_view(store: &Store, task_id: &str) {
    let Some((owner, task)) = store.find_task(task_id) else {
        eprintln!("Task {task_id} not found.");
        std::process::exit(1);
    };
    let now = Utc::now();
    let state = derived_state(task);
    println!("ID:          {}", task.id);
    println!("Title:       {}", task.title);
    println!("Client:      {}", task.client);
    println!("Employee:    {} ({})", owner.name, owner.id);
    println!(
        "Priority:    {} ({})",
        priority_label(task.priority),
        priority_color(task.priority).hex()
    );
    println!("Status:      {}", state_label(state));
    println!(
        "Progress:    {}% ({})",
        task.progress,
        progress_color(task.progress).hex()
    );
    println!("Due:         {}", format_end_relative(task.end_date.as_deref(), now));
    println!(
        "Unblocked:   {}",
        if task_is_unblocked(task, now) { "yes" } else { "no" }
    );
    let deps = task.dependencies();
    if deps.is_empty() {
        println!("Dependencies: -");
    } else {
        println!("Dependencies:");
        for dep in deps {
            let eff = effective_status(dep, now);
            println!(
                "  {} [{}] {} {} -> {}{}",
                dep.id,
                dep.kind.label(),
                eff.label(),
                dep.start_date,
                dep.end_date,
                dep.comment.as_deref().map(|c| format!("  ({c})")).unwrap_or_default()
            );
        }
    }
}

/// List employees with their server-computed performance figures.
pub fn cmd_employees(store: &Store) {
    println!(
        "{:<10} {:<20} {:<14} {:<6} {:<7} {:<7} {:<8} {}",
        "ID", "Name", "Team", "Tasks", "Effic", "Score", "Pareto", "Active"
    );
    for e in &store.employees {
        let team = e.team.as_ref().map(|t| t.name.as_str()).unwrap_or("-");
        let score = e.score.map(|s| format!("{s:.1}")).unwrap_or_else(|| "-".into());
        println!(
            "{:<10} {:<20} {:<14} {:<6} {:<7.1} {:<7} {:<8.1} {}",
            truncate(&e.id, 10),
            truncate(&e.name, 20),
            truncate(team, 14),
            e.tasks.len(),
            e.efficiency,
            score,
            e.ley_pareto,
            if e.is_active { "yes" } else { "no" }
        );
    }
}

/// List every dependency across the collection with its effective status.
pub fn cmd_deps(store: &Store) {
    let now = Utc::now();
    let deps = collect_dependencies(&store.employees);
    if deps.is_empty() {
        println!("No dependencies registered.");
        return;
    }
    println!(
        "{:<12} {:<16} {:<11} {:<9} {:<12} {:<12} {}",
        "ID", "Type", "Status", "Color", "Start", "End", "Comment"
    );
    for dep in deps {
        let eff = effective_status(dep, now);
        println!(
            "{:<12} {:<16} {:<11} {:<9} {:<12} {:<12} {}",
            truncate(&dep.id, 12),
            dep.kind.label(),
            eff.label(),
            effective_status_color(eff).hex(),
            truncate(&dep.start_date, 12),
            truncate(&dep.end_date, 12),
            dep.comment.as_deref().unwrap_or("-")
        );
    }
}

/// Update one dependency and persist the owning task, locally and (when a
/// remote export is given) upstream.
pub fn cmd_dep_update(
    store: &mut Store,
    store_path: &Path,
    dep_id: &str,
    status: DependencyStatus,
    comment: Option<String>,
    remote: Option<&Path>,
) {
    let now = Utc::now();
    let (task, patch) = match update_dependency(&mut store.employees, dep_id, status, comment, now) {
        Ok(done) => done,
        Err(e) => {
            eprintln!("{e}");
            std::process::exit(1);
        }
    };
    save_or_exit(store, store_path);
    push_patch(store, store_path, remote, &task.id, &patch);
    println!("Updated dependency {dep_id} on task {}", task.id);
}

/// Place a task in the to-do column.
pub fn cmd_todo(store: &mut Store, store_path: &Path, task_id: &str, remote: Option<&Path>) {
    let Some(task) = store.find_task_mut(task_id) else {
        eprintln!("Task {task_id} not found.");
        std::process::exit(1);
    };
    task.mark_todo();
    let patch = task.to_patch();
    save_or_exit(store, store_path);
    push_patch(store, store_path, remote, task_id, &patch);
    println!("Task {task_id} is back on the to-do list.");
}

/// Transition a task from to-do to in progress.
pub fn cmd_start(store: &mut Store, store_path: &Path, task_id: &str, remote: Option<&Path>) {
    let Some(task) = store.find_task_mut(task_id) else {
        eprintln!("Task {task_id} not found.");
        std::process::exit(1);
    };
    task.start();
    let patch = task.to_patch();
    save_or_exit(store, store_path);
    push_patch(store, store_path, remote, task_id, &patch);
    println!("Task {task_id} is now in progress.");
}

/// Complete a task, gated on its external dependencies.
pub fn cmd_complete(store: &mut Store, store_path: &Path, task_id: &str, force: bool, remote: Option<&Path>) {
    let now = Utc::now();
    let Some(task) = store.find_task_mut(task_id) else {
        eprintln!("Task {task_id} not found.");
        std::process::exit(1);
    };
    if !force && !task_is_unblocked(task, now) {
        eprintln!("Task {task_id} is blocked by overdue dependencies:");
        for dep in task.dependencies() {
            if effective_status(dep, now) == EffectiveStatus::Overdue {
                eprintln!("  {} [{}] due {}", dep.id, dep.kind.label(), dep.end_date);
            }
        }
        eprintln!("Use --force to complete anyway.");
        std::process::exit(1);
    }
    task.complete(now);
    let patch = task.to_patch();
    save_or_exit(store, store_path);
    push_patch(store, store_path, remote, task_id, &patch);
    println!("Task {task_id} completed.");
}

/// Print the summary statistics block.
pub fn cmd_stats(store: &Store) {
    let tasks = store.all_tasks();
    let stats = compute_stats(&tasks, Utc::now());
    println!("Total tasks:         {}", stats.total_tasks);
    println!("Completed:           {} ({:.1}%)", stats.completed, stats.completion_rate);
    println!("In progress:         {}", stats.in_progress);
    println!("Delayed:             {}", stats.delayed);
    println!("Due tomorrow:        {}", stats.upcoming_deadlines);
}

/// Print the monthly completion trend, oldest month first.
pub fn cmd_trend(store: &Store, months: u32) {
    let tasks = store.all_tasks();
    let (labels, counts) = monthly_completion_trend(&tasks, Utc::now(), months);
    for (label, count) in labels.iter().zip(&counts) {
        println!("{label:<4} {count:>4}  {}", "#".repeat(*count));
    }
}

/// Refresh the collection from the remote export, scoped to the session
/// user. A fetch failure is non-fatal: the cached collection stays in place.
pub fn cmd_sync(store: &mut Store, store_path: &Path, session_path: &Path, remote_dir: &Path) {
    let Some(user) = session::current_user(session_path) else {
        eprintln!("Not logged in. Run `tt login <user.json>` first.");
        std::process::exit(1);
    };
    let api = FileApi::new(remote_dir);
    match fetch_employees(&api, &user) {
        Ok(employees) => {
            let count = employees.len();
            store.replace_all(employees);
            save_or_exit(store, store_path);
            println!("Synced {count} employee(s).");
        }
        Err(Error::RemoteFetch(e)) => {
            warn!("remote fetch failed: {e}");
            println!(
                "Remote unavailable; keeping cached collection ({} employee(s)).",
                store.employees.len()
            );
        }
        Err(e) => {
            eprintln!("{e}");
            std::process::exit(1);
        }
    }
}

/// Replace the collection from a snapshot file.
pub fn cmd_import(store: &mut Store, store_path: &Path, input: &Path) {
    let data = match std::fs::read_to_string(input) {
        Ok(data) => data,
        Err(e) => {
            eprintln!("Cannot read {}: {e}", input.display());
            std::process::exit(1);
        }
    };
    let imported: Store = match serde_json::from_str(&data) {
        Ok(imported) => imported,
        Err(e) => {
            eprintln!("Invalid snapshot {}: {e}", input.display());
            std::process::exit(1);
        }
    };
    let count = imported.employees.len();
    store.replace_all(imported.employees);
    save_or_exit(store, store_path);
    println!("Imported {count} employee(s).");
}

/// Persist the session user from a JSON file.
pub fn cmd_login(session_path: &Path, input: &Path) {
    let data = match std::fs::read_to_string(input) {
        Ok(data) => data,
        Err(e) => {
            eprintln!("Cannot read {}: {e}", input.display());
            std::process::exit(1);
        }
    };
    let user: crate::employee::User = match serde_json::from_str(&data) {
        Ok(user) => user,
        Err(e) => {
            eprintln!("Invalid user file {}: {e}", input.display());
            std::process::exit(1);
        }
    };
    if let Err(e) = session::save_user(session_path, &user) {
        eprintln!("Failed to save session: {e}");
        std::process::exit(1);
    }
    println!("Logged in as {}.", user.username);
}

/// Drop the stored session, and with `--all` the cached snapshot too.
pub fn cmd_logout(session_path: &Path, store_path: &Path, all: bool) {
    if let Err(e) = session::clear(session_path) {
        eprintln!("Failed to clear session: {e}");
        std::process::exit(1);
    }
    if all {
        match std::fs::remove_file(store_path) {
            Ok(()) => {}
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => {
                eprintln!("Failed to remove snapshot: {e}");
                std::process::exit(1);
            }
        }
        println!("Logged out; local data cleared.");
    } else {
        println!("Logged out.");
    }
}

/// Show the logged-in user.
pub fn cmd_whoami(session_path: &Path) {
    match session::current_user(session_path) {
        Some(user) => {
            let role = user.role.as_ref().map(|r| r.name.as_str()).unwrap_or("-");
            let linked = user.employee.as_ref().map(|e| e.id.as_str()).unwrap_or("-");
            println!("{} (role: {role}, employee: {linked})", user.username);
        }
        None => println!("Not logged in."),
    }
}

/// Generate shell completion scripts on stdout.
pub fn cmd_completions(shell: Shell) {
    let mut cmd = <crate::cli::Cli as clap::CommandFactory>::command();
    let name = cmd.get_name().to_string();
    generate(shell, &mut cmd, name, &mut std::io::stdout());
}

fn save_or_exit(store: &Store, store_path: &Path) {
    if let Err(e) = store.save(store_path) {
        eprintln!("Failed to save store: {e}");
        std::process::exit(1);
    }
}

/// Best-effort push of a task patch to the remote export. The local update
/// already happened; an unreachable remote only logs a warning.
fn push_patch(store: &mut Store, store_path: &Path, remote: Option<&Path>, task_id: &str, patch: &TaskPatch) {
    let Some(dir) = remote else {
        return;
    };
    let api = FileApi::new(dir);
    match api.patch_task(task_id, patch) {
        Ok(updated) => {
            // Take the server's view of the task back into the cache.
            store.update_task(&updated);
            save_or_exit(store, store_path);
        }
        Err(e) => warn!("remote patch for task {task_id} not applied: {e}"),
    }
}

/// Print tasks in a formatted table.
fn print_task_table(rows: &[FlatTask], now: DateTime<Utc>) {
    println!(
        "{:<10} {:<9} {:<12} {:<5} {:<10} {:<16} {}",
        "ID", "Pri", "Status", "Prog", "Due", "Employee", "Title (client)"
    );
    for row in rows {
        let t = &row.task;
        println!(
            "{:<10} {:<9} {:<12} {:<5} {:<10} {:<16} {} ({})",
            truncate(&t.id, 10),
            priority_label(t.priority),
            state_label(derived_state(t)),
            format!("{}%", t.progress),
            format_end_relative(t.end_date.as_deref(), now),
            truncate(&row.employee_name, 16),
            t.title,
            t.client
        );
    }
}

/// Format an end date relative to today ("today", "tomorrow", "in 3d", "2d late").
fn format_end_relative(end: Option<&str>, now: DateTime<Utc>) -> String {
    match parse_when_opt(end) {
        None => "-".into(),
        Some(when) => {
            let days = days_until(now, when);
            if days == 0 {
                "today".into()
            } else if days == 1 {
                "tomorrow".into()
            } else if days > 1 {
                format!("in {days}d")
            } else {
                format!("{}d late", -days)
            }
        }
    }
}

/// Truncate a string to a maximum width, adding ellipsis if needed.
fn truncate(s: &str, width: usize) -> String {
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
    use chrono::TimeZone;

    #[test]
    fn relative_end_dates_read_naturally() {
        let now = Utc.with_ymd_and_hms(2024, 3, 15, 12, 0, 0).unwrap();
        assert_eq!(format_end_relative(None, now), "-");
        assert_eq!(format_end_relative(Some("2024-03-15"), now), "today");
        assert_eq!(format_end_relative(Some("2024-03-16"), now), "tomorrow");
        assert_eq!(format_end_relative(Some("2024-03-20"), now), "in 5d");
        assert_eq!(format_end_relative(Some("2024-03-13"), now), "2d late");
        assert_eq!(format_end_relative(Some("garbage"), now), "-");
    }

    #[test]
    fn truncate_respects_width() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("a very long client name", 10), "a very lo…");
    }

    #[test]
    fn logout_all_wipes_session_and_snapshot() {
        let dir = tempfile::tempdir().unwrap();
        let session_path = dir.path().join("session.json");
        let store_path = dir.path().join("employees.json");
        let user = crate::employee::User {
            id: "u1".into(),
            username: "ana".into(),
            is_active: Some(true),
            role: None,
            employee: None,
            team: None,
        };
        session::save_user(&session_path, &user).unwrap();
        Store::default().save(&store_path).unwrap();

        cmd_logout(&session_path, &store_path, false);
        assert!(session::current_user(&session_path).is_none());
        assert!(store_path.exists());

        session::save_user(&session_path, &user).unwrap();
        cmd_logout(&session_path, &store_path, true);
        assert!(session::current_user(&session_path).is_none());
        assert!(!store_path.exists());

        // Nothing left to remove is not an error.
        cmd_logout(&session_path, &store_path, true);
    }
}
