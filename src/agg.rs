//! Task aggregation, filtering, sorting and summary statistics.
//!
//! The employee collection is flattened into display rows that carry the
//! owning employee's identity without mutating the canonical entities, then
//! filtered by AND-combined criteria, sorted by priority and rolled up into
//! the stats and trend figures the reporting commands print.

use chrono::{DateTime, Datelike, Utc};

use crate::classify::{derived_state, priority_label};
use crate::dates::{days_until, month_label, parse_when_opt, trailing_months};
use crate::employee::Employee;
use crate::fields::SortDirection;
use crate::task::Task;

/// A task denormalized with the identity of its owning employee, for
/// display and filtering only. The canonical `Task` is never mutated.
#[derive(Debug, Clone, PartialEq)]
pub struct FlatTask {
    pub employee_id: String,
    pub employee_name: String,
    pub task: Task,
}

/// Multi-criterion task filter. Every populated criterion must match
/// (logical AND); `None` and the "All"/"Todas"/"Todos" sentinels mean
/// no filtering on that axis.
#[derive(Debug, Clone, Default)]
pub struct TaskFilter {
    /// Priority bucket label ("Critical" .. "Low"); "All"/"Todas" passes everything.
    pub priority: Option<String>,
    /// Derived-state label ("Pending", "In Progress", "Completed"); "All"/"Todos" passes everything.
    pub status: Option<String>,
    /// Owning employee id; `None` passes everything.
    pub employee_id: Option<String>,
    /// Case-insensitive substring match against task title and client name.
    pub search: Option<String>,
}

impl TaskFilter {
    fn priority_active(&self) -> Option<&str> {
        active_label(self.priority.as_deref(), &["all", "todas"])
    }

    fn status_active(&self) -> Option<&str> {
        active_label(self.status.as_deref(), &["all", "todos"])
    }

    fn matches(&self, flat: &FlatTask) -> bool {
        if let Some(wanted) = self.priority_active() {
            if !priority_label(flat.task.priority).eq_ignore_ascii_case(wanted) {
                return false;
            }
        }
        if let Some(wanted) = self.status_active() {
            if !derived_state(&flat.task).matches_label(wanted) {
                return false;
            }
        }
        if let Some(ref id) = self.employee_id {
            if &flat.employee_id != id {
                return false;
            }
        }
        if let Some(ref needle) = self.search {
            let needle = needle.trim().to_lowercase();
            if !needle.is_empty() {
                let title = flat.task.title.to_lowercase();
                let client = flat.task.client.to_lowercase();
                if !title.contains(&needle) && !client.contains(&needle) {
                    return false;
                }
            }
        }
        true
    }
}

fn active_label<'a>(label: Option<&'a str>, sentinels: &[&str]) -> Option<&'a str> {
    let label = label?.trim();
    if label.is_empty() || sentinels.iter().any(|s| label.eq_ignore_ascii_case(s)) {
        None
    } else {
        Some(label)
    }
}

/// Summary figures over a task collection.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TaskStats {
    pub completed: usize,
    pub in_progress: usize,
    /// End date in the past and not completed.
    pub delayed: usize,
    /// End date exactly on the next calendar day and not completed.
    pub upcoming_deadlines: usize,
    pub total_tasks: usize,
    /// Percentage 0..=100; 0 on an empty collection.
    pub completion_rate: f64,
}

/// Denormalize every employee's tasks into display rows, in owner order.
pub fn flatten_tasks(employees: &[Employee]) -> Vec<FlatTask> {
    employees
        .iter()
        .flat_map(|e| {
            e.tasks.iter().map(|t| FlatTask {
                employee_id: e.id.clone(),
                employee_name: e.name.clone(),
                task: t.clone(),
            })
        })
        .collect()
}

/// Apply AND-combined filter criteria. Input order is preserved and the
/// input itself is never mutated.
pub fn filter_tasks(flat: &[FlatTask], filter: &TaskFilter) -> Vec<FlatTask> {
    flat.iter().filter(|f| filter.matches(f)).cloned().collect()
}

/// Stable sort by numeric priority. Ascending (most critical first) is the
/// canonical order; ties keep their original relative order.
pub fn sort_by_priority(mut tasks: Vec<FlatTask>, direction: SortDirection) -> Vec<FlatTask> {
    match direction {
        SortDirection::Ascending => tasks.sort_by_key(|f| f.task.priority),
        SortDirection::Descending => tasks.sort_by(|a, b| b.task.priority.cmp(&a.task.priority)),
    }
    tasks
}

/// Roll a task collection up into summary statistics.
///
/// Absent or unparseable end dates count as neither delayed nor upcoming.
/// The completion rate is 0 for an empty collection, never a division by
/// zero.
pub fn compute_stats(tasks: &[Task], now: DateTime<Utc>) -> TaskStats {
    let completed = tasks.iter().filter(|t| t.completed == Some(true)).count();
    let in_progress = tasks.iter().filter(|t| t.in_progress == Some(true)).count();
    let delayed = tasks
        .iter()
        .filter(|t| t.completed != Some(true))
        .filter(|t| matches!(parse_when_opt(t.end_date.as_deref()), Some(end) if now > end))
        .count();
    let upcoming_deadlines = tasks
        .iter()
        .filter(|t| t.completed != Some(true))
        .filter(|t| {
            matches!(parse_when_opt(t.end_date.as_deref()), Some(end) if days_until(now, end) == 1)
        })
        .count();
    let total_tasks = tasks.len();
    let completion_rate = if total_tasks > 0 {
        completed as f64 / total_tasks as f64 * 100.0
    } else {
        0.0
    };
    TaskStats {
        completed,
        in_progress,
        delayed,
        upcoming_deadlines,
        total_tasks,
        completion_rate,
    }
}

/// Completed-task counts for the trailing `months_back` calendar months,
/// oldest month first, with short month labels.
///
/// Matching is by month name only, not year: a task completed last March
/// lands in the same bucket as one completed this March. Known legacy
/// behavior, kept until the product decides on (year, month) keying.
pub fn monthly_completion_trend(
    tasks: &[Task],
    now: DateTime<Utc>,
    months_back: u32,
) -> (Vec<String>, Vec<usize>) {
    let months = trailing_months(now, months_back);
    let labels = months.iter().map(|&m| month_label(m).to_string()).collect();
    let counts = months
        .iter()
        .map(|&month| {
            tasks
                .iter()
                .filter(|t| t.completed == Some(true))
                .filter(|t| {
                    matches!(parse_when_opt(t.end_date.as_deref()), Some(end) if end.month() == month)
                })
                .count()
        })
        .collect();
    (labels, counts)
}
