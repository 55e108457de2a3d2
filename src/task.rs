//! Task data structures and lifecycle transitions.
//!
//! This module defines the `Task` entity as it travels over the legacy API
//! (camelCase field names, dates as ISO-8601 strings, lifecycle encoded in
//! three boolean flags), its owned `ExternalDependency` records, and the
//! partial-update payload sent back to the server.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::fields::{DependencyKind, DependencyStatus};

/// A unit of billable, trackable work owned by exactly one employee.
///
/// The lifecycle flags (`to_do` / `in_progress` / `completed`) are mutually
/// exclusive by convention; legacy records may violate this, which the
/// derivation in [`crate::classify::derived_state`] resolves with a fixed
/// precedence. `progress` is clamped to 0..=100 on every mutation the core
/// performs, not retroactively on ingestion.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: String,
    pub title: String,
    pub client: String,
    /// 1 = Critical .. 5 = Low; anything else maps to the "All" bucket.
    pub priority: i64,
    /// Percent complete, 0..=100.
    pub progress: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub to_do: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub in_progress: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub create_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completion_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub estimated_completion_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub task_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ticket: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weight: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub has_subtasks: Option<bool>,
    /// UI list state the legacy client stores server-side; carried so a
    /// snapshot round-trips without losing it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expanded: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub selected: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub team: Option<crate::employee::Team>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subtasks: Option<Vec<Subtask>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub work_week: Option<WorkWeek>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dependencies: Option<Vec<ExternalDependency>>,
}

impl Task {
    /// Dependency list, treating an absent array as empty.
    pub fn dependencies(&self) -> &[ExternalDependency] {
        self.dependencies.as_deref().unwrap_or(&[])
    }

    /// Set progress, clamped to 0..=100.
    pub fn set_progress(&mut self, progress: i64) {
        self.progress = progress.clamp(0, 100);
    }

    /// Place the task in the to-do column. Clears the other lifecycle flags.
    pub fn mark_todo(&mut self) {
        self.to_do = Some(true);
        self.in_progress = Some(false);
        self.completed = Some(false);
    }

    /// Transition to-do -> in progress. Clears the other lifecycle flags.
    pub fn start(&mut self) {
        self.to_do = Some(false);
        self.in_progress = Some(true);
        self.completed = Some(false);
    }

    /// Transition to completed: forces `progress = 100` and stamps the
    /// completion date. There is no transition back out of completed.
    pub fn complete(&mut self, now: DateTime<Utc>) {
        self.to_do = Some(false);
        self.in_progress = Some(false);
        self.completed = Some(true);
        self.progress = 100;
        self.completion_date = Some(now.to_rfc3339());
    }

    /// Build the partial-update payload for this task.
    ///
    /// Mirrors what the legacy client sent on a dependency update: the
    /// mutable fields only, never `estimated_completion_date`, `work_week`,
    /// `time`, `tags` or `team`, which the server owns.
    pub fn to_patch(&self) -> TaskPatch {
        TaskPatch {
            status: self.status.clone(),
            progress: Some(self.progress),
            to_do: self.to_do,
            in_progress: self.in_progress,
            completed: self.completed,
            comment: self.comment.clone(),
            completion_date: self.completion_date.clone(),
            expanded: self.expanded,
            selected: self.selected,
            dependencies: self.dependencies.clone(),
        }
    }
}

/// Server-side partial update for a task. Absent fields are left untouched.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TaskPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub progress: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub to_do: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub in_progress: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completion_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expanded: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub selected: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dependencies: Option<Vec<ExternalDependency>>,
}

impl TaskPatch {
    /// Apply this patch onto a task, clamping progress.
    pub fn apply_to(&self, task: &mut Task) {
        if let Some(ref status) = self.status {
            task.status = Some(status.clone());
        }
        if let Some(progress) = self.progress {
            task.set_progress(progress);
        }
        if self.to_do.is_some() {
            task.to_do = self.to_do;
        }
        if self.in_progress.is_some() {
            task.in_progress = self.in_progress;
        }
        if self.completed.is_some() {
            task.completed = self.completed;
        }
        if let Some(ref comment) = self.comment {
            task.comment = Some(comment.clone());
        }
        if let Some(ref date) = self.completion_date {
            task.completion_date = Some(date.clone());
        }
        if self.expanded.is_some() {
            task.expanded = self.expanded;
        }
        if self.selected.is_some() {
            task.selected = self.selected;
        }
        if let Some(ref deps) = self.dependencies {
            task.dependencies = Some(deps.clone());
        }
    }
}

/// A cross-team blocking condition attached to a task, with its own status
/// and date window. Created with the owning task and updated in place; never
/// deleted independently.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ExternalDependency {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: DependencyKind,
    pub status: DependencyStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
    pub start_date: String,
    pub end_date: String,
    pub created_at: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
}

/// A fine-grained sub-item of a task. Opaque to the core; carried for the
/// patch round-trip only.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Subtask {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub name: String,
    pub start_date: String,
    pub end_date: String,
    pub duration: String,
    pub status: String,
    pub completion: i64,
    pub assignee: String,
    pub department: String,
    pub client: String,
    pub task_type: String,
    pub completed: bool,
}

/// A Monday-to-Friday planning window tasks can be grouped into.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct WorkWeek {
    pub id: String,
    pub start_date: String,
    pub end_date: String,
    #[serde(default)]
    pub tasks: Vec<Task>,
    pub is_closed: bool,
    pub is_temporaly: bool,
}
