//! Enumerations and field types for tasks and external dependencies.
//!
//! This module defines the structured vocabulary of the tracker: dependency
//! departments and statuses, the derived task state, color tokens and sort
//! direction. Wire values follow the legacy Spanish API; English aliases are
//! accepted on input so hand-written fixtures and newer clients both parse.

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

/// Department or role a cross-team external dependency is waiting on.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum DependencyKind {
    #[serde(rename = "DESARROLLO I", alias = "development-1")]
    DevelopmentOne,
    #[serde(rename = "DESARROLLO II", alias = "development-2")]
    DevelopmentTwo,
    #[serde(rename = "CALIDAD", alias = "quality")]
    Quality,
    #[serde(rename = "CLIENTE", alias = "client")]
    Client,
    #[serde(rename = "ENCARGADO DE CONSULTORÍA", alias = "consulting-lead")]
    ConsultingLead,
    #[serde(rename = "FINANZAS", alias = "finance")]
    Finance,
    #[serde(rename = "GERENCIA", alias = "management")]
    Management,
    #[serde(rename = "VENTAS", alias = "sales")]
    Sales,
    #[serde(rename = "IMPLEMENTACIÓN", alias = "implementation")]
    Implementation,
}

impl DependencyKind {
    pub fn label(self) -> &'static str {
        match self {
            DependencyKind::DevelopmentOne => "Development I",
            DependencyKind::DevelopmentTwo => "Development II",
            DependencyKind::Quality => "Quality",
            DependencyKind::Client => "Client",
            DependencyKind::ConsultingLead => "Consulting Lead",
            DependencyKind::Finance => "Finance",
            DependencyKind::Management => "Management",
            DependencyKind::Sales => "Sales",
            DependencyKind::Implementation => "Implementation",
        }
    }
}

/// Stored status of an external dependency.
///
/// "Overdue" is deliberately absent: it is a derived display state computed
/// against the clock, never persisted. See [`EffectiveStatus`].
#[derive(Debug, Clone, Copy, Serialize, Deserialize, ValueEnum, PartialEq, Eq)]
pub enum DependencyStatus {
    #[serde(rename = "pendiente", alias = "pending")]
    Pending,
    #[serde(rename = "en proceso", alias = "in-process", alias = "in process")]
    InProcess,
    #[serde(rename = "completado", alias = "completed")]
    Completed,
}

impl DependencyStatus {
    /// Case-insensitive parse accepting both the legacy Spanish wire values
    /// and their English equivalents. Unknown input yields `None`.
    pub fn parse(s: &str) -> Option<DependencyStatus> {
        match s.trim().to_lowercase().as_str() {
            "pendiente" | "pending" => Some(DependencyStatus::Pending),
            "en proceso" | "in-process" | "in process" => Some(DependencyStatus::InProcess),
            "completado" | "completed" => Some(DependencyStatus::Completed),
            _ => None,
        }
    }
}

/// Display status of a dependency once the clock has been consulted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EffectiveStatus {
    Pending,
    InProcess,
    Completed,
    /// End date has passed and the stored status is not completed.
    Overdue,
}

impl EffectiveStatus {
    pub fn label(self) -> &'static str {
        match self {
            EffectiveStatus::Pending => "Pending",
            EffectiveStatus::InProcess => "In Process",
            EffectiveStatus::Completed => "Completed",
            EffectiveStatus::Overdue => "Overdue",
        }
    }
}

impl From<DependencyStatus> for EffectiveStatus {
    fn from(s: DependencyStatus) -> Self {
        match s {
            DependencyStatus::Pending => EffectiveStatus::Pending,
            DependencyStatus::InProcess => EffectiveStatus::InProcess,
            DependencyStatus::Completed => EffectiveStatus::Completed,
        }
    }
}

/// Derived task state computed from the legacy lifecycle flags.
///
/// Precedence when more than one flag is set: completed > in progress > to-do.
/// `Unset` is the "All" sentinel used when no flag is set, a default rather
/// than an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskState {
    Completed,
    InProgress,
    Pending,
    Unset,
}

impl TaskState {
    /// Whether a user-supplied status label refers to this state.
    /// Accepts English labels and the legacy Spanish ones.
    pub fn matches_label(self, label: &str) -> bool {
        let l = label.trim().to_lowercase();
        match self {
            TaskState::Completed => l == "completed" || l == "completado",
            TaskState::InProgress => l == "in progress" || l == "en progreso",
            TaskState::Pending => l == "pending" || l == "pendiente",
            TaskState::Unset => l == "all" || l == "todos",
        }
    }
}

/// Presentation color token resolved once at the display boundary.
///
/// Hex values match the legacy client palette so exported reports stay
/// consistent with what consultants saw on the mobile screens.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorToken {
    Red,
    Orange,
    Amber,
    Green,
    Gray,
}

impl ColorToken {
    pub fn hex(self) -> &'static str {
        match self {
            ColorToken::Red => "#FF4B4B",
            ColorToken::Orange => "#FF9800",
            ColorToken::Amber => "#FFA726",
            ColorToken::Green => "#4CAF50",
            ColorToken::Gray => "#757575",
        }
    }
}

/// Sort direction for priority ordering.
///
/// Ascending (priority 1 = most critical first) is the canonical order for
/// task list views; descending is kept for the legacy workload view.
#[derive(Debug, Clone, Copy, ValueEnum, PartialEq, Eq)]
pub enum SortDirection {
    Ascending,
    Descending,
}
