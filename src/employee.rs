//! Employee, team and user entities.
//!
//! An employee is the aggregation root for its tasks: tasks have no
//! independent existence outside an employee's owned collection, and the
//! only traversal path to a task is through its employee.

use serde::{Deserialize, Serialize};

use crate::task::Task;

/// A consultant with an owned collection of assigned tasks.
///
/// `efficiency`, `score` and `ley_pareto` are performance figures computed
/// server-side; the core carries them opaquely for display.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Employee {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub tasks: Vec<Task>,
    pub ley_pareto: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub score: Option<f64>,
    pub efficiency: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub team: Option<Team>,
    pub is_active: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Team {
    pub id: String,
    pub name: String,
    pub description: String,
    pub manager_id: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Role {
    pub id: String,
    pub name: String,
}

/// An authenticated session user. The role name decides whether sync is
/// scoped to the whole collection or a single linked employee.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    pub username: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<Role>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub employee: Option<Employee>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub team: Option<Team>,
}

impl User {
    pub fn is_admin(&self) -> bool {
        self.role.as_ref().map(|r| r.name == "admin").unwrap_or(false)
    }
}
