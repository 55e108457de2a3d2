//! Dependency evaluator: overdue derivation, unblock checks and the
//! collection-wide dependency update.
//!
//! Comparisons are instant-based against a caller-supplied `now` so every
//! function stays deterministic under test. A dependency with an absent or
//! unparseable end date is never considered overdue.

use chrono::{DateTime, Utc};
use log::warn;

use crate::dates::parse_when;
use crate::employee::Employee;
use crate::error::Error;
use crate::fields::{DependencyStatus, EffectiveStatus};
use crate::task::{ExternalDependency, Task, TaskPatch};

/// Whether the dependency's end date has passed.
pub fn is_overdue(dep: &ExternalDependency, now: DateTime<Utc>) -> bool {
    match parse_when(&dep.end_date) {
        Some(end) => now > end,
        None => false,
    }
}

/// Display status once the clock is consulted: `Overdue` when the end date
/// has passed and the stored status is not completed, otherwise the stored
/// status unchanged. Never persisted.
pub fn effective_status(dep: &ExternalDependency, now: DateTime<Utc>) -> EffectiveStatus {
    if is_overdue(dep, now) && dep.status != DependencyStatus::Completed {
        EffectiveStatus::Overdue
    } else {
        dep.status.into()
    }
}

/// Whether a task's dependencies allow it to be completed.
///
/// A task with no dependencies is unblocked. Otherwise every dependency must
/// be completed or not yet due. Deliberately permissive: a pending dependency
/// whose end date has not arrived does NOT block, only a dependency that is
/// both past due and not completed does. Callers relying on this to gate
/// completion should know a pending-but-not-yet-due dependency passes.
pub fn task_is_unblocked(task: &Task, now: DateTime<Utc>) -> bool {
    task.dependencies()
        .iter()
        .all(|dep| dep.status == DependencyStatus::Completed || !is_overdue(dep, now))
}

/// Flatten every dependency across the employee collection, in owner order.
pub fn collect_dependencies(employees: &[Employee]) -> Vec<&ExternalDependency> {
    employees
        .iter()
        .flat_map(|e| e.tasks.iter())
        .flat_map(|t| t.dependencies().iter())
        .collect()
}

/// Update the status and comment of the single dependency with `dep_id`,
/// wherever it lives in the employee collection.
///
/// This is a linear scan over all employees, tasks and dependencies, which
/// is fine at the expected scale of tens to low hundreds of tasks. The match
/// is mutated in place (stamping `updated_at`) and the owning task is
/// returned together with the patch payload to push upstream.
pub fn update_dependency(
    employees: &mut [Employee],
    dep_id: &str,
    status: DependencyStatus,
    comment: Option<String>,
    now: DateTime<Utc>,
) -> Result<(Task, TaskPatch), Error> {
    for employee in employees.iter_mut() {
        for task in employee.tasks.iter_mut() {
            let deps = match task.dependencies.as_mut() {
                Some(deps) => deps,
                None => continue,
            };
            if let Some(dep) = deps.iter_mut().find(|d| d.id == dep_id) {
                if let (Some(start), Some(end)) = (parse_when(&dep.start_date), parse_when(&dep.end_date)) {
                    if end < start {
                        // Legacy records carry inverted windows; keep them but flag it.
                        warn!(
                            "dependency {} has end date {} before start date {}",
                            dep.id, dep.end_date, dep.start_date
                        );
                    }
                }
                dep.status = status;
                dep.comment = comment;
                dep.updated_at = Some(now.to_rfc3339());
                let updated = task.clone();
                let patch = updated.to_patch();
                return Ok((updated, patch));
            }
        }
    }
    Err(Error::NotFound(format!("dependency {dep_id}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fields::DependencyKind;
    use chrono::TimeZone;

    fn dep(id: &str, status: DependencyStatus, end_date: &str) -> ExternalDependency {
        ExternalDependency {
            id: id.into(),
            kind: DependencyKind::Quality,
            status,
            comment: None,
            start_date: "2024-01-01".into(),
            end_date: end_date.into(),
            created_at: "2024-01-01T08:00:00Z".into(),
            updated_at: None,
        }
    }

    fn task_with_deps(id: &str, deps: Vec<ExternalDependency>) -> Task {
        Task {
            id: id.into(),
            title: format!("Task {id}"),
            client: "Acme".into(),
            priority: 2,
            dependencies: Some(deps),
            ..Task::default()
        }
    }

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 15, 12, 0, 0).unwrap()
    }

    #[test]
    fn overdue_requires_a_parseable_past_end_date() {
        assert!(is_overdue(&dep("d1", DependencyStatus::Pending, "2024-03-14"), now()));
        assert!(!is_overdue(&dep("d1", DependencyStatus::Pending, "2024-03-16"), now()));
        assert!(!is_overdue(&dep("d1", DependencyStatus::Pending, "not a date"), now()));
        assert!(!is_overdue(&dep("d1", DependencyStatus::Pending, ""), now()));
    }

    #[test]
    fn effective_status_only_overrides_incomplete_overdue() {
        let past = "2024-03-01";
        let future = "2024-04-01";
        assert_eq!(
            effective_status(&dep("d", DependencyStatus::Pending, past), now()),
            EffectiveStatus::Overdue
        );
        assert_eq!(
            effective_status(&dep("d", DependencyStatus::InProcess, past), now()),
            EffectiveStatus::Overdue
        );
        // Completed never shows overdue, however late.
        assert_eq!(
            effective_status(&dep("d", DependencyStatus::Completed, past), now()),
            EffectiveStatus::Completed
        );
        assert_eq!(
            effective_status(&dep("d", DependencyStatus::Pending, future), now()),
            EffectiveStatus::Pending
        );
    }

    #[test]
    fn no_dependencies_means_unblocked() {
        let mut t = task_with_deps("t1", vec![]);
        assert!(task_is_unblocked(&t, now()));
        t.dependencies = None;
        assert!(task_is_unblocked(&t, now()));
    }

    #[test]
    fn overdue_pending_dependency_blocks_until_completed() {
        let yesterday = "2024-03-14";
        let t = task_with_deps("t1", vec![dep("d1", DependencyStatus::Pending, yesterday)]);
        assert!(!task_is_unblocked(&t, now()));

        let t = task_with_deps("t1", vec![dep("d1", DependencyStatus::Completed, yesterday)]);
        assert!(task_is_unblocked(&t, now()));
    }

    #[test]
    fn pending_but_not_yet_due_does_not_block() {
        // The permissive asymmetry: a pending dependency with a future end
        // date is treated as non-blocking.
        let t = task_with_deps("t1", vec![dep("d1", DependencyStatus::Pending, "2024-04-01")]);
        assert!(task_is_unblocked(&t, now()));
    }

    #[test]
    fn collect_walks_all_employees_in_order() {
        let employees = vec![
            Employee {
                id: "e1".into(),
                name: "Ana".into(),
                tasks: vec![task_with_deps("t1", vec![dep("d1", DependencyStatus::Pending, "2024-04-01")])],
                ..Employee::default()
            },
            Employee {
                id: "e2".into(),
                name: "Luis".into(),
                tasks: vec![
                    task_with_deps("t2", vec![]),
                    task_with_deps(
                        "t3",
                        vec![
                            dep("d2", DependencyStatus::InProcess, "2024-04-01"),
                            dep("d3", DependencyStatus::Completed, "2024-02-01"),
                        ],
                    ),
                ],
                ..Employee::default()
            },
        ];
        let ids: Vec<&str> = collect_dependencies(&employees).iter().map(|d| d.id.as_str()).collect();
        assert_eq!(ids, vec!["d1", "d2", "d3"]);
    }

    #[test]
    fn update_mutates_only_the_matching_dependency() {
        let mut employees = vec![
            Employee {
                id: "e1".into(),
                name: "Ana".into(),
                tasks: vec![
                    task_with_deps("t1", vec![dep("d1", DependencyStatus::Pending, "2024-04-01")]),
                    task_with_deps("t2", vec![dep("d2", DependencyStatus::Pending, "2024-04-01")]),
                ],
                ..Employee::default()
            },
            Employee {
                id: "e2".into(),
                name: "Luis".into(),
                tasks: vec![
                    task_with_deps("t3", vec![dep("d3", DependencyStatus::Pending, "2024-04-01")]),
                    task_with_deps("t4", vec![]),
                ],
                ..Employee::default()
            },
            Employee {
                id: "e3".into(),
                name: "Mar".into(),
                tasks: vec![task_with_deps("t5", vec![]), task_with_deps("t6", vec![])],
                ..Employee::default()
            },
        ];
        let before = employees.clone();

        let (updated, patch) = update_dependency(
            &mut employees,
            "d3",
            DependencyStatus::Completed,
            Some("signed off".into()),
            now(),
        )
        .unwrap();

        assert_eq!(updated.id, "t3");
        let d3 = &updated.dependencies()[0];
        assert_eq!(d3.status, DependencyStatus::Completed);
        assert_eq!(d3.comment.as_deref(), Some("signed off"));
        assert!(d3.updated_at.is_some());
        assert_eq!(patch.dependencies.as_ref().unwrap()[0].status, DependencyStatus::Completed);

        // Everything outside the touched dependency is untouched.
        assert_eq!(employees[0], before[0]);
        assert_eq!(employees[2], before[2]);
        assert_eq!(employees[1].tasks[1], before[1].tasks[1]);
        assert_eq!(employees[1].tasks[0].title, before[1].tasks[0].title);
    }

    #[test]
    fn unknown_dependency_id_is_not_found() {
        let mut employees = vec![Employee {
            id: "e1".into(),
            name: "Ana".into(),
            tasks: vec![task_with_deps("t1", vec![dep("d1", DependencyStatus::Pending, "2024-04-01")])],
            ..Employee::default()
        }];
        let err = update_dependency(&mut employees, "ghost", DependencyStatus::Completed, None, now())
            .unwrap_err();
        assert!(matches!(err, Error::NotFound(_)));
    }
}
