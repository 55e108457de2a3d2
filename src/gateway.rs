//! Remote sync gateway: the contract the core needs from the task API,
//! plus a file-backed reference implementation.
//!
//! The real backend is a REST-ish service; the core only depends on this
//! trait, so commands and tests can run against any implementation. `FileApi`
//! serves a directory containing an `employees.json` export, which is enough
//! to exercise the fetch scoping, patch and cache-fallback flows end to end.

use std::path::{Path, PathBuf};

use log::debug;

use crate::employee::{Employee, User};
use crate::error::Error;
use crate::store::Store;
use crate::task::{Task, TaskPatch};

/// What the core consumes from the remote task/employee API.
pub trait TaskApi {
    fn fetch_all_employees(&self) -> Result<Vec<Employee>, Error>;
    fn fetch_employee(&self, id: &str) -> Result<Employee, Error>;
    /// Server-side partial update; returns the task as stored after the patch.
    fn patch_task(&self, task_id: &str, patch: &TaskPatch) -> Result<Task, Error>;
}

/// Fetch the employee collection scoped to the acting user: admins see all
/// employees, anyone else only the employee linked to their account.
pub fn fetch_employees(api: &dyn TaskApi, user: &User) -> Result<Vec<Employee>, Error> {
    if user.is_admin() {
        debug!("fetching full employee collection for admin {}", user.username);
        return api.fetch_all_employees();
    }
    let linked = user
        .employee
        .as_ref()
        .ok_or_else(|| Error::Validation(format!("user {} has no linked employee", user.username)))?;
    debug!("fetching employee {} for {}", linked.id, user.username);
    Ok(vec![api.fetch_employee(&linked.id)?])
}

/// File-backed gateway over a directory holding `employees.json`.
pub struct FileApi {
    path: PathBuf,
}

impl FileApi {
    pub fn new(dir: &Path) -> Self {
        FileApi { path: dir.join("employees.json") }
    }

    fn read(&self) -> Result<Vec<Employee>, Error> {
        // Same snapshot shape as the local store, so exports interchange.
        let data = std::fs::read_to_string(&self.path)
            .map_err(|e| Error::RemoteFetch(format!("{}: {e}", self.path.display())))?;
        let store: Store = serde_json::from_str(&data)
            .map_err(|e| Error::RemoteFetch(format!("{}: {e}", self.path.display())))?;
        Ok(store.employees)
    }

    fn write(&self, employees: &[Employee]) -> Result<(), Error> {
        let mut store = Store::default();
        store.replace_all(employees.to_vec());
        store.save(&self.path)?;
        Ok(())
    }
}

impl TaskApi for FileApi {
    fn fetch_all_employees(&self) -> Result<Vec<Employee>, Error> {
        self.read()
    }

    fn fetch_employee(&self, id: &str) -> Result<Employee, Error> {
        self.read()?
            .into_iter()
            .find(|e| e.id == id)
            .ok_or_else(|| Error::NotFound(format!("employee {id}")))
    }

    fn patch_task(&self, task_id: &str, patch: &TaskPatch) -> Result<Task, Error> {
        let mut employees = self.read()?;
        let task = employees
            .iter_mut()
            .flat_map(|e| e.tasks.iter_mut())
            .find(|t| t.id == task_id)
            .ok_or_else(|| Error::NotFound(format!("task {task_id}")))?;
        patch.apply_to(task);
        let updated = task.clone();
        self.write(&employees)?;
        debug!("patched task {task_id}");
        Ok(updated)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::employee::Role;
    use tempfile::tempdir;

    fn seed(dir: &Path) {
        let employees = vec![
            Employee {
                id: "e1".into(),
                name: "Ana".into(),
                tasks: vec![Task {
                    id: "t1".into(),
                    title: "ERP rollout".into(),
                    client: "Initech".into(),
                    priority: 1,
                    progress: 20,
                    ..Task::default()
                }],
                is_active: true,
                ..Employee::default()
            },
            Employee { id: "e2".into(), name: "Luis".into(), is_active: true, ..Employee::default() },
        ];
        let mut store = Store::default();
        store.replace_all(employees);
        store.save(&dir.join("employees.json")).unwrap();
    }

    fn user(name: &str, role: &str, employee_id: Option<&str>) -> User {
        User {
            id: "u1".into(),
            username: name.into(),
            is_active: Some(true),
            role: Some(Role { id: "r1".into(), name: role.into() }),
            employee: employee_id.map(|id| Employee {
                id: id.into(),
                name: name.into(),
                ..Employee::default()
            }),
            team: None,
        }
    }

    #[test]
    fn admin_fetch_returns_everyone() {
        let dir = tempdir().unwrap();
        seed(dir.path());
        let api = FileApi::new(dir.path());
        let all = fetch_employees(&api, &user("boss", "admin", None)).unwrap();
        assert_eq!(all.len(), 2);
    }

    #[test]
    fn non_admin_fetch_is_scoped_to_the_linked_employee() {
        let dir = tempdir().unwrap();
        seed(dir.path());
        let api = FileApi::new(dir.path());
        let scoped = fetch_employees(&api, &user("luis", "consultant", Some("e2"))).unwrap();
        assert_eq!(scoped.len(), 1);
        assert_eq!(scoped[0].id, "e2");

        let err = fetch_employees(&api, &user("intern", "consultant", None)).unwrap_err();
        assert!(matches!(err, Error::Validation(_)));
    }

    #[test]
    fn missing_export_is_a_remote_fetch_error() {
        let dir = tempdir().unwrap();
        let api = FileApi::new(dir.path());
        let err = api.fetch_all_employees().unwrap_err();
        assert!(matches!(err, Error::RemoteFetch(_)));
    }

    #[test]
    fn patch_applies_and_persists() {
        let dir = tempdir().unwrap();
        seed(dir.path());
        let api = FileApi::new(dir.path());

        let patch = TaskPatch {
            progress: Some(250), // clamped on apply
            completed: Some(true),
            ..TaskPatch::default()
        };
        let updated = api.patch_task("t1", &patch).unwrap();
        assert_eq!(updated.progress, 100);
        assert_eq!(updated.completed, Some(true));

        // Visible on the next fetch.
        let again = api.fetch_employee("e1").unwrap();
        assert_eq!(again.tasks[0].progress, 100);

        let err = api.patch_task("ghost", &TaskPatch::default()).unwrap_err();
        assert!(matches!(err, Error::NotFound(_)));
    }
}
