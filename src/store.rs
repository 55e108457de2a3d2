//! Client-side store: the persisted snapshot of the employee collection.
//!
//! A single JSON file holds every employee with their owned tasks. The only
//! mutation contracts are "replace the whole collection" (a refresh) and
//! "patch one task by id"; both are applied to the in-memory value and then
//! written out atomically (temp file + rename), so readers never observe a
//! partial update.

use std::fs::{self, File};
use std::io::{Read, Write};
use std::path::Path;

use log::warn;
use serde::{Deserialize, Serialize};

use crate::employee::Employee;
use crate::error::Error;
use crate::task::Task;

/// In-memory snapshot of the employee collection, backed by one JSON file.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct Store {
    #[serde(default)]
    pub employees: Vec<Employee>,
}

impl Store {
    /// Load the snapshot, degrading to an empty collection when the file is
    /// missing or unreadable. A corrupt snapshot is logged and discarded
    /// rather than aborting; persistence failures are never fatal.
    pub fn load(path: &Path) -> Self {
        if !path.exists() {
            return Store::default();
        }
        let mut buf = String::new();
        match File::open(path).and_then(|mut f| f.read_to_string(&mut buf)) {
            Ok(_) => match serde_json::from_str(&buf) {
                Ok(store) => store,
                Err(e) => {
                    warn!("store snapshot unreadable, starting empty: {e}");
                    Store::default()
                }
            },
            Err(e) => {
                warn!("could not read store snapshot, starting empty: {e}");
                Store::default()
            }
        }
    }

    /// Persist the snapshot atomically via temp file + rename.
    pub fn save(&self, path: &Path) -> Result<(), Error> {
        let tmp = path.with_extension("json.tmp");
        let data = serde_json::to_string_pretty(self)?;
        let mut f = File::create(&tmp)?;
        f.write_all(data.as_bytes())?;
        f.flush()?;
        fs::rename(tmp, path)?;
        Ok(())
    }

    /// Refresh semantics: drop the whole collection and take the fetched one.
    pub fn replace_all(&mut self, employees: Vec<Employee>) {
        self.employees = employees;
    }

    /// Insert an employee, or overwrite the one with the same id.
    pub fn upsert_employee(&mut self, employee: Employee) {
        match self.employees.iter_mut().find(|e| e.id == employee.id) {
            Some(slot) => *slot = employee,
            None => self.employees.push(employee),
        }
    }

    pub fn remove_employee(&mut self, id: &str) {
        self.employees.retain(|e| e.id != id);
    }

    pub fn employee(&self, id: &str) -> Option<&Employee> {
        self.employees.iter().find(|e| e.id == id)
    }

    /// Locate a task anywhere in the collection, with its owner.
    pub fn find_task(&self, task_id: &str) -> Option<(&Employee, &Task)> {
        self.employees
            .iter()
            .find_map(|e| e.tasks.iter().find(|t| t.id == task_id).map(|t| (e, t)))
    }

    pub fn find_task_mut(&mut self, task_id: &str) -> Option<&mut Task> {
        self.employees
            .iter_mut()
            .find_map(|e| e.tasks.iter_mut().find(|t| t.id == task_id))
    }

    /// Patch-one-task contract: replace the stored task that matches
    /// `updated.id`, wherever it lives. Returns false when no task matched.
    pub fn update_task(&mut self, updated: &Task) -> bool {
        match self.find_task_mut(&updated.id) {
            Some(slot) => {
                *slot = updated.clone();
                true
            }
            None => false,
        }
    }

    /// Every task in the collection, cloned in owner order.
    pub fn all_tasks(&self) -> Vec<Task> {
        self.employees.iter().flat_map(|e| e.tasks.clone()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn employee(id: &str, name: &str, task_ids: &[&str]) -> Employee {
        Employee {
            id: id.into(),
            name: name.into(),
            tasks: task_ids
                .iter()
                .map(|tid| Task {
                    id: (*tid).into(),
                    title: format!("Task {tid}"),
                    client: "Acme".into(),
                    priority: 3,
                    ..Task::default()
                })
                .collect(),
            is_active: true,
            ..Employee::default()
        }
    }

    #[test]
    fn missing_file_loads_empty() {
        let dir = tempdir().unwrap();
        let store = Store::load(&dir.path().join("none.json"));
        assert!(store.employees.is_empty());
    }

    #[test]
    fn corrupt_file_degrades_to_empty() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("employees.json");
        fs::write(&path, "{not json").unwrap();
        let store = Store::load(&path);
        assert!(store.employees.is_empty());
    }

    #[test]
    fn save_and_reload_round_trips() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("employees.json");
        let mut store = Store::default();
        store.replace_all(vec![employee("e1", "Ana", &["t1", "t2"]), employee("e2", "Luis", &["t3"])]);
        store.save(&path).unwrap();

        let reloaded = Store::load(&path);
        assert_eq!(reloaded.employees, store.employees);
        assert_eq!(reloaded.all_tasks().len(), 3);
    }

    #[test]
    fn update_task_patches_in_place() {
        let mut store = Store::default();
        store.replace_all(vec![employee("e1", "Ana", &["t1"]), employee("e2", "Luis", &["t2"])]);

        let mut patched = store.find_task("t2").unwrap().1.clone();
        patched.progress = 60;
        assert!(store.update_task(&patched));
        assert_eq!(store.find_task("t2").unwrap().1.progress, 60);
        // Owner assignment is untouched.
        assert_eq!(store.find_task("t2").unwrap().0.id, "e2");

        let ghost = Task { id: "nope".into(), ..Task::default() };
        assert!(!store.update_task(&ghost));
    }

    #[test]
    fn upsert_overwrites_same_id() {
        let mut store = Store::default();
        store.upsert_employee(employee("e1", "Ana", &["t1"]));
        store.upsert_employee(employee("e1", "Ana María", &["t1", "t9"]));
        assert_eq!(store.employees.len(), 1);
        assert_eq!(store.employees[0].name, "Ana María");
        store.remove_employee("e1");
        assert!(store.employees.is_empty());
    }
}
