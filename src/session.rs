//! Persisted login session.
//!
//! The current user lives in a small JSON file next to the store snapshot,
//! standing in for the mobile client's key-value auth storage. An absent or
//! unreadable session simply reads as unauthenticated.

use std::fs::{self, File};
use std::io::Write;
use std::path::Path;

use log::warn;

use crate::employee::User;
use crate::error::Error;

/// Read the persisted session. `None` signals "unauthenticated"; a corrupt
/// file is logged and treated the same way.
pub fn current_user(path: &Path) -> Option<User> {
    if !path.exists() {
        return None;
    }
    match fs::read_to_string(path) {
        Ok(data) => match serde_json::from_str(&data) {
            Ok(user) => Some(user),
            Err(e) => {
                warn!("session file unreadable, treating as logged out: {e}");
                None
            }
        },
        Err(e) => {
            warn!("could not read session file: {e}");
            None
        }
    }
}

/// Persist the session user.
pub fn save_user(path: &Path, user: &User) -> Result<(), Error> {
    let data = serde_json::to_string_pretty(user)?;
    let mut f = File::create(path)?;
    f.write_all(data.as_bytes())?;
    Ok(())
}

/// Drop the session. Removing an already-absent file is fine.
pub fn clear(path: &Path) -> Result<(), Error> {
    if path.exists() {
        fs::remove_file(path)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::employee::Role;
    use tempfile::tempdir;

    #[test]
    fn session_round_trip_and_clear() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("session.json");
        assert!(current_user(&path).is_none());

        let user = User {
            id: "u1".into(),
            username: "elizabeth".into(),
            is_active: Some(true),
            role: Some(Role { id: "r1".into(), name: "admin".into() }),
            employee: None,
            team: None,
        };
        save_user(&path, &user).unwrap();
        let back = current_user(&path).unwrap();
        assert_eq!(back, user);
        assert!(back.is_admin());

        clear(&path).unwrap();
        assert!(current_user(&path).is_none());
        // Clearing twice is harmless.
        clear(&path).unwrap();
    }

    #[test]
    fn corrupt_session_reads_as_logged_out() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("session.json");
        fs::write(&path, "][").unwrap();
        assert!(current_user(&path).is_none());
    }
}
