// src/infrastructure/session_store.rs
//! Session persistence in `session.json` with owner-only permissions.
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::application::SessionStore;
use crate::domain::{DomainError, Session};

pub struct FileSessionStore {
    path: PathBuf,
}

impl FileSessionStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn write(&self, contents: &str) -> std::io::Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }

        #[cfg(unix)]
        {
            use std::os::unix::fs::OpenOptionsExt;
            let mut file = OpenOptions::new()
                .write(true)
                .create(true)
                .truncate(true)
                .mode(0o600)
                .open(&self.path)?;
            file.write_all(contents.as_bytes())
        }

        #[cfg(not(unix))]
        {
            fs::write(&self.path, contents)
        }
    }
}

fn store_error(action: &str, path: &Path, e: impl std::fmt::Display) -> DomainError {
    DomainError::SessionError(format!("Failed to {action} {}: {e}", path.display()))
}

impl SessionStore for FileSessionStore {
    fn load(&self) -> Result<Option<Session>, DomainError> {
        if !self.path.exists() {
            return Ok(None);
        }
        let contents =
            fs::read_to_string(&self.path).map_err(|e| store_error("read", &self.path, e))?;
        let session =
            serde_json::from_str(&contents).map_err(|e| store_error("parse", &self.path, e))?;
        Ok(Some(session))
    }

    fn save(&self, session: &Session) -> Result<(), DomainError> {
        let contents = serde_json::to_string_pretty(session)
            .map_err(|e| store_error("serialize session for", &self.path, e))?;
        self.write(&contents)
            .map_err(|e| store_error("write", &self.path, e))?;
        debug!(path = ?self.path, "Saved session");
        Ok(())
    }

    fn clear(&self) -> Result<(), DomainError> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(store_error("remove", &self.path, e)),
        }
    }
}
