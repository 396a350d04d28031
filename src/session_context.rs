//! Operator identity for the admin CLI.
//!
//! `admin session login` stores the logged-in user and a session token so
//! later commands can call the API without asking for credentials again.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::domain::entities::{Role, User};

#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("Session file error: {0}")]
    Io(#[from] io::Error),
    #[error("Session file is corrupt: {0}")]
    Corrupt(#[from] serde_json::Error),
    #[error("Cannot locate a home directory; set TRAVELGO_SESSION_FILE")]
    NoHome,
}

/// What is remembered about the operator between CLI runs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredSession {
    pub user_id: i64,
    pub username: String,
    pub email: String,
    pub role: Role,
    pub token: String,
    pub saved_at: DateTime<Utc>,
}

/// Persistence for [`StoredSession`].
pub trait SessionStore {
    fn read(&self) -> Result<Option<StoredSession>, SessionError>;
    fn write(&self, session: &StoredSession) -> Result<(), SessionError>;
    fn remove(&self) -> Result<(), SessionError>;
}

/// Keeps the session as a JSON file.
pub struct FileSessionStore {
    path: PathBuf,
}

impl FileSessionStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Uses `TRAVELGO_SESSION_FILE`, or `~/.travelgo/session.json`.
    pub fn from_env() -> Result<Self, SessionError> {
        if let Ok(path) = std::env::var("TRAVELGO_SESSION_FILE") {
            return Ok(Self::new(path));
        }

        let home = std::env::var_os("HOME")
            .or_else(|| std::env::var_os("USERPROFILE"))
            .ok_or(SessionError::NoHome)?;

        Ok(Self::new(
            Path::new(&home).join(".travelgo").join("session.json"),
        ))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl SessionStore for FileSessionStore {
    fn read(&self) -> Result<Option<StoredSession>, SessionError> {
        match fs::read_to_string(&self.path) {
            Ok(raw) => Ok(Some(serde_json::from_str(&raw)?)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn write(&self, session: &StoredSession) -> Result<(), SessionError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&self.path, serde_json::to_string_pretty(session)?)?;
        Ok(())
    }

    fn remove(&self) -> Result<(), SessionError> {
        match fs::remove_file(&self.path) {
            Err(e) if e.kind() != io::ErrorKind::NotFound => Err(e.into()),
            _ => Ok(()),
        }
    }
}

/// The operator's current session, loaded once and passed explicitly.
pub struct SessionContext<S: SessionStore> {
    store: S,
    current: Option<StoredSession>,
}

impl<S: SessionStore> SessionContext<S> {
    pub fn load(store: S) -> Result<Self, SessionError> {
        let current = store.read()?;
        Ok(Self { store, current })
    }

    pub fn current(&self) -> Option<&StoredSession> {
        self.current.as_ref()
    }

    pub fn is_logged_in(&self) -> bool {
        self.current.is_some()
    }

    /// Replaces the stored session with one for `user`.
    pub fn save(&mut self, user: &User, token: String) -> Result<&StoredSession, SessionError> {
        let session = StoredSession {
            user_id: user.id,
            username: user.username.clone(),
            email: user.email.clone(),
            role: user.role,
            token,
            saved_at: Utc::now(),
        };
        self.store.write(&session)?;
        Ok(self.current.insert(session))
    }

    pub fn clear(&mut self) -> Result<(), SessionError> {
        self.store.remove()?;
        self.current = None;
        Ok(())
    }
}
