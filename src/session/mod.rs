//! Persistence of the signed-in user between runs.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use thiserror::Error;
use tracing::{debug, instrument};

use crate::domain::Session;

#[derive(Debug, Clone, Error, PartialEq)]
pub enum SessionError {
    #[error("Session storage error: {0}")]
    Storage(String),
    #[error("Stored session is corrupt: {0}")]
    Corrupt(String),
}

/// Single-owner storage for the current session with an explicit set/clear lifecycle.
pub trait SessionStore: Send + Sync {
    fn get(&self) -> Result<Option<Session>, SessionError>;
    fn set(&self, session: &Session) -> Result<(), SessionError>;
    fn clear(&self) -> Result<(), SessionError>;
}

impl<S: SessionStore + ?Sized> SessionStore for Arc<S> {
    fn get(&self) -> Result<Option<Session>, SessionError> {
        (**self).get()
    }

    fn set(&self, session: &Session) -> Result<(), SessionError> {
        (**self).set(session)
    }

    fn clear(&self) -> Result<(), SessionError> {
        (**self).clear()
    }
}

#[derive(Debug, Default)]
pub struct MemorySessionStore {
    current: Mutex<Option<Session>>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_session(session: Session) -> Self {
        Self {
            current: Mutex::new(Some(session)),
        }
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, Option<Session>>, SessionError> {
        self.current
            .lock()
            .map_err(|e| SessionError::Storage(e.to_string()))
    }
}

impl SessionStore for MemorySessionStore {
    fn get(&self) -> Result<Option<Session>, SessionError> {
        Ok(self.lock()?.clone())
    }

    fn set(&self, session: &Session) -> Result<(), SessionError> {
        *self.lock()? = Some(session.clone());
        Ok(())
    }

    fn clear(&self) -> Result<(), SessionError> {
        *self.lock()? = None;
        Ok(())
    }
}

/// Keeps the session as a JSON document on disk. A missing file means signed out.
#[derive(Debug, Clone)]
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
}

impl SessionStore for FileSessionStore {
    #[instrument(skip(self), fields(path = %self.path.display()))]
    fn get(&self) -> Result<Option<Session>, SessionError> {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(SessionError::Storage(e.to_string())),
        };
        serde_json::from_str(&raw)
            .map(Some)
            .map_err(|e| SessionError::Corrupt(e.to_string()))
    }

    #[instrument(skip(self, session), fields(path = %self.path.display(), user_id = session.id))]
    fn set(&self, session: &Session) -> Result<(), SessionError> {
        let raw =
            serde_json::to_string(session).map_err(|e| SessionError::Storage(e.to_string()))?;
        fs::write(&self.path, raw).map_err(|e| SessionError::Storage(e.to_string()))?;
        debug!("Session saved");
        Ok(())
    }

    #[instrument(skip(self), fields(path = %self.path.display()))]
    fn clear(&self) -> Result<(), SessionError> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(SessionError::Storage(e.to_string())),
        }
    }
}
