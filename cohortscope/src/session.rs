//! Session context.
//!
//! A mock identity collaborator: users and the "current user" marker live in
//! a [`KeyValueStore`] under two keys. The store is injected, so the CLI can
//! persist to a JSON file while tests use memory.
//!
//! Passwords are stored as given. This is a local mock, not authentication.

use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::info;

/// Store key holding the JSON user directory.
pub const USERS_KEY: &str = "cohortscope_users";

/// Store key holding the logged-in email.
pub const CURRENT_USER_KEY: &str = "cohortscope_current_user";

/// Errors from session operations.
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("User already exists")]
    UserExists,

    #[error("Account not found")]
    AccountNotFound,

    #[error("Invalid password")]
    InvalidPassword,

    #[error("Email must not be empty")]
    EmptyEmail,

    #[error("Session store is corrupt: {0}")]
    Corrupt(String),

    #[error("Session store I/O error: {0}")]
    Io(#[from] io::Error),
}

/// String key/value capability backing the session.
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>, SessionError>;

    fn set(&mut self, key: &str, value: &str) -> Result<(), SessionError>;

    fn remove(&mut self, key: &str) -> Result<(), SessionError>;
}

/// In-memory store.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: BTreeMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, SessionError> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), SessionError> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), SessionError> {
        self.entries.remove(key);
        Ok(())
    }
}

/// Store persisted as a flat JSON object in one file.
///
/// The file is created on first write; a missing file reads as empty.
#[derive(Debug, Clone)]
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn load(&self) -> Result<BTreeMap<String, String>, SessionError> {
        match fs::read_to_string(&self.path) {
            Ok(text) if text.trim().is_empty() => Ok(BTreeMap::new()),
            Ok(text) => serde_json::from_str(&text).map_err(|e| {
                SessionError::Corrupt(format!("{}: {}", self.path.display(), e))
            }),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(BTreeMap::new()),
            Err(e) => Err(e.into()),
        }
    }

    fn save(&self, entries: &BTreeMap<String, String>) -> Result<(), SessionError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(entries)
            .map_err(|e| SessionError::Corrupt(e.to_string()))?;
        fs::write(&self.path, json)?;
        Ok(())
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>, SessionError> {
        Ok(self.load()?.remove(key))
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), SessionError> {
        let mut entries = self.load()?;
        entries.insert(key.to_string(), value.to_string());
        self.save(&entries)
    }

    fn remove(&mut self, key: &str) -> Result<(), SessionError> {
        let mut entries = self.load()?;
        if entries.remove(key).is_some() {
            self.save(&entries)?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct UserRecord {
    password: String,
}

/// Registration, login and the current-user marker.
#[derive(Debug)]
pub struct SessionContext<S: KeyValueStore> {
    store: S,
}

impl<S: KeyValueStore> SessionContext<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    fn users(&self) -> Result<BTreeMap<String, UserRecord>, SessionError> {
        match self.store.get(USERS_KEY)? {
            Some(json) => serde_json::from_str(&json)
                .map_err(|e| SessionError::Corrupt(format!("{}: {}", USERS_KEY, e))),
            None => Ok(BTreeMap::new()),
        }
    }

    /// Create an account and log it in.
    pub fn register(&mut self, email: &str, password: &str) -> Result<(), SessionError> {
        if email.is_empty() {
            return Err(SessionError::EmptyEmail);
        }

        let mut users = self.users()?;
        if users.contains_key(email) {
            return Err(SessionError::UserExists);
        }

        users.insert(
            email.to_string(),
            UserRecord {
                password: password.to_string(),
            },
        );
        let json =
            serde_json::to_string(&users).map_err(|e| SessionError::Corrupt(e.to_string()))?;
        self.store.set(USERS_KEY, &json)?;
        self.store.set(CURRENT_USER_KEY, email)?;

        info!(email, "Registered and logged in");
        Ok(())
    }

    pub fn login(&mut self, email: &str, password: &str) -> Result<(), SessionError> {
        let users = self.users()?;
        let user = users.get(email).ok_or(SessionError::AccountNotFound)?;
        if user.password != password {
            return Err(SessionError::InvalidPassword);
        }

        self.store.set(CURRENT_USER_KEY, email)?;
        info!(email, "Logged in");
        Ok(())
    }

    /// Check the account exists. Nothing is actually sent.
    pub fn reset_password(&self, email: &str) -> Result<(), SessionError> {
        if !self.users()?.contains_key(email) {
            return Err(SessionError::AccountNotFound);
        }
        info!(email, "Password reset requested");
        Ok(())
    }

    pub fn logout(&mut self) -> Result<(), SessionError> {
        self.store.remove(CURRENT_USER_KEY)?;
        info!("Logged out");
        Ok(())
    }

    pub fn is_logged_in(&self) -> Result<bool, SessionError> {
        Ok(self.current_user()?.is_some())
    }

    /// The logged-in email, if any.
    pub fn current_user(&self) -> Result<Option<String>, SessionError> {
        Ok(self
            .store
            .get(CURRENT_USER_KEY)?
            .filter(|email| !email.is_empty()))
    }
}
