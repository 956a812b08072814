//! Session data and the shared session handle.
//!
//! ## Flash values
//!
//! A value stored with [`SessionData::flash`] is readable for the rest of the
//! current request and for the whole of the next one. Each request boundary
//! calls [`SessionData::age_flash`]: values flashed during the request that
//! just ended become "old", and the previous old values are dropped.

use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use chrono::{DateTime, Duration, Utc};

use crate::cookie::SessionCookie;

/// Data associated with a user session.
#[derive(Debug, Clone)]
pub struct SessionData {
    /// The unique session key identifying this session.
    pub session_key: String,
    /// Regular session values.
    pub data: HashMap<String, serde_json::Value>,
    /// Values flashed during the current request.
    flash_new: HashMap<String, serde_json::Value>,
    /// Values flashed during the previous request.
    flash_old: HashMap<String, serde_json::Value>,
    /// The timestamp when this session expires.
    pub expire_date: DateTime<Utc>,
    /// Whether the session has been modified since it was loaded.
    pub modified: bool,
}

impl SessionData {
    /// Creates a new empty session with the given key and the default
    /// `session_cookie_age` lifetime.
    pub fn new(session_key: String) -> Self {
        let lifetime = SessionCookie::default().lifetime_seconds();
        Self::with_lifetime(session_key, lifetime)
    }

    /// Creates a new empty session with a specified lifetime. Lifetimes too
    /// large to represent never expire.
    pub fn with_lifetime(session_key: String, lifetime_seconds: i64) -> Self {
        Self {
            session_key,
            data: HashMap::new(),
            flash_new: HashMap::new(),
            flash_old: HashMap::new(),
            expire_date: Duration::try_seconds(lifetime_seconds)
                .and_then(|lifetime| Utc::now().checked_add_signed(lifetime))
                .unwrap_or(DateTime::<Utc>::MAX_UTC),
            modified: false,
        }
    }

    /// Gets a value by key. Flash values shadow regular ones, newest first.
    pub fn get(&self, key: &str) -> Option<&serde_json::Value> {
        self.flash_new
            .get(key)
            .or_else(|| self.flash_old.get(key))
            .or_else(|| self.data.get(key))
    }

    /// Gets a flash value only, ignoring regular values.
    pub fn get_flash(&self, key: &str) -> Option<&serde_json::Value> {
        self.flash_new.get(key).or_else(|| self.flash_old.get(key))
    }

    /// Returns `true` if `key` is set, either as a regular or a flash value.
    pub fn has(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    /// Sets a regular value.
    pub fn set(&mut self, key: &str, value: serde_json::Value) {
        self.data.insert(key.to_string(), value);
        self.modified = true;
    }

    /// Flashes a value, readable until the end of the next request.
    pub fn flash(&mut self, key: &str, value: serde_json::Value) {
        self.flash_new.insert(key.to_string(), value);
        self.modified = true;
    }

    /// Removes a value, regular or flashed.
    pub fn remove(&mut self, key: &str) -> Option<serde_json::Value> {
        let flashed_new = self.flash_new.remove(key);
        let flashed_old = self.flash_old.remove(key);
        let result = flashed_new.or(flashed_old).or_else(|| self.data.remove(key));
        if result.is_some() {
            self.modified = true;
        }
        result
    }

    /// Moves to the next request: current flash values become old ones and
    /// the previous old ones are discarded.
    pub fn age_flash(&mut self) {
        if self.flash_new.is_empty() && self.flash_old.is_empty() {
            return;
        }
        self.flash_old = std::mem::take(&mut self.flash_new);
        self.modified = true;
    }

    /// Returns the keys of all live flash values.
    pub fn flash_keys(&self) -> impl Iterator<Item = &String> {
        self.flash_new
            .keys()
            .chain(self.flash_old.keys().filter(|k| !self.flash_new.contains_key(*k)))
    }

    /// Returns `true` if the session has expired.
    pub fn is_expired(&self) -> bool {
        Utc::now() > self.expire_date
    }

    /// Clears all data from the session, flash values included.
    pub fn clear(&mut self) {
        self.data.clear();
        self.flash_new.clear();
        self.flash_old.clear();
        self.modified = true;
    }

    /// Returns the number of regular entries.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Returns `true` if there are no regular entries and no flash values.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty() && self.flash_new.is_empty() && self.flash_old.is_empty()
    }
}

/// A shared, thread-safe handle to one request's [`SessionData`].
///
/// Cloning the handle is cheap; every clone sees the same data. Reads of
/// string values go through [`Session::get_string`], which renders
/// non-string JSON values in their JSON form.
#[derive(Debug, Clone)]
pub struct Session {
    inner: Arc<RwLock<SessionData>>,
}

impl Session {
    /// Wraps loaded session data in a shared handle.
    pub fn new(data: SessionData) -> Self {
        Self {
            inner: Arc::new(RwLock::new(data)),
        }
    }

    /// Returns the session key.
    pub fn key(&self) -> String {
        self.read().session_key.clone()
    }

    /// Returns `true` if `key` is set.
    pub fn has(&self, key: &str) -> bool {
        self.read().has(key)
    }

    /// Returns the value for `key` as a string.
    pub fn get_string(&self, key: &str) -> Option<String> {
        self.read().get(key).map(value_to_string)
    }

    /// Returns the flash value for `key` as a string. Regular values are
    /// never returned.
    pub fn get_flash_string(&self, key: &str) -> Option<String> {
        self.read().get_flash(key).map(value_to_string)
    }

    /// Sets a regular value.
    pub fn set(&self, key: &str, value: serde_json::Value) {
        self.write().set(key, value);
    }

    /// Flashes a value.
    pub fn flash(&self, key: &str, value: serde_json::Value) {
        self.write().flash(key, value);
    }

    /// Returns a copy of the current data, e.g. for saving to a backend.
    pub fn snapshot(&self) -> SessionData {
        self.read().clone()
    }

    fn read(&self) -> RwLockReadGuard<'_, SessionData> {
        self.inner.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, SessionData> {
        self.inner.write().unwrap_or_else(PoisonError::into_inner)
    }
}

fn value_to_string(value: &serde_json::Value) -> String {
    match value {
        serde_json::Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

impl From<SessionData> for Session {
    fn from(data: SessionData) -> Self {
        Self::new(data)
    }
}
