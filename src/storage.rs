//! Persisted session storage.
//!
//! The credential and profile stub outlive a single [`ReqRes`](crate::ReqRes)
//! instance. Everything that needs them (bearer injection, session restore,
//! logout) goes through the single [`SessionStorage`] capability handed to
//! the client at construction time; nothing else in the crate touches
//! persisted data directly.

use std::collections::HashMap;
use std::sync::Mutex;

/// Storage key holding the opaque bearer credential.
pub const AUTH_TOKEN_KEY: &str = "authToken";

/// Storage key holding the JSON-serialized profile stub.
pub const PROFILE_KEY: &str = "userData";

/// A flat string-keyed store for session data.
///
/// Implementations are expected to be cheap to read; both keys are read on
/// every session restore and the credential on every outgoing request.
/// Writes happen only on login, logout and credential expiry.
pub trait SessionStorage: Send + Sync {
    /// Returns the value stored under `key`, if any.
    fn get(&self, key: &str) -> Option<String>;
    /// Stores `value` under `key`, replacing any previous value.
    fn set(&self, key: &str, value: &str);
    /// Removes the value stored under `key`, if any.
    fn remove(&self, key: &str);
}

/// An in-memory [`SessionStorage`].
///
/// The default storage backend. Suitable for tests and for processes that
/// do not need the session to survive a restart; longer-lived applications
/// provide their own implementation over whatever key-value store the
/// platform offers.
///
/// # Example
/// ```rust,ignore
/// use std::sync::Arc;
///
/// use reqres_rs::{MemoryStorage, ReqRes};
///
/// let storage = Arc::new(MemoryStorage::default());
/// let client = ReqRes::with_storage("https://reqres.in/api", storage);
/// ```
#[derive(Debug, Default)]
pub struct MemoryStorage {
    entries: Mutex<HashMap<String, String>>,
}

impl SessionStorage for MemoryStorage {
    fn get(&self, key: &str) -> Option<String> {
        self.entries
            .lock()
            .expect("session storage mutex poisoned")
            .get(key)
            .cloned()
    }

    fn set(&self, key: &str, value: &str) {
        self.entries
            .lock()
            .expect("session storage mutex poisoned")
            .insert(key.to_owned(), value.to_owned());
    }

    fn remove(&self, key: &str) {
        self.entries
            .lock()
            .expect("session storage mutex poisoned")
            .remove(key);
    }
}
