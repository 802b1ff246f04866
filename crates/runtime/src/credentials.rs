//! Storage for the last successful login credentials.

use demolink_protocol::Credentials;
use parking_lot::Mutex;

/// Holds the credentials from the most recent successful login so the
/// watchdog can re-authenticate after a reconnect.
///
/// Stored only after success, overwritten by the next success, cleared on
/// logout. Never persisted.
#[derive(Debug, Default)]
pub struct CredentialStore {
    inner: Mutex<Option<Credentials>>,
}

impl CredentialStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records credentials after a successful login.
    pub fn store(&self, credentials: Credentials) {
        *self.inner.lock() = Some(credentials);
    }

    /// Returns a copy of the stored credentials, if any.
    pub fn get(&self) -> Option<Credentials> {
        self.inner.lock().clone()
    }

    /// Clears the stored credentials (logout).
    pub fn clear(&self) {
        *self.inner.lock() = None;
    }
}
