use std::sync::{Arc, PoisonError, RwLock};

use tracing::{debug, info, warn};

use crate::storage::KeyValueStore;

/// Storage key holding the bearer token
pub const TOKEN_KEY: &str = "token";

/// Storage key holding the username
pub const USERNAME_KEY: &str = "username";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionData {
    pub token: String,
    pub username: String,
}

struct Inner {
    storage: Arc<dyn KeyValueStore>,
    data: RwLock<Option<SessionData>>,
}

/// Holder of the current session.
/// Clone is cheap - clones share the same session and storage.
#[derive(Clone)]
pub struct AuthStore {
    inner: Arc<Inner>,
}

impl AuthStore {
    /// Create a store hydrated from durable storage.
    ///
    /// A stored pair is only accepted when both keys are present and the
    /// token is non-empty; anything else starts logged out. Hydration never
    /// writes to storage.
    pub fn new(storage: Arc<dyn KeyValueStore>) -> Self {
        let data = Self::hydrate(storage.as_ref());
        debug!(authenticated = data.is_some(), "Session hydrated from storage");
        Self {
            inner: Arc::new(Inner {
                storage,
                data: RwLock::new(data),
            }),
        }
    }

    fn hydrate(storage: &dyn KeyValueStore) -> Option<SessionData> {
        let read = |key: &str| match storage.get(key) {
            Ok(value) => value,
            Err(e) => {
                warn!(key, error = %e, "Failed to read session from storage");
                None
            }
        };

        let token = read(TOKEN_KEY).filter(|t| !t.is_empty());
        let username = read(USERNAME_KEY);
        match (token, username) {
            (Some(token), Some(username)) => Some(SessionData { token, username }),
            (None, None) => None,
            _ => {
                warn!("Ignoring half-written session in storage");
                None
            }
        }
    }

    /// Check if a non-empty token is held
    pub fn is_authenticated(&self) -> bool {
        self.read(|data| data.is_some_and(|d| !d.token.is_empty()))
    }

    /// Get the bearer token, if logged in
    pub fn token(&self) -> Option<String> {
        self.read(|data| data.map(|d| d.token.clone()))
    }

    /// Get the username, if logged in
    pub fn username(&self) -> Option<String> {
        self.read(|data| data.map(|d| d.username.clone()))
    }

    /// Snapshot of the current session
    pub fn session(&self) -> Option<SessionData> {
        self.read(|data| data.cloned())
    }

    /// Replace the session and write both keys through to storage.
    ///
    /// The token is not validated here; the server decides whether it is good.
    pub fn login(&self, token: &str, username: &str) {
        {
            let mut data = self.inner.data.write().unwrap_or_else(PoisonError::into_inner);
            *data = Some(SessionData {
                token: token.to_string(),
                username: username.to_string(),
            });
        }

        let storage = self.inner.storage.as_ref();
        let token_written = Self::write(storage, TOKEN_KEY, Some(token));
        let username_written = Self::write(storage, USERNAME_KEY, Some(username));
        if !(token_written && username_written) {
            // Never leave a new username paired with a stale token (or the
            // reverse); a cleared pair hydrates as logged out.
            Self::write(storage, TOKEN_KEY, None);
            Self::write(storage, USERNAME_KEY, None);
        }
        info!(username, "Logged in");
    }

    /// Clear the session and remove both keys from storage. Idempotent.
    pub fn logout(&self) {
        let previous = {
            let mut data = self.inner.data.write().unwrap_or_else(PoisonError::into_inner);
            data.take()
        };

        // Each key is removed on its own; one surviving key is a half-written
        // pair and hydrates as logged out.
        let storage = self.inner.storage.as_ref();
        Self::write(storage, TOKEN_KEY, None);
        Self::write(storage, USERNAME_KEY, None);
        if let Some(previous) = previous {
            info!(username = %previous.username, "Logged out");
        }
    }

    /// Set (`Some`) or remove (`None`) one key, logging failures
    fn write(storage: &dyn KeyValueStore, key: &str, value: Option<&str>) -> bool {
        let result = match value {
            Some(value) => storage.set(key, value),
            None => storage.remove(key),
        };
        match result {
            Ok(()) => true,
            Err(e) => {
                warn!(key, error = %e, "Failed to write session to storage");
                false
            }
        }
    }

    fn read<R>(&self, f: impl FnOnce(Option<&SessionData>) -> R) -> R {
        let data = self.inner.data.read().unwrap_or_else(PoisonError::into_inner);
        f(data.as_ref())
    }
}
