//! Durable key-value storage backing the session.
//!
//! This module provides:
//! - `KeyValueStore`: the storage contract used by the auth store
//! - `MemoryStore`: process-local map, nothing survives a restart
//! - `FileStore`: flat JSON object on disk, rewritten on every mutation
//! - `KeyringStore`: one OS keychain entry per key
//!
//! Mutations are synchronous: once `set` or `remove` returns, the value is
//! durable (or the call failed).

pub mod file;
pub mod keyring;
pub mod memory;

use anyhow::Result;

pub use self::file::FileStore;
pub use self::keyring::KeyringStore;
pub use self::memory::MemoryStore;

/// String key-value storage that survives (or, for `MemoryStore`, mimics)
/// process restarts.
pub trait KeyValueStore: Send + Sync {
    /// Read a value. A missing key is `Ok(None)`, not an error.
    fn get(&self, key: &str) -> Result<Option<String>>;

    /// Write a value, replacing any previous one.
    fn set(&self, key: &str, value: &str) -> Result<()>;

    /// Delete a value. Removing a missing key is a no-op.
    fn remove(&self, key: &str) -> Result<()>;
}
