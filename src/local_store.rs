//! Key/value persistence seam shared by every per-user collection.
//!
//! The store is a process-wide resource with last-write-wins semantics per key.
//! No transaction spans several keys.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("storage quota exceeded writing {key}: {needed} bytes needed, limit {limit}")]
    QuotaExceeded {
        key: String,
        needed: u64,
        limit: u64,
    },
    #[error("local store backend failure: {0}")]
    Backend(String),
    #[error("local store is unavailable")]
    Unavailable,
}

impl From<rusqlite::Error> for StoreError {
    fn from(err: rusqlite::Error) -> Self {
        StoreError::Backend(err.to_string())
    }
}

pub trait LocalStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError>;
    fn set(&self, key: &str, value: &str) -> Result<(), StoreError>;
    fn remove(&self, key: &str) -> Result<(), StoreError>;
}

/// Read `key`, treating a failed read like a missing value.
pub fn read_or_absent(store: &dyn LocalStore, key: &str) -> Option<String> {
    match store.get(key) {
        Ok(value) => value,
        Err(err) => {
            tracing::warn!(key, error = %err, "local store read failed, treating as absent");
            None
        }
    }
}

#[cfg(test)]
pub use fake::MemoryStore;
