//! Shared persistence core for per-user code lists.
//!
//! A `PersistedList` caches the decoded list for one storage key. The cache only
//! changes after the backing write succeeds, so a failed write leaves both the
//! cache and the stored value at their last committed state.

use crate::list_codec;
use crate::local_store::{read_or_absent, LocalStore, StoreError};
use crate::store_key::{derive_key, CollectionKind};
use std::rc::Rc;

pub struct PersistedList {
    store: Rc<dyn LocalStore>,
    kind: CollectionKind,
    key: Option<String>,
    codes: Vec<String>,
}

impl PersistedList {
    pub fn open(store: Rc<dyn LocalStore>, kind: CollectionKind, user: Option<&str>) -> Self {
        let key = derive_key(kind, user);
        let mut list = Self {
            store,
            kind,
            key,
            codes: Vec::new(),
        };
        list.reload();
        list
    }

    pub fn kind(&self) -> CollectionKind {
        self.kind
    }

    pub fn key(&self) -> Option<&str> {
        self.key.as_deref()
    }

    pub fn codes(&self) -> &[String] {
        &self.codes
    }

    /// Re-read the backing store, de-duplicating with the front-most occurrence winning.
    pub fn reload(&mut self) {
        self.codes = match &self.key {
            Some(key) => {
                let raw = read_or_absent(self.store.as_ref(), key);
                dedup_front(list_codec::decode(raw.as_deref()))
            }
            None => Vec::new(),
        };
    }

    /// Strict re-read for mutations. On a read error the cache is left as it was,
    /// so nothing gets written on top of a list that could not be loaded.
    pub fn try_reload(&mut self) -> Result<(), StoreError> {
        let Some(key) = &self.key else {
            self.codes.clear();
            return Ok(());
        };
        let raw = self.store.get(key).map_err(|err| {
            tracing::warn!(key = key.as_str(), error = %err, "read failed, keeping cached list");
            err
        })?;
        self.codes = dedup_front(list_codec::decode(raw.as_deref()));
        Ok(())
    }

    /// Persist `next` and adopt it as the cached list. Anonymous lists never write.
    pub fn commit(&mut self, next: Vec<String>) -> Result<(), StoreError> {
        let Some(key) = &self.key else {
            return Ok(());
        };
        let raw = list_codec::encode(&next);
        if let Err(err) = self.store.set(key, &raw) {
            tracing::warn!(key = key.as_str(), error = %err, "write failed, keeping last committed list");
            return Err(err);
        }
        self.codes = next;
        Ok(())
    }

    /// Drop the storage entry entirely (no residual empty list).
    pub fn clear(&mut self) -> Result<(), StoreError> {
        let Some(key) = &self.key else {
            return Ok(());
        };
        if let Err(err) = self.store.remove(key) {
            tracing::warn!(key = key.as_str(), error = %err, "clear failed");
            return Err(err);
        }
        self.codes.clear();
        Ok(())
    }

    /// Truncate the cached copy without writing (used for legacy over-long values).
    pub fn truncate_cached(&mut self, len: usize) {
        self.codes.truncate(len);
    }
}

fn dedup_front(codes: Vec<String>) -> Vec<String> {
    let mut seen = std::collections::HashSet::with_capacity(codes.len());
    codes
        .into_iter()
        .filter(|code| seen.insert(code.clone()))
        .collect()
}
