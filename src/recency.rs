//! Recently viewed history: most-recent-first, de-duplicated, capped.

use crate::collection::PersistedList;
use crate::local_store::{LocalStore, StoreError};
use crate::store_key::CollectionKind;
use std::rc::Rc;

pub const RECENT_CAPACITY: usize = 10;

pub struct RecencyStore {
    list: PersistedList,
    capacity: usize,
}

impl RecencyStore {
    pub fn open(store: Rc<dyn LocalStore>, user: Option<&str>) -> Self {
        let mut list = PersistedList::open(store, CollectionKind::ViewedCountries, user);
        list.truncate_cached(RECENT_CAPACITY);
        Self {
            list,
            capacity: RECENT_CAPACITY,
        }
    }

    pub fn key(&self) -> Option<&str> {
        self.list.key()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Move `code` to the front (inserting it if new) and drop anything past capacity.
    /// Anonymous users are not tracked.
    pub fn record_view(&mut self, code: &str) -> Result<(), StoreError> {
        if self.key().is_none() {
            return Ok(());
        }
        let mut next = Vec::with_capacity(self.capacity);
        next.push(code.to_string());
        next.extend(
            self.list
                .codes()
                .iter()
                .filter(|c| c.as_str() != code)
                .cloned(),
        );
        next.truncate(self.capacity);
        self.list.commit(next)
    }

    pub fn list(&self) -> &[String] {
        self.list.codes()
    }

    pub fn reload(&mut self) {
        self.list.reload();
        self.list.truncate_cached(self.capacity);
    }

    pub fn try_reload(&mut self) -> Result<(), StoreError> {
        self.list.try_reload()?;
        self.list.truncate_cached(self.capacity);
        Ok(())
    }

    pub fn clear(&mut self) -> Result<(), StoreError> {
        self.list.clear()
    }
}
