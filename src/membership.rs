//! Set-like per-user collection (favorites).
//!
//! Insertion order is kept so stored values round-trip unchanged: add appends,
//! remove filters. Every mutation is written through before the cache moves.

use crate::collection::PersistedList;
use crate::local_store::{LocalStore, StoreError};
use crate::store_key::CollectionKind;
use std::rc::Rc;

pub struct MembershipStore {
    list: PersistedList,
}

impl MembershipStore {
    pub fn open(store: Rc<dyn LocalStore>, kind: CollectionKind, user: Option<&str>) -> Self {
        Self {
            list: PersistedList::open(store, kind, user),
        }
    }

    pub fn favorites(store: Rc<dyn LocalStore>, user: Option<&str>) -> Self {
        Self::open(store, CollectionKind::Favorites, user)
    }

    pub fn kind(&self) -> CollectionKind {
        self.list.kind()
    }

    pub fn key(&self) -> Option<&str> {
        self.list.key()
    }

    pub fn is_member(&self, code: &str) -> bool {
        self.list.codes().iter().any(|c| c == code)
    }

    /// Flip membership of `code` and return the resulting state.
    /// Anonymous stores are inert and always answer `false`.
    pub fn toggle(&mut self, code: &str) -> Result<bool, StoreError> {
        if self.key().is_none() {
            return Ok(false);
        }
        if self.is_member(code) {
            self.remove(code)?;
            Ok(false)
        } else {
            self.add(code)?;
            Ok(true)
        }
    }

    /// Append `code` if absent. Returns whether the list changed.
    pub fn add(&mut self, code: &str) -> Result<bool, StoreError> {
        if self.key().is_none() || self.is_member(code) {
            return Ok(false);
        }
        let mut next = self.list.codes().to_vec();
        next.push(code.to_string());
        self.list.commit(next)?;
        Ok(true)
    }

    /// Remove every occurrence of `code`. Returns whether the list changed.
    pub fn remove(&mut self, code: &str) -> Result<bool, StoreError> {
        if self.key().is_none() || !self.is_member(code) {
            return Ok(false);
        }
        let next = self
            .list
            .codes()
            .iter()
            .filter(|c| c.as_str() != code)
            .cloned()
            .collect();
        self.list.commit(next)?;
        Ok(true)
    }

    pub fn list(&self) -> &[String] {
        self.list.codes()
    }

    pub fn reload(&mut self) {
        self.list.reload();
    }

    pub fn try_reload(&mut self) -> Result<(), StoreError> {
        self.list.try_reload()
    }

    pub fn clear(&mut self) -> Result<(), StoreError> {
        self.list.clear()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::local_store::MemoryStore;

    fn favorites_for(mem: &Rc<MemoryStore>, user: Option<&str>) -> MembershipStore {
        MembershipStore::favorites(mem.clone(), user)
    }

    #[test]
    fn anonymous_toggle_is_noop() {
        let mem = Rc::new(MemoryStore::new());
        let mut favs = favorites_for(&mem, None);
        assert!(!favs.is_member("USA"));
        assert!(!favs.toggle("USA").unwrap());
        assert!(!favs.is_member("USA"));
        assert!(favs.list().is_empty());
        assert_eq!(mem.write_count(), 0);
    }

    #[test]
    fn toggle_adds_then_removes() {
        let mem = Rc::new(MemoryStore::new());
        let mut favs = favorites_for(&mem, Some("testuser"));
        assert_eq!(favs.kind(), CollectionKind::Favorites);
        assert!(favs.toggle("USA").unwrap());
        assert_eq!(favs.list(), ["USA"]);
        assert_eq!(mem.raw("favorites_testuser").as_deref(), Some(r#"["USA"]"#));

        assert!(!favs.toggle("USA").unwrap());
        assert!(favs.list().is_empty());
        assert_eq!(mem.raw("favorites_testuser").as_deref(), Some("[]"));
    }

    #[test]
    fn double_toggle_restores_membership() {
        let mem = Rc::new(MemoryStore::new());
        mem.seed("favorites_u", r#"["CAN"]"#);
        let mut favs = favorites_for(&mem, Some("u"));
        for code in ["CAN", "USA"] {
            let before = favs.is_member(code);
            favs.toggle(code).unwrap();
            favs.toggle(code).unwrap();
            assert_eq!(favs.is_member(code), before);
        }
    }

    #[test]
    fn insertion_order_is_preserved() {
        let mem = Rc::new(MemoryStore::new());
        let mut favs = favorites_for(&mem, Some("u"));
        for code in ["JPN", "ARG", "KEN", "FRA"] {
            favs.add(code).unwrap();
        }
        favs.remove("ARG").unwrap();
        assert_eq!(favs.list(), ["JPN", "KEN", "FRA"]);
        assert_eq!(
            mem.raw("favorites_u").as_deref(),
            Some(r#"["JPN","KEN","FRA"]"#)
        );
    }

    #[test]
    fn add_and_remove_are_idempotent() {
        let mem = Rc::new(MemoryStore::new());
        let mut favs = favorites_for(&mem, Some("u"));
        assert!(favs.add("USA").unwrap());
        assert!(!favs.add("USA").unwrap());
        assert_eq!(favs.list(), ["USA"]);
        assert!(favs.remove("USA").unwrap());
        assert!(!favs.remove("USA").unwrap());
    }

    #[test]
    fn stored_duplicates_are_all_removed() {
        let mem = Rc::new(MemoryStore::new());
        mem.seed("favorites_u", r#"["USA","CAN","USA"]"#);
        let mut favs = favorites_for(&mem, Some("u"));
        assert!(!favs.toggle("USA").unwrap());
        assert_eq!(mem.raw("favorites_u").as_deref(), Some(r#"["CAN"]"#));
    }

    #[test]
    fn corrupt_value_reads_as_empty() {
        let mem = Rc::new(MemoryStore::new());
        mem.seed("favorites_u", "not json");
        let mut favs = favorites_for(&mem, Some("u"));
        assert!(favs.list().is_empty());
        assert!(favs.toggle("USA").unwrap());
        assert_eq!(mem.raw("favorites_u").as_deref(), Some(r#"["USA"]"#));
    }

    #[test]
    fn users_are_isolated() {
        let mem = Rc::new(MemoryStore::new());
        mem.seed("favorites_bob", r#"["BRA"]"#);
        let mut alice = favorites_for(&mem, Some("alice"));
        alice.toggle("USA").unwrap();
        alice.toggle("CAN").unwrap();
        alice.clear().unwrap();
        assert_eq!(mem.raw("favorites_bob").as_deref(), Some(r#"["BRA"]"#));
        assert!(!favorites_for(&mem, Some("bob")).is_member("USA"));
    }

    #[test]
    fn clear_removes_entry_instead_of_writing_empty_list() {
        let mem = Rc::new(MemoryStore::new());
        let mut favs = favorites_for(&mem, Some("u"));
        favs.toggle("USA").unwrap();
        favs.clear().unwrap();
        assert_eq!(mem.raw("favorites_u"), None);
        assert!(favs.list().is_empty());
        // Toggling everything off leaves an empty list entry behind instead.
        favs.toggle("USA").unwrap();
        favs.toggle("USA").unwrap();
        assert_eq!(mem.raw("favorites_u").as_deref(), Some("[]"));
    }

    #[test]
    fn failed_write_rolls_back() {
        let mem = Rc::new(MemoryStore::new());
        let mut favs = favorites_for(&mem, Some("u"));
        favs.toggle("USA").unwrap();
        mem.fail_writes(true);

        assert!(favs.toggle("CAN").is_err());
        assert!(!favs.is_member("CAN"));
        assert!(favs.toggle("USA").is_err());
        assert!(favs.is_member("USA"));
        assert!(favs.clear().is_err());
        assert_eq!(favs.list(), ["USA"]);
        assert_eq!(mem.raw("favorites_u").as_deref(), Some(r#"["USA"]"#));
    }

    #[test]
    fn reload_picks_up_writes_from_another_instance() {
        let mem = Rc::new(MemoryStore::new());
        let mut list_view = favorites_for(&mem, Some("u"));
        let mut detail_view = favorites_for(&mem, Some("u"));
        detail_view.toggle("PER").unwrap();
        assert!(!list_view.is_member("PER"));
        list_view.reload();
        assert!(list_view.is_member("PER"));
    }
}
