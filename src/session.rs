//! Mock sign-in. Any non-empty username/password pair is accepted; the username
//! only serves as the namespace for the user's local collections.

use crate::local_store::{read_or_absent, LocalStore, StoreError};
use crate::store_key::signed_in;
use serde::{Deserialize, Serialize};
use std::rc::Rc;
use thiserror::Error;

pub const SESSION_KEY: &str = "user";

pub trait Session {
    fn current_user_id(&self) -> Option<String>;
}

#[derive(Debug, Error)]
pub enum LoginError {
    #[error("Username and password are required")]
    MissingCredentials,
    #[error("could not save session: {0}")]
    Store(#[from] StoreError),
}

#[derive(Debug, Serialize, Deserialize)]
struct StoredUser {
    username: String,
}

/// Session persisted in the local store under `user` as `{"username": "..."}`.
pub struct StoredSession {
    store: Rc<dyn LocalStore>,
}

impl StoredSession {
    pub fn new(store: Rc<dyn LocalStore>) -> Self {
        Self { store }
    }

    pub fn login(&self, username: &str, password: &str) -> Result<String, LoginError> {
        let username = username.trim();
        if username.is_empty() || password.is_empty() {
            return Err(LoginError::MissingCredentials);
        }
        let record = serde_json::to_string(&StoredUser {
            username: username.to_string(),
        })
        .map_err(|e| StoreError::Backend(e.to_string()))?;
        self.store.set(SESSION_KEY, &record)?;
        tracing::info!(user = username, "signed in");
        Ok(username.to_string())
    }

    pub fn logout(&self) -> Result<(), StoreError> {
        self.store.remove(SESSION_KEY)?;
        tracing::info!("signed out");
        Ok(())
    }
}

impl Session for StoredSession {
    fn current_user_id(&self) -> Option<String> {
        let raw = read_or_absent(self.store.as_ref(), SESSION_KEY)?;
        let user: StoredUser = match serde_json::from_str(&raw) {
            Ok(user) => user,
            Err(err) => {
                tracing::debug!(error = %err, "ignoring unreadable session record");
                return None;
            }
        };
        signed_in(Some(user.username.as_str())).map(str::to_string)
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use crate::local_store::MemoryStore;

    #[test]
    fn login_persists_username() {
        let mem = Rc::new(MemoryStore::new());
        let session = StoredSession::new(mem.clone());
        assert_eq!(session.current_user_id(), None);
        assert_eq!(session.login("  alice ", "pw").unwrap(), "alice");
        assert_eq!(session.current_user_id().as_deref(), Some("alice"));
        assert_eq!(
            mem.raw(SESSION_KEY).as_deref(),
            Some(r#"{"username":"alice"}"#)
        );
    }

    #[test]
    fn login_requires_both_fields() {
        let mem = Rc::new(MemoryStore::new());
        let session = StoredSession::new(mem);
        assert!(matches!(
            session.login("", "pw"),
            Err(LoginError::MissingCredentials)
        ));
        assert!(matches!(
            session.login("bob", ""),
            Err(LoginError::MissingCredentials)
        ));
        assert_eq!(session.current_user_id(), None);
    }

    #[test]
    fn logout_clears_identity() {
        let mem = Rc::new(MemoryStore::new());
        let session = StoredSession::new(mem);
        session.login("alice", "x").unwrap();
        session.logout().unwrap();
        assert_eq!(session.current_user_id(), None);
    }

    #[test]
    fn corrupt_session_record_is_anonymous() {
        let mem = Rc::new(MemoryStore::new());
        mem.seed(SESSION_KEY, "garbage");
        assert_eq!(StoredSession::new(mem).current_user_id(), None);
    }

    #[test]
    fn failed_save_surfaces_store_error() {
        let mem = Rc::new(MemoryStore::new());
        mem.fail_writes(true);
        let session = StoredSession::new(mem);
        assert!(matches!(
            session.login("alice", "pw"),
            Err(LoginError::Store(_))
        ));
    }
}
