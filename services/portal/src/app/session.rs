//! services/portal/src/app/session.rs
//!
//! The session store: the single in-process owner of "who is logged in".
//!
//! Every mutation is mirrored to the `SessionStorage` port before returning, so a
//! restarted client picks up where it left off. The token is the authority: a
//! stored user blob without a token is ignored.

use classroom_core::domain::{Session, UserProfile};
use classroom_core::ports::{PortError, PortResult, SessionStorage, TOKEN_KEY, USER_KEY};
use std::sync::{Arc, PoisonError, RwLock};
use tracing::{debug, info, warn};

pub struct SessionStore {
    storage: Arc<dyn SessionStorage>,
    current: RwLock<Option<Session>>,
}

impl SessionStore {
    /// Rebuilds the session from durable storage. The token is not checked here;
    /// a stale one is discovered on the next API call.
    pub fn restore(storage: Arc<dyn SessionStorage>) -> Self {
        let restored = match read_persisted(storage.as_ref()) {
            Ok(session) => session,
            Err(e) => {
                warn!("Could not read persisted session, starting logged out: {}", e);
                None
            }
        };
        match &restored {
            Some(session) => info!(
                "Restored session for {} ({})",
                session.display_name, session.role
            ),
            None => debug!("No persisted session found"),
        }
        Self {
            storage,
            current: RwLock::new(restored),
        }
    }

    pub fn get(&self) -> Option<Session> {
        self.current.read().ok().and_then(|guard| guard.clone())
    }

    pub fn is_logged_in(&self) -> bool {
        self.get().is_some_and(|s| s.has_token())
    }

    pub fn token(&self) -> Option<String> {
        self.get().map(|s| s.token).filter(|t| !t.is_empty())
    }

    /// Replaces the session. Memory is always updated; a storage failure is
    /// still reported so the caller knows the session will not survive a restart.
    pub fn set(&self, session: Session) -> PortResult<()> {
        let mut guard = self.current.write().unwrap_or_else(PoisonError::into_inner);
        let persisted = persist(self.storage.as_ref(), &session);
        *guard = Some(session);
        persisted.inspect_err(|e| warn!("Session not persisted: {}", e))
    }

    /// Drops the session everywhere. Safe to call any number of times.
    pub fn clear(&self) {
        let mut guard = self.current.write().unwrap_or_else(PoisonError::into_inner);
        if guard.take().is_some() {
            info!("Session cleared");
        }
        self.forget_persisted();
    }

    /// Clears the session only while it still holds `token`. A rejection of a
    /// token that has since been replaced or dropped changes nothing.
    pub fn revoke(&self, token: &str) -> bool {
        let mut guard = self.current.write().unwrap_or_else(PoisonError::into_inner);
        if guard.as_ref().map_or(true, |session| session.token != token) {
            return false;
        }
        *guard = None;
        info!("Session cleared after the server rejected its token");
        self.forget_persisted();
        true
    }

    // Called with the write lock held so a concurrent `set` cannot be undone.
    fn forget_persisted(&self) {
        for key in [TOKEN_KEY, USER_KEY] {
            if let Err(e) = self.storage.remove(key) {
                warn!("Could not remove persisted '{}': {}", key, e);
            }
        }
    }
}

fn read_persisted(storage: &dyn SessionStorage) -> PortResult<Option<Session>> {
    let Some(token) = storage.get(TOKEN_KEY)?.filter(|t| !t.trim().is_empty()) else {
        return Ok(None);
    };
    let Some(raw_user) = storage.get(USER_KEY)? else {
        return Ok(None);
    };
    match serde_json::from_str::<UserProfile>(&raw_user) {
        Ok(profile) => Ok(Some(Session::new(profile.name, profile.role, token.trim()))),
        Err(e) => {
            warn!("Ignoring unreadable persisted user: {}", e);
            Ok(None)
        }
    }
}

fn persist(storage: &dyn SessionStorage, session: &Session) -> PortResult<()> {
    let user = serde_json::to_string(&session.profile())
        .map_err(|e| PortError::Storage(e.to_string()))?;
    storage.set(TOKEN_KEY, &session.token)?;
    storage.set(USER_KEY, &user)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::MemoryStorage;
    use classroom_core::domain::Role;

    #[test]
    fn set_mirrors_both_keys_and_restore_reads_them_back() {
        let storage = Arc::new(MemoryStorage::new());
        let store = SessionStore::restore(storage.clone());
        assert!(store.get().is_none());

        store.set(Session::new("Grace", Role::Teacher, "tok-1")).unwrap();
        assert_eq!(storage.get(TOKEN_KEY).unwrap().as_deref(), Some("tok-1"));
        let user: UserProfile =
            serde_json::from_str(&storage.get(USER_KEY).unwrap().unwrap()).unwrap();
        assert_eq!(user.role, Role::Teacher);

        let again = SessionStore::restore(storage);
        assert_eq!(again.get(), Some(Session::new("Grace", Role::Teacher, "tok-1")));
    }

    #[test]
    fn user_without_token_is_treated_as_logged_out() {
        let storage = Arc::new(
            MemoryStorage::new().with_entry(USER_KEY, r#"{"name":"Ada","role":"student"}"#),
        );
        let store = SessionStore::restore(storage);
        assert!(store.get().is_none());
        assert!(!store.is_logged_in());
    }

    #[test]
    fn corrupt_user_blob_is_ignored() {
        let storage = Arc::new(
            MemoryStorage::new()
                .with_entry(TOKEN_KEY, "tok")
                .with_entry(USER_KEY, "{not json"),
        );
        assert!(SessionStore::restore(storage).get().is_none());
    }

    #[test]
    fn clear_wipes_storage_and_is_idempotent() {
        let storage = Arc::new(MemoryStorage::new());
        let store = SessionStore::restore(storage.clone());
        store.set(Session::new("Ada", Role::Student, "tok")).unwrap();

        store.clear();
        store.clear();
        assert!(store.get().is_none());
        assert_eq!(store.token(), None);
        assert_eq!(storage.get(TOKEN_KEY).unwrap(), None);
        assert_eq!(storage.get(USER_KEY).unwrap(), None);
    }

    #[test]
    fn revoke_only_clears_the_token_it_names() {
        let storage = Arc::new(MemoryStorage::new());
        let store = SessionStore::restore(storage.clone());
        store.set(Session::new("Ada", Role::Student, "old")).unwrap();
        store.set(Session::new("Ada", Role::Student, "new")).unwrap();

        assert!(!store.revoke("old"));
        assert_eq!(store.token().as_deref(), Some("new"));
        assert_eq!(storage.get(TOKEN_KEY).unwrap().as_deref(), Some("new"));

        assert!(store.revoke("new"));
        assert!(store.get().is_none());
        assert_eq!(storage.get(TOKEN_KEY).unwrap(), None);
        assert!(!store.revoke("new"));
    }
}
