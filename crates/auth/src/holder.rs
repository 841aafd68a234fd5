//! Process-wide session holder.

use std::sync::{Arc, RwLock};

use crate::{MemorySessionStore, Session, SessionError, SessionStore, SessionUser};

/// The single source of truth for "who is signed in".
///
/// Reads are served from memory; every change is written through to the
/// backing store so the next run starts from the same state.
pub struct SessionHolder {
    store: Arc<dyn SessionStore>,
    current: RwLock<Option<Session>>,
}

impl SessionHolder {
    /// Bootstrap from whatever the store holds.
    ///
    /// An unreadable or token-less stored session is discarded: the operator
    /// simply has to log in again.
    pub fn restore(store: Arc<dyn SessionStore>) -> Self {
        let current = match store.load() {
            Ok(Some(session)) if session.is_usable() => {
                tracing::debug!(user = session.user.display_name(), "restored stored session");
                Some(session)
            }
            Ok(Some(_)) => {
                tracing::warn!("stored session has no token; discarding");
                discard(store.as_ref());
                None
            }
            Ok(None) => None,
            Err(err) => {
                tracing::warn!(error = %err, "could not restore stored session; discarding");
                discard(store.as_ref());
                None
            }
        };

        Self {
            store,
            current: RwLock::new(current),
        }
    }

    /// A holder that never touches disk.
    pub fn ephemeral() -> Self {
        Self::restore(Arc::new(MemorySessionStore::new()))
    }

    pub fn session(&self) -> Option<Session> {
        self.current.read().unwrap_or_else(|e| e.into_inner()).clone()
    }

    pub fn token(&self) -> Option<String> {
        self.current
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .as_ref()
            .map(|s| s.token.clone())
    }

    pub fn user(&self) -> Option<SessionUser> {
        self.current
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .as_ref()
            .map(|s| s.user.clone())
    }

    pub fn is_authenticated(&self) -> bool {
        self.current
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .is_some()
    }

    /// Persist and activate a new session.
    pub fn establish(&self, session: Session) -> Result<(), SessionError> {
        self.store.save(&session)?;
        *self.current.write().unwrap_or_else(|e| e.into_inner()) = Some(session);
        Ok(())
    }

    /// Forget the session.
    ///
    /// The in-memory session is dropped even when the store fails, so a
    /// rejected token is never sent twice.
    pub fn clear(&self) -> Result<(), SessionError> {
        *self.current.write().unwrap_or_else(|e| e.into_inner()) = None;
        self.store.clear()
    }
}

fn discard(store: &dyn SessionStore) {
    if let Err(err) = store.clear() {
        tracing::warn!(error = %err, "failed to remove stale session");
    }
}

impl core::fmt::Debug for SessionHolder {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("SessionHolder")
            .field("authenticated", &self.is_authenticated())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn session(token: &str) -> Session {
        Session::new(token, SessionUser::default(), Utc::now())
    }

    #[test]
    fn starts_signed_out_on_empty_store() {
        let holder = SessionHolder::ephemeral();
        assert!(!holder.is_authenticated());
        assert!(holder.token().is_none());
    }

    #[test]
    fn establish_writes_through_and_restores() {
        let store = Arc::new(MemorySessionStore::new());
        let holder = SessionHolder::restore(store.clone());
        holder.establish(session("t-1")).unwrap();
        assert_eq!(holder.token().as_deref(), Some("t-1"));

        let restored = SessionHolder::restore(store);
        assert!(restored.is_authenticated());
        assert_eq!(restored.token().as_deref(), Some("t-1"));
    }

    #[test]
    fn clear_forgets_everywhere() {
        let store = Arc::new(MemorySessionStore::new());
        let holder = SessionHolder::restore(store.clone());
        holder.establish(session("t-1")).unwrap();
        holder.clear().unwrap();

        assert!(!holder.is_authenticated());
        assert!(store.load().unwrap().is_none());
    }

    #[test]
    fn blank_token_is_not_a_session() {
        let store = Arc::new(MemorySessionStore::new());
        store.save(&session("   ")).unwrap();

        let holder = SessionHolder::restore(store.clone());
        assert!(!holder.is_authenticated());
        assert!(store.load().unwrap().is_none());
    }
}
