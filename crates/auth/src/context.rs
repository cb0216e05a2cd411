//! Credential context for the current session

use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use freehub_common::storage::{load_json, save_json, TOKEN_KEY, USER_KEY};
use freehub_common::{Error, LocalStore, Result};
use freehub_domain::{BearerToken, Role, Session, UserProfile};

/// Holds the active session and mirrors it into client-local storage.
///
/// The session is replaced wholesale on login and dropped on logout. Clones
/// share the same session slot.
#[derive(Clone)]
pub struct CredentialContext {
    session: Arc<RwLock<Option<Arc<Session>>>>,
    store: Arc<dyn LocalStore>,
}

impl CredentialContext {
    /// Create an empty context backed by `store`
    pub fn new(store: Arc<dyn LocalStore>) -> Self {
        Self {
            session: Arc::new(RwLock::new(None)),
            store,
        }
    }

    /// Create a context and reload any session persisted in `store`.
    ///
    /// A token without a profile (or the reverse), or a profile that no longer
    /// parses, is discarded along with its counterpart.
    pub fn restore(store: Arc<dyn LocalStore>) -> Result<Self> {
        let context = Self::new(store);

        match context.load_persisted() {
            Ok(Some(session)) => {
                tracing::info!(user_id = %session.user.id, role = %session.role(), "Restored session");
                *context.write() = Some(Arc::new(session));
            }
            Ok(None) => context.forget_persisted()?,
            Err(e) => {
                tracing::warn!(error = %e, "Discarding unreadable persisted session");
                context.forget_persisted()?;
            }
        }

        Ok(context)
    }

    fn load_persisted(&self) -> Result<Option<Session>> {
        let token = self.store.get(TOKEN_KEY)?;
        let user: Option<UserProfile> = load_json(self.store.as_ref(), USER_KEY)?;

        match (token, user) {
            (Some(token), Some(user)) => Ok(Some(Session::new(BearerToken::new(token)?, user))),
            _ => Ok(None),
        }
    }

    fn forget_persisted(&self) -> Result<()> {
        self.store.remove(TOKEN_KEY)?;
        self.store.remove(USER_KEY)
    }

    fn read(&self) -> RwLockReadGuard<'_, Option<Arc<Session>>> {
        self.session.read().unwrap_or_else(|e| e.into_inner())
    }

    fn write(&self) -> RwLockWriteGuard<'_, Option<Arc<Session>>> {
        self.session.write().unwrap_or_else(|e| e.into_inner())
    }

    /// The active session, if any
    pub fn current(&self) -> Option<Arc<Session>> {
        self.read().clone()
    }

    pub fn role(&self) -> Option<Role> {
        self.read().as_ref().map(|session| session.role())
    }

    pub fn is_authenticated(&self) -> bool {
        self.read().is_some()
    }

    /// The active session, or `Authentication` when logged out
    pub fn require_session(&self) -> Result<Arc<Session>> {
        self.current()
            .ok_or_else(|| Error::Authentication("Please log in to continue".to_string()))
    }

    /// Persist `session` and make it the active one
    pub fn establish(&self, session: Session) -> Result<Arc<Session>> {
        self.store.set(TOKEN_KEY, session.token.as_str())?;
        if let Err(e) = save_json(self.store.as_ref(), USER_KEY, &session.user) {
            // Never leave a token on disk without its profile
            self.store.remove(TOKEN_KEY)?;
            return Err(e);
        }

        let session = Arc::new(session);
        *self.write() = Some(session.clone());
        Ok(session)
    }

    /// Drop the active session and its persisted records together
    pub fn clear(&self) -> Result<()> {
        *self.write() = None;
        self.forget_persisted()
    }
}

impl std::fmt::Debug for CredentialContext {
    #[mutants::skip] // Debug output only
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CredentialContext")
            .field("authenticated", &self.is_authenticated())
            .finish()
    }
}
