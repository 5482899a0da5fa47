//! Authentication slice.
//!
//! Durable storage is the source of truth for the session: the API client
//! deletes `authToken`/`authUser` on a `401`, and another `AppState` sharing
//! the store may log in or out at any time. [`AuthSlice::session`] re-reads
//! storage on every call so such changes show up on the next read.

use std::sync::{PoisonError, RwLock};

use secrecy::{ExposeSecret, SecretString};

use crate::models::{Session, SessionUser};
use crate::storage::{AUTH_TOKEN_KEY, AUTH_USER_KEY, SharedStore};

/// Holds the process-wide session.
#[derive(Debug)]
pub struct AuthSlice {
    storage: SharedStore,
    current: RwLock<Current>,
}

#[derive(Debug, Default)]
struct Current {
    session: Session,
    /// Whether `session` made it to storage. An unpersisted session is kept
    /// as-is rather than reconciled away.
    persisted: bool,
}

impl AuthSlice {
    /// Restore the session persisted in `storage`, if any.
    #[must_use]
    pub fn rehydrate(storage: SharedStore) -> Self {
        let session = load(&storage).unwrap_or_default();
        if session.is_authenticated() {
            tracing::debug!("Restored persisted session");
        }
        Self {
            storage,
            current: RwLock::new(Current {
                session,
                persisted: true,
            }),
        }
    }

    /// Current session, reconciled against durable storage.
    pub fn session(&self) -> Session {
        let mut current = self.current.write().unwrap_or_else(PoisonError::into_inner);
        if current.persisted
            && let Some(stored) = load(&self.storage)
            && stored != current.session
        {
            if current.session.is_authenticated() && !stored.is_authenticated() {
                tracing::info!("Stored session was cleared, signing out");
            }
            current.session = stored;
        }
        current.session.clone()
    }

    /// Whether a session token is held.
    pub fn is_authenticated(&self) -> bool {
        self.session().is_authenticated()
    }

    /// Logged-in user, if any.
    pub fn user(&self) -> Option<SessionUser> {
        self.session().user
    }

    /// Start a session and persist it.
    ///
    /// Storage failures are logged; the in-memory session is set regardless.
    pub fn set_credentials(&self, user: SessionUser, token: SecretString) {
        let persisted = persist(&self.storage, &user, &token);
        let mut current = self.current.write().unwrap_or_else(PoisonError::into_inner);
        current.session = Session::new(user, token);
        current.persisted = persisted;
    }

    /// End the session in memory and in storage.
    pub fn logout(&self) {
        let mut persisted = true;
        for key in [AUTH_TOKEN_KEY, AUTH_USER_KEY] {
            if let Err(e) = self.storage.remove(key) {
                tracing::warn!(key, error = %e, "Failed to clear stored session");
                persisted = false;
            }
        }
        let mut current = self.current.write().unwrap_or_else(PoisonError::into_inner);
        current.session = Session::default();
        current.persisted = persisted;
    }
}

/// Read the persisted session. `None` if storage cannot be read.
fn load(storage: &SharedStore) -> Option<Session> {
    let token = match storage.get(AUTH_TOKEN_KEY) {
        Ok(token) => token.filter(|t| !t.is_empty()),
        Err(e) => {
            tracing::warn!(error = %e, "Failed to read stored auth token");
            return None;
        }
    };
    let user = match storage.get(AUTH_USER_KEY) {
        Ok(raw) => raw.and_then(|raw| match serde_json::from_str::<SessionUser>(&raw) {
            Ok(user) => Some(user),
            Err(e) => {
                tracing::warn!(error = %e, "Ignoring unreadable stored user");
                None
            }
        }),
        Err(e) => {
            tracing::warn!(error = %e, "Failed to read stored user");
            None
        }
    };
    Some(Session {
        user,
        token: token.map(SecretString::from),
    })
}

fn persist(storage: &SharedStore, user: &SessionUser, token: &SecretString) -> bool {
    let user_json = match serde_json::to_string(user) {
        Ok(json) => json,
        Err(e) => {
            tracing::warn!(error = %e, "Failed to serialize session user");
            return false;
        }
    };
    let mut persisted = true;
    for (key, value) in [
        (AUTH_TOKEN_KEY, token.expose_secret()),
        (AUTH_USER_KEY, user_json.as_str()),
    ] {
        if let Err(e) = storage.set(key, value) {
            tracing::warn!(key, error = %e, "Failed to persist session");
            persisted = false;
        }
    }
    persisted
}
