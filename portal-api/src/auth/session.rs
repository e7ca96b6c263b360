//! Server-side admin sessions
//!
//! A session is an entry in an in-process map keyed by a random UUID
//! token; the token travels in an HttpOnly cookie. Sessions live until
//! explicit logout or process restart. Two states only: a token either
//! resolves to a session (authenticated) or it does not.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use uuid::Uuid;

use super::Identity;

/// Authenticated session data
#[derive(Debug, Clone)]
pub struct Session {
    pub user_id: i64,
    pub username: String,
}

/// Shared in-process session map
#[derive(Debug, Clone, Default)]
pub struct SessionStore {
    inner: Arc<Mutex<HashMap<Uuid, Session>>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a fresh session for `identity`, returning its token
    pub fn create(&self, identity: &Identity) -> Uuid {
        let token = Uuid::new_v4();
        let session = Session {
            user_id: identity.id,
            username: identity.username.clone(),
        };
        self.lock().insert(token, session);
        token
    }

    /// Resolve a token to its session, if one exists
    pub fn get(&self, token: &Uuid) -> Option<Session> {
        self.lock().get(token).cloned()
    }

    /// Drop a session; `false` if the token was unknown
    pub fn remove(&self, token: &Uuid) -> bool {
        self.lock().remove(token).is_some()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<Uuid, Session>> {
        self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}
