use std::fmt;
use std::sync::RwLock;

use serde::{Deserialize, Serialize};
use tracing::info;

/// Opaque user id issued by the auth provider
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UserId(String);

impl UserId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Source of the current identity. Passed to whatever needs it; there is no
/// global session.
pub trait SessionProvider: Send + Sync {
    fn current_identity(&self) -> Option<UserId>;
}

/// Session held in process memory
#[derive(Default)]
pub struct LocalSession {
    identity: RwLock<Option<UserId>>,
}

impl LocalSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn signed_in(user: UserId) -> Self {
        Self {
            identity: RwLock::new(Some(user)),
        }
    }

    pub fn sign_in(&self, user: UserId) {
        info!("Signed in as {}", user);
        if let Ok(mut identity) = self.identity.write() {
            *identity = Some(user);
        }
    }

    pub fn sign_out(&self) {
        if let Ok(mut identity) = self.identity.write() {
            if let Some(user) = identity.take() {
                info!("Signed out {}", user);
            }
        }
    }
}

impl SessionProvider for LocalSession {
    fn current_identity(&self) -> Option<UserId> {
        self.identity.read().ok().and_then(|identity| identity.clone())
    }
}
