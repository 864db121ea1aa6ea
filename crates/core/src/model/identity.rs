use serde::{Deserialize, Serialize};

use super::UserId;

/// A user as reported by the identity provider.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserIdentity {
    uid: UserId,
    email: Option<String>,
    anonymous: bool,
}

impl UserIdentity {
    #[must_use]
    pub fn anonymous(uid: UserId) -> Self {
        Self {
            uid,
            email: None,
            anonymous: true,
        }
    }

    #[must_use]
    pub fn registered(uid: UserId, email: impl Into<String>) -> Self {
        Self {
            uid,
            email: Some(email.into()),
            anonymous: false,
        }
    }

    #[must_use]
    pub fn uid(&self) -> &UserId {
        &self.uid
    }

    #[must_use]
    pub fn email(&self) -> Option<&str> {
        self.email.as_deref()
    }

    #[must_use]
    pub fn is_anonymous(&self) -> bool {
        self.anonymous
    }

    /// Registered users own per-user documents such as contacts and SOS settings.
    #[must_use]
    pub fn is_registered(&self) -> bool {
        !self.anonymous
    }
}

/// What the identity provider currently knows about the signed-in user.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum AuthState {
    /// The provider has not finished restoring a persisted session yet.
    #[default]
    Pending,
    SignedOut,
    SignedIn(UserIdentity),
}

/// Process-lifetime session as seen by the shell.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Session {
    pub identity: Option<UserIdentity>,
    /// Set once the provider has reported its first result, including failures.
    pub ready: bool,
}

impl Session {
    #[must_use]
    pub fn resolved(identity: Option<UserIdentity>) -> Self {
        Self {
            identity,
            ready: true,
        }
    }

    #[must_use]
    pub fn registered_identity(&self) -> Option<&UserIdentity> {
        self.identity.as_ref().filter(|id| id.is_registered())
    }

    #[must_use]
    pub fn uid(&self) -> Option<&UserId> {
        self.identity.as_ref().map(UserIdentity::uid)
    }
}
