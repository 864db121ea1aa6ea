//! Identity provider contract and a local, store-backed implementation.

use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use sheguard_core::model::{AuthState, DocPath, UserId, UserIdentity};
use storage::document::WriteMode;
use storage::repository::{DocumentStore, FlagStore};
use tokio::sync::watch;

use crate::error::IdentityError;

/// Flag-store key holding the signed-in identity as JSON.
pub const SESSION_FLAG_KEY: &str = "auth.session";

pub const MIN_PASSWORD_LEN: usize = 6;

/// Issues and resolves the current user.
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Live view of the current auth state. Starts as `Pending` until the
    /// provider has restored any persisted session.
    fn auth_state(&self) -> watch::Receiver<AuthState>;

    /// # Errors
    ///
    /// Returns `IdentityError` if an anonymous identity cannot be issued.
    async fn sign_in_anonymously(&self) -> Result<UserIdentity, IdentityError>;

    /// # Errors
    ///
    /// Returns `IdentityError::InvalidCredentials` for unknown accounts or a
    /// wrong password.
    async fn sign_in_with_email(
        &self,
        email: &str,
        password: &str,
    ) -> Result<UserIdentity, IdentityError>;

    /// # Errors
    ///
    /// Returns `IdentityError` for invalid input or an existing account.
    async fn create_account(
        &self,
        email: &str,
        password: &str,
    ) -> Result<UserIdentity, IdentityError>;

    /// # Errors
    ///
    /// Returns `IdentityError` if the session cannot be cleared.
    async fn sign_out(&self) -> Result<(), IdentityError>;
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct AccountRecord {
    uid: UserId,
    email: String,
    salt: String,
    password_digest: String,
}

/// Identity provider that keeps accounts in the document store and the current
/// session in the flag store.
pub struct LocalIdentityProvider {
    flags: Arc<dyn FlagStore>,
    documents: Arc<dyn DocumentStore>,
    state: watch::Sender<AuthState>,
}

impl LocalIdentityProvider {
    #[must_use]
    pub fn new(flags: Arc<dyn FlagStore>, documents: Arc<dyn DocumentStore>) -> Self {
        let (state, _) = watch::channel(AuthState::Pending);
        Self {
            flags,
            documents,
            state,
        }
    }

    /// Build a provider and restore the persisted session.
    pub async fn restored(flags: Arc<dyn FlagStore>, documents: Arc<dyn DocumentStore>) -> Self {
        let provider = Self::new(flags, documents);
        provider.restore().await;
        provider
    }

    /// Resolve the `Pending` state from the persisted session. Read or decode
    /// failures resolve to `SignedOut`.
    pub async fn restore(&self) {
        let restored = match self.flags.get_flag(SESSION_FLAG_KEY).await {
            Ok(Some(raw)) => match serde_json::from_str::<UserIdentity>(&raw) {
                Ok(identity) => AuthState::SignedIn(identity),
                Err(err) => {
                    tracing::warn!(error = %err, "discarding unreadable persisted session");
                    AuthState::SignedOut
                }
            },
            Ok(None) => AuthState::SignedOut,
            Err(err) => {
                tracing::warn!(error = %err, "failed to read persisted session");
                AuthState::SignedOut
            }
        };
        self.state.send_replace(restored);
    }

    async fn establish(&self, identity: UserIdentity) -> UserIdentity {
        match serde_json::to_string(&identity) {
            Ok(raw) => {
                if let Err(err) = self.flags.set_flag(SESSION_FLAG_KEY, &raw).await {
                    tracing::warn!(error = %err, "session will not survive a restart");
                }
            }
            Err(err) => tracing::warn!(error = %err, "failed to encode session"),
        }
        tracing::info!(uid = %identity.uid(), anonymous = identity.is_anonymous(), "signed in");
        self.state.send_replace(AuthState::SignedIn(identity.clone()));
        identity
    }

    async fn load_account(&self, path: &DocPath) -> Result<Option<AccountRecord>, IdentityError> {
        let Some(doc) = self.documents.get_document(path).await? else {
            return Ok(None);
        };
        serde_json::from_value(serde_json::Value::Object(doc))
            .map(Some)
            .map_err(|err| IdentityError::Unavailable(format!("corrupt account record: {err}")))
    }
}

#[async_trait]
impl IdentityProvider for LocalIdentityProvider {
    fn auth_state(&self) -> watch::Receiver<AuthState> {
        self.state.subscribe()
    }

    async fn sign_in_anonymously(&self) -> Result<UserIdentity, IdentityError> {
        Ok(self
            .establish(UserIdentity::anonymous(UserId::generate()))
            .await)
    }

    async fn sign_in_with_email(
        &self,
        email: &str,
        password: &str,
    ) -> Result<UserIdentity, IdentityError> {
        let email = normalize_email(email)?;
        let path = DocPath::account(&email).map_err(|_| IdentityError::InvalidEmail)?;
        let account = self
            .load_account(&path)
            .await?
            .ok_or(IdentityError::InvalidCredentials)?;
        if password_digest(&account.salt, password) != account.password_digest {
            return Err(IdentityError::InvalidCredentials);
        }
        Ok(self
            .establish(UserIdentity::registered(account.uid, account.email))
            .await)
    }

    async fn create_account(
        &self,
        email: &str,
        password: &str,
    ) -> Result<UserIdentity, IdentityError> {
        let email = normalize_email(email)?;
        if password.chars().count() < MIN_PASSWORD_LEN {
            return Err(IdentityError::WeakPassword {
                min: MIN_PASSWORD_LEN,
            });
        }
        let path = DocPath::account(&email).map_err(|_| IdentityError::InvalidEmail)?;
        if self.load_account(&path).await?.is_some() {
            return Err(IdentityError::AccountExists);
        }

        let salt = UserId::generate().to_string();
        let record = AccountRecord {
            uid: UserId::generate(),
            email: email.clone(),
            password_digest: password_digest(&salt, password),
            salt,
        };
        let serde_json::Value::Object(doc) = serde_json::to_value(&record)
            .map_err(|err| IdentityError::Unavailable(err.to_string()))?
        else {
            return Err(IdentityError::Unavailable("account record is not an object".into()));
        };
        self.documents
            .set_document(&path, doc, WriteMode::Replace)
            .await?;

        Ok(self
            .establish(UserIdentity::registered(record.uid, email))
            .await)
    }

    async fn sign_out(&self) -> Result<(), IdentityError> {
        self.flags.remove_flag(SESSION_FLAG_KEY).await?;
        tracing::info!("signed out");
        self.state.send_replace(AuthState::SignedOut);
        Ok(())
    }
}

fn normalize_email(raw: &str) -> Result<String, IdentityError> {
    let email = raw.trim().to_lowercase();
    let valid = match email.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty()
                && domain.contains('.')
                && !domain.starts_with('.')
                && !domain.ends_with('.')
                && !email.contains(char::is_whitespace)
                && !email.contains('/')
                && !domain.contains('@')
        }
        None => false,
    };
    if valid {
        Ok(email)
    } else {
        Err(IdentityError::InvalidEmail)
    }
}

fn password_digest(salt: &str, password: &str) -> String {
    let digest = Sha256::digest(format!("{salt}:{password}").as_bytes());
    format!("{digest:x}")
}
