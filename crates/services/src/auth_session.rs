//! Session readiness with anonymous fallback.

use std::sync::{Arc, Mutex};

use sheguard_core::model::{AuthState, Session, UserIdentity};
use tokio::sync::watch;
use tokio::task::JoinHandle;

use crate::error::IdentityError;
use crate::identity::IdentityProvider;

/// Follows an identity provider and publishes the shell's `Session`.
///
/// When the provider reports no user, an anonymous sign-in is attempted; if
/// that fails the session resolves with no identity. `ready` is set on the
/// first resolved state and never cleared.
pub struct AuthSession {
    provider: Option<Arc<dyn IdentityProvider>>,
    session: watch::Sender<Session>,
    task: Mutex<Option<JoinHandle<()>>>,
}

impl AuthSession {
    /// Start following `provider`. Must be called inside a tokio runtime.
    #[must_use]
    pub fn start(provider: Arc<dyn IdentityProvider>) -> Arc<Self> {
        let (session, _) = watch::channel(Session::default());
        let this = Arc::new(Self {
            provider: Some(Arc::clone(&provider)),
            session,
            task: Mutex::new(None),
        });
        let handle = tokio::spawn(follow_provider(provider, this.session.clone()));
        if let Ok(mut guard) = this.task.lock() {
            *guard = Some(handle);
        }
        this
    }

    /// A session for builds with no identity provider: ready, with no user.
    #[must_use]
    pub fn disabled() -> Arc<Self> {
        let (session, _) = watch::channel(Session::resolved(None));
        Arc::new(Self {
            provider: None,
            session,
            task: Mutex::new(None),
        })
    }

    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<Session> {
        self.session.subscribe()
    }

    #[must_use]
    pub fn current(&self) -> Session {
        self.session.borrow().clone()
    }

    #[must_use]
    pub fn provider(&self) -> Option<Arc<dyn IdentityProvider>> {
        self.provider.clone()
    }

    /// Sign out through the provider.
    ///
    /// # Errors
    ///
    /// Returns `IdentityError` if the provider cannot sign out.
    pub async fn logout(&self) -> Result<(), IdentityError> {
        match &self.provider {
            Some(provider) => provider.sign_out().await,
            None => Ok(()),
        }
    }
}

impl Drop for AuthSession {
    fn drop(&mut self) {
        if let Ok(mut guard) = self.task.lock() {
            if let Some(handle) = guard.take() {
                handle.abort();
            }
        }
    }
}

async fn follow_provider(provider: Arc<dyn IdentityProvider>, session: watch::Sender<Session>) {
    let mut states = provider.auth_state();
    loop {
        let state = states.borrow_and_update().clone();
        match state {
            AuthState::Pending => {}
            AuthState::SignedIn(identity) => publish(&session, Some(identity)),
            AuthState::SignedOut => {
                let identity = match provider.sign_in_anonymously().await {
                    Ok(identity) => Some(identity),
                    Err(err) => {
                        tracing::error!(error = %err, "anonymous sign-in failed");
                        None
                    }
                };
                publish(&session, identity);
            }
        }
        if states.changed().await.is_err() {
            break;
        }
    }
}

fn publish(session: &watch::Sender<Session>, identity: Option<UserIdentity>) {
    session.send_if_modified(|current| {
        let next = Session::resolved(identity);
        if *current == next {
            return false;
        }
        *current = next;
        true
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use sheguard_core::model::UserId;
    use std::time::Duration;

    struct ScriptedProvider {
        state: watch::Sender<AuthState>,
        anonymous_ok: bool,
    }

    impl ScriptedProvider {
        fn new(anonymous_ok: bool) -> Arc<Self> {
            let (state, _) = watch::channel(AuthState::Pending);
            Arc::new(Self { state, anonymous_ok })
        }
    }

    #[async_trait]
    impl IdentityProvider for ScriptedProvider {
        fn auth_state(&self) -> watch::Receiver<AuthState> {
            self.state.subscribe()
        }

        async fn sign_in_anonymously(&self) -> Result<UserIdentity, IdentityError> {
            if !self.anonymous_ok {
                return Err(IdentityError::Unavailable("offline".into()));
            }
            let identity = UserIdentity::anonymous(UserId::new("anon"));
            self.state.send_replace(AuthState::SignedIn(identity.clone()));
            Ok(identity)
        }

        async fn sign_in_with_email(&self, _: &str, _: &str) -> Result<UserIdentity, IdentityError> {
            Err(IdentityError::InvalidCredentials)
        }

        async fn create_account(&self, _: &str, _: &str) -> Result<UserIdentity, IdentityError> {
            Err(IdentityError::InvalidCredentials)
        }

        async fn sign_out(&self) -> Result<(), IdentityError> {
            self.state.send_replace(AuthState::SignedOut);
            Ok(())
        }
    }

    async fn wait_ready(rx: &mut watch::Receiver<Session>) -> Session {
        tokio::time::timeout(Duration::from_secs(1), rx.wait_for(|s| s.ready))
            .await
            .expect("session ready in time")
            .expect("sender alive")
            .clone()
    }

    #[tokio::test]
    async fn pending_provider_keeps_session_unready() {
        let provider = ScriptedProvider::new(true);
        let auth = AuthSession::start(provider.clone());
        tokio::task::yield_now().await;
        assert!(!auth.current().ready);
    }

    #[tokio::test]
    async fn signed_out_falls_back_to_anonymous() {
        let provider = ScriptedProvider::new(true);
        let auth = AuthSession::start(provider.clone());
        let mut rx = auth.subscribe();
        provider.state.send_replace(AuthState::SignedOut);
        let session = wait_ready(&mut rx).await;
        assert!(session.identity.as_ref().is_some_and(UserIdentity::is_anonymous));
    }

    #[tokio::test]
    async fn failed_anonymous_sign_in_still_becomes_ready() {
        let provider = ScriptedProvider::new(false);
        let auth = AuthSession::start(provider.clone());
        let mut rx = auth.subscribe();
        provider.state.send_replace(AuthState::SignedOut);
        let session = wait_ready(&mut rx).await;
        assert!(session.identity.is_none());
    }

    #[tokio::test]
    async fn disabled_session_is_ready_without_identity() {
        let auth = AuthSession::disabled();
        assert_eq!(auth.current(), Session::resolved(None));
        auth.logout().await.unwrap();
    }
}
