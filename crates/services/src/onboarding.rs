//! First-run gate backed by a persisted flag.

use std::sync::Arc;

use sheguard_core::model::{ONBOARDING_FLAG_KEY, OnboardingStatus};
use storage::repository::FlagStore;
use tokio::sync::watch;

pub struct OnboardingGate {
    flags: Arc<dyn FlagStore>,
    status: watch::Sender<OnboardingStatus>,
}

impl OnboardingGate {
    #[must_use]
    pub fn new(flags: Arc<dyn FlagStore>) -> Self {
        let (status, _) = watch::channel(OnboardingStatus::Checking);
        Self { flags, status }
    }

    #[must_use]
    pub fn status(&self) -> OnboardingStatus {
        *self.status.borrow()
    }

    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<OnboardingStatus> {
        self.status.subscribe()
    }

    /// Read the persisted flag. Any stored value counts as completed; a read
    /// failure is treated as not completed.
    pub async fn check(&self) -> OnboardingStatus {
        let next = match self.flags.get_flag(ONBOARDING_FLAG_KEY).await {
            Ok(Some(_)) => OnboardingStatus::Completed,
            Ok(None) => OnboardingStatus::NotCompleted,
            Err(err) => {
                tracing::warn!(error = %err, "onboarding flag unreadable; showing onboarding");
                OnboardingStatus::NotCompleted
            }
        };
        self.apply(next)
    }

    /// Finish onboarding. The flag write is best-effort.
    pub async fn complete(&self) -> OnboardingStatus {
        if let Err(err) = self.flags.set_flag(ONBOARDING_FLAG_KEY, "true").await {
            tracing::error!(error = %err, "failed to persist onboarding flag");
        }
        tracing::info!("onboarding completed");
        self.apply(OnboardingStatus::Completed)
    }

    fn apply(&self, next: OnboardingStatus) -> OnboardingStatus {
        self.status.send_if_modified(|current| {
            let advanced = current.advance(next);
            let changed = advanced != *current;
            *current = advanced;
            changed
        });
        self.status()
    }
}
