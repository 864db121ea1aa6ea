use serde::{Deserialize, Serialize};

/// Flag-store key remembering that onboarding finished.
pub const ONBOARDING_FLAG_KEY: &str = "hasOnboarded";

/// Lifecycle of the onboarding gate.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum OnboardingStatus {
    /// The persisted flag has not been read yet.
    #[default]
    Checking,
    NotCompleted,
    /// Terminal.
    Completed,
}

impl OnboardingStatus {
    #[must_use]
    pub fn is_completed(self) -> bool {
        matches!(self, Self::Completed)
    }

    /// Apply a new status, refusing to leave `Completed`.
    #[must_use]
    pub fn advance(self, next: Self) -> Self {
        if self.is_completed() { self } else { next }
    }

    #[must_use]
    pub fn state(self) -> OnboardingState {
        OnboardingState {
            completed: self.is_completed(),
            checked: !matches!(self, Self::Checking),
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct OnboardingState {
    pub completed: bool,
    pub checked: bool,
}
