//! Back-action handling and render selection for the application shell.

use crate::model::{OnboardingState, OnboardingStatus};
use crate::nav::{NavigationState, Screen};

/// What the shell should render.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ShellView {
    Loading,
    Onboarding,
    Main(Screen),
}

/// Result of one back event. Every back event is consumed by the shell.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BackOutcome {
    /// Nothing changed.
    Swallowed,
    MenuClosed,
    WentHome,
    ExitPromptShown,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ExitChoice {
    Cancel,
    Confirm,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ExitDecision {
    Stay,
    /// The caller must terminate the process.
    Exit,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ShellState {
    onboarding: OnboardingStatus,
    nav: NavigationState,
    exit_prompt_open: bool,
}

impl ShellState {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn onboarding(&self) -> OnboardingState {
        self.onboarding.state()
    }

    #[must_use]
    pub fn onboarding_status(&self) -> OnboardingStatus {
        self.onboarding
    }

    pub fn set_onboarding(&mut self, status: OnboardingStatus) {
        self.onboarding = self.onboarding.advance(status);
    }

    /// Navigation is only observable once onboarding has completed.
    #[must_use]
    pub fn navigation(&self) -> Option<&NavigationState> {
        self.onboarding.is_completed().then_some(&self.nav)
    }

    #[must_use]
    pub fn exit_prompt_open(&self) -> bool {
        self.exit_prompt_open
    }

    #[must_use]
    pub fn menu_open(&self) -> bool {
        self.navigation().is_some_and(NavigationState::menu_open)
    }

    #[must_use]
    pub fn view(&self) -> ShellView {
        match self.onboarding {
            OnboardingStatus::Checking => ShellView::Loading,
            OnboardingStatus::NotCompleted => ShellView::Onboarding,
            OnboardingStatus::Completed => ShellView::Main(self.nav.current()),
        }
    }

    pub fn navigate_to(&mut self, screen: Screen) {
        if self.onboarding.is_completed() {
            self.nav.navigate_to(screen);
        }
    }

    pub fn go_back(&mut self) {
        if self.onboarding.is_completed() {
            self.nav.go_back();
        }
    }

    pub fn toggle_menu(&mut self) {
        if self.onboarding.is_completed() {
            self.nav.toggle_menu();
        }
    }

    pub fn close_menu(&mut self) {
        self.nav.close_menu();
    }

    /// After sign-out the menu closes and the shell returns home.
    pub fn on_logout(&mut self) {
        self.nav.close_menu();
        self.nav.go_back();
    }

    /// Handle a system back action. Rules are checked in order and exactly one
    /// applies per event.
    pub fn handle_back(&mut self) -> BackOutcome {
        if !self.onboarding.is_completed() || self.exit_prompt_open {
            return BackOutcome::Swallowed;
        }
        if self.nav.menu_open() {
            self.nav.close_menu();
            return BackOutcome::MenuClosed;
        }
        if !self.nav.current().is_home() {
            self.nav.go_back();
            return BackOutcome::WentHome;
        }
        self.exit_prompt_open = true;
        BackOutcome::ExitPromptShown
    }

    pub fn resolve_exit_prompt(&mut self, choice: ExitChoice) -> ExitDecision {
        if !self.exit_prompt_open {
            return ExitDecision::Stay;
        }
        self.exit_prompt_open = false;
        match choice {
            ExitChoice::Cancel => ExitDecision::Stay,
            ExitChoice::Confirm => ExitDecision::Exit,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn completed() -> ShellState {
        let mut shell = ShellState::new();
        shell.set_onboarding(OnboardingStatus::Completed);
        shell
    }

    #[test]
    fn back_is_swallowed_until_onboarding_completes() {
        for status in [OnboardingStatus::Checking, OnboardingStatus::NotCompleted] {
            let mut shell = ShellState::new();
            shell.set_onboarding(status);
            let before = shell;
            for _ in 0..5 {
                assert_eq!(shell.handle_back(), BackOutcome::Swallowed);
            }
            assert_eq!(shell, before);
            assert!(!shell.exit_prompt_open());
            assert!(shell.navigation().is_none());
        }
    }

    #[test]
    fn navigation_requests_are_ignored_before_onboarding() {
        let mut shell = ShellState::new();
        shell.set_onboarding(OnboardingStatus::NotCompleted);
        shell.navigate_to(Screen::Settings);
        shell.toggle_menu();
        assert_eq!(shell.view(), ShellView::Onboarding);
        shell.set_onboarding(OnboardingStatus::Completed);
        assert_eq!(shell.view(), ShellView::Main(Screen::Home));
        assert!(!shell.menu_open());
    }

    #[test]
    fn back_with_open_menu_only_closes_menu() {
        let mut shell = completed();
        shell.navigate_to(Screen::Contacts);
        shell.toggle_menu();
        assert_eq!(shell.handle_back(), BackOutcome::MenuClosed);
        assert_eq!(shell.view(), ShellView::Main(Screen::Contacts));
        assert!(!shell.menu_open());
        assert!(!shell.exit_prompt_open());
    }

    #[test]
    fn back_on_home_with_menu_open_does_not_prompt() {
        let mut shell = completed();
        shell.toggle_menu();
        assert_eq!(shell.handle_back(), BackOutcome::MenuClosed);
        assert!(!shell.exit_prompt_open());
    }

    #[test]
    fn back_from_detail_screen_goes_home() {
        let mut shell = completed();
        shell.navigate_to(Screen::History);
        assert_eq!(shell.handle_back(), BackOutcome::WentHome);
        assert_eq!(shell.view(), ShellView::Main(Screen::Home));
        assert!(!shell.exit_prompt_open());
    }

    #[test]
    fn back_on_home_prompts_and_cancel_keeps_state() {
        let mut shell = completed();
        assert_eq!(shell.handle_back(), BackOutcome::ExitPromptShown);
        assert!(shell.exit_prompt_open());
        assert_eq!(shell.handle_back(), BackOutcome::Swallowed);

        assert_eq!(shell.resolve_exit_prompt(ExitChoice::Cancel), ExitDecision::Stay);
        assert!(!shell.exit_prompt_open());
        assert_eq!(shell.view(), ShellView::Main(Screen::Home));
    }

    #[test]
    fn confirm_requests_exit() {
        let mut shell = completed();
        shell.handle_back();
        assert_eq!(shell.resolve_exit_prompt(ExitChoice::Confirm), ExitDecision::Exit);
        assert_eq!(shell.resolve_exit_prompt(ExitChoice::Confirm), ExitDecision::Stay);
    }

    #[test]
    fn logout_closes_menu_and_returns_home() {
        let mut shell = completed();
        shell.navigate_to(Screen::Profile);
        shell.toggle_menu();
        shell.on_logout();
        assert_eq!(shell.view(), ShellView::Main(Screen::Home));
        assert!(!shell.menu_open());
    }

    #[test]
    fn completed_onboarding_never_reverts() {
        let mut shell = completed();
        shell.set_onboarding(OnboardingStatus::NotCompleted);
        assert!(shell.onboarding().completed);
    }
}
