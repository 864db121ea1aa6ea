mod auth_form;
mod chrome;
mod contacts;
mod exit_prompt;
mod history;
mod home;
mod info;
mod loading;
mod login;
mod menu;
mod onboarding;
mod profile;
mod report;
mod settings;
mod state;

#[cfg(test)]
mod test_harness;
#[cfg(test)]
mod view_smoke;

pub use auth_form::AuthForm;
pub use chrome::ScreenHeader;
pub use contacts::ContactsView;
pub use exit_prompt::ExitPrompt;
pub use history::HistoryView;
pub use home::HomeView;
pub use info::InfoView;
pub use loading::LoadingView;
pub use login::LoginView;
pub use menu::SideMenu;
pub use onboarding::OnboardingView;
pub use profile::ProfileView;
pub use report::ReportView;
pub use settings::SettingsView;
pub use state::{LOAD_FAILED, LiveState, use_live_document};
