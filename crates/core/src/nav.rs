//! In-memory, stack-less screen navigation.
//!
//! Back navigation is one level deep: every screen goes back to `Home`. There
//! is no history stack.

use serde::{Deserialize, Serialize};

/// Every screen the shell can show.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Screen {
    #[default]
    Home,
    History,
    Contacts,
    Report,
    Helpline,
    GeminiHelp,
    Resources,
    Settings,
    LiveShare,
    LiveCam,
    VoiceReport,
    Instructions,
    Profile,
    PrivacyPolicy,
    AboutUs,
    Login,
}

impl Screen {
    pub const ALL: [Screen; 16] = [
        Screen::Home,
        Screen::History,
        Screen::Contacts,
        Screen::Report,
        Screen::Helpline,
        Screen::GeminiHelp,
        Screen::Resources,
        Screen::Settings,
        Screen::LiveShare,
        Screen::LiveCam,
        Screen::VoiceReport,
        Screen::Instructions,
        Screen::Profile,
        Screen::PrivacyPolicy,
        Screen::AboutUs,
        Screen::Login,
    ];

    #[must_use]
    pub fn title(self) -> &'static str {
        match self {
            Screen::Home => "SheGuard+",
            Screen::History => "SOS History",
            Screen::Contacts => "Emergency Contacts",
            Screen::Report => "Report Incident",
            Screen::Helpline => "Helplines",
            Screen::GeminiHelp => "AI Help",
            Screen::Resources => "Resources",
            Screen::Settings => "Settings",
            Screen::LiveShare => "Live Location",
            Screen::LiveCam => "Live Camera",
            Screen::VoiceReport => "Voice Report",
            Screen::Instructions => "Instructions",
            Screen::Profile => "Profile",
            Screen::PrivacyPolicy => "Privacy Policy",
            Screen::AboutUs => "About Us",
            Screen::Login => "Login",
        }
    }

    #[must_use]
    pub fn is_home(self) -> bool {
        matches!(self, Screen::Home)
    }
}

/// Current screen plus side-menu visibility.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct NavigationState {
    current: Screen,
    menu_open: bool,
}

impl NavigationState {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn current(&self) -> Screen {
        self.current
    }

    #[must_use]
    pub fn menu_open(&self) -> bool {
        self.menu_open
    }

    /// Show `screen` and close the menu.
    pub fn navigate_to(&mut self, screen: Screen) {
        self.menu_open = false;
        self.current = screen;
    }

    /// Return to `Home`. The menu is left as is.
    pub fn go_back(&mut self) {
        self.current = Screen::Home;
    }

    pub fn toggle_menu(&mut self) {
        self.menu_open = !self.menu_open;
    }

    pub fn close_menu(&mut self) {
        self.menu_open = false;
    }
}
