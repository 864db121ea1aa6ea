use sheguard_core::model::Session;
use sheguard_core::nav::Screen;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MenuAction {
    Navigate(Screen),
    Logout,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MenuEntryVm {
    pub label: &'static str,
    pub action: MenuAction,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MenuVm {
    /// Shown only for registered users.
    pub email: Option<String>,
    pub entries: Vec<MenuEntryVm>,
}

#[must_use]
pub fn map_menu(session: &Session) -> MenuVm {
    let registered = session.registered_identity();
    let mut entries = vec![
        MenuEntryVm {
            label: "SOS History",
            action: MenuAction::Navigate(Screen::History),
        },
        MenuEntryVm {
            label: "Emergency Contacts",
            action: MenuAction::Navigate(Screen::Contacts),
        },
        MenuEntryVm {
            label: "Instructions",
            action: MenuAction::Navigate(Screen::Instructions),
        },
        MenuEntryVm {
            label: "Profile",
            action: MenuAction::Navigate(Screen::Profile),
        },
    ];
    entries.push(if registered.is_some() {
        MenuEntryVm {
            label: "Logout",
            action: MenuAction::Logout,
        }
    } else {
        MenuEntryVm {
            label: "Login / Sign Up",
            action: MenuAction::Navigate(Screen::Login),
        }
    });

    MenuVm {
        email: registered.and_then(|id| id.email()).map(str::to_owned),
        entries,
    }
}
