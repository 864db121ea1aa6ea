use dioxus::prelude::*;
use sheguard_core::nav::Screen;

use crate::views::ScreenHeader;

fn blurb(screen: Screen) -> &'static str {
    match screen {
        Screen::Helpline => "Women helpline: 1091. Police: 112. Ambulance: 108.",
        Screen::GeminiHelp => "Chat with an assistant about your situation, any time.",
        Screen::Resources => "Articles, safety tips and legal information.",
        Screen::LiveShare => "Share your live location with your emergency contacts.",
        Screen::LiveCam => "Record your surroundings while sharing your location.",
        Screen::VoiceReport => "Record a voice message describing an incident.",
        Screen::Instructions => {
            "Add up to four emergency contacts, keep location and internet on, and press SOS in an emergency."
        }
        Screen::PrivacyPolicy => {
            "Your location and contacts are only used when you trigger an SOS alert."
        }
        Screen::AboutUs => "SheGuard+ is a personal safety companion.",
        Screen::Home
        | Screen::History
        | Screen::Report
        | Screen::Contacts
        | Screen::Settings
        | Screen::Profile
        | Screen::Login => "",
    }
}

/// Informational page for feature screens without their own view.
#[component]
pub fn InfoView(screen: Screen) -> Element {
    let text = blurb(screen);
    rsx! {
        div { class: "page",
            ScreenHeader { title: screen.title() }
            p { class: "info-text", "{text}" }
        }
    }
}
