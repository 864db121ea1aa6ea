use services::SosPreparation;
use sheguard_core::model::ReadinessSnapshot;
use sheguard_core::nav::Screen;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct StatusTileVm {
    pub label: &'static str,
    pub enabled: bool,
    /// Where tapping the tile leads, if anywhere.
    pub target: Option<Screen>,
}

#[must_use]
pub fn map_status_tiles(snapshot: &ReadinessSnapshot) -> [StatusTileVm; 3] {
    [
        StatusTileVm {
            label: if snapshot.location_enabled {
                "Location ON"
            } else {
                "Location OFF"
            },
            enabled: snapshot.location_enabled,
            target: None,
        },
        StatusTileVm {
            label: if snapshot.network_online {
                "Online"
            } else {
                "Offline"
            },
            enabled: snapshot.network_online,
            target: None,
        },
        StatusTileVm {
            label: if snapshot.contacts_configured {
                "View Contacts"
            } else {
                "Add Contacts"
            },
            enabled: snapshot.contacts_configured,
            target: Some(Screen::Contacts),
        },
    ]
}

/// Message shown after the SOS button was pressed.
#[must_use]
pub fn sos_notice(preparation: &SosPreparation) -> Option<String> {
    match preparation {
        SosPreparation::LoginRequired => None,
        SosPreparation::NoContacts => {
            Some("Add at least one emergency contact before sending an SOS.".to_string())
        }
        SosPreparation::Ready(alert) => Some(format!(
            "SOS ready for {} contact(s): {}",
            alert.recipients.len(),
            alert.body
        )),
    }
}
