use serde::{Deserialize, Serialize};

/// Combined readiness of the three device/user signals shown on the home screen.
///
/// Each field is written independently by its own feed; there is no atomicity
/// across fields.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReadinessSnapshot {
    pub location_enabled: bool,
    pub network_online: bool,
    pub contacts_configured: bool,
}

impl ReadinessSnapshot {
    #[must_use]
    pub fn all_ready(&self) -> bool {
        self.location_enabled && self.network_online && self.contacts_configured
    }
}

/// One event from a connectivity feed.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ConnectivityEvent {
    /// A network interface is up.
    pub is_connected: bool,
    /// `None` while reachability is still unknown.
    pub is_internet_reachable: Option<bool>,
}

impl ConnectivityEvent {
    #[must_use]
    pub fn online() -> Self {
        Self {
            is_connected: true,
            is_internet_reachable: Some(true),
        }
    }

    #[must_use]
    pub fn offline() -> Self {
        Self {
            is_connected: false,
            is_internet_reachable: Some(false),
        }
    }

    /// Online only when both flags are true in this same event.
    #[must_use]
    pub fn is_online(&self) -> bool {
        self.is_connected && self.is_internet_reachable == Some(true)
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum LocationPermission {
    Granted,
    Denied,
    #[default]
    Undetermined,
}

impl LocationPermission {
    #[must_use]
    pub fn is_granted(self) -> bool {
        matches!(self, Self::Granted)
    }
}

/// Location counts as enabled only when permission is granted and the service is on.
#[must_use]
pub fn location_enabled(permission: LocationPermission, service_enabled: bool) -> bool {
    permission.is_granted() && service_enabled
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn interface_up_without_internet_is_offline() {
        let event = ConnectivityEvent {
            is_connected: true,
            is_internet_reachable: Some(false),
        };
        assert!(!event.is_online());
    }

    #[test]
    fn unknown_reachability_is_offline() {
        let event = ConnectivityEvent {
            is_connected: true,
            is_internet_reachable: None,
        };
        assert!(!event.is_online());
        assert!(ConnectivityEvent::online().is_online());
    }

    #[test]
    fn location_requires_permission_and_service() {
        assert!(location_enabled(LocationPermission::Granted, true));
        assert!(!location_enabled(LocationPermission::Granted, false));
        assert!(!location_enabled(LocationPermission::Denied, true));
        assert!(!location_enabled(LocationPermission::Undetermined, true));
    }
}
