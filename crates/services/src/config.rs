use std::time::Duration;

/// Application id used when none is configured.
pub const DEFAULT_APP_ID: &str = "default-sheguard-app";

/// Interval between location permission/service polls.
pub const LOCATION_POLL_INTERVAL: Duration = Duration::from_secs(3);

/// Settings shared by the shell services.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ShellConfig {
    /// Namespaces per-user documents (`artifacts/{app_id}/users/...`).
    pub app_id: String,
    pub location_poll_interval: Duration,
}

impl ShellConfig {
    #[must_use]
    pub fn new(app_id: impl Into<String>) -> Self {
        Self {
            app_id: app_id.into(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_location_poll_interval(mut self, interval: Duration) -> Self {
        self.location_poll_interval = interval;
        self
    }
}

impl Default for ShellConfig {
    fn default() -> Self {
        Self {
            app_id: DEFAULT_APP_ID.to_string(),
            location_poll_interval: LOCATION_POLL_INTERVAL,
        }
    }
}
