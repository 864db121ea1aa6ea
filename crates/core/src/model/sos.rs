use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Message sent to contacts when no custom message has been saved.
pub const DEFAULT_SOS_MESSAGE: &str =
    "I'm in some kind of Danger !!! Please help me. My Location is ";

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SosSettings {
    message: String,
}

#[derive(Clone, Debug, Default)]
pub struct SosSettingsDraft {
    pub message: String,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum SosSettingsError {
    #[error("SOS message cannot be empty")]
    EmptyMessage,
}

impl SosSettingsDraft {
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    /// # Errors
    ///
    /// Returns `SosSettingsError::EmptyMessage` for blank messages.
    pub fn validate(self) -> Result<SosSettings, SosSettingsError> {
        let message = self.message.trim().to_string();
        if message.is_empty() {
            return Err(SosSettingsError::EmptyMessage);
        }
        Ok(SosSettings { message })
    }
}

impl SosSettings {
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Build from a stored message, falling back to the default for blank values.
    #[must_use]
    pub fn from_persisted(message: Option<String>) -> Self {
        message
            .map(SosSettingsDraft::new)
            .and_then(|draft| draft.validate().ok())
            .unwrap_or_default()
    }
}

impl Default for SosSettings {
    fn default() -> Self {
        Self {
            message: DEFAULT_SOS_MESSAGE.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_persisted_message_falls_back_to_default() {
        assert_eq!(SosSettings::from_persisted(None).message(), DEFAULT_SOS_MESSAGE);
        assert_eq!(
            SosSettings::from_persisted(Some("  ".into())).message(),
            DEFAULT_SOS_MESSAGE
        );
        assert_eq!(
            SosSettings::from_persisted(Some(" help ".into())).message(),
            "help"
        );
    }

    #[test]
    fn draft_rejects_empty_message() {
        assert_eq!(
            SosSettingsDraft::new("\n").validate(),
            Err(SosSettingsError::EmptyMessage)
        );
    }
}
