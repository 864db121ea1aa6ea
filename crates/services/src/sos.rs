//! SOS message settings, alert preparation and triggering.

use std::sync::Arc;

use serde_json::{Map, Value};
use sheguard_core::model::{DocPath, Session, SosSettings, SosSettingsDraft, UserId};
use storage::document::WriteMode;
use storage::repository::DocumentStore;

use crate::contacts::EmergencyContactService;
use crate::error::{ContactServiceError, SosSettingsServiceError};
use crate::sos_history::SosHistoryService;

#[derive(Clone)]
pub struct SosSettingsService {
    documents: Arc<dyn DocumentStore>,
    app_id: String,
}

impl SosSettingsService {
    #[must_use]
    pub fn new(documents: Arc<dyn DocumentStore>, app_id: impl Into<String>) -> Self {
        Self {
            documents,
            app_id: app_id.into(),
        }
    }

    /// The saved SOS message, or the default one. Read failures fall back to
    /// the default.
    pub async fn load(&self, uid: &UserId) -> SosSettings {
        let path = match DocPath::sos_settings(&self.app_id, uid) {
            Ok(path) => path,
            Err(err) => {
                tracing::warn!(error = %err, "invalid sos settings path");
                return SosSettings::default();
            }
        };
        match self.documents.get_document(&path).await {
            Ok(doc) => SosSettings::from_persisted(
                doc.and_then(|d| d.get("message").and_then(Value::as_str).map(str::to_owned)),
            ),
            Err(err) => {
                tracing::warn!(error = %err, %path, "failed to load sos settings");
                SosSettings::default()
            }
        }
    }

    /// Validate and store a new message.
    ///
    /// # Errors
    ///
    /// Returns `SosSettingsServiceError::Validation` for a blank message or a
    /// storage error if the write fails.
    pub async fn save(
        &self,
        uid: &UserId,
        draft: SosSettingsDraft,
    ) -> Result<SosSettings, SosSettingsServiceError> {
        let settings = draft.validate()?;
        let path = DocPath::sos_settings(&self.app_id, uid)?;
        let mut doc = Map::new();
        doc.insert("message".into(), Value::String(settings.message().to_owned()));
        self.documents
            .set_document(&path, doc, WriteMode::Replace)
            .await?;
        Ok(settings)
    }
}

/// Message and recipients for an SOS alert.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SosAlert {
    pub body: String,
    pub recipients: Vec<String>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SosPreparation {
    /// No registered user; the shell sends the user to the login screen.
    LoginRequired,
    NoContacts,
    Ready(SosAlert),
}

#[derive(Clone)]
pub struct SosService {
    contacts: EmergencyContactService,
    settings: SosSettingsService,
    history: SosHistoryService,
}

impl SosService {
    #[must_use]
    pub fn new(
        contacts: EmergencyContactService,
        settings: SosSettingsService,
        history: SosHistoryService,
    ) -> Self {
        Self {
            contacts,
            settings,
            history,
        }
    }

    /// Decide what the SOS button should do for `session`.
    ///
    /// # Errors
    ///
    /// Returns `ContactServiceError` if the contact list cannot be read.
    pub async fn prepare(&self, session: &Session) -> Result<SosPreparation, ContactServiceError> {
        let Some(identity) = session.registered_identity() else {
            return Ok(SosPreparation::LoginRequired);
        };
        let contacts = self.contacts.list(identity.uid()).await?;
        if contacts.is_empty() {
            return Ok(SosPreparation::NoContacts);
        }
        let settings = self.settings.load(identity.uid()).await;
        tracing::info!(recipients = contacts.len(), "sos alert prepared");
        Ok(SosPreparation::Ready(SosAlert {
            body: settings.message().to_owned(),
            recipients: contacts.phone_numbers(),
        }))
    }

    /// Handle an SOS press: prepare the alert and, when it is ready, log it in
    /// the user's history. A failed history write does not hold the alert back.
    ///
    /// # Errors
    ///
    /// Returns `ContactServiceError` if the contact list cannot be read.
    pub async fn trigger(&self, session: &Session) -> Result<SosPreparation, ContactServiceError> {
        let preparation = self.prepare(session).await?;
        if let (SosPreparation::Ready(alert), Some(identity)) =
            (&preparation, session.registered_identity())
        {
            if let Err(err) = self.history.record(identity.uid(), alert).await {
                tracing::warn!(error = %err, "failed to record sos history");
            }
        }
        Ok(preparation)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sheguard_core::model::{DEFAULT_SOS_MESSAGE, EmergencyContactDraft, UserIdentity};
    use sheguard_core::time::fixed_clock;
    use storage::repository::InMemoryRepository;

    fn services(repo: &InMemoryRepository) -> (EmergencyContactService, SosService) {
        let documents: Arc<dyn DocumentStore> = Arc::new(repo.clone());
        let contacts = EmergencyContactService::new(Arc::clone(&documents), "app");
        let settings = SosSettingsService::new(Arc::clone(&documents), "app");
        let history = SosHistoryService::new(fixed_clock(), documents, "app");
        (contacts.clone(), SosService::new(contacts, settings, history))
    }

    fn history(repo: &InMemoryRepository) -> SosHistoryService {
        SosHistoryService::new(fixed_clock(), Arc::new(repo.clone()), "app")
    }

    #[tokio::test]
    async fn load_defaults_until_saved() {
        let repo = InMemoryRepository::new();
        let settings = SosSettingsService::new(Arc::new(repo), "app");
        let uid = UserId::new("u1");
        assert_eq!(settings.load(&uid).await.message(), DEFAULT_SOS_MESSAGE);

        settings
            .save(&uid, SosSettingsDraft::new("  Call me now  "))
            .await
            .unwrap();
        assert_eq!(settings.load(&uid).await.message(), "Call me now");
    }

    #[tokio::test]
    async fn blank_message_is_rejected() {
        let settings = SosSettingsService::new(Arc::new(InMemoryRepository::new()), "app");
        let err = settings
            .save(&UserId::new("u1"), SosSettingsDraft::new("   "))
            .await
            .unwrap_err();
        assert!(matches!(err, SosSettingsServiceError::Validation(_)));
    }

    #[tokio::test]
    async fn anonymous_or_missing_users_must_log_in() {
        let repo = InMemoryRepository::new();
        let (_, sos) = services(&repo);
        assert_eq!(
            sos.prepare(&Session::resolved(None)).await.unwrap(),
            SosPreparation::LoginRequired
        );
        let anonymous = Session::resolved(Some(UserIdentity::anonymous(UserId::new("a1"))));
        assert_eq!(
            sos.prepare(&anonymous).await.unwrap(),
            SosPreparation::LoginRequired
        );
    }

    #[tokio::test]
    async fn registered_user_gets_alert_for_contacts() {
        let repo = InMemoryRepository::new();
        let (contacts, sos) = services(&repo);
        let uid = UserId::new("u1");
        let session = Session::resolved(Some(UserIdentity::registered(uid.clone(), "a@b.c")));

        assert_eq!(sos.prepare(&session).await.unwrap(), SosPreparation::NoContacts);

        contacts
            .add(&uid, EmergencyContactDraft::new("Mom", "+100"))
            .await
            .unwrap();
        let SosPreparation::Ready(alert) = sos.prepare(&session).await.unwrap() else {
            panic!("expected a ready alert");
        };
        assert_eq!(alert.body, DEFAULT_SOS_MESSAGE);
        assert_eq!(alert.recipients, vec!["+100".to_string()]);
    }

    #[tokio::test]
    async fn trigger_records_only_ready_alerts() {
        let repo = InMemoryRepository::new();
        let (contacts, sos) = services(&repo);
        let uid = UserId::new("u1");
        let session = Session::resolved(Some(UserIdentity::registered(uid.clone(), "a@b.c")));

        assert_eq!(sos.trigger(&session).await.unwrap(), SosPreparation::NoContacts);
        assert!(history(&repo).list(&uid).await.unwrap().is_empty());

        contacts
            .add(&uid, EmergencyContactDraft::new("Mom", "+100"))
            .await
            .unwrap();
        assert!(matches!(
            sos.trigger(&session).await.unwrap(),
            SosPreparation::Ready(_)
        ));
        let logged = history(&repo).list(&uid).await.unwrap();
        assert_eq!(logged.len(), 1);
        assert_eq!(logged.entries()[0].message, DEFAULT_SOS_MESSAGE);
        assert_eq!(logged.entries()[0].recipients, 1);
    }

    #[tokio::test]
    async fn prepare_alone_records_nothing() {
        let repo = InMemoryRepository::new();
        let (contacts, sos) = services(&repo);
        let uid = UserId::new("u1");
        contacts
            .add(&uid, EmergencyContactDraft::new("Mom", "+100"))
            .await
            .unwrap();
        let session = Session::resolved(Some(UserIdentity::registered(uid.clone(), "a@b.c")));
        sos.prepare(&session).await.unwrap();
        assert!(history(&repo).list(&uid).await.unwrap().is_empty());
    }
}
