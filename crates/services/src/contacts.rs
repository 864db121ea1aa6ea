use std::sync::Arc;

use serde_json::Value;
use sheguard_core::model::{
    ContactId, ContactList, DocPath, EmergencyContact, EmergencyContactDraft, UserId,
};
use storage::document::{Document, DocumentSnapshot, WriteMode};
use storage::repository::DocumentStore;

use crate::error::ContactServiceError;
use crate::live::LiveDocument;

/// True when the contacts document exists and its `list` field is a
/// non-empty array.
#[must_use]
pub fn contacts_configured(snapshot: &DocumentSnapshot) -> bool {
    snapshot
        .field("list")
        .and_then(Value::as_array)
        .is_some_and(|list| !list.is_empty())
}

/// Reads and edits a user's emergency contact list.
#[derive(Clone)]
pub struct EmergencyContactService {
    documents: Arc<dyn DocumentStore>,
    app_id: String,
}

impl EmergencyContactService {
    #[must_use]
    pub fn new(documents: Arc<dyn DocumentStore>, app_id: impl Into<String>) -> Self {
        Self {
            documents,
            app_id: app_id.into(),
        }
    }

    fn path(&self, uid: &UserId) -> Result<DocPath, ContactServiceError> {
        Ok(DocPath::emergency_contacts(&self.app_id, uid)?)
    }

    /// Load the user's contacts; a missing document is an empty list.
    ///
    /// # Errors
    ///
    /// Returns `ContactServiceError` on storage failures or a malformed document.
    pub async fn list(&self, uid: &UserId) -> Result<ContactList, ContactServiceError> {
        let doc = self.documents.get_document(&self.path(uid)?).await?;
        decode_list(doc)
    }

    /// Append a contact. The list holds at most four entries.
    ///
    /// # Errors
    ///
    /// Returns `ContactServiceError::Contact` for invalid drafts or a full list.
    pub async fn add(
        &self,
        uid: &UserId,
        draft: EmergencyContactDraft,
    ) -> Result<EmergencyContact, ContactServiceError> {
        let mut list = self.list(uid).await?;
        let contact = draft.validate(ContactId::generate())?;
        list.push(contact.clone())?;
        self.write(uid, &list, WriteMode::Merge).await?;
        Ok(contact)
    }

    /// Remove a contact by id.
    ///
    /// # Errors
    ///
    /// Returns `ContactServiceError::Contact` if the id is unknown.
    pub async fn remove(
        &self,
        uid: &UserId,
        id: &ContactId,
    ) -> Result<EmergencyContact, ContactServiceError> {
        let mut list = self.list(uid).await?;
        let removed = list.remove(id)?;
        self.write(uid, &list, WriteMode::Replace).await?;
        Ok(removed)
    }

    /// Live view of the user's contact list.
    ///
    /// # Errors
    ///
    /// Returns `ContactServiceError` if the subscription cannot be opened.
    pub async fn subscribe(
        &self,
        uid: &UserId,
    ) -> Result<LiveDocument<ContactList, ContactServiceError>, ContactServiceError> {
        let subscription = self.documents.subscribe(&self.path(uid)?).await?;
        Ok(LiveDocument::new(subscription, decode_list))
    }

    async fn write(
        &self,
        uid: &UserId,
        list: &ContactList,
        mode: WriteMode,
    ) -> Result<(), ContactServiceError> {
        let Value::Object(doc) = serde_json::to_value(list)
            .map_err(|err| ContactServiceError::Malformed(err.to_string()))?
        else {
            return Err(ContactServiceError::Malformed("contact list is not an object".into()));
        };
        self.documents.set_document(&self.path(uid)?, doc, mode).await?;
        Ok(())
    }
}

/// Decode a contacts document (or its absence) into a list.
///
/// # Errors
///
/// Returns `ContactServiceError::Malformed` if `list` has the wrong shape.
pub fn decode_list(doc: Option<Document>) -> Result<ContactList, ContactServiceError> {
    match doc {
        None => Ok(ContactList::new()),
        Some(doc) => serde_json::from_value(Value::Object(doc))
            .map_err(|err| ContactServiceError::Malformed(err.to_string())),
    }
}
