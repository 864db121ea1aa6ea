use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::ContactId;

/// Upper bound on stored emergency contacts per user.
pub const MAX_EMERGENCY_CONTACTS: usize = 4;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmergencyContact {
    pub id: ContactId,
    pub name: String,
    pub phone: String,
}

#[derive(Clone, Debug, Default)]
pub struct EmergencyContactDraft {
    pub name: String,
    pub phone: String,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ContactError {
    #[error("contact name is required")]
    MissingName,
    #[error("contact phone is required")]
    MissingPhone,
    #[error("at most {MAX_EMERGENCY_CONTACTS} emergency contacts can be saved")]
    LimitReached,
    #[error("contact not found")]
    NotFound,
    #[error("a contact with this id already exists")]
    DuplicateId,
}

impl EmergencyContactDraft {
    #[must_use]
    pub fn new(name: impl Into<String>, phone: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            phone: phone.into(),
        }
    }

    /// Validate the draft and attach the given id.
    ///
    /// # Errors
    ///
    /// Returns `ContactError` when name or phone is blank.
    pub fn validate(self, id: ContactId) -> Result<EmergencyContact, ContactError> {
        let name = self.name.trim().to_string();
        let phone = self.phone.trim().to_string();
        if name.is_empty() {
            return Err(ContactError::MissingName);
        }
        if phone.is_empty() {
            return Err(ContactError::MissingPhone);
        }
        Ok(EmergencyContact { id, name, phone })
    }
}

/// A user's emergency contacts, capped at `MAX_EMERGENCY_CONTACTS`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactList {
    #[serde(default)]
    list: Vec<EmergencyContact>,
}

impl ContactList {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild from persisted entries. Entries beyond the cap are kept so that a
    /// store written by another client is still readable.
    #[must_use]
    pub fn from_persisted(list: Vec<EmergencyContact>) -> Self {
        Self { list }
    }

    #[must_use]
    pub fn contacts(&self) -> &[EmergencyContact] {
        &self.list
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.list.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.list.is_empty()
    }

    #[must_use]
    pub fn is_full(&self) -> bool {
        self.list.len() >= MAX_EMERGENCY_CONTACTS
    }

    /// # Errors
    ///
    /// Returns `ContactError::LimitReached` when the list is full and
    /// `ContactError::DuplicateId` when the id is already present.
    pub fn push(&mut self, contact: EmergencyContact) -> Result<(), ContactError> {
        if self.is_full() {
            return Err(ContactError::LimitReached);
        }
        if self.list.iter().any(|c| c.id == contact.id) {
            return Err(ContactError::DuplicateId);
        }
        self.list.push(contact);
        Ok(())
    }

    /// # Errors
    ///
    /// Returns `ContactError::NotFound` if no contact has the given id.
    pub fn remove(&mut self, id: &ContactId) -> Result<EmergencyContact, ContactError> {
        let idx = self
            .list
            .iter()
            .position(|c| &c.id == id)
            .ok_or(ContactError::NotFound)?;
        Ok(self.list.remove(idx))
    }

    #[must_use]
    pub fn phone_numbers(&self) -> Vec<String> {
        self.list.iter().map(|c| c.phone.clone()).collect()
    }
}
