use crate::document::Document;
use crate::repository::StorageError;

fn ser<E: core::fmt::Display>(e: E) -> StorageError {
    StorageError::Serialization(e.to_string())
}

pub(crate) fn conn<E: core::fmt::Display>(e: E) -> StorageError {
    StorageError::Connection(e.to_string())
}

pub(crate) fn document_to_text(doc: &Document) -> Result<String, StorageError> {
    serde_json::to_string(doc).map_err(ser)
}

pub(crate) fn document_from_text(raw: &str) -> Result<Document, StorageError> {
    match serde_json::from_str::<serde_json::Value>(raw).map_err(ser)? {
        serde_json::Value::Object(map) => Ok(map),
        other => Err(StorageError::Serialization(format!(
            "stored document is not an object: {other}"
        ))),
    }
}
