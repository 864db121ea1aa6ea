use serde_json::Value;
use sheguard_core::model::DocPath;

/// A stored document: a JSON object keyed by field name.
pub type Document = serde_json::Map<String, Value>;

/// How a write combines with an existing document.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WriteMode {
    /// Overwrite the whole document.
    Replace,
    /// Merge fields into the existing document; nested objects merge recursively.
    Merge,
}

/// State of one document as delivered to subscribers.
#[derive(Clone, Debug, PartialEq)]
pub struct DocumentSnapshot {
    pub path: DocPath,
    pub data: Option<Document>,
}

impl DocumentSnapshot {
    #[must_use]
    pub fn exists(&self) -> bool {
        self.data.is_some()
    }

    #[must_use]
    pub fn field(&self, name: &str) -> Option<&Value> {
        self.data.as_ref().and_then(|data| data.get(name))
    }
}

/// Merge `patch` into `target`. Objects present on both sides merge field by
/// field; any other value in `patch` replaces the target's value.
pub fn merge_document(target: &mut Document, patch: Document) {
    for (key, value) in patch {
        if let Value::Object(incoming) = value {
            if let Some(Value::Object(existing)) = target.get_mut(&key) {
                merge_document(existing, incoming);
                continue;
            }
            target.insert(key, Value::Object(incoming));
        } else {
            target.insert(key, value);
        }
    }
}

/// Apply a write to the current document and return the result.
#[must_use]
pub fn apply_write(current: Option<Document>, data: Document, mode: WriteMode) -> Document {
    match (mode, current) {
        (WriteMode::Merge, Some(mut existing)) => {
            merge_document(&mut existing, data);
            existing
        }
        _ => data,
    }
}
