#![forbid(unsafe_code)]

pub mod document;
pub mod repository;
pub mod sqlite;
pub mod subscription;

pub use document::{Document, DocumentSnapshot, WriteMode, merge_document};
pub use repository::{DocumentStore, FlagStore, InMemoryRepository, Storage, StorageError};
pub use subscription::{DocumentSubscription, SubscriptionHub};
