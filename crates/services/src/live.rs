use storage::document::Document;
use storage::repository::StorageError;
use storage::subscription::DocumentSubscription;

/// A document subscription decoded into a domain value on every delivery.
/// Dropping it releases the underlying subscription.
pub struct LiveDocument<T, E> {
    subscription: DocumentSubscription,
    decode: fn(Option<Document>) -> Result<T, E>,
    storage_error: fn(StorageError) -> E,
}

impl<T, E: From<StorageError>> LiveDocument<T, E> {
    pub(crate) fn new(
        subscription: DocumentSubscription,
        decode: fn(Option<Document>) -> Result<T, E>,
    ) -> Self {
        Self {
            subscription,
            decode,
            storage_error: E::from,
        }
    }
}

impl<T, E> LiveDocument<T, E> {
    /// Current value first, then one value per committed write. `None` once
    /// the store is gone.
    pub async fn next(&mut self) -> Option<Result<T, E>> {
        let delivery = self.subscription.next().await?;
        Some(
            delivery
                .map_err(self.storage_error)
                .and_then(|snapshot| (self.decode)(snapshot.data)),
        )
    }
}

impl<T, E> std::fmt::Debug for LiveDocument<T, E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LiveDocument")
            .field("subscription", &self.subscription)
            .finish_non_exhaustive()
    }
}
