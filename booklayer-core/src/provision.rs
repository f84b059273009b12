//! Connection provisioning.
//!
//! [`provision`] connects a backend through its [`StoreBackendBuilder`] and
//! hands back a [`Collection`] handle, failing with a [`ConnectionError`]
//! instead of a partial handle when the store cannot be reached in time.

use std::time::Duration;

use tokio::time::timeout;

use crate::{
    backend::StoreBackendBuilder,
    collection::Collection,
    error::{ConnectionError, ConnectionResult},
};

/// Connects `builder`'s backend and resolves the collection called `collection`,
/// giving up after `wait`.
///
/// The collection is not required to exist; document stores create it on
/// first write.
///
/// # Errors
///
/// - [`ConnectionError::InvalidConfig`] if `wait` is zero or `collection` is empty
/// - [`ConnectionError::DeadlineExceeded`] if the backend is not ready within `wait`
/// - whatever the builder reports (invalid URI, unreachable store)
pub async fn provision<Bd>(builder: Bd, collection: &str, wait: Duration) -> ConnectionResult<Collection<Bd::Backend>>
where
    Bd: StoreBackendBuilder,
{
    if wait.is_zero() {
        return Err(ConnectionError::InvalidConfig("connection wait must be positive".into()));
    }
    if collection.trim().is_empty() {
        return Err(ConnectionError::InvalidConfig("collection name is empty".into()));
    }

    let backend = match timeout(wait, builder.build()).await {
        Ok(result) => result.inspect_err(|err| tracing::warn!(%err, "connection failed"))?,
        Err(_) => {
            tracing::warn!(?wait, "connection deadline exceeded");
            return Err(ConnectionError::DeadlineExceeded(wait));
        },
    };

    tracing::info!(collection, "store connected");

    Ok(Collection::new(collection, backend))
}

#[cfg(test)]
mod tests {
    use super::*;

    use async_trait::async_trait;
    use bson::{Document as BsonDocument, oid::ObjectId};

    use crate::{
        backend::{StoreBackend, UpdateOutcome},
        error::StoreResult,
        filter::{FieldReplacement, IdFilter},
    };

    #[derive(Debug)]
    struct NullBackend;

    #[async_trait]
    impl StoreBackend for NullBackend {
        async fn insert_one(&self, _collection: &str, _document: BsonDocument) -> StoreResult<ObjectId> {
            Ok(ObjectId::new())
        }

        async fn find_one(&self, _collection: &str, _filter: &IdFilter) -> StoreResult<Option<BsonDocument>> {
            Ok(None)
        }

        async fn update_one(
            &self,
            _collection: &str,
            _filter: &IdFilter,
            _update: &FieldReplacement,
        ) -> StoreResult<UpdateOutcome> {
            Ok(UpdateOutcome::default())
        }

        async fn delete_many(&self, _collection: &str, _filter: &IdFilter) -> StoreResult<u64> {
            Ok(0)
        }
    }

    struct NullBuilder {
        delay: Duration,
        fail: bool,
    }

    #[async_trait]
    impl StoreBackendBuilder for NullBuilder {
        type Backend = NullBackend;

        async fn build(self) -> ConnectionResult<Self::Backend> {
            tokio::time::sleep(self.delay).await;
            if self.fail {
                return Err(ConnectionError::Unreachable("no route to host".into()));
            }
            Ok(NullBackend)
        }
    }

    #[tokio::test]
    async fn test_provision_returns_named_collection() {
        let builder = NullBuilder { delay: Duration::ZERO, fail: false };
        let collection = provision(builder, "books", Duration::from_secs(1)).await.unwrap();

        assert_eq!(collection.name(), "books");
    }

    #[tokio::test]
    async fn test_provision_times_out() {
        let builder = NullBuilder { delay: Duration::from_secs(5), fail: false };
        let err = provision(builder, "books", Duration::from_millis(10)).await.unwrap_err();

        assert!(matches!(err, ConnectionError::DeadlineExceeded(wait) if wait == Duration::from_millis(10)));
    }

    #[tokio::test]
    async fn test_provision_propagates_builder_error() {
        let builder = NullBuilder { delay: Duration::ZERO, fail: true };
        let err = provision(builder, "books", Duration::from_secs(1)).await.unwrap_err();

        assert!(matches!(err, ConnectionError::Unreachable(_)));
    }

    #[tokio::test]
    async fn test_provision_rejects_zero_wait() {
        let builder = NullBuilder { delay: Duration::ZERO, fail: false };
        let err = provision(builder, "books", Duration::ZERO).await.unwrap_err();

        assert!(matches!(err, ConnectionError::InvalidConfig(_)));
    }
}
