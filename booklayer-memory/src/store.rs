//! In-memory storage implementation.
//!
//! Documents are kept as BSON in per-collection maps keyed by `_id`, behind an
//! async-aware read-write lock.

use std::{collections::HashMap, sync::Arc, time::Duration};

use async_trait::async_trait;
use bson::{Bson, Document as BsonDocument, oid::ObjectId};
use mea::rwlock::RwLock;

use booklayer_core::{
    backend::{StoreBackend, StoreBackendBuilder, UpdateOutcome},
    document::ID_FIELD,
    error::{ConnectionResult, StoreError, StoreResult},
    filter::{FieldReplacement, IdFilter},
};

type CollectionMap = HashMap<ObjectId, BsonDocument>;
type StoreMap = HashMap<String, CollectionMap>;

/// Thread-safe in-memory document storage backend.
///
/// Behaves like the MongoDB backend for the single-document operations the
/// repository uses: identifiers are generated on insert, collections appear
/// on first write, and updates report matched/modified counts.
///
/// # Thread Safety
///
/// `InMemoryStore` is cloneable and uses an `Arc`-wrapped internal state.
/// Clones share the same underlying data, so a test can keep one clone for
/// inspection while a repository owns another.
///
/// # Latency
///
/// A store built with [`InMemoryStoreBuilder::latency`] sleeps for that long
/// before every call, before touching any data. Dropping a call during the
/// sleep leaves the store unchanged.
///
/// # Example
///
/// ```ignore
/// use booklayer_memory::InMemoryStore;
/// use booklayer::{backend::StoreBackend, filter::IdFilter};
/// use bson::doc;
///
/// let store = InMemoryStore::new();
/// let id = store.insert_one("books", doc! { "title": "Invisible Cities" }).await?;
/// let found = store.find_one("books", &IdFilter::new(id)).await?;
/// assert!(found.is_some());
/// ```
#[derive(Default, Clone, Debug)]
pub struct InMemoryStore {
    /// collection_name -> (document_id -> document)
    store: Arc<RwLock<StoreMap>>,
    latency: Option<Duration>,
}

impl InMemoryStore {
    /// Creates a new empty in-memory store with no simulated latency.
    pub fn new() -> Self {
        Self {
            store: Arc::new(RwLock::new(StoreMap::new())),
            latency: None,
        }
    }

    /// Creates a builder for an `InMemoryStore`.
    pub fn builder() -> InMemoryStoreBuilder {
        InMemoryStoreBuilder::default()
    }

    /// Number of documents currently in `collection`.
    pub async fn count(&self, collection: &str) -> usize {
        self.store
            .read()
            .await
            .get(collection)
            .map_or(0, HashMap::len)
    }

    async fn simulate_latency(&self) {
        if let Some(latency) = self.latency {
            tokio::time::sleep(latency).await;
        }
    }
}

#[async_trait]
impl StoreBackend for InMemoryStore {
    async fn insert_one(&self, collection: &str, mut document: BsonDocument) -> StoreResult<ObjectId> {
        self.simulate_latency().await;

        let id = match document.get(ID_FIELD) {
            Some(Bson::ObjectId(id)) => *id,
            Some(other) => {
                return Err(StoreError::InvalidDocument(format!(
                    "{ID_FIELD} must be an ObjectId, got {:?}",
                    other.element_type()
                )));
            },
            None => {
                let id = ObjectId::new();
                document.insert(ID_FIELD, id);
                id
            },
        };

        let mut store = self.store.write().await;
        let collection_map = store
            .entry(collection.to_string())
            .or_default();

        if collection_map.contains_key(&id) {
            return Err(StoreError::Backend(format!(
                "duplicate key {id} in collection {collection}"
            )));
        }

        collection_map.insert(id, document);
        tracing::trace!(collection, %id, "document inserted");

        Ok(id)
    }

    async fn find_one(&self, collection: &str, filter: &IdFilter) -> StoreResult<Option<BsonDocument>> {
        self.simulate_latency().await;

        Ok(self
            .store
            .read()
            .await
            .get(collection)
            .and_then(|collection_map| collection_map.get(filter.id()))
            .cloned())
    }

    async fn update_one(
        &self,
        collection: &str,
        filter: &IdFilter,
        update: &FieldReplacement,
    ) -> StoreResult<UpdateOutcome> {
        self.simulate_latency().await;

        let mut store = self.store.write().await;
        let Some(document) = store
            .get_mut(collection)
            .and_then(|collection_map| collection_map.get_mut(filter.id()))
        else {
            return Ok(UpdateOutcome::default());
        };

        let modified = update.apply(document);

        Ok(UpdateOutcome {
            matched: 1,
            modified: u64::from(modified),
        })
    }

    async fn delete_many(&self, collection: &str, filter: &IdFilter) -> StoreResult<u64> {
        self.simulate_latency().await;

        let mut store = self.store.write().await;
        let removed = store
            .get_mut(collection)
            .and_then(|collection_map| collection_map.remove(filter.id()))
            .is_some();

        Ok(u64::from(removed))
    }
}

/// Builder for constructing [`InMemoryStore`] instances.
///
/// # Example
///
/// ```ignore
/// use booklayer_memory::InMemoryStore;
/// use booklayer::backend::StoreBackendBuilder;
///
/// let store = InMemoryStore::builder()
///     .latency(Duration::from_millis(50))
///     .build()
///     .await?;
/// ```
#[derive(Default)]
pub struct InMemoryStoreBuilder {
    latency: Option<Duration>,
}

impl InMemoryStoreBuilder {
    /// Delays every call on the built store by `latency`.
    pub fn latency(mut self, latency: Duration) -> Self {
        self.latency = Some(latency);
        self
    }
}

#[async_trait]
impl StoreBackendBuilder for InMemoryStoreBuilder {
    type Backend = InMemoryStore;

    /// Always succeeds with a freshly initialized store.
    async fn build(self) -> ConnectionResult<Self::Backend> {
        Ok(InMemoryStore {
            latency: self.latency,
            ..InMemoryStore::new()
        })
    }
}
