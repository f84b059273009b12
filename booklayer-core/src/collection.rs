//! Handle to one named collection on a backend.
//!
//! A [`Collection`] is what the provisioner hands out and what a repository
//! owns. It pairs a backend with a collection name and forwards the
//! single-document operations to the backend under that name.

use bson::{Document as BsonDocument, oid::ObjectId};

use crate::{
    backend::{StoreBackend, UpdateOutcome},
    error::StoreResult,
    filter::{FieldReplacement, IdFilter},
};

/// A named collection on a storage backend.
///
/// # Type Parameters
///
/// * `B` - The storage backend type
#[derive(Debug)]
pub struct Collection<B: StoreBackend> {
    name: String,
    backend: B,
}

impl<B: StoreBackend> Collection<B> {
    /// Wraps `backend` as a handle to the collection called `name`.
    ///
    /// The collection is not required to exist yet.
    pub fn new(name: impl Into<String>, backend: B) -> Self {
        Self {
            name: name.into(),
            backend,
        }
    }

    /// Returns the name of this collection.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the backend this collection lives on.
    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Inserts a document and returns its store-assigned identifier.
    pub async fn insert_one(&self, document: BsonDocument) -> StoreResult<ObjectId> {
        self.backend
            .insert_one(&self.name, document)
            .await
    }

    /// Fetches the document matching `filter`, if any.
    pub async fn find_one(&self, filter: &IdFilter) -> StoreResult<Option<BsonDocument>> {
        self.backend
            .find_one(&self.name, filter)
            .await
    }

    /// Applies `update` to the document matching `filter`.
    pub async fn update_one(
        &self,
        filter: &IdFilter,
        update: &FieldReplacement,
    ) -> StoreResult<UpdateOutcome> {
        self.backend
            .update_one(&self.name, filter, update)
            .await
    }

    /// Deletes every document matching `filter`.
    pub async fn delete_many(&self, filter: &IdFilter) -> StoreResult<u64> {
        self.backend
            .delete_many(&self.name, filter)
            .await
    }

    /// Shuts down the backend, consuming the handle.
    pub async fn shutdown(self) -> StoreResult<()> {
        self.backend.shutdown().await
    }
}
