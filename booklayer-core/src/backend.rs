//! Storage backend abstraction for the repository.
//!
//! This module defines the traits that abstract over document store clients,
//! letting the repository run unchanged against MongoDB or the in-memory store.
//!
//! # Traits
//!
//! - [`StoreBackend`]: the single-document operations the repository needs
//! - [`StoreBackendBuilder`]: fallible factory that connects a backend
//!
//! # Examples
//!
//! ```ignore
//! use booklayer::backend::StoreBackend;
//! use booklayer::filter::IdFilter;
//! use bson::doc;
//!
//! let id = backend.insert_one("books", doc! { "title": "Invisible Cities" }).await?;
//! let found = backend.find_one("books", &IdFilter::new(id)).await?;
//! assert!(found.is_some());
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

use async_trait::async_trait;
use bson::{Document as BsonDocument, oid::ObjectId};
use std::fmt::Debug;

use crate::{
    error::{ConnectionResult, StoreResult},
    filter::{FieldReplacement, IdFilter},
};

/// Counts reported by [`StoreBackend::update_one`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct UpdateOutcome {
    /// Documents that matched the filter (0 or 1).
    pub matched: u64,
    /// Documents whose contents actually changed.
    pub modified: u64,
}

/// Abstract interface for document store clients.
///
/// # Thread Safety
///
/// Implementations must be safe to call from many tasks at once; the
/// repository shares one backend across concurrent operations and adds no
/// locking of its own.
///
/// # Cancellation
///
/// Callers bound every call with a deadline and drop the future when it
/// expires. Implementations must tolerate being dropped mid-call.
#[async_trait]
pub trait StoreBackend: Send + Sync + Debug {
    /// Inserts a new document and returns the identifier the store assigned.
    ///
    /// The collection is created on first write if it does not exist.
    async fn insert_one(&self, collection: &str, document: BsonDocument) -> StoreResult<ObjectId>;

    /// Fetches the single document matching `filter`, or `None`.
    async fn find_one(&self, collection: &str, filter: &IdFilter) -> StoreResult<Option<BsonDocument>>;

    /// Applies `update` to the first document matching `filter`.
    ///
    /// Zero matches is not an error here; it is reported through
    /// [`UpdateOutcome::matched`].
    async fn update_one(
        &self,
        collection: &str,
        filter: &IdFilter,
        update: &FieldReplacement,
    ) -> StoreResult<UpdateOutcome>;

    /// Deletes every document matching `filter` and returns how many were removed.
    async fn delete_many(&self, collection: &str, filter: &IdFilter) -> StoreResult<u64>;

    /// Releases the client's resources.
    async fn shutdown(self) -> StoreResult<()>
    where
        Self: Sized,
    {
        Ok(())
    }
}

/// Factory that connects a [`StoreBackend`].
///
/// Building is where connection failures surface; a built backend is ready
/// for use.
#[async_trait]
pub trait StoreBackendBuilder {
    type Backend: StoreBackend;

    async fn build(self) -> ConnectionResult<Self::Backend>;
}
