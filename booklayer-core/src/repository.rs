//! Timeout-bounded create/read/update/delete over one collection.
//!
//! A [`Repository`] owns a [`Collection`] handle and a per-call timeout. Each
//! operation derives a fresh deadline from the caller's [`CallContext`] and
//! that timeout, makes exactly one store call, and hands the store's result
//! or error back. Nothing is retried.
//!
//! # Example
//!
//! ```ignore
//! use booklayer::{prelude::*, memory::InMemoryStore};
//! use std::time::Duration;
//!
//! let collection = provision(InMemoryStore::builder(), "books", Duration::from_secs(5)).await?;
//! let books = BookRepository::new(collection, Duration::from_secs(10));
//! let ctx = CallContext::background();
//!
//! let book = books.create(&ctx, Book::new("Invisible Cities", "Italo Calvino", 1974)).await?;
//! let fetched = books.read(&ctx, book.id).await?;
//! assert_eq!(fetched, book);
//! ```

use std::{marker::PhantomData, time::Duration};

use bson::oid::ObjectId;

use crate::{
    backend::{StoreBackend, UpdateOutcome},
    book::Book,
    collection::Collection,
    context::CallContext,
    document::{Document, DocumentExt, ID_FIELD},
    error::{RepositoryError, RepositoryResult, StoreError},
    filter::{FieldReplacement, IdFilter},
};

/// Repository for [`Book`] records.
pub type BookRepository<B> = Repository<B, Book>;

/// Data-access object for records of type `D` in one collection.
///
/// The repository holds no locks; concurrent calls share the backend, which
/// is responsible for its own thread safety.
#[derive(Debug)]
pub struct Repository<B: StoreBackend, D: Document> {
    collection: Collection<B>,
    timeout: Duration,
    _record: PhantomData<fn() -> D>,
}

impl<B: StoreBackend, D: Document> Repository<B, D> {
    /// Creates a repository over `collection`, bounding every call by `timeout`.
    pub fn new(collection: Collection<B>, timeout: Duration) -> Self {
        Self {
            collection,
            timeout,
            _record: PhantomData,
        }
    }

    pub fn collection(&self) -> &Collection<B> {
        &self.collection
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Inserts `record` and returns it with the store-assigned identifier.
    ///
    /// Any identifier already on `record` is discarded; the store always
    /// assigns a new one.
    ///
    /// # Errors
    ///
    /// [`RepositoryError::Store`] if the insert times out, is cancelled, or is
    /// rejected by the store.
    pub async fn create(&self, ctx: &CallContext, mut record: D) -> RepositoryResult<D> {
        let mut document = record.to_document()?;
        document.remove(ID_FIELD);

        let id = ctx
            .run("create", self.timeout, self.collection.insert_one(document))
            .await
            .inspect_err(|err| self.log_failure("create", None, err))?;

        tracing::debug!(collection = self.collection.name(), %id, "record created");

        record.set_id(id);
        Ok(record)
    }

    /// Fetches the record whose identifier is `id`.
    ///
    /// # Errors
    ///
    /// - [`RepositoryError::NotFound`] if `id` is absent or matches nothing
    /// - [`RepositoryError::Store`] on timeout, cancellation, transport or decoding failure
    pub async fn read(&self, ctx: &CallContext, id: impl Into<Option<ObjectId>>) -> RepositoryResult<D> {
        let Some(id) = id.into() else {
            return Err(self.not_found(None));
        };
        let filter = IdFilter::new(id);

        let found = ctx
            .run("read", self.timeout, self.collection.find_one(&filter))
            .await
            .inspect_err(|err| self.log_failure("read", Some(&id), err))?;

        match found {
            Some(document) => {
                tracing::debug!(collection = self.collection.name(), %id, "record read");
                Ok(D::from_document(document)?)
            },
            None => Err(self.not_found(Some(&id))),
        }
    }

    /// Replaces every field of the record stored under `id` with the fields
    /// of `record`. Fields absent from `record` are removed; the identifier
    /// is never changed.
    ///
    /// Returns `record` as written, carrying `id`. The store is not re-read.
    ///
    /// # Errors
    ///
    /// - [`RepositoryError::NotFound`] if `id` is absent or matches nothing
    /// - [`RepositoryError::Store`] on timeout, cancellation or transport failure
    pub async fn update(
        &self,
        ctx: &CallContext,
        id: impl Into<Option<ObjectId>>,
        record: D,
    ) -> RepositoryResult<D> {
        let (record, _) = self.update_with_outcome(ctx, id, record).await?;
        Ok(record)
    }

    /// Same as [`update`](Self::update), also returning the matched and
    /// modified counts the store reported.
    ///
    /// `modified` is 0 when the stored record already equalled `record`.
    pub async fn update_with_outcome(
        &self,
        ctx: &CallContext,
        id: impl Into<Option<ObjectId>>,
        mut record: D,
    ) -> RepositoryResult<(D, UpdateOutcome)> {
        let Some(id) = id.into() else {
            return Err(self.not_found(None));
        };
        let filter = IdFilter::new(id);
        let replacement = FieldReplacement::for_record::<D>(record.to_document()?);

        let outcome = ctx
            .run("update", self.timeout, self.collection.update_one(&filter, &replacement))
            .await
            .inspect_err(|err| self.log_failure("update", Some(&id), err))?;

        if outcome.matched == 0 {
            return Err(self.not_found(Some(&id)));
        }

        tracing::debug!(
            collection = self.collection.name(),
            %id,
            matched = outcome.matched,
            modified = outcome.modified,
            "record updated"
        );

        record.set_id(id);
        Ok((record, outcome))
    }

    /// Removes every record whose identifier is `id` and returns how many
    /// were removed.
    ///
    /// Deleting an identifier that no longer exists (or an absent one)
    /// succeeds with 0.
    ///
    /// # Errors
    ///
    /// [`RepositoryError::Store`] on timeout, cancellation or transport failure.
    pub async fn delete(&self, ctx: &CallContext, id: impl Into<Option<ObjectId>>) -> RepositoryResult<u64> {
        let Some(id) = id.into() else {
            return Ok(0);
        };
        let filter = IdFilter::new(id);

        let deleted = ctx
            .run("delete", self.timeout, self.collection.delete_many(&filter))
            .await
            .inspect_err(|err| self.log_failure("delete", Some(&id), err))?;

        tracing::debug!(collection = self.collection.name(), %id, deleted, "records deleted");

        Ok(deleted)
    }

    /// Shuts down the underlying backend.
    pub async fn shutdown(self) -> RepositoryResult<()> {
        Ok(self.collection.shutdown().await?)
    }

    fn not_found(&self, id: Option<&ObjectId>) -> RepositoryError {
        RepositoryError::NotFound(
            id.map_or_else(|| "<absent>".to_string(), |id| id.to_hex()),
            self.collection.name().to_string(),
        )
    }

    fn log_failure(&self, operation: &str, id: Option<&ObjectId>, err: &StoreError) {
        let id = id.map(|id| id.to_hex());
        tracing::warn!(collection = self.collection.name(), operation, id = id.as_deref(), %err, "store call failed");
    }
}
