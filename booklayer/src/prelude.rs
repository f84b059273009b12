//! Convenient re-exports of commonly used types from booklayer.
//!
//! ```ignore
//! use booklayer::prelude::*;
//! ```

pub use booklayer_core::{
    backend::{StoreBackend, StoreBackendBuilder, UpdateOutcome},
    book::Book,
    collection::Collection,
    config::StoreConfig,
    context::{CallContext, CancellationToken},
    document::{Document, DocumentExt},
    error::{ConnectionError, ConnectionResult, RepositoryError, RepositoryResult, StoreError, StoreResult},
    filter::{FieldReplacement, IdFilter},
    provision::provision,
    repository::{BookRepository, Repository},
};

pub use bson::oid::ObjectId;
