//! Error types and result types for provisioning and repository operations.
//!
//! Failures are split three ways so callers can branch on them:
//!
//! - [`ConnectionError`] - provisioning failed, fatal to startup
//! - [`StoreError`] - a store call failed (timeout, cancellation, transport, decoding)
//! - [`RepositoryError`] - what repository operations return, separating
//!   "no such document" from "the operation failed"

use std::time::Duration;

use bson::error::Error as BsonError;
use serde_json::Error as SerdeJsonError;
use thiserror::Error;

/// Errors raised while establishing a connection to the document store.
#[derive(Error, Debug)]
pub enum ConnectionError {
    /// The connection string could not be parsed.
    #[error("Invalid connection URI: {0}")]
    InvalidUri(String),
    /// The provisioning configuration is unusable (empty names, zero waits).
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
    /// The store could not be reached.
    #[error("Store unreachable: {0}")]
    Unreachable(String),
    /// The connection was not established before the wait elapsed.
    #[error("Connection not established within {0:?}")]
    DeadlineExceeded(Duration),
}

/// Errors raised by a single store call.
#[derive(Error, Debug)]
pub enum StoreError {
    /// The call did not complete before its deadline.
    /// The first argument is the operation name, the second the budget it had.
    #[error("Operation {0} timed out after {1:?}")]
    Timeout(String, Duration),
    /// The caller cancelled the call before it completed.
    #[error("Operation {0} was cancelled")]
    Cancelled(String),
    /// Serialization/deserialization error when converting between BSON, JSON and records.
    #[error("Serialization error: {0}")]
    Serialization(String),
    /// The store returned or was handed a document with an unexpected shape.
    #[error("Invalid document: {0}")]
    InvalidDocument(String),
    /// An error occurred in the underlying storage backend.
    #[error("Backend error: {0}")]
    Backend(String),
}

/// Errors returned by [`Repository`](crate::repository::Repository) operations.
#[derive(Error, Debug)]
pub enum RepositoryError {
    /// No document matched the addressed id.
    /// The first argument is the id (or `<absent>`), the second the collection name.
    #[error("Document {0} not found in collection {1}")]
    NotFound(String, String),
    /// The store call itself failed.
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl RepositoryError {
    /// Returns `true` if this is a [`RepositoryError::NotFound`].
    pub fn is_not_found(&self) -> bool {
        matches!(self, RepositoryError::NotFound(..))
    }

    /// Returns `true` if the underlying store call ran out of time.
    pub fn is_timeout(&self) -> bool {
        matches!(self, RepositoryError::Store(StoreError::Timeout(..)))
    }
}

pub type ConnectionResult<T> = Result<T, ConnectionError>;

pub type StoreResult<T> = Result<T, StoreError>;

pub type RepositoryResult<T> = Result<T, RepositoryError>;

impl From<BsonError> for StoreError {
    fn from(err: BsonError) -> Self {
        StoreError::Serialization(err.to_string())
    }
}

impl From<SerdeJsonError> for StoreError {
    fn from(err: SerdeJsonError) -> Self {
        StoreError::Serialization(err.to_string())
    }
}
