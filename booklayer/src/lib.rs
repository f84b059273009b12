//! Main booklayer crate: a timeout-bounded book repository over a document store.
//!
//! This crate is the primary entry point. It re-exports the core types from
//! the sub-crates and gives access to the available storage backends.
//!
//! # Features
//!
//! - **Typed records** - `Book` with store-assigned `ObjectId` identifiers
//! - **Bounded calls** - every operation derives its own deadline and honors caller cancellation
//! - **Multiple backends** - in-memory and MongoDB (behind the `mongodb` feature)
//! - **Fallible provisioning** - connection failures are ordinary errors, not panics
//!
//! # Quick Start
//!
//! ```ignore
//! use booklayer::{prelude::*, memory::InMemoryStore};
//! use std::time::Duration;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let collection = provision(InMemoryStore::builder(), "favorite_books", Duration::from_secs(5)).await?;
//!     let books = BookRepository::new(collection, Duration::from_secs(10));
//!     let ctx = CallContext::background();
//!
//!     let book = books.create(&ctx, Book::new("Invisible Cities", "Italo Calvino", 1974)).await?;
//!     let id = book.id;
//!
//!     books.update(&ctx, id, Book::new("Bumi manusia", "Pramoedya Ananta Toer", 1980)).await?;
//!     println!("{:?}", books.read(&ctx, id).await?);
//!
//!     assert_eq!(books.delete(&ctx, id).await?, 1);
//!     assert!(books.read(&ctx, id).await.unwrap_err().is_not_found());
//!
//!     books.shutdown().await?;
//!     Ok(())
//! }
//! ```
//!
//! # Cancellation
//!
//! Pass a [`CallContext`](context::CallContext) carrying a deadline or a
//! [`CancellationToken`](context::CancellationToken) to bound calls from the
//! outside as well:
//!
//! ```ignore
//! let token = CancellationToken::new();
//! let ctx = CallContext::background()
//!     .with_timeout(Duration::from_millis(500))
//!     .with_cancellation(token.clone());
//!
//! match books.read(&ctx, id).await {
//!     Err(RepositoryError::Store(StoreError::Cancelled(_))) => { /* token was cancelled */ },
//!     other => { /* ... */ },
//! }
//! ```
//!
//! # Backends
//!
//! - [`memory`] - In-memory storage for development and testing
//! - [`mongodb`] - MongoDB backend (requires `mongodb` feature)

pub mod prelude;

pub use booklayer_core::{backend, book, collection, config, context, document, error, filter, provision, repository};

// Re-export BSON types for convenience
pub use bson;

/// In-memory storage backend implementations.
pub mod memory {
    pub use booklayer_memory::{InMemoryStore, InMemoryStoreBuilder};
}

/// MongoDB storage backend implementations.
///
/// This module is only available when the `mongodb` feature is enabled.
#[cfg(feature = "mongodb")]
pub mod mongodb {
    pub use booklayer_mongodb::{MongoDbStore, MongoDbStoreBuilder};
}
