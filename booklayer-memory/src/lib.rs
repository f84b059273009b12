//! In-memory document storage backend for booklayer.
//!
//! This crate provides a thread-safe, in-memory implementation of the `StoreBackend` trait.
//! It uses async-aware read-write locks for concurrent access and is meant for development,
//! testing, and offline runs of the `books` harness.
//!
//! # Features
//!
//! - **Thread-safe access** - Concurrent reads and writes using async-aware RwLock
//! - **Store-assigned identifiers** - `ObjectId`s generated on insert, like MongoDB
//! - **Simulated latency** - Optional per-call delay for exercising timeouts
//!
//! # Quick Start
//!
//! ```ignore
//! use booklayer::{prelude::*, memory::InMemoryStore};
//! use std::time::Duration;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let collection = provision(InMemoryStore::builder(), "books", Duration::from_secs(1)).await?;
//!     let books = BookRepository::new(collection, Duration::from_secs(1));
//!
//!     let book = books
//!         .create(&CallContext::background(), Book::new("Invisible Cities", "Italo Calvino", 1974))
//!         .await?;
//!     assert!(book.id.is_some());
//!
//!     Ok(())
//! }
//! ```

#[allow(unused_extern_crates)]
extern crate self as booklayer_memory;

pub mod store;

pub use store::{InMemoryStore, InMemoryStoreBuilder};
