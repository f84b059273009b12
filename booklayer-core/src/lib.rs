//! A timeout-bounded data-access layer for a single document collection.
//!
//! This crate is the core of the booklayer project and provides:
//!
//! - **Records** ([`document`], [`book`]) - The record trait and the `Book` entity
//! - **Store backend abstraction** ([`backend`]) - Traits implemented by concrete store clients
//! - **Typed filters** ([`filter`]) - By-id filters and field replacements
//! - **Collection handle** ([`collection`]) - A backend bound to one collection name
//! - **Provisioning** ([`provision`]) - Bounded-time connection to a collection
//! - **Call context** ([`context`]) - Caller deadlines and cancellation
//! - **Repository** ([`repository`]) - Create, read, update and delete with per-call timeouts
//! - **Configuration** ([`config`]) - Connection and timeout settings
//! - **Error handling** ([`error`]) - Connection, store and repository errors
//!
//! # Example
//!
//! ```ignore
//! use booklayer::{prelude::*, memory::InMemoryStore};
//! use std::time::Duration;
//!
//! let collection = provision(InMemoryStore::builder(), "books", Duration::from_secs(5)).await?;
//! let books = BookRepository::new(collection, Duration::from_secs(10));
//!
//! let created = books
//!     .create(&CallContext::background(), Book::new("Invisible Cities", "Italo Calvino", 1974))
//!     .await?;
//! ```

#[allow(unused_extern_crates)]
extern crate self as booklayer_core;

pub mod backend;
pub mod book;
pub mod collection;
pub mod config;
pub mod context;
pub mod document;
pub mod error;
pub mod filter;
pub mod provision;
pub mod repository;
