//! HTTP book service backed by a document store.
//!
//! The service exposes CRUD endpoints for books. Lookups, inserts and updates go
//! to the document store through [`repository::BookRepository`]; listing and
//! deletion operate on a separate in-memory [`catalog::BookCatalog`] seeded with
//! two books at startup. The two data sets are never reconciled.
//!
//! # Quick Start
//!
//! ```ignore
//! use std::sync::Arc;
//! use bookshelf::{prelude::*, memory::InMemoryStore, repository::DEFAULT_OPERATION_TIMEOUT};
//!
//! #[tokio::main]
//! async fn main() {
//!     let books = BookRepository::new(DocumentStore::new(InMemoryStore::new()), DEFAULT_OPERATION_TIMEOUT);
//!     let app = router(AppState::new(Arc::new(books), Arc::new(BookCatalog::seeded())));
//!
//!     let listener = tokio::net::TcpListener::bind("0.0.0.0:8000").await.unwrap();
//!     axum::serve(listener, app).await.unwrap();
//! }
//! ```
//!
//! # Backends
//!
//! - [`memory`] - In-process storage for development and testing
//! - [`mongodb`] - MongoDB storage (requires the `mongodb` feature, on by default)

pub mod catalog;
pub mod config;
pub mod error;
pub mod model;
pub mod prelude;
pub mod repository;
pub mod routes;
pub mod telemetry;

pub use bookshelf_core::{backend, document, error as store_error, query, store, update};

/// In-memory storage backend.
pub mod memory {
    pub use bookshelf_memory::{InMemoryStore, InMemoryStoreBuilder};
}

/// MongoDB storage backend.
///
/// This module is only available when the `mongodb` feature is enabled.
#[cfg(feature = "mongodb")]
pub mod mongodb {
    pub use bookshelf_mongodb::{MongoDbStore, MongoDbStoreBuilder};
}
