//! Convenient re-exports of commonly used types from bookshelf.
//!
//! ```ignore
//! use bookshelf::prelude::*;
//! ```

pub use bookshelf_core::{
    store::DocumentStore,
    document::{Document, DocumentExt},
    backend::{InsertResult, StoreBackend, StoreBackendBuilder, UpdateResult},
    query::{Expr, Filter},
    update::Update,
    error::{DocumentStoreError, DocumentStoreResult},
};

pub use crate::{
    catalog::BookCatalog,
    config::ServerConfig,
    model::{Author, Book, BookChanges, Location},
    repository::BookRepository,
    routes::{AppState, router},
};
