//! Main document store interface.
//!
//! [`DocumentStore`] owns a backend and hands out typed collections:
//!
//! ```ignore
//! use bookshelf_core::store::DocumentStore;
//!
//! let store = DocumentStore::new(backend);
//! let books = store.typed_collection::<Book>();
//! ```

use crate::{backend::StoreBackend, collection::TypedCollection, document::Document};

/// A strongly-typed document store bound to a specific backend implementation.
#[derive(Debug)]
pub struct DocumentStore<B: StoreBackend> {
    backend: B,
}

impl<B: StoreBackend> DocumentStore<B> {
    /// Creates a new document store with the given backend.
    pub fn new(backend: B) -> Self {
        Self { backend }
    }

    /// Gets a typed collection for the specified document type.
    ///
    /// The collection name is determined by the document type's `collection_name()` method.
    pub fn typed_collection<'a, D: Document>(&'a self) -> TypedCollection<'a, B, D> {
        TypedCollection::new(D::collection_name().to_string(), &self.backend)
    }
}
