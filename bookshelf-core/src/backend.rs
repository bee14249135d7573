//! Storage backend abstraction for the document store.
//!
//! The [`StoreBackend`] trait provides a unified async interface for the storage
//! operations the service needs: inserting a document, finding documents by
//! filter, and applying a partial update to every matching document.
//! Implementations are required to be thread-safe (`Send + Sync`) and support
//! concurrent access.
//!
//! # Examples
//!
//! ```ignore
//! use bookshelf_core::{backend::StoreBackend, query::Filter, update::Update};
//! use bson::{Bson, doc};
//!
//! let result = backend
//!     .insert_document(Bson::Document(doc! { "isbn": "23424" }), "Book")
//!     .await?;
//!
//! let updated = backend
//!     .update_documents(
//!         Filter::eq("isbn", "23424"),
//!         Update::builder().set("title", "Book One").build(),
//!         "Book",
//!     )
//!     .await?;
//! ```

use async_trait::async_trait;
use bson::Bson;
use serde::Serialize;
use std::fmt::Debug;

use crate::{error::DocumentStoreResult, query::Expr, update::Update};

/// Outcome of a single-document insert.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InsertResult {
    /// Identifier of the new document (hex string for generated ObjectIds).
    #[serde(rename = "InsertedID")]
    pub inserted_id: String,
}

/// Outcome of a multi-document update.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct UpdateResult {
    /// Documents that satisfied the filter.
    pub matched_count: u64,
    /// Documents whose contents actually changed.
    pub modified_count: u64,
}

/// Abstract interface for document storage backends.
///
/// Documents cross this boundary as BSON documents carrying their identifier under
/// the `id` key. Backends map that key to their native identifier and back.
///
/// # Thread Safety
///
/// All implementations must be thread-safe and support concurrent access from
/// multiple async tasks.
#[async_trait]
pub trait StoreBackend: Send + Sync + Debug {
    /// Inserts a new document into a collection.
    ///
    /// If the document has no `id` (or an empty one), the backend generates one.
    ///
    /// # Returns
    ///
    /// The identifier of the inserted document.
    async fn insert_document(&self, document: Bson, collection: &str) -> DocumentStoreResult<InsertResult>;

    /// Returns every document in `collection` matching `filter`, in the store's
    /// natural order. A missing collection yields no documents.
    async fn find_documents(&self, filter: Expr, collection: &str) -> DocumentStoreResult<Vec<Bson>>;

    /// Applies `update` to every document in `collection` matching `filter`.
    ///
    /// Positional assignments (`array.$.field`) target the first element of
    /// `array` satisfying the filter's conditions on that array.
    async fn update_documents(
        &self,
        filter: Expr,
        update: Update,
        collection: &str,
    ) -> DocumentStoreResult<UpdateResult>;

    /// Cleanly shuts down the backend, releasing all resources.
    ///
    /// The default implementation is a no-op.
    async fn shutdown(self) -> DocumentStoreResult<()>
    where
        Self: Sized,
    {
        Ok(())
    }
}

#[async_trait]
impl<B> StoreBackend for &B
where
    B: StoreBackend,
{
    async fn insert_document(&self, document: Bson, collection: &str) -> DocumentStoreResult<InsertResult> {
        (*self).insert_document(document, collection).await
    }

    async fn find_documents(&self, filter: Expr, collection: &str) -> DocumentStoreResult<Vec<Bson>> {
        (*self).find_documents(filter, collection).await
    }

    async fn update_documents(
        &self,
        filter: Expr,
        update: Update,
        collection: &str,
    ) -> DocumentStoreResult<UpdateResult> {
        (*self).update_documents(filter, update, collection).await
    }
}

/// Factory trait for creating backend instances.
#[async_trait]
pub trait StoreBackendBuilder {
    type Backend: StoreBackend;

    /// Builds the backend, performing any connection setup it needs.
    async fn build(self) -> DocumentStoreResult<Self::Backend>;
}
