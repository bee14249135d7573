//! Typed collection handle.
//!
//! A [`TypedCollection`] binds a backend reference to a collection name and a
//! [`Document`] type, converting documents to and from BSON around each backend
//! call.
//!
//! ```ignore
//! let books = store.typed_collection::<Book>();
//! let result = books.insert_one(&book).await?;
//! let found = books.find(Filter::eq("isbn", "23424")).await?;
//! ```

use std::marker::PhantomData;

use crate::{
    backend::{InsertResult, StoreBackend, UpdateResult},
    document::{Document, DocumentExt},
    error::DocumentStoreResult,
    query::Expr,
    update::Update,
};

#[derive(Debug)]
pub struct TypedCollection<'a, B: StoreBackend, D: Document> {
    name: String,
    backend: &'a B,
    _marker: PhantomData<D>,
}

impl<'a, B: StoreBackend, D: Document> TypedCollection<'a, B, D> {
    pub(crate) fn new(name: String, backend: &'a B) -> Self {
        Self { name, backend, _marker: PhantomData }
    }

    /// Returns the name of this collection.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Inserts a single document.
    ///
    /// # Errors
    ///
    /// Returns a [`DocumentStoreError`](crate::error::DocumentStoreError) if serialization or insertion fails.
    pub async fn insert_one(&self, document: &D) -> DocumentStoreResult<InsertResult> {
        self.backend
            .insert_document(document.to_bson()?, self.name())
            .await
    }

    /// Returns every document matching `filter`, decoded as `D`.
    ///
    /// # Errors
    ///
    /// Returns a [`DocumentStoreError`](crate::error::DocumentStoreError) if the query or decoding fails.
    pub async fn find(&self, filter: Expr) -> DocumentStoreResult<Vec<D>> {
        self.backend
            .find_documents(filter, self.name())
            .await?
            .into_iter()
            .map(D::from_bson)
            .collect()
    }

    /// Applies `update` to every document matching `filter`.
    ///
    /// # Errors
    ///
    /// Returns a [`DocumentStoreError`](crate::error::DocumentStoreError) if the update fails.
    pub async fn update_many(&self, filter: Expr, update: Update) -> DocumentStoreResult<UpdateResult> {
        self.backend
            .update_documents(filter, update, self.name())
            .await
    }
}
