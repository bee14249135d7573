//! In-memory storage implementation for document stores.
//!
//! Documents are kept as BSON values in insertion order per collection, behind an
//! async-aware read-write lock.

use std::{collections::HashMap, sync::Arc};
use async_trait::async_trait;
use mea::rwlock::RwLock;
use bson::{Bson, oid::ObjectId};

use bookshelf_core::{
    backend::{InsertResult, StoreBackend, StoreBackendBuilder, UpdateResult},
    error::{DocumentStoreError, DocumentStoreResult},
    query::Expr,
    update::Update,
};

use crate::{evaluator::DocumentEvaluator, updater::apply_update};

type StoreMap = HashMap<String, Vec<Bson>>;


/// Thread-safe in-memory document storage backend.
///
/// `InMemoryStore` is cloneable and uses an `Arc`-wrapped internal state, so
/// clones share the same underlying data. Queries scan the whole collection.
///
/// Documents without an `id` receive a freshly generated ObjectId in hex form,
/// mirroring what MongoDB does for a missing `_id`.
///
/// # Example
///
/// ```ignore
/// use bookshelf_memory::InMemoryStore;
/// use bookshelf_core::{backend::StoreBackend, query::Filter};
/// use bson::{Bson, doc};
///
/// let store = InMemoryStore::new();
/// let result = store.insert_document(Bson::Document(doc! { "isbn": "1" }), "Book").await?;
/// let found = store.find_documents(Filter::eq("isbn", "1"), "Book").await?;
/// assert_eq!(found.len(), 1);
/// ```
#[derive(Default, Clone, Debug)]
pub struct InMemoryStore {
    /// collection_name -> documents in insertion order
    store: Arc<RwLock<StoreMap>>,
}

impl InMemoryStore {
    /// Creates a new empty in-memory document store.
    pub fn new() -> Self {
        Self {
            store: Arc::new(RwLock::new(StoreMap::new())),
        }
    }

    /// Creates a builder for constructing an `InMemoryStore`.
    pub fn builder() -> InMemoryStoreBuilder {
        InMemoryStoreBuilder::default()
    }
}

fn document_id(document: &Bson) -> Option<&str> {
    document
        .as_document()
        .and_then(|doc| doc.get_str("id").ok())
        .filter(|id| !id.is_empty())
}


#[async_trait]
impl StoreBackend for InMemoryStore {
    async fn insert_document(&self, document: Bson, collection: &str) -> DocumentStoreResult<InsertResult> {
        let Bson::Document(mut document) = document else {
            return Err(DocumentStoreError::InvalidDocument("Expected document".into()));
        };

        let existing = document
            .get_str("id")
            .ok()
            .filter(|id| !id.is_empty())
            .map(str::to_string);

        let id = match existing {
            Some(id) => id,
            None => {
                let generated = ObjectId::new().to_hex();
                document.insert("id", generated.clone());
                generated
            }
        };

        let mut store = self.store.write().await;
        let documents = store
            .entry(collection.to_string())
            .or_default();

        if documents.iter().any(|existing| document_id(existing) == Some(id.as_str())) {
            return Err(DocumentStoreError::Backend(format!(
                "duplicate key error collection: {collection} id: {id}"
            )));
        }

        documents.push(Bson::Document(document));

        Ok(InsertResult { inserted_id: id })
    }

    async fn find_documents(&self, filter: Expr, collection: &str) -> DocumentStoreResult<Vec<Bson>> {
        let store = self.store.read().await;
        let Some(documents) = store.get(collection) else {
            return Ok(vec![]);
        };

        let mut matched = Vec::new();
        for document in documents {
            if DocumentEvaluator::new(document).evaluate(&filter)? {
                matched.push(document.clone());
            }
        }

        Ok(matched)
    }

    async fn update_documents(
        &self,
        filter: Expr,
        update: Update,
        collection: &str,
    ) -> DocumentStoreResult<UpdateResult> {
        let mut store = self.store.write().await;
        let Some(documents) = store.get_mut(collection) else {
            return Ok(UpdateResult::default());
        };

        let mut result = UpdateResult::default();

        for stored in documents.iter_mut() {
            if !DocumentEvaluator::new(stored).evaluate(&filter)? {
                continue;
            }
            result.matched_count += 1;

            let Some(original) = stored.as_document() else {
                continue;
            };
            let mut updated = original.clone();
            apply_update(&mut updated, &filter, &update)?;

            if &updated != original {
                *stored = Bson::Document(updated);
                result.modified_count += 1;
            }
        }

        Ok(result)
    }
}


/// Builder for constructing [`InMemoryStore`] instances.
///
/// ```ignore
/// use bookshelf_memory::InMemoryStore;
/// use bookshelf_core::backend::StoreBackendBuilder;
///
/// let store = InMemoryStore::builder().build().await.unwrap();
/// ```
#[derive(Default)]
pub struct InMemoryStoreBuilder;

#[async_trait]
impl StoreBackendBuilder for InMemoryStoreBuilder {
    type Backend = InMemoryStore;

    /// Builds and returns a new [`InMemoryStore`] instance.
    ///
    /// This always succeeds and returns a freshly initialized store.
    async fn build(self) -> DocumentStoreResult<Self::Backend> {
        Ok(InMemoryStore::new())
    }
}

#[cfg(test)]
mod tests {
    use bson::doc;
    use bookshelf_core::query::Filter;

    use super::*;

    const BOOKS: &str = "Book";

    async fn seeded() -> InMemoryStore {
        let store = InMemoryStore::builder().build().await.unwrap();
        for document in [
            doc! { "isbn": "1", "title": "A", "location": [{ "code": "X", "name": "old" }, { "code": "Y", "name": "keep" }] },
            doc! { "isbn": "1", "title": "A", "location": [{ "code": "Y", "name": "keep" }] },
            doc! { "isbn": "2", "title": "B" },
        ] {
            store.insert_document(Bson::Document(document), BOOKS).await.unwrap();
        }
        store
    }

    #[tokio::test]
    async fn insert_generates_ids_and_rejects_duplicates() {
        let store = InMemoryStore::new();

        let generated = store
            .insert_document(Bson::Document(doc! { "isbn": "1" }), BOOKS)
            .await
            .unwrap();
        assert!(ObjectId::parse_str(&generated.inserted_id).is_ok());

        let explicit = store
            .insert_document(Bson::Document(doc! { "id": "7", "isbn": "1" }), BOOKS)
            .await
            .unwrap();
        assert_eq!(explicit.inserted_id, "7");

        let duplicate = store
            .insert_document(Bson::Document(doc! { "id": "7" }), BOOKS)
            .await;
        assert!(matches!(duplicate, Err(DocumentStoreError::Backend(_))));

        let scalar = store.insert_document(Bson::Int32(1), BOOKS).await;
        assert!(matches!(scalar, Err(DocumentStoreError::InvalidDocument(_))));
    }

    #[tokio::test]
    async fn find_keeps_insertion_order() {
        let store = seeded().await;

        let found = store.find_documents(Filter::eq("isbn", "1"), BOOKS).await.unwrap();
        assert_eq!(found.len(), 2);
        assert_eq!(found[0].as_document().unwrap().get_array("location").unwrap().len(), 2);

        assert!(store.find_documents(Filter::eq("isbn", "9"), BOOKS).await.unwrap().is_empty());
        assert!(store.find_documents(Filter::eq("isbn", "1"), "Missing").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn update_counts_only_changed_documents() {
        let store = seeded().await;

        let renamed = store
            .update_documents(
                Filter::eq("isbn", "1"),
                Update::builder().set("title", "Z").build(),
                BOOKS,
            )
            .await
            .unwrap();
        assert_eq!(renamed, UpdateResult { matched_count: 2, modified_count: 2 });

        let unchanged = store
            .update_documents(
                Filter::eq("isbn", "1"),
                Update::builder().set("title", "Z").build(),
                BOOKS,
            )
            .await
            .unwrap();
        assert_eq!(unchanged, UpdateResult { matched_count: 2, modified_count: 0 });
    }

    #[tokio::test]
    async fn positional_update_only_touches_matching_documents() {
        let store = seeded().await;

        let result = store
            .update_documents(
                Filter::eq("isbn", "1").and(Filter::eq("location.code", "X")),
                Update::builder().set_positional("location", "name", "new").build(),
                BOOKS,
            )
            .await
            .unwrap();
        assert_eq!(result.modified_count, 1);

        let found = store.find_documents(Filter::eq("location.name", "new"), BOOKS).await.unwrap();
        assert_eq!(found.len(), 1);
        assert!(store.find_documents(Filter::eq("location.name", "keep"), BOOKS).await.unwrap().len() == 2);
    }
}
