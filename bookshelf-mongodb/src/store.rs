use std::time::Duration;

use async_trait::async_trait;
use futures::TryStreamExt;
use bson::{Document, Bson, doc, oid::ObjectId};
use mongodb::{
    Client, Collection as MongoCollection,
    options::ClientOptions,
};
use bookshelf_core::{
    backend::{InsertResult, StoreBackend, StoreBackendBuilder, UpdateResult},
    error::{DocumentStoreError, DocumentStoreResult},
    query::{Expr, QueryVisitor},
    update::Update,
};

use crate::query::MongoQueryTranslator;

#[derive(Debug, Clone)]
pub struct MongoDbStore {
    client: Client,
    database: String,
}

impl MongoDbStore {
    pub fn new(client: Client, database: String) -> Self {
        Self { client, database }
    }

    pub fn builder(dsn: &str, database: &str) -> MongoDbStoreBuilder {
        MongoDbStoreBuilder::new(dsn, database)
    }

    /// Round-trips a `ping` command to the server.
    ///
    /// The driver connects lazily, so this is the first point at which an
    /// unreachable server is noticed.
    pub async fn ping(&self) -> DocumentStoreResult<()> {
        self.client
            .database(&self.database)
            .run_command(doc! { "ping": 1 })
            .await
            .map_err(|e| DocumentStoreError::Backend(e.to_string()))?;

        Ok(())
    }

    fn get_collection(&self, collection_name: &str) -> MongoCollection<Document> {
        self.client
            .database(&self.database)
            .collection(collection_name)
    }

    /// Moves the `id` key to `_id`, parsing 24-hex ids as ObjectIds.
    ///
    /// An empty or missing `id` is dropped so the driver generates one.
    fn prepare_document(&self, document: Bson) -> DocumentStoreResult<Document> {
        let Bson::Document(mut document) = document else {
            return Err(DocumentStoreError::InvalidDocument("Expected document".into()));
        };

        let id = match document.remove("id") {
            Some(Bson::String(id)) if id.is_empty() => None,
            Some(Bson::String(id)) => Some(match ObjectId::parse_str(&id) {
                Ok(oid) => Bson::ObjectId(oid),
                Err(_) => Bson::String(id),
            }),
            Some(other) => Some(other),
            None => None,
        };

        Ok(match id {
            Some(id) => Document::from_iter(
                std::iter::once(("_id".to_string(), id)).chain(document),
            ),
            None => document,
        })
    }

    /// Inverse of [`prepare_document`](Self::prepare_document): `_id` becomes a string `id`.
    fn restore_document(&self, document: Document) -> Bson {
        let mut restored = Document::new();

        for (key, value) in document {
            if key == "_id" {
                restored.insert("id", id_to_string(value));
            } else {
                restored.insert(key, value);
            }
        }

        Bson::Document(restored)
    }

    async fn close(self) -> DocumentStoreResult<()> {
        self.client.shutdown().await;

        Ok(())
    }
}

fn id_to_string(id: Bson) -> String {
    match id {
        Bson::ObjectId(oid) => oid.to_hex(),
        Bson::String(id) => id,
        other => other.to_string(),
    }
}

#[async_trait]
impl StoreBackend for MongoDbStore {
    async fn insert_document(&self, document: Bson, collection: &str) -> DocumentStoreResult<InsertResult> {
        let result = self.get_collection(collection)
            .insert_one(self.prepare_document(document)?)
            .await
            .map_err(|e| DocumentStoreError::Backend(e.to_string()))?;

        Ok(InsertResult { inserted_id: id_to_string(result.inserted_id) })
    }

    async fn find_documents(&self, filter: Expr, collection: &str) -> DocumentStoreResult<Vec<Bson>> {
        Ok(
            self.get_collection(collection)
                .find(MongoQueryTranslator.visit_expr(&filter)?)
                .await
                .map_err(|e| DocumentStoreError::Backend(e.to_string()))?
                .try_collect::<Vec<Document>>()
                .await
                .map_err(|e| DocumentStoreError::Backend(e.to_string()))?
                .into_iter()
                .map(|doc| self.restore_document(doc))
                .collect()
        )
    }

    async fn update_documents(
        &self,
        filter: Expr,
        update: Update,
        collection: &str,
    ) -> DocumentStoreResult<UpdateResult> {
        for field in &update.set {
            field.positional_split()?;
        }

        let result = self.get_collection(collection)
            .update_many(
                MongoQueryTranslator.visit_expr(&filter)?,
                update.to_set_document(),
            )
            .await
            .map_err(|e| DocumentStoreError::Backend(e.to_string()))?;

        Ok(UpdateResult {
            matched_count: result.matched_count,
            modified_count: result.modified_count,
        })
    }

    async fn shutdown(self) -> DocumentStoreResult<()> {
        self.close().await
    }
}

pub struct MongoDbStoreBuilder {
    dsn: String,
    database: String,
    connect_timeout: Option<Duration>,
}

impl MongoDbStoreBuilder {
    pub fn new(dsn: &str, database: &str) -> Self {
        Self {
            dsn: dsn.to_string(),
            database: database.to_string(),
            connect_timeout: None,
        }
    }

    /// Bounds both the TCP connect and server selection.
    pub fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = Some(timeout);
        self
    }
}

#[async_trait]
impl StoreBackendBuilder for MongoDbStoreBuilder {
    type Backend = MongoDbStore;

    async fn build(self) -> DocumentStoreResult<Self::Backend> {
        let mut options = ClientOptions::parse(&self.dsn)
            .await
            .map_err(|e| DocumentStoreError::Initialization(e.to_string()))?;

        if let Some(timeout) = self.connect_timeout {
            options.connect_timeout = Some(timeout);
            options.server_selection_timeout = Some(timeout);
        }

        Ok(MongoDbStore::new(
            Client::with_options(options)
                .map_err(|e| DocumentStoreError::Initialization(e.to_string()))?,
            self.database,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn offline_store() -> MongoDbStore {
        // Client construction does not touch the network.
        MongoDbStore::builder("mongodb://localhost:27017", "NewBook")
            .build()
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn prepare_moves_id_to_object_id() {
        let store = offline_store().await;
        let oid = ObjectId::new();

        let prepared = store
            .prepare_document(Bson::Document(doc! { "id": oid.to_hex(), "isbn": "1" }))
            .unwrap();

        assert_eq!(prepared, doc! { "_id": oid, "isbn": "1" });
    }

    #[tokio::test]
    async fn prepare_keeps_plain_ids_and_drops_empty_ones() {
        let store = offline_store().await;

        let plain = store
            .prepare_document(Bson::Document(doc! { "id": "1", "isbn": "1" }))
            .unwrap();
        assert_eq!(plain, doc! { "_id": "1", "isbn": "1" });

        let empty = store
            .prepare_document(Bson::Document(doc! { "id": "", "isbn": "1" }))
            .unwrap();
        assert_eq!(empty, doc! { "isbn": "1" });
    }

    #[tokio::test]
    async fn restore_renders_object_ids_as_hex() {
        let store = offline_store().await;
        let oid = ObjectId::new();

        let restored = store.restore_document(doc! { "_id": oid, "title": "T" });

        assert_eq!(restored, Bson::Document(doc! { "id": oid.to_hex(), "title": "T" }));
    }

    #[tokio::test]
    async fn malformed_uri_is_an_initialization_error() {
        let result = MongoDbStore::builder("not-a-uri", "NewBook").build().await;

        assert!(matches!(result, Err(DocumentStoreError::Initialization(_))));
    }
}
