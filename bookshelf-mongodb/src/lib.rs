//! MongoDB backend implementation for bookshelf.
//!
//! This crate provides a MongoDB-based implementation of the `StoreBackend`
//! trait. Filters become plain field-match documents and updates are sent as
//! `update_many` with a `$set` document, so positional assignments
//! (`location.$.name`) are resolved by the server.
//!
//! # Connection
//!
//! The driver connects lazily; [`MongoDbStore::ping`] forces a round trip.
//!
//! # Example
//!
//! ```ignore
//! use bookshelf_core::backend::StoreBackendBuilder;
//! use bookshelf_mongodb::MongoDbStore;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let store = MongoDbStore::builder("mongodb://mongo-service:27017", "NewBook")
//!         .connect_timeout(std::time::Duration::from_secs(10))
//!         .build()
//!         .await?;
//!     store.ping().await?;
//!
//!     Ok(())
//! }
//! ```

#[allow(unused_extern_crates)]
extern crate self as bookshelf_mongodb;

pub mod store;
pub mod query;

pub use store::{MongoDbStore, MongoDbStoreBuilder};
