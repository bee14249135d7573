//! In-memory document storage backend for bookshelf.
//!
//! This crate provides a thread-safe, in-memory implementation of the
//! `StoreBackend` trait. It understands the same filters and updates as the
//! MongoDB backend (dotted paths, array fan-out, positional `$set`) and is used
//! for development and as the test double for MongoDB.
//!
//! # Quick Start
//!
//! ```ignore
//! use bookshelf_core::{backend::StoreBackendBuilder, store::DocumentStore};
//! use bookshelf_memory::InMemoryStore;
//!
//! #[tokio::main]
//! async fn main() {
//!     let store = DocumentStore::new(InMemoryStore::builder().build().await.unwrap());
//!     let books = store.typed_collection::<Book>();
//!
//!     books.insert_one(&book).await.unwrap();
//! }
//! ```

#[allow(unused_extern_crates)]
extern crate self as bookshelf_memory;

pub mod store;
mod evaluator;
mod updater;

pub use store::{InMemoryStore, InMemoryStoreBuilder};
