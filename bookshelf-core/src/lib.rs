//! Document store abstraction used by the bookshelf service.
//!
//! This crate provides:
//!
//! - **Document traits** ([`document`]) - Core traits for defining and serializing documents
//! - **Store backend abstraction** ([`backend`]) - Traits implemented by the memory and MongoDB backends
//! - **Filters** ([`query`]) - Equality filters over dotted field paths
//! - **Updates** ([`update`]) - `$set` style partial updates, including positional array updates
//! - **Collections interface** ([`collection`]) - Typed access to a single collection
//! - **Document store** ([`store`]) - Owns a backend and hands out collections
//! - **Error handling** ([`error`]) - Error and result types

#[allow(unused_extern_crates)]
extern crate self as bookshelf_core;

pub mod backend;
pub mod collection;
pub mod document;
pub mod error;
pub mod query;
pub mod store;
pub mod update;
