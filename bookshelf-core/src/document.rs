//! Core traits for document representation and serialization.
//!
//! Every type stored through a [`TypedCollection`](crate::collection::TypedCollection)
//! implements [`Document`]; [`DocumentExt`] adds the BSON conversions the
//! collection uses when talking to a backend.

use bson::{Bson, de::deserialize_from_bson, ser::serialize_to_bson};
use serde::{Deserialize, Serialize};

use crate::error::{DocumentStoreError, DocumentStoreResult};

/// Core trait that all documents stored in a document store must implement.
///
/// Identifiers are carried in the document body under the `id` key; backends map
/// that key to their native identifier (for MongoDB, `_id`).
///
/// # Example
///
/// ```ignore
/// use bookshelf_core::document::Document;
/// use serde::{Serialize, Deserialize};
///
/// #[derive(Debug, Clone, Default, Serialize, Deserialize)]
/// #[serde(default)]
/// pub struct Shelf {
///     pub id: String,
///     pub label: String,
/// }
///
/// impl Document for Shelf {
///     fn collection_name() -> &'static str {
///         "Shelf"
///     }
/// }
/// ```
pub trait Document: Serialize + for<'de> Deserialize<'de> + Send + Sync + Clone + 'static {
    /// Returns the name of the collection this document belongs to.
    fn collection_name() -> &'static str;
}

/// Extension trait providing BSON conversions for documents.
///
/// Automatically implemented for all types that implement [`Document`].
pub trait DocumentExt: Document {
    /// Converts this document to a BSON document for storage.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails or the document does not serialize
    /// to a BSON document (e.g. a newtype around a string).
    fn to_bson(&self) -> DocumentStoreResult<Bson>;

    /// Creates a document from a stored BSON value.
    ///
    /// # Errors
    ///
    /// Returns an error if deserialization fails.
    fn from_bson(bson: Bson) -> DocumentStoreResult<Self>;
}

impl<D: Document> DocumentExt for D {
    fn to_bson(&self) -> DocumentStoreResult<Bson> {
        match serialize_to_bson(self)? {
            bson @ Bson::Document(_) => Ok(bson),
            other => Err(DocumentStoreError::InvalidDocument(format!(
                "expected a document for collection {}, got {:?}",
                D::collection_name(),
                other.element_type()
            ))),
        }
    }

    fn from_bson(bson: Bson) -> DocumentStoreResult<Self> {
        Ok(deserialize_from_bson(bson)?)
    }
}
