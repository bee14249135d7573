//! Partial-field update documents.
//!
//! An [`Update`] is an ordered list of `$set` assignments. Field paths are dotted
//! (`author.firstname`) and may contain the positional segment `$`
//! (`location.$.name`), which targets the first element of the array that
//! satisfied the update's filter.
//!
//! ```ignore
//! use bookshelf_core::update::Update;
//!
//! let update = Update::builder()
//!     .set("title", "New title")
//!     .set_positional("location", "name", "Main hall")
//!     .build();
//! ```

use bson::{Bson, Document};

use crate::error::{DocumentStoreError, DocumentStoreResult};

/// The positional path segment.
pub const POSITIONAL: &str = "$";

/// A single `$set` assignment.
#[derive(Debug, Clone, PartialEq)]
pub struct SetField {
    /// Dotted field path, possibly containing [`POSITIONAL`].
    pub path: String,
    /// The value to assign.
    pub value: Bson,
}

impl SetField {
    /// Splits the path into segments.
    pub fn segments(&self) -> impl Iterator<Item = &str> {
        self.path.split('.')
    }

    /// Splits a positional path into `(array_path, sub_path)`.
    ///
    /// Returns `Ok(None)` for non-positional paths.
    ///
    /// # Errors
    ///
    /// Returns [`DocumentStoreError::InvalidUpdate`] when the path contains more
    /// than one positional segment or starts with one.
    pub fn positional_split(&self) -> DocumentStoreResult<Option<(&str, &str)>> {
        let marker = format!(".{POSITIONAL}");
        let Some(index) = self.path.find(&marker) else {
            if self.path == POSITIONAL || self.path.starts_with("$.") {
                return Err(DocumentStoreError::InvalidUpdate(format!(
                    "positional operator cannot lead a path: {}",
                    self.path
                )));
            }
            return Ok(None);
        };

        let array = &self.path[..index];
        let rest = &self.path[index + marker.len()..];
        let sub = rest.strip_prefix('.').unwrap_or(rest);

        if sub.split('.').any(|segment| segment == POSITIONAL) {
            return Err(DocumentStoreError::InvalidUpdate(format!(
                "only one positional operator is allowed: {}",
                self.path
            )));
        }

        Ok(Some((array, sub)))
    }
}

/// An ordered set of field assignments applied to every matched document.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Update {
    /// The assignments, in application order.
    pub set: Vec<SetField>,
}

impl Update {
    /// Creates a new update builder.
    pub fn builder() -> UpdateBuilder {
        UpdateBuilder::default()
    }

    /// Returns `true` when any assignment uses the positional operator.
    pub fn is_positional(&self) -> bool {
        self.set
            .iter()
            .any(|field| field.segments().any(|segment| segment == POSITIONAL))
    }

    /// Renders the update as a `{"$set": {...}}` document.
    pub fn to_set_document(&self) -> Document {
        let fields = self
            .set
            .iter()
            .map(|field| (field.path.clone(), field.value.clone()))
            .collect::<Document>();

        let mut update = Document::new();
        update.insert("$set", fields);
        update
    }
}

#[derive(Debug, Clone, Default)]
pub struct UpdateBuilder {
    update: Update,
}

impl UpdateBuilder {
    /// Assigns `value` to the (dotted) field `path`.
    pub fn set(mut self, path: impl Into<String>, value: impl Into<Bson>) -> Self {
        self.update.set.push(SetField {
            path: path.into(),
            value: value.into(),
        });
        self
    }

    /// Assigns `value` to `field` of the first `array` element that matched the filter.
    pub fn set_positional(self, array: &str, field: &str, value: impl Into<Bson>) -> Self {
        self.set(format!("{array}.{POSITIONAL}.{field}"), value)
    }

    /// Builds the update.
    pub fn build(self) -> Update {
        self.update
    }
}

#[cfg(test)]
mod tests {
    use bson::doc;

    use super::*;

    #[test]
    fn set_document_keeps_assignment_order() {
        let update = Update::builder()
            .set("title", "T")
            .set("author.firstname", "A")
            .set_positional("location", "name", "Hall")
            .build();

        assert_eq!(
            update.to_set_document(),
            doc! { "$set": { "title": "T", "author.firstname": "A", "location.$.name": "Hall" } }
        );
        assert!(update.is_positional());
    }

    #[test]
    fn positional_split() {
        let plain = SetField { path: "author.lastname".into(), value: Bson::Null };
        assert_eq!(plain.positional_split().unwrap(), None);

        let positional = SetField { path: "location.$.name".into(), value: Bson::Null };
        assert_eq!(positional.positional_split().unwrap(), Some(("location", "name")));

        let twice = SetField { path: "a.$.b.$.c".into(), value: Bson::Null };
        assert!(matches!(twice.positional_split(), Err(DocumentStoreError::InvalidUpdate(_))));

        let leading = SetField { path: "$.name".into(), value: Bson::Null };
        assert!(leading.positional_split().is_err());
    }
}
