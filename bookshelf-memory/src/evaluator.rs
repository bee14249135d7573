//! Filter evaluation for in-memory documents.
//!
//! Dotted paths are resolved the way document databases resolve them: a segment
//! applied to an array fans out over its elements (or indexes into it when the
//! segment is numeric), and an equality matches if any reached value matches.

use std::collections::HashMap;

use bson::{Bson, oid::ObjectId};

use bookshelf_core::{
    error::{DocumentStoreError, DocumentStoreResult},
    query::{Expr, QueryVisitor},
};

/// Type-erased, comparable representation of BSON values.
///
/// Numeric types are normalized to `f64` so that `1`, `1i64` and `1.0` compare equal.
#[derive(Debug)]
pub(crate) enum Comparable<'a> {
    Null,
    Bool(bool),
    Number(f64),
    String(&'a str),
    ObjectId(ObjectId),
    Array(Vec<Comparable<'a>>),
    Map(HashMap<&'a str, Comparable<'a>>),
    /// Anything else (binary, regex, ...) never compares equal.
    Opaque,
}

impl<'a> From<&'a Bson> for Comparable<'a> {
    fn from(bson: &'a Bson) -> Self {
        match bson {
            Bson::Null => Comparable::Null,
            Bson::Boolean(value) => Comparable::Bool(*value),
            Bson::Int32(value) => Comparable::Number(*value as f64),
            Bson::Int64(value) => Comparable::Number(*value as f64),
            Bson::Double(value) => Comparable::Number(*value),
            Bson::String(value) => Comparable::String(value),
            Bson::ObjectId(value) => Comparable::ObjectId(*value),
            Bson::Array(arr) => Comparable::Array(arr.iter().map(Comparable::from).collect()),
            Bson::Document(doc) => Comparable::Map(
                doc.iter()
                    .map(|(k, v)| (k.as_str(), Comparable::from(v)))
                    .collect(),
            ),
            _ => Comparable::Opaque,
        }
    }
}

impl<'a> PartialEq for Comparable<'a> {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Comparable::Null, Comparable::Null) => true,
            (Comparable::Bool(a), Comparable::Bool(b)) => a == b,
            (Comparable::Number(a), Comparable::Number(b)) => a == b,
            (Comparable::String(a), Comparable::String(b)) => a == b,
            (Comparable::ObjectId(a), Comparable::ObjectId(b)) => a == b,
            (Comparable::Array(a), Comparable::Array(b)) => a == b,
            (Comparable::Map(a), Comparable::Map(b)) => a == b,
            _ => false,
        }
    }
}

/// Returns `true` if the value reached by `segments` from `value` equals `expected`.
pub(crate) fn path_matches(value: &Bson, segments: &[&str], expected: &Bson) -> bool {
    let Some((head, rest)) = segments.split_first() else {
        let expected = Comparable::from(expected);
        return match value {
            Bson::Array(items) => {
                Comparable::from(value) == expected
                    || items.iter().any(|item| Comparable::from(item) == expected)
            }
            _ => Comparable::from(value) == expected,
        };
    };

    match value {
        Bson::Document(doc) => match doc.get(*head) {
            Some(child) => path_matches(child, rest, expected),
            None => matches!(expected, Bson::Null),
        },
        Bson::Array(items) => {
            let indexed = head
                .parse::<usize>()
                .ok()
                .and_then(|index| items.get(index))
                .is_some_and(|item| path_matches(item, rest, expected));

            indexed
                || items
                    .iter()
                    .filter(|item| item.as_document().is_some())
                    .any(|item| path_matches(item, segments, expected))
        }
        _ => false,
    }
}

/// Evaluates filter expressions against a single document.
pub(crate) struct DocumentEvaluator<'a> {
    document: &'a Bson,
}

impl<'a> DocumentEvaluator<'a> {
    pub fn new(document: &'a Bson) -> Self {
        Self { document }
    }

    pub fn evaluate(&mut self, expr: &Expr) -> DocumentStoreResult<bool> {
        self.visit_expr(expr)
    }
}

impl<'a> QueryVisitor for DocumentEvaluator<'a> {
    type Output = bool;
    type Error = DocumentStoreError;

    fn visit_and(&mut self, exprs: &[Expr]) -> Result<Self::Output, Self::Error> {
        for expr in exprs {
            if !self.visit_expr(expr)? {
                return Ok(false);
            }
        }

        Ok(true)
    }

    fn visit_eq(&mut self, field: &str, value: &Bson) -> Result<Self::Output, Self::Error> {
        if self.document.as_document().is_none() {
            return Err(DocumentStoreError::InvalidDocument("expected document".into()));
        }

        let segments = field.split('.').collect::<Vec<_>>();

        Ok(path_matches(self.document, &segments, value))
    }
}

#[cfg(test)]
mod tests {
    use bson::{bson, doc};
    use bookshelf_core::query::Filter;

    use super::*;

    fn book() -> Bson {
        bson!({
            "isbn": "23424",
            "author": { "firstname": "John", "lastname": "Doe" },
            "location": [
                { "code": "A1", "name": "Attic" },
                { "code": "B2", "name": "Basement" }
            ],
            "copies": 3
        })
    }

    fn eval(expr: Expr) -> bool {
        DocumentEvaluator::new(&book()).evaluate(&expr).unwrap()
    }

    #[test]
    fn top_level_and_nested_equality() {
        assert!(eval(Filter::eq("isbn", "23424")));
        assert!(!eval(Filter::eq("isbn", "99999")));
        assert!(eval(Filter::eq("author.lastname", "Doe")));
        assert!(!eval(Filter::eq("author.lastname", "Smith")));
    }

    #[test]
    fn numbers_compare_across_widths() {
        assert!(eval(Filter::eq("copies", 3i64)));
        assert!(eval(Filter::eq("copies", 3.0)));
    }

    #[test]
    fn array_paths_match_any_element() {
        assert!(eval(Filter::eq("location.code", "B2")));
        assert!(!eval(Filter::eq("location.code", "C3")));
        assert!(eval(Filter::eq("location.1.code", "B2")));
        assert!(!eval(Filter::eq("location.0.code", "B2")));
    }

    #[test]
    fn missing_field_matches_null_only() {
        assert!(eval(Filter::eq("title", Bson::Null)));
        assert!(!eval(Filter::eq("title", "")));
    }

    #[test]
    fn and_requires_every_condition() {
        assert!(eval(Filter::eq("isbn", "23424").and(Filter::eq("location.code", "A1"))));
        assert!(!eval(Filter::eq("isbn", "23424").and(Filter::eq("location.code", "Z9"))));
    }

    #[test]
    fn non_document_is_rejected() {
        let scalar = Bson::String("nope".into());
        let result = DocumentEvaluator::new(&scalar).evaluate(&Filter::eq("isbn", "1"));
        assert!(matches!(result, Err(DocumentStoreError::InvalidDocument(_))));

        let empty = Bson::Document(doc! {});
        assert!(!DocumentEvaluator::new(&empty).evaluate(&Filter::eq("isbn", "1")).unwrap());
    }
}
