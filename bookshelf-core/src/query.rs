//! Filter expressions for selecting documents.
//!
//! Filters are small expression trees built with [`Filter`] and translated by each
//! backend through a [`QueryVisitor`]:
//!
//! ```ignore
//! use bookshelf_core::query::Filter;
//!
//! let filter = Filter::eq("isbn", "23424").and(Filter::eq("location.code", "A1"));
//! ```
//!
//! Field names may be dotted paths (`author.lastname`). When a path crosses an
//! array, the comparison matches if any element of the array matches, the way
//! document databases evaluate `location.code`.

use bson::Bson;

use crate::error::DocumentStoreError;

/// A filter expression for querying documents.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    /// Logical AND of multiple expressions (all must match).
    And(Vec<Expr>),
    /// Field equality comparison.
    Eq {
        /// The (possibly dotted) field path to compare.
        field: String,
        /// The value to compare against.
        value: Bson,
    },
}

impl Expr {
    /// Combines this expression with another using logical AND.
    ///
    /// If this expression is already an AND, the other expression is appended
    /// to the list. Otherwise, a new AND expression is created.
    pub fn and(self, other: Expr) -> Self {
        match self {
            Expr::And(mut list) => {
                list.push(other);
                Expr::And(list)
            }
            _ => Expr::And(vec![self, other]),
        }
    }

    /// Returns every equality comparison in this expression whose field lies
    /// under `prefix.` together with the remaining sub-path.
    ///
    /// Backends resolving a positional update (`location.$.name`) use this to
    /// find the conditions that decide which array element matched.
    pub fn conditions_under<'a>(&'a self, prefix: &str) -> Vec<(&'a str, &'a Bson)> {
        match self {
            Expr::And(exprs) => exprs
                .iter()
                .flat_map(|expr| expr.conditions_under(prefix))
                .collect(),
            Expr::Eq { field, value } => field
                .strip_prefix(prefix)
                .and_then(|rest| rest.strip_prefix('.'))
                .map(|rest| vec![(rest, value)])
                .unwrap_or_default(),
        }
    }
}

/// Helper struct for constructing filter expressions.
pub struct Filter;

impl Filter {
    /// Matches documents where the field equals the specified value.
    pub fn eq(field: impl Into<String>, value: impl Into<Bson>) -> Expr {
        Expr::Eq {
            field: field.into(),
            value: value.into(),
        }
    }

    /// Combines multiple expressions such that all must match.
    pub fn and(exprs: impl IntoIterator<Item = Expr>) -> Expr {
        Expr::And(exprs.into_iter().collect())
    }
}

/// Visitor over filter expressions, implemented by each backend to translate or
/// evaluate a filter.
pub trait QueryVisitor {
    type Output;
    type Error: Into<DocumentStoreError>;

    fn visit_and(&mut self, exprs: &[Expr]) -> Result<Self::Output, Self::Error>;
    fn visit_eq(&mut self, field: &str, value: &Bson) -> Result<Self::Output, Self::Error>;

    fn visit_expr(&mut self, expr: &Expr) -> Result<Self::Output, Self::Error> {
        match expr {
            Expr::And(exprs) => self.visit_and(exprs),
            Expr::Eq { field, value } => self.visit_eq(field, value),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn and_flattens_into_existing_list() {
        let expr = Filter::eq("isbn", "1")
            .and(Filter::eq("location.code", "A"))
            .and(Filter::eq("title", "T"));

        match expr {
            Expr::And(list) => assert_eq!(list.len(), 3),
            other => panic!("expected And, got {other:?}"),
        }
    }

    #[test]
    fn conditions_under_strips_the_array_prefix() {
        let expr = Filter::eq("isbn", "1").and(Filter::eq("location.code", "A"));

        let conditions = expr.conditions_under("location");
        assert_eq!(conditions, vec![("code", &Bson::String("A".into()))]);
        assert!(expr.conditions_under("author").is_empty());
        assert!(Filter::eq("locations.code", "A").conditions_under("location").is_empty());
    }
}
