//! Filter translation to MongoDB query syntax.

use bson::{Document, Bson, doc};

use bookshelf_core::{
    query::{QueryVisitor, Expr},
    error::DocumentStoreError,
};


/// Translates filter expressions into MongoDB query documents.
///
/// A conjunction whose branches touch distinct fields is flattened into a single
/// document (`{ "isbn": .., "location.code": .. }`) so positional updates see the
/// array condition at the top level; otherwise it becomes `$and`.
pub(crate) struct MongoQueryTranslator;

impl QueryVisitor for MongoQueryTranslator {
    type Output = Document;
    type Error = DocumentStoreError;

    fn visit_and(&mut self, exprs: &[Expr]) -> Result<Self::Output, Self::Error> {
        let branches = exprs
            .iter()
            .map(|expr| self.visit_expr(expr))
            .collect::<Result<Vec<_>, _>>()?;

        let mut merged = Document::new();
        for branch in &branches {
            for (key, value) in branch {
                if key.starts_with('$') || merged.contains_key(key) {
                    return Ok(doc! { "$and": branches });
                }
                merged.insert(key.clone(), value.clone());
            }
        }

        Ok(merged)
    }

    fn visit_eq(&mut self, field: &str, value: &Bson) -> Result<Self::Output, Self::Error> {
        Ok(doc! { field: value.clone() })
    }
}
