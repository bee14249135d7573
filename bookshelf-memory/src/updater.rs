//! `$set` application for in-memory documents.

use bson::{Bson, Document};

use bookshelf_core::{
    error::{DocumentStoreError, DocumentStoreResult},
    query::Expr,
    update::Update,
};

use crate::evaluator::path_matches;

/// Applies every assignment of `update` to `document`.
///
/// `filter` is the filter the document matched; positional assignments resolve
/// against its conditions on the target array.
pub(crate) fn apply_update(document: &mut Document, filter: &Expr, update: &Update) -> DocumentStoreResult<()> {
    for field in &update.set {
        let path = match field.positional_split()? {
            Some((array, sub)) => {
                let index = matched_position(document, array, filter)?;
                if sub.is_empty() {
                    format!("{array}.{index}")
                } else {
                    format!("{array}.{index}.{sub}")
                }
            }
            None => field.path.clone(),
        };

        let segments = path.split('.').collect::<Vec<_>>();
        set_path(document, &segments, field.value.clone())?;
    }

    Ok(())
}

/// Index of the first element of `array` satisfying every filter condition on it.
fn matched_position(document: &Document, array: &str, filter: &Expr) -> DocumentStoreResult<usize> {
    let no_match = || {
        DocumentStoreError::InvalidUpdate(format!(
            "the positional operator did not find the match needed from the query on '{array}'"
        ))
    };

    let conditions = filter.conditions_under(array);
    if conditions.is_empty() {
        return Err(no_match());
    }

    let items = get_path(document, array)
        .and_then(Bson::as_array)
        .ok_or_else(no_match)?;

    items
        .iter()
        .position(|item| {
            conditions.iter().all(|(sub, value)| {
                let segments = sub.split('.').collect::<Vec<_>>();
                path_matches(item, &segments, value)
            })
        })
        .ok_or_else(no_match)
}

fn get_path<'a>(document: &'a Document, path: &str) -> Option<&'a Bson> {
    let mut segments = path.split('.');
    let mut current = document.get(segments.next()?)?;

    for segment in segments {
        current = match current {
            Bson::Document(doc) => doc.get(segment)?,
            Bson::Array(items) => items.get(segment.parse::<usize>().ok()?)?,
            _ => return None,
        };
    }

    Some(current)
}

fn set_path(document: &mut Document, segments: &[&str], value: Bson) -> DocumentStoreResult<()> {
    let Some((head, rest)) = segments.split_first() else {
        return Err(DocumentStoreError::InvalidUpdate("empty field path".into()));
    };
    if head.is_empty() {
        return Err(DocumentStoreError::InvalidUpdate("empty path segment".into()));
    }

    if rest.is_empty() {
        document.insert(*head, value);
        return Ok(());
    }

    if !document.contains_key(*head) {
        document.insert(*head, Document::new());
    }

    match document.get_mut(*head) {
        Some(child) => set_in_value(child, head, rest, value),
        None => Err(DocumentStoreError::InvalidUpdate(format!("cannot resolve '{head}'"))),
    }
}

fn set_in_value(target: &mut Bson, name: &str, segments: &[&str], value: Bson) -> DocumentStoreResult<()> {
    match target {
        Bson::Document(doc) => set_path(doc, segments, value),
        Bson::Array(items) => {
            let Some((head, rest)) = segments.split_first() else {
                return Err(DocumentStoreError::InvalidUpdate("empty field path".into()));
            };
            let index = head.parse::<usize>().map_err(|_| {
                DocumentStoreError::InvalidUpdate(format!("cannot create field '{head}' in array '{name}'"))
            })?;

            if index >= items.len() {
                items.resize(index + 1, Bson::Null);
            }

            if rest.is_empty() {
                items[index] = value;
                return Ok(());
            }

            if matches!(items[index], Bson::Null) {
                items[index] = Bson::Document(Document::new());
            }

            set_in_value(&mut items[index], head, rest, value)
        }
        other => Err(DocumentStoreError::InvalidUpdate(format!(
            "cannot create field '{}' in element {{{name}: {other}}}",
            segments.first().copied().unwrap_or_default()
        ))),
    }
}
