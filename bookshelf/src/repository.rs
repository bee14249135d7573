//! Book operations against the document store.
//!
//! Every call runs under the repository's operation timeout; an elapsed timeout
//! surfaces as [`DocumentStoreError::Timeout`]. Nothing is retried.

use std::{future::Future, time::Duration};

use bookshelf_core::{
    backend::{InsertResult, StoreBackend},
    error::{DocumentStoreError, DocumentStoreResult},
    query::Filter,
    store::DocumentStore,
    update::{Update, UpdateBuilder},
};
use tracing::instrument;

use crate::model::{Book, BookChanges};

/// Per-call deadline used when none is configured.
pub const DEFAULT_OPERATION_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug)]
pub struct BookRepository<B: StoreBackend> {
    store: DocumentStore<B>,
    timeout: Duration,
}

impl<B: StoreBackend> BookRepository<B> {
    pub fn new(store: DocumentStore<B>, timeout: Duration) -> Self {
        Self { store, timeout }
    }

    async fn bounded<T>(&self, operation: impl Future<Output = DocumentStoreResult<T>>) -> DocumentStoreResult<T> {
        tokio::time::timeout(self.timeout, operation)
            .await
            .map_err(|_| DocumentStoreError::Timeout(self.timeout))?
    }

    /// All books with the given ISBN, in store order.
    #[instrument(skip(self))]
    pub async fn find_by_isbn(&self, isbn: &str) -> DocumentStoreResult<Vec<Book>> {
        self.bounded(
            self.store
                .typed_collection::<Book>()
                .find(Filter::eq("isbn", isbn)),
        )
        .await
    }

    /// Stores `book` as a new document.
    #[instrument(skip_all, fields(isbn = %book.isbn))]
    pub async fn insert_one(&self, book: &Book) -> DocumentStoreResult<InsertResult> {
        self.bounded(self.store.typed_collection::<Book>().insert_one(book))
            .await
    }

    /// Replaces title and author of every book with the given ISBN.
    ///
    /// Returns the number of documents that changed.
    #[instrument(skip(self, changes))]
    pub async fn update_by_isbn(&self, isbn: &str, changes: &BookChanges) -> DocumentStoreResult<u64> {
        let update = Self::title_and_author(changes).build();

        let result = self
            .bounded(
                self.store
                    .typed_collection::<Book>()
                    .update_many(Filter::eq("isbn", isbn), update),
            )
            .await?;

        Ok(result.modified_count)
    }

    /// Replaces title and author of every book with the given ISBN holding a
    /// location with the given code, and renames the first such location.
    ///
    /// Returns the number of documents that changed.
    #[instrument(skip(self, changes))]
    pub async fn update_by_isbn_and_location_code(
        &self,
        isbn: &str,
        code: &str,
        new_location_name: &str,
        changes: &BookChanges,
    ) -> DocumentStoreResult<u64> {
        let filter = Filter::eq("isbn", isbn).and(Filter::eq("location.code", code));
        let update = Self::title_and_author(changes)
            .set_positional("location", "name", new_location_name)
            .build();

        let result = self
            .bounded(
                self.store
                    .typed_collection::<Book>()
                    .update_many(filter, update),
            )
            .await?;

        Ok(result.modified_count)
    }

    fn title_and_author(changes: &BookChanges) -> UpdateBuilder {
        Update::builder()
            .set("title", changes.title.as_str())
            .set("author.firstname", changes.author.firstname.as_str())
            .set("author.lastname", changes.author.lastname.as_str())
    }
}

#[cfg(test)]
mod tests {
    use bookshelf_memory::InMemoryStore;

    use super::*;
    use crate::model::{Author, Location};

    fn repository() -> BookRepository<InMemoryStore> {
        BookRepository::new(DocumentStore::new(InMemoryStore::new()), DEFAULT_OPERATION_TIMEOUT)
    }

    fn changes(title: &str) -> BookChanges {
        BookChanges {
            title: title.into(),
            author: Author { firstname: "New".into(), lastname: "Author".into() },
        }
    }

    fn shelved(isbn: &str, locations: &[(&str, &str)]) -> Book {
        Book {
            isbn: isbn.into(),
            title: "Original".into(),
            author: Some(Author { firstname: "Old".into(), lastname: "Author".into() }),
            location: locations
                .iter()
                .map(|(code, name)| Location { code: (*code).into(), name: (*name).into() })
                .collect(),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn find_without_matches_is_empty() {
        let repository = repository();

        assert!(repository.find_by_isbn("000").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn inserted_book_is_found_by_isbn() {
        let repository = repository();
        let book = shelved("999", &[("A1", "Attic")]);

        let result = repository.insert_one(&book).await.unwrap();
        let found = repository.find_by_isbn("999").await.unwrap();

        assert_eq!(found.len(), 1);
        assert_eq!(found[0].id, result.inserted_id);
        assert_eq!(Book { id: String::new(), ..found[0].clone() }, book);
    }

    #[tokio::test]
    async fn update_by_isbn_touches_every_match_and_nothing_else() {
        let repository = repository();
        for _ in 0..3 {
            repository.insert_one(&shelved("1", &[("A1", "Attic")])).await.unwrap();
        }
        repository.insert_one(&shelved("2", &[])).await.unwrap();

        let modified = repository.update_by_isbn("1", &changes("Renamed")).await.unwrap();
        assert_eq!(modified, 3);

        for book in repository.find_by_isbn("1").await.unwrap() {
            assert_eq!(book.title, "Renamed");
            assert_eq!(book.author.unwrap().firstname, "New");
            assert_eq!(book.location, vec![Location { code: "A1".into(), name: "Attic".into() }]);
        }
        assert_eq!(repository.find_by_isbn("2").await.unwrap()[0].title, "Original");
    }

    #[tokio::test]
    async fn location_rename_only_touches_the_matching_code() {
        let repository = repository();
        repository
            .insert_one(&shelved("1", &[("A1", "Attic"), ("B2", "Basement")]))
            .await
            .unwrap();
        repository.insert_one(&shelved("1", &[("C3", "Cellar")])).await.unwrap();

        let modified = repository
            .update_by_isbn_and_location_code("1", "B2", "Garage", &changes("Renamed"))
            .await
            .unwrap();
        assert_eq!(modified, 1);

        let books = repository.find_by_isbn("1").await.unwrap();
        assert_eq!(
            books[0].location,
            vec![
                Location { code: "A1".into(), name: "Attic".into() },
                Location { code: "B2".into(), name: "Garage".into() },
            ]
        );
        assert_eq!(books[0].title, "Renamed");
        assert_eq!(books[1].title, "Original");
        assert_eq!(books[1].location[0].name, "Cellar");
    }
}
