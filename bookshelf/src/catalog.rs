//! Process-wide in-memory book list.
//!
//! Independent of the document store: books created through the API never show
//! up here, and these books are never written to the store.

use mea::rwlock::RwLock;
use tracing::debug;

use crate::model::{Book, seed_books};

/// Ordered, lock-guarded list of books exposing only listing and deletion.
#[derive(Debug)]
pub struct BookCatalog {
    books: RwLock<Vec<Book>>,
}

impl BookCatalog {
    pub fn new(books: Vec<Book>) -> Self {
        Self {
            books: RwLock::new(books),
        }
    }

    /// A catalog holding the two startup records.
    pub fn seeded() -> Self {
        Self::new(seed_books())
    }

    /// Returns the current list as-is.
    pub async fn list_all(&self) -> Vec<Book> {
        self.books.read().await.clone()
    }

    /// Removes the first book whose id equals `id` and returns the resulting list.
    ///
    /// The list is unchanged when no book matches. Removal and snapshot happen
    /// under the same write lock.
    pub async fn delete_by_id(&self, id: &str) -> Vec<Book> {
        let mut books = self.books.write().await;

        if let Some(index) = books.iter().position(|book| book.id == id) {
            books.remove(index);
            debug!(id, remaining = books.len(), "removed book from catalog");
        }

        books.clone()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;

    fn ids(books: &[Book]) -> Vec<&str> {
        books.iter().map(|book| book.id.as_str()).collect()
    }

    fn book(id: &str) -> Book {
        Book { id: id.into(), ..Default::default() }
    }

    #[tokio::test]
    async fn seeded_catalog_holds_two_books() {
        let catalog = BookCatalog::seeded();

        let books = catalog.list_all().await;
        assert_eq!(ids(&books), vec!["1", "2"]);
        assert_eq!(books[1].isbn, "5435543");
    }

    #[tokio::test]
    async fn delete_preserves_order_of_the_rest() {
        let catalog = BookCatalog::new(vec![book("a"), book("b"), book("c")]);

        let remaining = catalog.delete_by_id("b").await;

        assert_eq!(ids(&remaining), vec!["a", "c"]);
        assert_eq!(catalog.list_all().await, remaining);
    }

    #[tokio::test]
    async fn delete_removes_only_the_first_match() {
        let catalog = BookCatalog::new(vec![book("a"), book("x"), book("x")]);

        let remaining = catalog.delete_by_id("x").await;

        assert_eq!(ids(&remaining), vec!["a", "x"]);
    }

    #[tokio::test]
    async fn deleting_an_absent_id_changes_nothing() {
        let catalog = BookCatalog::seeded();
        let before = catalog.list_all().await;

        let after = catalog.delete_by_id("missing").await;

        assert_eq!(after, before);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_deletes_each_remove_one_book() {
        let catalog = Arc::new(BookCatalog::new((0..64).map(|i| book(&i.to_string())).collect()));

        let handles = (0..64)
            .map(|i| {
                let catalog = catalog.clone();
                tokio::spawn(async move { catalog.delete_by_id(&i.to_string()).await })
            })
            .collect::<Vec<_>>();

        for handle in handles {
            handle.await.unwrap();
        }

        assert!(catalog.list_all().await.is_empty());
    }
}
