//! Book resource types.

use serde::{Deserialize, Serialize};

use bookshelf_core::document::Document;

/// A book record, as exchanged over HTTP and stored in the `Book` collection.
///
/// Missing fields decode to their defaults, so a partial JSON body always
/// produces a `Book`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Book {
    #[serde(skip_serializing_if = "String::is_empty")]
    pub id: String,
    pub isbn: String,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author: Option<Author>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub location: Vec<Location>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Author {
    pub firstname: String,
    pub lastname: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Location {
    pub code: String,
    pub name: String,
}

impl Document for Book {
    fn collection_name() -> &'static str {
        "Book"
    }
}

/// Title and author replacement applied by the update endpoints.
///
/// Built from a request body; the author is mandatory.
#[derive(Debug, Clone, PartialEq)]
pub struct BookChanges {
    pub title: String,
    pub author: Author,
}

impl BookChanges {
    /// Extracts the changes from a decoded body, or `None` when it carries no author.
    pub fn from_book(book: Book) -> Option<Self> {
        let author = book.author?;

        Some(Self {
            title: book.title,
            author,
        })
    }
}

/// The two records the in-memory catalog starts with.
pub fn seed_books() -> Vec<Book> {
    vec![
        Book {
            id: "1".into(),
            isbn: "23424".into(),
            title: "Book One".into(),
            author: Some(Author {
                firstname: "John".into(),
                lastname: "Doe".into(),
            }),
            location: vec![],
        },
        Book {
            id: "2".into(),
            isbn: "5435543".into(),
            title: "Book Two".into(),
            author: Some(Author {
                firstname: "Steve".into(),
                lastname: "Smith".into(),
            }),
            location: vec![],
        },
    ]
}
