//! HTTP router and handlers.
//!
//! | Method | Path | Source |
//! |---|---|---|
//! | GET | `/api/books` | in-memory catalog |
//! | GET | `/api/books/{isbn}` | document store |
//! | POST | `/api/books` | document store |
//! | PUT | `/api/books/{isbn}` | document store |
//! | PUT | `/api/books/{isbn}/{code}/{new_location}` | document store |
//! | DELETE | `/api/books/{id}` | in-memory catalog |
//!
//! Request bodies are decoded from the raw bytes, so no `Content-Type` is required.

use std::sync::Arc;

use axum::{
    Json, Router,
    body::Bytes,
    extract::{Path, State},
    routing::{get, put},
};
use bookshelf_core::backend::{InsertResult, StoreBackend};
use serde::Serialize;
use tower_http::trace::TraceLayer;

use crate::{
    catalog::BookCatalog,
    error::ApiError,
    model::{Book, BookChanges},
    repository::BookRepository,
};

/// Shared handler state: the store-backed repository and the in-memory catalog.
pub struct AppState<B: StoreBackend> {
    pub books: Arc<BookRepository<B>>,
    pub catalog: Arc<BookCatalog>,
}

impl<B: StoreBackend> AppState<B> {
    pub fn new(books: Arc<BookRepository<B>>, catalog: Arc<BookCatalog>) -> Self {
        Self { books, catalog }
    }
}

impl<B: StoreBackend> Clone for AppState<B> {
    fn clone(&self) -> Self {
        Self {
            books: self.books.clone(),
            catalog: self.catalog.clone(),
        }
    }
}

/// Builds the full application router.
pub fn router<B: StoreBackend + 'static>(state: AppState<B>) -> Router {
    Router::new()
        .merge(health_routes())
        .nest("/api", book_routes(state))
        .layer(TraceLayer::new_for_http())
}

fn book_routes<B: StoreBackend + 'static>(state: AppState<B>) -> Router {
    Router::new()
        .route("/books", get(list_books::<B>).post(create_book::<B>))
        .route(
            "/books/{key}",
            get(find_books::<B>)
                .put(update_book::<B>)
                .delete(delete_book::<B>),
        )
        .route("/books/{isbn}/{code}/{new_location}", put(update_book_location::<B>))
        .with_state(state)
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

fn health_routes() -> Router {
    Router::new().route("/health", get(health_handler))
}

async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// Decodes a request body as a book; an empty body is an empty book.
fn decode_book(body: &[u8]) -> Result<Book, ApiError> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(Book::default());
    }

    serde_json::from_slice(body).map_err(|e| ApiError::MalformedBody(e.to_string()))
}

fn decode_changes(body: &[u8]) -> Result<BookChanges, ApiError> {
    BookChanges::from_book(decode_book(body)?).ok_or(ApiError::MissingAuthor)
}

async fn list_books<B: StoreBackend + 'static>(State(state): State<AppState<B>>) -> Json<Vec<Book>> {
    Json(state.catalog.list_all().await)
}

async fn find_books<B: StoreBackend + 'static>(
    State(state): State<AppState<B>>,
    Path(isbn): Path<String>,
) -> Result<Json<Vec<Book>>, ApiError> {
    Ok(Json(state.books.find_by_isbn(&isbn).await?))
}

async fn create_book<B: StoreBackend + 'static>(
    State(state): State<AppState<B>>,
    body: Bytes,
) -> Result<Json<InsertResult>, ApiError> {
    let book = decode_book(&body)?;

    Ok(Json(state.books.insert_one(&book).await?))
}

async fn update_book<B: StoreBackend + 'static>(
    State(state): State<AppState<B>>,
    Path(isbn): Path<String>,
    body: Bytes,
) -> Result<Json<u64>, ApiError> {
    let changes = decode_changes(&body)?;

    Ok(Json(state.books.update_by_isbn(&isbn, &changes).await?))
}

async fn update_book_location<B: StoreBackend + 'static>(
    State(state): State<AppState<B>>,
    Path((isbn, code, new_location)): Path<(String, String, String)>,
    body: Bytes,
) -> Result<Json<u64>, ApiError> {
    let changes = decode_changes(&body)?;

    Ok(Json(
        state
            .books
            .update_by_isbn_and_location_code(&isbn, &code, &new_location, &changes)
            .await?,
    ))
}

async fn delete_book<B: StoreBackend + 'static>(
    State(state): State<AppState<B>>,
    Path(id): Path<String>,
) -> Json<Vec<Book>> {
    Json(state.catalog.delete_by_id(&id).await)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_body_decodes_to_an_empty_book() {
        assert_eq!(decode_book(b"").unwrap(), Book::default());
        assert_eq!(decode_book(b"  \n").unwrap(), Book::default());
    }

    #[test]
    fn malformed_body_is_rejected() {
        assert!(matches!(decode_book(b"{\"isbn\": "), Err(ApiError::MalformedBody(_))));
        assert!(matches!(decode_book(b"[1, 2]"), Err(ApiError::MalformedBody(_))));
    }

    #[test]
    fn changes_need_an_author() {
        assert!(matches!(decode_changes(b"{\"title\": \"T\"}"), Err(ApiError::MissingAuthor)));
        assert!(decode_changes(b"{\"title\": \"T\", \"author\": {}}").is_ok());
    }
}
