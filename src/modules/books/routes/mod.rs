//! HTTP handlers for `/api/books`.
//!
//! Every handler runs validate, then invoke the store, then shape the
//! response. Failures are reported through `AppError`, which answers 200 with
//! the literal text below.

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    routing::get,
    Json, Router,
};
use bookshelf_db::ObjectId;
use bookshelf_http::{AppError, Payload};

use super::models::{AddComment, BookDetail, BookSummary, CreateBook, CreatedBook};
use super::store::BookStore;

pub const MISSING_TITLE: &str = "missing required field title";
pub const MISSING_COMMENT: &str = "missing required field comment";
pub const NO_BOOK: &str = "no book exists";
pub const DELETED: &str = "delete successful";
pub const DELETED_ALL: &str = "complete delete successful";

const LIST_FAILED: &str = "Database error finding books";
const CREATE_FAILED: &str = "Error saving book to database.";
const DELETE_ALL_FAILED: &str = "error deleting books";

pub type SharedStore = Arc<dyn BookStore>;

/// Routes relative to the module mount point
pub fn router(store: SharedStore) -> Router {
    Router::new()
        .route(
            "/",
            get(list_books).post(create_book).delete(delete_all_books),
        )
        .route("/{id}", get(get_book).post(add_comment).delete(delete_book))
        .with_state(store)
}

/// Reject identifiers that cannot name a stored book before touching the store
fn checked_id(id: &str) -> Result<&str, AppError> {
    if ObjectId::is_valid(id) {
        Ok(id)
    } else {
        Err(AppError::not_found(NO_BOOK))
    }
}

async fn list_books(State(store): State<SharedStore>) -> Result<Json<Vec<BookSummary>>, AppError> {
    let books = store
        .list_books()
        .await
        .map_err(|e| AppError::internal(LIST_FAILED, e))?;

    Ok(Json(books.iter().map(BookSummary::from).collect()))
}

async fn create_book(
    State(store): State<SharedStore>,
    Payload(body): Payload<CreateBook>,
) -> Result<Json<CreatedBook>, AppError> {
    let title = body.title().ok_or_else(|| AppError::validation(MISSING_TITLE))?;

    let book = store
        .create_book(title)
        .await
        .map_err(|e| AppError::internal(CREATE_FAILED, e))?;

    tracing::info!(book_id = %book.id, "book created");
    Ok(Json(CreatedBook::from(book)))
}

async fn delete_all_books(State(store): State<SharedStore>) -> Result<&'static str, AppError> {
    let removed = store
        .delete_all_books()
        .await
        .map_err(|e| AppError::internal(DELETE_ALL_FAILED, e))?;

    tracing::info!(removed, "all books deleted");
    Ok(DELETED_ALL)
}

async fn get_book(
    State(store): State<SharedStore>,
    Path(id): Path<String>,
) -> Result<Json<BookDetail>, AppError> {
    let id = checked_id(&id)?;

    match store.get_book(id).await {
        Ok(Some(book)) => Ok(Json(BookDetail::from(book))),
        Ok(None) => Err(AppError::not_found(NO_BOOK)),
        Err(e) => Err(AppError::internal(NO_BOOK, e)),
    }
}

async fn add_comment(
    State(store): State<SharedStore>,
    Path(id): Path<String>,
    Payload(body): Payload<AddComment>,
) -> Result<Json<BookDetail>, AppError> {
    // Comment presence is checked before the id shape.
    let comment = body
        .comment()
        .ok_or_else(|| AppError::validation(MISSING_COMMENT))?;
    let id = checked_id(&id)?;

    match store.append_comment(id, comment).await {
        Ok(Some(book)) => {
            tracing::debug!(book_id = %book.id, comments = book.comments.len(), "comment added");
            Ok(Json(BookDetail::from(book)))
        }
        Ok(None) => Err(AppError::not_found(NO_BOOK)),
        Err(e) => Err(AppError::internal(NO_BOOK, e)),
    }
}

async fn delete_book(
    State(store): State<SharedStore>,
    Path(id): Path<String>,
) -> Result<&'static str, AppError> {
    let id = checked_id(&id)?;

    match store.delete_book(id).await {
        Ok(true) => {
            tracing::info!(book_id = %id, "book deleted");
            Ok(DELETED)
        }
        Ok(false) => Err(AppError::not_found(NO_BOOK)),
        Err(e) => Err(AppError::internal(format!("could not delete {}", id), e)),
    }
}
