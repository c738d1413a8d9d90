//! Book store adapter over the document store.

use async_trait::async_trait;
use bookshelf_db::{Collection, Database, DbError};
use thiserror::Error;

use super::models::{Book, BookDocument};

pub type StoreResult<T> = Result<T, StoreError>;

/// The document store failed or is unreachable
#[derive(Error, Debug)]
#[error("book store failed to {operation}")]
pub struct StoreError {
    pub operation: &'static str,
    #[source]
    pub source: DbError,
}

impl StoreError {
    fn during(operation: &'static str) -> impl FnOnce(DbError) -> Self {
        move |source| Self { operation, source }
    }
}

/// Persistence operations the book handlers depend on.
///
/// Lookups by id return `Ok(None)` (or `Ok(false)`) when no book matches;
/// `Err` is reserved for store failures.
#[async_trait]
pub trait BookStore: Send + Sync {
    /// Persist a new book with no comments
    async fn create_book(&self, title: &str) -> StoreResult<Book>;

    /// Every book, in store order
    async fn list_books(&self) -> StoreResult<Vec<Book>>;

    async fn get_book(&self, id: &str) -> StoreResult<Option<Book>>;

    /// Append `comment` atomically and return the updated book
    async fn append_comment(&self, id: &str, comment: &str) -> StoreResult<Option<Book>>;

    /// Returns whether a book was removed
    async fn delete_book(&self, id: &str) -> StoreResult<bool>;

    /// Returns how many books were removed
    async fn delete_all_books(&self) -> StoreResult<usize>;
}

/// `BookStore` backed by a document collection
#[derive(Clone)]
pub struct DocumentBookStore {
    books: Collection<BookDocument>,
}

impl DocumentBookStore {
    pub fn new(books: Collection<BookDocument>) -> Self {
        Self { books }
    }

    /// Open the `collection` of `database` as a book store
    pub fn open(database: &Database, collection: &str) -> StoreResult<Self> {
        database
            .collection(collection)
            .map(Self::new)
            .map_err(StoreError::during("open the book collection"))
    }
}

#[async_trait]
impl BookStore for DocumentBookStore {
    async fn create_book(&self, title: &str) -> StoreResult<Book> {
        self.books
            .insert(BookDocument::new(title))
            .await
            .map(Book::from)
            .map_err(StoreError::during("create a book"))
    }

    async fn list_books(&self) -> StoreResult<Vec<Book>> {
        let records = self
            .books
            .find_all()
            .await
            .map_err(StoreError::during("list books"))?;
        Ok(records.into_iter().map(Book::from).collect())
    }

    async fn get_book(&self, id: &str) -> StoreResult<Option<Book>> {
        self.books
            .find_by_id(id)
            .await
            .map(|record| record.map(Book::from))
            .map_err(StoreError::during("find a book"))
    }

    async fn append_comment(&self, id: &str, comment: &str) -> StoreResult<Option<Book>> {
        self.books
            .update_by_id(id, |doc| doc.comments.push(comment.to_string()))
            .await
            .map(|record| record.map(Book::from))
            .map_err(StoreError::during("append a comment"))
    }

    async fn delete_book(&self, id: &str) -> StoreResult<bool> {
        self.books
            .delete_by_id(id)
            .await
            .map(|removed| removed.is_some())
            .map_err(StoreError::during("delete a book"))
    }

    async fn delete_all_books(&self) -> StoreResult<usize> {
        self.books
            .delete_all()
            .await
            .map_err(StoreError::during("delete all books"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::modules::books::models::comment_count;
    use bookshelf_kernel::settings::DatabaseSettings;

    const ABSENT_ID: &str = "5871dda29f8f2038743129e0";

    fn store() -> (Database, DocumentBookStore) {
        let database = Database::connect(&DatabaseSettings::default()).unwrap();
        let store = DocumentBookStore::open(&database, "books").unwrap();
        (database, store)
    }

    #[tokio::test]
    async fn created_books_start_without_comments() {
        let (_db, store) = store();
        let book = store.create_book("Neuromancer").await.unwrap();
        assert_eq!(book.title, "Neuromancer");
        assert!(book.comments.is_empty());
        assert_eq!(comment_count(&book), 0);

        let fetched = store.get_book(&book.id.to_string()).await.unwrap();
        assert_eq!(fetched, Some(book));
    }

    #[tokio::test]
    async fn appended_comments_accumulate_in_order() {
        let (_db, store) = store();
        let book = store.create_book("Hyperion").await.unwrap();
        let id = book.id.to_string();

        let mut last = None;
        for n in 0..5 {
            last = store
                .append_comment(&id, &format!("comment {n}"))
                .await
                .unwrap();
        }

        let updated = last.unwrap();
        assert_eq!(updated.id, book.id);
        assert_eq!(updated.title, "Hyperion");
        assert_eq!(comment_count(&updated), 5);
        assert_eq!(updated.comments[0], "comment 0");
        assert_eq!(updated.comments[4], "comment 4");
    }

    #[tokio::test]
    async fn unknown_ids_are_not_found() {
        let (_db, store) = store();
        assert_eq!(store.get_book(ABSENT_ID).await.unwrap(), None);
        assert_eq!(store.append_comment(ABSENT_ID, "hi").await.unwrap(), None);
        assert!(!store.delete_book(ABSENT_ID).await.unwrap());
    }

    #[tokio::test]
    async fn malformed_ids_surface_as_store_errors() {
        let (_db, store) = store();
        let err = store.get_book("not-an-id").await.unwrap_err();
        assert_eq!(err.operation, "find a book");
        assert_eq!(err.source, DbError::InvalidId("not-an-id".to_string()));
    }

    #[tokio::test]
    async fn delete_book_then_delete_all() {
        let (_db, store) = store();
        let first = store.create_book("A").await.unwrap();
        store.create_book("B").await.unwrap();
        store.create_book("C").await.unwrap();

        assert!(store.delete_book(&first.id.to_string()).await.unwrap());
        assert_eq!(store.get_book(&first.id.to_string()).await.unwrap(), None);

        let titles: Vec<String> = store
            .list_books()
            .await
            .unwrap()
            .into_iter()
            .map(|book| book.title)
            .collect();
        assert_eq!(titles, vec!["B", "C"]);

        assert_eq!(store.delete_all_books().await.unwrap(), 2);
        assert!(store.list_books().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn closed_database_fails_with_store_error() {
        let (db, store) = store();
        db.close();
        let err = store.list_books().await.unwrap_err();
        assert_eq!(err.source, DbError::Closed);
        assert_eq!(err.to_string(), "book store failed to list books");
    }
}
