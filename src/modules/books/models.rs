use bookshelf_db::{ObjectId, Record};
use serde::{Deserialize, Serialize};

/// Stored shape of a book; the id is assigned by the store and kept on the record.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BookDocument {
    pub title: String,
    pub comments: Vec<String>,
}

impl BookDocument {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            comments: Vec::new(),
        }
    }
}

/// A persisted book
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Book {
    pub id: ObjectId,
    pub title: String,
    pub comments: Vec<String>,
}

impl From<Record<BookDocument>> for Book {
    fn from(record: Record<BookDocument>) -> Self {
        Self {
            id: record.id,
            title: record.doc.title,
            comments: record.doc.comments,
        }
    }
}

/// Number of comments on `book`. Never stored; every response derives it here.
pub fn comment_count(book: &Book) -> usize {
    book.comments.len()
}

/// List view of a book: comments are summarized by their count.
#[derive(Debug, Clone, Serialize)]
pub struct BookSummary {
    pub id: ObjectId,
    pub title: String,
    #[serde(rename = "commentCount")]
    pub comment_count: usize,
}

impl From<&Book> for BookSummary {
    fn from(book: &Book) -> Self {
        Self {
            id: book.id,
            title: book.title.clone(),
            comment_count: comment_count(book),
        }
    }
}

/// Full view of a single book.
#[derive(Debug, Clone, Serialize)]
pub struct BookDetail {
    pub id: ObjectId,
    pub title: String,
    pub comments: Vec<String>,
    #[serde(rename = "commentCount")]
    pub comment_count: usize,
}

impl From<Book> for BookDetail {
    fn from(book: Book) -> Self {
        let comment_count = comment_count(&book);
        Self {
            id: book.id,
            title: book.title,
            comments: book.comments,
            comment_count,
        }
    }
}

/// Response to a successful create.
#[derive(Debug, Clone, Serialize)]
pub struct CreatedBook {
    pub title: String,
    pub id: ObjectId,
}

impl From<Book> for CreatedBook {
    fn from(book: Book) -> Self {
        Self {
            title: book.title,
            id: book.id,
        }
    }
}

/// Request body for creating a book.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CreateBook {
    pub title: Option<String>,
}

impl CreateBook {
    /// The title, if one was given and it is not empty
    pub fn title(&self) -> Option<&str> {
        non_empty(&self.title)
    }
}

/// Request body for appending a comment.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AddComment {
    pub comment: Option<String>,
}

impl AddComment {
    pub fn comment(&self) -> Option<&str> {
        non_empty(&self.comment)
    }
}

fn non_empty(field: &Option<String>) -> Option<&str> {
    field.as_deref().filter(|value| !value.is_empty())
}
