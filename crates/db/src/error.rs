use thiserror::Error;

pub type DbResult<T> = Result<T, DbError>;

/// Failures surfaced by the document store
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DbError {
    #[error("invalid object id '{0}': expected 24 hexadecimal characters")]
    InvalidId(String),

    #[error("database connection is closed")]
    Closed,

    #[error("collection '{collection}' is full ({limit} documents)")]
    CapacityExceeded { collection: String, limit: usize },

    #[error("unsupported store endpoint '{0}'")]
    UnsupportedEndpoint(String),

    #[error("collection '{0}' is already open with a different document type")]
    CollectionType(String),
}
