//! In-process document store used as the bookshelf persistence backend.
//!
//! `Database::connect` is the client factory; collections are obtained from
//! it by name and shared between every caller that asks for the same name.

use std::any::Any;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use bookshelf_kernel::settings::DatabaseSettings;

pub mod collection;
pub mod error;
pub mod object_id;

pub use collection::{Collection, Record};
pub use error::{DbError, DbResult};
pub use object_id::ObjectId;

const MEMORY_SCHEME: &str = "mem://";

type ErasedCollection = Arc<dyn Any + Send + Sync>;

/// Connected document store
pub struct Database {
    endpoint: String,
    max_documents: Option<usize>,
    open: Arc<AtomicBool>,
    collections: Mutex<HashMap<String, ErasedCollection>>,
}

impl Database {
    /// Connect to the store described by `settings`
    pub fn connect(settings: &DatabaseSettings) -> DbResult<Self> {
        if !settings.endpoint.starts_with(MEMORY_SCHEME) {
            return Err(DbError::UnsupportedEndpoint(settings.endpoint.clone()));
        }

        tracing::info!(
            target: "bookshelf-db",
            endpoint = %settings.endpoint,
            max_documents = ?settings.max_documents,
            "document store connected"
        );

        Ok(Self {
            endpoint: settings.endpoint.clone(),
            max_documents: settings.max_documents,
            open: Arc::new(AtomicBool::new(true)),
            collections: Mutex::new(HashMap::new()),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    pub fn is_open(&self) -> bool {
        self.open.load(Ordering::Acquire)
    }

    /// Open (or reopen) the collection called `name`.
    ///
    /// A name is bound to one document type for the lifetime of the database.
    pub fn collection<D>(&self, name: &str) -> DbResult<Collection<D>>
    where
        D: Clone + Send + Sync + 'static,
    {
        if !self.is_open() {
            return Err(DbError::Closed);
        }

        let mut collections = self
            .collections
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());

        if let Some(existing) = collections.get(name) {
            return existing
                .clone()
                .downcast::<collection::CollectionInner<D>>()
                .map(Collection::from_inner)
                .map_err(|_| DbError::CollectionType(name.to_string()));
        }

        let inner = Collection::<D>::new_inner(name, self.max_documents, self.open.clone());
        collections.insert(name.to_string(), inner.clone());
        let handle = Collection::from_inner(inner);
        tracing::debug!(target: "bookshelf-db", collection = handle.name(), "collection opened");
        Ok(handle)
    }

    /// Close the connection; every collection handle fails with `DbError::Closed` afterwards
    pub fn close(&self) {
        if self.open.swap(false, Ordering::AcqRel) {
            tracing::info!(target: "bookshelf-db", endpoint = %self.endpoint, "document store closed");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settings(endpoint: &str) -> DatabaseSettings {
        DatabaseSettings {
            endpoint: endpoint.to_string(),
            ..DatabaseSettings::default()
        }
    }

    #[test]
    fn rejects_non_memory_endpoints() {
        let err = Database::connect(&settings("mongodb://localhost:27017"))
            .err()
            .unwrap();
        assert_eq!(
            err,
            DbError::UnsupportedEndpoint("mongodb://localhost:27017".to_string())
        );
    }

    #[tokio::test]
    async fn same_name_shares_documents() {
        let db = Database::connect(&DatabaseSettings::default()).unwrap();
        let writer = db.collection::<String>("books").unwrap();
        let reader = db.collection::<String>("books").unwrap();

        writer.insert("Dune".to_string()).await.unwrap();
        assert_eq!(reader.count().await.unwrap(), 1);

        let other = db.collection::<String>("authors").unwrap();
        assert_eq!(other.count().await.unwrap(), 0);
    }

    #[test]
    fn name_is_bound_to_one_document_type() {
        let db = Database::connect(&DatabaseSettings::default()).unwrap();
        db.collection::<String>("books").unwrap();
        let err = db.collection::<u64>("books").err().unwrap();
        assert_eq!(err, DbError::CollectionType("books".to_string()));
    }

    #[tokio::test]
    async fn close_fails_existing_handles() {
        let db = Database::connect(&DatabaseSettings::default()).unwrap();
        let books = db.collection::<String>("books").unwrap();
        db.close();

        assert!(!db.is_open());
        assert_eq!(books.find_all().await.unwrap_err(), DbError::Closed);
        assert_eq!(db.collection::<String>("books").err(), Some(DbError::Closed));
    }
}
