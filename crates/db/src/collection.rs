use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tokio::sync::RwLock;

use crate::error::{DbError, DbResult};
use crate::object_id::ObjectId;

/// A stored document together with its store-assigned id
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record<D> {
    pub id: ObjectId,
    pub doc: D,
}

pub(crate) struct CollectionInner<D> {
    name: String,
    max_documents: Option<usize>,
    open: Arc<AtomicBool>,
    records: RwLock<Vec<Record<D>>>,
}

/// Handle to a named document collection.
///
/// Handles are cheap to clone and all clones see the same documents. Every
/// operation takes the collection lock once, so a single call is atomic with
/// respect to other calls on the same collection. Documents are kept in
/// insertion order.
pub struct Collection<D> {
    inner: Arc<CollectionInner<D>>,
}

impl<D> Clone for Collection<D> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

impl<D> Collection<D>
where
    D: Clone + Send + Sync + 'static,
{
    pub(crate) fn from_inner(inner: Arc<CollectionInner<D>>) -> Self {
        Self { inner }
    }

    pub(crate) fn new_inner(
        name: &str,
        max_documents: Option<usize>,
        open: Arc<AtomicBool>,
    ) -> Arc<CollectionInner<D>> {
        Arc::new(CollectionInner {
            name: name.to_string(),
            max_documents,
            open,
            records: RwLock::new(Vec::new()),
        })
    }

    pub fn name(&self) -> &str {
        &self.inner.name
    }

    fn ensure_open(&self) -> DbResult<()> {
        if self.inner.open.load(Ordering::Acquire) {
            Ok(())
        } else {
            Err(DbError::Closed)
        }
    }

    /// Persist `doc` under a freshly generated id
    pub async fn insert(&self, doc: D) -> DbResult<Record<D>> {
        self.ensure_open()?;
        let mut records = self.inner.records.write().await;

        if let Some(limit) = self.inner.max_documents {
            if records.len() >= limit {
                return Err(DbError::CapacityExceeded {
                    collection: self.inner.name.clone(),
                    limit,
                });
            }
        }

        let record = Record {
            id: ObjectId::new(),
            doc,
        };
        records.push(record.clone());
        Ok(record)
    }

    pub async fn find_all(&self) -> DbResult<Vec<Record<D>>> {
        self.ensure_open()?;
        Ok(self.inner.records.read().await.clone())
    }

    pub async fn find_by_id(&self, id: &str) -> DbResult<Option<Record<D>>> {
        self.ensure_open()?;
        let id: ObjectId = id.parse()?;
        let records = self.inner.records.read().await;
        Ok(records.iter().find(|record| record.id == id).cloned())
    }

    /// Apply `update` to the matching document and return the result.
    ///
    /// The closure runs while the collection is write-locked.
    pub async fn update_by_id<F>(&self, id: &str, update: F) -> DbResult<Option<Record<D>>>
    where
        F: FnOnce(&mut D),
    {
        self.ensure_open()?;
        let id: ObjectId = id.parse()?;
        let mut records = self.inner.records.write().await;

        Ok(records
            .iter_mut()
            .find(|record| record.id == id)
            .map(|record| {
                update(&mut record.doc);
                record.clone()
            }))
    }

    /// Remove the matching document, returning it if it existed
    pub async fn delete_by_id(&self, id: &str) -> DbResult<Option<Record<D>>> {
        self.ensure_open()?;
        let id: ObjectId = id.parse()?;
        let mut records = self.inner.records.write().await;

        let position = records.iter().position(|record| record.id == id);
        Ok(position.map(|index| records.remove(index)))
    }

    /// Remove every document, returning how many were removed
    pub async fn delete_all(&self) -> DbResult<usize> {
        self.ensure_open()?;
        let mut records = self.inner.records.write().await;
        let removed = records.len();
        records.clear();
        Ok(removed)
    }

    pub async fn count(&self) -> DbResult<usize> {
        self.ensure_open()?;
        Ok(self.inner.records.read().await.len())
    }
}
