//! In-process [`ProductStore`] used by dry runs and tests.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use uuid::Uuid;

use lonca_core::ProductRecord;

use crate::products::ProductStore;
use crate::DbError;

/// Vector-backed store that enforces the same `stock_code` uniqueness as the
/// Postgres table and counts every read and write.
#[derive(Debug, Default)]
pub struct MemoryProductStore {
    documents: Mutex<Vec<ProductRecord>>,
    reads: AtomicUsize,
    writes: AtomicUsize,
}

impl MemoryProductStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Copy of every stored document, in insertion order.
    #[must_use]
    pub fn documents(&self) -> Vec<ProductRecord> {
        self.lock().clone()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    #[must_use]
    pub fn get(&self, stock_code: &str) -> Option<ProductRecord> {
        self.lock()
            .iter()
            .find(|doc| doc.stock_code == stock_code)
            .cloned()
    }

    /// Number of `find_one_by_key` calls so far.
    #[must_use]
    pub fn reads(&self) -> usize {
        self.reads.load(Ordering::SeqCst)
    }

    /// Number of `insert` and `replace` calls so far.
    #[must_use]
    pub fn writes(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }

    fn lock(&self) -> MutexGuard<'_, Vec<ProductRecord>> {
        self.documents
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }
}

#[async_trait]
impl ProductStore for MemoryProductStore {
    async fn find_one_by_key(&self, stock_code: &str) -> Result<Option<ProductRecord>, DbError> {
        self.reads.fetch_add(1, Ordering::SeqCst);
        Ok(self.get(stock_code))
    }

    async fn insert(&self, record: &ProductRecord) -> Result<Uuid, DbError> {
        self.writes.fetch_add(1, Ordering::SeqCst);
        let mut documents = self.lock();
        if documents.iter().any(|doc| doc.stock_code == record.stock_code) {
            return Err(DbError::DuplicateKey {
                stock_code: record.stock_code.clone(),
            });
        }
        documents.push(record.clone());
        Ok(record.id)
    }

    async fn replace(&self, id: Uuid, record: &ProductRecord) -> Result<(), DbError> {
        self.writes.fetch_add(1, Ordering::SeqCst);
        let mut documents = self.lock();
        let slot = documents
            .iter_mut()
            .find(|doc| doc.id == id)
            .ok_or(DbError::NotFound)?;
        *slot = ProductRecord {
            id,
            ..record.clone()
        };
        Ok(())
    }
}
