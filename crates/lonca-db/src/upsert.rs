//! Insert-or-replace of normalized records keyed on `stock_code`.

use uuid::Uuid;

use lonca_core::{normalized_now, Clock, EventSink, ProductRecord};

use crate::products::ProductStore;
use crate::DbError;

/// Which write an upsert performed, with the record as persisted.
#[derive(Debug, Clone, PartialEq)]
pub enum UpsertOutcome {
    Inserted(ProductRecord),
    Replaced(ProductRecord),
}

impl UpsertOutcome {
    #[must_use]
    pub fn record(&self) -> &ProductRecord {
        match self {
            UpsertOutcome::Inserted(record) | UpsertOutcome::Replaced(record) => record,
        }
    }

    #[must_use]
    pub fn into_record(self) -> ProductRecord {
        match self {
            UpsertOutcome::Inserted(record) | UpsertOutcome::Replaced(record) => record,
        }
    }

    #[must_use]
    pub fn is_insert(&self) -> bool {
        matches!(self, UpsertOutcome::Inserted(_))
    }
}

/// Persists `record`, replacing any stored document with the same
/// `stock_code`, and returns the record as written.
///
/// # Errors
///
/// Returns the store's [`DbError`] unchanged.
pub async fn upsert_product(
    store: &dyn ProductStore,
    record: ProductRecord,
    clock: &dyn Clock,
    sink: &dyn EventSink,
) -> Result<ProductRecord, DbError> {
    upsert_product_with_outcome(store, record, clock, sink)
        .await
        .map(UpsertOutcome::into_record)
}

/// Like [`upsert_product`], but reports whether the write was an insert or a
/// replacement.
///
/// Performs exactly one read and one write. An existing document keeps its
/// `_id` and `createdAt`; everything else is overwritten, so fields absent
/// from `record` are dropped. A new document gets a fresh `_id` (the store's
/// returned id wins) and `createdAt = updatedAt = now`.
///
/// # Errors
///
/// Returns the store's [`DbError`] unchanged.
pub async fn upsert_product_with_outcome(
    store: &dyn ProductStore,
    mut record: ProductRecord,
    clock: &dyn Clock,
    sink: &dyn EventSink,
) -> Result<UpsertOutcome, DbError> {
    let now = normalized_now(clock);
    record.updated_at = now;

    let existing = store.find_one_by_key(&record.stock_code).await?;
    if let Some(existing) = existing {
        record.id = existing.id;
        record.created_at = existing.created_at;
        store.replace(existing.id, &record).await?;
        sink.info(&format!(
            "updated existing product with stock code {} (id {})",
            record.stock_code, record.id
        ));
        return Ok(UpsertOutcome::Replaced(record));
    }

    record.id = Uuid::new_v4();
    record.created_at = now;
    let id = store.insert(&record).await?;
    record.id = id;
    sink.info(&format!(
        "inserted new product with stock code {} (id {id})",
        record.stock_code
    ));
    Ok(UpsertOutcome::Inserted(record))
}

#[cfg(test)]
#[path = "upsert_test.rs"]
mod tests;
