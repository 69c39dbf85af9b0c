use async_trait::async_trait;
use chrono::{DateTime, Duration, TimeZone, Timelike, Utc};
use lonca_core::{
    EventLevel, FixedClock, ProductStatus, RecordingSink, SteppingClock, PRICE_UNIT,
};
use rust_decimal::Decimal;

use super::*;
use crate::MemoryProductStore;

fn t0() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 4, 2, 10, 0, 0).unwrap()
}

fn sample_record(stock_code: &str) -> ProductRecord {
    ProductRecord {
        id: Uuid::new_v4(),
        stock_code: stock_code.to_string(),
        name: "Linen Shirt".to_string(),
        images: vec!["https://cdn.example.com/123-1.jpg".to_string()],
        price: Decimal::new(1050, 2),
        discounted_price: Decimal::ZERO,
        is_discounted: false,
        product_type: Some("Shirt".to_string()),
        quantity: 5,
        color: vec!["Red".to_string(), "Blue".to_string()],
        status: ProductStatus::Passive,
        price_unit: PRICE_UNIT.to_string(),
        fabric: Some("%100 Keten".to_string()),
        model_measurements: None,
        product_measurements: None,
        sample_size: Some("M".to_string()),
        created_at: t0(),
        updated_at: t0(),
    }
}

#[tokio::test]
async fn first_upsert_inserts_with_fresh_id() {
    let store = MemoryProductStore::new();
    let sink = RecordingSink::new();
    let clock = FixedClock(t0() + Duration::minutes(5));
    let record = sample_record("123-Red");
    let placeholder = record.id;

    let outcome = upsert_product_with_outcome(&store, record, &clock, &sink)
        .await
        .unwrap();

    assert!(outcome.is_insert());
    let stored = store.get("123-Red").unwrap();
    assert_eq!(&stored, outcome.record());
    assert_ne!(stored.id, placeholder);
    assert_eq!(stored.created_at, t0() + Duration::minutes(5));
    assert_eq!(stored.created_at, stored.updated_at);
    assert!(sink.contains(EventLevel::Info, "inserted new product with stock code 123-Red"));
}

#[tokio::test]
async fn second_upsert_replaces_and_keeps_identity() {
    let store = MemoryProductStore::new();
    let sink = RecordingSink::new();
    let clock = SteppingClock::new(t0(), Duration::seconds(30));

    let first = upsert_product(&store, sample_record("123-Red"), &clock, &sink)
        .await
        .unwrap();
    let mut changed = sample_record("123-Red");
    changed.quantity = 0;
    changed.status = ProductStatus::Active;
    let second = upsert_product_with_outcome(&store, changed, &clock, &sink)
        .await
        .unwrap();

    assert!(!second.is_insert());
    let second = second.into_record();
    assert_eq!(store.len(), 1);
    assert_eq!(second.id, first.id);
    assert_eq!(second.created_at, first.created_at);
    assert!(second.updated_at > first.updated_at);
    assert_eq!(store.get("123-Red").unwrap().quantity, 0);
    assert!(sink.contains(EventLevel::Info, "updated existing product with stock code 123-Red"));
}

#[tokio::test]
async fn repeated_runs_keep_one_document_with_increasing_updated_at() {
    let store = MemoryProductStore::new();
    let sink = RecordingSink::new();
    let clock = SteppingClock::new(t0(), Duration::milliseconds(1));

    let mut previous: Option<ProductRecord> = None;
    for _ in 0..3 {
        let written = upsert_product(&store, sample_record("123-Red"), &clock, &sink)
            .await
            .unwrap();
        if let Some(prev) = &previous {
            assert_eq!(written.created_at, prev.created_at);
            assert!(written.updated_at > prev.updated_at);
        }
        previous = Some(written);
    }
    assert_eq!(store.len(), 1);
}

#[tokio::test]
async fn replace_drops_fields_absent_from_new_record() {
    let store = MemoryProductStore::new();
    let sink = RecordingSink::new();
    let clock = SteppingClock::new(t0(), Duration::seconds(1));

    upsert_product(&store, sample_record("123-Red"), &clock, &sink)
        .await
        .unwrap();
    let mut sparse = sample_record("123-Red");
    sparse.fabric = None;
    sparse.sample_size = None;
    sparse.product_type = None;
    upsert_product(&store, sparse, &clock, &sink).await.unwrap();

    let stored = store.get("123-Red").unwrap();
    assert!(stored.fabric.is_none());
    assert!(stored.sample_size.is_none());
    assert!(stored.product_type.is_none());
}

#[tokio::test]
async fn each_call_reads_once_and_writes_once() {
    let store = MemoryProductStore::new();
    let sink = RecordingSink::new();
    let clock = SteppingClock::new(t0(), Duration::seconds(1));

    upsert_product(&store, sample_record("123-Red"), &clock, &sink)
        .await
        .unwrap();
    assert_eq!((store.reads(), store.writes()), (1, 1));

    upsert_product(&store, sample_record("123-Red"), &clock, &sink)
        .await
        .unwrap();
    assert_eq!((store.reads(), store.writes()), (2, 2));
}

#[tokio::test]
async fn distinct_keys_are_separate_documents() {
    let store = MemoryProductStore::new();
    let sink = RecordingSink::new();
    let clock = FixedClock(t0());

    upsert_product(&store, sample_record("123-Red"), &clock, &sink)
        .await
        .unwrap();
    upsert_product(&store, sample_record("123-Blue"), &clock, &sink)
        .await
        .unwrap();

    assert_eq!(store.len(), 2);
}

#[tokio::test]
async fn timestamps_are_truncated_to_milliseconds() {
    let store = MemoryProductStore::new();
    let sink = RecordingSink::new();
    let clock = FixedClock(t0().with_nanosecond(123_456_789).unwrap());

    let written = upsert_product(&store, sample_record("123-Red"), &clock, &sink)
        .await
        .unwrap();

    assert_eq!(written.updated_at.nanosecond(), 123_000_000);
    assert_eq!(written.created_at, written.updated_at);
}

// ---------------------------------------------------------------------------
// Store failures
// ---------------------------------------------------------------------------

struct UnavailableStore;

#[async_trait]
impl ProductStore for UnavailableStore {
    async fn find_one_by_key(&self, _stock_code: &str) -> Result<Option<ProductRecord>, DbError> {
        Err(DbError::Sqlx(sqlx::Error::PoolTimedOut))
    }

    async fn insert(&self, _record: &ProductRecord) -> Result<Uuid, DbError> {
        unreachable!("insert must not run after a failed read")
    }

    async fn replace(&self, _id: Uuid, _record: &ProductRecord) -> Result<(), DbError> {
        unreachable!("replace must not run after a failed read")
    }
}

#[tokio::test]
async fn store_errors_propagate_without_writing() {
    let sink = RecordingSink::new();
    let err = upsert_product(&UnavailableStore, sample_record("123-Red"), &FixedClock(t0()), &sink)
        .await
        .unwrap_err();

    assert!(matches!(err, DbError::Sqlx(sqlx::Error::PoolTimedOut)));
    assert!(sink.events().is_empty());
}

/// Returns an id of its own choosing on insert.
struct AssigningStore(MemoryProductStore, Uuid);

#[async_trait]
impl ProductStore for AssigningStore {
    async fn find_one_by_key(&self, stock_code: &str) -> Result<Option<ProductRecord>, DbError> {
        self.0.find_one_by_key(stock_code).await
    }

    async fn insert(&self, record: &ProductRecord) -> Result<Uuid, DbError> {
        self.0.insert(record).await?;
        Ok(self.1)
    }

    async fn replace(&self, id: Uuid, record: &ProductRecord) -> Result<(), DbError> {
        self.0.replace(id, record).await
    }
}

#[tokio::test]
async fn store_assigned_id_is_authoritative() {
    let assigned = Uuid::new_v4();
    let store = AssigningStore(MemoryProductStore::new(), assigned);
    let sink = RecordingSink::new();

    let written = upsert_product(&store, sample_record("123-Red"), &FixedClock(t0()), &sink)
        .await
        .unwrap();

    assert_eq!(written.id, assigned);
}
