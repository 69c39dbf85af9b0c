//! Product document persistence.
//!
//! Each [`ProductRecord`] is stored whole as a JSONB document in
//! `product_documents`, with `stock_code` (the business key), `id`, and the
//! two timestamps mirrored into indexed columns.

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use lonca_core::ProductRecord;

use crate::DbError;

/// Keyed document store for product records.
///
/// Implementations hold at most one document per `stock_code`. No
/// optimistic-concurrency check guards a read followed by a write.
#[async_trait]
pub trait ProductStore: Send + Sync {
    /// Returns the stored record whose `stock_code` equals `stock_code`.
    async fn find_one_by_key(&self, stock_code: &str) -> Result<Option<ProductRecord>, DbError>;

    /// Inserts a new document and returns its persistence id.
    async fn insert(&self, record: &ProductRecord) -> Result<Uuid, DbError>;

    /// Overwrites the document with id `id` entirely with `record`.
    ///
    /// Fields absent from `record` do not survive the replacement.
    async fn replace(&self, id: Uuid, record: &ProductRecord) -> Result<(), DbError>;
}

/// [`ProductStore`] backed by the Postgres `product_documents` table.
#[derive(Debug, Clone)]
pub struct PgProductStore {
    pool: PgPool,
}

impl PgProductStore {
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    #[must_use]
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Number of stored documents.
    ///
    /// # Errors
    ///
    /// Returns [`DbError::Sqlx`] if the query fails.
    pub async fn count(&self) -> Result<i64, DbError> {
        let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM product_documents")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }
}

#[async_trait]
impl ProductStore for PgProductStore {
    async fn find_one_by_key(&self, stock_code: &str) -> Result<Option<ProductRecord>, DbError> {
        let document = sqlx::query_scalar::<_, serde_json::Value>(
            "SELECT document FROM product_documents WHERE stock_code = $1",
        )
        .bind(stock_code)
        .fetch_optional(&self.pool)
        .await?;

        document
            .map(serde_json::from_value::<ProductRecord>)
            .transpose()
            .map_err(DbError::from)
    }

    async fn insert(&self, record: &ProductRecord) -> Result<Uuid, DbError> {
        let document = serde_json::to_value(record)?;

        let result = sqlx::query_scalar::<_, Uuid>(
            "INSERT INTO product_documents \
                 (id, stock_code, document, created_at, updated_at) \
             VALUES ($1, $2, $3, $4, $5) \
             RETURNING id",
        )
        .bind(record.id)
        .bind(&record.stock_code)
        .bind(document)
        .bind(record.created_at)
        .bind(record.updated_at)
        .fetch_one(&self.pool)
        .await;

        match result {
            Ok(id) => {
                tracing::debug!(%id, stock_code = %record.stock_code, "inserted product document");
                Ok(id)
            }
            Err(sqlx::Error::Database(e)) if e.is_unique_violation() => {
                Err(DbError::DuplicateKey {
                    stock_code: record.stock_code.clone(),
                })
            }
            Err(e) => Err(DbError::Sqlx(e)),
        }
    }

    async fn replace(&self, id: Uuid, record: &ProductRecord) -> Result<(), DbError> {
        let document = serde_json::to_value(record)?;

        let result = sqlx::query(
            "UPDATE product_documents SET \
                 stock_code = $2, \
                 document   = $3, \
                 created_at = $4, \
                 updated_at = $5 \
             WHERE id = $1",
        )
        .bind(id)
        .bind(&record.stock_code)
        .bind(document)
        .bind(record.created_at)
        .bind(record.updated_at)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::NotFound);
        }
        tracing::debug!(%id, stock_code = %record.stock_code, "replaced product document");
        Ok(())
    }
}
