//! # Detail Repository
//!
//! Hourly detail records. Each one belongs to a summary record and is
//! deleted with it.

use sqlx::{Executor, Sqlite, SqlitePool};
use tracing::{debug, info};

use crate::error::{DbError, DbResult};
use linecheck_core::{DetailRecord, NewDetailRecord, PLACEHOLDER};

/// Repository for detail record operations.
#[derive(Debug, Clone)]
pub struct DetailRepository {
    pool: SqlitePool,
}

impl DetailRepository {
    /// Creates a new DetailRepository.
    pub fn new(pool: SqlitePool) -> Self {
        DetailRepository { pool }
    }

    /// Inserts one detail record.
    ///
    /// ## Returns
    /// * `Err(DbError::ForeignKeyViolation)` - `summary_id` does not exist
    pub async fn insert(&self, record: &NewDetailRecord) -> DbResult<DetailRecord> {
        let saved = insert_row(&self.pool, record).await?;
        debug!(id = saved.id, summary_id = saved.summary_id, hour = %saved.hour, "Detail record inserted");
        Ok(saved)
    }

    /// Inserts every record or none of them.
    ///
    /// A record pointing at a missing summary fails the batch with its index.
    pub async fn insert_batch(&self, records: &[NewDetailRecord]) -> DbResult<Vec<DetailRecord>> {
        if records.is_empty() {
            return Ok(Vec::new());
        }

        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| DbError::TransactionFailed(e.to_string()))?;

        let mut saved = Vec::with_capacity(records.len());
        for (index, record) in records.iter().enumerate() {
            let row = insert_row(&mut *tx, record)
                .await
                .map_err(|e| DbError::batch_item(index, e))?;
            saved.push(row);
        }

        tx.commit()
            .await
            .map_err(|e| DbError::TransactionFailed(e.to_string()))?;

        info!(count = saved.len(), "Detail batch saved");
        Ok(saved)
    }

    /// Detail records of one summary, oldest first.
    pub async fn list_for_summary(&self, summary_id: i64) -> DbResult<Vec<DetailRecord>> {
        let records = sqlx::query_as::<_, DetailRecord>(
            "SELECT id, summary_id, date, hour, description, defect_count \
             FROM defect_details WHERE summary_id = ? ORDER BY id",
        )
        .bind(summary_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(records)
    }

    /// Number of detail records stored.
    pub async fn count(&self) -> DbResult<u64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM defect_details")
            .fetch_one(&self.pool)
            .await?;
        Ok(count as u64)
    }
}

async fn insert_row<'e, E>(executor: E, record: &NewDetailRecord) -> DbResult<DetailRecord>
where
    E: Executor<'e, Database = Sqlite>,
{
    let description = if record.description.trim().is_empty() {
        PLACEHOLDER
    } else {
        record.description.as_str()
    };

    let saved = sqlx::query_as::<_, DetailRecord>(
        "INSERT INTO defect_details (summary_id, date, hour, description, defect_count) \
         VALUES (?, ?, ?, ?, ?) \
         RETURNING id, summary_id, date, hour, description, defect_count",
    )
    .bind(record.summary_id)
    .bind(record.date)
    .bind(&record.hour)
    .bind(description)
    .bind(record.defect_count)
    .fetch_one(executor)
    .await?;

    Ok(saved)
}
