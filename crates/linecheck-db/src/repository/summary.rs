//! # Summary Repository
//!
//! Writes and lookups for defect summary records.
//!
//! ## Save Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Saving an Inspection Form                            │
//! │                                                                         │
//! │  Form "save"  →  one NewSummaryRecord per defect type with a total     │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  insert_batch(&records)                                                │
//! │       │                                                                 │
//! │       ├── BEGIN                                                         │
//! │       ├── INSERT ... RETURNING  (item 0)                               │
//! │       ├── INSERT ... RETURNING  (item 1)                               │
//! │       ├── ...                   any failure → ROLLBACK, report index   │
//! │       └── COMMIT                                                        │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  Vec<SummaryRecord> with assigned ids, in input order                  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::{DateTime, Utc};
use sqlx::{Executor, Sqlite, SqlitePool};
use tracing::{debug, info};

use crate::error::{DbError, DbResult};
use crate::query::timestamp_text;
use linecheck_core::{NewSummaryRecord, SummaryRecord, PLACEHOLDER};

const RETURNING: &str = "RETURNING id, code, inspector, lot, product_name, container, \
     destination, production_line, defect_type, defect_total, observation, created_at";

/// Repository for summary record operations.
///
/// ## Usage
/// ```rust,ignore
/// let repo = SummaryRepository::new(pool);
///
/// let saved = repo.insert(&new_record).await?;
/// let found = repo.get_by_id(saved.id).await?;
/// ```
#[derive(Debug, Clone)]
pub struct SummaryRepository {
    pool: SqlitePool,
}

impl SummaryRepository {
    /// Creates a new SummaryRepository.
    pub fn new(pool: SqlitePool) -> Self {
        SummaryRepository { pool }
    }

    /// Inserts one summary record, stamped with the current time.
    pub async fn insert(&self, record: &NewSummaryRecord) -> DbResult<SummaryRecord> {
        let saved = insert_row(&self.pool, record, None).await?;
        debug!(id = saved.id, code = %saved.code, "Summary record inserted");
        Ok(saved)
    }

    /// Inserts one summary record with an explicit creation time.
    ///
    /// Used for backfills, where the inspection happened earlier than the
    /// import.
    pub async fn insert_at(
        &self,
        record: &NewSummaryRecord,
        created_at: DateTime<Utc>,
    ) -> DbResult<SummaryRecord> {
        let saved = insert_row(&self.pool, record, Some(created_at)).await?;
        debug!(id = saved.id, created_at = %saved.created_at, "Summary record backfilled");
        Ok(saved)
    }

    /// Inserts every record or none of them.
    ///
    /// ## Returns
    /// * `Ok(records)` - Saved records in input order
    /// * `Err(DbError::BatchItemFailed)` - Item `index` failed; the whole
    ///   batch was rolled back
    pub async fn insert_batch(&self, records: &[NewSummaryRecord]) -> DbResult<Vec<SummaryRecord>> {
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
            let row = insert_row(&mut *tx, record, None)
                .await
                .map_err(|e| DbError::batch_item(index, e))?;
            saved.push(row);
        }

        tx.commit()
            .await
            .map_err(|e| DbError::TransactionFailed(e.to_string()))?;

        info!(count = saved.len(), "Summary batch saved");
        Ok(saved)
    }

    /// Gets a summary record by ID.
    ///
    /// ## Returns
    /// * `Ok(Some(record))` - Record found
    /// * `Ok(None)` - No record with this ID
    pub async fn get_by_id(&self, id: i64) -> DbResult<Option<SummaryRecord>> {
        let record = sqlx::query_as::<_, SummaryRecord>(
            "SELECT id, code, inspector, lot, product_name, container, destination, \
             production_line, defect_type, defect_total, observation, created_at \
             FROM defect_summaries WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(record)
    }

    /// Deletes a summary record and, by cascade, its detail records.
    pub async fn delete(&self, id: i64) -> DbResult<()> {
        let result = sqlx::query("DELETE FROM defect_summaries WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Summary record", id));
        }

        info!(id, "Summary record deleted");
        Ok(())
    }

    /// Number of summary records stored.
    pub async fn count(&self) -> DbResult<u64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM defect_summaries")
            .fetch_one(&self.pool)
            .await?;
        Ok(count as u64)
    }
}

/// Single-statement insert, usable on the pool or inside a transaction.
async fn insert_row<'e, E>(
    executor: E,
    record: &NewSummaryRecord,
    created_at: Option<DateTime<Utc>>,
) -> DbResult<SummaryRecord>
where
    E: Executor<'e, Database = Sqlite>,
{
    let observation = if record.observation.trim().is_empty() {
        PLACEHOLDER
    } else {
        record.observation.as_str()
    };

    let sql = format!(
        "INSERT INTO defect_summaries \
         (code, inspector, lot, product_name, container, destination, \
          production_line, defect_type, defect_total, observation, created_at) \
         VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, \
          COALESCE(?, strftime('%Y-%m-%dT%H:%M:%f+00:00', 'now'))) {RETURNING}"
    );

    let saved = sqlx::query_as::<_, SummaryRecord>(&sql)
        .bind(&record.code)
        .bind(&record.inspector)
        .bind(&record.lot)
        .bind(&record.product_name)
        .bind(&record.container)
        .bind(&record.destination)
        .bind(&record.production_line)
        .bind(&record.defect_type)
        .bind(record.defect_total)
        .bind(observation)
        .bind(created_at.map(timestamp_text))
        .fetch_one(executor)
        .await?;

    Ok(saved)
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Database, DbConfig};
    use chrono::{NaiveDate, TimeZone};
    use linecheck_core::NewDetailRecord;

    fn sample(defect_type: &str, total: i64) -> NewSummaryRecord {
        NewSummaryRecord {
            code: "4-03-0000-0019".to_string(),
            inspector: "Juan Pérez".to_string(),
            lot: "115".to_string(),
            product_name: "JUGO NARANJA 1L".to_string(),
            container: "BOTELLA PET".to_string(),
            destination: "NACIONAL".to_string(),
            production_line: "Linea 1".to_string(),
            defect_type: defect_type.to_string(),
            defect_total: total,
            observation: PLACEHOLDER.to_string(),
        }
    }

    async fn db() -> Database {
        Database::new(DbConfig::in_memory()).await.unwrap()
    }

    #[tokio::test]
    async fn test_insert_assigns_increasing_ids() {
        let db = db().await;
        let repo = db.summaries();

        let first = repo.insert(&sample("LLENADO", 15)).await.unwrap();
        let second = repo.insert(&sample("CAPSULADO", 4)).await.unwrap();

        assert!(second.id > first.id);
        assert_eq!(first.defect_type, "LLENADO");
        assert_eq!(first.observation, "---");
        assert!(first.created_at <= Utc::now());
        assert_eq!(repo.get_by_id(first.id).await.unwrap(), Some(first));
    }

    #[tokio::test]
    async fn test_blank_observation_becomes_placeholder() {
        let db = db().await;
        let mut record = sample("LLENADO", 1);
        record.observation = "  ".to_string();

        let saved = db.summaries().insert(&record).await.unwrap();
        assert_eq!(saved.observation, PLACEHOLDER);
    }

    #[tokio::test]
    async fn test_insert_at_keeps_timestamp() {
        let db = db().await;
        let at = Utc.with_ymd_and_hms(2024, 1, 15, 14, 30, 25).unwrap();

        let saved = db.summaries().insert_at(&sample("LLENADO", 2), at).await.unwrap();
        assert_eq!(saved.created_at, at);
    }

    #[tokio::test]
    async fn test_batch_returns_records_in_order() {
        let db = db().await;
        let batch = vec![sample("LLENADO", 15), sample("CAPSULADO", 3), sample("ETIQUETADO", 1)];

        let saved = db.summaries().insert_batch(&batch).await.unwrap();

        let types: Vec<_> = saved.iter().map(|r| r.defect_type.as_str()).collect();
        assert_eq!(types, vec!["LLENADO", "CAPSULADO", "ETIQUETADO"]);
        assert_eq!(db.summaries().count().await.unwrap(), 3);
    }

    #[tokio::test]
    async fn test_empty_batch_is_noop() {
        let db = db().await;
        assert!(db.summaries().insert_batch(&[]).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_get_missing_returns_none() {
        let db = db().await;
        assert_eq!(db.summaries().get_by_id(999).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_delete_cascades_to_own_details_only() {
        let db = db().await;
        let keep = db.summaries().insert(&sample("LLENADO", 3)).await.unwrap();
        let removed = db.summaries().insert(&sample("CAPSULADO", 2)).await.unwrap();

        let date = NaiveDate::from_ymd_opt(2024, 1, 15).unwrap();
        for (summary_id, hour) in [(keep.id, "08:00"), (removed.id, "08:00"), (removed.id, "09:00")] {
            db.details()
                .insert(&NewDetailRecord {
                    summary_id,
                    date,
                    hour: hour.to_string(),
                    description: "Nivel de llenado bajo".to_string(),
                    defect_count: 1,
                })
                .await
                .unwrap();
        }

        db.summaries().delete(removed.id).await.unwrap();

        assert_eq!(db.details().count().await.unwrap(), 1);
        assert_eq!(db.details().list_for_summary(keep.id).await.unwrap().len(), 1);
        assert!(db.details().list_for_summary(removed.id).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_delete_missing_is_not_found() {
        let db = db().await;
        let err = db.summaries().delete(42).await.unwrap_err();
        assert!(matches!(err, DbError::NotFound { .. }));
    }
}
