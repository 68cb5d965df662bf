//! # History Repository
//!
//! The two paginated history read paths and the distinct defect-type
//! lookup that feeds their filter drop-down.
//!
//! ## Query Sequence
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  detail_history(&filter, page)                                          │
//! │       │                                                                 │
//! │       ├── ComposedQuery::count()   → total      (pagination ignored)   │
//! │       ├── ComposedQuery::page(..)  → rows       (ORDER BY id DESC)     │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  Page { records, total, current_page, total_pages }                    │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Both statements run on the same pooled connection, so on a quiet
//! database the total and the page describe the same snapshot.

use sqlx::SqlitePool;
use tracing::debug;

use crate::error::DbResult;
use crate::query::{self, ComposedQuery};
use linecheck_core::{DetailHistoryRow, HistoryFilter, HistorySource, Page, PageRequest, SummaryRecord};

/// Repository for history queries.
///
/// ## Usage
/// ```rust,ignore
/// let filter = HistoryFilter::new().line("Linea 1").defect_type("LLENADO");
/// let page = db.history().detail_history(&filter, PageRequest::first(20)?).await?;
/// ```
#[derive(Debug, Clone)]
pub struct HistoryRepository {
    pool: SqlitePool,
}

impl HistoryRepository {
    /// Creates a new HistoryRepository.
    pub fn new(pool: SqlitePool) -> Self {
        HistoryRepository { pool }
    }

    /// Hourly detail rows joined to their summaries, newest detail first.
    pub async fn detail_history(
        &self,
        filter: &HistoryFilter,
        page: PageRequest,
    ) -> DbResult<Page<DetailHistoryRow>> {
        self.fetch_page(HistorySource::Detail, filter, page).await
    }

    /// Summary rows, newest first. Date bounds apply to `created_at`.
    pub async fn summary_history(
        &self,
        filter: &HistoryFilter,
        page: PageRequest,
    ) -> DbResult<Page<SummaryRecord>> {
        self.fetch_page(HistorySource::Summary, filter, page).await
    }

    /// Distinct defect types present in summary records.
    ///
    /// Empty values are skipped. Order is unspecified.
    ///
    /// ## Arguments
    /// * `line` - Restrict to one production line, or `None` for all
    pub async fn defect_types(&self, line: Option<&str>) -> DbResult<Vec<String>> {
        let types = query::defect_types(line)
            .build_query_scalar::<String>()
            .fetch_all(&self.pool)
            .await?;

        debug!(line = ?line, count = types.len(), "Loaded distinct defect types");
        Ok(types)
    }

    async fn fetch_page<T>(
        &self,
        source: HistorySource,
        filter: &HistoryFilter,
        page: PageRequest,
    ) -> DbResult<Page<T>>
    where
        T: for<'r> sqlx::FromRow<'r, sqlx::sqlite::SqliteRow> + Send + Unpin,
    {
        let composed = ComposedQuery::new(source, filter);
        let mut conn = self.pool.acquire().await?;

        let total: i64 = composed
            .count()
            .build_query_scalar()
            .fetch_one(&mut *conn)
            .await?;

        let records = composed
            .page(page)
            .build_query_as::<T>()
            .fetch_all(&mut *conn)
            .await?;

        debug!(
            source = ?source,
            total,
            offset = page.offset(),
            limit = page.limit(),
            returned = records.len(),
            "History page fetched"
        );

        Ok(Page::new(records, total as u64, page))
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Database, DbConfig};
    use chrono::{NaiveDate, TimeZone, Utc};
    use linecheck_core::{DateRange, NewDetailRecord, NewSummaryRecord, PLACEHOLDER};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn summary(code: &str, lot: &str, line: &str, defect_type: &str) -> NewSummaryRecord {
        NewSummaryRecord {
            code: code.to_string(),
            inspector: "Juan Pérez".to_string(),
            lot: lot.to_string(),
            product_name: "JUGO NARANJA 1L".to_string(),
            container: "BOTELLA PET".to_string(),
            destination: "NACIONAL".to_string(),
            production_line: line.to_string(),
            defect_type: defect_type.to_string(),
            defect_total: 0,
            observation: PLACEHOLDER.to_string(),
        }
    }

    fn detail(summary_id: i64, on: NaiveDate, hour: &str, count: i64) -> NewDetailRecord {
        NewDetailRecord {
            summary_id,
            date: on,
            hour: hour.to_string(),
            description: "Nivel de llenado bajo".to_string(),
            defect_count: count,
        }
    }

    async fn db() -> Database {
        Database::new(DbConfig::in_memory()).await.unwrap()
    }

    #[tokio::test]
    async fn test_line_and_type_scenario() {
        let db = db().await;
        let llenado = db
            .summaries()
            .insert(&summary("4-03-0000-0019", "115", "Linea 1", "LLENADO"))
            .await
            .unwrap();
        let capsulado = db
            .summaries()
            .insert(&summary("4-03-0000-0019", "115", "Linea 1", "CAPSULADO"))
            .await
            .unwrap();
        db.details()
            .insert_batch(&[
                detail(llenado.id, date(2024, 1, 15), "08:00", 3),
                detail(llenado.id, date(2024, 1, 15), "09:00", 2),
                detail(capsulado.id, date(2024, 1, 15), "08:00", 1),
            ])
            .await
            .unwrap();

        let filter = HistoryFilter::new().line("Linea 1").defect_type("LLENADO");
        let page = db
            .history()
            .detail_history(&filter, PageRequest::first(20).unwrap())
            .await
            .unwrap();

        assert_eq!(page.total, 2);
        assert_eq!(page.current_page, 1);
        assert_eq!(page.total_pages, 1);
        let hours: Vec<_> = page.records.iter().map(|r| r.hour.as_str()).collect();
        assert_eq!(hours, vec!["09:00", "08:00"]);
        assert!(page.records.iter().all(|r| r.defect_type == "LLENADO"));

        let json = serde_json::to_value(&page).unwrap();
        assert_eq!(json["records"][0]["date"], "15/01/2024");
        assert_eq!(json["records"][0]["code"], "4-03-0000-0019");
    }

    #[tokio::test]
    async fn test_empty_result_is_not_an_error() {
        let db = db().await;

        let filter = HistoryFilter::new().code("nothing-here");
        let page = db
            .history()
            .detail_history(&filter, PageRequest::first(20).unwrap())
            .await
            .unwrap();

        assert!(page.records.is_empty());
        assert_eq!(page.total, 0);
        assert_eq!(page.total_pages, 0);
        assert_eq!(page.current_page, 1);
    }

    #[tokio::test]
    async fn test_detail_date_range_is_inclusive() {
        let db = db().await;
        let s = db
            .summaries()
            .insert(&summary("4-03-0000-0019", "115", "Linea 1", "LLENADO"))
            .await
            .unwrap();
        for day in 9..=16 {
            db.details()
                .insert(&detail(s.id, date(2024, 1, day), "08:00", 1))
                .await
                .unwrap();
        }

        let range = DateRange::new(Some(date(2024, 1, 10)), Some(date(2024, 1, 15))).unwrap();
        let page = db
            .history()
            .detail_history(&HistoryFilter::new().dates(range), PageRequest::first(50).unwrap())
            .await
            .unwrap();

        assert_eq!(page.total, 6);
        assert!(page.records.iter().all(|r| range.contains(r.date)));
    }

    #[tokio::test]
    async fn test_summary_path_includes_whole_end_day() {
        let db = db().await;
        let record = summary("4-03-0000-0019", "115", "Linea 1", "LLENADO");
        let repo = db.summaries();
        repo.insert_at(&record, Utc.with_ymd_and_hms(2024, 1, 9, 23, 59, 59).unwrap())
            .await
            .unwrap();
        let first = repo
            .insert_at(&record, Utc.with_ymd_and_hms(2024, 1, 10, 0, 0, 0).unwrap())
            .await
            .unwrap();
        let last = repo
            .insert_at(&record, Utc.with_ymd_and_hms(2024, 1, 15, 23, 59, 59).unwrap())
            .await
            .unwrap();
        repo.insert_at(&record, Utc.with_ymd_and_hms(2024, 1, 16, 0, 0, 0).unwrap())
            .await
            .unwrap();

        let range = DateRange::new(Some(date(2024, 1, 10)), Some(date(2024, 1, 15))).unwrap();
        let page = db
            .history()
            .summary_history(&HistoryFilter::new().dates(range), PageRequest::first(20).unwrap())
            .await
            .unwrap();

        let ids: Vec<_> = page.records.iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![last.id, first.id]);
    }

    #[tokio::test]
    async fn test_lot_and_code_match_substrings_ignoring_case() {
        let db = db().await;
        db.summaries()
            .insert_batch(&[
                summary("4-03-0000-0019", "LOTE-115A", "Linea 1", "LLENADO"),
                summary("4-03-0000-0020", "LOTE-116", "Linea 1", "LLENADO"),
                summary("5-10-0000-0001", "lote-115b", "Linea 2", "LLENADO"),
            ])
            .await
            .unwrap();
        let first = PageRequest::first(20).unwrap();

        let by_lot = db
            .history()
            .summary_history(&HistoryFilter::new().lot("lote-115"), first)
            .await
            .unwrap();
        assert_eq!(by_lot.total, 2);

        let by_code = db
            .history()
            .summary_history(&HistoryFilter::new().code("4-03"), first)
            .await
            .unwrap();
        assert_eq!(by_code.total, 2);
    }

    #[tokio::test]
    async fn test_like_wildcards_match_literally() {
        let db = db().await;
        db.summaries()
            .insert_batch(&[
                summary("4-03-0000-0019", "L_1", "Linea 1", "LLENADO"),
                summary("4-03-0000-0019", "LX1", "Linea 1", "LLENADO"),
                summary("4-03-0000-0019", "100%", "Linea 1", "LLENADO"),
            ])
            .await
            .unwrap();
        let first = PageRequest::first(20).unwrap();

        let underscore = db
            .history()
            .summary_history(&HistoryFilter::new().lot("L_1"), first)
            .await
            .unwrap();
        assert_eq!(underscore.total, 1);
        assert_eq!(underscore.records[0].lot, "L_1");

        let percent = db
            .history()
            .summary_history(&HistoryFilter::new().lot("%"), first)
            .await
            .unwrap();
        assert_eq!(percent.total, 1);
    }

    #[tokio::test]
    async fn test_pages_partition_results() {
        let db = db().await;
        let s = db
            .summaries()
            .insert(&summary("4-03-0000-0019", "115", "Linea 1", "LLENADO"))
            .await
            .unwrap();
        let batch: Vec<_> = (0..45)
            .map(|i| detail(s.id, date(2024, 1, 15), &format!("{:02}:00", i % 24), 1))
            .collect();
        db.details().insert_batch(&batch).await.unwrap();

        let filter = HistoryFilter::new();
        let last = db
            .history()
            .detail_history(&filter, PageRequest::from_page_number(5, 10).unwrap())
            .await
            .unwrap();
        assert_eq!(last.total, 45);
        assert_eq!(last.total_pages, 5);
        assert_eq!(last.current_page, 5);
        assert_eq!(last.records.len(), 5);
        assert!(!last.has_next());

        let beyond = db
            .history()
            .detail_history(&filter, PageRequest::from_page_number(6, 10).unwrap())
            .await
            .unwrap();
        assert!(beyond.records.is_empty());
        assert_eq!(beyond.total, 45);
    }

    #[tokio::test]
    async fn test_defect_types_distinct_and_scoped() {
        let db = db().await;
        db.summaries()
            .insert_batch(&[
                summary("4-03-0000-0019", "115", "Linea 1", "LLENADO"),
                summary("4-03-0000-0019", "116", "Linea 1", "LLENADO"),
                summary("4-03-0000-0019", "115", "Linea 1", "CAPSULADO"),
                summary("4-03-0000-0019", "115", "Tetrapack", "SELLADO"),
                summary("4-03-0000-0019", "115", "Tetrapack", ""),
            ])
            .await
            .unwrap();

        let mut all = db.history().defect_types(None).await.unwrap();
        all.sort();
        assert_eq!(all, vec!["CAPSULADO", "LLENADO", "SELLADO"]);

        let mut line1 = db.history().defect_types(Some("Linea 1")).await.unwrap();
        line1.sort();
        assert_eq!(line1, vec!["CAPSULADO", "LLENADO"]);

        assert!(db.history().defect_types(Some("Linea 9")).await.unwrap().is_empty());
    }
}
