//! # Query Composer
//!
//! Builds the SQL for both history read paths from a [`HistoryFilter`].
//!
//! ## Read Paths
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  HistorySource::Detail                                                  │
//! │    FROM defect_details d JOIN defect_summaries s ON d.summary_id = s.id │
//! │    dates → d.date BETWEEN start AND end          (calendar dates)       │
//! │    ORDER BY d.id DESC                                                   │
//! │                                                                         │
//! │  HistorySource::Summary                                                 │
//! │    FROM defect_summaries s                                              │
//! │    dates → s.created_at >= start 00:00 UTC                              │
//! │            s.created_at <  (end + 1 day) 00:00 UTC                      │
//! │    ORDER BY s.id DESC                                                   │
//! │                                                                         │
//! │  Shared:  s.production_line = ?   s.defect_type = ?                     │
//! │           s.lot LIKE %?%          s.code LIKE %?%                       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The count and page queries share one `WHERE` clause, so the total always
//! describes the same row set the pages are cut from.
//!
//! Every value is bound; only fixed column names are pushed as SQL text.

use chrono::{DateTime, SecondsFormat, Utc};
use linecheck_core::{HistoryFilter, HistorySource, PageRequest, SuggestField};
use sqlx::{QueryBuilder, Sqlite};

const DETAIL_FROM: &str =
    " FROM defect_details d JOIN defect_summaries s ON d.summary_id = s.id";

const SUMMARY_FROM: &str = " FROM defect_summaries s";

const DETAIL_COLUMNS: &str = "SELECT d.id AS id, d.date AS date, d.hour AS hour, \
     s.code AS code, s.lot AS lot, s.product_name AS product_name, \
     s.container AS container, s.destination AS destination, \
     s.production_line AS production_line, s.defect_type AS defect_type, \
     d.description AS description, d.defect_count AS defect_count";

const SUMMARY_COLUMNS: &str = "SELECT s.id, s.code, s.inspector, s.lot, s.product_name, \
     s.container, s.destination, s.production_line, s.defect_type, \
     s.defect_total, s.observation, s.created_at";

/// Escapes `%`, `_` and `\` so `term` matches literally inside `LIKE`.
pub fn escape_like(term: &str) -> String {
    let mut escaped = String::with_capacity(term.len());
    for c in term.chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

/// `LIKE` pattern matching `term` anywhere in the column.
pub fn contains_pattern(term: &str) -> String {
    format!("%{}%", escape_like(term))
}

/// Text form of a stored timestamp.
///
/// Matches the `created_at` column default, so stored values and range
/// bounds sort identically as strings.
pub fn timestamp_text(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Millis, false)
}

/// Appends ` WHERE`/` AND` between conditions.
struct Conditions<'q, 'args> {
    builder: &'q mut QueryBuilder<'args, Sqlite>,
    any: bool,
}

impl<'q, 'args> Conditions<'q, 'args> {
    fn new(builder: &'q mut QueryBuilder<'args, Sqlite>) -> Self {
        Conditions { builder, any: false }
    }

    fn next(&mut self) -> &mut QueryBuilder<'args, Sqlite> {
        self.builder.push(if self.any { " AND " } else { " WHERE " });
        self.any = true;
        &mut *self.builder
    }
}

// =============================================================================
// History Queries
// =============================================================================

/// A filter bound to one read path, ready to produce count and page SQL.
///
/// ## Example
/// ```rust,ignore
/// let composed = ComposedQuery::new(HistorySource::Detail, &filter);
/// let total: i64 = composed.count().build_query_scalar().fetch_one(&pool).await?;
/// let rows = composed.page(page).build_query_as::<DetailHistoryRow>().fetch_all(&pool).await?;
/// ```
#[derive(Debug, Clone, Copy)]
pub struct ComposedQuery<'f> {
    source: HistorySource,
    filter: &'f HistoryFilter,
}

impl<'f> ComposedQuery<'f> {
    pub fn new(source: HistorySource, filter: &'f HistoryFilter) -> Self {
        ComposedQuery { source, filter }
    }

    pub fn source(&self) -> HistorySource {
        self.source
    }

    /// `SELECT COUNT(*)` over the filtered rows, ignoring pagination.
    pub fn count(&self) -> QueryBuilder<'static, Sqlite> {
        let mut builder = QueryBuilder::new("SELECT COUNT(*)");
        builder.push(self.from());
        self.push_filter(&mut builder);
        builder
    }

    /// The filtered rows, newest first, cut to `page`.
    pub fn page(&self, page: PageRequest) -> QueryBuilder<'static, Sqlite> {
        let (columns, order) = match self.source {
            HistorySource::Detail => (DETAIL_COLUMNS, " ORDER BY d.id DESC"),
            HistorySource::Summary => (SUMMARY_COLUMNS, " ORDER BY s.id DESC"),
        };

        let mut builder = QueryBuilder::new(columns);
        builder.push(self.from());
        self.push_filter(&mut builder);
        builder.push(order);
        builder.push(" LIMIT ").push_bind(i64::from(page.limit()));
        builder
            .push(" OFFSET ")
            .push_bind(i64::try_from(page.offset()).unwrap_or(i64::MAX));
        builder
    }

    fn from(&self) -> &'static str {
        match self.source {
            HistorySource::Detail => DETAIL_FROM,
            HistorySource::Summary => SUMMARY_FROM,
        }
    }

    fn push_filter(&self, builder: &mut QueryBuilder<'static, Sqlite>) {
        let filter = self.filter;
        let mut conditions = Conditions::new(builder);

        if let Some(line) = &filter.production_line {
            conditions
                .next()
                .push("s.production_line = ")
                .push_bind(line.clone());
        }

        if let Some(defect_type) = &filter.defect_type {
            conditions
                .next()
                .push("s.defect_type = ")
                .push_bind(defect_type.clone());
        }

        match self.source {
            HistorySource::Detail => {
                if let Some(start) = filter.dates.start {
                    conditions.next().push("d.date >= ").push_bind(start);
                }
                if let Some(end) = filter.dates.end {
                    conditions.next().push("d.date <= ").push_bind(end);
                }
            }
            HistorySource::Summary => {
                if let Some(start) = filter.dates.start_instant() {
                    conditions
                        .next()
                        .push("s.created_at >= ")
                        .push_bind(timestamp_text(start));
                }
                if let Some(end) = filter.dates.end_instant_exclusive() {
                    conditions
                        .next()
                        .push("s.created_at < ")
                        .push_bind(timestamp_text(end));
                }
            }
        }

        if let Some(lot) = &filter.lot {
            conditions
                .next()
                .push("s.lot LIKE ")
                .push_bind(contains_pattern(lot))
                .push(" ESCAPE '\\'");
        }

        if let Some(code) = &filter.code {
            conditions
                .next()
                .push("s.code LIKE ")
                .push_bind(contains_pattern(code))
                .push(" ESCAPE '\\'");
        }
    }
}

// =============================================================================
// Lookup Queries
// =============================================================================

/// Distinct non-empty defect types, optionally scoped to one line.
pub fn defect_types(line: Option<&str>) -> QueryBuilder<'static, Sqlite> {
    let mut builder = QueryBuilder::new(
        "SELECT DISTINCT defect_type FROM defect_summaries \
         WHERE defect_type IS NOT NULL AND defect_type <> ''",
    );
    if let Some(line) = line {
        builder
            .push(" AND production_line = ")
            .push_bind(line.to_string());
    }
    builder
}

/// Distinct values of `field` containing `term`.
///
/// `term` must already be trimmed and long enough to search.
pub fn suggest(
    term: &str,
    field: SuggestField,
    line: Option<&str>,
    source: HistorySource,
    limit: u32,
) -> QueryBuilder<'static, Sqlite> {
    let column = field.column();

    let mut builder = QueryBuilder::new("SELECT DISTINCT s.");
    builder.push(column);
    builder.push(match source {
        HistorySource::Detail => DETAIL_FROM,
        HistorySource::Summary => SUMMARY_FROM,
    });

    let mut conditions = Conditions::new(&mut builder);
    conditions
        .next()
        .push("s.")
        .push(column)
        .push(" LIKE ")
        .push_bind(contains_pattern(term))
        .push(" ESCAPE '\\'");
    if let Some(line) = line {
        conditions
            .next()
            .push("s.production_line = ")
            .push_bind(line.to_string());
    }

    builder.push(" ORDER BY s.").push(column);
    builder.push(" LIMIT ").push_bind(i64::from(limit));
    builder
}

// =============================================================================
// Unit Tests
// =============================================================================
