//! # Suggest Repository
//!
//! Autocomplete for the history filters' code and lot inputs.
//!
//! ```text
//! term "4-0" ──► trim, ≥ 2 chars? ──no──► []
//!                       │
//!                      yes
//!                       ▼
//!    SELECT DISTINCT s.<field> ... LIKE '%4-0%' [AND line = ?] LIMIT 10
//! ```

use sqlx::SqlitePool;
use tracing::debug;

use crate::error::DbResult;
use crate::query;
use linecheck_core::validation::suggest_term;
use linecheck_core::{HistorySource, SuggestField, SUGGEST_LIMIT};

/// Repository for autocomplete lookups.
#[derive(Debug, Clone)]
pub struct SuggestRepository {
    pool: SqlitePool,
}

impl SuggestRepository {
    /// Creates a new SuggestRepository.
    pub fn new(pool: SqlitePool) -> Self {
        SuggestRepository { pool }
    }

    /// Up to ten distinct values of `field` containing `term`.
    ///
    /// ## Arguments
    /// * `term` - Partial input; under two characters returns `[]`
    /// * `field` - Code or lot
    /// * `line` - Only values recorded on this production line
    /// * `source` - `Detail` suggests only values with hourly detail rows
    ///
    /// ## Example
    /// ```rust,ignore
    /// let codes = db
    ///     .suggestions()
    ///     .suggest("0019", SuggestField::Code, Some("Linea 1"), HistorySource::Detail)
    ///     .await?;
    /// ```
    pub async fn suggest(
        &self,
        term: &str,
        field: SuggestField,
        line: Option<&str>,
        source: HistorySource,
    ) -> DbResult<Vec<String>> {
        let Some(term) = suggest_term(term) else {
            return Ok(Vec::new());
        };

        let values = query::suggest(term, field, line, source, SUGGEST_LIMIT)
            .build_query_scalar::<String>()
            .fetch_all(&self.pool)
            .await?;

        debug!(
            term = %term,
            field = ?field,
            source = ?source,
            count = values.len(),
            "Autocomplete lookup"
        );
        Ok(values)
    }
}
