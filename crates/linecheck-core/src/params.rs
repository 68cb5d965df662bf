//! # Boundary Parameters
//!
//! Converts the loose, string-typed parameters a request handler receives
//! into a validated [`HistoryFilter`] and [`PageRequest`].
//!
//! ```text
//!  ?linea=Linea 1&fecha_inicio=2024-01-01&tipo_defecto=todos&pagina=2
//!        │
//!        ▼
//!  HistoryParams (raw strings, serde)
//!        │  into_query()
//!        ▼
//!  HistoryFilter { line: Some("Linea 1"), start: 2024-01-01, defect_type: None }
//!  PageRequest   { offset: 20, limit: 20 }
//! ```

use serde::Deserialize;

use crate::error::ValidationResult;
use crate::filter::{DateRange, HistoryFilter};
use crate::page::PageRequest;
use crate::validation::{non_empty, parse_iso_date};
use crate::{ALL_DEFECT_TYPES, DEFAULT_PAGE_SIZE};

/// Raw history query parameters as received from a front end.
///
/// Field aliases accept the Spanish parameter names used by the inspection
/// form, so existing query strings keep working.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct HistoryParams {
    #[serde(default, alias = "linea")]
    pub line: Option<String>,

    /// `YYYY-MM-DD`, inclusive.
    #[serde(default, alias = "fecha_inicio")]
    pub start_date: Option<String>,

    /// `YYYY-MM-DD`, inclusive.
    #[serde(default, alias = "fecha_fin")]
    pub end_date: Option<String>,

    /// `"todos"` (any case) means no filter.
    #[serde(default, alias = "tipo_defecto")]
    pub defect_type: Option<String>,

    #[serde(default, alias = "lote")]
    pub lot: Option<String>,

    #[serde(default, alias = "codigo")]
    pub code: Option<String>,

    /// 1-indexed. Defaults to 1.
    #[serde(default, alias = "pagina")]
    pub page: Option<u64>,

    /// Defaults to [`DEFAULT_PAGE_SIZE`].
    #[serde(default, alias = "limite")]
    pub page_size: Option<u32>,
}

impl HistoryParams {
    /// Validates and converts the parameters.
    ///
    /// ## Returns
    /// * `Err(ValidationError::InvalidFormat)` - malformed date, or start
    ///   after end
    /// * `Err(ValidationError::MustBePositive)` - page 0
    /// * `Err(ValidationError::OutOfRange)` - page size 0 or too large
    pub fn into_query(self) -> ValidationResult<(HistoryFilter, PageRequest)> {
        self.into_query_with_default(DEFAULT_PAGE_SIZE)
    }

    /// Same as [`into_query`](Self::into_query) with a caller-chosen
    /// default page size.
    pub fn into_query_with_default(
        self,
        default_page_size: u32,
    ) -> ValidationResult<(HistoryFilter, PageRequest)> {
        let start = non_empty(self.start_date.as_deref())
            .map(|s| parse_iso_date("start_date", &s))
            .transpose()?;
        let end = non_empty(self.end_date.as_deref())
            .map(|s| parse_iso_date("end_date", &s))
            .transpose()?;

        let defect_type = non_empty(self.defect_type.as_deref())
            .filter(|t| !t.eq_ignore_ascii_case(ALL_DEFECT_TYPES));

        let filter = HistoryFilter {
            production_line: non_empty(self.line.as_deref()),
            defect_type,
            dates: DateRange::new(start, end)?,
            lot: non_empty(self.lot.as_deref()),
            code: non_empty(self.code.as_deref()),
        };

        let page = PageRequest::from_page_number(
            self.page.unwrap_or(1),
            self.page_size.unwrap_or(default_page_size),
        )?;

        Ok((filter, page))
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
