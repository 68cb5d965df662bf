//! # History Filters
//!
//! Typed filter set for the two history read paths.
//!
//! Every dimension is optional and the set is combined with logical AND.
//! "No filter" is an absent value; there are no sentinel strings at this
//! layer (the boundary parser in [`crate::params`] maps the legacy `"todos"`
//! value to `None`).
//!
//! ```text
//! ┌──────────────────┬──────────────┬────────────────────────────────────┐
//! │ Dimension        │ Match        │ Column                             │
//! ├──────────────────┼──────────────┼────────────────────────────────────┤
//! │ production_line  │ exact        │ summary.production_line            │
//! │ defect_type      │ exact        │ summary.defect_type                │
//! │ dates            │ inclusive    │ detail.date / summary.created_at   │
//! │ lot              │ substring,   │ summary.lot                        │
//! │ code             │ case-insens. │ summary.code                       │
//! └──────────────────┴──────────────┴────────────────────────────────────┘
//! ```

use chrono::{DateTime, Days, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{ValidationError, ValidationResult};

// =============================================================================
// Date Range
// =============================================================================

/// Inclusive calendar-date range. Either bound may be open.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
}

impl DateRange {
    /// Creates a range, rejecting `start > end`.
    pub fn new(start: Option<NaiveDate>, end: Option<NaiveDate>) -> ValidationResult<Self> {
        if let (Some(s), Some(e)) = (start, end) {
            if s > e {
                return Err(ValidationError::invalid_format(
                    "date_range",
                    format!("start {s} is after end {e}"),
                ));
            }
        }
        Ok(DateRange { start, end })
    }

    /// A range with no bounds.
    pub fn unbounded() -> Self {
        DateRange::default()
    }

    pub fn is_unbounded(&self) -> bool {
        self.start.is_none() && self.end.is_none()
    }

    /// Whether `date` falls inside the range.
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start.map_or(true, |s| date >= s) && self.end.map_or(true, |e| date <= e)
    }

    /// Lower timestamp bound (inclusive): midnight UTC of `start`.
    pub fn start_instant(&self) -> Option<DateTime<Utc>> {
        self.start.map(|d| d.and_time(NaiveTime::MIN).and_utc())
    }

    /// Upper timestamp bound (exclusive): midnight UTC of the day after `end`,
    /// so the whole final day is included.
    pub fn end_instant_exclusive(&self) -> Option<DateTime<Utc>> {
        self.end.map(|d| {
            d.checked_add_days(Days::new(1))
                .unwrap_or(NaiveDate::MAX)
                .and_time(NaiveTime::MIN)
                .and_utc()
        })
    }

    /// Whether a summary timestamp falls inside the range.
    pub fn contains_instant(&self, at: DateTime<Utc>) -> bool {
        self.start_instant().map_or(true, |s| at >= s)
            && self.end_instant_exclusive().map_or(true, |e| at < e)
    }
}

// =============================================================================
// History Filter
// =============================================================================

/// Filter set shared by the detail and summary history paths.
///
/// ## Example
/// ```rust
/// use linecheck_core::HistoryFilter;
///
/// let filter = HistoryFilter::new()
///     .line("Linea 1")
///     .defect_type("LLENADO")
///     .lot("11");
/// assert_eq!(filter.production_line.as_deref(), Some("Linea 1"));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryFilter {
    pub production_line: Option<String>,
    pub defect_type: Option<String>,
    pub dates: DateRange,
    pub lot: Option<String>,
    pub code: Option<String>,
}

impl HistoryFilter {
    /// An empty filter: every row matches.
    pub fn new() -> Self {
        HistoryFilter::default()
    }

    pub fn line(mut self, line: impl Into<String>) -> Self {
        self.production_line = Some(line.into());
        self
    }

    pub fn defect_type(mut self, defect_type: impl Into<String>) -> Self {
        self.defect_type = Some(defect_type.into());
        self
    }

    pub fn dates(mut self, dates: DateRange) -> Self {
        self.dates = dates;
        self
    }

    pub fn lot(mut self, lot: impl Into<String>) -> Self {
        self.lot = Some(lot.into());
        self
    }

    pub fn code(mut self, code: impl Into<String>) -> Self {
        self.code = Some(code.into());
        self
    }

    /// Whether no dimension is constrained.
    pub fn is_empty(&self) -> bool {
        self.production_line.is_none()
            && self.defect_type.is_none()
            && self.dates.is_unbounded()
            && self.lot.is_none()
            && self.code.is_none()
    }
}

/// Case-insensitive substring test used for lot and code matching.
///
/// Mirrors SQLite's `LIKE`, which folds ASCII letters only.
pub fn contains_ignore_ascii_case(haystack: &str, needle: &str) -> bool {
    haystack
        .to_ascii_lowercase()
        .contains(&needle.to_ascii_lowercase())
}

// =============================================================================
// Lookup Selectors
// =============================================================================

/// Which table a history-side lookup reads from.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HistorySource {
    /// Hourly detail records joined to their summaries.
    #[default]
    Detail,
    /// Summary records only.
    Summary,
}

/// Field an autocomplete suggestion is drawn from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SuggestField {
    Code,
    Lot,
}

impl SuggestField {
    /// Summary-table column holding this field.
    pub fn column(&self) -> &'static str {
        match self {
            SuggestField::Code => "code",
            SuggestField::Lot => "lot",
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_range_rejects_inverted_bounds() {
        assert!(DateRange::new(Some(date(2024, 2, 1)), Some(date(2024, 1, 1))).is_err());
        assert!(DateRange::new(Some(date(2024, 1, 1)), Some(date(2024, 1, 1))).is_ok());
    }

    #[test]
    fn test_range_contains_is_inclusive() {
        let range = DateRange::new(Some(date(2024, 1, 10)), Some(date(2024, 1, 15))).unwrap();
        assert!(range.contains(date(2024, 1, 10)));
        assert!(range.contains(date(2024, 1, 15)));
        assert!(!range.contains(date(2024, 1, 16)));
        assert!(DateRange::unbounded().contains(date(1999, 12, 31)));
    }

    #[test]
    fn test_end_instant_covers_final_day() {
        let range = DateRange::new(None, Some(date(2024, 1, 15))).unwrap();
        assert_eq!(
            range.end_instant_exclusive(),
            Some(Utc.with_ymd_and_hms(2024, 1, 16, 0, 0, 0).unwrap())
        );
        assert!(range.contains_instant(Utc.with_ymd_and_hms(2024, 1, 15, 23, 59, 59).unwrap()));
        assert!(!range.contains_instant(Utc.with_ymd_and_hms(2024, 1, 16, 0, 0, 0).unwrap()));
    }

    #[test]
    fn test_filter_builder() {
        assert!(HistoryFilter::new().is_empty());
        let filter = HistoryFilter::new().code("4-03");
        assert!(!filter.is_empty());
        assert_eq!(filter.code.as_deref(), Some("4-03"));
    }

    #[test]
    fn test_contains_ignore_ascii_case() {
        assert!(contains_ignore_ascii_case("LOTE-115A", "115a"));
        assert!(!contains_ignore_ascii_case("LOTE-115A", "116"));
    }
}
