//! # Domain Types
//!
//! Records persisted by LineCheck and the rows returned by history queries.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐  1 ──── N  ┌─────────────────┐                     │
//! │  │  SummaryRecord  │◄──────────│  DetailRecord   │                     │
//! │  │  ─────────────  │  cascade   │  ─────────────  │                     │
//! │  │  id             │  delete    │  id             │                     │
//! │  │  code, lot      │            │  summary_id(FK) │                     │
//! │  │  production_line│            │  date, hour     │                     │
//! │  │  defect_type    │            │  description    │                     │
//! │  │  defect_total   │            │  defect_count   │                     │
//! │  │  created_at     │            └─────────────────┘                     │
//! │  └─────────────────┘                                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌──────────────────┐      │
//! │  │    Product      │   │   Inspector     │   │ DetailHistoryRow │      │
//! │  │  (catalog, RO)  │   │  id, name       │   │ detail ⋈ summary │      │
//! │  └─────────────────┘   └─────────────────┘   └──────────────────┘      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Denormalized Inspector Name
//! Summary records keep the inspector's name as plain text. Removing an
//! inspector from the registry leaves every historical record untouched.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize, Serializer};
use ts_rs::TS;

use crate::PLACEHOLDER;

fn placeholder() -> String {
    PLACEHOLDER.to_string()
}

/// Display format for detail dates in history output.
pub const DISPLAY_DATE_FORMAT: &str = "%d/%m/%Y";

fn serialize_display_date<S>(date: &NaiveDate, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.collect_str(&date.format(DISPLAY_DATE_FORMAT))
}

// =============================================================================
// Summary Record
// =============================================================================

/// One defect type's total from a single "save" on the inspection form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct SummaryRecord {
    /// Auto-assigned identifier. Higher means inserted later.
    pub id: i64,

    /// Product catalog code (e.g. "4-03-0000-0019").
    pub code: String,

    /// Inspector name, stored as text.
    pub inspector: String,

    /// Production lot number.
    pub lot: String,

    pub product_name: String,

    pub container: String,

    pub destination: String,

    /// Production line (e.g. "Linea 1", "Tetrapack").
    pub production_line: String,

    /// Defect category (e.g. "LLENADO", "CAPSULADO").
    pub defect_type: String,

    /// Total defects of this type found in the save.
    pub defect_total: i64,

    /// Free-text observation, `"---"` when none was given.
    pub observation: String,

    /// When the record was saved. Serialized as ISO-8601.
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
}

/// Payload for creating a summary record.
///
/// The identifier and creation timestamp are assigned by the store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct NewSummaryRecord {
    pub code: String,
    pub inspector: String,
    pub lot: String,
    pub product_name: String,
    pub container: String,
    pub destination: String,
    pub production_line: String,
    pub defect_type: String,
    pub defect_total: i64,
    #[serde(default = "placeholder")]
    pub observation: String,
}

// =============================================================================
// Detail Record
// =============================================================================

/// One non-zero hourly cell of the inspection grid.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct DetailRecord {
    pub id: i64,

    /// Parent summary record.
    pub summary_id: i64,

    /// Calendar date of the inspection.
    #[ts(as = "String")]
    pub date: NaiveDate,

    /// Hour bucket label (e.g. "08:00"). Opaque text, never parsed.
    pub hour: String,

    /// Specific defect description (e.g. "Nivel de llenado bajo").
    pub description: String,

    /// Defects counted in that hour.
    pub defect_count: i64,
}

/// Payload for creating a detail record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct NewDetailRecord {
    pub summary_id: i64,
    #[ts(as = "String")]
    pub date: NaiveDate,
    pub hour: String,
    #[serde(default = "placeholder")]
    pub description: String,
    #[serde(default)]
    pub defect_count: i64,
}

// =============================================================================
// Detail History Row
// =============================================================================

/// Flattened row of the detail-level history.
///
/// Detail fields come from the hourly record; the product, lot, line and
/// defect type come from its parent summary record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct DetailHistoryRow {
    /// Detail record identifier.
    pub id: i64,

    /// Rendered as `DD/MM/YYYY`.
    #[serde(serialize_with = "serialize_display_date")]
    #[ts(as = "String")]
    pub date: NaiveDate,

    pub hour: String,
    pub code: String,
    pub lot: String,
    pub product_name: String,
    pub container: String,
    pub destination: String,
    pub production_line: String,
    pub defect_type: String,
    pub description: String,
    pub defect_count: i64,
}

// =============================================================================
// Product Catalog
// =============================================================================

/// A product catalog entry. Reference data, loaded in bulk.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct Product {
    pub id: i64,

    /// Unique catalog code.
    pub code: String,

    pub name: String,

    pub container: String,

    pub destination: String,

    /// Comma-separated list of lines that may produce this product.
    pub production_lines: String,
}

impl Product {
    /// Splits `production_lines` into trimmed, non-empty line names.
    ///
    /// ## Example
    /// ```rust
    /// use linecheck_core::Product;
    ///
    /// let product = Product {
    ///     id: 1,
    ///     code: "4-03-0000-0019".into(),
    ///     name: "JUGO NARANJA 1L".into(),
    ///     container: "BOTELLA PET".into(),
    ///     destination: "NACIONAL".into(),
    ///     production_lines: "Linea 1, Linea 2,".into(),
    /// };
    /// assert_eq!(product.lines(), vec!["Linea 1", "Linea 2"]);
    /// ```
    pub fn lines(&self) -> Vec<&str> {
        self.production_lines
            .split(',')
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .collect()
    }

    /// Whether `line` is one of this product's eligible lines.
    pub fn runs_on(&self, line: &str) -> bool {
        self.lines().iter().any(|l| *l == line)
    }
}

/// Payload for inserting a catalog entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewProduct {
    pub code: String,
    pub name: String,
    pub container: String,
    pub destination: String,
    pub production_lines: String,
}

// =============================================================================
// Inspector
// =============================================================================

/// A registered inspector.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct Inspector {
    pub id: i64,
    pub name: String,
}

// =============================================================================
// Unit Tests
// =============================================================================
