//! # Validation Module
//!
//! Input validation shared by the boundary parser and the repositories.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: Boundary (params.rs)                                         │
//! │  ├── Date strings, page numbers, page sizes                            │
//! │  └── Empty strings / "todos" → no filter                               │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: Repository (linecheck-db)                                    │
//! │  ├── Inspector name length and uniqueness                              │
//! │  └── Autocomplete minimum term length                                  │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Database (SQLite)                                            │
//! │  ├── NOT NULL / UNIQUE constraints                                     │
//! │  └── Foreign key constraints                                           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::NaiveDate;

use crate::error::{ValidationError, ValidationResult};
use crate::{INSPECTOR_NAME_MAX, INSPECTOR_NAME_MIN, SUGGEST_MIN_CHARS};

/// Accepted input format for dates at the boundary.
pub const ISO_DATE_FORMAT: &str = "%Y-%m-%d";

// =============================================================================
// String Validators
// =============================================================================

/// Validates an inspector name.
///
/// ## Rules
/// - Between 3 and 100 characters (counted as chars, not bytes)
/// - Not blank
///
/// ## Example
/// ```rust
/// use linecheck_core::validation::validate_inspector_name;
///
/// assert!(validate_inspector_name("María García").is_ok());
/// assert!(validate_inspector_name("AB").is_err());
/// ```
pub fn validate_inspector_name(name: &str) -> ValidationResult<()> {
    if name.trim().is_empty() {
        return Err(ValidationError::Required {
            field: "name".to_string(),
        });
    }

    let len = name.chars().count();
    if len < INSPECTOR_NAME_MIN {
        return Err(ValidationError::TooShort {
            field: "name".to_string(),
            min: INSPECTOR_NAME_MIN,
        });
    }
    if len > INSPECTOR_NAME_MAX {
        return Err(ValidationError::TooLong {
            field: "name".to_string(),
            max: INSPECTOR_NAME_MAX,
        });
    }

    Ok(())
}

/// Returns the trimmed autocomplete term, or `None` when it is too short
/// to search.
///
/// ## Example
/// ```rust
/// use linecheck_core::validation::suggest_term;
///
/// assert_eq!(suggest_term(" 4-03 "), Some("4-03"));
/// assert_eq!(suggest_term("4"), None);
/// ```
pub fn suggest_term(term: &str) -> Option<&str> {
    let term = term.trim();
    (term.chars().count() >= SUGGEST_MIN_CHARS).then_some(term)
}

/// Trims a loose string parameter; empty means absent.
pub fn non_empty(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

// =============================================================================
// Date Validators
// =============================================================================

/// Parses a strict `YYYY-MM-DD` date.
///
/// ## Example
/// ```rust
/// use linecheck_core::validation::parse_iso_date;
///
/// assert!(parse_iso_date("start_date", "2024-01-15").is_ok());
/// assert!(parse_iso_date("start_date", "15/01/2024").is_err());
/// ```
pub fn parse_iso_date(field: &str, value: &str) -> ValidationResult<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), ISO_DATE_FORMAT).map_err(|e| {
        ValidationError::invalid_format(field, format!("expected YYYY-MM-DD ({e})"))
    })
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_inspector_name_bounds() {
        assert!(validate_inspector_name("Ana").is_ok());
        assert!(matches!(
            validate_inspector_name("   "),
            Err(ValidationError::Required { .. })
        ));
        assert!(matches!(
            validate_inspector_name("Al"),
            Err(ValidationError::TooShort { min: 3, .. })
        ));
        assert!(validate_inspector_name(&"x".repeat(100)).is_ok());
        assert!(matches!(
            validate_inspector_name(&"x".repeat(101)),
            Err(ValidationError::TooLong { max: 100, .. })
        ));
    }

    #[test]
    fn test_inspector_name_counts_chars() {
        // Three characters, five bytes.
        assert!(validate_inspector_name("Ñañ").is_ok());
    }

    #[test]
    fn test_suggest_term() {
        assert_eq!(suggest_term(""), None);
        assert_eq!(suggest_term(" a "), None);
        assert_eq!(suggest_term("ab"), Some("ab"));
        assert_eq!(suggest_term("ñ"), None);
    }

    #[test]
    fn test_non_empty() {
        assert_eq!(non_empty(None), None);
        assert_eq!(non_empty(Some("  ")), None);
        assert_eq!(non_empty(Some(" Linea 1 ")), Some("Linea 1".to_string()));
    }

    #[test]
    fn test_parse_iso_date() {
        assert_eq!(
            parse_iso_date("start_date", "2024-01-15").unwrap(),
            NaiveDate::from_ymd_opt(2024, 1, 15).unwrap()
        );
        assert!(parse_iso_date("start_date", "2024-02-30").is_err());
        assert!(parse_iso_date("start_date", "").is_err());
    }
}
