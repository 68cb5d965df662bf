//! # Pagination
//!
//! Offset/limit windows and the page bookkeeping returned with every
//! history query.
//!
//! ## Arithmetic
//! ```text
//! current_page = offset / limit + 1
//! total_pages  = (total + limit - 1) / limit      (ceil, 0 when total = 0)
//!
//! total = 45, limit = 10
//!   offset  0 → page 1 of 5   rows  1..10
//!   offset 40 → page 5 of 5   rows 41..45
//! ```
//!
//! The limit is validated once, when the [`PageRequest`] is built, so the
//! division above can never see a zero.

use serde::Serialize;

use crate::error::{ValidationError, ValidationResult};
use crate::MAX_PAGE_SIZE;

// =============================================================================
// Page Request
// =============================================================================

/// A validated offset/limit window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PageRequest {
    offset: u64,
    limit: u32,
}

impl PageRequest {
    /// Creates a window starting at `offset` holding at most `limit` rows.
    ///
    /// ## Returns
    /// * `Err(ValidationError::OutOfRange)` - `limit` is 0 or above
    ///   [`MAX_PAGE_SIZE`]
    pub fn new(offset: u64, limit: u32) -> ValidationResult<Self> {
        if limit == 0 || limit > MAX_PAGE_SIZE {
            return Err(ValidationError::OutOfRange {
                field: "page_size".to_string(),
                min: 1,
                max: i64::from(MAX_PAGE_SIZE),
            });
        }
        Ok(PageRequest { offset, limit })
    }

    /// Converts a 1-indexed page number into a window.
    ///
    /// ## Example
    /// ```rust
    /// use linecheck_core::PageRequest;
    ///
    /// let page = PageRequest::from_page_number(3, 20).unwrap();
    /// assert_eq!(page.offset(), 40);
    /// assert_eq!(page.current_page(), 3);
    /// ```
    pub fn from_page_number(page: u64, limit: u32) -> ValidationResult<Self> {
        if page == 0 {
            return Err(ValidationError::MustBePositive {
                field: "page".to_string(),
            });
        }
        let offset = (page - 1)
            .checked_mul(u64::from(limit))
            .ok_or_else(|| ValidationError::OutOfRange {
                field: "page".to_string(),
                min: 1,
                max: i64::MAX,
            })?;
        PageRequest::new(offset, limit)
    }

    /// First page of the given size.
    pub fn first(limit: u32) -> ValidationResult<Self> {
        PageRequest::new(0, limit)
    }

    pub fn offset(&self) -> u64 {
        self.offset
    }

    pub fn limit(&self) -> u32 {
        self.limit
    }

    /// 1-indexed page this window starts on.
    pub fn current_page(&self) -> u64 {
        self.offset / u64::from(self.limit) + 1
    }

    /// Number of pages needed for `total` rows at this page size.
    pub fn total_pages(&self, total: u64) -> u64 {
        total.div_ceil(u64::from(self.limit))
    }

    /// The window immediately after this one.
    pub fn next(&self) -> Self {
        PageRequest {
            offset: self.offset.saturating_add(u64::from(self.limit)),
            limit: self.limit,
        }
    }
}

// =============================================================================
// Page
// =============================================================================

/// One page of history results.
///
/// ## Serialization
/// ```json
/// { "records": [...], "total": 45, "current_page": 1, "total_pages": 5 }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Page<T> {
    pub records: Vec<T>,
    pub total: u64,
    pub current_page: u64,
    pub total_pages: u64,
}

impl<T> Page<T> {
    /// Wraps a fetched window with its bookkeeping.
    pub fn new(records: Vec<T>, total: u64, request: PageRequest) -> Self {
        Page {
            records,
            total,
            current_page: request.current_page(),
            total_pages: request.total_pages(total),
        }
    }

    /// Whether another page follows this one.
    pub fn has_next(&self) -> bool {
        self.current_page < self.total_pages
    }

    /// Converts every record, keeping the bookkeeping.
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            records: self.records.into_iter().map(f).collect(),
            total: self.total,
            current_page: self.current_page,
            total_pages: self.total_pages,
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
