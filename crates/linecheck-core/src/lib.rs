//! # linecheck-core: Pure Domain Logic for LineCheck
//!
//! Records, filters and pagination arithmetic for the quality-defect
//! history, with zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        LineCheck Architecture                           │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │              Front end (CLI / request handler)                  │   │
//! │  │    string params ──► HistoryParams::into_query()                │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │             ★ linecheck-core (THIS CRATE) ★                     │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │   types   │  │  filter   │  │   page    │  │ validation│  │   │
//! │  │   │ Summary   │  │ History   │  │ PageReq   │  │  params   │  │   │
//! │  │   │ Detail    │  │ Filter    │  │ Page<T>   │  │           │  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO NETWORK • PURE FUNCTIONS           │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                 linecheck-db (Database Layer)                   │   │
//! │  │        Query composer, repositories, migrations, loader         │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Example Usage
//!
//! ```rust
//! use linecheck_core::params::HistoryParams;
//!
//! let params = HistoryParams {
//!     line: Some("Linea 1".into()),
//!     defect_type: Some("todos".into()),
//!     page: Some(2),
//!     ..Default::default()
//! };
//! let (filter, page) = params.into_query().unwrap();
//!
//! assert_eq!(filter.defect_type, None);
//! assert_eq!(page.offset(), 20);
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod filter;
pub mod page;
pub mod params;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use error::{ValidationError, ValidationResult};
pub use filter::{DateRange, HistoryFilter, HistorySource, SuggestField};
pub use page::{Page, PageRequest};
pub use params::HistoryParams;
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Default text stored for an empty observation or description.
pub const PLACEHOLDER: &str = "---";

/// Legacy defect-type value meaning "every type".
pub const ALL_DEFECT_TYPES: &str = "todos";

/// Page size used when a request does not give one.
pub const DEFAULT_PAGE_SIZE: u32 = 20;

/// Largest page a single history query may return.
pub const MAX_PAGE_SIZE: u32 = 500;

/// Autocomplete terms shorter than this return nothing.
pub const SUGGEST_MIN_CHARS: usize = 2;

/// Maximum suggestions per autocomplete lookup.
pub const SUGGEST_LIMIT: u32 = 10;

/// Inspector name length bounds, in characters.
pub const INSPECTOR_NAME_MIN: usize = 3;
pub const INSPECTOR_NAME_MAX: usize = 100;
