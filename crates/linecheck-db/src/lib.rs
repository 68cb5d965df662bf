//! # linecheck-db: Database Layer for LineCheck
//!
//! SQLite persistence and the filtered, paginated history queries.
//!
//! ## Architecture
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                          linecheck-db                                   │
//! │                                                                         │
//! │  HistoryFilter + PageRequest (linecheck-core)                          │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │   ┌───────────────┐    ┌───────────────┐    ┌──────────────┐  │   │
//! │  │   │    Pool       │    │  Repositories │    │  Migrations  │  │   │
//! │  │   │   (pool.rs)   │    │ summary       │    │  (embedded)  │  │   │
//! │  │   │               │◄───│ detail        │    │              │  │   │
//! │  │   │ SqlitePool    │    │ history ──────┼──► query.rs     │  │   │
//! │  │   │ WAL, FKs on   │    │ suggest       │    │ 001_init.sql │  │   │
//! │  │   │               │    │ inspector     │    │              │  │   │
//! │  │   │               │    │ catalog       │    │              │  │   │
//! │  │   └───────────────┘    └───────────────┘    └──────────────┘  │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                     SQLite Database                             │   │
//! │  │   defect_summaries 1 ── N defect_details, products, inspectors  │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`pool`] - Connection pool creation and configuration
//! - [`migrations`] - Embedded database migrations
//! - [`query`] - SQL composition for the history read paths
//! - [`repository`] - Repository implementations
//! - [`catalog_loader`] - Bulk product catalog import
//! - [`error`] - Database error types
//!
//! ## Usage
//!
//! ```rust,ignore
//! use linecheck_core::{HistoryFilter, PageRequest};
//! use linecheck_db::{Database, DbConfig};
//!
//! let db = Database::new(DbConfig::new("linecheck.db")).await?;
//!
//! let filter = HistoryFilter::new().line("Linea 1").defect_type("LLENADO");
//! let page = db.history().detail_history(&filter, PageRequest::first(20)?).await?;
//! println!("{} of {} rows", page.records.len(), page.total);
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod catalog_loader;
pub mod error;
pub mod migrations;
pub mod pool;
pub mod query;
pub mod repository;

// =============================================================================
// Re-exports
// =============================================================================

pub use catalog_loader::{load_catalog, load_catalog_file, CatalogLoadError, LoadReport};
pub use error::{DbError, DbResult};
pub use pool::{Database, DbConfig};

// Repository re-exports for convenience
pub use repository::{
    CatalogRepository, DetailRepository, HistoryRepository, InspectorRepository,
    SuggestRepository, SummaryRepository,
};
