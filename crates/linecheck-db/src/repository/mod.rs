//! # Repository Module
//!
//! Database repository implementations for LineCheck.
//!
//! ## Repository Pattern
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  CLI subcommand / request handler                                      │
//! │       │                                                                 │
//! │       │  db.history().detail_history(&filter, page)                    │
//! │       ▼                                                                 │
//! │  HistoryRepository ──► query::ComposedQuery ──► SQL + binds            │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  SQLite Database                                                       │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Available Repositories
//!
//! - [`SummaryRepository`] - Summary record writes, batch saves, cascade delete
//! - [`DetailRepository`] - Hourly detail record writes
//! - [`HistoryRepository`] - Paginated history queries, distinct defect types
//! - [`SuggestRepository`] - Code/lot autocomplete
//! - [`InspectorRepository`] - Inspector registry
//! - [`CatalogRepository`] - Product catalog lookups

pub mod catalog;
pub mod detail;
pub mod history;
pub mod inspector;
pub mod suggest;
pub mod summary;

pub use catalog::CatalogRepository;
pub use detail::DetailRepository;
pub use history::HistoryRepository;
pub use inspector::InspectorRepository;
pub use suggest::SuggestRepository;
pub use summary::SummaryRepository;
