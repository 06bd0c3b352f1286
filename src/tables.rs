//! Data table functionality
//!
//! This module provides access to the table engine through unified imports
//! from the `reinhardt_datatables::tables` namespace.
//!
//! ## Architecture
//!
//! - **column**: Column declarations, field paths and choice filters
//! - **query**: Request parsing into typed queries
//! - **engine** / **source**: Searching, ordering and paging over data sources
//! - **render** / **response**: Cell rendering and wire responses
//! - **actions**: Bulk row actions
//! - **table**: Table definitions tying the above together

pub use reinhardt_tables::*;
