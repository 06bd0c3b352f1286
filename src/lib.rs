//! # Reinhardt DataTables
//!
//! Server-side data tables for Reinhardt applications.
//!
//! A grid front end asks the server for one page at a time: which rows match
//! the search box and the column filters, in which order, starting where.
//! This crate answers those requests from a declarative table definition and
//! any data source, and dispatches bulk actions on the rows a user selected.
//!
//! ## Feature Flags
//!
//! - `full` (default) - All features enabled
//! - `export` - CSV and JSON export of the filtered rows
//! - `chrono` - Cell values from `chrono` dates and timestamps
//! - `uuid` - Cell values from `uuid::Uuid`
//!
//! ## Quick Example
//!
//! ```rust
//! use reinhardt_datatables::prelude::*;
//! use serde_json::{json, Value as Row};
//! use std::collections::HashMap;
//!
//! # async fn example() -> Result<()> {
//! let table: DataTable<Row> = TableSpec::new("readings")
//!     .fields(["time", "pressure"])
//!     .build()?;
//!
//! let source = VecSource::new(vec![
//!     json!({"time": 12, "pressure": 53}),
//!     json!({"time": 13, "pressure": 63}),
//! ]);
//! let params = HashMap::from([
//!     ("draw".to_string(), "1".to_string()),
//!     ("columns[1][search][value]".to_string(), "63".to_string()),
//! ]);
//!
//! let body = table.respond_json(&source, &params).await?;
//! assert_eq!(
//!     body,
//!     r#"{"draw":1,"recordsTotal":2,"recordsFiltered":1,"data":[["13","63"]]}"#
//! );
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]

pub mod tables;

/// Commonly used types
pub mod prelude {
	pub use crate::tables::{
		ActionHandler, ActionSubmission, Column, DataSource, DataTable, Query, Record, Result,
		ResultPage, TableError, TableSettings, TableSpec, Value, VecSource,
	};
}
