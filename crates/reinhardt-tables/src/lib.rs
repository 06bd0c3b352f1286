//! Server-side data tables for Reinhardt
//!
//! This crate answers the requests of a server-driven grid front end: it
//! turns declarative column definitions and an incoming query (search terms,
//! ordering, page window) into an ordered, paginated, rendered page in the
//! DataTables wire protocol, and dispatches bulk actions on selected rows.
//!
//! # Features
//!
//! - **Table Definition**: Declarative [`TableSpec`] builder with per-field overrides
//! - **Related Fields**: Column paths traverse relations (`owner.name`, `owner__name`)
//! - **Searching**: Global and per-column substring search, replaceable per column
//! - **Ordering**: Stable multi-column ordering in request priority
//! - **Paging**: Offset/length windows, including "all rows"
//! - **Bulk Actions**: Validated action dispatch on selected rows
//! - **Legacy Protocol**: Hungarian-notation requests and responses
//! - **Export**: CSV and JSON export (requires `export` feature)
//!
//! # Architecture
//!
//! ```mermaid
//! graph TD
//!     A[DataTable] --> B[ColumnRegistry]
//!     B --> C[Column]
//!     C --> D[FieldPath]
//!     C --> E[Render / Filter hooks]
//!     A --> F[QueryParser]
//!     F --> G[Query]
//!     A --> H[FilterSortEngine]
//!     H --> I[DataSource]
//!     A --> J[CellRenderer]
//!     A --> K[ResultPage]
//!     A --> L[ActionDispatcher]
//!     L --> M[ActionHandler]
//! ```
//!
//! # Example
//!
//! ```rust
//! use reinhardt_tables::source::VecSource;
//! use reinhardt_tables::{DataTable, TableSpec};
//! use serde_json::{json, Value as Row};
//!
//! # async fn example() {
//! let table: DataTable<Row> = TableSpec::new("readings")
//!     .fields(["time", "pressure"])
//!     .build()
//!     .unwrap();
//!
//! let source = VecSource::new(vec![
//!     json!({"time": 12, "pressure": 73}),
//!     json!({"time": 13, "pressure": 63}),
//!     json!({"time": 14, "pressure": 73}),
//! ]);
//!
//! let query = table.parse_query_string(
//!     "draw=1&start=0&length=2&order%5B0%5D%5Bcolumn%5D=1&order%5B0%5D%5Bdir%5D=desc\
//!      &order%5B1%5D%5Bcolumn%5D=0&order%5B1%5D%5Bdir%5D=desc",
//! );
//! let page = table.query(&source, &query).await.unwrap();
//!
//! assert_eq!(page.records_total, 3);
//! assert_eq!(page.data, vec![vec!["14", "73"], vec!["12", "73"]]);
//! # }
//! ```

#![warn(missing_docs)]
#![warn(rustdoc::broken_intra_doc_links)]

pub mod actions;
pub mod column;
pub mod engine;
pub mod error;
#[cfg(feature = "export")]
pub mod export;
pub mod query;
pub mod record;
pub mod render;
pub mod response;
pub mod settings;
pub mod source;
pub mod strings;
pub mod table;

// Re-exports for convenience
pub use actions::{
	ActionDispatcher, ActionHandler, ActionResponse, ActionSubmission, DispatchError,
	DispatchState, FormAction,
};
pub use column::{Align, ChoiceFilter, Column, ColumnRegistry, FieldPath};
pub use engine::{FilterSortEngine, FilteredPage};
pub use error::{Result, TableError, TableResult};
pub use query::{Notation, OrderDirection, PageLength, Query, QueryParser};
pub use record::{Record, Value};
pub use render::CellRenderer;
pub use response::{LegacyResultPage, ResultPage};
pub use settings::{SearchMode, TableSettings};
pub use source::{DataSource, Selection, VecSource, Window};
pub use strings::{TableStrings, install_default_strings};
pub use table::{DataTable, TableSpec};
