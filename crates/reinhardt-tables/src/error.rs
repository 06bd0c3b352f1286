//! Error types for data tables

use thiserror::Error;

/// Data table error type
///
/// Parsing problems in an incoming query never surface here: the query parser
/// substitutes defaults instead. These variants cover table definition
/// mistakes and failures of the data layer, both of which abort the request.
#[derive(Debug, Error)]
pub enum TableError {
	/// A column with the same field path is already registered
	#[error("Column '{0}' is already registered with this table")]
	DuplicateField(String),

	/// A field path contains an empty segment (e.g. `owner..name`)
	#[error("Invalid field path '{0}': path segments must not be empty")]
	InvalidFieldPath(String),

	/// A hook, filter or option references a field the table does not declare
	#[error("No column with field '{0}' is registered with this table")]
	UnknownField(String),

	/// A column already carries a choice filter
	#[error("Column '{0}' already has a filter attached")]
	FilterAlreadyAttached(String),

	/// The data source failed while counting or fetching records
	#[error("Data source error: {0}")]
	DataSource(String),

	/// A per-column filter hook failed
	#[error("Filter hook for column '{field}' failed: {message}")]
	Hook {
		/// Field of the column whose hook failed
		field: String,
		/// Failure description
		message: String,
	},

	/// Settings could not be loaded or failed validation
	#[error("Settings error: {0}")]
	Settings(String),

	/// The response body could not be serialized
	#[error("Serialization error: {0}")]
	Serialization(#[from] serde_json::Error),

	/// Export of the filtered rows failed
	#[error("Export error: {0}")]
	Export(String),
}

impl TableError {
	/// Build a [`TableError::Hook`] for the given column field
	///
	/// # Examples
	///
	/// ```
	/// use reinhardt_tables::TableError;
	///
	/// let err = TableError::hook("status", "unknown status code");
	/// assert_eq!(
	///     err.to_string(),
	///     "Filter hook for column 'status' failed: unknown status code"
	/// );
	/// ```
	pub fn hook(field: impl Into<String>, message: impl Into<String>) -> Self {
		Self::Hook {
			field: field.into(),
			message: message.into(),
		}
	}
}

/// Result type for data table operations
pub type Result<T> = std::result::Result<T, TableError>;

/// Alias of [`Result`] for use alongside other crates' `Result` types
pub type TableResult<T> = Result<T>;
