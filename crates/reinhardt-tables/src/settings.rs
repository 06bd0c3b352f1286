//! Table settings
//!
//! Settings are plain configuration passed to a table at construction. They
//! can be built in code, read from a TOML document or taken from
//! `REINHARDT_TABLES_*` environment variables.

use crate::error::{Result, TableError};
use serde::{Deserialize, Serialize};

/// How default column searches compare text
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SearchMode {
	/// Case-insensitive substring match
	#[default]
	CaseInsensitive,
	/// Exact-case substring match
	CaseSensitive,
}

impl SearchMode {
	fn parse(raw: &str) -> Option<Self> {
		match raw.trim().to_ascii_lowercase().as_str() {
			"case_insensitive" | "insensitive" | "icontains" => Some(Self::CaseInsensitive),
			"case_sensitive" | "sensitive" | "contains" => Some(Self::CaseSensitive),
			_ => None,
		}
	}
}

/// Settings for one data table
///
/// # Examples
///
/// ```
/// use reinhardt_tables::{SearchMode, TableSettings};
///
/// let settings = TableSettings::from_toml_str(
///     r#"
///     default_page_length = 25
///     max_page_length = 100
///     search_mode = "case_sensitive"
///     "#,
/// )
/// .unwrap();
///
/// assert_eq!(settings.default_page_length, 25);
/// assert_eq!(settings.max_page_length, Some(100));
/// assert_eq!(settings.search_mode, SearchMode::CaseSensitive);
/// assert!(settings.escape_values);
/// ```
#[non_exhaustive]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TableSettings {
	/// Page length used when the request carries none or a malformed one
	pub default_page_length: usize,

	/// Upper bound for requested page lengths; unbounded when `None`
	///
	/// A request for all rows (`length=-1`) is not capped.
	pub max_page_length: Option<usize>,

	/// Cell text for `Null` values
	pub none_string: String,

	/// HTML-escape default-rendered cells
	pub escape_values: bool,

	/// Comparison used by default column searches
	pub search_mode: SearchMode,

	/// Form field carrying the bulk action token
	pub action_field: String,

	/// Form field carrying selected row ids, repeated once per row
	pub selection_field: String,
}

impl Default for TableSettings {
	fn default() -> Self {
		Self {
			default_page_length: 10,
			max_page_length: None,
			none_string: String::new(),
			escape_values: true,
			search_mode: SearchMode::CaseInsensitive,
			action_field: "action".to_string(),
			selection_field: "checkbox".to_string(),
		}
	}
}

impl TableSettings {
	/// Create new settings with defaults
	pub fn new() -> Self {
		Self::default()
	}

	/// Sets the default page length
	pub fn with_default_page_length(mut self, length: usize) -> Self {
		self.default_page_length = length;
		self
	}

	/// Caps requested page lengths at `length`
	pub fn with_max_page_length(mut self, length: usize) -> Self {
		self.max_page_length = Some(length);
		self
	}

	/// Sets the cell text for `Null` values
	pub fn with_none_string(mut self, none_string: impl Into<String>) -> Self {
		self.none_string = none_string.into();
		self
	}

	/// Enables or disables HTML escaping of default cells
	pub fn with_escape_values(mut self, escape: bool) -> Self {
		self.escape_values = escape;
		self
	}

	/// Sets the default search comparison
	pub fn with_search_mode(mut self, mode: SearchMode) -> Self {
		self.search_mode = mode;
		self
	}

	/// Validate settings
	///
	/// # Errors
	///
	/// Returns [`TableError::Settings`] for a zero page length, a default
	/// above the cap or empty form field names.
	pub fn validate(&self) -> Result<()> {
		if self.default_page_length == 0 {
			return Err(TableError::Settings(
				"default_page_length must be at least 1".to_string(),
			));
		}

		if let Some(max) = self.max_page_length {
			if max == 0 {
				return Err(TableError::Settings(
					"max_page_length must be at least 1".to_string(),
				));
			}
			if self.default_page_length > max {
				return Err(TableError::Settings(format!(
					"default_page_length ({}) exceeds max_page_length ({})",
					self.default_page_length, max
				)));
			}
		}

		if self.action_field.is_empty() || self.selection_field.is_empty() {
			return Err(TableError::Settings(
				"action_field and selection_field must not be empty".to_string(),
			));
		}

		Ok(())
	}

	/// Load settings from a TOML document
	///
	/// Missing keys take their defaults. The result is validated.
	pub fn from_toml_str(contents: &str) -> Result<Self> {
		let settings: TableSettings = toml::from_str(contents)
			.map_err(|e| TableError::Settings(format!("TOML parse error: {}", e)))?;
		settings.validate()?;
		Ok(settings)
	}

	/// Load settings from environment variables
	///
	/// Reads `REINHARDT_TABLES_PAGE_LENGTH`, `REINHARDT_TABLES_MAX_PAGE_LENGTH`,
	/// `REINHARDT_TABLES_NONE_STRING`, `REINHARDT_TABLES_ESCAPE_VALUES` and
	/// `REINHARDT_TABLES_SEARCH_MODE`.
	pub fn from_env() -> Result<Self> {
		Self::from_lookup(|key| std::env::var(key).ok())
	}

	/// Load settings from an arbitrary key lookup
	///
	/// Uses the same keys as [`TableSettings::from_env`].
	///
	/// # Examples
	///
	/// ```
	/// use reinhardt_tables::TableSettings;
	/// use std::collections::HashMap;
	///
	/// let vars = HashMap::from([
	///     ("REINHARDT_TABLES_PAGE_LENGTH", "50"),
	///     ("REINHARDT_TABLES_ESCAPE_VALUES", "0"),
	/// ]);
	/// let settings =
	///     TableSettings::from_lookup(|key| vars.get(key).map(|v| v.to_string())).unwrap();
	///
	/// assert_eq!(settings.default_page_length, 50);
	/// assert!(!settings.escape_values);
	/// ```
	pub fn from_lookup<F>(lookup: F) -> Result<Self>
	where
		F: Fn(&str) -> Option<String>,
	{
		let mut settings = Self::default();

		if let Some(length) = lookup("REINHARDT_TABLES_PAGE_LENGTH") {
			settings.default_page_length = parse_usize("REINHARDT_TABLES_PAGE_LENGTH", &length)?;
		}

		if let Some(max) = lookup("REINHARDT_TABLES_MAX_PAGE_LENGTH") {
			settings.max_page_length = Some(parse_usize("REINHARDT_TABLES_MAX_PAGE_LENGTH", &max)?);
		}

		if let Some(none_string) = lookup("REINHARDT_TABLES_NONE_STRING") {
			settings.none_string = none_string;
		}

		if let Some(escape) = lookup("REINHARDT_TABLES_ESCAPE_VALUES") {
			settings.escape_values = parse_bool("REINHARDT_TABLES_ESCAPE_VALUES", &escape)?;
		}

		if let Some(mode) = lookup("REINHARDT_TABLES_SEARCH_MODE") {
			settings.search_mode = SearchMode::parse(&mode).ok_or_else(|| {
				TableError::Settings(format!("Unknown search mode '{}'", mode))
			})?;
		}

		settings.validate()?;
		Ok(settings)
	}
}

fn parse_usize(key: &str, raw: &str) -> Result<usize> {
	raw.trim()
		.parse()
		.map_err(|_| TableError::Settings(format!("{} must be a positive integer, got '{}'", key, raw)))
}

fn parse_bool(key: &str, raw: &str) -> Result<bool> {
	match raw.trim().to_lowercase().as_str() {
		"true" | "1" => Ok(true),
		"false" | "0" => Ok(false),
		_ => Err(TableError::Settings(format!("{} must be true or false, got '{}'", key, raw))),
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;
	use std::collections::HashMap;

	#[rstest]
	fn test_defaults() {
		let settings = TableSettings::default();
		assert_eq!(settings.default_page_length, 10);
		assert_eq!(settings.max_page_length, None);
		assert_eq!(settings.none_string, "");
		assert!(settings.escape_values);
		assert_eq!(settings.search_mode, SearchMode::CaseInsensitive);
		assert_eq!(settings.action_field, "action");
		assert_eq!(settings.selection_field, "checkbox");
		assert!(settings.validate().is_ok());
	}

	#[rstest]
	#[case(TableSettings::new().with_default_page_length(0))]
	#[case(TableSettings::new().with_max_page_length(5))]
	#[case(TableSettings::new().with_default_page_length(1).with_max_page_length(0))]
	fn test_invalid_settings(#[case] settings: TableSettings) {
		assert!(matches!(settings.validate(), Err(TableError::Settings(_))));
	}

	#[rstest]
	fn test_toml_partial_document() {
		let settings = TableSettings::from_toml_str("none_string = \"-\"").unwrap();
		assert_eq!(settings.none_string, "-");
		assert_eq!(settings.default_page_length, 10);
	}

	#[rstest]
	fn test_toml_parse_error() {
		let result = TableSettings::from_toml_str("default_page_length = \"ten\"");
		assert!(matches!(result, Err(TableError::Settings(msg)) if msg.starts_with("TOML parse error")));
	}

	#[rstest]
	fn test_lookup_overrides() {
		let vars: HashMap<&str, &str> = HashMap::from([
			("REINHARDT_TABLES_MAX_PAGE_LENGTH", "200"),
			("REINHARDT_TABLES_NONE_STRING", "n/a"),
			("REINHARDT_TABLES_SEARCH_MODE", "case_sensitive"),
		]);
		let settings = TableSettings::from_lookup(|key| vars.get(key).map(|v| v.to_string())).unwrap();
		assert_eq!(settings.max_page_length, Some(200));
		assert_eq!(settings.none_string, "n/a");
		assert_eq!(settings.search_mode, SearchMode::CaseSensitive);
	}

	#[rstest]
	#[case("REINHARDT_TABLES_PAGE_LENGTH", "many")]
	#[case("REINHARDT_TABLES_SEARCH_MODE", "fuzzy")]
	#[case("REINHARDT_TABLES_ESCAPE_VALUES", "yes")]
	#[case("REINHARDT_TABLES_ESCAPE_VALUES", "")]
	fn test_lookup_rejects_bad_values(#[case] key: &str, #[case] value: &str) {
		let result = TableSettings::from_lookup(|k| (k == key).then(|| value.to_string()));
		assert!(matches!(result, Err(TableError::Settings(_))));
	}

	#[rstest]
	#[case("TRUE", true)]
	#[case(" 1", true)]
	#[case("False", false)]
	#[case("0", false)]
	fn test_lookup_escape_values(#[case] raw: &str, #[case] expected: bool) {
		let settings = TableSettings::from_lookup(|k| {
			(k == "REINHARDT_TABLES_ESCAPE_VALUES").then(|| raw.to_string())
		})
		.unwrap();
		assert_eq!(settings.escape_values, expected);
	}
}
