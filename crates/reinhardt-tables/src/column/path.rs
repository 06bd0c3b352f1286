//! Field paths
//!
//! A column's field may name a plain field (`title`) or traverse related
//! records (`owner.name`). The Django-style `__` separator is accepted as an
//! alias, so `owner__name` and `owner.name` are the same path.

use crate::error::{Result, TableError};
use crate::record::{Record, Value};
use std::hash::{Hash, Hasher};

/// Separator between the segments of a field path
pub const PATH_SEPARATOR: char = '.';

const ALIAS_SEPARATOR: &str = "__";

/// Validated field path of a column
///
/// Two paths are equal when their segments are equal, regardless of the
/// separator they were written with.
#[derive(Debug, Clone)]
pub struct FieldPath {
	raw: String,
	segments: Vec<String>,
}

impl FieldPath {
	/// Parse and validate a field path
	///
	/// # Errors
	///
	/// Returns [`TableError::InvalidFieldPath`] if the path is empty or has an
	/// empty segment.
	///
	/// # Examples
	///
	/// ```
	/// use reinhardt_tables::column::FieldPath;
	///
	/// let path = FieldPath::parse("owner__name").unwrap();
	/// assert_eq!(path.segments(), &["owner", "name"]);
	/// assert_eq!(path, FieldPath::parse("owner.name").unwrap());
	///
	/// assert!(FieldPath::parse("owner..name").is_err());
	/// ```
	pub fn parse(field: &str) -> Result<Self> {
		let normalized = field.replace(ALIAS_SEPARATOR, ".");
		let segments: Vec<String> = normalized
			.split(PATH_SEPARATOR)
			.map(str::to_string)
			.collect();
		if field.is_empty() || segments.iter().any(String::is_empty) {
			return Err(TableError::InvalidFieldPath(field.to_string()));
		}
		Ok(Self {
			raw: field.to_string(),
			segments,
		})
	}

	/// The path as it was declared
	pub fn as_str(&self) -> &str {
		&self.raw
	}

	/// The normalized path segments
	pub fn segments(&self) -> &[String] {
		&self.segments
	}

	/// Returns `true` if the path traverses at least one relation
	pub fn is_nested(&self) -> bool {
		self.segments.len() > 1
	}

	/// The path joined with [`PATH_SEPARATOR`]
	pub fn dotted(&self) -> String {
		self.segments.join(".")
	}

	/// Resolve the path against a record
	///
	/// A field whose literal name equals the declared path wins over
	/// traversal. Otherwise each leading segment is followed as a relation and
	/// the last one is read as a value. Any missing segment yields `None`.
	///
	/// # Examples
	///
	/// ```
	/// use reinhardt_tables::column::FieldPath;
	/// use reinhardt_tables::Value;
	/// use serde_json::json;
	///
	/// let row = json!({"owner": {"name": "Bob"}, "a.b": 1});
	/// let owner_name = FieldPath::parse("owner.name").unwrap();
	/// assert_eq!(owner_name.resolve(&row), Some(Value::Text("Bob".into())));
	///
	/// let literal = FieldPath::parse("a.b").unwrap();
	/// assert_eq!(literal.resolve(&row), Some(Value::Int(1)));
	/// ```
	pub fn resolve(&self, record: &dyn Record) -> Option<Value> {
		if let Some(value) = record.value(&self.raw) {
			return Some(value);
		}
		let (last, relations) = self.segments.split_last()?;
		if relations.is_empty() {
			return None;
		}
		let mut current = record;
		for segment in relations {
			current = current.related(segment)?;
		}
		current.value(last)
	}
}

impl PartialEq for FieldPath {
	fn eq(&self, other: &Self) -> bool {
		self.segments == other.segments
	}
}

impl Eq for FieldPath {}

impl Hash for FieldPath {
	fn hash<H: Hasher>(&self, state: &mut H) {
		self.segments.hash(state);
	}
}

impl std::fmt::Display for FieldPath {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.write_str(&self.raw)
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;
	use serde_json::json;

	#[rstest]
	#[case("")]
	#[case(".")]
	#[case("owner.")]
	#[case(".name")]
	#[case("owner..name")]
	#[case("owner____name")]
	fn test_invalid_paths(#[case] field: &str) {
		assert!(matches!(
			FieldPath::parse(field),
			Err(TableError::InvalidFieldPath(_))
		));
	}

	#[rstest]
	fn test_plain_path() {
		let path = FieldPath::parse("title").unwrap();
		assert!(!path.is_nested());
		assert_eq!(path.as_str(), "title");
		assert_eq!(path.dotted(), "title");
	}

	#[rstest]
	fn test_alias_separator_preserves_declared_spelling() {
		let path = FieldPath::parse("owner__name").unwrap();
		assert!(path.is_nested());
		assert_eq!(path.as_str(), "owner__name");
		assert_eq!(path.dotted(), "owner.name");
	}

	#[rstest]
	fn test_resolve_missing_relation_is_none() {
		let row = json!({"owner": null});
		let path = FieldPath::parse("owner.name").unwrap();
		assert_eq!(path.resolve(&row), None);
	}

	#[rstest]
	fn test_resolve_deep_relation() {
		let row = json!({"project": {"owner": {"email": "a@example.com"}}});
		let path = FieldPath::parse("project.owner.email").unwrap();
		assert_eq!(
			path.resolve(&row),
			Some(Value::Text("a@example.com".into()))
		);
	}

	#[rstest]
	fn test_resolve_plain_missing_field() {
		let row = json!({"title": "x"});
		let path = FieldPath::parse("body").unwrap();
		assert_eq!(path.resolve(&row), None);
	}
}
