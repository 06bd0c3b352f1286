//! Records and cell values
//!
//! A [`Record`] is one row of a data source. The engine never looks at a
//! record's concrete type; it asks for named scalar values and for related
//! records when a column's field path traverses a relation (`owner.name`).

use crate::settings::SearchMode;
use std::cmp::Ordering;
use std::collections::HashMap;
use std::fmt;

/// Scalar value of a record field
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
	/// Missing or SQL `NULL` value
	Null,
	/// Boolean value
	Bool(bool),
	/// Integer value
	Int(i64),
	/// Floating point value
	Float(f64),
	/// Text value
	Text(String),
}

impl Value {
	/// Returns `true` for [`Value::Null`]
	pub fn is_null(&self) -> bool {
		matches!(self, Value::Null)
	}

	fn rank(&self) -> u8 {
		match self {
			Value::Null => 0,
			Value::Bool(_) => 1,
			Value::Int(_) | Value::Float(_) => 2,
			Value::Text(_) => 3,
		}
	}

	/// Total order used for sorting
	///
	/// `Null` sorts first, then booleans, then numbers, then text. Integers and
	/// floats compare numerically with each other.
	///
	/// # Examples
	///
	/// ```
	/// use reinhardt_tables::Value;
	/// use std::cmp::Ordering;
	///
	/// assert_eq!(Value::Int(2).sort_cmp(&Value::Float(10.5)), Ordering::Less);
	/// assert_eq!(Value::Null.sort_cmp(&Value::Text("a".into())), Ordering::Less);
	/// ```
	pub fn sort_cmp(&self, other: &Value) -> Ordering {
		match (self, other) {
			(Value::Null, Value::Null) => Ordering::Equal,
			(Value::Bool(a), Value::Bool(b)) => a.cmp(b),
			(Value::Int(a), Value::Int(b)) => a.cmp(b),
			(Value::Int(a), Value::Float(b)) => (*a as f64).total_cmp(b),
			(Value::Float(a), Value::Int(b)) => a.total_cmp(&(*b as f64)),
			(Value::Float(a), Value::Float(b)) => a.total_cmp(b),
			(Value::Text(a), Value::Text(b)) => a.cmp(b),
			_ => self.rank().cmp(&other.rank()),
		}
	}

	/// Substring containment test used by default column searches
	///
	/// `Null` never matches.
	pub fn contains(&self, needle: &str, mode: SearchMode) -> bool {
		if self.is_null() {
			return false;
		}
		let haystack = self.to_string();
		match mode {
			SearchMode::CaseSensitive => haystack.contains(needle),
			SearchMode::CaseInsensitive => haystack.to_lowercase().contains(&needle.to_lowercase()),
		}
	}
}

impl fmt::Display for Value {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Value::Null => Ok(()),
			Value::Bool(b) => write!(f, "{}", b),
			Value::Int(i) => write!(f, "{}", i),
			Value::Float(x) => write!(f, "{}", x),
			Value::Text(s) => f.write_str(s),
		}
	}
}

macro_rules! impl_from_int {
	($($ty:ty),*) => {
		$(
			impl From<$ty> for Value {
				fn from(value: $ty) -> Self {
					Value::Int(i64::from(value))
				}
			}
		)*
	};
}

impl_from_int!(i8, i16, i32, i64, u8, u16, u32);

impl From<u64> for Value {
	fn from(value: u64) -> Self {
		i64::try_from(value)
			.map(Value::Int)
			.unwrap_or(Value::Float(value as f64))
	}
}

impl From<usize> for Value {
	fn from(value: usize) -> Self {
		Value::from(value as u64)
	}
}

impl From<f32> for Value {
	fn from(value: f32) -> Self {
		Value::Float(f64::from(value))
	}
}

impl From<f64> for Value {
	fn from(value: f64) -> Self {
		Value::Float(value)
	}
}

impl From<bool> for Value {
	fn from(value: bool) -> Self {
		Value::Bool(value)
	}
}

impl From<&str> for Value {
	fn from(value: &str) -> Self {
		Value::Text(value.to_string())
	}
}

impl From<String> for Value {
	fn from(value: String) -> Self {
		Value::Text(value)
	}
}

impl<T: Into<Value>> From<Option<T>> for Value {
	fn from(value: Option<T>) -> Self {
		value.map_or(Value::Null, Into::into)
	}
}

#[cfg(feature = "chrono")]
impl From<chrono::NaiveDate> for Value {
	fn from(value: chrono::NaiveDate) -> Self {
		Value::Text(value.format("%Y-%m-%d").to_string())
	}
}

#[cfg(feature = "chrono")]
impl From<chrono::NaiveDateTime> for Value {
	fn from(value: chrono::NaiveDateTime) -> Self {
		Value::Text(value.format("%Y-%m-%dT%H:%M:%S").to_string())
	}
}

#[cfg(feature = "chrono")]
impl<Tz: chrono::TimeZone> From<chrono::DateTime<Tz>> for Value
where
	Tz::Offset: fmt::Display,
{
	fn from(value: chrono::DateTime<Tz>) -> Self {
		Value::Text(value.to_rfc3339())
	}
}

#[cfg(feature = "uuid")]
impl From<uuid::Uuid> for Value {
	fn from(value: uuid::Uuid) -> Self {
		Value::Text(value.hyphenated().to_string())
	}
}

/// A row served by a data source
///
/// # Examples
///
/// ```
/// use reinhardt_tables::{Record, Value};
///
/// struct Owner {
///     name: String,
/// }
///
/// struct Task {
///     title: String,
///     owner: Option<Owner>,
/// }
///
/// impl Record for Owner {
///     fn value(&self, field: &str) -> Option<Value> {
///         match field {
///             "name" => Some(self.name.as_str().into()),
///             _ => None,
///         }
///     }
/// }
///
/// impl Record for Task {
///     fn value(&self, field: &str) -> Option<Value> {
///         match field {
///             "title" => Some(self.title.as_str().into()),
///             _ => None,
///         }
///     }
///
///     fn related(&self, field: &str) -> Option<&dyn Record> {
///         match field {
///             "owner" => self.owner.as_ref().map(|o| o as &dyn Record),
///             _ => None,
///         }
///     }
/// }
/// ```
pub trait Record: Send + Sync {
	/// Returns the scalar value of `field`, or `None` if the record has no such field
	fn value(&self, field: &str) -> Option<Value>;

	/// Returns the related record reached through `field`
	///
	/// Default: no relations.
	fn related(&self, field: &str) -> Option<&dyn Record> {
		let _ = field;
		None
	}
}

/// JSON objects are records; nested objects are relations.
impl Record for serde_json::Value {
	fn value(&self, field: &str) -> Option<Value> {
		let value = self.as_object()?.get(field)?;
		Some(match value {
			serde_json::Value::Null => Value::Null,
			serde_json::Value::Bool(b) => Value::Bool(*b),
			serde_json::Value::Number(n) => n
				.as_i64()
				.map(Value::Int)
				.or_else(|| n.as_f64().map(Value::Float))
				.unwrap_or_else(|| Value::Text(n.to_string())),
			serde_json::Value::String(s) => Value::Text(s.clone()),
			other => Value::Text(other.to_string()),
		})
	}

	fn related(&self, field: &str) -> Option<&dyn Record> {
		self.as_object()?
			.get(field)
			.filter(|value| value.is_object())
			.map(|value| value as &dyn Record)
	}
}

impl Record for HashMap<String, Value> {
	fn value(&self, field: &str) -> Option<Value> {
		self.get(field).cloned()
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;
	use serde_json::json;

	#[rstest]
	#[case(Value::Int(1), Value::Int(2), Ordering::Less)]
	#[case(Value::Float(2.5), Value::Int(2), Ordering::Greater)]
	#[case(Value::Text("b".into()), Value::Text("a".into()), Ordering::Greater)]
	#[case(Value::Null, Value::Bool(false), Ordering::Less)]
	#[case(Value::Bool(true), Value::Int(0), Ordering::Less)]
	#[case(Value::Int(7), Value::Text("1".into()), Ordering::Less)]
	fn test_sort_cmp(#[case] left: Value, #[case] right: Value, #[case] expected: Ordering) {
		assert_eq!(left.sort_cmp(&right), expected);
		assert_eq!(right.sort_cmp(&left), expected.reverse());
	}

	#[rstest]
	fn test_display_canonical_form() {
		assert_eq!(Value::Int(12).to_string(), "12");
		assert_eq!(Value::Float(1.5).to_string(), "1.5");
		assert_eq!(Value::Bool(true).to_string(), "true");
		assert_eq!(Value::Null.to_string(), "");
		assert_eq!(Value::Text("x".into()).to_string(), "x");
	}

	#[rstest]
	fn test_contains_modes() {
		let value = Value::Text("Alice".into());
		assert!(value.contains("ali", SearchMode::CaseInsensitive));
		assert!(!value.contains("ali", SearchMode::CaseSensitive));
		assert!(value.contains("Ali", SearchMode::CaseSensitive));
		assert!(Value::Int(63).contains("6", SearchMode::CaseSensitive));
		assert!(!Value::Null.contains("", SearchMode::CaseInsensitive));
	}

	#[rstest]
	fn test_json_record() {
		let row = json!({"name": "Alice", "age": 30, "score": 1.5, "owner": {"name": "Bob"}});
		assert_eq!(row.value("name"), Some(Value::Text("Alice".into())));
		assert_eq!(row.value("age"), Some(Value::Int(30)));
		assert_eq!(row.value("score"), Some(Value::Float(1.5)));
		assert_eq!(row.value("missing"), None);
		let owner = row.related("owner").unwrap();
		assert_eq!(owner.value("name"), Some(Value::Text("Bob".into())));
		assert!(row.related("name").is_none());
	}

	#[rstest]
	fn test_option_conversion() {
		assert_eq!(Value::from(None::<i32>), Value::Null);
		assert_eq!(Value::from(Some("x")), Value::Text("x".into()));
		assert_eq!(Value::from(u64::MAX), Value::Float(u64::MAX as f64));
	}
}
