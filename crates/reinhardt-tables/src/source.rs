//! Data sources
//!
//! The engine never fetches rows itself. It describes what it wants as a
//! [`Selection`] (predicates plus ordering) and a [`Window`], and asks a
//! [`DataSource`] to count and fetch. Backends translate the selection into
//! their own query language; [`VecSource`] evaluates it in memory.

use crate::column::FieldPath;
use crate::error::Result;
use crate::query::OrderDirection;
use crate::record::{Record, Value};
use crate::settings::SearchMode;
use async_trait::async_trait;
use std::cmp::Ordering;
use std::fmt;
use std::sync::Arc;

/// Condition a record must satisfy to stay in a selection
pub enum Predicate<R> {
	/// The field's canonical text contains `term`
	Contains {
		/// Field to test
		path: FieldPath,
		/// Substring to look for
		term: String,
		/// Comparison mode
		mode: SearchMode,
	},
	/// The field equals `value`
	Equals {
		/// Field to test
		path: FieldPath,
		/// Expected value
		value: Value,
	},
	/// At least one inner predicate holds; an empty list never holds
	Any(Vec<Predicate<R>>),
	/// Every inner predicate holds; an empty list always holds
	All(Vec<Predicate<R>>),
	/// Arbitrary test, typically produced by a column filter hook
	Custom(Arc<dyn Fn(&R) -> bool + Send + Sync>),
}

impl<R: Record> Predicate<R> {
	/// Evaluates the predicate against `record`
	pub fn matches(&self, record: &R) -> bool {
		match self {
			Predicate::Contains { path, term, mode } => path
				.resolve(record)
				.is_some_and(|value| value.contains(term, *mode)),
			Predicate::Equals { path, value } => path.resolve(record).as_ref() == Some(value),
			Predicate::Any(inner) => inner.iter().any(|p| p.matches(record)),
			Predicate::All(inner) => inner.iter().all(|p| p.matches(record)),
			Predicate::Custom(test) => test(record),
		}
	}
}

impl<R> Predicate<R> {
	/// Builds a custom predicate from a closure
	pub fn custom<F>(test: F) -> Self
	where
		F: Fn(&R) -> bool + Send + Sync + 'static,
	{
		Predicate::Custom(Arc::new(test))
	}
}

impl<R> Clone for Predicate<R> {
	fn clone(&self) -> Self {
		match self {
			Predicate::Contains { path, term, mode } => Predicate::Contains {
				path: path.clone(),
				term: term.clone(),
				mode: *mode,
			},
			Predicate::Equals { path, value } => Predicate::Equals {
				path: path.clone(),
				value: value.clone(),
			},
			Predicate::Any(inner) => Predicate::Any(inner.clone()),
			Predicate::All(inner) => Predicate::All(inner.clone()),
			Predicate::Custom(test) => Predicate::Custom(Arc::clone(test)),
		}
	}
}

impl<R> fmt::Debug for Predicate<R> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Predicate::Contains { path, term, mode } => f
				.debug_struct("Contains")
				.field("path", &path.as_str())
				.field("term", term)
				.field("mode", mode)
				.finish(),
			Predicate::Equals { path, value } => f
				.debug_struct("Equals")
				.field("path", &path.as_str())
				.field("value", value)
				.finish(),
			Predicate::Any(inner) => f.debug_tuple("Any").field(inner).finish(),
			Predicate::All(inner) => f.debug_tuple("All").field(inner).finish(),
			Predicate::Custom(_) => f.write_str("Custom(..)"),
		}
	}
}

/// One ordering key of a selection
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderKey {
	/// Field to order on
	pub path: FieldPath,
	/// Direction
	pub direction: OrderDirection,
}

/// Filtered and ordered view of a data source
///
/// Predicates are combined with AND. Order keys apply in priority order;
/// without keys the source's natural order is kept.
///
/// # Examples
///
/// ```
/// use reinhardt_tables::column::FieldPath;
/// use reinhardt_tables::query::OrderDirection;
/// use reinhardt_tables::source::{Predicate, Selection};
/// use reinhardt_tables::{SearchMode, Value};
/// use serde_json::json;
///
/// let selection = Selection::all()
///     .filter(Predicate::Contains {
///         path: FieldPath::parse("name").unwrap(),
///         term: "ali".into(),
///         mode: SearchMode::CaseInsensitive,
///     })
///     .order_by(FieldPath::parse("age").unwrap(), OrderDirection::Desc);
///
/// assert!(selection.matches(&json!({"name": "Alice", "age": 30})));
/// assert!(!selection.matches(&json!({"name": "Bob", "age": 25})));
/// assert_eq!(selection.ordering().len(), 1);
/// ```
pub struct Selection<R> {
	predicates: Vec<Predicate<R>>,
	ordering: Vec<OrderKey>,
}

impl<R> Selection<R> {
	/// Selection of every record in natural order
	pub fn all() -> Self {
		Self {
			predicates: Vec::new(),
			ordering: Vec::new(),
		}
	}

	/// Narrows the selection with `predicate`
	pub fn filter(mut self, predicate: Predicate<R>) -> Self {
		self.predicates.push(predicate);
		self
	}

	/// Appends an order key with lower priority than the existing ones
	pub fn order_by(mut self, path: FieldPath, direction: OrderDirection) -> Self {
		self.ordering.push(OrderKey { path, direction });
		self
	}

	/// Replaces all order keys
	pub fn with_ordering(mut self, ordering: Vec<OrderKey>) -> Self {
		self.ordering = ordering;
		self
	}

	/// The predicates, all of which must hold
	pub fn predicates(&self) -> &[Predicate<R>] {
		&self.predicates
	}

	/// The order keys in priority order
	pub fn ordering(&self) -> &[OrderKey] {
		&self.ordering
	}

	/// Returns `true` if no predicate narrows the selection
	pub fn is_unfiltered(&self) -> bool {
		self.predicates.is_empty()
	}
}

impl<R: Record> Selection<R> {
	/// Returns `true` if `record` satisfies every predicate
	pub fn matches(&self, record: &R) -> bool {
		self.predicates.iter().all(|p| p.matches(record))
	}
}

impl<R> Default for Selection<R> {
	fn default() -> Self {
		Self::all()
	}
}

impl<R> Clone for Selection<R> {
	fn clone(&self) -> Self {
		Self {
			predicates: self.predicates.clone(),
			ordering: self.ordering.clone(),
		}
	}
}

impl<R> fmt::Debug for Selection<R> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("Selection")
			.field("predicates", &self.predicates)
			.field("ordering", &self.ordering)
			.finish()
	}
}

/// Slice of a selection to fetch
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Window {
	/// Records to skip
	pub offset: usize,
	/// Records to take; everything after `offset` when `None`
	pub limit: Option<usize>,
}

impl Window {
	/// Window covering the whole selection
	pub fn all() -> Self {
		Self {
			offset: 0,
			limit: None,
		}
	}

	/// Window of at most `limit` records starting at `offset`
	pub fn new(offset: usize, limit: Option<usize>) -> Self {
		Self { offset, limit }
	}

	/// Applies the window to an in-memory sequence
	///
	/// An offset past the end yields an empty result.
	pub fn slice<T>(&self, items: Vec<T>) -> Vec<T> {
		let rest = items.into_iter().skip(self.offset);
		match self.limit {
			Some(limit) => rest.take(limit).collect(),
			None => rest.collect(),
		}
	}
}

/// Queryable collection of records
///
/// Implementations must order stably: records equal under every order key
/// keep their natural relative order.
#[async_trait]
pub trait DataSource<R: Send + 'static>: Send + Sync {
	/// Number of records matching `selection`
	async fn count(&self, selection: &Selection<R>) -> Result<usize>;

	/// Records matching `selection`, ordered, restricted to `window`
	async fn fetch(&self, selection: &Selection<R>, window: Window) -> Result<Vec<R>>;
}

/// In-memory data source
///
/// # Examples
///
/// ```
/// use reinhardt_tables::query::OrderDirection;
/// use reinhardt_tables::source::{DataSource, Selection, VecSource, Window};
/// use reinhardt_tables::column::FieldPath;
/// use serde_json::json;
///
/// # async fn example() {
/// let source = VecSource::new(vec![json!({"n": 2}), json!({"n": 1}), json!({"n": 3})]);
/// let selection = Selection::all().order_by(FieldPath::parse("n").unwrap(), OrderDirection::Asc);
///
/// let rows = source.fetch(&selection, Window::new(1, Some(1))).await.unwrap();
/// assert_eq!(rows, vec![json!({"n": 2})]);
/// # }
/// ```
#[derive(Debug, Clone, Default)]
pub struct VecSource<R> {
	records: Vec<R>,
}

impl<R> VecSource<R> {
	/// Creates a source over `records`, whose order is the natural order
	pub fn new(records: Vec<R>) -> Self {
		Self { records }
	}

	/// Appends a record
	pub fn push(&mut self, record: R) {
		self.records.push(record);
	}

	/// Number of records
	pub fn len(&self) -> usize {
		self.records.len()
	}

	/// Returns `true` if the source holds no records
	pub fn is_empty(&self) -> bool {
		self.records.is_empty()
	}

	/// All records in natural order
	pub fn records(&self) -> &[R] {
		&self.records
	}
}

impl<R> From<Vec<R>> for VecSource<R> {
	fn from(records: Vec<R>) -> Self {
		Self::new(records)
	}
}

#[async_trait]
impl<R> DataSource<R> for VecSource<R>
where
	R: Record + Clone + Send + Sync + 'static,
{
	async fn count(&self, selection: &Selection<R>) -> Result<usize> {
		Ok(self
			.records
			.iter()
			.filter(|record| selection.matches(record))
			.count())
	}

	async fn fetch(&self, selection: &Selection<R>, window: Window) -> Result<Vec<R>> {
		let mut matching: Vec<&R> = self
			.records
			.iter()
			.filter(|record| selection.matches(record))
			.collect();
		if !selection.ordering().is_empty() {
			// slice::sort_by is stable
			matching.sort_by(|a, b| compare_records(*a, *b, selection.ordering()));
		}
		Ok(window.slice(matching).into_iter().cloned().collect())
	}
}

/// Compares two records under `keys`
///
/// Unresolvable fields compare as [`Value::Null`].
pub fn compare_records(a: &dyn Record, b: &dyn Record, keys: &[OrderKey]) -> Ordering {
	for key in keys {
		let left = key.path.resolve(a).unwrap_or(Value::Null);
		let right = key.path.resolve(b).unwrap_or(Value::Null);
		let ordering = match key.direction {
			OrderDirection::Asc => left.sort_cmp(&right),
			OrderDirection::Desc => right.sort_cmp(&left),
		};
		if ordering != Ordering::Equal {
			return ordering;
		}
	}
	Ordering::Equal
}
