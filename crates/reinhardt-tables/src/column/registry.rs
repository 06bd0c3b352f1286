//! Column registry
//!
//! Holds the columns of one table in declaration order. A column's position
//! is its wire index: `order[i][column]` and `columns[i][search][value]`
//! refer to it, and every rendered row carries its cells in this order.

use super::base::Column;
use super::filter::ChoiceFilter;
use crate::error::{Result, TableError};
use std::collections::HashMap;

/// Ordered set of columns with unique field paths
///
/// # Examples
///
/// ```
/// use reinhardt_tables::column::{Column, ColumnRegistry};
/// use reinhardt_tables::TableError;
/// use serde_json::Value as Row;
///
/// let mut registry: ColumnRegistry<Row> = ColumnRegistry::new();
/// assert_eq!(registry.register(Column::new("time").unwrap()).unwrap(), 0);
/// assert_eq!(registry.register(Column::new("owner.name").unwrap()).unwrap(), 1);
///
/// let duplicate = registry.register(Column::new("owner__name").unwrap());
/// assert!(matches!(duplicate, Err(TableError::DuplicateField(_))));
/// assert_eq!(registry.get(1).unwrap().name(), "owner.name");
/// assert!(registry.get(2).is_none());
/// ```
pub struct ColumnRegistry<R> {
	columns: Vec<Column<R>>,
	filters: HashMap<usize, ChoiceFilter>,
}

impl<R> ColumnRegistry<R> {
	/// Creates an empty registry
	pub fn new() -> Self {
		Self {
			columns: Vec::new(),
			filters: HashMap::new(),
		}
	}

	/// Appends a column and returns its index
	///
	/// # Errors
	///
	/// Returns [`TableError::DuplicateField`] if a column with the same field
	/// path is already registered.
	pub fn register(&mut self, column: Column<R>) -> Result<usize> {
		if self.columns.iter().any(|c| c.field() == column.field()) {
			return Err(TableError::DuplicateField(column.name().to_string()));
		}
		self.columns.push(column);
		Ok(self.columns.len() - 1)
	}

	/// Column at `index`
	pub fn get(&self, index: usize) -> Option<&Column<R>> {
		self.columns.get(index)
	}

	pub(crate) fn get_mut(&mut self, index: usize) -> Option<&mut Column<R>> {
		self.columns.get_mut(index)
	}

	/// All columns in index order
	pub fn all(&self) -> &[Column<R>] {
		&self.columns
	}

	/// Number of registered columns
	pub fn len(&self) -> usize {
		self.columns.len()
	}

	/// Returns `true` if no column is registered
	pub fn is_empty(&self) -> bool {
		self.columns.is_empty()
	}

	/// Index of the column declared for `field`
	///
	/// Either separator spelling finds the column.
	pub fn index_of(&self, field: &str) -> Option<usize> {
		let path = super::path::FieldPath::parse(field).ok()?;
		self.columns.iter().position(|c| *c.field() == path)
	}

	/// Searchable columns with their indices
	pub fn searchable(&self) -> impl Iterator<Item = (usize, &Column<R>)> {
		self.columns
			.iter()
			.enumerate()
			.filter(|(_, column)| column.is_searchable())
	}

	/// Attaches a choice filter to the column declared for `field`
	///
	/// # Errors
	///
	/// Returns [`TableError::UnknownField`] for undeclared fields and
	/// [`TableError::FilterAlreadyAttached`] if the column has a filter.
	pub fn attach_filter(&mut self, field: &str, filter: ChoiceFilter) -> Result<()> {
		let index = self
			.index_of(field)
			.ok_or_else(|| TableError::UnknownField(field.to_string()))?;
		if self.filters.contains_key(&index) {
			return Err(TableError::FilterAlreadyAttached(field.to_string()));
		}
		self.filters.insert(index, filter);
		Ok(())
	}

	/// Choice filter of the column at `index`
	pub fn filter_for(&self, index: usize) -> Option<&ChoiceFilter> {
		self.filters.get(&index)
	}

	/// Choice filters for every column, `None` where nothing is attached
	pub fn filters(&self) -> Vec<Option<&ChoiceFilter>> {
		(0..self.columns.len())
			.map(|index| self.filters.get(&index))
			.collect()
	}

	/// Header texts in index order
	pub fn headers(&self) -> Vec<&str> {
		self.columns.iter().map(Column::header).collect()
	}
}

impl<R> Default for ColumnRegistry<R> {
	fn default() -> Self {
		Self::new()
	}
}

impl<R> Clone for ColumnRegistry<R> {
	fn clone(&self) -> Self {
		Self {
			columns: self.columns.clone(),
			filters: self.filters.clone(),
		}
	}
}

impl<R> std::fmt::Debug for ColumnRegistry<R> {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("ColumnRegistry")
			.field("columns", &self.columns)
			.field("filters", &self.filters)
			.finish()
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::strings::TableStrings;
	use rstest::{fixture, rstest};

	type Row = serde_json::Value;

	#[fixture]
	fn registry() -> ColumnRegistry<Row> {
		let mut registry = ColumnRegistry::new();
		registry.register(Column::new("id").unwrap()).unwrap();
		registry
			.register(Column::new("title").unwrap().searchable(false))
			.unwrap();
		registry.register(Column::new("owner.name").unwrap()).unwrap();
		registry
	}

	#[rstest]
	fn test_indices_follow_declaration_order(registry: ColumnRegistry<Row>) {
		assert_eq!(registry.len(), 3);
		assert_eq!(registry.index_of("id"), Some(0));
		assert_eq!(registry.index_of("owner__name"), Some(2));
		assert_eq!(registry.index_of("missing"), None);
		assert_eq!(registry.headers(), vec!["Id", "Title", "Owner name"]);
	}

	#[rstest]
	fn test_duplicate_rejected_and_registry_unchanged(mut registry: ColumnRegistry<Row>) {
		let result = registry.register(Column::new("title").unwrap());
		assert!(matches!(result, Err(TableError::DuplicateField(f)) if f == "title"));
		assert_eq!(registry.len(), 3);
	}

	#[rstest]
	fn test_searchable_skips_opted_out_columns(registry: ColumnRegistry<Row>) {
		let indices: Vec<usize> = registry.searchable().map(|(i, _)| i).collect();
		assert_eq!(indices, vec![0, 2]);
	}

	#[rstest]
	fn test_attach_filter(mut registry: ColumnRegistry<Row>) {
		let filter = ChoiceFilter::with_strings(&TableStrings::default()).choice("Bob", "bob");
		registry.attach_filter("owner.name", filter.clone()).unwrap();

		assert_eq!(registry.filter_for(2), Some(&filter));
		assert!(registry.filter_for(0).is_none());
		assert_eq!(registry.filters(), vec![None, None, Some(&filter)]);

		assert!(matches!(
			registry.attach_filter("owner.name", filter.clone()),
			Err(TableError::FilterAlreadyAttached(_))
		));
		assert!(matches!(
			registry.attach_filter("nope", filter),
			Err(TableError::UnknownField(_))
		));
	}

	#[rstest]
	fn test_empty_registry() {
		let registry: ColumnRegistry<Row> = ColumnRegistry::default();
		assert!(registry.is_empty());
		assert!(registry.get(0).is_none());
		assert!(registry.all().is_empty());
	}
}
