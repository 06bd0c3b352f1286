//! Filter and sort engine
//!
//! Turns a [`Query`] into a [`Selection`] against the columns of a table and
//! runs it on a [`DataSource`]. The steps always run in the same order:
//!
//! 1. count every record (`records_total`)
//! 2. narrow by per-column searches, in column index order
//! 3. narrow by the global search (OR across searchable columns)
//! 4. count the selection (`records_filtered`)
//! 5. order by the requested keys
//! 6. fetch the page window

use crate::column::ColumnRegistry;
use crate::error::Result;
use crate::query::Query;
use crate::record::Record;
use crate::settings::SearchMode;
use crate::source::{DataSource, OrderKey, Predicate, Selection, Window};

/// Records of one page together with the counts the response reports
#[derive(Debug, Clone, PartialEq)]
pub struct FilteredPage<R> {
	/// Records before any filtering
	pub records_total: usize,
	/// Records after filtering, before paging
	pub records_filtered: usize,
	/// Records of the requested page, ordered
	pub records: Vec<R>,
}

/// Applies queries to data sources for one set of columns
///
/// # Examples
///
/// ```
/// use reinhardt_tables::column::{Column, ColumnRegistry};
/// use reinhardt_tables::engine::FilterSortEngine;
/// use reinhardt_tables::query::QueryParser;
/// use reinhardt_tables::source::VecSource;
/// use reinhardt_tables::{SearchMode, TableSettings};
/// use serde_json::{json, Value as Row};
///
/// # async fn example() {
/// let mut registry: ColumnRegistry<Row> = ColumnRegistry::new();
/// registry.register(Column::new("name").unwrap()).unwrap();
///
/// let source = VecSource::new(vec![json!({"name": "Alice"}), json!({"name": "Bob"})]);
/// let query = QueryParser::new(TableSettings::default()).parse_query_string("search%5Bvalue%5D=bo");
///
/// let engine = FilterSortEngine::new(&registry, SearchMode::CaseInsensitive);
/// let page = engine.apply(&source, &query).await.unwrap();
/// assert_eq!(page.records_total, 2);
/// assert_eq!(page.records_filtered, 1);
/// assert_eq!(page.records, vec![json!({"name": "Bob"})]);
/// # }
/// ```
pub struct FilterSortEngine<'a, R> {
	registry: &'a ColumnRegistry<R>,
	mode: SearchMode,
}

impl<'a, R> FilterSortEngine<'a, R> {
	/// Creates an engine over `registry` using `mode` for default searches
	pub fn new(registry: &'a ColumnRegistry<R>, mode: SearchMode) -> Self {
		Self { registry, mode }
	}

	/// Builds the filtered selection for `query`, without ordering
	///
	/// Searches on unknown or non-searchable columns are ignored. A global
	/// search on a table without searchable columns matches nothing.
	///
	/// # Errors
	///
	/// Propagates the error of a failing column filter hook.
	pub fn selection(&self, query: &Query) -> Result<Selection<R>> {
		let mut selection = Selection::all();

		for (&index, term) in &query.column_searches {
			let Some(column) = self.registry.get(index) else {
				tracing::debug!(column = index, "ignoring search on unknown column");
				continue;
			};
			if !column.is_searchable() {
				tracing::debug!(column = index, field = column.name(), "ignoring search on non-searchable column");
				continue;
			}
			selection = match column.filter_hook() {
				Some(hook) => hook(selection, term)?,
				None => selection.filter(Predicate::Contains {
					path: column.field().clone(),
					term: term.clone(),
					mode: self.mode,
				}),
			};
		}

		if let Some(term) = &query.global_search {
			let any = self
				.registry
				.searchable()
				.map(|(_, column)| Predicate::Contains {
					path: column.field().clone(),
					term: term.clone(),
					mode: self.mode,
				})
				.collect();
			selection = selection.filter(Predicate::Any(any));
		}

		Ok(selection)
	}

	/// Order keys for `query`
	///
	/// Entries naming unknown or non-sortable columns are skipped.
	pub fn ordering(&self, query: &Query) -> Vec<OrderKey> {
		query
			.order
			.iter()
			.filter_map(|spec| {
				let column = self.registry.get(spec.column);
				match column {
					Some(column) if column.is_sortable() => Some(OrderKey {
						path: column.field().clone(),
						direction: spec.direction,
					}),
					_ => {
						tracing::debug!(column = spec.column, "ignoring order on unknown or non-sortable column");
						None
					}
				}
			})
			.collect()
	}

	/// Runs `query` against `source` and returns the requested page
	///
	/// # Errors
	///
	/// Data source and filter hook errors abort the request.
	pub async fn apply<S>(&self, source: &S, query: &Query) -> Result<FilteredPage<R>>
	where
		R: Record + Send + 'static,
		S: DataSource<R> + ?Sized,
	{
		let records_total = source.count(&Selection::all()).await?;
		let selection = self.selection(query)?;
		let records_filtered = if selection.is_unfiltered() {
			records_total
		} else {
			source.count(&selection).await?.min(records_total)
		};
		let selection = selection.with_ordering(self.ordering(query));

		let records = if records_filtered == 0 || query.start >= records_filtered {
			Vec::new()
		} else {
			source.fetch(&selection, query.window()).await?
		};

		tracing::debug!(
			records_total,
			records_filtered,
			returned = records.len(),
			start = query.start,
			"table query applied"
		);

		Ok(FilteredPage {
			records_total,
			records_filtered,
			records,
		})
	}

	/// Runs `query` against `source` ignoring its page window
	pub async fn apply_unpaged<S>(&self, source: &S, query: &Query) -> Result<Vec<R>>
	where
		R: Record + Send + 'static,
		S: DataSource<R> + ?Sized,
	{
		let selection = self.selection(query)?.with_ordering(self.ordering(query));
		source.fetch(&selection, Window::all()).await
	}
}
