//! Table definitions
//!
//! [`TableSpec`] declares a table: its fields, per-field overrides, hooks,
//! choice filters and bulk actions. [`DataTable::from_spec`] validates the
//! declaration once and produces an immutable table that serves any number
//! of requests.

use crate::actions::{
	ActionDispatcher, ActionHandler, ActionSubmission, DispatchError, FormAction, checkbox_column,
};
use crate::column::{Align, ChoiceFilter, Column, ColumnRegistry, FilterHook, RenderHook};
use crate::engine::FilterSortEngine;
use crate::error::{Result, TableError};
use crate::query::{Query, QueryParser};
use crate::record::Record;
use crate::render::CellRenderer;
use crate::response::ResultPage;
use crate::settings::TableSettings;
use crate::source::{DataSource, Selection};
use crate::strings::TableStrings;
use serde::Serialize;
use std::collections::HashMap;
use std::sync::Arc;

enum ColumnDecl<R> {
	Field(String),
	Column(Column<R>),
}

/// Declarative description of a table
///
/// Every per-field option refers to a declared field; naming anything else
/// makes [`DataTable::from_spec`] fail with [`TableError::UnknownField`].
///
/// # Examples
///
/// ```
/// use reinhardt_tables::column::{Align, ChoiceFilter};
/// use reinhardt_tables::{DataTable, TableSpec};
/// use serde_json::Value as Row;
///
/// let table: DataTable<Row> = TableSpec::new("tasks")
///     .fields(["id", "title", "owner__name", "status"])
///     .hidden(["id"])
///     .verbose_name("owner__name", "Owner")
///     .unsortable(["status"])
///     .align("status", Align::Center)
///     .filter("status", ChoiceFilter::new().choice("Open", "open"))
///     .action("close", "Close selected")
///     .build()
///     .unwrap();
///
/// // The row selection column comes first when actions are declared
/// assert_eq!(table.columns().len(), 5);
/// assert_eq!(table.columns()[0].name(), "checkbox");
/// assert_eq!(table.columns()[3].header(), "Owner");
/// assert!(!table.columns()[1].is_visible());
/// ```
pub struct TableSpec<R> {
	name: String,
	columns: Vec<ColumnDecl<R>>,
	hidden: Vec<String>,
	verbose_names: Vec<(String, String)>,
	unsortable: Vec<String>,
	unsearchable: Vec<String>,
	alignment: Vec<(String, Align)>,
	nowrap: Vec<String>,
	render_hooks: Vec<(String, RenderHook<R>)>,
	filter_hooks: Vec<(String, FilterHook<R>)>,
	filters: Vec<(String, ChoiceFilter)>,
	actions: Vec<FormAction>,
	settings: TableSettings,
	strings: TableStrings,
}

impl<R: Record + 'static> TableSpec<R> {
	/// Starts a table declaration
	pub fn new(name: impl Into<String>) -> Self {
		Self {
			name: name.into(),
			columns: Vec::new(),
			hidden: Vec::new(),
			verbose_names: Vec::new(),
			unsortable: Vec::new(),
			unsearchable: Vec::new(),
			alignment: Vec::new(),
			nowrap: Vec::new(),
			render_hooks: Vec::new(),
			filter_hooks: Vec::new(),
			filters: Vec::new(),
			actions: Vec::new(),
			settings: TableSettings::default(),
			strings: TableStrings::global().clone(),
		}
	}

	/// Declares a field column
	pub fn field(mut self, field: impl Into<String>) -> Self {
		self.columns.push(ColumnDecl::Field(field.into()));
		self
	}

	/// Declares field columns in order
	pub fn fields<I, S>(mut self, fields: I) -> Self
	where
		I: IntoIterator<Item = S>,
		S: Into<String>,
	{
		self.columns
			.extend(fields.into_iter().map(|f| ColumnDecl::Field(f.into())));
		self
	}

	/// Declares a fully configured column
	pub fn column(mut self, column: Column<R>) -> Self {
		self.columns.push(ColumnDecl::Column(column));
		self
	}

	/// Marks fields as hidden on the front end; they are still rendered
	pub fn hidden<I, S>(mut self, fields: I) -> Self
	where
		I: IntoIterator<Item = S>,
		S: Into<String>,
	{
		self.hidden.extend(fields.into_iter().map(Into::into));
		self
	}

	/// Overrides the header of `field`
	pub fn verbose_name(mut self, field: impl Into<String>, name: impl Into<String>) -> Self {
		self.verbose_names.push((field.into(), name.into()));
		self
	}

	/// Overrides several headers
	pub fn verbose_names<I, F, N>(mut self, names: I) -> Self
	where
		I: IntoIterator<Item = (F, N)>,
		F: Into<String>,
		N: Into<String>,
	{
		self.verbose_names
			.extend(names.into_iter().map(|(f, n)| (f.into(), n.into())));
		self
	}

	/// Disables ordering on fields
	pub fn unsortable<I, S>(mut self, fields: I) -> Self
	where
		I: IntoIterator<Item = S>,
		S: Into<String>,
	{
		self.unsortable.extend(fields.into_iter().map(Into::into));
		self
	}

	/// Excludes fields from searches
	pub fn unsearchable<I, S>(mut self, fields: I) -> Self
	where
		I: IntoIterator<Item = S>,
		S: Into<String>,
	{
		self.unsearchable.extend(fields.into_iter().map(Into::into));
		self
	}

	/// Sets the alignment of `field`
	pub fn align(mut self, field: impl Into<String>, align: Align) -> Self {
		self.alignment.push((field.into(), align));
		self
	}

	/// Disables wrapping on fields
	pub fn nowrap<I, S>(mut self, fields: I) -> Self
	where
		I: IntoIterator<Item = S>,
		S: Into<String>,
	{
		self.nowrap.extend(fields.into_iter().map(Into::into));
		self
	}

	/// Renders cells of `field` with `hook`
	pub fn render_hook<F>(mut self, field: impl Into<String>, hook: F) -> Self
	where
		F: Fn(&R, &Column<R>) -> String + Send + Sync + 'static,
	{
		self.render_hooks.push((field.into(), Arc::new(hook)));
		self
	}

	/// Applies per-column searches on `field` with `hook`
	pub fn filter_hook<F>(mut self, field: impl Into<String>, hook: F) -> Self
	where
		F: Fn(Selection<R>, &str) -> Result<Selection<R>> + Send + Sync + 'static,
	{
		self.filter_hooks.push((field.into(), Arc::new(hook)));
		self
	}

	/// Attaches a choice filter to `field`
	///
	/// The filter's "any" choice is labelled from the table's strings.
	pub fn filter(mut self, field: impl Into<String>, filter: ChoiceFilter) -> Self {
		self.filters.push((field.into(), filter));
		self
	}

	/// Declares a bulk action
	pub fn action(mut self, token: impl Into<String>, label: impl Into<String>) -> Self {
		self.actions.push(FormAction::new(token, label));
		self
	}

	/// Uses `settings` instead of the defaults
	pub fn settings(mut self, settings: TableSettings) -> Self {
		self.settings = settings;
		self
	}

	/// Uses `strings` instead of the process-wide defaults
	pub fn strings(mut self, strings: TableStrings) -> Self {
		self.strings = strings;
		self
	}

	/// Sets the default page length
	pub fn page_length(mut self, length: usize) -> Self {
		self.settings.default_page_length = length;
		self
	}

	/// Shorthand for [`DataTable::from_spec`]
	pub fn build(self) -> Result<DataTable<R>> {
		DataTable::from_spec(self)
	}
}

#[cfg_attr(doc, aquamarine::aquamarine)]
/// A validated table ready to answer requests
///
/// ```mermaid
/// graph LR
///     P[Request parameters] --> QP[QueryParser]
///     QP --> Q[Query]
///     Q --> E[FilterSortEngine]
///     DS[(DataSource)] --> E
///     E --> FP[FilteredPage]
///     FP --> CR[CellRenderer]
///     CR --> RP[ResultPage]
///     RP --> J[JSON body]
///     F[Action form] --> AS[ActionSubmission]
///     AS --> AD[ActionDispatcher]
///     AD --> H[ActionHandler]
/// ```
pub struct DataTable<R> {
	name: String,
	registry: ColumnRegistry<R>,
	actions: Vec<FormAction>,
	selection_column: Option<usize>,
	settings: TableSettings,
	strings: TableStrings,
	parser: QueryParser,
}

impl<R: Record + 'static> DataTable<R> {
	/// Validates `spec` and builds the table
	///
	/// # Errors
	///
	/// - [`TableError::Settings`] if the settings fail validation
	/// - [`TableError::InvalidFieldPath`] for malformed fields
	/// - [`TableError::DuplicateField`] for fields declared twice
	/// - [`TableError::UnknownField`] for options naming undeclared fields
	/// - [`TableError::FilterAlreadyAttached`] for two filters on one field
	pub fn from_spec(spec: TableSpec<R>) -> Result<Self> {
		spec.settings.validate()?;

		let mut registry = ColumnRegistry::new();
		let selection_column = if spec.actions.is_empty() {
			None
		} else {
			Some(registry.register(checkbox_column(&spec.settings, &spec.strings)?)?)
		};

		for decl in spec.columns {
			let column = match decl {
				ColumnDecl::Field(field) => Column::new(&field)?,
				ColumnDecl::Column(column) => column,
			};
			registry.register(column)?;
		}

		for field in &spec.hidden {
			update(&mut registry, field, |c| c.visible(false))?;
		}
		for (field, name) in spec.verbose_names {
			update(&mut registry, &field, |c| c.verbose_name(name))?;
		}
		for field in &spec.unsortable {
			update(&mut registry, field, |c| c.sortable(false))?;
		}
		for field in &spec.unsearchable {
			update(&mut registry, field, |c| c.searchable(false))?;
		}
		for (field, align) in spec.alignment {
			update(&mut registry, &field, |c| c.align(align))?;
		}
		for field in &spec.nowrap {
			update(&mut registry, field, |c| c.wrap(false))?;
		}
		for (field, hook) in spec.render_hooks {
			column_mut(&mut registry, &field)?.set_render_hook(hook);
		}
		for (field, hook) in spec.filter_hooks {
			column_mut(&mut registry, &field)?.set_filter_hook(hook);
		}
		for (field, mut filter) in spec.filters {
			filter.relabel_any(&spec.strings);
			registry.attach_filter(&field, filter)?;
		}

		tracing::debug!(
			table = %spec.name,
			columns = registry.len(),
			actions = spec.actions.len(),
			"table defined"
		);

		Ok(Self {
			name: spec.name,
			registry,
			actions: spec.actions,
			selection_column,
			parser: QueryParser::new(spec.settings.clone()),
			settings: spec.settings,
			strings: spec.strings,
		})
	}

	/// Table name
	pub fn name(&self) -> &str {
		&self.name
	}

	/// Registered columns in wire order
	pub fn columns(&self) -> &[Column<R>] {
		self.registry.all()
	}

	/// The column registry
	pub fn registry(&self) -> &ColumnRegistry<R> {
		&self.registry
	}

	/// Declared bulk actions
	pub fn actions(&self) -> &[FormAction] {
		&self.actions
	}

	/// Index of the row selection column, present when actions are declared
	pub fn selection_column(&self) -> Option<usize> {
		self.selection_column
	}

	/// Table settings
	pub fn settings(&self) -> &TableSettings {
		&self.settings
	}

	/// Table strings
	pub fn strings(&self) -> &TableStrings {
		&self.strings
	}

	/// Parses request parameters with this table's settings
	pub fn parse_query(&self, params: &HashMap<String, String>) -> Query {
		self.parser.parse(params)
	}

	/// Parses a URL-encoded query string with this table's settings
	pub fn parse_query_string(&self, raw: &str) -> Query {
		self.parser.parse_query_string(raw)
	}

	/// Runs a parsed query and renders the page
	///
	/// # Errors
	///
	/// Data source and filter hook failures abort the request.
	pub async fn query<S>(&self, source: &S, query: &Query) -> Result<ResultPage>
	where
		S: DataSource<R> + ?Sized,
	{
		let engine = FilterSortEngine::new(&self.registry, self.settings.search_mode);
		let page = engine.apply(source, query).await?;
		let data = CellRenderer::new(&self.settings).render_rows(&page.records, &self.registry);
		Ok(ResultPage::assemble(
			query.draw,
			page.records_total,
			page.records_filtered,
			data,
		))
	}

	/// Parses `params`, runs the query and renders the page
	///
	/// # Examples
	///
	/// ```
	/// use reinhardt_tables::source::VecSource;
	/// use reinhardt_tables::{DataTable, TableSpec};
	/// use serde_json::{json, Value as Row};
	/// use std::collections::HashMap;
	///
	/// # async fn example() {
	/// let table: DataTable<Row> = TableSpec::new("readings")
	///     .fields(["time", "pressure"])
	///     .build()
	///     .unwrap();
	/// let source = VecSource::new(vec![
	///     json!({"time": 12, "pressure": 73}),
	///     json!({"time": 13, "pressure": 63}),
	/// ]);
	/// let params = HashMap::from([("draw".to_string(), "1".to_string())]);
	///
	/// let page = table.respond(&source, &params).await.unwrap();
	/// assert_eq!(page.records_total, 2);
	/// assert_eq!(page.data[1], vec!["13", "63"]);
	/// # }
	/// ```
	pub async fn respond<S>(&self, source: &S, params: &HashMap<String, String>) -> Result<ResultPage>
	where
		S: DataSource<R> + ?Sized,
	{
		let query = self.parse_query(params);
		self.query(source, &query).await
	}

	/// Like [`DataTable::respond`], returning the JSON body in the naming
	/// scheme of the request
	pub async fn respond_json<S>(&self, source: &S, params: &HashMap<String, String>) -> Result<String>
	where
		S: DataSource<R> + ?Sized,
	{
		let query = self.parse_query(params);
		let page = self.query(source, &query).await?;
		page.render_body(query.notation)
	}

	/// Reads an action submission from decoded form pairs
	pub fn submission_from_form(&self, pairs: &[(String, String)]) -> ActionSubmission {
		ActionSubmission::from_form(pairs, &self.settings)
	}

	/// Reads an action submission from a URL-encoded body
	pub fn submission_from_urlencoded(&self, body: &str) -> ActionSubmission {
		ActionSubmission::from_urlencoded(body, &self.settings)
	}

	/// A dispatcher for this table's actions
	pub fn dispatcher(&self) -> ActionDispatcher {
		ActionDispatcher::new(self.actions.clone(), self.strings.clone())
	}

	/// Validates `submission` and runs `handler` once
	///
	/// # Errors
	///
	/// See [`ActionDispatcher::dispatch`].
	pub async fn dispatch<H>(
		&self,
		submission: &ActionSubmission,
		handler: &H,
	) -> std::result::Result<H::Output, DispatchError<H::Error>>
	where
		H: ActionHandler + ?Sized,
	{
		self.dispatcher().dispatch(submission, handler).await
	}

	/// Front-end description of the table
	pub fn describe(&self) -> TableDescription {
		TableDescription {
			name: self.name.clone(),
			page_length: self.settings.default_page_length,
			columns: self
				.registry
				.all()
				.iter()
				.enumerate()
				.map(|(index, column)| ColumnDescription {
					field: column.name().to_string(),
					header: column.header().to_string(),
					visible: column.is_visible(),
					searchable: column.is_searchable(),
					sortable: column.is_sortable(),
					align: column.alignment(),
					wrap: column.wraps(),
					filter: self.registry.filter_for(index).cloned(),
				})
				.collect(),
			actions: self.actions.clone(),
		}
	}
}

impl<R> std::fmt::Debug for DataTable<R> {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("DataTable")
			.field("name", &self.name)
			.field("registry", &self.registry)
			.field("actions", &self.actions)
			.field("settings", &self.settings)
			.finish()
	}
}

/// Column metadata for the front end
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ColumnDescription {
	/// Declared field
	pub field: String,
	/// Header text
	pub header: String,
	/// Shown by the front end
	pub visible: bool,
	/// Takes part in searches
	pub searchable: bool,
	/// Can be ordered on
	pub sortable: bool,
	/// Cell alignment
	pub align: Align,
	/// Cell content wraps
	pub wrap: bool,
	/// Attached choice filter
	pub filter: Option<ChoiceFilter>,
}

/// Table metadata for the front end
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TableDescription {
	/// Table name
	pub name: String,
	/// Initial page length
	pub page_length: usize,
	/// Columns in wire order
	pub columns: Vec<ColumnDescription>,
	/// Declared bulk actions
	pub actions: Vec<FormAction>,
}

fn column_mut<'a, R>(registry: &'a mut ColumnRegistry<R>, field: &str) -> Result<&'a mut Column<R>> {
	let index = registry
		.index_of(field)
		.ok_or_else(|| TableError::UnknownField(field.to_string()))?;
	registry
		.get_mut(index)
		.ok_or_else(|| TableError::UnknownField(field.to_string()))
}

fn update<R, F>(registry: &mut ColumnRegistry<R>, field: &str, f: F) -> Result<()>
where
	F: FnOnce(Column<R>) -> Column<R>,
{
	let column = column_mut(registry, field)?;
	*column = f(column.clone());
	Ok(())
}
