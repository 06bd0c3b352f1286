//! Column definition

use super::path::FieldPath;
use crate::error::Result;
use crate::source::Selection;
use serde::{Deserialize, Serialize};
use std::fmt::Debug;
use std::sync::Arc;

/// Hook producing the display value of a cell
///
/// The returned string is used verbatim: it may contain markup and is not
/// escaped.
pub type RenderHook<R> = Arc<dyn Fn(&R, &Column<R>) -> String + Send + Sync>;

/// Hook narrowing a selection for a per-column search term
///
/// Replaces the default substring match for the column. Hooks must not have
/// side effects.
pub type FilterHook<R> = Arc<dyn Fn(Selection<R>, &str) -> Result<Selection<R>> + Send + Sync>;

/// Horizontal alignment of a column's cells
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Align {
	/// Left aligned (default)
	#[default]
	Left,
	/// Centered
	Center,
	/// Right aligned
	Right,
}

/// A table column
///
/// # Example
///
/// ```rust
/// use reinhardt_tables::column::{Align, Column};
/// use serde_json::Value as Row;
///
/// let column: Column<Row> = Column::new("owner.name")
///     .unwrap()
///     .verbose_name("Owner")
///     .searchable(false)
///     .align(Align::Center);
///
/// assert_eq!(column.name(), "owner.name");
/// assert_eq!(column.header(), "Owner");
/// assert!(!column.is_searchable());
/// assert!(column.is_sortable());
/// ```
pub struct Column<R> {
	field: FieldPath,
	verbose_name: String,
	searchable: bool,
	sortable: bool,
	visible: bool,
	align: Align,
	wrap: bool,
	render_hook: Option<RenderHook<R>>,
	filter_hook: Option<FilterHook<R>>,
}

impl<R> Column<R> {
	/// Creates a new column for `field`
	///
	/// The header defaults to the humanized field name. The column is
	/// searchable, sortable, visible, left aligned and wrapping.
	///
	/// # Errors
	///
	/// Returns [`crate::TableError::InvalidFieldPath`] for malformed paths.
	pub fn new(field: &str) -> Result<Self> {
		let field = FieldPath::parse(field)?;
		Ok(Self {
			verbose_name: humanize_field_name(field.as_str()),
			field,
			searchable: true,
			sortable: true,
			visible: true,
			align: Align::Left,
			wrap: true,
			render_hook: None,
			filter_hook: None,
		})
	}

	/// Sets the header text
	pub fn verbose_name(mut self, verbose_name: impl Into<String>) -> Self {
		self.verbose_name = verbose_name.into();
		self
	}

	/// Sets whether this column takes part in searches
	pub fn searchable(mut self, searchable: bool) -> Self {
		self.searchable = searchable;
		self
	}

	/// Sets whether this column can be ordered on
	pub fn sortable(mut self, sortable: bool) -> Self {
		self.sortable = sortable;
		self
	}

	/// Sets whether the front end shows this column
	pub fn visible(mut self, visible: bool) -> Self {
		self.visible = visible;
		self
	}

	/// Sets the cell alignment
	pub fn align(mut self, align: Align) -> Self {
		self.align = align;
		self
	}

	/// Sets whether cell content wraps
	pub fn wrap(mut self, wrap: bool) -> Self {
		self.wrap = wrap;
		self
	}

	/// Renders cells of this column with `hook`
	pub fn render_with<F>(mut self, hook: F) -> Self
	where
		F: Fn(&R, &Column<R>) -> String + Send + Sync + 'static,
	{
		self.render_hook = Some(Arc::new(hook));
		self
	}

	/// Applies per-column searches of this column with `hook`
	pub fn filter_with<F>(mut self, hook: F) -> Self
	where
		F: Fn(Selection<R>, &str) -> Result<Selection<R>> + Send + Sync + 'static,
	{
		self.filter_hook = Some(Arc::new(hook));
		self
	}

	pub(crate) fn set_render_hook(&mut self, hook: RenderHook<R>) {
		self.render_hook = Some(hook);
	}

	pub(crate) fn set_filter_hook(&mut self, hook: FilterHook<R>) {
		self.filter_hook = Some(hook);
	}

	/// The validated field path
	pub fn field(&self) -> &FieldPath {
		&self.field
	}

	/// The field as declared; used as the column's identifier
	pub fn name(&self) -> &str {
		self.field.as_str()
	}

	/// The header text
	pub fn header(&self) -> &str {
		&self.verbose_name
	}

	/// Returns whether this column takes part in searches
	pub fn is_searchable(&self) -> bool {
		self.searchable
	}

	/// Returns whether this column can be ordered on
	pub fn is_sortable(&self) -> bool {
		self.sortable
	}

	/// Returns whether the front end shows this column
	pub fn is_visible(&self) -> bool {
		self.visible
	}

	/// Returns the cell alignment
	pub fn alignment(&self) -> Align {
		self.align
	}

	/// Returns whether cell content wraps
	pub fn wraps(&self) -> bool {
		self.wrap
	}

	/// The render hook, if any
	pub fn render_hook(&self) -> Option<&RenderHook<R>> {
		self.render_hook.as_ref()
	}

	/// The filter hook, if any
	pub fn filter_hook(&self) -> Option<&FilterHook<R>> {
		self.filter_hook.as_ref()
	}
}

impl<R> Clone for Column<R> {
	fn clone(&self) -> Self {
		Self {
			field: self.field.clone(),
			verbose_name: self.verbose_name.clone(),
			searchable: self.searchable,
			sortable: self.sortable,
			visible: self.visible,
			align: self.align,
			wrap: self.wrap,
			render_hook: self.render_hook.clone(),
			filter_hook: self.filter_hook.clone(),
		}
	}
}

impl<R> Debug for Column<R> {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("Column")
			.field("field", &self.field.as_str())
			.field("verbose_name", &self.verbose_name)
			.field("searchable", &self.searchable)
			.field("sortable", &self.sortable)
			.field("visible", &self.visible)
			.field("align", &self.align)
			.field("wrap", &self.wrap)
			.field("render_hook", &self.render_hook.is_some())
			.field("filter_hook", &self.filter_hook.is_some())
			.finish()
	}
}

/// Turn a field name into header text
///
/// Separators (`__`, `.`, `_`) become spaces, the first letter is uppercased
/// and the rest lowercased.
///
/// # Examples
///
/// ```
/// use reinhardt_tables::column::humanize_field_name;
///
/// assert_eq!(humanize_field_name("created_at"), "Created at");
/// assert_eq!(humanize_field_name("owner__name"), "Owner name");
/// assert_eq!(humanize_field_name("owner.Name"), "Owner name");
/// ```
pub fn humanize_field_name(field: &str) -> String {
	let spaced = field.replace("__", " ").replace(['.', '_'], " ");
	let mut chars = spaced.trim().chars();
	match chars.next() {
		Some(first) => first
			.to_uppercase()
			.chain(chars.flat_map(char::to_lowercase))
			.collect(),
		None => String::new(),
	}
}
