//! Cell rendering
//!
//! Every row of a response carries one string per declared column. A cell is
//! produced by the first rule that applies:
//!
//! 1. the column's render hook, used verbatim
//! 2. the resolved field value in canonical form, HTML-escaped when enabled
//! 3. `none_string` for `Null` values
//! 4. an empty string when the field path cannot be resolved

use crate::column::{Column, ColumnRegistry};
use crate::record::{Record, Value};
use crate::settings::TableSettings;

/// Produces display strings for (row, column) pairs
///
/// # Examples
///
/// ```
/// use reinhardt_tables::column::Column;
/// use reinhardt_tables::render::CellRenderer;
/// use reinhardt_tables::TableSettings;
/// use serde_json::{json, Value as Row};
///
/// let renderer = CellRenderer::new(&TableSettings::default());
/// let row = json!({"title": "<b>bold</b>", "owner": {"name": "Kim"}});
///
/// let title: Column<Row> = Column::new("title").unwrap();
/// assert_eq!(renderer.render(&row, &title), "&lt;b&gt;bold&lt;/b&gt;");
///
/// let owner: Column<Row> = Column::new("owner.name").unwrap();
/// assert_eq!(renderer.render(&row, &owner), "Kim");
///
/// let missing: Column<Row> = Column::new("owner.email").unwrap();
/// assert_eq!(renderer.render(&row, &missing), "");
/// ```
#[derive(Debug, Clone)]
pub struct CellRenderer {
	none_string: String,
	escape: bool,
}

impl CellRenderer {
	/// Renderer configured from `settings`
	pub fn new(settings: &TableSettings) -> Self {
		Self {
			none_string: settings.none_string.clone(),
			escape: settings.escape_values,
		}
	}

	/// Renderer that never escapes, for non-HTML output such as exports
	pub fn plain(settings: &TableSettings) -> Self {
		Self {
			none_string: settings.none_string.clone(),
			escape: false,
		}
	}

	/// Renders one cell
	pub fn render<R: Record>(&self, row: &R, column: &Column<R>) -> String {
		if let Some(hook) = column.render_hook() {
			return hook(row, column);
		}
		match column.field().resolve(row) {
			None => String::new(),
			Some(Value::Null) => self.none_string.clone(),
			Some(value) if self.escape => escape_html(&value.to_string()),
			Some(value) => value.to_string(),
		}
	}

	/// Renders one cell per registered column, in index order
	pub fn render_row<R: Record>(&self, row: &R, registry: &ColumnRegistry<R>) -> Vec<String> {
		registry
			.all()
			.iter()
			.map(|column| self.render(row, column))
			.collect()
	}

	/// Renders every row
	pub fn render_rows<R: Record>(&self, rows: &[R], registry: &ColumnRegistry<R>) -> Vec<Vec<String>> {
		rows.iter().map(|row| self.render_row(row, registry)).collect()
	}
}

/// Escape HTML special characters
///
/// # Examples
///
/// ```
/// use reinhardt_tables::render::escape_html;
///
/// assert_eq!(escape_html("<a href=\"x\">Tom & Jerry's</a>"),
///     "&lt;a href=&quot;x&quot;&gt;Tom &amp; Jerry&#x27;s&lt;/a&gt;");
/// ```
pub fn escape_html(text: &str) -> String {
	let mut result = String::with_capacity(text.len() + 10);
	for ch in text.chars() {
		match ch {
			'&' => result.push_str("&amp;"),
			'<' => result.push_str("&lt;"),
			'>' => result.push_str("&gt;"),
			'"' => result.push_str("&quot;"),
			'\'' => result.push_str("&#x27;"),
			_ => result.push(ch),
		}
	}
	result
}
