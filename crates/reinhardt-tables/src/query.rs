//! Typed table queries
//!
//! A [`Query`] is the normalized form of one grid request: the draw counter,
//! the page window, the search terms and the requested ordering. It is built
//! by [`QueryParser`], which never fails; malformed parameters fall back to
//! defaults.

pub mod parser;

pub use parser::QueryParser;

use crate::source::Window;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Sort direction
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderDirection {
	/// Ascending
	#[default]
	Asc,
	/// Descending
	Desc,
}

impl OrderDirection {
	/// Reads a wire direction; anything but `desc` is ascending
	///
	/// # Examples
	///
	/// ```
	/// use reinhardt_tables::query::OrderDirection;
	///
	/// assert_eq!(OrderDirection::from_param("desc"), OrderDirection::Desc);
	/// assert_eq!(OrderDirection::from_param("DESC"), OrderDirection::Desc);
	/// assert_eq!(OrderDirection::from_param("sideways"), OrderDirection::Asc);
	/// ```
	pub fn from_param(raw: &str) -> Self {
		if raw.trim().eq_ignore_ascii_case("desc") {
			OrderDirection::Desc
		} else {
			OrderDirection::Asc
		}
	}

	/// Wire spelling
	pub fn as_str(&self) -> &'static str {
		match self {
			OrderDirection::Asc => "asc",
			OrderDirection::Desc => "desc",
		}
	}
}

/// Requested page length
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PageLength {
	/// Every remaining row (`length=-1`)
	All,
	/// At most this many rows
	Limit(usize),
}

impl PageLength {
	/// Wire value; `-1` for [`PageLength::All`]
	pub fn as_wire(&self) -> i64 {
		match self {
			PageLength::All => -1,
			PageLength::Limit(limit) => i64::try_from(*limit).unwrap_or(i64::MAX),
		}
	}

	/// Row limit, `None` for all rows
	pub fn limit(&self) -> Option<usize> {
		match self {
			PageLength::All => None,
			PageLength::Limit(limit) => Some(*limit),
		}
	}
}

/// Parameter naming scheme of a request
///
/// The response uses the same scheme as the request it answers.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Notation {
	/// `draw`, `start`, `length`, `search[value]`, `order[i][...]`
	#[default]
	Modern,
	/// `sEcho`, `iDisplayStart`, `iDisplayLength`, `sSearch`, `iSortCol_i`
	Legacy,
}

/// One requested ordering entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderSpec {
	/// Column index
	pub column: usize,
	/// Direction
	pub direction: OrderDirection,
}

/// Column descriptor sent by the client
///
/// Informational only; the table's own column declarations decide what is
/// searchable and sortable.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientColumn {
	/// Data key the client binds the column to
	pub data: Option<String>,
	/// Whether the client allows searching the column
	pub searchable: Option<bool>,
	/// Whether the client allows ordering on the column
	pub orderable: Option<bool>,
}

/// Normalized grid request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Query {
	/// Draw counter echoed in the response
	pub draw: i64,
	/// Index of the first row of the page
	pub start: usize,
	/// Page length
	pub length: PageLength,
	/// Trimmed global search term; `None` when empty
	pub global_search: Option<String>,
	/// Trimmed non-empty per-column search terms by column index
	pub column_searches: BTreeMap<usize, String>,
	/// Ordering entries in priority order
	pub order: Vec<OrderSpec>,
	/// Column descriptors by column index
	pub client_columns: BTreeMap<usize, ClientColumn>,
	/// Parameter naming scheme of the request
	pub notation: Notation,
}

impl Query {
	/// Query for the first page of `length` rows with nothing else set
	pub fn new(length: PageLength) -> Self {
		Self {
			draw: 0,
			start: 0,
			length,
			global_search: None,
			column_searches: BTreeMap::new(),
			order: Vec::new(),
			client_columns: BTreeMap::new(),
			notation: Notation::Modern,
		}
	}

	/// Page window of this query
	pub fn window(&self) -> Window {
		Window::new(self.start, self.length.limit())
	}

	/// Returns `true` if any search term is present
	pub fn has_search(&self) -> bool {
		self.global_search.is_some() || !self.column_searches.is_empty()
	}
}

impl Default for Query {
	fn default() -> Self {
		Self::new(PageLength::Limit(10))
	}
}
