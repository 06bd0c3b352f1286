//! Request parameter parsing
//!
//! Grid front ends send flat key/value pairs with bracketed names such as
//! `order[0][column]`. The parser accepts both the current naming scheme and
//! the older Hungarian-notation one (`iDisplayStart`, `sSortDir_0`, ...);
//! requests carrying `iSortingCols` are read as the latter.

use super::{Notation, OrderDirection, OrderSpec, PageLength, Query};
use crate::settings::TableSettings;
use std::collections::{BTreeMap, HashMap};
use std::str::FromStr;

/// Builds [`Query`] values from request parameters
///
/// # Examples
///
/// ```
/// use reinhardt_tables::query::{OrderDirection, PageLength, QueryParser};
/// use reinhardt_tables::TableSettings;
///
/// let parser = QueryParser::new(TableSettings::default());
/// let query = parser.parse_query_string(
///     "draw=3&start=20&length=-1&search%5Bvalue%5D=+ali+&order%5B0%5D%5Bcolumn%5D=1&order%5B0%5D%5Bdir%5D=desc",
/// );
///
/// assert_eq!(query.draw, 3);
/// assert_eq!(query.start, 20);
/// assert_eq!(query.length, PageLength::All);
/// assert_eq!(query.global_search.as_deref(), Some("ali"));
/// assert_eq!(query.order[0].column, 1);
/// assert_eq!(query.order[0].direction, OrderDirection::Desc);
/// ```
#[derive(Debug, Clone, Default)]
pub struct QueryParser {
	settings: TableSettings,
}

impl QueryParser {
	/// Creates a parser using `settings` for page length defaults and caps
	pub fn new(settings: TableSettings) -> Self {
		Self { settings }
	}

	/// The settings in use
	pub fn settings(&self) -> &TableSettings {
		&self.settings
	}

	/// Parses a URL-encoded query string
	///
	/// Undecodable input yields the default query. Repeated keys keep the
	/// last value.
	pub fn parse_query_string(&self, raw: &str) -> Query {
		let raw = raw.strip_prefix('?').unwrap_or(raw);
		let pairs: Vec<(String, String)> = serde_urlencoded::from_str(raw).unwrap_or_else(|e| {
			tracing::debug!(error = %e, "undecodable table query string, using defaults");
			Vec::new()
		});
		self.parse(&pairs.into_iter().collect())
	}

	/// Parses request parameters into a [`Query`]
	pub fn parse(&self, params: &HashMap<String, String>) -> Query {
		if params.contains_key("iSortingCols") {
			self.parse_legacy(params)
		} else {
			self.parse_modern(params)
		}
	}

	fn parse_modern(&self, params: &HashMap<String, String>) -> Query {
		let mut query = Query::new(PageLength::Limit(self.settings.default_page_length));
		query.draw = parse_draw(params.get("draw"));
		query.start = parse_start(params.get("start"));
		query.length = self.parse_length(params.get("length"));
		query.global_search = search_term(params.get("search[value]"));

		let mut order_columns: BTreeMap<usize, usize> = BTreeMap::new();
		let mut order_dirs: BTreeMap<usize, OrderDirection> = BTreeMap::new();

		for (key, value) in params {
			if let Some((index, field)) = bracketed(key, "order") {
				match field {
					"[column]" => match value.trim().parse::<usize>() {
						Ok(column) => {
							order_columns.insert(index, column);
						}
						Err(_) => {
							tracing::debug!(key = %key, value = %value, "ignoring non-numeric order column");
						}
					},
					"[dir]" => {
						order_dirs.insert(index, OrderDirection::from_param(value));
					}
					_ => {}
				}
			} else if let Some((index, field)) = bracketed(key, "columns") {
				match field {
					"[search][value]" => {
						if let Some(term) = search_term(Some(value)) {
							query.column_searches.insert(index, term);
						}
					}
					"[data]" => {
						query.client_columns.entry(index).or_default().data = Some(value.clone());
					}
					"[searchable]" => {
						query.client_columns.entry(index).or_default().searchable = parse_flag(value);
					}
					"[orderable]" => {
						query.client_columns.entry(index).or_default().orderable = parse_flag(value);
					}
					_ => {}
				}
			}
		}

		query.order = collect_order(order_columns, order_dirs);
		query
	}

	fn parse_legacy(&self, params: &HashMap<String, String>) -> Query {
		let mut query = Query::new(PageLength::Limit(self.settings.default_page_length));
		query.notation = Notation::Legacy;
		query.draw = parse_draw(params.get("sEcho"));
		query.start = parse_start(params.get("iDisplayStart"));
		query.length = self.parse_length(params.get("iDisplayLength"));
		query.global_search = search_term(params.get("sSearch"));

		let sorting_cols = params
			.get("iSortingCols")
			.and_then(|raw| raw.trim().parse::<usize>().ok())
			.unwrap_or(0);

		let mut order_columns: BTreeMap<usize, usize> = BTreeMap::new();
		let mut order_dirs: BTreeMap<usize, OrderDirection> = BTreeMap::new();

		for (key, value) in params {
			if let Some(index) = suffixed(key, "sSearch_") {
				if let Some(term) = search_term(Some(value)) {
					query.column_searches.insert(index, term);
				}
			} else if let Some(index) = suffixed(key, "iSortCol_") {
				if index >= sorting_cols {
					continue;
				}
				match value.trim().parse::<usize>() {
					Ok(column) => {
						order_columns.insert(index, column);
					}
					Err(_) => {
						tracing::debug!(key = %key, value = %value, "ignoring non-numeric sort column");
					}
				}
			} else if let Some(index) = suffixed(key, "sSortDir_") {
				order_dirs.insert(index, OrderDirection::from_param(value));
			} else if let Some(index) = suffixed(key, "mDataProp_") {
				query.client_columns.entry(index).or_default().data = Some(value.clone());
			} else if let Some(index) = suffixed(key, "bSearchable_") {
				query.client_columns.entry(index).or_default().searchable = parse_flag(value);
			} else if let Some(index) = suffixed(key, "bSortable_") {
				query.client_columns.entry(index).or_default().orderable = parse_flag(value);
			}
		}

		query.order = collect_order(order_columns, order_dirs);
		query
	}

	fn parse_length(&self, raw: Option<&String>) -> PageLength {
		let default = PageLength::Limit(self.settings.default_page_length);
		let Some(raw) = raw else {
			return default;
		};
		match raw.trim().parse::<i64>() {
			Ok(-1) => PageLength::All,
			Ok(length) if length > 0 => {
				let length = usize::try_from(length).unwrap_or(usize::MAX);
				match self.settings.max_page_length {
					Some(max) if length > max => {
						tracing::debug!(requested = length, max, "capping page length");
						PageLength::Limit(max)
					}
					_ => PageLength::Limit(length),
				}
			}
			_ => {
				tracing::debug!(value = %raw, "malformed page length, using default");
				default
			}
		}
	}
}

fn parse_draw(raw: Option<&String>) -> i64 {
	parse_or(raw, 0, "draw")
}

fn parse_start(raw: Option<&String>) -> usize {
	let start: i64 = parse_or(raw, 0, "start");
	usize::try_from(start).unwrap_or(0)
}

fn parse_or<T: FromStr>(raw: Option<&String>, default: T, name: &str) -> T {
	match raw {
		Some(raw) => raw.trim().parse().unwrap_or_else(|_| {
			tracing::debug!(parameter = name, value = %raw, "malformed integer parameter, using default");
			default
		}),
		None => default,
	}
}

fn parse_flag(raw: &str) -> Option<bool> {
	match raw.trim() {
		"true" => Some(true),
		"false" => Some(false),
		_ => None,
	}
}

fn search_term(raw: Option<&String>) -> Option<String> {
	raw.map(|value| value.trim())
		.filter(|value| !value.is_empty())
		.map(str::to_string)
}

/// Splits `prefix[N]rest` into `(N, rest)`
fn bracketed<'a>(key: &'a str, prefix: &str) -> Option<(usize, &'a str)> {
	let rest = key.strip_prefix(prefix)?.strip_prefix('[')?;
	let (index, field) = rest.split_once(']')?;
	Some((index.parse().ok()?, field))
}

/// Reads `N` from `prefixN`
fn suffixed(key: &str, prefix: &str) -> Option<usize> {
	key.strip_prefix(prefix)?.parse().ok()
}

fn collect_order(
	columns: BTreeMap<usize, usize>,
	mut dirs: BTreeMap<usize, OrderDirection>,
) -> Vec<OrderSpec> {
	columns
		.into_iter()
		.map(|(index, column)| OrderSpec {
			column,
			direction: dirs.remove(&index).unwrap_or_default(),
		})
		.collect()
}
