//! Response assembly
//!
//! The grid front end accepts exactly four top-level keys, named by the wire
//! protocol.

use crate::error::Result;
use crate::query::Notation;
use serde::{Deserialize, Serialize};

/// One page of rendered rows
///
/// # Examples
///
/// ```
/// use reinhardt_tables::response::ResultPage;
///
/// let page = ResultPage::assemble(3, 57, 12, vec![vec!["14".into(), "73".into()]]);
/// assert_eq!(
///     page.to_json().unwrap(),
///     r#"{"draw":3,"recordsTotal":57,"recordsFiltered":12,"data":[["14","73"]]}"#
/// );
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResultPage {
	/// Draw counter copied from the request
	pub draw: i64,
	/// Records before filtering
	#[serde(rename = "recordsTotal")]
	pub records_total: usize,
	/// Records after filtering
	#[serde(rename = "recordsFiltered")]
	pub records_filtered: usize,
	/// Rendered rows, one cell per column
	pub data: Vec<Vec<String>>,
}

impl ResultPage {
	/// Assembles a page; pure and infallible
	pub fn assemble(
		draw: i64,
		records_total: usize,
		records_filtered: usize,
		data: Vec<Vec<String>>,
	) -> Self {
		Self {
			draw,
			records_total,
			records_filtered,
			data,
		}
	}

	/// Serializes the page to its JSON body
	pub fn to_json(&self) -> Result<String> {
		Ok(serde_json::to_string(self)?)
	}

	/// Converts to the legacy key names
	pub fn into_legacy(self) -> LegacyResultPage {
		LegacyResultPage {
			echo: self.draw,
			total_records: self.records_total,
			total_display_records: self.records_filtered,
			data: self.data,
		}
	}

	/// Serializes the page in the naming scheme of the request
	pub fn render_body(self, notation: Notation) -> Result<String> {
		match notation {
			Notation::Modern => self.to_json(),
			Notation::Legacy => self.into_legacy().to_json(),
		}
	}
}

/// A [`ResultPage`] under the legacy key names
///
/// ```
/// use reinhardt_tables::response::ResultPage;
///
/// let legacy = ResultPage::assemble(1, 2, 0, vec![]).into_legacy();
/// assert_eq!(
///     legacy.to_json().unwrap(),
///     r#"{"sEcho":1,"iTotalRecords":2,"iTotalDisplayRecords":0,"aaData":[]}"#
/// );
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LegacyResultPage {
	/// Draw counter (`sEcho`)
	#[serde(rename = "sEcho")]
	pub echo: i64,
	/// Records before filtering (`iTotalRecords`)
	#[serde(rename = "iTotalRecords")]
	pub total_records: usize,
	/// Records after filtering (`iTotalDisplayRecords`)
	#[serde(rename = "iTotalDisplayRecords")]
	pub total_display_records: usize,
	/// Rendered rows (`aaData`)
	#[serde(rename = "aaData")]
	pub data: Vec<Vec<String>>,
}

impl LegacyResultPage {
	/// Serializes the page to its JSON body
	pub fn to_json(&self) -> Result<String> {
		Ok(serde_json::to_string(self)?)
	}
}
