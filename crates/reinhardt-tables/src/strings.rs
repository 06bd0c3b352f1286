//! User-visible strings
//!
//! Every text the engine shows to users comes from a [`TableStrings`] value.
//! Tables take one explicitly; code that has none at hand falls back to the
//! process-wide default, which an application may install once at startup.

use once_cell::sync::OnceCell;
use serde::{Deserialize, Serialize};

static DEFAULT_STRINGS: OnceCell<TableStrings> = OnceCell::new();

/// Localizable strings used by tables
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TableStrings {
	/// Label of the leading "any" choice of a choice filter
	pub any_choice: String,
	/// Header of the row selection column
	pub checkbox_header: String,
	/// Message for a rejected bulk action; `{action}` is replaced by the token
	pub unknown_action: String,
}

impl Default for TableStrings {
	fn default() -> Self {
		Self {
			any_choice: "Any".to_string(),
			checkbox_header: " ".to_string(),
			unknown_action: "Unknown action '{action}'".to_string(),
		}
	}
}

impl TableStrings {
	/// The process-wide default strings
	///
	/// Returns the installed strings, or the built-in English ones.
	pub fn global() -> &'static TableStrings {
		DEFAULT_STRINGS.get_or_init(TableStrings::default)
	}

	/// Message shown when `action` is not a declared bulk action
	///
	/// # Examples
	///
	/// ```
	/// use reinhardt_tables::TableStrings;
	///
	/// let strings = TableStrings::default();
	/// assert_eq!(strings.unknown_action_message("purge"), "Unknown action 'purge'");
	/// ```
	pub fn unknown_action_message(&self, action: &str) -> String {
		self.unknown_action.replace("{action}", action)
	}
}

/// Install the process-wide default strings
///
/// Succeeds only once and only before [`TableStrings::global`] was first
/// read. On failure the rejected strings are handed back.
pub fn install_default_strings(strings: TableStrings) -> Result<(), TableStrings> {
	DEFAULT_STRINGS.set(strings)
}
