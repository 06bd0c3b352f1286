//! Choice filters
//!
//! A choice filter describes the values a front end may offer for a column's
//! search box. It never filters anything by itself: the chosen value comes
//! back as an ordinary per-column search term.

use crate::strings::TableStrings;
use serde::Serialize;

/// One selectable entry of a [`ChoiceFilter`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FilterChoice {
	/// Label shown to the user
	pub label: String,
	/// Raw value sent back as the column search term
	pub value: String,
}

/// Ordered list of choices attached to a column
///
/// The first choice is always the "any" choice whose value is empty, so
/// selecting it clears the column search.
///
/// # Examples
///
/// ```
/// use reinhardt_tables::column::ChoiceFilter;
///
/// let mut filter = ChoiceFilter::new().header("Status");
/// filter.add_choice("Open", "open", true);
/// filter.add_choice("Closed", "closed", false);
///
/// assert_eq!(filter.choices().len(), 3);
/// assert_eq!(filter.choices()[0].value, "");
/// assert_eq!(filter.default_selection(), "open");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChoiceFilter {
	header: Option<String>,
	choices: Vec<FilterChoice>,
	default_choice: Option<usize>,
}

impl ChoiceFilter {
	/// Creates a filter holding only the "any" choice, labelled from the
	/// process-wide default strings
	pub fn new() -> Self {
		Self::with_strings(TableStrings::global())
	}

	/// Creates a filter holding only the "any" choice, labelled from `strings`
	pub fn with_strings(strings: &TableStrings) -> Self {
		Self {
			header: None,
			choices: vec![FilterChoice {
				label: strings.any_choice.clone(),
				value: String::new(),
			}],
			default_choice: None,
		}
	}

	/// Sets the header shown above the choice list
	pub fn header(mut self, header: impl Into<String>) -> Self {
		self.header = Some(header.into());
		self
	}

	/// Appends a choice; `default` marks it as initially selected
	///
	/// Marking a later choice as default replaces an earlier default.
	pub fn add_choice(
		&mut self,
		label: impl Into<String>,
		value: impl Into<String>,
		default: bool,
	) -> &mut Self {
		self.choices.push(FilterChoice {
			label: label.into(),
			value: value.into(),
		});
		if default {
			self.default_choice = Some(self.choices.len() - 1);
		}
		self
	}

	/// Builder form of [`ChoiceFilter::add_choice`] for non-default choices
	pub fn choice(mut self, label: impl Into<String>, value: impl Into<String>) -> Self {
		self.add_choice(label, value, false);
		self
	}

	/// Builder form of [`ChoiceFilter::add_choice`] for the default choice
	pub fn default_choice(mut self, label: impl Into<String>, value: impl Into<String>) -> Self {
		self.add_choice(label, value, true);
		self
	}

	/// Relabels the leading "any" choice from `strings`
	pub(crate) fn relabel_any(&mut self, strings: &TableStrings) {
		if let Some(any) = self.choices.first_mut() {
			any.label = strings.any_choice.clone();
		}
	}

	/// The header, if one was set
	pub fn header_text(&self) -> Option<&str> {
		self.header.as_deref()
	}

	/// All choices, "any" first
	pub fn choices(&self) -> &[FilterChoice] {
		&self.choices
	}

	/// Index of the default choice, if one was marked
	pub fn default_index(&self) -> Option<usize> {
		self.default_choice
	}

	/// Value of the default choice, or `""` (the "any" choice)
	pub fn default_selection(&self) -> &str {
		self.default_choice
			.and_then(|index| self.choices.get(index))
			.map_or("", |choice| choice.value.as_str())
	}
}

impl Default for ChoiceFilter {
	fn default() -> Self {
		Self::new()
	}
}
