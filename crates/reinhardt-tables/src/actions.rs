//! Bulk row actions
//!
//! A table may declare actions that operate on a set of selected rows. The
//! front end posts a form with the action token and one selection field per
//! checked row; the dispatcher validates the token and hands the selection to
//! an [`ActionHandler`].
//!
//! ```text
//! Idle ──known token──▶ Validating ──handler called──▶ Dispatched
//!   └───unknown token──▶ Rejected
//! ```

use crate::column::Column;
use crate::record::Record;
use crate::render::escape_html;
use crate::settings::TableSettings;
use crate::strings::TableStrings;
use async_trait::async_trait;
use http::StatusCode;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use thiserror::Error;

/// A declared bulk action
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormAction {
	/// Token submitted in the action field
	pub token: String,
	/// Label shown to the user
	pub label: String,
}

impl FormAction {
	/// Creates an action
	pub fn new(token: impl Into<String>, label: impl Into<String>) -> Self {
		Self {
			token: token.into(),
			label: label.into(),
		}
	}
}

/// Progress of one dispatch
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DispatchState {
	/// Nothing dispatched yet
	#[default]
	Idle,
	/// The token matched a declared action
	Validating,
	/// The handler was invoked
	Dispatched,
	/// The token matched no declared action
	Rejected,
}

/// A submitted bulk action request
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ActionSubmission {
	action: String,
	selected_ids: BTreeSet<String>,
}

impl ActionSubmission {
	/// Creates a submission
	pub fn new<I, S>(action: impl Into<String>, selected_ids: I) -> Self
	where
		I: IntoIterator<Item = S>,
		S: Into<String>,
	{
		Self {
			action: action.into(),
			selected_ids: selected_ids.into_iter().map(Into::into).collect(),
		}
	}

	/// Reads a submission from decoded form pairs
	///
	/// The action comes from `settings.action_field` (last value wins) and
	/// the selection from every `settings.selection_field` pair. A missing
	/// action yields an empty token, which no table declares.
	///
	/// # Examples
	///
	/// ```
	/// use reinhardt_tables::actions::ActionSubmission;
	/// use reinhardt_tables::TableSettings;
	///
	/// let pairs = vec![
	///     ("action".to_string(), "archive".to_string()),
	///     ("checkbox".to_string(), "3".to_string()),
	///     ("checkbox".to_string(), "7".to_string()),
	///     ("csrf".to_string(), "ignored".to_string()),
	/// ];
	/// let submission = ActionSubmission::from_form(&pairs, &TableSettings::default());
	///
	/// assert_eq!(submission.action(), "archive");
	/// assert_eq!(submission.selected_ids().len(), 2);
	/// ```
	pub fn from_form(pairs: &[(String, String)], settings: &TableSettings) -> Self {
		let mut submission = Self::default();
		for (key, value) in pairs {
			if *key == settings.action_field {
				submission.action = value.trim().to_string();
			} else if *key == settings.selection_field {
				submission.selected_ids.insert(value.clone());
			}
		}
		submission
	}

	/// Reads a submission from a URL-encoded form body
	///
	/// An undecodable body yields an empty submission.
	pub fn from_urlencoded(body: &str, settings: &TableSettings) -> Self {
		let pairs: Vec<(String, String)> = serde_urlencoded::from_str(body).unwrap_or_else(|e| {
			tracing::debug!(error = %e, "undecodable action submission");
			Vec::new()
		});
		Self::from_form(&pairs, settings)
	}

	/// The submitted action token
	pub fn action(&self) -> &str {
		&self.action
	}

	/// The selected record identifiers
	pub fn selected_ids(&self) -> &BTreeSet<String> {
		&self.selected_ids
	}
}

/// Performs bulk actions on selected records
#[async_trait]
pub trait ActionHandler: Send + Sync {
	/// Result of a successful action
	type Output: Send;
	/// Failure of an action
	type Error: std::error::Error + Send + Sync + 'static;

	/// Runs `action` on the records identified by `selected_ids`
	///
	/// Called at most once per submission. `selected_ids` may be empty.
	async fn handle(
		&self,
		action: &str,
		selected_ids: &BTreeSet<String>,
	) -> Result<Self::Output, Self::Error>;
}

/// Failure of a dispatch
#[derive(Debug, Error)]
pub enum DispatchError<E: std::error::Error + 'static> {
	/// The token matched no declared action; the handler was not called
	#[error("{message}")]
	Rejected {
		/// Submitted token
		token: String,
		/// User-visible message
		message: String,
	},
	/// The handler failed
	#[error(transparent)]
	Handler(E),
}

impl<E: std::error::Error + 'static> DispatchError<E> {
	/// Returns `true` for [`DispatchError::Rejected`]
	pub fn is_rejected(&self) -> bool {
		matches!(self, DispatchError::Rejected { .. })
	}

	/// Message fit for showing to the user, if any
	pub fn user_message(&self) -> Option<&str> {
		match self {
			DispatchError::Rejected { message, .. } => Some(message.as_str()),
			DispatchError::Handler(_) => None,
		}
	}

	/// HTTP outcome of the failure
	pub fn to_response(&self) -> ActionResponse {
		match self {
			DispatchError::Rejected { message, .. } => ActionResponse::rejected(message.clone()),
			DispatchError::Handler(_) => ActionResponse::status(StatusCode::INTERNAL_SERVER_ERROR),
		}
	}
}

/// Validates submissions against declared actions and invokes the handler
///
/// # Examples
///
/// ```
/// use async_trait::async_trait;
/// use reinhardt_tables::actions::{
///     ActionDispatcher, ActionHandler, ActionSubmission, DispatchState, FormAction,
/// };
/// use reinhardt_tables::TableStrings;
/// use std::collections::BTreeSet;
///
/// struct Counter;
///
/// #[async_trait]
/// impl ActionHandler for Counter {
///     type Output = usize;
///     type Error = std::io::Error;
///
///     async fn handle(&self, _action: &str, ids: &BTreeSet<String>) -> Result<usize, Self::Error> {
///         Ok(ids.len())
///     }
/// }
///
/// # async fn example() {
/// let mut dispatcher = ActionDispatcher::new(
///     vec![FormAction::new("archive", "Archive")],
///     TableStrings::default(),
/// );
///
/// let archived = dispatcher
///     .dispatch(&ActionSubmission::new("archive", ["1", "2"]), &Counter)
///     .await
///     .unwrap();
/// assert_eq!(archived, 2);
/// assert_eq!(dispatcher.state(), DispatchState::Dispatched);
///
/// let err = dispatcher
///     .dispatch(&ActionSubmission::new("purge", ["1"]), &Counter)
///     .await
///     .unwrap_err();
/// assert!(err.is_rejected());
/// assert_eq!(dispatcher.state(), DispatchState::Rejected);
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct ActionDispatcher {
	actions: Vec<FormAction>,
	strings: TableStrings,
	state: DispatchState,
}

impl ActionDispatcher {
	/// Creates a dispatcher for `actions`
	pub fn new(actions: Vec<FormAction>, strings: TableStrings) -> Self {
		Self {
			actions,
			strings,
			state: DispatchState::Idle,
		}
	}

	/// The declared actions
	pub fn actions(&self) -> &[FormAction] {
		&self.actions
	}

	/// State reached by the last dispatch
	pub fn state(&self) -> DispatchState {
		self.state
	}

	/// Returns `true` if `token` names a declared action
	pub fn is_declared(&self, token: &str) -> bool {
		self.actions.iter().any(|action| action.token == token)
	}

	/// Validates `submission` and runs the handler once
	///
	/// # Errors
	///
	/// [`DispatchError::Rejected`] for undeclared tokens, without calling
	/// the handler. [`DispatchError::Handler`] carries the handler's error
	/// unchanged.
	pub async fn dispatch<H>(
		&mut self,
		submission: &ActionSubmission,
		handler: &H,
	) -> Result<H::Output, DispatchError<H::Error>>
	where
		H: ActionHandler + ?Sized,
	{
		self.state = DispatchState::Idle;
		let token = submission.action();

		if !self.is_declared(token) {
			self.state = DispatchState::Rejected;
			tracing::warn!(action = token, "rejected undeclared table action");
			return Err(DispatchError::Rejected {
				token: token.to_string(),
				message: self.strings.unknown_action_message(token),
			});
		}

		self.state = DispatchState::Validating;
		tracing::debug!(
			action = token,
			selected = submission.selected_ids().len(),
			"dispatching table action"
		);
		let result = handler.handle(token, submission.selected_ids()).await;
		self.state = DispatchState::Dispatched;
		result.map_err(DispatchError::Handler)
	}
}

/// HTTP outcome of a bulk action
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionResponse {
	/// Response status
	pub status: StatusCode,
	/// Redirect target, for redirects
	pub location: Option<String>,
	/// Message for the user, if any
	pub message: Option<String>,
}

impl ActionResponse {
	/// `303 See Other` to `location`
	pub fn redirect(location: impl Into<String>) -> Self {
		Self {
			status: StatusCode::SEE_OTHER,
			location: Some(location.into()),
			message: None,
		}
	}

	/// Bare status response
	pub fn status(status: StatusCode) -> Self {
		Self {
			status,
			location: None,
			message: None,
		}
	}

	/// `400 Bad Request` carrying `message`
	pub fn rejected(message: impl Into<String>) -> Self {
		Self {
			status: StatusCode::BAD_REQUEST,
			location: None,
			message: Some(message.into()),
		}
	}

	/// Returns `true` for redirects
	pub fn is_redirect(&self) -> bool {
		self.status.is_redirection() && self.location.is_some()
	}
}

/// Leading row selection column of tables with actions
///
/// Neither searchable nor sortable. Each cell is a checkbox named after
/// `settings.selection_field` whose value is the record's `id`.
pub fn checkbox_column<R: Record + 'static>(
	settings: &TableSettings,
	strings: &TableStrings,
) -> crate::error::Result<Column<R>> {
	let name = escape_html(&settings.selection_field);
	Ok(Column::new(&settings.selection_field)?
		.verbose_name(strings.checkbox_header.clone())
		.searchable(false)
		.sortable(false)
		.render_with(move |row: &R, _| {
			let id = row.value("id").map(|v| v.to_string()).unwrap_or_default();
			format!(
				"<input type=\"checkbox\" name=\"{}\" value=\"{}\">",
				name,
				escape_html(&id)
			)
		}))
}
