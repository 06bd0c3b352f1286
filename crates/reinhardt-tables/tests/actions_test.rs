
use async_trait::async_trait;
use reinhardt_tables::actions::{ActionHandler, ActionResponse, ActionSubmission, DispatchError};
use reinhardt_tables::{DataTable, TableSpec, TableStrings};
use rstest::*;
use serde_json::Value as Row;
use std::collections::BTreeSet;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
#[error("cannot archive {0} rows")]
struct ArchiveError(usize);

/// Handler recording every call
#[derive(Default)]
struct RecordingHandler {
	calls: AtomicUsize,
	seen: Mutex<Vec<(String, BTreeSet<String>)>>,
	fail: bool,
}

#[async_trait]
impl ActionHandler for RecordingHandler {
	type Output = ActionResponse;
	type Error = ArchiveError;

	async fn handle(
		&self,
		action: &str,
		selected_ids: &BTreeSet<String>,
	) -> Result<Self::Output, Self::Error> {
		self.calls.fetch_add(1, Ordering::SeqCst);
		self.seen
			.lock()
			.unwrap()
			.push((action.to_string(), selected_ids.clone()));
		if self.fail {
			Err(ArchiveError(selected_ids.len()))
		} else {
			Ok(ActionResponse::redirect("/tasks/"))
		}
	}
}

#[fixture]
fn table() -> DataTable<Row> {
	TableSpec::new("tasks")
		.fields(["id", "title"])
		.action("archive", "Archive selected")
		.action("delete", "Delete selected")
		.build()
		.unwrap()
}

#[rstest]
#[tokio::test]
async fn test_unknown_action_never_reaches_handler(table: DataTable<Row>) {
	let handler = RecordingHandler::default();
	let submission = table.submission_from_urlencoded("action=drop_tables&checkbox=1");

	let err = table.dispatch(&submission, &handler).await.unwrap_err();

	assert_eq!(handler.calls.load(Ordering::SeqCst), 0);
	assert!(err.is_rejected());
	assert_eq!(err.user_message(), Some("Unknown action 'drop_tables'"));
	assert_eq!(err.to_response().status, http::StatusCode::BAD_REQUEST);
}

#[rstest]
#[tokio::test]
async fn test_missing_action_rejected(table: DataTable<Row>) {
	let handler = RecordingHandler::default();
	let submission = table.submission_from_urlencoded("checkbox=1&checkbox=2");
	let result = table.dispatch(&submission, &handler).await;
	assert!(matches!(result, Err(DispatchError::Rejected { token, .. }) if token.is_empty()));
	assert_eq!(handler.calls.load(Ordering::SeqCst), 0);
}

#[rstest]
#[tokio::test]
async fn test_known_action_invoked_once_with_selection(table: DataTable<Row>) {
	let handler = RecordingHandler::default();
	let submission = table.submission_from_form(&[
		("action".to_string(), "archive".to_string()),
		("checkbox".to_string(), "3".to_string()),
		("checkbox".to_string(), "5".to_string()),
	]);

	let response = table.dispatch(&submission, &handler).await.unwrap();

	assert!(response.is_redirect());
	assert_eq!(response.location.as_deref(), Some("/tasks/"));
	assert_eq!(handler.calls.load(Ordering::SeqCst), 1);
	let seen = handler.seen.lock().unwrap();
	assert_eq!(seen[0].0, "archive");
	assert_eq!(
		seen[0].1,
		BTreeSet::from(["3".to_string(), "5".to_string()])
	);
}

#[rstest]
#[tokio::test]
async fn test_empty_selection_forwarded(table: DataTable<Row>) {
	let handler = RecordingHandler::default();
	let submission = ActionSubmission::new("delete", Vec::<String>::new());
	table.dispatch(&submission, &handler).await.unwrap();
	assert_eq!(handler.calls.load(Ordering::SeqCst), 1);
	assert!(handler.seen.lock().unwrap()[0].1.is_empty());
}

#[rstest]
#[tokio::test]
async fn test_handler_error_returned_unchanged(table: DataTable<Row>) {
	let handler = RecordingHandler {
		fail: true,
		..RecordingHandler::default()
	};
	let submission = ActionSubmission::new("archive", ["1", "2"]);

	let err = table.dispatch(&submission, &handler).await.unwrap_err();

	assert!(matches!(err, DispatchError::Handler(ArchiveError(2))));
	assert_eq!(err.to_string(), "cannot archive 2 rows");
	assert_eq!(err.user_message(), None);
	assert_eq!(handler.calls.load(Ordering::SeqCst), 1);
}

#[rstest]
#[tokio::test]
async fn test_localized_rejection(table: DataTable<Row>) {
	let localized: DataTable<Row> = TableSpec::new("tasks")
		.fields(["id"])
		.action("archive", "Archiver")
		.strings(TableStrings {
			unknown_action: "Action inconnue : {action}".to_string(),
			..TableStrings::default()
		})
		.build()
		.unwrap();
	let handler = RecordingHandler::default();
	let submission = ActionSubmission::new("delete", ["1"]);

	// "delete" is declared on the fixture table but not on this one
	assert!(table.dispatch(&submission, &handler).await.is_ok());
	let err = localized.dispatch(&submission, &handler).await.unwrap_err();
	assert_eq!(err.user_message(), Some("Action inconnue : delete"));
}

#[rstest]
#[tokio::test]
async fn test_custom_form_field_names() {
	let table: DataTable<Row> = TableSpec::new("tasks")
		.fields(["id"])
		.action("archive", "Archive")
		.settings({
			let mut settings = reinhardt_tables::TableSettings::default();
			settings.action_field = "op".to_string();
			settings.selection_field = "row".to_string();
			settings
		})
		.build()
		.unwrap();
	let submission = table.submission_from_urlencoded("op=archive&row=9&checkbox=1");
	assert_eq!(submission.action(), "archive");
	assert_eq!(submission.selected_ids(), &BTreeSet::from(["9".to_string()]));
	assert_eq!(table.columns()[0].name(), "row");
}
