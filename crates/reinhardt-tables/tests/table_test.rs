
use fixtures::*;
use reinhardt_tables::column::{Align, ChoiceFilter, Column};
use reinhardt_tables::query::Notation;
use reinhardt_tables::source::{Predicate, VecSource};
use reinhardt_tables::{DataTable, TableError, TableSettings, TableSpec, TableStrings};
use rstest::*;
use serde_json::{Value as Row, json};

#[fixture]
fn readings_table() -> DataTable<Row> {
	TableSpec::new("readings")
		.fields(["time", "pressure"])
		.build()
		.unwrap()
}

#[fixture]
fn users_table() -> DataTable<TestUser> {
	TableSpec::new("users")
		.fields(["id", "name", "email", "active", "score", "manager.name"])
		.hidden(["id"])
		.unsearchable(["email"])
		.unsortable(["active"])
		.verbose_name("manager.name", "Manager")
		.align("score", Align::Right)
		.build()
		.unwrap()
}

#[rstest]
#[tokio::test]
async fn test_order_desc_first_page(readings_table: DataTable<Row>, readings: VecSource<Row>) {
	let page = readings_table
		.respond(
			&readings,
			&params(&[
				("draw", "1"),
				("start", "0"),
				("length", "2"),
				("order[0][column]", "0"),
				("order[0][dir]", "desc"),
			]),
		)
		.await
		.unwrap();

	assert_eq!(page.records_total, 3);
	assert_eq!(page.records_filtered, 3);
	assert_eq!(page.data, vec![vec!["14", "73"], vec!["13", "63"]]);
}

#[rstest]
#[tokio::test]
async fn test_column_search(readings_table: DataTable<Row>, readings: VecSource<Row>) {
	let page = readings_table
		.respond(&readings, &params(&[("columns[1][search][value]", "63")]))
		.await
		.unwrap();

	assert_eq!(page.records_total, 3);
	assert_eq!(page.records_filtered, 1);
	assert_eq!(page.data, vec![vec!["13", "63"]]);
}

#[rstest]
#[tokio::test]
async fn test_unknown_order_index_ignored(readings_table: DataTable<Row>, readings: VecSource<Row>) {
	let with_bogus = readings_table
		.respond(
			&readings,
			&params(&[("order[0][column]", "5"), ("order[0][dir]", "desc")]),
		)
		.await
		.unwrap();
	let plain = readings_table
		.respond(&readings, &params(&[]))
		.await
		.unwrap();

	assert_eq!(with_bogus, plain);
	assert_eq!(plain.data[0], vec!["12", "53"]);
}

#[rstest]
#[case("42", 42)]
#[case("not-a-number", 0)]
#[tokio::test]
async fn test_draw_echo(
	readings_table: DataTable<Row>,
	readings: VecSource<Row>,
	#[case] draw: &str,
	#[case] expected: i64,
) {
	let page = readings_table
		.respond(&readings, &params(&[("draw", draw)]))
		.await
		.unwrap();
	assert_eq!(page.draw, expected);
}

#[rstest]
#[tokio::test]
async fn test_missing_draw_is_zero(readings_table: DataTable<Row>, readings: VecSource<Row>) {
	let page = readings_table.respond(&readings, &params(&[])).await.unwrap();
	assert_eq!(page.draw, 0);
}

#[rstest]
#[tokio::test]
async fn test_empty_filtered_set_skips_fetch(readings_table: DataTable<Row>) {
	let source = CountingSource::new(vec![json!({"time": 1, "pressure": 2})]);
	let page = readings_table
		.respond(&source, &params(&[("search[value]", "nothing")]))
		.await
		.unwrap();

	assert_eq!(page.records_total, 1);
	assert_eq!(page.records_filtered, 0);
	assert!(page.data.is_empty());
	assert_eq!(source.fetch_calls(), 0);
}

#[rstest]
#[tokio::test]
async fn test_unfiltered_query_counts_once(readings_table: DataTable<Row>) {
	let source = CountingSource::new(vec![json!({"time": 1, "pressure": 2})]);
	readings_table.respond(&source, &params(&[])).await.unwrap();
	assert_eq!(source.count_calls(), 1);
	assert_eq!(source.fetch_calls(), 1);
}

#[rstest]
#[tokio::test]
async fn test_start_past_end_is_empty(readings_table: DataTable<Row>, readings: VecSource<Row>) {
	let page = readings_table
		.respond(&readings, &params(&[("start", "10")]))
		.await
		.unwrap();
	assert_eq!(page.records_filtered, 3);
	assert!(page.data.is_empty());
}

#[rstest]
#[tokio::test]
async fn test_length_all(readings_table: DataTable<Row>, readings: VecSource<Row>) {
	let page = readings_table
		.respond(&readings, &params(&[("start", "1"), ("length", "-1")]))
		.await
		.unwrap();
	assert_eq!(page.data.len(), 2);
}

#[rstest]
#[tokio::test]
async fn test_data_source_failure_aborts(readings_table: DataTable<Row>) {
	let result = readings_table.respond(&BrokenSource, &params(&[])).await;
	assert!(matches!(result, Err(TableError::DataSource(_))));
}

#[rstest]
#[tokio::test]
async fn test_struct_records_with_relations(users_table: DataTable<TestUser>, sample_users: Vec<TestUser>) {
	let source = VecSource::new(sample_users);
	let page = users_table
		.respond(
			&source,
			&params(&[("order[0][column]", "5"), ("order[0][dir]", "asc"), ("order[1][column]", "0")]),
		)
		.await
		.unwrap();

	// Bob has no manager and sorts first; ties on Grace keep id order
	let ids: Vec<&str> = page.data.iter().map(|row| row[0].as_str()).collect();
	assert_eq!(ids, vec!["2", "1", "4", "3"]);
	assert_eq!(page.data[0][4], "");
	assert_eq!(page.data[0][5], "");
	assert_eq!(page.data[1][4], "9.5");
	assert_eq!(page.data[1][5], "Grace");
}

#[rstest]
#[tokio::test]
async fn test_default_cells_escaped(users_table: DataTable<TestUser>, sample_users: Vec<TestUser>) {
	let source = VecSource::new(sample_users);
	let page = users_table
		.respond(&source, &params(&[("search[value]", "script")]))
		.await
		.unwrap();
	assert_eq!(page.records_filtered, 1);
	assert_eq!(page.data[0][1], "&lt;script&gt;");
}

#[rstest]
#[tokio::test]
async fn test_unsearchable_column_not_matched(users_table: DataTable<TestUser>, sample_users: Vec<TestUser>) {
	let source = VecSource::new(sample_users);
	let page = users_table
		.respond(&source, &params(&[("search[value]", "mallory")]))
		.await
		.unwrap();
	assert_eq!(page.records_filtered, 0);
}

#[rstest]
#[tokio::test]
async fn test_render_hook_output_verbatim(sample_users: Vec<TestUser>) {
	let table: DataTable<TestUser> = TableSpec::new("users")
		.fields(["name", "email"])
		.render_hook("email", |user: &TestUser, _| {
			format!("<a href=\"mailto:{0}\">{0}</a>", user.email)
		})
		.build()
		.unwrap();
	let source = VecSource::new(sample_users);
	let page = table
		.respond(&source, &params(&[("length", "1")]))
		.await
		.unwrap();
	assert_eq!(
		page.data[0][1],
		"<a href=\"mailto:alice@example.com\">alice@example.com</a>"
	);
}

#[rstest]
#[tokio::test]
async fn test_filter_hook_from_spec(sample_users: Vec<TestUser>) {
	let table: DataTable<TestUser> = TableSpec::new("users")
		.fields(["name", "active"])
		.filter("active", ChoiceFilter::new().choice("Yes", "yes").choice("No", "no"))
		.filter_hook("active", |selection, term| {
			let wanted = term == "yes";
			Ok(selection.filter(Predicate::custom(move |user: &TestUser| user.active == wanted)))
		})
		.build()
		.unwrap();
	let source = VecSource::new(sample_users);
	let page = table
		.respond(&source, &params(&[("columns[1][search][value]", "no")]))
		.await
		.unwrap();
	let names: Vec<&str> = page.data.iter().map(|row| row[0].as_str()).collect();
	assert_eq!(names, vec!["Bob", "&lt;script&gt;"]);
	assert_eq!(table.registry().filter_for(1).unwrap().choices().len(), 3);
}

#[rstest]
#[tokio::test]
async fn test_none_string_setting(sample_users: Vec<TestUser>) {
	let table: DataTable<TestUser> = TableSpec::new("users")
		.fields(["name", "score"])
		.settings(TableSettings::default().with_none_string("n/a"))
		.build()
		.unwrap();
	let source = VecSource::new(sample_users);
	let page = table.respond(&source, &params(&[])).await.unwrap();
	assert_eq!(page.data[1], vec!["Bob", "n/a"]);
}

#[rstest]
#[tokio::test]
async fn test_legacy_round_trip(readings_table: DataTable<Row>, readings: VecSource<Row>) {
	let request = params(&[
		("sEcho", "9"),
		("iDisplayStart", "0"),
		("iDisplayLength", "2"),
		("iSortingCols", "1"),
		("iSortCol_0", "0"),
		("sSortDir_0", "desc"),
	]);
	assert_eq!(readings_table.parse_query(&request).notation, Notation::Legacy);

	let body = readings_table.respond_json(&readings, &request).await.unwrap();
	let value: Row = serde_json::from_str(&body).unwrap();
	assert_eq!(
		value,
		json!({
			"sEcho": 9,
			"iTotalRecords": 3,
			"iTotalDisplayRecords": 3,
			"aaData": [["14", "73"], ["13", "63"]]
		})
	);
}

#[rstest]
#[tokio::test]
async fn test_modern_json_body(readings_table: DataTable<Row>, readings: VecSource<Row>) {
	let body = readings_table
		.respond_json(&readings, &params(&[("draw", "2"), ("length", "1")]))
		.await
		.unwrap();
	assert_eq!(
		body,
		r#"{"draw":2,"recordsTotal":3,"recordsFiltered":3,"data":[["12","53"]]}"#
	);
}

#[rstest]
#[tokio::test]
async fn test_checkbox_column_with_actions(readings: VecSource<Row>) {
	let table: DataTable<Row> = TableSpec::new("readings")
		.fields(["id", "time"])
		.action("delete", "Delete selected")
		.strings(TableStrings {
			checkbox_header: "Select".to_string(),
			..TableStrings::default()
		})
		.build()
		.unwrap();
	assert_eq!(table.selection_column(), Some(0));
	assert_eq!(table.columns()[0].header(), "Select");

	let source = VecSource::new(vec![json!({"id": 7, "time": 12})]);
	let page = table.respond(&source, &params(&[])).await.unwrap();
	assert_eq!(
		page.data[0],
		vec![
			"<input type=\"checkbox\" name=\"checkbox\" value=\"7\">",
			"7",
			"12"
		]
	);

	// Ordering on the selection column is ignored
	let ordered = table
		.respond(&readings, &params(&[("order[0][column]", "0"), ("order[0][dir]", "desc")]))
		.await
		.unwrap();
	assert_eq!(ordered.data[0][2], "12");
}

#[rstest]
fn test_column_declared_directly() {
	let table: DataTable<Row> = TableSpec::new("t")
		.column(Column::new("owner__name").unwrap().verbose_name("Owner").wrap(false))
		.field("title")
		.build()
		.unwrap();
	assert_eq!(table.columns()[0].header(), "Owner");
	assert!(!table.columns()[0].wraps());
	assert_eq!(table.registry().index_of("owner.name"), Some(0));
}

#[rstest]
fn test_duplicate_field_in_spec() {
	let result: reinhardt_tables::Result<DataTable<Row>> =
		TableSpec::new("t").fields(["a", "b", "a"]).build();
	assert!(matches!(result, Err(TableError::DuplicateField(f)) if f == "a"));
}

#[rstest]
fn test_two_filters_on_one_field() {
	let result: reinhardt_tables::Result<DataTable<Row>> = TableSpec::new("t")
		.fields(["a"])
		.filter("a", ChoiceFilter::new())
		.filter("a", ChoiceFilter::new())
		.build();
	assert!(matches!(result, Err(TableError::FilterAlreadyAttached(_))));
}
