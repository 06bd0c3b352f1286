//! Export of filtered table data
//!
//! Exports run the same search and ordering as a page request but ignore the
//! page window, so they cover the whole filtered selection. Cells are
//! rendered without HTML escaping. The row selection column is left out.

use crate::engine::FilterSortEngine;
use crate::error::{Result, TableError};
use crate::query::Query;
use crate::record::Record;
use crate::render::CellRenderer;
use crate::source::DataSource;
use crate::table::DataTable;

impl<R: Record + 'static> DataTable<R> {
	/// Headers and rendered rows of the whole filtered selection
	async fn export_rows<S>(&self, source: &S, query: &Query) -> Result<(Vec<usize>, Vec<Vec<String>>)>
	where
		S: DataSource<R> + ?Sized,
	{
		let engine = FilterSortEngine::new(self.registry(), self.settings().search_mode);
		let records = engine.apply_unpaged(source, query).await?;
		let renderer = CellRenderer::plain(self.settings());
		let indices: Vec<usize> = (0..self.columns().len())
			.filter(|index| Some(*index) != self.selection_column())
			.collect();
		let rows = records
			.iter()
			.map(|record| {
				indices
					.iter()
					.map(|&index| renderer.render(record, &self.columns()[index]))
					.collect()
			})
			.collect();
		Ok((indices, rows))
	}

	/// Exports the filtered, ordered rows as CSV with a header line
	///
	/// # Examples
	///
	/// ```
	/// use reinhardt_tables::query::Query;
	/// use reinhardt_tables::source::VecSource;
	/// use reinhardt_tables::{DataTable, TableSpec};
	/// use serde_json::{json, Value as Row};
	///
	/// # async fn example() {
	/// let table: DataTable<Row> = TableSpec::new("readings")
	///     .fields(["time", "note"])
	///     .build()
	///     .unwrap();
	/// let source = VecSource::new(vec![json!({"time": 12, "note": "a, b"})]);
	///
	/// let csv = table.export_csv(&source, &Query::default()).await.unwrap();
	/// assert_eq!(csv, "Time,Note\n12,\"a, b\"\n");
	/// # }
	/// ```
	pub async fn export_csv<S>(&self, source: &S, query: &Query) -> Result<String>
	where
		S: DataSource<R> + ?Sized,
	{
		let (indices, rows) = self.export_rows(source, query).await?;
		let mut writer = csv::Writer::from_writer(Vec::new());
		let headers: Vec<&str> = indices
			.iter()
			.map(|&index| self.columns()[index].header())
			.collect();
		writer
			.write_record(&headers)
			.map_err(|e| TableError::Export(e.to_string()))?;
		for row in &rows {
			writer
				.write_record(row)
				.map_err(|e| TableError::Export(e.to_string()))?;
		}
		let bytes = writer
			.into_inner()
			.map_err(|e| TableError::Export(e.to_string()))?;
		String::from_utf8(bytes).map_err(|e| TableError::Export(e.to_string()))
	}

	/// Exports the filtered, ordered rows as a JSON array of objects keyed
	/// by field
	pub async fn export_json<S>(&self, source: &S, query: &Query) -> Result<String>
	where
		S: DataSource<R> + ?Sized,
	{
		let (indices, rows) = self.export_rows(source, query).await?;
		let objects: Vec<serde_json::Map<String, serde_json::Value>> = rows
			.into_iter()
			.map(|row| {
				indices
					.iter()
					.zip(row)
					.map(|(&index, cell)| {
						(
							self.columns()[index].name().to_string(),
							serde_json::Value::String(cell),
						)
					})
					.collect()
			})
			.collect();
		Ok(serde_json::to_string(&objects)?)
	}
}

#[cfg(test)]
mod tests {
	use crate::query::{OrderDirection, OrderSpec, Query};
	use crate::source::VecSource;
	use crate::table::{DataTable, TableSpec};
	use rstest::{fixture, rstest};
	use serde_json::{Value as Row, json};

	#[fixture]
	fn table() -> DataTable<Row> {
		TableSpec::new("people")
			.fields(["id", "name"])
			.action("delete", "Delete")
			.build()
			.unwrap()
	}

	#[fixture]
	fn source() -> VecSource<Row> {
		VecSource::new(vec![
			json!({"id": 1, "name": "<Ann>"}),
			json!({"id": 2, "name": "Ben"}),
			json!({"id": 3, "name": "Cy"}),
		])
	}

	fn ordered_desc() -> Query {
		let mut query = Query::default();
		query.start = 1;
		query.order = vec![OrderSpec {
			column: 1,
			direction: OrderDirection::Desc,
		}];
		query
	}

	#[rstest]
	#[tokio::test]
	async fn test_csv_ignores_paging_and_selection_column(table: DataTable<Row>, source: VecSource<Row>) {
		let csv = table.export_csv(&source, &ordered_desc()).await.unwrap();
		assert_eq!(csv, "Id,Name\n3,Cy\n2,Ben\n1,<Ann>\n");
	}

	#[rstest]
	#[tokio::test]
	async fn test_json_keyed_by_field(table: DataTable<Row>, source: VecSource<Row>) {
		let mut query = Query::default();
		query.global_search = Some("ben".into());
		let body = table.export_json(&source, &query).await.unwrap();
		let value: Row = serde_json::from_str(&body).unwrap();
		assert_eq!(value, json!([{"id": "2", "name": "Ben"}]));
	}
}
