//! Published views.

use std::fmt;
use std::sync::Arc;

use serde_json::{Number, Value};

use crate::collab::DataSource;
use crate::id::ViewId;
use crate::kinds::ViewKind;
use crate::options::{RowCallback, ValidatedOptions, ViewCallback, ViewOptions};
use crate::row::{Row, SharedRows};

/// An identifier-keyed projection of row data.
///
/// A `View` only exists with its rows attached: the registry materializes first and
/// builds the view from the result, so no caller can observe an unfilled instance.
pub struct View {
	id: ViewId,
	rows: SharedRows,
	options: ViewOptions,
}

impl View {
	pub(crate) fn new(validated: ValidatedOptions, rows: SharedRows) -> Self {
		Self {
			id: validated.id,
			rows,
			options: validated.options,
		}
	}

	pub fn id(&self) -> &ViewId {
		&self.id
	}

	pub fn kind(&self) -> ViewKind {
		self.options.kind
	}

	/// The view's row handle. For array views this aliases the caller's collection.
	pub fn rows(&self) -> &SharedRows {
		&self.rows
	}

	pub fn len(&self) -> usize {
		self.rows.len()
	}

	pub fn is_empty(&self) -> bool {
		self.rows.is_empty()
	}

	pub fn source(&self) -> Option<&Arc<dyn DataSource>> {
		self.options.source.as_ref()
	}

	pub fn filter(&self) -> Option<&str> {
		self.options.filter.as_deref()
	}

	pub fn fields(&self) -> Option<&[String]> {
		self.options.fields.as_deref()
	}

	pub fn summary(&self) -> Option<&[String]> {
		self.options.summary.as_deref()
	}

	pub fn row_callback(&self) -> Option<&RowCallback> {
		self.options.row_callback.as_ref()
	}

	pub(crate) fn view_callback(&self) -> Option<&ViewCallback> {
		self.options.view_callback.as_ref()
	}

	/// Snapshot of the rows, passed through the row callback when one was given.
	pub fn render_rows(&self) -> Vec<Row> {
		let rows = self.rows.read();
		match &self.options.row_callback {
			Some(callback) => rows.iter().map(|row| callback(row)).collect(),
			None => rows.clone(),
		}
	}

	/// Totals the summary fields across all rows.
	///
	/// Non-numeric and missing values are skipped. Totals stay integral while every
	/// contributing value is an integer.
	pub fn summary_row(&self) -> Option<Row> {
		let summary = self.options.summary.as_ref()?;
		let rows = self.rows.read();
		let totals = summary
			.iter()
			.map(|field| {
				let values = rows.iter().filter_map(|row| row.get(field));
				(field.clone(), total(values))
			})
			.collect();
		Some(totals)
	}
}

fn total<'a>(values: impl Iterator<Item = &'a Value>) -> Value {
	let mut int_total: i64 = 0;
	let mut float_total = 0.0_f64;
	let mut integral = true;

	for value in values {
		let Value::Number(n) = value else {
			continue;
		};
		match n.as_i64() {
			Some(i) if integral => match int_total.checked_add(i) {
				Some(sum) => int_total = sum,
				None => {
					integral = false;
					float_total = int_total as f64 + i as f64;
				}
			},
			_ => {
				if integral {
					integral = false;
					float_total = int_total as f64;
				}
				float_total += n.as_f64().unwrap_or(0.0);
			}
		}
	}

	if integral {
		Value::from(int_total)
	} else {
		Number::from_f64(float_total).map_or(Value::Null, Value::Number)
	}
}

impl fmt::Debug for View {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("View")
			.field("id", &self.id)
			.field("kind", &self.options.kind)
			.field("rows", &self.rows)
			.finish_non_exhaustive()
	}
}
