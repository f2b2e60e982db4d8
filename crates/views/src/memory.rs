//! In-memory [`DataSource`].

use serde_json::Value;

use crate::collab::{DataSource, SourceError};
use crate::row::{Row, row};

/// Column description reported by [`MemorySource::fields`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Column {
	pub name: String,
	pub ty: String,
	pub label: Option<String>,
	pub nullable: bool,
}

impl Column {
	pub fn new(name: impl Into<String>, ty: impl Into<String>) -> Self {
		Self {
			name: name.into(),
			ty: ty.into(),
			label: None,
			nullable: false,
		}
	}

	pub fn label(mut self, label: impl Into<String>) -> Self {
		self.label = Some(label.into());
		self
	}

	pub fn nullable(mut self, nullable: bool) -> Self {
		self.nullable = nullable;
		self
	}

	fn describe(&self, detailed: bool) -> Row {
		let mut out = row([("name", self.name.as_str()), ("type", self.ty.as_str())]);
		if detailed {
			let label = self.label.as_deref().unwrap_or(&self.name);
			out.insert("label".into(), Value::from(label));
			out.insert("nullable".into(), Value::from(self.nullable));
		}
		out
	}
}

/// Fixed rows queried with `field=value` clauses joined by `&`.
///
/// A clause matches when the row's value, rendered as text (strings unquoted),
/// equals the clause value. Projection keeps the requested fields in request
/// order; naming an unknown column is an error.
#[derive(Debug, Clone)]
pub struct MemorySource {
	identity: String,
	columns: Vec<Column>,
	rows: Vec<Row>,
}

impl MemorySource {
	pub fn new(identity: impl Into<String>, columns: Vec<Column>, rows: Vec<Row>) -> Self {
		Self {
			identity: identity.into(),
			columns,
			rows,
		}
	}

	fn has_column(&self, name: &str) -> bool {
		self.columns.iter().any(|c| c.name == name)
	}
}

impl DataSource for MemorySource {
	fn identity(&self) -> &str {
		&self.identity
	}

	fn rows(&self, filter: Option<&str>, fields: Option<&[String]>) -> Result<Option<Vec<Row>>, SourceError> {
		let clauses = filter.map(parse_filter).transpose()?.unwrap_or_default();
		for (field, _) in &clauses {
			if !self.has_column(field) {
				return Err(format!("unknown filter field `{field}` in {}", self.identity).into());
			}
		}
		if let Some(unknown) = fields.into_iter().flatten().find(|f| !self.has_column(f)) {
			return Err(format!("unknown field `{unknown}` in {}", self.identity).into());
		}

		let rows = self
			.rows
			.iter()
			.filter(|row| clauses.iter().all(|(field, value)| row.get(*field).is_some_and(|v| text(v) == *value)))
			.map(|row| match fields {
				Some(fields) => fields
					.iter()
					.map(|f| (f.clone(), row.get(f).cloned().unwrap_or(Value::Null)))
					.collect(),
				None => row.clone(),
			})
			.collect();
		Ok(Some(rows))
	}

	/// One row per column; `None` when the source declares no columns.
	fn fields(&self, detailed: bool) -> Result<Option<Vec<Row>>, SourceError> {
		if self.columns.is_empty() {
			return Ok(None);
		}
		Ok(Some(self.columns.iter().map(|c| c.describe(detailed)).collect()))
	}
}

fn parse_filter(filter: &str) -> Result<Vec<(&str, &str)>, SourceError> {
	filter
		.split('&')
		.map(str::trim)
		.filter(|clause| !clause.is_empty())
		.map(|clause| {
			clause
				.split_once('=')
				.map(|(field, value)| (field.trim(), value.trim()))
				.ok_or_else(|| SourceError::from(format!("malformed filter clause `{clause}`")))
		})
		.collect()
}

fn text(value: &Value) -> String {
	match value {
		Value::String(s) => s.clone(),
		other => other.to_string(),
	}
}
