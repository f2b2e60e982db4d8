//! Bounded in-memory log buffer.
//!
//! [`LogBuffer`] is a [`tracing_subscriber::Layer`]: install it next to the host's
//! other layers and every event becomes a row `{time, level, target, message, ...}`.
//! It is also the [`LogSource`] behind the log view.

use std::collections::VecDeque;
use std::fmt;
use std::sync::Arc;

use parking_lot::Mutex;
use serde_json::Value;
use tracing::field::{Field, Visit};
use tracing::{Event, Subscriber};
use tracing_subscriber::layer::{Context, Layer};

use crate::collab::LogSource;
use crate::row::Row;

/// Ring buffer of log rows. Clones share storage.
#[derive(Clone)]
pub struct LogBuffer {
	rows: Arc<Mutex<VecDeque<Row>>>,
	capacity: usize,
}

impl LogBuffer {
	/// Buffer keeping the newest `capacity` rows (at least one).
	pub fn with_capacity(capacity: usize) -> Self {
		let capacity = capacity.max(1);
		Self {
			rows: Arc::new(Mutex::new(VecDeque::with_capacity(capacity))),
			capacity,
		}
	}

	pub fn capacity(&self) -> usize {
		self.capacity
	}

	/// Appends a row, dropping the oldest when full.
	pub fn push(&self, row: Row) {
		let mut rows = self.rows.lock();
		if rows.len() == self.capacity {
			rows.pop_front();
		}
		rows.push_back(row);
	}

	pub fn len(&self) -> usize {
		self.rows.lock().len()
	}

	pub fn is_empty(&self) -> bool {
		self.len() == 0
	}

	pub fn clear(&self) {
		self.rows.lock().clear();
	}
}

impl LogSource for LogBuffer {
	fn logs(&self) -> Vec<Row> {
		self.rows.lock().iter().cloned().collect()
	}
}

impl fmt::Debug for LogBuffer {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("LogBuffer")
			.field("len", &self.len())
			.field("capacity", &self.capacity)
			.finish()
	}
}

impl<S: Subscriber> Layer<S> for LogBuffer {
	fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
		let meta = event.metadata();
		let mut row = Row::new();
		row.insert("time".into(), Value::from(chrono::Utc::now().to_rfc3339()));
		row.insert("level".into(), Value::from(meta.level().as_str()));
		row.insert("target".into(), Value::from(meta.target()));
		row.insert("message".into(), Value::from(""));
		event.record(&mut RowVisitor(&mut row));
		self.push(row);
	}
}

struct RowVisitor<'a>(&'a mut Row);

impl Visit for RowVisitor<'_> {
	fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
		self.0.insert(field.name().to_string(), Value::from(format!("{value:?}")));
	}

	fn record_str(&mut self, field: &Field, value: &str) {
		self.0.insert(field.name().to_string(), Value::from(value));
	}

	fn record_i64(&mut self, field: &Field, value: i64) {
		self.0.insert(field.name().to_string(), Value::from(value));
	}

	fn record_u64(&mut self, field: &Field, value: u64) {
		self.0.insert(field.name().to_string(), Value::from(value));
	}

	fn record_bool(&mut self, field: &Field, value: bool) {
		self.0.insert(field.name().to_string(), Value::from(value));
	}

	fn record_f64(&mut self, field: &Field, value: f64) {
		self.0.insert(field.name().to_string(), Value::from(value));
	}
}
