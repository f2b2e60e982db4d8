//! Row values and the shared row collection handle.

use std::fmt;
use std::sync::Arc;

use indexmap::IndexMap;
use parking_lot::{RwLock, RwLockReadGuard, RwLockWriteGuard};
use serde_json::Value;

/// One record: field name to value, in insertion order.
pub type Row = IndexMap<String, Value>;

/// Builds a [`Row`] from `(field, value)` pairs.
pub fn row<I, K, V>(pairs: I) -> Row
where
	I: IntoIterator<Item = (K, V)>,
	K: Into<String>,
	V: Into<Value>,
{
	pairs.into_iter().map(|(k, v)| (k.into(), v.into())).collect()
}

/// Reference-counted row collection.
///
/// Cloning the handle aliases the same storage: writes made through any clone
/// are visible through every other clone. Array views hold the caller's handle
/// directly, so a caller that keeps its clone keeps write access to the view's
/// rows.
#[derive(Clone, Default)]
pub struct SharedRows(Arc<RwLock<Vec<Row>>>);

impl SharedRows {
	pub fn new(rows: Vec<Row>) -> Self {
		Self(Arc::new(RwLock::new(rows)))
	}

	/// Shared read access.
	pub fn read(&self) -> RwLockReadGuard<'_, Vec<Row>> {
		self.0.read()
	}

	/// Exclusive write access.
	pub fn write(&self) -> RwLockWriteGuard<'_, Vec<Row>> {
		self.0.write()
	}

	pub fn len(&self) -> usize {
		self.0.read().len()
	}

	pub fn is_empty(&self) -> bool {
		self.len() == 0
	}

	/// Copies the current rows out of the handle.
	pub fn snapshot(&self) -> Vec<Row> {
		self.0.read().clone()
	}

	/// Returns true if both handles alias the same storage.
	pub fn ptr_eq(a: &Self, b: &Self) -> bool {
		Arc::ptr_eq(&a.0, &b.0)
	}
}

impl From<Vec<Row>> for SharedRows {
	fn from(rows: Vec<Row>) -> Self {
		Self::new(rows)
	}
}

impl fmt::Debug for SharedRows {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self.0.try_read() {
			Some(rows) => f.debug_tuple("SharedRows").field(&rows.len()).finish(),
			None => f.debug_tuple("SharedRows").field(&"<locked>").finish(),
		}
	}
}
