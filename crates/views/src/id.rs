//! Canonical view identifiers.

use std::borrow::Borrow;
use std::fmt;
use std::sync::Arc;

/// Identifier of the process-wide log view.
pub const LOGS_VIEW_ID: &str = "@logs";

/// Identifier of the process-wide module list view.
pub const MODULES_VIEW_ID: &str = "@modules";

/// Canonical cache key derived from view options.
///
/// Immutable once built; cheap to clone.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ViewId(Arc<str>);

impl ViewId {
	pub fn new(id: impl Into<Arc<str>>) -> Self {
		Self(id.into())
	}

	pub fn as_str(&self) -> &str {
		&self.0
	}

	/// Composes a data view identifier.
	///
	/// `identity`, then `(f1,f2,...)` when a field subset is present, then a space and
	/// the filter text when a filter is present. The filter is appended verbatim, so a
	/// filter containing `(` or a leading space can produce the same key as a different
	/// option combination.
	pub fn for_data(identity: &str, fields: Option<&[String]>, filter: Option<&str>) -> Self {
		let mut id = String::from(identity);
		if let Some(fields) = fields {
			id.push('(');
			id.push_str(&fields.join(","));
			id.push(')');
		}
		if let Some(filter) = filter {
			id.push(' ');
			id.push_str(filter);
		}
		Self::new(id)
	}
}

impl fmt::Display for ViewId {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(&self.0)
	}
}

impl fmt::Debug for ViewId {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "ViewId({:?})", &*self.0)
	}
}

impl Borrow<str> for ViewId {
	fn borrow(&self) -> &str {
		&self.0
	}
}

impl AsRef<str> for ViewId {
	fn as_ref(&self) -> &str {
		&self.0
	}
}

impl From<&str> for ViewId {
	fn from(id: &str) -> Self {
		Self::new(id)
	}
}

impl From<String> for ViewId {
	fn from(id: String) -> Self {
		Self::new(id)
	}
}
