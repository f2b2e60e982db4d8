//! Collaborators supplied by the host framework.
//!
//! Views never own these: data sources are shared between every view built over
//! them, and the log and module collaborators live in the registry's
//! [`crate::ViewContext`].

use std::fmt;

use arc_swap::ArcSwap;
use rustc_hash::FxHashSet;

use crate::row::Row;

/// Error type reported by a [`DataSource`].
pub type SourceError = Box<dyn std::error::Error + Send + Sync>;

/// Queryable row-oriented data.
pub trait DataSource: Send + Sync {
	/// Stable identity string; the root of every identifier built over this source.
	fn identity(&self) -> &str;

	/// Queries rows matching `filter`, projected onto `fields` when given.
	///
	/// `Ok(None)` means the source had no row collection to return.
	fn rows(&self, filter: Option<&str>, fields: Option<&[String]>) -> Result<Option<Vec<Row>>, SourceError>;

	/// Describes the source's field structure, one row per field.
	fn fields(&self, detailed: bool) -> Result<Option<Vec<Row>>, SourceError>;
}

impl fmt::Debug for dyn DataSource {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("DataSource").field("identity", &self.identity()).finish()
	}
}

/// Source of already materialized log rows.
pub trait LogSource: Send + Sync {
	fn logs(&self) -> Vec<Row>;
}

/// Membership test against the host's registered modules.
pub trait ModuleCatalog: Send + Sync {
	fn is_registered(&self, name: &str) -> bool;
}

/// Lock-free [`ModuleCatalog`] backed by an atomically swapped name set.
#[derive(Default)]
pub struct ModuleSet {
	names: ArcSwap<FxHashSet<String>>,
}

impl ModuleSet {
	pub fn new() -> Self {
		Self::default()
	}

	/// Creates a set pre-populated with `names`.
	pub fn with_modules<I, S>(names: I) -> Self
	where
		I: IntoIterator<Item = S>,
		S: Into<String>,
	{
		let set: FxHashSet<String> = names.into_iter().map(Into::into).collect();
		Self {
			names: ArcSwap::from_pointee(set),
		}
	}

	/// Marks `name` as registered. Returns false if it already was.
	pub fn register(&self, name: impl Into<String>) -> bool {
		let name = name.into();
		let mut inserted = false;
		self.names.rcu(|current| {
			let mut next = (**current).clone();
			inserted = next.insert(name.clone());
			next
		});
		inserted
	}

	/// Removes `name`. Returns false if it was not registered.
	pub fn unregister(&self, name: &str) -> bool {
		let mut removed = false;
		self.names.rcu(|current| {
			let mut next = (**current).clone();
			removed = next.remove(name);
			next
		});
		removed
	}

	/// Registered names, sorted.
	pub fn names(&self) -> Vec<String> {
		let mut names: Vec<String> = self.names.load().iter().cloned().collect();
		names.sort_unstable();
		names
	}
}

impl ModuleCatalog for ModuleSet {
	fn is_registered(&self, name: &str) -> bool {
		self.names.load().contains(name)
	}
}
