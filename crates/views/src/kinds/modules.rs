//! The process-wide module list view.
//!
//! Rows come from the configured module directory: each entry whose name ends in the
//! module suffix (compared case-insensitively) becomes `{id, inUse}`, where `id` is
//! the lowercased name without the suffix and `inUse` reports whether the host's
//! [`ModuleCatalog`](crate::ModuleCatalog) currently has it registered.
//!
//! Enumeration never fails the view. An unreadable directory is logged and yields
//! an empty row set.

use std::path::{Path, PathBuf};
use std::{fs, io};

use serde_json::Value;

use crate::context::ViewContext;
use crate::error::ValidationError;
use crate::id::{MODULES_VIEW_ID, ViewId};
use crate::options::{ValidatedOptions, ViewOptions};
use crate::row::{SharedRows, row};

/// Suffix used when none is configured.
pub const DEFAULT_MODULE_SUFFIX: &str = ".php";

/// A fixed directory of module files and the suffix that marks them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModuleDirectory {
	path: PathBuf,
	suffix: String,
}

impl ModuleDirectory {
	pub fn new(path: impl Into<PathBuf>, suffix: impl Into<String>) -> Self {
		Self {
			path: path.into(),
			suffix: suffix.into(),
		}
	}

	pub fn path(&self) -> &Path {
		&self.path
	}

	pub fn suffix(&self) -> &str {
		&self.suffix
	}

	/// Derives a module name from a directory entry name.
	///
	/// Returns `None` unless `file_name` ends with the suffix (ASCII case-insensitive)
	/// and has a non-empty stem.
	pub fn module_name(&self, file_name: &str) -> Option<String> {
		let split = file_name.len().checked_sub(self.suffix.len())?;
		if split == 0 || !file_name.is_char_boundary(split) {
			return None;
		}
		let (stem, tail) = file_name.split_at(split);
		tail.eq_ignore_ascii_case(&self.suffix).then(|| stem.to_ascii_lowercase())
	}

	/// Lists module names, sorted and deduplicated.
	///
	/// The directory handle lives only for the duration of this call and is closed on
	/// every return path, including an entry error partway through.
	pub fn module_names(&self) -> io::Result<Vec<String>> {
		let entries = fs::read_dir(&self.path)?;
		let mut names = Vec::new();
		for entry in entries {
			let file_name = entry?.file_name();
			let Some(file_name) = file_name.to_str() else {
				continue;
			};
			if let Some(name) = self.module_name(file_name) {
				names.push(name);
			}
		}
		names.sort_unstable();
		names.dedup();
		Ok(names)
	}
}

pub(crate) fn identifier() -> ViewId {
	ViewId::from(MODULES_VIEW_ID)
}

/// Drops any data source: the module list comes from the filesystem.
pub(crate) fn validate(mut options: ViewOptions) -> Result<ValidatedOptions, ValidationError> {
	options.source = None;
	Ok(ValidatedOptions::new(identifier(), options))
}

pub(crate) fn materialize(ctx: &ViewContext) -> SharedRows {
	let dir = ctx.module_dir();
	let names = match dir.module_names() {
		Ok(names) => names,
		Err(error) => {
			tracing::warn!(dir = %dir.path().display(), %error, "view.modules.unreadable");
			Vec::new()
		}
	};

	let catalog = ctx.modules();
	let rows = names
		.into_iter()
		.map(|name| {
			let in_use = catalog.is_registered(&name);
			row([("id", Value::from(name)), ("inUse", Value::Bool(in_use))])
		})
		.collect();
	SharedRows::new(rows)
}
