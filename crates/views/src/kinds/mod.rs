//! The closed set of view kinds.
//!
//! Each kind module supplies three pieces: a kind-stage validator, an identifier
//! builder, and a row materializer. [`ViewKind`] dispatches to them by tag; there is
//! no runtime type inspection and no open extension point.
//!
//! | Kind | Identifier | Rows |
//! |------|------------|------|
//! | [`ViewKind::Array`] | caller `id` | the caller's [`SharedRows`], aliased |
//! | [`ViewKind::Data`] | `identity(f1,f2) filter` | [`DataSource::rows`](crate::DataSource::rows) |
//! | [`ViewKind::Fields`] | `identity` | [`DataSource::fields`](crate::DataSource::fields) |
//! | [`ViewKind::Logs`] | [`LOGS_VIEW_ID`](crate::LOGS_VIEW_ID) | seeded from the logger during validation |
//! | [`ViewKind::Modules`] | [`MODULES_VIEW_ID`](crate::MODULES_VIEW_ID) | module directory listing |

use std::fmt;

use crate::context::ViewContext;
use crate::error::{MaterializeCause, ValidationError};
use crate::options::{ValidatedOptions, ViewOptions};
use crate::row::SharedRows;

pub(crate) mod array;
pub(crate) mod data;
pub(crate) mod fields;
pub(crate) mod logs;
pub mod modules;

/// Explicit kind tag chosen when options are built.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ViewKind {
	Array,
	Data,
	Fields,
	Logs,
	Modules,
}

impl ViewKind {
	pub const ALL: [ViewKind; 5] = [Self::Array, Self::Data, Self::Fields, Self::Logs, Self::Modules];

	pub fn as_str(self) -> &'static str {
		match self {
			Self::Array => "array",
			Self::Data => "data",
			Self::Fields => "fields",
			Self::Logs => "logs",
			Self::Modules => "modules",
		}
	}

	/// Kind stage of the validation chain. Runs after the base stage.
	pub(crate) fn validate(self, options: ViewOptions, ctx: &ViewContext) -> Result<ValidatedOptions, ValidationError> {
		match self {
			Self::Array => array::validate(options),
			Self::Data => data::validate(options),
			Self::Fields => fields::validate(options),
			Self::Logs => logs::validate(options, ctx),
			Self::Modules => modules::validate(options),
		}
	}

	/// Runs the one-shot row materializer for validated options.
	pub(crate) fn materialize(self, validated: &ValidatedOptions, ctx: &ViewContext) -> Result<SharedRows, MaterializeCause> {
		match self {
			Self::Array => array::materialize(validated),
			Self::Data => data::materialize(validated),
			Self::Fields => fields::materialize(validated),
			Self::Logs => Ok(logs::materialize(validated)),
			Self::Modules => Ok(modules::materialize(ctx)),
		}
	}
}

impl fmt::Display for ViewKind {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

#[cfg(test)]
mod tests;
