//! Views over caller-supplied rows.

use crate::error::{MaterializeCause, ValidationError};
use crate::id::ViewId;
use crate::kinds::ViewKind;
use crate::options::{ValidatedOptions, ViewOptions};
use crate::row::SharedRows;

/// The caller's `id`, verbatim. Uniqueness across array views is the caller's concern.
pub(crate) fn identifier(options: &ViewOptions) -> Option<ViewId> {
	options.id.as_deref().map(ViewId::from)
}

pub(crate) fn validate(mut options: ViewOptions) -> Result<ValidatedOptions, ValidationError> {
	// The identifier must be taken before `id` is stripped from the options.
	let id = identifier(&options).ok_or(ValidationError::MissingOption {
		kind: ViewKind::Array,
		option: "id",
	})?;
	options.id = None;
	Ok(ValidatedOptions::new(id, options))
}

/// Aliases the caller's handle; no copy is made.
pub(crate) fn materialize(validated: &ValidatedOptions) -> Result<SharedRows, MaterializeCause> {
	validated.options.rows.clone().ok_or(MaterializeCause::MissingRows)
}
