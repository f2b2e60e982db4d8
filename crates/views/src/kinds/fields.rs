//! Views over a data source's field structure.

use crate::error::{MaterializeCause, ValidationError};
use crate::id::ViewId;
use crate::kinds::ViewKind;
use crate::options::{ValidatedOptions, ViewOptions};
use crate::row::SharedRows;

/// The source identity alone. Filter and field subset do not participate, so every
/// fields request against one source resolves to the same view.
pub(crate) fn identifier(options: &ViewOptions) -> Option<ViewId> {
	options.source.as_ref().map(|source| ViewId::from(source.identity()))
}

pub(crate) fn validate(options: ViewOptions) -> Result<ValidatedOptions, ValidationError> {
	let id = identifier(&options).ok_or(ValidationError::MissingOption {
		kind: ViewKind::Fields,
		option: "source",
	})?;
	Ok(ValidatedOptions::new(id, options))
}

pub(crate) fn materialize(validated: &ValidatedOptions) -> Result<SharedRows, MaterializeCause> {
	let source = validated.options.source.as_ref().ok_or(MaterializeCause::NoRows)?;
	match source.fields(true) {
		Ok(Some(rows)) => Ok(SharedRows::new(rows)),
		Ok(None) => Err(MaterializeCause::NoRows),
		Err(e) => Err(MaterializeCause::Source(e.to_string())),
	}
}
