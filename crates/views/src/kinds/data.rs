//! Query-backed views.

use crate::error::{MaterializeCause, ValidationError};
use crate::id::ViewId;
use crate::kinds::ViewKind;
use crate::options::{ValidatedOptions, ViewOptions};
use crate::row::SharedRows;

pub(crate) fn identifier(options: &ViewOptions) -> Option<ViewId> {
	let source = options.source.as_ref()?;
	Some(ViewId::for_data(source.identity(), options.fields.as_deref(), options.filter.as_deref()))
}

pub(crate) fn validate(options: ViewOptions) -> Result<ValidatedOptions, ValidationError> {
	let id = identifier(&options).ok_or(ValidationError::MissingOption {
		kind: ViewKind::Data,
		option: "source",
	})?;
	Ok(ValidatedOptions::new(id, options))
}

/// Queries the source with the view's filter and field subset.
///
/// An absent result and a source error both fail the view, with distinct causes.
pub(crate) fn materialize(validated: &ValidatedOptions) -> Result<SharedRows, MaterializeCause> {
	let options = &validated.options;
	let source = options.source.as_ref().ok_or(MaterializeCause::NoRows)?;
	match source.rows(options.filter.as_deref(), options.fields.as_deref()) {
		Ok(Some(rows)) => Ok(SharedRows::new(rows)),
		Ok(None) => Err(MaterializeCause::NoRows),
		Err(e) => Err(MaterializeCause::Source(e.to_string())),
	}
}
