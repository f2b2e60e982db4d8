//! The process-wide log view.

use crate::context::ViewContext;
use crate::error::ValidationError;
use crate::id::{LOGS_VIEW_ID, ViewId};
use crate::kinds::ViewKind;
use crate::options::{ValidatedOptions, ViewOptions};
use crate::row::SharedRows;

pub(crate) fn identifier() -> ViewId {
	ViewId::from(LOGS_VIEW_ID)
}

/// Requires a logger and seeds the rows from it here, not during materialization.
pub(crate) fn validate(options: ViewOptions, ctx: &ViewContext) -> Result<ValidatedOptions, ValidationError> {
	let logger = ctx.logger().ok_or(ValidationError::MissingCollaborator {
		kind: ViewKind::Logs,
		collaborator: "logger",
	})?;
	let rows = SharedRows::new(logger.logs());
	Ok(ValidatedOptions::new(identifier(), options).seeded(rows))
}

pub(crate) fn materialize(validated: &ValidatedOptions) -> SharedRows {
	validated.seeded.clone().unwrap_or_default()
}
