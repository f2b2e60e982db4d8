//! Error types for view validation and construction.

use std::time::Duration;

use thiserror::Error;

use crate::id::ViewId;
use crate::kinds::ViewKind;

/// Options rejected before any registry work.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
	/// A required option was not supplied.
	#[error("{kind} view requires option `{option}`")]
	MissingOption { kind: ViewKind, option: &'static str },

	/// An option was supplied with an unusable value.
	#[error("option `{option}` is invalid: {reason}")]
	InvalidOption { option: &'static str, reason: String },

	/// A collaborator the kind depends on is not available.
	#[error("{kind} view requires a {collaborator} collaborator")]
	MissingCollaborator { kind: ViewKind, collaborator: &'static str },
}

/// Why a row materializer produced nothing.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MaterializeCause {
	/// The source answered without a row collection.
	#[error("source returned no rows")]
	NoRows,

	/// The source reported an error.
	#[error("source error: {0}")]
	Source(String),

	/// An array view was built without a row collection.
	#[error("no row collection supplied")]
	MissingRows,
}

/// Failure returned by [`crate::ViewRegistry::get_or_construct`].
///
/// Cloneable so a single construction failure can be handed to every caller
/// that was waiting on the same identifier.
#[derive(Debug, Clone, Error)]
pub enum ViewError {
	#[error(transparent)]
	Validation(#[from] ValidationError),

	/// The row materializer failed; nothing was published.
	#[error("failed to materialize view {id}: {cause}")]
	Materialize { id: ViewId, cause: MaterializeCause },

	/// Another caller is filling this identifier and did not finish in time.
	#[error("timed out after {waited:?} waiting for view {id}")]
	WaitTimeout { id: ViewId, waited: Duration },

	/// The caller filling this identifier unwound before publishing.
	#[error("construction of view {id} was abandoned")]
	Abandoned { id: ViewId },

	/// The registry holds its configured maximum number of views.
	#[error("view registry is full ({capacity} views); refusing {id}")]
	CapacityExceeded { id: ViewId, capacity: usize },
}

/// Result type for view operations.
pub type Result<T> = std::result::Result<T, ViewError>;
