//! View construction options and the two-stage validation chain.
//!
//! [`ViewOptions`] is a builder tagged with a [`ViewKind`]. Validation runs the base
//! stage (shape checks shared by every kind) and then delegates to the kind stage,
//! producing a [`ValidatedOptions`] record that carries the canonical identifier.
//! Both stages must pass; a failure leaves the registry untouched.

use std::fmt;
use std::sync::Arc;

use crate::collab::DataSource;
use crate::context::ViewContext;
use crate::error::ValidationError;
use crate::id::ViewId;
use crate::kinds::ViewKind;
use crate::row::{Row, SharedRows};
use crate::view::View;

/// Transforms a row for presentation. Applied by [`View::render_rows`].
pub type RowCallback = Arc<dyn Fn(&Row) -> Row + Send + Sync>;

/// Called once with the freshly published view.
pub type ViewCallback = Arc<dyn Fn(&View) + Send + Sync>;

/// Construction options for one view.
#[derive(Clone)]
pub struct ViewOptions {
	pub(crate) kind: ViewKind,
	pub(crate) id: Option<String>,
	pub(crate) rows: Option<SharedRows>,
	pub(crate) source: Option<Arc<dyn DataSource>>,
	pub(crate) filter: Option<String>,
	pub(crate) fields: Option<Vec<String>>,
	pub(crate) summary: Option<Vec<String>>,
	pub(crate) row_callback: Option<RowCallback>,
	pub(crate) view_callback: Option<ViewCallback>,
}

impl ViewOptions {
	/// Empty options for `kind`.
	pub fn new(kind: ViewKind) -> Self {
		Self {
			kind,
			id: None,
			rows: None,
			source: None,
			filter: None,
			fields: None,
			summary: None,
			row_callback: None,
			view_callback: None,
		}
	}

	/// Array view over caller-owned rows, identified by `id`.
	pub fn array(id: impl Into<String>, rows: SharedRows) -> Self {
		Self::new(ViewKind::Array).id(id).rows(rows)
	}

	/// Query-backed view over `source`.
	pub fn data(source: Arc<dyn DataSource>) -> Self {
		Self::new(ViewKind::Data).source(source)
	}

	/// Field-structure view over `source`.
	pub fn fields_of(source: Arc<dyn DataSource>) -> Self {
		Self::new(ViewKind::Fields).source(source)
	}

	pub fn logs() -> Self {
		Self::new(ViewKind::Logs)
	}

	pub fn modules() -> Self {
		Self::new(ViewKind::Modules)
	}

	pub fn id(mut self, id: impl Into<String>) -> Self {
		self.id = Some(id.into());
		self
	}

	pub fn rows(mut self, rows: SharedRows) -> Self {
		self.rows = Some(rows);
		self
	}

	pub fn source(mut self, source: Arc<dyn DataSource>) -> Self {
		self.source = Some(source);
		self
	}

	pub fn filter(mut self, filter: impl Into<String>) -> Self {
		self.filter = Some(filter.into());
		self
	}

	/// Restricts the view to a subset of fields, in the given order.
	pub fn fields<I, S>(mut self, fields: I) -> Self
	where
		I: IntoIterator<Item = S>,
		S: Into<String>,
	{
		self.fields = Some(fields.into_iter().map(Into::into).collect());
		self
	}

	/// Numeric fields totalled by [`View::summary_row`].
	pub fn summary<I, S>(mut self, fields: I) -> Self
	where
		I: IntoIterator<Item = S>,
		S: Into<String>,
	{
		self.summary = Some(fields.into_iter().map(Into::into).collect());
		self
	}

	pub fn row_callback(mut self, callback: impl Fn(&Row) -> Row + Send + Sync + 'static) -> Self {
		self.row_callback = Some(Arc::new(callback));
		self
	}

	pub fn view_callback(mut self, callback: impl Fn(&View) + Send + Sync + 'static) -> Self {
		self.view_callback = Some(Arc::new(callback));
		self
	}

	pub fn kind(&self) -> ViewKind {
		self.kind
	}

	/// Runs the full validation chain.
	pub fn validate(self, ctx: &ViewContext) -> Result<ValidatedOptions, ValidationError> {
		let kind = self.kind;
		let options = self.validate_base()?;
		kind.validate(options, ctx)
	}

	/// Base stage: shape checks every kind shares.
	///
	/// Empty filters and empty field subsets are normalized to absent so they never
	/// contribute an identifier suffix.
	fn validate_base(mut self) -> Result<Self, ValidationError> {
		if let Some(id) = &self.id
			&& id.trim().is_empty()
		{
			return Err(ValidationError::InvalidOption {
				option: "id",
				reason: "must not be empty".into(),
			});
		}

		if self.filter.as_deref().is_some_and(str::is_empty) {
			self.filter = None;
		}

		if self.fields.as_ref().is_some_and(Vec::is_empty) {
			self.fields = None;
		}
		if let Some(fields) = &self.fields {
			check_names("fields", fields)?;
		}
		if let Some(summary) = &self.summary {
			check_names("summary", summary)?;
		}

		Ok(self)
	}
}

fn check_names(option: &'static str, names: &[String]) -> Result<(), ValidationError> {
	if names.iter().any(|name| name.trim().is_empty()) {
		return Err(ValidationError::InvalidOption {
			option,
			reason: "field names must not be empty".into(),
		});
	}
	Ok(())
}

impl fmt::Debug for ViewOptions {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("ViewOptions")
			.field("kind", &self.kind)
			.field("id", &self.id)
			.field("rows", &self.rows)
			.field("source", &self.source.as_ref().map(|s| s.identity().to_owned()))
			.field("filter", &self.filter)
			.field("fields", &self.fields)
			.field("summary", &self.summary)
			.field("row_callback", &self.row_callback.is_some())
			.field("view_callback", &self.view_callback.is_some())
			.finish()
	}
}

/// Options that passed both validation stages.
///
/// Carries the canonical identifier and, for log views, the rows seeded during
/// validation.
#[derive(Debug, Clone)]
pub struct ValidatedOptions {
	pub(crate) id: ViewId,
	pub(crate) options: ViewOptions,
	pub(crate) seeded: Option<SharedRows>,
}

impl ValidatedOptions {
	pub(crate) fn new(id: ViewId, options: ViewOptions) -> Self {
		Self {
			id,
			options,
			seeded: None,
		}
	}

	pub(crate) fn seeded(mut self, rows: SharedRows) -> Self {
		self.seeded = Some(rows);
		self
	}

	pub fn id(&self) -> &ViewId {
		&self.id
	}

	pub fn kind(&self) -> ViewKind {
		self.options.kind
	}

	/// The options left after validation. Array views no longer carry `id`; module
	/// views no longer carry a data source.
	pub fn options(&self) -> &ViewOptions {
		&self.options
	}

	/// True once rows are attached without a separate materialization step.
	pub fn is_seeded(&self) -> bool {
		self.seeded.is_some()
	}
}
