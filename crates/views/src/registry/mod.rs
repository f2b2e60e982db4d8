//! Identifier-keyed view registry.
//!
//! # Mental Model
//!
//! 1. **Validate:** options pass the base and kind stages and yield a canonical
//!    [`ViewId`]. Nothing in the registry changes if either stage fails.
//! 2. **Lookup:** a published view under that identifier is returned as-is.
//! 3. **Fill:** otherwise the first caller becomes the leader for the identifier,
//!    runs the kind's row materializer once, and publishes the finished view.
//!    Concurrent callers for the same identifier wait for the leader and receive
//!    the identical `Arc<View>`, or the leader's error.
//!
//! # Invariants
//!
//! - At most one published view per identifier for the registry's lifetime.
//!   - Enforced in: [`ViewRegistry::get_or_construct`] (leader election under the state lock).
//!   - Tested by: `registry::tests::concurrent_requests_fill_once`
//! - A view is visible only after its rows are filled.
//!   - Enforced in: `FillGuard::complete` (publish and in-flight removal under one lock).
//!   - Tested by: `registry::tests::failed_fill_publishes_nothing`
//! - A failed or abandoned fill leaves no trace; the next request starts over.
//!   - Enforced in: `FillGuard::complete`, `FillGuard::drop`.
//!   - Tested by: `registry::tests::abandoned_fill_wakes_waiters`
//!
//! # Lifecycle
//!
//! Views are never evicted. A registry embedded in a long-lived process should set
//! `max_views`; once reached, requests for new identifiers fail with
//! [`ViewError::CapacityExceeded`] while existing views stay reachable.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, OnceLock};
use std::time::{Duration, Instant};

use parking_lot::{Condvar, Mutex};
use rustc_hash::FxHashMap;
use tracing::{debug, info, warn};

use crate::config::RegistryConfig;
use crate::context::ViewContext;
use crate::error::{Result, ViewError};
use crate::id::ViewId;
use crate::options::{ValidatedOptions, ViewOptions};
use crate::view::View;

/// Default bound on waiting for another caller's fill.
pub const DEFAULT_WAIT_TIMEOUT: Duration = Duration::from_secs(30);

/// Published views plus the fills currently running, under one lock.
#[derive(Default)]
struct RegistryState {
	views: FxHashMap<ViewId, Arc<View>>,
	inflight: FxHashMap<ViewId, Arc<InFlightFill>>,
}

/// Result slot shared between a fill's leader and its waiters.
#[derive(Default)]
struct InFlightFill {
	result: Mutex<Option<Result<Arc<View>>>>,
	ready: Condvar,
	waiters: AtomicUsize,
}

impl InFlightFill {
	fn publish(&self, result: Result<Arc<View>>) {
		*self.result.lock() = Some(result);
		self.ready.notify_all();
	}
}

/// Get-or-construct cache of views keyed by [`ViewId`].
pub struct ViewRegistry {
	ctx: ViewContext,
	state: Mutex<RegistryState>,
	wait_timeout: Duration,
	max_views: Option<usize>,
}

impl ViewRegistry {
	/// Unbounded registry with the default wait timeout.
	pub fn new(ctx: ViewContext) -> Self {
		Self {
			ctx,
			state: Mutex::new(RegistryState::default()),
			wait_timeout: DEFAULT_WAIT_TIMEOUT,
			max_views: None,
		}
	}

	/// Registry with the wait timeout and capacity from `config`.
	pub fn with_config(ctx: ViewContext, config: &RegistryConfig) -> Self {
		Self::new(ctx).with_wait_timeout(config.wait_timeout()).with_max_views(config.max_views)
	}

	pub fn with_wait_timeout(mut self, timeout: Duration) -> Self {
		self.wait_timeout = timeout;
		self
	}

	pub fn with_max_views(mut self, max_views: Option<usize>) -> Self {
		self.max_views = max_views;
		self
	}

	pub fn context(&self) -> &ViewContext {
		&self.ctx
	}

	/// Returns the view for `options`, constructing and filling it on first request.
	///
	/// # Errors
	///
	/// - [`ViewError::Validation`] if either validation stage rejects the options.
	/// - [`ViewError::Materialize`] if the kind's row materializer fails.
	/// - [`ViewError::WaitTimeout`] if another caller's fill of the same identifier
	///   outlasts the wait timeout.
	/// - [`ViewError::Abandoned`] if that caller unwound before publishing.
	/// - [`ViewError::CapacityExceeded`] if the identifier is new and the registry is full.
	pub fn get_or_construct(&self, options: ViewOptions) -> Result<Arc<View>> {
		let kind = options.kind();
		let validated = options.validate(&self.ctx).inspect_err(|error| {
			warn!(%kind, %error, "view.validate.rejected");
		})?;
		let id = validated.id().clone();

		let (inflight, is_leader) = {
			let mut state = self.state.lock();
			if let Some(view) = state.views.get(&id) {
				if view.kind() != kind {
					warn!(view.id = %id, cached = %view.kind(), requested = %kind, "view.cache.kind_mismatch");
				}
				debug!(view.id = %id, "view.cache.hit");
				return Ok(Arc::clone(view));
			}
			if let Some(fill) = state.inflight.get(&id) {
				(Arc::clone(fill), false)
			} else {
				if let Some(capacity) = self.max_views
					&& state.views.len() + state.inflight.len() >= capacity
				{
					warn!(view.id = %id, capacity, "view.cache.full");
					return Err(ViewError::CapacityExceeded { id, capacity });
				}
				let fill = Arc::new(InFlightFill::default());
				state.inflight.insert(id.clone(), Arc::clone(&fill));
				(fill, true)
			}
		};

		if !is_leader {
			return self.wait_for(&id, &inflight);
		}

		let guard = FillGuard {
			state: &self.state,
			id,
			inflight,
			completed: false,
		};
		let result = self.fill(validated);
		let view = guard.complete(result)?;

		if let Some(callback) = view.view_callback() {
			callback(&view);
		}
		Ok(view)
	}

	/// Looks up a published view without constructing anything.
	pub fn get(&self, id: &str) -> Option<Arc<View>> {
		self.state.lock().views.get(id).cloned()
	}

	pub fn contains(&self, id: &str) -> bool {
		self.state.lock().views.contains_key(id)
	}

	/// Number of published views.
	pub fn len(&self) -> usize {
		self.state.lock().views.len()
	}

	pub fn is_empty(&self) -> bool {
		self.len() == 0
	}

	/// Identifiers of published views, sorted.
	pub fn ids(&self) -> Vec<ViewId> {
		let mut ids: Vec<ViewId> = self.state.lock().views.keys().cloned().collect();
		ids.sort_unstable();
		ids
	}

	/// Runs the row materializer and wraps the result in a view.
	fn fill(&self, validated: ValidatedOptions) -> Result<Arc<View>> {
		let kind = validated.kind();
		let start = Instant::now();
		debug!(view.id = %validated.id(), %kind, "view.fill.start");

		match kind.materialize(&validated, &self.ctx) {
			Ok(rows) => {
				info!(
					view.id = %validated.id(),
					%kind,
					rows = rows.len(),
					elapsed_ms = start.elapsed().as_millis() as u64,
					"view.fill.done"
				);
				Ok(Arc::new(View::new(validated, rows)))
			}
			Err(cause) => {
				warn!(view.id = %validated.id(), %kind, %cause, "view.fill.failed");
				Err(ViewError::Materialize {
					id: validated.id,
					cause,
				})
			}
		}
	}

	/// Blocks until the leader for `id` publishes, up to the wait timeout.
	fn wait_for(&self, id: &ViewId, inflight: &InFlightFill) -> Result<Arc<View>> {
		debug!(view.id = %id, "view.fill.wait");
		let start = Instant::now();
		let mut slot = inflight.result.lock();
		inflight.waiters.fetch_add(1, Ordering::SeqCst);
		inflight.ready.wait_while_for(&mut slot, |result| result.is_none(), self.wait_timeout);

		match slot.as_ref() {
			Some(result) => result.clone(),
			None => {
				let waited = start.elapsed();
				warn!(view.id = %id, waited_ms = waited.as_millis() as u64, "view.fill.wait_timeout");
				Err(ViewError::WaitTimeout { id: id.clone(), waited })
			}
		}
	}

	/// Callers currently blocked on the fill of `id`.
	#[cfg(test)]
	pub(crate) fn waiters(&self, id: &str) -> usize {
		self.state
			.lock()
			.inflight
			.get(id)
			.map_or(0, |fill| fill.waiters.load(Ordering::SeqCst))
	}
}

impl std::fmt::Debug for ViewRegistry {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		let state = self.state.lock();
		f.debug_struct("ViewRegistry")
			.field("views", &state.views.len())
			.field("inflight", &state.inflight.len())
			.field("wait_timeout", &self.wait_timeout)
			.field("max_views", &self.max_views)
			.finish()
	}
}

/// Leader-side handle on an in-flight fill.
///
/// Dropping it without [`FillGuard::complete`] (the materializer panicked) clears the
/// in-flight entry and wakes waiters with [`ViewError::Abandoned`], so the identifier
/// is never wedged.
struct FillGuard<'a> {
	state: &'a Mutex<RegistryState>,
	id: ViewId,
	inflight: Arc<InFlightFill>,
	completed: bool,
}

impl FillGuard<'_> {
	fn complete(mut self, result: Result<Arc<View>>) -> Result<Arc<View>> {
		self.completed = true;
		{
			let mut state = self.state.lock();
			if let Ok(view) = &result {
				state.views.insert(self.id.clone(), Arc::clone(view));
			}
			state.inflight.remove(&self.id);
		}
		self.inflight.publish(result.clone());
		result
	}
}

impl Drop for FillGuard<'_> {
	fn drop(&mut self) {
		if self.completed {
			return;
		}
		warn!(view.id = %self.id, "view.fill.abandoned");
		self.state.lock().inflight.remove(&self.id);
		self.inflight.publish(Err(ViewError::Abandoned { id: self.id.clone() }));
	}
}

static GLOBAL: OnceLock<ViewRegistry> = OnceLock::new();

/// Returns the process-wide registry, building it with `init` on first use.
pub fn global_or_init(init: impl FnOnce() -> ViewRegistry) -> &'static ViewRegistry {
	GLOBAL.get_or_init(init)
}

/// The process-wide registry, if [`global_or_init`] has run.
pub fn global() -> Option<&'static ViewRegistry> {
	GLOBAL.get()
}
