//! Process-level collaborators shared by every view a registry builds.

use std::fmt;
use std::sync::Arc;

use crate::collab::{LogSource, ModuleCatalog, ModuleSet};
use crate::config::RegistryConfig;
use crate::kinds::modules::ModuleDirectory;

/// Collaborators handed to validators and materializers.
///
/// Data sources travel with each request's options; everything here is fixed for
/// the lifetime of the owning [`crate::ViewRegistry`].
#[derive(Clone)]
pub struct ViewContext {
	logger: Option<Arc<dyn LogSource>>,
	modules: Arc<dyn ModuleCatalog>,
	module_dir: ModuleDirectory,
}

impl ViewContext {
	/// Context with no logger and an empty module catalog.
	pub fn new(module_dir: ModuleDirectory) -> Self {
		Self {
			logger: None,
			modules: Arc::new(ModuleSet::new()),
			module_dir,
		}
	}

	/// Context whose module directory and suffix come from `config`.
	pub fn from_config(config: &RegistryConfig) -> Self {
		Self::new(ModuleDirectory::new(&config.module_dir, &config.module_suffix))
	}

	pub fn with_logger(mut self, logger: Arc<dyn LogSource>) -> Self {
		self.logger = Some(logger);
		self
	}

	pub fn with_modules(mut self, modules: Arc<dyn ModuleCatalog>) -> Self {
		self.modules = modules;
		self
	}

	pub fn logger(&self) -> Option<&Arc<dyn LogSource>> {
		self.logger.as_ref()
	}

	pub fn modules(&self) -> &dyn ModuleCatalog {
		&*self.modules
	}

	pub fn module_dir(&self) -> &ModuleDirectory {
		&self.module_dir
	}
}

impl fmt::Debug for ViewContext {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("ViewContext")
			.field("logger", &self.logger.is_some())
			.field("module_dir", &self.module_dir)
			.finish_non_exhaustive()
	}
}
