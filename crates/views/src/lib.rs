//! Identifier-keyed registry of lazily populated row views.
//!
//! A caller describes a view with [`ViewOptions`]; the [`ViewRegistry`] validates
//! the options, derives a canonical [`ViewId`], and returns the single shared
//! [`View`] for that identifier, materializing its rows on first request.
//!
//! # View Kinds
//!
//! - [`ViewKind::Array`] - caller-owned rows, aliased rather than copied
//! - [`ViewKind::Data`] - rows queried from a [`DataSource`]
//! - [`ViewKind::Fields`] - a data source's field structure
//! - [`ViewKind::Logs`] - rows from the process log buffer
//! - [`ViewKind::Modules`] - module files found in the configured directory
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//!
//! use strata_views::{Column, MemorySource, ModuleDirectory, ViewContext, ViewOptions, ViewRegistry, row};
//!
//! let registry = ViewRegistry::new(ViewContext::new(ModuleDirectory::new("modules", ".php")));
//! let users = Arc::new(MemorySource::new(
//! 	"users",
//! 	vec![Column::new("name", "string"), Column::new("active", "int")],
//! 	vec![row([("name", serde_json::json!("ada")), ("active", serde_json::json!(1))])],
//! ));
//!
//! let view = registry.get_or_construct(ViewOptions::data(users.clone()).fields(["name"]).filter("active=1"))?;
//! assert_eq!(view.id().as_str(), "users(name) active=1");
//! assert_eq!(view.len(), 1);
//!
//! let again = registry.get_or_construct(ViewOptions::data(users).fields(["name"]).filter("active=1"))?;
//! assert!(Arc::ptr_eq(&view, &again));
//! # Ok::<(), strata_views::ViewError>(())
//! ```

mod collab;
pub mod config;
mod context;
pub mod error;
mod id;
pub mod kinds;
mod log_buffer;
mod memory;
mod options;
pub mod registry;
mod row;
mod view;

#[cfg(test)]
mod test_fixtures;

pub use collab::{DataSource, LogSource, ModuleCatalog, ModuleSet, SourceError};
pub use config::{ConfigError, RegistryConfig};
pub use context::ViewContext;
pub use error::{MaterializeCause, Result, ValidationError, ViewError};
pub use id::{LOGS_VIEW_ID, MODULES_VIEW_ID, ViewId};
pub use kinds::ViewKind;
pub use kinds::modules::{DEFAULT_MODULE_SUFFIX, ModuleDirectory};
pub use log_buffer::LogBuffer;
pub use memory::{Column, MemorySource};
pub use options::{RowCallback, ValidatedOptions, ViewCallback, ViewOptions};
pub use registry::{ViewRegistry, global, global_or_init};
pub use row::{Row, SharedRows, row};
pub use view::View;
