//! Registry configuration loaded from TOML.
//!
//! ```toml
//! module_dir = "/srv/app/modules"
//! module_suffix = ".php"
//! wait_timeout_ms = 30000
//! max_views = 4096
//! log_capacity = 1024
//! ```
//!
//! Every key is optional; missing keys take the [`Default`] values.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;
use thiserror::Error;

use crate::kinds::modules::DEFAULT_MODULE_SUFFIX;

/// Errors raised while loading a [`RegistryConfig`].
#[derive(Debug, Error)]
pub enum ConfigError {
	/// The file could not be read.
	#[error("I/O error reading {path}: {error}")]
	Io {
		path: PathBuf,
		error: std::io::Error,
	},

	/// The file is not valid TOML for this schema.
	#[error("failed to parse registry config: {0}")]
	Parse(#[from] toml::de::Error),

	/// A value parsed but is unusable.
	#[error("invalid value for `{key}`: {reason}")]
	Invalid { key: &'static str, reason: &'static str },
}

/// Result type for configuration operations.
pub type Result<T> = std::result::Result<T, ConfigError>;

/// Settings for a [`crate::ViewRegistry`] and its [`crate::ViewContext`].
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RegistryConfig {
	/// Directory enumerated by the module view.
	pub module_dir: PathBuf,
	/// Entry suffix marking a module file, matched case-insensitively.
	pub module_suffix: String,
	/// How long a caller waits for another caller's fill of the same view.
	pub wait_timeout_ms: u64,
	/// Upper bound on published plus in-flight views. `None` is unbounded.
	pub max_views: Option<usize>,
	/// Rows retained by a [`crate::LogBuffer`] built from this config.
	pub log_capacity: usize,
}

impl Default for RegistryConfig {
	fn default() -> Self {
		Self {
			module_dir: PathBuf::from("modules"),
			module_suffix: DEFAULT_MODULE_SUFFIX.to_string(),
			wait_timeout_ms: 30_000,
			max_views: None,
			log_capacity: 1_024,
		}
	}
}

impl RegistryConfig {
	/// Parses and checks a TOML document.
	pub fn from_toml_str(input: &str) -> Result<Self> {
		let config: Self = toml::from_str(input)?;
		config.check()?;
		Ok(config)
	}

	/// Reads and parses a TOML file.
	pub fn load(path: impl AsRef<Path>) -> Result<Self> {
		let path = path.as_ref();
		let input = std::fs::read_to_string(path).map_err(|error| ConfigError::Io {
			path: path.to_path_buf(),
			error,
		})?;
		let config = Self::from_toml_str(&input)?;
		tracing::debug!(path = %path.display(), "views.config.loaded");
		Ok(config)
	}

	pub fn wait_timeout(&self) -> Duration {
		Duration::from_millis(self.wait_timeout_ms)
	}

	fn check(&self) -> Result<()> {
		if self.module_suffix.is_empty() {
			return Err(ConfigError::Invalid {
				key: "module_suffix",
				reason: "must not be empty",
			});
		}
		if self.wait_timeout_ms == 0 {
			return Err(ConfigError::Invalid {
				key: "wait_timeout_ms",
				reason: "must be positive",
			});
		}
		if self.max_views == Some(0) {
			return Err(ConfigError::Invalid {
				key: "max_views",
				reason: "must be positive when set",
			});
		}
		if self.log_capacity == 0 {
			return Err(ConfigError::Invalid {
				key: "log_capacity",
				reason: "must be positive",
			});
		}
		Ok(())
	}
}
