// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Configuration sources: environment variables and TOML files.

use std::path::PathBuf;

use cask_common_config::load_secret_env;
use tracing::{debug, trace};

use crate::error::ConfigError;
use crate::layer::ServerConfigLayer;
use crate::sections::{
	DatabaseConfigLayer, EncryptionConfigLayer, LoggingConfigLayer, RuntimeConfigLayer,
};

/// Environment variable holding the master encryption key (or `_FILE` path).
pub const ENCRYPTION_KEY_ENV: &str = "CASK_SERVER_ENCRYPTION_KEY";

/// Source precedence levels (higher = overrides lower).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Precedence {
	Defaults = 10,
	ConfigFile = 20,
	Environment = 50,
}

/// Trait for configuration sources.
pub trait ConfigSource: Send + Sync {
	fn name(&self) -> &'static str;
	fn precedence(&self) -> Precedence;
	fn load(&self) -> Result<ServerConfigLayer, ConfigError>;
}

/// Built-in defaults source.
pub struct DefaultsSource;

impl ConfigSource for DefaultsSource {
	fn name(&self) -> &'static str {
		"defaults"
	}

	fn precedence(&self) -> Precedence {
		Precedence::Defaults
	}

	fn load(&self) -> Result<ServerConfigLayer, ConfigError> {
		debug!("loading defaults");
		Ok(ServerConfigLayer::default())
	}
}

/// TOML file configuration source.
pub struct TomlSource {
	path: PathBuf,
}

impl TomlSource {
	pub fn new(path: impl Into<PathBuf>) -> Self {
		Self { path: path.into() }
	}

	pub fn system() -> Self {
		Self::new("/etc/cask/server.toml")
	}
}

impl ConfigSource for TomlSource {
	fn name(&self) -> &'static str {
		"toml-config"
	}

	fn precedence(&self) -> Precedence {
		Precedence::ConfigFile
	}

	fn load(&self) -> Result<ServerConfigLayer, ConfigError> {
		if !self.path.exists() {
			debug!(path = %self.path.display(), "config file not found, skipping");
			return Ok(ServerConfigLayer::default());
		}

		debug!(path = %self.path.display(), "loading config file");
		let content = std::fs::read_to_string(&self.path).map_err(|e| ConfigError::FileRead {
			path: self.path.clone(),
			source: e,
		})?;

		let layer: ServerConfigLayer =
			toml::from_str(&content).map_err(|e| ConfigError::TomlParse {
				path: self.path.clone(),
				source: e,
			})?;

		trace!("parsed config layer from TOML");
		Ok(layer)
	}
}

/// Environment variable source.
///
/// Convention: CASK_SERVER_<SECTION>_<FIELD>
pub struct EnvSource;

impl ConfigSource for EnvSource {
	fn name(&self) -> &'static str {
		"environment"
	}

	fn precedence(&self) -> Precedence {
		Precedence::Environment
	}

	fn load(&self) -> Result<ServerConfigLayer, ConfigError> {
		debug!("loading environment variables");
		Ok(ServerConfigLayer {
			database: Some(load_database_from_env()),
			encryption: Some(load_encryption_from_env()?),
			logging: Some(load_logging_from_env()),
			runtime: Some(load_runtime_from_env()),
		})
	}
}

fn env_var(name: &str) -> Option<String> {
	std::env::var(name).ok().filter(|s| !s.is_empty())
}

fn load_database_from_env() -> DatabaseConfigLayer {
	DatabaseConfigLayer {
		url: env_var("CASK_SERVER_DATABASE_URL"),
	}
}

fn load_encryption_from_env() -> Result<EncryptionConfigLayer, ConfigError> {
	let master_key =
		load_secret_env(ENCRYPTION_KEY_ENV).map_err(|e| ConfigError::Secret(e.to_string()))?;
	Ok(EncryptionConfigLayer { master_key })
}

fn load_logging_from_env() -> LoggingConfigLayer {
	LoggingConfigLayer {
		level: env_var("CASK_SERVER_LOG_LEVEL"),
	}
}

fn load_runtime_from_env() -> RuntimeConfigLayer {
	RuntimeConfigLayer {
		environment: env_var("CASK_SERVER_ENV"),
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use std::io::Write;

	#[test]
	fn precedence_orders_env_last() {
		assert!(Precedence::Defaults < Precedence::ConfigFile);
		assert!(Precedence::ConfigFile < Precedence::Environment);
	}

	#[test]
	fn missing_toml_file_yields_empty_layer() {
		let source = TomlSource::new("/nonexistent/cask/server.toml");
		let layer = source.load().unwrap();
		assert!(layer.database.is_none());
		assert!(layer.encryption.is_none());
	}

	#[test]
	fn toml_file_is_parsed() {
		let mut file = tempfile::NamedTempFile::new().unwrap();
		write!(
			file,
			r#"
[database]
url = "sqlite:/tmp/cask-test.db"

[encryption]
master_key = "from-toml"

[runtime]
environment = "staging"
"#
		)
		.unwrap();

		let layer = TomlSource::new(file.path()).load().unwrap();
		assert_eq!(
			layer.database.unwrap().url.as_deref(),
			Some("sqlite:/tmp/cask-test.db")
		);
		assert_eq!(
			layer.encryption.unwrap().master_key.unwrap().expose(),
			"from-toml"
		);
		assert_eq!(
			layer.runtime.unwrap().environment.as_deref(),
			Some("staging")
		);
	}

	#[test]
	fn invalid_toml_is_an_error() {
		let mut file = tempfile::NamedTempFile::new().unwrap();
		write!(file, "[database\nurl = ").unwrap();

		let result = TomlSource::new(file.path()).load();
		assert!(matches!(result, Err(ConfigError::TomlParse { .. })));
	}
}
