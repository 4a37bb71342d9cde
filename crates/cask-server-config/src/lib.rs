// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Centralized configuration management for Cask server.
//!
//! This crate provides:
//! - Layered configuration from multiple sources (defaults, TOML file, environment)
//! - Type-safe configuration with validation
//! - Consistent environment variable naming (`CASK_SERVER_*`)
//!
//! # Usage
//!
//! ```ignore
//! use cask_server_config::load_config;
//!
//! let config = load_config()?;
//! println!("database: {}", config.database.url);
//! ```

pub mod error;
pub mod layer;
pub mod sections;
pub mod sources;

pub use error::ConfigError;
pub use layer::ServerConfigLayer;
pub use sections::*;
pub use sources::{
	ConfigSource, DefaultsSource, EnvSource, Precedence, TomlSource, ENCRYPTION_KEY_ENV,
};

use tracing::{debug, info, warn};

/// Fully resolved server configuration.
#[derive(Debug, Clone, Default)]
pub struct ServerConfig {
	pub database: DatabaseConfig,
	pub encryption: EncryptionConfig,
	pub logging: LoggingConfig,
	pub runtime: RuntimeConfig,
}

/// Load configuration from all sources with standard precedence.
///
/// Precedence (highest to lowest):
/// 1. Environment variables (`CASK_SERVER_*`)
/// 2. Config file (`/etc/cask/server.toml`)
/// 3. Built-in defaults
pub fn load_config() -> Result<ServerConfig, ConfigError> {
	load_from_sources(vec![
		Box::new(DefaultsSource),
		Box::new(TomlSource::system()),
		Box::new(EnvSource),
	])
}

/// Load configuration from environment only (for testing or simple deployments).
pub fn load_config_from_env() -> Result<ServerConfig, ConfigError> {
	load_from_sources(vec![Box::new(EnvSource)])
}

/// Load configuration with a custom config file path.
pub fn load_config_with_file(
	config_path: impl Into<std::path::PathBuf>,
) -> Result<ServerConfig, ConfigError> {
	load_from_sources(vec![
		Box::new(DefaultsSource),
		Box::new(TomlSource::new(config_path)),
		Box::new(EnvSource),
	])
}

fn load_from_sources(mut sources: Vec<Box<dyn ConfigSource>>) -> Result<ServerConfig, ConfigError> {
	sources.sort_by_key(|s| s.precedence());

	let mut merged = ServerConfigLayer::default();
	for source in sources {
		debug!(source = source.name(), "loading configuration source");
		let layer = source.load()?;
		merged.merge(layer);
	}

	finalize(merged)
}

/// Finalize configuration layer into resolved config.
///
/// Nothing is logged here: loading usually happens before the subscriber is
/// installed. Call [`ServerConfig::log_summary`] once logging is up.
fn finalize(layer: ServerConfigLayer) -> Result<ServerConfig, ConfigError> {
	let config = ServerConfig {
		database: layer.database.unwrap_or_default().finalize()?,
		encryption: layer.encryption.unwrap_or_default().finalize(),
		logging: layer.logging.unwrap_or_default().finalize(),
		runtime: layer.runtime.unwrap_or_default().finalize(),
	};

	validate_config(&config)?;
	Ok(config)
}

impl ServerConfig {
	/// Log the resolved configuration, warning if the development key is in use.
	pub fn log_summary(&self) {
		if self.encryption.using_development_key {
			warn!(
				environment = %self.runtime.environment,
				"{ENCRYPTION_KEY_ENV} is not set; using the insecure development key"
			);
		}

		info!(
			database = %self.database.url,
			environment = %self.runtime.environment,
			log_level = %self.logging.level,
			development_key = self.encryption.using_development_key,
			"Server configuration loaded"
		);
	}
}

/// Validate cross-field configuration rules.
fn validate_config(config: &ServerConfig) -> Result<(), ConfigError> {
	if config.encryption.using_development_key && config.runtime.is_production() {
		return Err(ConfigError::Validation(format!(
			"{ENCRYPTION_KEY_ENV} must be set when CASK_SERVER_ENV=production. \
			 The built-in development key is public and must never protect real secrets."
		)));
	}

	Ok(())
}
