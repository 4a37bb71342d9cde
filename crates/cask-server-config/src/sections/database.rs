// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Database configuration.
//!
//! Only SQLite is supported. sqlx reads any unrecognised string as a file
//! path, so a URL for another database would silently create a stray file;
//! it is rejected here instead.

use serde::Deserialize;

use crate::error::ConfigError;

const DEFAULT_DATABASE_URL: &str = "sqlite:./cask.db";
const SQLITE_SCHEME: &str = "sqlite:";

/// Database configuration (runtime, fully resolved).
#[derive(Debug, Clone)]
pub struct DatabaseConfig {
	/// SQLite connection string, always starting with `sqlite:`.
	pub url: String,
}

impl Default for DatabaseConfig {
	fn default() -> Self {
		Self {
			url: DEFAULT_DATABASE_URL.to_string(),
		}
	}
}

/// Database configuration layer (partial, for merging).
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DatabaseConfigLayer {
	#[serde(default)]
	pub url: Option<String>,
}

impl DatabaseConfigLayer {
	pub fn merge(&mut self, other: DatabaseConfigLayer) {
		if other.url.is_some() {
			self.url = other.url;
		}
	}

	/// Resolve the URL, rejecting anything that is not a SQLite connection string.
	pub fn finalize(self) -> Result<DatabaseConfig, ConfigError> {
		let url = match self.url {
			Some(url) => url.trim().to_string(),
			None => return Ok(DatabaseConfig::default()),
		};

		let path = url.strip_prefix(SQLITE_SCHEME).unwrap_or_default();
		if path.is_empty() {
			return Err(ConfigError::InvalidValue {
				key: "database.url".to_string(),
				message: format!("expected a {SQLITE_SCHEME} URL such as {DEFAULT_DATABASE_URL}, got {url:?}"),
			});
		}

		Ok(DatabaseConfig { url })
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn finalize(url: &str) -> Result<DatabaseConfig, ConfigError> {
		DatabaseConfigLayer {
			url: Some(url.to_string()),
		}
		.finalize()
	}

	#[test]
	fn test_default_url() {
		let config = DatabaseConfigLayer::default().finalize().unwrap();
		assert_eq!(config.url, "sqlite:./cask.db");
	}

	#[test]
	fn test_custom_url_is_trimmed() {
		let config = finalize("  sqlite:/var/lib/cask/data.db\n").unwrap();
		assert_eq!(config.url, "sqlite:/var/lib/cask/data.db");
	}

	#[test]
	fn test_in_memory_url_is_accepted() {
		assert!(finalize("sqlite::memory:").is_ok());
	}

	#[test]
	fn test_other_schemes_are_rejected() {
		for url in ["postgres://localhost/cask", "./cask.db", "sqlite:", ""] {
			assert!(
				matches!(finalize(url), Err(ConfigError::InvalidValue { .. })),
				"accepted {url:?}"
			);
		}
	}
}
