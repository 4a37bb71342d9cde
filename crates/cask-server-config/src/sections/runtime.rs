// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Deployment environment.

use serde::Deserialize;

const DEFAULT_ENVIRONMENT: &str = "development";

#[derive(Debug, Clone)]
pub struct RuntimeConfig {
	/// Free-form environment name, e.g. `development`, `staging`, `production`.
	pub environment: String,
}

impl RuntimeConfig {
	pub fn is_production(&self) -> bool {
		self.environment.eq_ignore_ascii_case("production")
	}
}

impl Default for RuntimeConfig {
	fn default() -> Self {
		Self {
			environment: DEFAULT_ENVIRONMENT.to_string(),
		}
	}
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RuntimeConfigLayer {
	#[serde(default)]
	pub environment: Option<String>,
}

impl RuntimeConfigLayer {
	pub fn merge(&mut self, other: RuntimeConfigLayer) {
		if other.environment.is_some() {
			self.environment = other.environment;
		}
	}

	pub fn finalize(self) -> RuntimeConfig {
		RuntimeConfig {
			environment: self
				.environment
				.unwrap_or_else(|| DEFAULT_ENVIRONMENT.to_string()),
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn defaults_to_development() {
		let config = RuntimeConfigLayer::default().finalize();
		assert_eq!(config.environment, "development");
		assert!(!config.is_production());
	}

	#[test]
	fn production_is_case_insensitive() {
		let layer = RuntimeConfigLayer {
			environment: Some("Production".to_string()),
		};
		assert!(layer.finalize().is_production());
	}
}
