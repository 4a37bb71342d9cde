// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Master key configuration for secret encryption.

use cask_common_config::SecretString;
use serde::Deserialize;

/// Placeholder key used when no master key is configured.
///
/// Anything encrypted under it is readable by anyone with this source code.
/// Startup refuses it when the runtime environment is `production`.
pub const DEVELOPMENT_ENCRYPTION_KEY: &str = "cask-development-encryption-key-do-not-use-in-production";

/// Encryption configuration (runtime, fully resolved).
#[derive(Debug, Clone)]
pub struct EncryptionConfig {
	/// Raw master key as configured: a 64-char hex key or any passphrase.
	pub master_key: SecretString,
	/// True when `master_key` is [`DEVELOPMENT_ENCRYPTION_KEY`].
	pub using_development_key: bool,
}

impl Default for EncryptionConfig {
	fn default() -> Self {
		EncryptionConfigLayer::default().finalize()
	}
}

/// Encryption configuration layer (partial, for merging).
#[derive(Debug, Clone, Default, Deserialize)]
pub struct EncryptionConfigLayer {
	#[serde(default)]
	pub master_key: Option<SecretString>,
}

impl EncryptionConfigLayer {
	pub fn merge(&mut self, other: EncryptionConfigLayer) {
		if other.master_key.is_some() {
			self.master_key = other.master_key;
		}
	}

	pub fn finalize(self) -> EncryptionConfig {
		match self.master_key {
			Some(master_key) if !master_key.expose().is_empty() => EncryptionConfig {
				using_development_key: master_key.expose() == DEVELOPMENT_ENCRYPTION_KEY,
				master_key,
			},
			_ => EncryptionConfig {
				master_key: SecretString::from(DEVELOPMENT_ENCRYPTION_KEY),
				using_development_key: true,
			},
		}
	}
}
