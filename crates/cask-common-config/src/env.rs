// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Secret loading from environment variables.
//!
//! A secret named `FOO` is read from `FOO` directly, or from the file whose
//! path is in `FOO_FILE` (the Docker/Kubernetes secrets convention). Setting
//! both is an error so an operator never has to guess which one won.

use std::path::PathBuf;

use cask_common_secret::SecretString;

#[derive(Debug, thiserror::Error)]
pub enum SecretEnvError {
	#[error("both {name} and {name}_FILE are set; use only one")]
	Ambiguous { name: String },

	#[error("failed to read {name}_FILE at {path}: {source}")]
	FileRead {
		name: String,
		path: PathBuf,
		#[source]
		source: std::io::Error,
	},
}

/// Load a secret from `name` or `name_FILE`.
///
/// Empty values are treated as unset. File contents have trailing newlines
/// stripped.
pub fn load_secret_env(name: &str) -> Result<Option<SecretString>, SecretEnvError> {
	load_secret_with(name, |key| std::env::var(key).ok())
}

fn load_secret_with<F>(name: &str, lookup: F) -> Result<Option<SecretString>, SecretEnvError>
where
	F: Fn(&str) -> Option<String>,
{
	let file_var = format!("{name}_FILE");
	let direct = lookup(name).filter(|v| !v.is_empty());
	let file_path = lookup(&file_var).filter(|v| !v.is_empty());

	match (direct, file_path) {
		(Some(_), Some(_)) => Err(SecretEnvError::Ambiguous {
			name: name.to_string(),
		}),
		(Some(value), None) => Ok(Some(SecretString::new(value))),
		(None, Some(path)) => {
			let path = PathBuf::from(path);
			let contents = std::fs::read_to_string(&path).map_err(|e| SecretEnvError::FileRead {
				name: name.to_string(),
				path: path.clone(),
				source: e,
			})?;
			let trimmed = contents.trim_end_matches(['\n', '\r']).to_string();
			if trimmed.is_empty() {
				return Ok(None);
			}
			Ok(Some(SecretString::new(trimmed)))
		}
		(None, None) => Ok(None),
	}
}
