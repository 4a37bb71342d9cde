// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Input checks that run before any cryptography or storage access.

use cask_common_secret::SecretString;
use cask_server_auth::{ProjectId, SecretId};

use crate::api::{CreateProjectRequest, CreateSecretRequest, UpdateProjectRequest, UpdateSecretRequest};
use crate::error::{SecretsError, SecretsResult};

pub const MAX_PROJECT_NAME_LEN: usize = 100;
pub const MAX_PROJECT_DESCRIPTION_LEN: usize = 500;

/// Parse a project id from a path segment.
///
/// A malformed id cannot name an existing project, so it is reported as
/// not found.
pub fn parse_project_id(raw: &str) -> SecretsResult<ProjectId> {
	raw.parse().map_err(|_| SecretsError::NotFound("project"))
}

/// Parse a secret id from a path segment. Malformed ids are not found.
pub fn parse_secret_id(raw: &str) -> SecretsResult<SecretId> {
	raw.parse().map_err(|_| SecretsError::NotFound("secret"))
}

/// Validated create input: the trimmed key and the value to seal.
pub(crate) struct NewSecret<'a> {
	pub key: &'a str,
	pub value: &'a SecretString,
}

pub(crate) fn validate_create(request: &CreateSecretRequest) -> SecretsResult<NewSecret<'_>> {
	let key = request.key.as_deref().map(str::trim).unwrap_or_default();
	let value = request.value.as_ref().filter(|v| !v.expose().is_empty());

	match value {
		Some(value) if !key.is_empty() => Ok(NewSecret { key, value }),
		_ => Err(SecretsError::InvalidInput(
			"key and value are required".to_string(),
		)),
	}
}

pub(crate) fn validate_update(request: &UpdateSecretRequest) -> SecretsResult<&SecretString> {
	request
		.value
		.as_ref()
		.ok_or_else(|| SecretsError::InvalidInput("value is required".to_string()))
}

pub(crate) struct ProjectFields {
	pub name: String,
	pub description: Option<String>,
}

pub(crate) fn validate_create_project(request: &CreateProjectRequest) -> SecretsResult<ProjectFields> {
	project_fields(request.name.as_deref(), request.description.as_deref())
}

pub(crate) fn validate_update_project(request: &UpdateProjectRequest) -> SecretsResult<ProjectFields> {
	project_fields(request.name.as_deref(), request.description.as_deref())
}

fn project_fields(name: Option<&str>, description: Option<&str>) -> SecretsResult<ProjectFields> {
	let name = name.map(str::trim).unwrap_or_default();
	if name.is_empty() {
		return Err(SecretsError::InvalidInput("name is required".to_string()));
	}
	if name.chars().count() > MAX_PROJECT_NAME_LEN {
		return Err(SecretsError::InvalidInput(format!(
			"name must be at most {MAX_PROJECT_NAME_LEN} characters"
		)));
	}

	let description = description.map(str::trim).filter(|d| !d.is_empty());
	if let Some(d) = description {
		if d.chars().count() > MAX_PROJECT_DESCRIPTION_LEN {
			return Err(SecretsError::InvalidInput(format!(
				"description must be at most {MAX_PROJECT_DESCRIPTION_LEN} characters"
			)));
		}
	}

	Ok(ProjectFields {
		name: name.to_string(),
		description: description.map(str::to_string),
	})
}
