// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Request and response bodies for the secrets and projects services.

use cask_common_secret::SecretString;
use cask_server_auth::{Project, ProjectId, SecretId};
use cask_server_db::SecretMetadata;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::SecretsError;

// =============================================================================
// Secrets
// =============================================================================

/// Body of a create request. Both fields are required; they are optional
/// here so a missing field is reported as invalid input, not a parse error.
#[derive(Debug, Default, Deserialize)]
pub struct CreateSecretRequest {
	#[serde(default)]
	pub key: Option<String>,
	#[serde(default)]
	pub value: Option<SecretString>,
}

/// Body of an update request. `value` must be present; it may be empty.
#[derive(Debug, Default, Deserialize)]
pub struct UpdateSecretRequest {
	#[serde(default)]
	pub value: Option<SecretString>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SecretMetadataResponse {
	pub id: SecretId,
	pub project_id: ProjectId,
	pub key: String,
	pub created_at: DateTime<Utc>,
	pub updated_at: DateTime<Utc>,
}

impl From<SecretMetadata> for SecretMetadataResponse {
	fn from(metadata: SecretMetadata) -> Self {
		Self {
			id: metadata.id,
			project_id: metadata.project_id,
			key: metadata.key,
			created_at: metadata.created_at,
			updated_at: metadata.updated_at,
		}
	}
}

#[derive(Debug, Serialize)]
pub struct ListSecretsResponse {
	pub secrets: Vec<SecretMetadataResponse>,
}

/// A single secret with its decrypted value. Only ever built for the owner.
#[derive(Debug, Serialize)]
pub struct SecretValueResponse {
	#[serde(flatten)]
	pub metadata: SecretMetadataResponse,
	pub value: SecretString,
}

#[derive(Debug, Serialize)]
pub struct SecretDeletedResponse {
	pub id: SecretId,
	pub deleted: bool,
}

// =============================================================================
// Projects
// =============================================================================

#[derive(Debug, Default, Deserialize)]
pub struct CreateProjectRequest {
	#[serde(default)]
	pub name: Option<String>,
	#[serde(default)]
	pub description: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct UpdateProjectRequest {
	#[serde(default)]
	pub name: Option<String>,
	#[serde(default)]
	pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProjectResponse {
	pub id: ProjectId,
	pub name: String,
	pub description: Option<String>,
	pub created_at: DateTime<Utc>,
	pub updated_at: DateTime<Utc>,
}

impl From<Project> for ProjectResponse {
	fn from(project: Project) -> Self {
		Self {
			id: project.id,
			name: project.name,
			description: project.description,
			created_at: project.created_at,
			updated_at: project.updated_at,
		}
	}
}

#[derive(Debug, Serialize)]
pub struct ListProjectsResponse {
	pub projects: Vec<ProjectResponse>,
}

#[derive(Debug, Serialize)]
pub struct ProjectDeletedResponse {
	pub id: ProjectId,
	pub deleted: bool,
}

// =============================================================================
// Errors
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ErrorResponse {
	pub error: String,
	pub message: String,
}

impl From<&SecretsError> for ErrorResponse {
	fn from(err: &SecretsError) -> Self {
		Self {
			error: err.error_code().to_string(),
			message: err.client_message(),
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use cask_common_secret::REDACTED;

	#[test]
	fn create_request_tolerates_missing_fields() {
		let request: CreateSecretRequest = serde_json::from_str("{}").unwrap();
		assert!(request.key.is_none());
		assert!(request.value.is_none());
	}

	#[test]
	fn create_request_debug_hides_value() {
		let request: CreateSecretRequest =
			serde_json::from_str(r#"{"key":"API_KEY","value":"sk-live-123"}"#).unwrap();
		let rendered = format!("{request:?}");
		assert!(rendered.contains("API_KEY"));
		assert!(rendered.contains(REDACTED));
		assert!(!rendered.contains("sk-live-123"));
	}

	#[test]
	fn value_response_serializes_flat_with_value() {
		let now = Utc::now();
		let response = SecretValueResponse {
			metadata: SecretMetadataResponse {
				id: SecretId::generate(),
				project_id: ProjectId::generate(),
				key: "DB_URL".to_string(),
				created_at: now,
				updated_at: now,
			},
			value: SecretString::from("postgres://x"),
		};
		let json = serde_json::to_value(&response).unwrap();
		assert_eq!(json["key"], "DB_URL");
		assert_eq!(json["value"], "postgres://x");
		assert!(!format!("{response:?}").contains("postgres://x"));
	}

	#[test]
	fn error_response_uses_client_message() {
		let body = ErrorResponse::from(&SecretsError::NotFound("secret"));
		assert_eq!(body.error, "not_found");
		assert_eq!(body.message, "secret not found");
	}
}
