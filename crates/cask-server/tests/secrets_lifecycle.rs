// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! End-to-end secret lifecycle against an on-disk database.

use cask_common_secret::SecretString;
use cask_server::{create_app_state, AppState};
use cask_server_auth::{AuthContext, Principal, UserId};
use cask_server_config::{EncryptionConfig, ServerConfig};
use cask_server_secrets::{
	parse_project_id, parse_secret_id, CreateProjectRequest, CreateSecretRequest, ErrorResponse,
	SecretsError, UpdateSecretRequest,
};
use http::StatusCode;
use tempfile::TempDir;

fn config_with_key(master_key: &str) -> ServerConfig {
	ServerConfig {
		encryption: EncryptionConfig {
			master_key: SecretString::from(master_key),
			using_development_key: false,
		},
		..Default::default()
	}
}

async fn state_at(dir: &TempDir, master_key: &str) -> AppState {
	let url = format!("sqlite:{}", dir.path().join("cask.db").display());
	let pool = cask_server_db::create_pool(&url).await.unwrap();
	cask_server_db::run_migrations(&pool).await.unwrap();
	create_app_state(pool, &config_with_key(master_key))
}

fn user(email: &str) -> AuthContext {
	AuthContext::authenticated(Principal::new(UserId::generate(), email))
}

#[tokio::test]
async fn owner_manages_secret_and_others_cannot_see_it() {
	let dir = TempDir::new().unwrap();
	let state = state_at(&dir, "integration-master-key").await;
	let alice = user("alice@example.com");
	let bob = user("bob@example.com");

	let project = state
		.projects
		.create_project(
			&alice,
			CreateProjectRequest {
				name: Some("payments".to_string()),
				description: Some("prod credentials".to_string()),
			},
		)
		.await
		.unwrap();

	// Path segments arrive as strings.
	let project_id = parse_project_id(&project.id.to_string()).unwrap();

	let created = state
		.secrets
		.create_secret(
			&alice,
			&project_id,
			CreateSecretRequest {
				key: Some("DB_URL".to_string()),
				value: Some(SecretString::from("postgres://u:p@h/db")),
			},
		)
		.await
		.unwrap();
	let secret_id = parse_secret_id(&created.id.to_string()).unwrap();

	let listed = state.secrets.list_secrets(&alice, &project_id).await.unwrap();
	assert_eq!(listed.secrets.len(), 1);
	let listed_json = serde_json_string(&listed);
	assert!(!listed_json.contains("postgres://"));

	let fetched = state
		.secrets
		.get_secret(&alice, &project_id, &secret_id)
		.await
		.unwrap();
	assert_eq!(fetched.value.expose(), "postgres://u:p@h/db");

	let err = state
		.secrets
		.get_secret(&bob, &project_id, &secret_id)
		.await
		.unwrap_err();
	assert_eq!(err.status_code(), StatusCode::NOT_FOUND);
	assert_eq!(ErrorResponse::from(&err).error, "not_found");

	state
		.secrets
		.update_secret(
			&alice,
			&project_id,
			&secret_id,
			UpdateSecretRequest {
				value: Some(SecretString::from("postgres://u:rotated@h/db")),
			},
		)
		.await
		.unwrap();

	state
		.secrets
		.delete_secret(&alice, &project_id, &secret_id)
		.await
		.unwrap();
	let err = state
		.secrets
		.get_secret(&alice, &project_id, &secret_id)
		.await
		.unwrap_err();
	assert!(matches!(err, SecretsError::NotFound("secret")));
}

#[tokio::test]
async fn secrets_survive_restart_only_with_the_same_key() {
	let dir = TempDir::new().unwrap();
	let alice = user("alice@example.com");

	let (project_id, secret_id) = {
		let state = state_at(&dir, "first-key").await;
		let project = state
			.projects
			.create_project(
				&alice,
				CreateProjectRequest {
					name: Some("infra".to_string()),
					description: None,
				},
			)
			.await
			.unwrap();
		let created = state
			.secrets
			.create_secret(
				&alice,
				&project.id,
				CreateSecretRequest {
					key: Some("TOKEN".to_string()),
					value: Some(SecretString::from("t0k3n")),
				},
			)
			.await
			.unwrap();
		state.pool.close().await;
		(project.id, created.id)
	};

	let same_key = state_at(&dir, "first-key").await;
	let fetched = same_key
		.secrets
		.get_secret(&alice, &project_id, &secret_id)
		.await
		.unwrap();
	assert_eq!(fetched.value.expose(), "t0k3n");
	same_key.pool.close().await;

	let other_key = state_at(&dir, "second-key").await;
	let err = other_key
		.secrets
		.get_secret(&alice, &project_id, &secret_id)
		.await
		.unwrap_err();
	assert!(matches!(err, SecretsError::DecryptionFailed));
	assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
}

#[tokio::test]
async fn malformed_ids_are_not_found() {
	let err = parse_project_id("../../etc/passwd").unwrap_err();
	assert_eq!(err.status_code(), StatusCode::NOT_FOUND);
	let err = parse_secret_id("123").unwrap_err();
	assert_eq!(err.status_code(), StatusCode::NOT_FOUND);
}

fn serde_json_string(value: &impl serde::Serialize) -> String {
	serde_json::to_string(value).unwrap()
}
