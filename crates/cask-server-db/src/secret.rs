// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! Secret repository for database operations.
//!
//! Rows hold the sealed (encrypted) value as an opaque string; this module
//! never sees plaintext and knows nothing about the cipher that produced it.
//! Every operation is scoped to an [`AuthorizedProject`]. A secret that lives
//! in another project is reported as not found.

use async_trait::async_trait;
use cask_server_auth::{ProjectId, SecretId};
use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::{sqlite::SqlitePool, Row};
use uuid::Uuid;

use crate::error::DbError;
use crate::project::AuthorizedProject;
use crate::timestamp;

/// Everything about a secret except its value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SecretMetadata {
	pub id: SecretId,
	pub project_id: ProjectId,
	pub key: String,
	pub created_at: DateTime<Utc>,
	pub updated_at: DateTime<Utc>,
}

/// A secret row including its sealed value.
#[derive(Debug, Clone)]
pub struct StoredSecret {
	pub metadata: SecretMetadata,
	pub sealed_value: String,
}

#[async_trait]
pub trait SecretStore: Send + Sync {
	async fn list_secrets(&self, project: &AuthorizedProject) -> Result<Vec<SecretMetadata>, DbError>;
	async fn create_secret(
		&self,
		project: &AuthorizedProject,
		key: &str,
		sealed_value: &str,
	) -> Result<SecretMetadata, DbError>;
	async fn get_secret(
		&self,
		project: &AuthorizedProject,
		secret_id: &SecretId,
	) -> Result<StoredSecret, DbError>;
	async fn update_secret_value(
		&self,
		project: &AuthorizedProject,
		secret_id: &SecretId,
		sealed_value: &str,
	) -> Result<SecretMetadata, DbError>;
	async fn delete_secret(
		&self,
		project: &AuthorizedProject,
		secret_id: &SecretId,
	) -> Result<(), DbError>;
}

/// Repository for secret database operations.
#[derive(Clone)]
pub struct SecretRepository {
	pool: SqlitePool,
}

impl SecretRepository {
	pub fn new(pool: SqlitePool) -> Self {
		Self { pool }
	}

	/// List secret metadata for a project, newest first.
	///
	/// Sealed values are not selected.
	#[tracing::instrument(skip(self, project), fields(project_id = %project.id()))]
	pub async fn list_secrets(
		&self,
		project: &AuthorizedProject,
	) -> Result<Vec<SecretMetadata>, DbError> {
		let rows = sqlx::query(
			r#"
			SELECT id, project_id, key, created_at, updated_at
			FROM secrets
			WHERE project_id = ?
			ORDER BY created_at DESC, rowid DESC
			"#,
		)
		.bind(project.id().to_string())
		.fetch_all(&self.pool)
		.await?;

		let secrets: Result<Vec<_>, _> = rows.iter().map(row_to_metadata).collect();
		let secrets = secrets?;
		tracing::debug!(project_id = %project.id(), count = secrets.len(), "listed secrets");
		Ok(secrets)
	}

	/// Insert a new secret.
	///
	/// `key` is trimmed before storage.
	///
	/// # Errors
	/// - `DbError::InvalidInput` if the trimmed key is empty
	/// - `DbError::Conflict` if the project already has a secret with this key,
	///   whether caught by the pre-check or by the UNIQUE constraint when two
	///   creates race
	#[tracing::instrument(skip(self, project, sealed_value), fields(project_id = %project.id()))]
	pub async fn create_secret(
		&self,
		project: &AuthorizedProject,
		key: &str,
		sealed_value: &str,
	) -> Result<SecretMetadata, DbError> {
		let key = key.trim();
		if key.is_empty() {
			return Err(DbError::InvalidInput("secret key must not be empty".to_string()));
		}

		let project_id = project.id().to_string();

		let existing = sqlx::query("SELECT 1 FROM secrets WHERE project_id = ? AND key = ?")
			.bind(&project_id)
			.bind(key)
			.fetch_optional(&self.pool)
			.await?;
		if existing.is_some() {
			return Err(duplicate_key(key));
		}

		let now = timestamp::now();
		let metadata = SecretMetadata {
			id: SecretId::generate(),
			project_id: *project.id(),
			key: key.to_string(),
			created_at: now,
			updated_at: now,
		};

		let inserted = sqlx::query(
			r#"
			INSERT INTO secrets (id, project_id, key, encrypted_value, created_at, updated_at)
			VALUES (?, ?, ?, ?, ?, ?)
			"#,
		)
		.bind(metadata.id.to_string())
		.bind(&project_id)
		.bind(key)
		.bind(sealed_value)
		.bind(timestamp::format(now))
		.bind(timestamp::format(now))
		.execute(&self.pool)
		.await
		.map_err(DbError::from);

		match inserted {
			Ok(_) => {}
			Err(e) if e.is_unique_violation() => return Err(duplicate_key(key)),
			Err(e) => return Err(e),
		}

		tracing::debug!(secret_id = %metadata.id, %project_id, "secret created");
		Ok(metadata)
	}

	/// Fetch one secret including its sealed value.
	///
	/// # Errors
	/// `DbError::NotFound` if no secret with this id exists in the project.
	#[tracing::instrument(skip(self, project), fields(project_id = %project.id(), %secret_id))]
	pub async fn get_secret(
		&self,
		project: &AuthorizedProject,
		secret_id: &SecretId,
	) -> Result<StoredSecret, DbError> {
		let row = sqlx::query(
			r#"
			SELECT id, project_id, key, encrypted_value, created_at, updated_at
			FROM secrets
			WHERE id = ? AND project_id = ?
			"#,
		)
		.bind(secret_id.to_string())
		.bind(project.id().to_string())
		.fetch_optional(&self.pool)
		.await?
		.ok_or_else(secret_not_found)?;

		Ok(StoredSecret {
			metadata: row_to_metadata(&row)?,
			sealed_value: row.get("encrypted_value"),
		})
	}

	/// Replace a secret's sealed value. The key never changes.
	///
	/// # Errors
	/// `DbError::NotFound` if no secret with this id exists in the project.
	#[tracing::instrument(skip(self, project, sealed_value), fields(project_id = %project.id(), %secret_id))]
	pub async fn update_secret_value(
		&self,
		project: &AuthorizedProject,
		secret_id: &SecretId,
		sealed_value: &str,
	) -> Result<SecretMetadata, DbError> {
		let result = sqlx::query(
			r#"
			UPDATE secrets
			SET encrypted_value = ?, updated_at = ?
			WHERE id = ? AND project_id = ?
			"#,
		)
		.bind(sealed_value)
		.bind(timestamp::format(timestamp::now()))
		.bind(secret_id.to_string())
		.bind(project.id().to_string())
		.execute(&self.pool)
		.await?;

		if result.rows_affected() == 0 {
			return Err(secret_not_found());
		}

		let row = sqlx::query(
			r#"
			SELECT id, project_id, key, created_at, updated_at
			FROM secrets
			WHERE id = ? AND project_id = ?
			"#,
		)
		.bind(secret_id.to_string())
		.bind(project.id().to_string())
		.fetch_optional(&self.pool)
		.await?
		.ok_or_else(secret_not_found)?;

		tracing::debug!(%secret_id, "secret value updated");
		row_to_metadata(&row)
	}

	/// Delete a secret.
	///
	/// # Errors
	/// `DbError::NotFound` if no secret with this id exists in the project.
	#[tracing::instrument(skip(self, project), fields(project_id = %project.id(), %secret_id))]
	pub async fn delete_secret(
		&self,
		project: &AuthorizedProject,
		secret_id: &SecretId,
	) -> Result<(), DbError> {
		let result = sqlx::query("DELETE FROM secrets WHERE id = ? AND project_id = ?")
			.bind(secret_id.to_string())
			.bind(project.id().to_string())
			.execute(&self.pool)
			.await?;

		if result.rows_affected() == 0 {
			return Err(secret_not_found());
		}

		tracing::debug!(%secret_id, "secret deleted");
		Ok(())
	}
}

#[async_trait]
impl SecretStore for SecretRepository {
	async fn list_secrets(&self, project: &AuthorizedProject) -> Result<Vec<SecretMetadata>, DbError> {
		self.list_secrets(project).await
	}

	async fn create_secret(
		&self,
		project: &AuthorizedProject,
		key: &str,
		sealed_value: &str,
	) -> Result<SecretMetadata, DbError> {
		self.create_secret(project, key, sealed_value).await
	}

	async fn get_secret(
		&self,
		project: &AuthorizedProject,
		secret_id: &SecretId,
	) -> Result<StoredSecret, DbError> {
		self.get_secret(project, secret_id).await
	}

	async fn update_secret_value(
		&self,
		project: &AuthorizedProject,
		secret_id: &SecretId,
		sealed_value: &str,
	) -> Result<SecretMetadata, DbError> {
		self.update_secret_value(project, secret_id, sealed_value).await
	}

	async fn delete_secret(
		&self,
		project: &AuthorizedProject,
		secret_id: &SecretId,
	) -> Result<(), DbError> {
		self.delete_secret(project, secret_id).await
	}
}

fn secret_not_found() -> DbError {
	DbError::NotFound("secret".to_string())
}

fn duplicate_key(key: &str) -> DbError {
	DbError::Conflict(format!("a secret with key '{key}' already exists in this project"))
}

fn row_to_metadata(row: &sqlx::sqlite::SqliteRow) -> Result<SecretMetadata, DbError> {
	let id: String = row.get("id");
	let project_id: String = row.get("project_id");
	let created_at: String = row.get("created_at");
	let updated_at: String = row.get("updated_at");

	let id = Uuid::parse_str(&id).map_err(|e| DbError::Internal(format!("Invalid secret ID: {e}")))?;
	let project_id = Uuid::parse_str(&project_id)
		.map_err(|e| DbError::Internal(format!("Invalid project ID: {e}")))?;

	Ok(SecretMetadata {
		id: SecretId::new(id),
		project_id: ProjectId::new(project_id),
		key: row.get("key"),
		created_at: timestamp::parse(&created_at, "created_at")?,
		updated_at: timestamp::parse(&updated_at, "updated_at")?,
	})
}
