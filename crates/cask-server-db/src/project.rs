// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! Project repository for database operations.
//!
//! Projects are always looked up together with their owner. A project that
//! exists but belongs to someone else is reported exactly like a project that
//! does not exist, so callers cannot probe for other users' project IDs.

use async_trait::async_trait;
use cask_server_auth::{Project, ProjectId, UserId};
use sqlx::{sqlite::SqlitePool, Row};
use uuid::Uuid;

use crate::error::DbError;
use crate::timestamp;

/// A project whose ownership by the calling user has been verified.
///
/// Only [`ProjectStore::authorize`] can construct one. Secret operations
/// require it, which makes "every secret access is preceded by an ownership
/// check" a property of the types rather than of each call site.
#[derive(Debug, Clone)]
pub struct AuthorizedProject {
	project: Project,
}

impl AuthorizedProject {
	pub(crate) fn new(project: Project) -> Self {
		Self { project }
	}

	pub fn id(&self) -> &ProjectId {
		&self.project.id
	}

	pub fn project(&self) -> &Project {
		&self.project
	}

	pub fn into_project(self) -> Project {
		self.project
	}
}

#[async_trait]
pub trait ProjectStore: Send + Sync {
	async fn create_project(&self, project: &Project) -> Result<(), DbError>;
	async fn authorize(
		&self,
		owner_id: &UserId,
		project_id: &ProjectId,
	) -> Result<Option<AuthorizedProject>, DbError>;
	async fn list_projects_for_owner(&self, owner_id: &UserId) -> Result<Vec<Project>, DbError>;
	async fn update_project(
		&self,
		project: &AuthorizedProject,
		name: &str,
		description: Option<&str>,
	) -> Result<Project, DbError>;
	async fn delete_project(&self, project: AuthorizedProject) -> Result<(), DbError>;
}

/// Repository for project database operations.
#[derive(Clone)]
pub struct ProjectRepository {
	pool: SqlitePool,
}

impl ProjectRepository {
	/// Create a new repository with the given pool.
	pub fn new(pool: SqlitePool) -> Self {
		Self { pool }
	}

	/// Insert a new project.
	///
	/// # Errors
	/// Returns `DbError::Sqlx` if the insert fails (e.g., duplicate id).
	#[tracing::instrument(skip(self, project), fields(project_id = %project.id, owner_id = %project.owner_id))]
	pub async fn create_project(&self, project: &Project) -> Result<(), DbError> {
		sqlx::query(
			r#"
			INSERT INTO projects (id, owner_id, name, description, created_at, updated_at)
			VALUES (?, ?, ?, ?, ?, ?)
			"#,
		)
		.bind(project.id.to_string())
		.bind(project.owner_id.to_string())
		.bind(&project.name)
		.bind(&project.description)
		.bind(timestamp::format(project.created_at))
		.bind(timestamp::format(project.updated_at))
		.execute(&self.pool)
		.await?;

		tracing::debug!(project_id = %project.id, "project created");
		Ok(())
	}

	/// Look up a project by id, constrained to the given owner.
	///
	/// # Returns
	/// `None` if the project does not exist or is owned by another user.
	#[tracing::instrument(skip(self), fields(%owner_id, %project_id))]
	pub async fn authorize(
		&self,
		owner_id: &UserId,
		project_id: &ProjectId,
	) -> Result<Option<AuthorizedProject>, DbError> {
		let row = sqlx::query(
			r#"
			SELECT id, owner_id, name, description, created_at, updated_at
			FROM projects
			WHERE id = ? AND owner_id = ?
			"#,
		)
		.bind(project_id.to_string())
		.bind(owner_id.to_string())
		.fetch_optional(&self.pool)
		.await?;

		row
			.map(|r| row_to_project(&r).map(AuthorizedProject::new))
			.transpose()
	}

	/// List projects owned by a user, newest first.
	#[tracing::instrument(skip(self), fields(%owner_id))]
	pub async fn list_projects_for_owner(&self, owner_id: &UserId) -> Result<Vec<Project>, DbError> {
		let rows = sqlx::query(
			r#"
			SELECT id, owner_id, name, description, created_at, updated_at
			FROM projects
			WHERE owner_id = ?
			ORDER BY created_at DESC, rowid DESC
			"#,
		)
		.bind(owner_id.to_string())
		.fetch_all(&self.pool)
		.await?;

		let projects: Result<Vec<_>, _> = rows.iter().map(row_to_project).collect();
		let projects = projects?;
		tracing::debug!(%owner_id, count = projects.len(), "listed projects for owner");
		Ok(projects)
	}

	/// Update name and description. The owner is never touched.
	#[tracing::instrument(skip(self, project, name, description), fields(project_id = %project.id()))]
	pub async fn update_project(
		&self,
		project: &AuthorizedProject,
		name: &str,
		description: Option<&str>,
	) -> Result<Project, DbError> {
		let now = timestamp::now();
		let result = sqlx::query(
			r#"
			UPDATE projects
			SET name = ?, description = ?, updated_at = ?
			WHERE id = ? AND owner_id = ?
			"#,
		)
		.bind(name)
		.bind(description)
		.bind(timestamp::format(now))
		.bind(project.id().to_string())
		.bind(project.project().owner_id.to_string())
		.execute(&self.pool)
		.await?;

		if result.rows_affected() == 0 {
			return Err(DbError::NotFound("project".to_string()));
		}

		tracing::debug!(project_id = %project.id(), "project updated");
		Ok(Project {
			name: name.to_string(),
			description: description.map(str::to_string),
			updated_at: now,
			..project.project().clone()
		})
	}

	/// Delete a project and every secret in it.
	///
	/// The secrets are removed explicitly inside the same transaction so the
	/// cascade does not depend on the connection's foreign key setting.
	#[tracing::instrument(skip(self, project), fields(project_id = %project.id()))]
	pub async fn delete_project(&self, project: AuthorizedProject) -> Result<(), DbError> {
		let project_id = project.id().to_string();
		let mut tx = self.pool.begin().await?;

		let secrets = sqlx::query("DELETE FROM secrets WHERE project_id = ?")
			.bind(&project_id)
			.execute(&mut *tx)
			.await?;

		let deleted = sqlx::query("DELETE FROM projects WHERE id = ? AND owner_id = ?")
			.bind(&project_id)
			.bind(project.project().owner_id.to_string())
			.execute(&mut *tx)
			.await?;

		if deleted.rows_affected() == 0 {
			tx.rollback().await?;
			return Err(DbError::NotFound("project".to_string()));
		}

		tx.commit().await?;

		tracing::debug!(
			%project_id,
			secrets_deleted = secrets.rows_affected(),
			"project deleted"
		);
		Ok(())
	}
}

#[async_trait]
impl ProjectStore for ProjectRepository {
	async fn create_project(&self, project: &Project) -> Result<(), DbError> {
		self.create_project(project).await
	}

	async fn authorize(
		&self,
		owner_id: &UserId,
		project_id: &ProjectId,
	) -> Result<Option<AuthorizedProject>, DbError> {
		self.authorize(owner_id, project_id).await
	}

	async fn list_projects_for_owner(&self, owner_id: &UserId) -> Result<Vec<Project>, DbError> {
		self.list_projects_for_owner(owner_id).await
	}

	async fn update_project(
		&self,
		project: &AuthorizedProject,
		name: &str,
		description: Option<&str>,
	) -> Result<Project, DbError> {
		self.update_project(project, name, description).await
	}

	async fn delete_project(&self, project: AuthorizedProject) -> Result<(), DbError> {
		self.delete_project(project).await
	}
}

fn parse_uuid(value: &str, field: &str) -> Result<Uuid, DbError> {
	Uuid::parse_str(value).map_err(|e| DbError::Internal(format!("Invalid {field}: {e}")))
}

fn row_to_project(row: &sqlx::sqlite::SqliteRow) -> Result<Project, DbError> {
	let id: String = row.get("id");
	let owner_id: String = row.get("owner_id");
	let created_at: String = row.get("created_at");
	let updated_at: String = row.get("updated_at");

	Ok(Project {
		id: ProjectId::new(parse_uuid(&id, "project ID")?),
		owner_id: UserId::new(parse_uuid(&owner_id, "owner ID")?),
		name: row.get("name"),
		description: row.get("description"),
		created_at: timestamp::parse(&created_at, "created_at")?,
		updated_at: timestamp::parse(&updated_at, "updated_at")?,
	})
}
