// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Project management for the authenticated user.

use std::sync::Arc;

use cask_server_auth::{AuthContext, Project, ProjectId};
use cask_server_db::ProjectStore;

use crate::api::{
	CreateProjectRequest, ListProjectsResponse, ProjectDeletedResponse, ProjectResponse,
	UpdateProjectRequest,
};
use crate::error::{SecretsError, SecretsResult};
use crate::ownership::{require_principal, OwnershipBoundary};
use crate::validation::{validate_create_project, validate_update_project};

pub struct ProjectsService<P> {
	projects: Arc<P>,
	ownership: OwnershipBoundary<P>,
}

impl<P> Clone for ProjectsService<P> {
	fn clone(&self) -> Self {
		Self {
			projects: Arc::clone(&self.projects),
			ownership: self.ownership.clone(),
		}
	}
}

impl<P: ProjectStore> ProjectsService<P> {
	pub fn new(projects: Arc<P>) -> Self {
		Self {
			ownership: OwnershipBoundary::new(Arc::clone(&projects)),
			projects,
		}
	}

	/// Create a project owned by the caller.
	#[tracing::instrument(skip(self, ctx, request))]
	pub async fn create_project(
		&self,
		ctx: &AuthContext,
		request: CreateProjectRequest,
	) -> SecretsResult<ProjectResponse> {
		let principal = require_principal(ctx)?;
		let fields = validate_create_project(&request)?;

		let project = Project::new(principal.id, fields.name, fields.description);
		self.projects
			.create_project(&project)
			.await
			.map_err(|e| SecretsError::from_db(e, "project"))?;

		tracing::info!(project_id = %project.id, owner_id = %principal.id, "project created");
		Ok(project.into())
	}

	/// The caller's projects, newest first.
	#[tracing::instrument(skip(self, ctx))]
	pub async fn list_projects(&self, ctx: &AuthContext) -> SecretsResult<ListProjectsResponse> {
		let principal = require_principal(ctx)?;

		let projects = self
			.projects
			.list_projects_for_owner(&principal.id)
			.await
			.map_err(|e| SecretsError::from_db(e, "project"))?;

		Ok(ListProjectsResponse {
			projects: projects.into_iter().map(Into::into).collect(),
		})
	}

	#[tracing::instrument(skip(self, ctx), fields(%project_id))]
	pub async fn get_project(
		&self,
		ctx: &AuthContext,
		project_id: &ProjectId,
	) -> SecretsResult<ProjectResponse> {
		let project = self.ownership.authorize(ctx, project_id).await?;
		Ok(project.into_project().into())
	}

	/// Rename or re-describe a project. Ownership never changes.
	#[tracing::instrument(skip(self, ctx, request), fields(%project_id))]
	pub async fn update_project(
		&self,
		ctx: &AuthContext,
		project_id: &ProjectId,
		request: UpdateProjectRequest,
	) -> SecretsResult<ProjectResponse> {
		let project = self.ownership.authorize(ctx, project_id).await?;
		let fields = validate_update_project(&request)?;

		let updated = self
			.projects
			.update_project(&project, &fields.name, fields.description.as_deref())
			.await
			.map_err(|e| SecretsError::from_db(e, "project"))?;

		tracing::info!(%project_id, "project updated");
		Ok(updated.into())
	}

	/// Delete a project together with all of its secrets.
	#[tracing::instrument(skip(self, ctx), fields(%project_id))]
	pub async fn delete_project(
		&self,
		ctx: &AuthContext,
		project_id: &ProjectId,
	) -> SecretsResult<ProjectDeletedResponse> {
		let project = self.ownership.authorize(ctx, project_id).await?;

		self.projects
			.delete_project(project)
			.await
			.map_err(|e| SecretsError::from_db(e, "project"))?;

		tracing::info!(%project_id, "project deleted");
		Ok(ProjectDeletedResponse {
			id: *project_id,
			deleted: true,
		})
	}
}
