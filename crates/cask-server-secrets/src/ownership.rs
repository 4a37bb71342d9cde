// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! The ownership check in front of every secret operation.
//!
//! A project owned by someone else and a project that does not exist produce
//! the same [`SecretsError::NotFound`], so a caller learns nothing about
//! projects they do not own.

use std::sync::Arc;

use cask_server_auth::{AuthContext, Principal, ProjectId};
use cask_server_db::{AuthorizedProject, ProjectStore};

use crate::error::{SecretsError, SecretsResult};

/// The authenticated principal, or [`SecretsError::Unauthenticated`].
pub fn require_principal(ctx: &AuthContext) -> SecretsResult<&Principal> {
	ctx.principal().ok_or(SecretsError::Unauthenticated)
}

pub struct OwnershipBoundary<P> {
	projects: Arc<P>,
}

impl<P> Clone for OwnershipBoundary<P> {
	fn clone(&self) -> Self {
		Self {
			projects: Arc::clone(&self.projects),
		}
	}
}

impl<P: ProjectStore> OwnershipBoundary<P> {
	pub fn new(projects: Arc<P>) -> Self {
		Self { projects }
	}

	/// Confirm `principal` owns `project_id`.
	#[tracing::instrument(skip(self, principal), fields(user_id = %principal.id, %project_id))]
	pub async fn authorize_project(
		&self,
		principal: &Principal,
		project_id: &ProjectId,
	) -> SecretsResult<AuthorizedProject> {
		let authorized = self
			.projects
			.authorize(&principal.id, project_id)
			.await
			.map_err(|e| SecretsError::from_db(e, "project"))?;

		match authorized {
			Some(project) => Ok(project),
			None => {
				tracing::warn!(user_id = %principal.id, %project_id, "project not found for principal");
				Err(SecretsError::NotFound("project"))
			}
		}
	}

	/// Authenticate then authorize in one step.
	pub async fn authorize(
		&self,
		ctx: &AuthContext,
		project_id: &ProjectId,
	) -> SecretsResult<AuthorizedProject> {
		let principal = require_principal(ctx)?;
		self.authorize_project(principal, project_id).await
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use cask_server_auth::{Project, UserId};
	use cask_server_db::{testing::create_test_pool, ProjectRepository};

	async fn boundary_with_project() -> (OwnershipBoundary<ProjectRepository>, Principal, Project) {
		let repo = ProjectRepository::new(create_test_pool().await);
		let owner = Principal::new(UserId::generate(), "owner@example.com");
		let project = Project::new(owner.id, "payments", None);
		repo.create_project(&project).await.unwrap();
		(OwnershipBoundary::new(Arc::new(repo)), owner, project)
	}

	#[tokio::test]
	async fn owner_is_authorized() {
		let (boundary, owner, project) = boundary_with_project().await;
		let authorized = boundary.authorize_project(&owner, &project.id).await.unwrap();
		assert_eq!(authorized.id(), &project.id);
	}

	#[tokio::test]
	async fn foreign_and_missing_projects_look_the_same() {
		let (boundary, _owner, project) = boundary_with_project().await;
		let stranger = Principal::new(UserId::generate(), "stranger@example.com");

		let foreign = boundary.authorize_project(&stranger, &project.id).await;
		let missing = boundary
			.authorize_project(&stranger, &ProjectId::generate())
			.await;

		let foreign = foreign.unwrap_err();
		let missing = missing.unwrap_err();
		assert!(matches!(foreign, SecretsError::NotFound("project")));
		assert_eq!(foreign.status_code(), missing.status_code());
		assert_eq!(foreign.client_message(), missing.client_message());
	}

	#[tokio::test]
	async fn anonymous_context_is_unauthenticated() {
		let (boundary, _owner, project) = boundary_with_project().await;
		let result = boundary
			.authorize(&AuthContext::unauthenticated(), &project.id)
			.await;
		assert!(matches!(result, Err(SecretsError::Unauthenticated)));
	}
}
