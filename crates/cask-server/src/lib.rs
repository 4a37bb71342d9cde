// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! Cask server process wiring.

use std::sync::Arc;

use cask_server_config::ServerConfig;
use cask_server_db::{ProjectRepository, SecretRepository};
use cask_server_secrets::{
	ProjectsService, SecretCipher, SecretsService, SqliteProjectsService, SqliteSecretsService,
};
use sqlx::SqlitePool;

pub mod version;

/// Shared state handed to whatever transport fronts the services.
#[derive(Clone)]
pub struct AppState {
	pub pool: SqlitePool,
	pub secrets: SqliteSecretsService,
	pub projects: SqliteProjectsService,
}

/// Build the services over an already-migrated pool.
pub fn create_app_state(pool: SqlitePool, config: &ServerConfig) -> AppState {
	let project_repo = Arc::new(ProjectRepository::new(pool.clone()));
	let secret_repo = Arc::new(SecretRepository::new(pool.clone()));
	let cipher = Arc::new(SecretCipher::from_master_key(&config.encryption.master_key));

	AppState {
		secrets: SecretsService::new(Arc::clone(&project_repo), secret_repo, cipher),
		projects: ProjectsService::new(project_repo),
		pool,
	}
}
