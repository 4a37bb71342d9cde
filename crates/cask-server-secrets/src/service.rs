// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Secret lifecycle operations.
//!
//! Every operation runs the same sequence and stops at the first failure:
//! authenticate, authorize the project, validate input, encrypt or decrypt,
//! persist, respond. No ciphertext or storage access happens before the
//! ownership check has passed.

use std::sync::Arc;

use cask_server_auth::{AuthContext, ProjectId, SecretId};
use cask_server_db::{ProjectStore, SecretStore};

use crate::api::{
	CreateSecretRequest, ListSecretsResponse, SecretDeletedResponse, SecretMetadataResponse,
	SecretValueResponse, UpdateSecretRequest,
};
use crate::encryption::{CipherBundle, SecretCipher};
use crate::error::{SecretsError, SecretsResult};
use crate::ownership::OwnershipBoundary;
use crate::validation::{validate_create, validate_update};

pub struct SecretsService<P, S> {
	ownership: OwnershipBoundary<P>,
	secrets: Arc<S>,
	cipher: Arc<SecretCipher>,
}

impl<P, S> Clone for SecretsService<P, S> {
	fn clone(&self) -> Self {
		Self {
			ownership: self.ownership.clone(),
			secrets: Arc::clone(&self.secrets),
			cipher: Arc::clone(&self.cipher),
		}
	}
}

impl<P: ProjectStore, S: SecretStore> SecretsService<P, S> {
	pub fn new(projects: Arc<P>, secrets: Arc<S>, cipher: Arc<SecretCipher>) -> Self {
		Self {
			ownership: OwnershipBoundary::new(projects),
			secrets,
			cipher,
		}
	}

	/// Metadata for every secret in the project, newest first. No values.
	#[tracing::instrument(skip(self, ctx), fields(%project_id))]
	pub async fn list_secrets(
		&self,
		ctx: &AuthContext,
		project_id: &ProjectId,
	) -> SecretsResult<ListSecretsResponse> {
		let project = self.ownership.authorize(ctx, project_id).await?;

		let secrets = self
			.secrets
			.list_secrets(&project)
			.await
			.map_err(|e| SecretsError::from_db(e, "secret"))?;

		Ok(ListSecretsResponse {
			secrets: secrets.into_iter().map(Into::into).collect(),
		})
	}

	/// Seal and store a new secret. The key is trimmed and must be unique
	/// within the project.
	#[tracing::instrument(skip(self, ctx, request), fields(%project_id))]
	pub async fn create_secret(
		&self,
		ctx: &AuthContext,
		project_id: &ProjectId,
		request: CreateSecretRequest,
	) -> SecretsResult<SecretMetadataResponse> {
		let project = self.ownership.authorize(ctx, project_id).await?;
		let new_secret = validate_create(&request)?;

		let sealed = self.cipher.seal(new_secret.value.expose())?.to_stored()?;
		let metadata = self
			.secrets
			.create_secret(&project, new_secret.key, &sealed)
			.await
			.map_err(|e| SecretsError::from_db(e, "secret"))?;

		tracing::info!(secret_id = %metadata.id, %project_id, key = %metadata.key, "secret created");
		Ok(metadata.into())
	}

	/// Fetch one secret and decrypt its value.
	#[tracing::instrument(skip(self, ctx), fields(%project_id, %secret_id))]
	pub async fn get_secret(
		&self,
		ctx: &AuthContext,
		project_id: &ProjectId,
		secret_id: &SecretId,
	) -> SecretsResult<SecretValueResponse> {
		let project = self.ownership.authorize(ctx, project_id).await?;

		let stored = self
			.secrets
			.get_secret(&project, secret_id)
			.await
			.map_err(|e| SecretsError::from_db(e, "secret"))?;

		let value = CipherBundle::from_stored(&stored.sealed_value)
			.and_then(|bundle| self.cipher.open(&bundle))
			.inspect_err(|_| {
				tracing::error!(%secret_id, %project_id, "stored secret failed to decrypt");
			})?;

		tracing::debug!(%secret_id, "secret value read");
		Ok(SecretValueResponse {
			metadata: stored.metadata.into(),
			value,
		})
	}

	/// Replace a secret's value. The key is unchanged; `created_at` is kept.
	#[tracing::instrument(skip(self, ctx, request), fields(%project_id, %secret_id))]
	pub async fn update_secret(
		&self,
		ctx: &AuthContext,
		project_id: &ProjectId,
		secret_id: &SecretId,
		request: UpdateSecretRequest,
	) -> SecretsResult<SecretMetadataResponse> {
		let project = self.ownership.authorize(ctx, project_id).await?;
		let value = validate_update(&request)?;

		let sealed = self.cipher.seal(value.expose())?.to_stored()?;
		let metadata = self
			.secrets
			.update_secret_value(&project, secret_id, &sealed)
			.await
			.map_err(|e| SecretsError::from_db(e, "secret"))?;

		tracing::info!(%secret_id, %project_id, "secret updated");
		Ok(metadata.into())
	}

	#[tracing::instrument(skip(self, ctx), fields(%project_id, %secret_id))]
	pub async fn delete_secret(
		&self,
		ctx: &AuthContext,
		project_id: &ProjectId,
		secret_id: &SecretId,
	) -> SecretsResult<SecretDeletedResponse> {
		let project = self.ownership.authorize(ctx, project_id).await?;

		self.secrets
			.delete_secret(&project, secret_id)
			.await
			.map_err(|e| SecretsError::from_db(e, "secret"))?;

		tracing::info!(%secret_id, %project_id, "secret deleted");
		Ok(SecretDeletedResponse {
			id: *secret_id,
			deleted: true,
		})
	}
}
