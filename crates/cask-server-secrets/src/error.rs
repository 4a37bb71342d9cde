// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use cask_server_db::DbError;
use http::StatusCode;

/// Errors surfaced by the secrets and projects services.
///
/// Each variant maps to exactly one transport status. Messages from
/// [`SecretsError::client_message`] are safe to return to callers; the
/// detail behind `Internal` is logged, never returned.
#[derive(Debug, thiserror::Error)]
pub enum SecretsError {
	#[error("authentication required")]
	Unauthenticated,

	#[error("invalid input: {0}")]
	InvalidInput(String),

	#[error("{0} not found")]
	NotFound(&'static str),

	#[error("conflict: {0}")]
	Conflict(String),

	#[error("decryption failed")]
	DecryptionFailed,

	#[error("internal error")]
	Internal,
}

pub type SecretsResult<T> = std::result::Result<T, SecretsError>;

impl SecretsError {
	pub fn status_code(&self) -> StatusCode {
		match self {
			SecretsError::Unauthenticated => StatusCode::UNAUTHORIZED,
			SecretsError::InvalidInput(_) => StatusCode::BAD_REQUEST,
			SecretsError::NotFound(_) => StatusCode::NOT_FOUND,
			SecretsError::Conflict(_) => StatusCode::CONFLICT,
			SecretsError::DecryptionFailed | SecretsError::Internal => {
				StatusCode::INTERNAL_SERVER_ERROR
			}
		}
	}

	/// Stable machine-readable code for the error body.
	pub fn error_code(&self) -> &'static str {
		match self {
			SecretsError::Unauthenticated => "unauthenticated",
			SecretsError::InvalidInput(_) => "invalid_input",
			SecretsError::NotFound(_) => "not_found",
			SecretsError::Conflict(_) => "conflict",
			SecretsError::DecryptionFailed => "decryption_failed",
			SecretsError::Internal => "internal_error",
		}
	}

	pub fn client_message(&self) -> String {
		self.to_string()
	}

	/// Map a storage error for an operation on `entity`.
	///
	/// Not-found and conflict keep their meaning. Anything else is logged and
	/// collapsed to [`SecretsError::Internal`].
	pub fn from_db(err: DbError, entity: &'static str) -> Self {
		match err {
			DbError::NotFound(_) => SecretsError::NotFound(entity),
			DbError::Conflict(message) => SecretsError::Conflict(message),
			DbError::InvalidInput(message) => SecretsError::InvalidInput(message),
			other => {
				tracing::error!(error = %other, entity, "storage failure");
				SecretsError::Internal
			}
		}
	}
}
