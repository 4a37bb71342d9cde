// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

#[derive(Debug, thiserror::Error)]
pub enum DbError {
	#[error("Database error: {0}")]
	Sqlx(#[from] sqlx::Error),

	#[error("Not found: {0}")]
	NotFound(String),

	#[error("Conflict: {0}")]
	Conflict(String),

	#[error("Invalid input: {0}")]
	InvalidInput(String),

	#[error("Internal: {0}")]
	Internal(String),
}

impl DbError {
	/// True when the underlying database rejected a write on a UNIQUE constraint.
	pub fn is_unique_violation(&self) -> bool {
		match self {
			DbError::Sqlx(sqlx::Error::Database(db_err)) => db_err.is_unique_violation(),
			_ => false,
		}
	}
}

pub type Result<T> = std::result::Result<T, DbError>;
