// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Helpers for tests that need a real schema.

use cask_server_auth::{ProjectId, SecretId};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use std::str::FromStr;

/// In-memory database with the full schema applied.
///
/// Limited to one connection: every `:memory:` connection is its own database.
pub async fn create_test_pool() -> SqlitePool {
	let options = SqliteConnectOptions::from_str(":memory:")
		.unwrap()
		.foreign_keys(true);

	let pool = SqlitePoolOptions::new()
		.max_connections(1)
		.connect_with(options)
		.await
		.expect("Failed to create test pool");

	crate::pool::run_migrations(&pool)
		.await
		.expect("Failed to apply schema");
	pool
}

/// Insert a secret row directly, bypassing the repository.
pub async fn insert_secret_row(pool: &SqlitePool, project_id: &ProjectId, key: &str) -> SecretId {
	let id = SecretId::generate();
	let now = crate::timestamp::format(crate::timestamp::now());
	sqlx::query(
		r#"
		INSERT INTO secrets (id, project_id, key, encrypted_value, created_at, updated_at)
		VALUES (?, ?, ?, '{}', ?, ?)
		"#,
	)
	.bind(id.to_string())
	.bind(project_id.to_string())
	.bind(key)
	.bind(&now)
	.bind(&now)
	.execute(pool)
	.await
	.unwrap();
	id
}

/// Overwrite a secret's stored value, bypassing the repository.
pub async fn overwrite_sealed_value(pool: &SqlitePool, secret_id: &SecretId, sealed_value: &str) {
	sqlx::query("UPDATE secrets SET encrypted_value = ? WHERE id = ?")
		.bind(sealed_value)
		.bind(secret_id.to_string())
		.execute(pool)
		.await
		.unwrap();
}
