// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePool, SqliteSynchronous};
use std::str::FromStr;

use crate::error::DbError;

/// Create a SqlitePool with WAL mode and common settings.
///
/// # Arguments
/// * `database_url` - SQLite connection string (e.g., "sqlite:./cask.db")
///
/// # Errors
/// Returns `DbError::Internal` if the URL is invalid or connection fails.
#[tracing::instrument(skip(database_url))]
pub async fn create_pool(database_url: &str) -> Result<SqlitePool, DbError> {
	let options = SqliteConnectOptions::from_str(database_url)
		.map_err(|e| DbError::Internal(format!("Invalid database URL: {e}")))?
		.journal_mode(SqliteJournalMode::Wal)
		.synchronous(SqliteSynchronous::Normal)
		.foreign_keys(true)
		.create_if_missing(true);

	let pool = SqlitePool::connect_with(options).await?;

	tracing::debug!("database pool created");
	Ok(pool)
}

const SCHEMA: &[&str] = &[
	r#"
	CREATE TABLE IF NOT EXISTS projects (
		id TEXT PRIMARY KEY NOT NULL,
		owner_id TEXT NOT NULL,
		name TEXT NOT NULL,
		description TEXT,
		created_at TEXT NOT NULL,
		updated_at TEXT NOT NULL
	)
	"#,
	"CREATE INDEX IF NOT EXISTS idx_projects_owner ON projects(owner_id)",
	r#"
	CREATE TABLE IF NOT EXISTS secrets (
		id TEXT PRIMARY KEY NOT NULL,
		project_id TEXT NOT NULL REFERENCES projects(id) ON DELETE CASCADE,
		key TEXT NOT NULL,
		encrypted_value TEXT NOT NULL,
		created_at TEXT NOT NULL,
		updated_at TEXT NOT NULL,
		UNIQUE (project_id, key)
	)
	"#,
	"CREATE INDEX IF NOT EXISTS idx_secrets_project_created ON secrets(project_id, created_at)",
];

/// Create the projects and secrets tables if they do not exist.
///
/// Idempotent; safe to run on every startup.
#[tracing::instrument(skip(pool))]
pub async fn run_migrations(pool: &SqlitePool) -> Result<(), DbError> {
	for statement in SCHEMA {
		sqlx::query(statement).execute(pool).await?;
	}

	tracing::debug!(statements = SCHEMA.len(), "database schema applied");
	Ok(())
}
