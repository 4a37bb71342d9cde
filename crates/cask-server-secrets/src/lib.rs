// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Encrypted, ownership-scoped secret storage.
//!
//! Call flow for every operation:
//!
//! ```text
//! caller ─► SecretsService ─► OwnershipBoundary ─► ProjectStore (id AND owner)
//!                 │
//!                 ├─► validation (before any crypto or I/O)
//!                 ├─► SecretCipher (seal on write, open on single read)
//!                 └─► SecretStore (sealed values only)
//! ```
//!
//! Values are sealed with AES-256-GCM under one master key supplied by
//! configuration. The key is normalized to 32 bytes by [`normalize_key`] and
//! lives only inside [`SecretCipher`].

pub mod api;
pub mod encryption;
pub mod error;
pub mod key;
pub mod ownership;
pub mod projects;
pub mod service;
pub mod validation;

pub use api::*;
pub use encryption::{decrypt, encrypt, CipherBundle, SecretCipher, KEY_SIZE, NONCE_SIZE, TAG_SIZE};
pub use error::{SecretsError, SecretsResult};
pub use key::normalize_key;
pub use ownership::{require_principal, OwnershipBoundary};
pub use projects::ProjectsService;
pub use service::SecretsService;
pub use validation::{parse_project_id, parse_secret_id};

use cask_server_db::{ProjectRepository, SecretRepository};

/// Secrets service backed by the SQLite repositories.
pub type SqliteSecretsService = SecretsService<ProjectRepository, SecretRepository>;

/// Projects service backed by the SQLite repository.
pub type SqliteProjectsService = ProjectsService<ProjectRepository>;
