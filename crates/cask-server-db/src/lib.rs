// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Database layer for the Cask secret store.
//!
//! - [`ProjectRepository`]: owner-scoped project storage and the ownership
//!   query that produces [`AuthorizedProject`]
//! - [`SecretRepository`]: per-project secret rows holding sealed values
//!
//! Secret operations take an [`AuthorizedProject`], which can only be
//! obtained from [`ProjectStore::authorize`]. There is no way to reach a
//! secret row without first passing the ownership check.

pub mod error;
pub mod pool;
pub mod project;
pub mod secret;
pub mod testing;
mod timestamp;

pub use error::{DbError, Result};
pub use pool::{create_pool, run_migrations};
pub use project::{AuthorizedProject, ProjectRepository, ProjectStore};
pub use secret::{SecretMetadata, SecretRepository, SecretStore, StoredSecret};
