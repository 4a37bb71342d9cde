// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Identity types consumed by the Cask secret store.
//!
//! Authentication itself (signup, login, token verification) happens
//! elsewhere. This crate only models its outcome: an optional [`Principal`]
//! attached to each call via [`AuthContext`], plus the typed identifiers and
//! the [`Project`] entity that ownership checks are expressed against.

pub mod principal;
pub mod project;
pub mod types;

pub use principal::{AuthContext, Principal};
pub use project::Project;
pub use types::{ProjectId, SecretId, UserId};
