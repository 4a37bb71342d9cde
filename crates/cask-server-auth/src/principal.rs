// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! The authenticated caller.
//!
//! The authentication layer resolves a bearer token into a [`Principal`] and
//! attaches it to the call through [`AuthContext`]. A context without a
//! principal is an unauthenticated call.

use serde::{Deserialize, Serialize};

use crate::types::UserId;

/// Authenticated identity, as resolved by the authentication layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Principal {
	pub id: UserId,
	pub email: String,
}

impl Principal {
	pub fn new(id: UserId, email: impl Into<String>) -> Self {
		Self {
			id,
			email: email.into(),
		}
	}
}

/// Authentication state for a single call.
#[derive(Debug, Clone, Default)]
pub struct AuthContext {
	/// The caller, if authentication succeeded.
	pub current_user: Option<Principal>,
}

impl AuthContext {
	/// Create a new unauthenticated context.
	pub fn unauthenticated() -> Self {
		Self::default()
	}

	/// Create a context for an authenticated principal.
	pub fn authenticated(principal: Principal) -> Self {
		Self {
			current_user: Some(principal),
		}
	}

	pub fn is_authenticated(&self) -> bool {
		self.current_user.is_some()
	}

	pub fn principal(&self) -> Option<&Principal> {
		self.current_user.as_ref()
	}
}
