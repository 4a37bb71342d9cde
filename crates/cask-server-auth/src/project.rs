// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Projects group secrets and carry the ownership that guards them.

use chrono::{DateTime, SubsecRound, Utc};
use serde::{Deserialize, Serialize};

use crate::types::{ProjectId, UserId};

/// A named collection of secrets owned by exactly one user.
///
/// `owner_id` is fixed at creation; nothing updates it afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Project {
	pub id: ProjectId,
	pub owner_id: UserId,
	pub name: String,
	pub description: Option<String>,
	pub created_at: DateTime<Utc>,
	pub updated_at: DateTime<Utc>,
}

impl Project {
	/// Build a new project owned by `owner_id`, timestamped now at microsecond
	/// precision.
	pub fn new(owner_id: UserId, name: impl Into<String>, description: Option<String>) -> Self {
		let now = Utc::now().trunc_subsecs(6);
		Self {
			id: ProjectId::generate(),
			owner_id,
			name: name.into(),
			description,
			created_at: now,
			updated_at: now,
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn new_project_is_owned_by_creator() {
		let owner = UserId::generate();
		let project = Project::new(owner, "billing", None);
		assert_eq!(project.owner_id, owner);
		assert_eq!(project.created_at, project.updated_at);
	}
}
