// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Partial configuration produced by a single source.

use serde::Deserialize;

use crate::sections::{
	DatabaseConfigLayer, EncryptionConfigLayer, LoggingConfigLayer, RuntimeConfigLayer,
};

/// One source's view of the configuration. Every section is optional so
/// sources only override what they actually set.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ServerConfigLayer {
	#[serde(default)]
	pub database: Option<DatabaseConfigLayer>,
	#[serde(default)]
	pub encryption: Option<EncryptionConfigLayer>,
	#[serde(default)]
	pub logging: Option<LoggingConfigLayer>,
	#[serde(default)]
	pub runtime: Option<RuntimeConfigLayer>,
}

fn merge_section<T>(target: &mut Option<T>, other: Option<T>, merge: impl FnOnce(&mut T, T)) {
	match (target.as_mut(), other) {
		(Some(current), Some(other)) => merge(current, other),
		(None, Some(other)) => *target = Some(other),
		(_, None) => {}
	}
}

impl ServerConfigLayer {
	/// Merge `other` on top of `self`; values set in `other` win.
	pub fn merge(&mut self, other: ServerConfigLayer) {
		merge_section(&mut self.database, other.database, DatabaseConfigLayer::merge);
		merge_section(
			&mut self.encryption,
			other.encryption,
			EncryptionConfigLayer::merge,
		);
		merge_section(&mut self.logging, other.logging, LoggingConfigLayer::merge);
		merge_section(&mut self.runtime, other.runtime, RuntimeConfigLayer::merge);
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use proptest::prelude::*;

	#[test]
	fn merge_keeps_unset_sections() {
		let mut base = ServerConfigLayer {
			database: Some(DatabaseConfigLayer {
				url: Some("sqlite:base.db".to_string()),
			}),
			..Default::default()
		};
		base.merge(ServerConfigLayer {
			logging: Some(LoggingConfigLayer {
				level: Some("debug".to_string()),
			}),
			..Default::default()
		});

		assert_eq!(
			base.database.unwrap().url.as_deref(),
			Some("sqlite:base.db")
		);
		assert_eq!(base.logging.unwrap().level.as_deref(), Some("debug"));
	}

	#[test]
	fn merge_overrides_set_fields() {
		let mut base = ServerConfigLayer {
			database: Some(DatabaseConfigLayer {
				url: Some("sqlite:base.db".to_string()),
			}),
			..Default::default()
		};
		base.merge(ServerConfigLayer {
			database: Some(DatabaseConfigLayer {
				url: Some("sqlite:override.db".to_string()),
			}),
			..Default::default()
		});

		assert_eq!(
			base.database.unwrap().url.as_deref(),
			Some("sqlite:override.db")
		);
	}

	proptest! {
		#[test]
		fn later_set_value_always_wins(
			first in proptest::option::of("[a-z]{1,8}"),
			second in proptest::option::of("[a-z]{1,8}"),
		) {
			let layer = |level: Option<String>| ServerConfigLayer {
				logging: Some(LoggingConfigLayer { level }),
				..Default::default()
			};

			let mut merged = layer(first.clone());
			merged.merge(layer(second.clone()));

			let expected = second.or(first);
			prop_assert_eq!(merged.logging.and_then(|l| l.level), expected);
		}
	}
}
