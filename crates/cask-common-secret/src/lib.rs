// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Wrapper type for sensitive values.
//!
//! [`Secret<T>`] keeps a value out of logs: `Debug` and `Display` always print
//! [`REDACTED`], and the inner value is zeroized on drop. The value is only
//! reachable through [`Secret::expose`].
//!
//! With the `serde` feature, deserialization reads the plain value and
//! serialization writes it back out. Serialization is meant for responses
//! that intentionally carry the secret (e.g. a decrypted value returned to
//! its owner), never for logging.

use std::fmt;

use zeroize::{Zeroize, ZeroizeOnDrop};

/// Placeholder printed instead of a secret value.
pub const REDACTED: &str = "[REDACTED]";

/// A value that must never appear in logs.
#[derive(Clone, PartialEq, Eq)]
pub struct Secret<T: Zeroize>(T);

/// The common case: a secret string.
pub type SecretString = Secret<String>;

impl<T: Zeroize> Secret<T> {
	pub fn new(value: T) -> Self {
		Self(value)
	}

	/// Borrow the inner value.
	pub fn expose(&self) -> &T {
		&self.0
	}
}

impl<T: Zeroize> Drop for Secret<T> {
	fn drop(&mut self) {
		self.0.zeroize();
	}
}

impl<T: Zeroize> ZeroizeOnDrop for Secret<T> {}

impl<T: Zeroize> fmt::Debug for Secret<T> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(REDACTED)
	}
}

impl<T: Zeroize> fmt::Display for Secret<T> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(REDACTED)
	}
}

impl<T: Zeroize> From<T> for Secret<T> {
	fn from(value: T) -> Self {
		Self::new(value)
	}
}

impl From<&str> for SecretString {
	fn from(value: &str) -> Self {
		Self::new(value.to_string())
	}
}

#[cfg(feature = "serde")]
impl<T: Zeroize + serde::Serialize> serde::Serialize for Secret<T> {
	fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
		self.0.serialize(serializer)
	}
}

#[cfg(feature = "serde")]
impl<'de, T: Zeroize + serde::Deserialize<'de>> serde::Deserialize<'de> for Secret<T> {
	fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
		T::deserialize(deserializer).map(Secret::new)
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use proptest::prelude::*;

	#[test]
	fn debug_is_redacted() {
		let secret = SecretString::new("hunter2".to_string());
		assert_eq!(format!("{secret:?}"), REDACTED);
	}

	#[test]
	fn display_is_redacted() {
		let secret = SecretString::from("hunter2");
		assert_eq!(secret.to_string(), REDACTED);
	}

	#[test]
	fn expose_returns_inner_value() {
		let secret = SecretString::from("hunter2");
		assert_eq!(secret.expose(), "hunter2");
	}

	#[test]
	fn redacted_inside_derived_debug() {
		#[derive(Debug)]
		#[allow(dead_code)]
		struct Config {
			name: String,
			token: SecretString,
		}

		let config = Config {
			name: "db".to_string(),
			token: SecretString::from("sk-live-123"),
		};
		let rendered = format!("{config:?}");
		assert!(rendered.contains("db"));
		assert!(!rendered.contains("sk-live-123"));
	}

	#[test]
	fn serde_roundtrip_keeps_value() {
		let secret: SecretString = serde_json::from_str("\"abc\"").unwrap();
		assert_eq!(secret.expose(), "abc");
		assert_eq!(serde_json::to_string(&secret).unwrap(), "\"abc\"");
	}

	proptest! {
		#[test]
		fn debug_never_contains_value(value in "[a-zA-Z0-9]{8,64}") {
			let secret = SecretString::new(value.clone());
			let rendered = format!("{secret:?} {secret}");
			prop_assert!(!rendered.contains(&value));
		}
	}
}
