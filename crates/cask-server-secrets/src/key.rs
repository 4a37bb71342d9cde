// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Master key normalization.

use sha2::{Digest, Sha256};
use zeroize::Zeroizing;

use crate::encryption::KEY_SIZE;

/// Turn an operator-supplied master key into 32 key bytes.
///
/// A string of exactly 64 hex characters is decoded as the raw key. Anything
/// else, including the empty string, is hashed with SHA-256. Never fails.
pub fn normalize_key(secret: &str) -> Zeroizing<[u8; KEY_SIZE]> {
	let mut key = Zeroizing::new([0u8; KEY_SIZE]);

	if secret.len() == KEY_SIZE * 2 && hex::decode_to_slice(secret, &mut key[..]).is_ok() {
		return key;
	}

	let digest = Sha256::digest(secret.as_bytes());
	key.copy_from_slice(&digest);
	key
}
