// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Authenticated encryption of secret values.
//!
//! AES-256-GCM with a 128-bit random nonce and a detached 128-bit tag. A
//! sealed value is a [`CipherBundle`]: ciphertext, nonce and tag, each
//! lowercase hex, stored as a JSON object.

use aes_gcm::{
	aead::{consts::U16, AeadInPlace, KeyInit, OsRng},
	aes::Aes256,
	AesGcm, Key, Nonce, Tag,
};
use cask_common_secret::SecretString;
use rand::RngCore;
use serde::{Deserialize, Serialize};
use zeroize::Zeroizing;

use crate::error::{SecretsError, SecretsResult};
use crate::key::normalize_key;

/// Size of encryption keys in bytes (256 bits for AES-256).
pub const KEY_SIZE: usize = 32;

/// Size of the GCM nonce in bytes.
pub const NONCE_SIZE: usize = 16;

/// Size of the GCM authentication tag in bytes.
pub const TAG_SIZE: usize = 16;

type Aes256Gcm16 = AesGcm<Aes256, U16>;

/// A sealed secret value.
///
/// Produced only by [`encrypt`]. Nothing in it reveals the plaintext beyond
/// its length.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CipherBundle {
	pub ciphertext: String,
	pub nonce: String,
	pub tag: String,
}

struct DecodedBundle {
	ciphertext: Vec<u8>,
	nonce: [u8; NONCE_SIZE],
	tag: [u8; TAG_SIZE],
}

impl CipherBundle {
	/// Serialize for storage.
	pub fn to_stored(&self) -> SecretsResult<String> {
		serde_json::to_string(self).map_err(|e| {
			tracing::error!(error = %e, "failed to serialize cipher bundle");
			SecretsError::Internal
		})
	}

	/// Parse a stored bundle. Anything unreadable is a decryption failure.
	pub fn from_stored(stored: &str) -> SecretsResult<Self> {
		serde_json::from_str(stored).map_err(|_| SecretsError::DecryptionFailed)
	}

	fn decode(&self) -> SecretsResult<DecodedBundle> {
		let ciphertext = hex::decode(&self.ciphertext).map_err(|_| SecretsError::DecryptionFailed)?;

		let mut nonce = [0u8; NONCE_SIZE];
		hex::decode_to_slice(&self.nonce, &mut nonce).map_err(|_| SecretsError::DecryptionFailed)?;

		let mut tag = [0u8; TAG_SIZE];
		hex::decode_to_slice(&self.tag, &mut tag).map_err(|_| SecretsError::DecryptionFailed)?;

		Ok(DecodedBundle {
			ciphertext,
			nonce,
			tag,
		})
	}
}

fn generate_nonce() -> [u8; NONCE_SIZE] {
	let mut nonce = [0u8; NONCE_SIZE];
	OsRng.fill_bytes(&mut nonce);
	nonce
}

fn cipher_for(key: &[u8; KEY_SIZE]) -> Aes256Gcm16 {
	Aes256Gcm16::new(Key::<Aes256Gcm16>::from_slice(key))
}

/// Seal `plaintext` under `key` with a fresh random nonce.
///
/// Encrypting the same plaintext twice yields different bundles.
pub fn encrypt(plaintext: &str, key: &[u8; KEY_SIZE]) -> SecretsResult<CipherBundle> {
	let cipher = cipher_for(key);
	let nonce_bytes = generate_nonce();
	let nonce = Nonce::<U16>::from_slice(&nonce_bytes);

	let mut buffer = Zeroizing::new(plaintext.as_bytes().to_vec());
	let tag = cipher
		.encrypt_in_place_detached(nonce, b"", &mut buffer[..])
		.map_err(|e| {
			tracing::error!(error = %e, "secret encryption failed");
			SecretsError::Internal
		})?;

	Ok(CipherBundle {
		ciphertext: hex::encode(&*buffer),
		nonce: hex::encode(nonce_bytes),
		tag: hex::encode(tag),
	})
}

/// Open a bundle sealed by [`encrypt`].
///
/// Malformed hex, wrong field lengths, a wrong key, or any modified byte all
/// produce the same [`SecretsError::DecryptionFailed`].
pub fn decrypt(bundle: &CipherBundle, key: &[u8; KEY_SIZE]) -> SecretsResult<SecretString> {
	let decoded = bundle.decode()?;
	let cipher = cipher_for(key);
	let nonce = Nonce::<U16>::from_slice(&decoded.nonce);
	let tag = Tag::<U16>::from_slice(&decoded.tag);

	let mut buffer = Zeroizing::new(decoded.ciphertext);
	cipher
		.decrypt_in_place_detached(nonce, b"", &mut buffer[..], tag)
		.map_err(|_| SecretsError::DecryptionFailed)?;

	let plaintext = std::str::from_utf8(&buffer).map_err(|_| SecretsError::DecryptionFailed)?;
	Ok(SecretString::new(plaintext.to_string()))
}

/// Seals and opens secret values under the configured master key.
///
/// Holds the only copy of the normalized key.
pub struct SecretCipher {
	key: Zeroizing<[u8; KEY_SIZE]>,
}

impl SecretCipher {
	/// Build a cipher from an operator-supplied master key.
	pub fn from_master_key(master_key: &SecretString) -> Self {
		Self {
			key: normalize_key(master_key.expose()),
		}
	}

	pub fn seal(&self, plaintext: &str) -> SecretsResult<CipherBundle> {
		encrypt(plaintext, &self.key)
	}

	pub fn open(&self, bundle: &CipherBundle) -> SecretsResult<SecretString> {
		decrypt(bundle, &self.key)
	}
}

impl std::fmt::Debug for SecretCipher {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("SecretCipher")
			.field("key", &cask_common_secret::REDACTED)
			.finish()
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use proptest::prelude::*;

	fn test_key() -> [u8; KEY_SIZE] {
		[7u8; KEY_SIZE]
	}

	fn flip_hex_char(value: &str, index: usize) -> String {
		let mut chars: Vec<char> = value.chars().collect();
		chars[index] = if chars[index] == '0' { '1' } else { '0' };
		chars.into_iter().collect()
	}

	#[test]
	fn bundle_fields_have_expected_lengths() {
		let bundle = encrypt("postgres://u:p@h/db", &test_key()).unwrap();
		assert_eq!(bundle.nonce.len(), NONCE_SIZE * 2);
		assert_eq!(bundle.tag.len(), TAG_SIZE * 2);
		assert_eq!(bundle.ciphertext.len(), "postgres://u:p@h/db".len() * 2);
		assert!(bundle
			.ciphertext
			.chars()
			.chain(bundle.nonce.chars())
			.chain(bundle.tag.chars())
			.all(|c| c.is_ascii_digit() || ('a'..='f').contains(&c)));
	}

	#[test]
	fn empty_plaintext_roundtrips() {
		let bundle = encrypt("", &test_key()).unwrap();
		assert!(bundle.ciphertext.is_empty());
		assert_eq!(decrypt(&bundle, &test_key()).unwrap().expose(), "");
	}

	#[test]
	fn multibyte_plaintext_roundtrips() {
		let value = "pässwörd 🔑 秘密";
		let bundle = encrypt(value, &test_key()).unwrap();
		assert_eq!(decrypt(&bundle, &test_key()).unwrap().expose(), value);
	}

	#[test]
	fn wrong_key_fails() {
		let bundle = encrypt("value", &test_key()).unwrap();
		let result = decrypt(&bundle, &[8u8; KEY_SIZE]);
		assert!(matches!(result, Err(SecretsError::DecryptionFailed)));
	}

	#[test]
	fn malformed_hex_fails() {
		let mut bundle = encrypt("value", &test_key()).unwrap();
		bundle.nonce = "zz".repeat(NONCE_SIZE);
		assert!(matches!(
			decrypt(&bundle, &test_key()),
			Err(SecretsError::DecryptionFailed)
		));
	}

	#[test]
	fn short_nonce_fails() {
		let mut bundle = encrypt("value", &test_key()).unwrap();
		bundle.nonce.truncate(24);
		assert!(matches!(
			decrypt(&bundle, &test_key()),
			Err(SecretsError::DecryptionFailed)
		));
	}

	#[test]
	fn short_tag_fails() {
		let mut bundle = encrypt("value", &test_key()).unwrap();
		bundle.tag.truncate(30);
		assert!(matches!(
			decrypt(&bundle, &test_key()),
			Err(SecretsError::DecryptionFailed)
		));
	}

	#[test]
	fn stored_form_roundtrips() {
		let bundle = encrypt("value", &test_key()).unwrap();
		let stored = bundle.to_stored().unwrap();
		assert_eq!(CipherBundle::from_stored(&stored).unwrap(), bundle);
	}

	#[test]
	fn stored_garbage_is_decryption_failure() {
		for stored in ["", "not json", "{}", r#"{"ciphertext":"","nonce":"","tag":"","x":1}"#] {
			assert!(
				matches!(
					CipherBundle::from_stored(stored),
					Err(SecretsError::DecryptionFailed)
				),
				"accepted {stored:?}"
			);
		}
	}

	#[test]
	fn cipher_debug_is_redacted() {
		let cipher = SecretCipher::from_master_key(&SecretString::from("master"));
		let rendered = format!("{cipher:?}");
		assert!(rendered.contains("[REDACTED]"));
		assert!(!rendered.contains("master"));
	}

	#[test]
	fn cipher_uses_normalized_key() {
		let hex_key = "07".repeat(KEY_SIZE);
		let cipher = SecretCipher::from_master_key(&SecretString::new(hex_key));
		let bundle = cipher.seal("value").unwrap();
		assert_eq!(decrypt(&bundle, &test_key()).unwrap().expose(), "value");
	}

	proptest! {
		#[test]
		fn encrypt_decrypt_roundtrip(plaintext in any::<String>()) {
			let bundle = encrypt(&plaintext, &test_key()).unwrap();
			let opened = decrypt(&bundle, &test_key()).unwrap();
			prop_assert_eq!(opened.expose(), &plaintext);
		}

		#[test]
		fn nonces_are_unique(plaintext in "[a-z]{0,32}") {
			let first = encrypt(&plaintext, &test_key()).unwrap();
			let second = encrypt(&plaintext, &test_key()).unwrap();
			prop_assert_ne!(first.nonce, second.nonce);
			prop_assert_ne!(first.tag, second.tag);
		}

		#[test]
		fn tampered_ciphertext_fails(plaintext in "[a-z]{1,64}", index in any::<prop::sample::Index>()) {
			let mut bundle = encrypt(&plaintext, &test_key()).unwrap();
			let i = index.index(bundle.ciphertext.len());
			bundle.ciphertext = flip_hex_char(&bundle.ciphertext, i);
			prop_assert!(matches!(decrypt(&bundle, &test_key()), Err(SecretsError::DecryptionFailed)));
		}

		#[test]
		fn tampered_nonce_fails(plaintext in "[a-z]{0,64}", index in any::<prop::sample::Index>()) {
			let mut bundle = encrypt(&plaintext, &test_key()).unwrap();
			let i = index.index(bundle.nonce.len());
			bundle.nonce = flip_hex_char(&bundle.nonce, i);
			prop_assert!(matches!(decrypt(&bundle, &test_key()), Err(SecretsError::DecryptionFailed)));
		}

		#[test]
		fn tampered_tag_fails(plaintext in "[a-z]{0,64}", index in any::<prop::sample::Index>()) {
			let mut bundle = encrypt(&plaintext, &test_key()).unwrap();
			let i = index.index(bundle.tag.len());
			bundle.tag = flip_hex_char(&bundle.tag, i);
			prop_assert!(matches!(decrypt(&bundle, &test_key()), Err(SecretsError::DecryptionFailed)));
		}
	}
}
