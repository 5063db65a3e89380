//! Symmetric encryption of task summaries at rest.
//!
//! Ciphertext is `base64(nonce || ciphertext || tag)` under AES-256-GCM with
//! a fresh 96-bit nonce per call, so encrypting the same summary twice never
//! yields the same blob.

use aes_gcm::{
  Aes256Gcm, Key, Nonce,
  aead::{Aead, AeadCore, KeyInit, OsRng},
};
use base64::{Engine as _, engine::general_purpose::STANDARD};
use sha2::{Digest, Sha256};
use thiserror::Error;

pub const KEY_LENGTH: usize = 32;
pub const NONCE_LENGTH: usize = 12;
pub const TAG_LENGTH: usize = 16;

#[derive(Debug, Error)]
#[error("failed to encrypt summary")]
pub struct CipherError;

/// Why a stored blob could not be turned back into text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum DecryptionError {
  #[error("ciphertext is not valid base64")]
  Encoding,

  #[error("ciphertext is too short")]
  TooShort,

  #[error("ciphertext failed authentication")]
  Authentication,

  #[error("decrypted summary is not valid UTF-8")]
  Utf8,
}

/// Fixed 256-bit key from an arbitrary-length passphrase.
pub fn derive_key(passphrase: &str) -> [u8; KEY_LENGTH] {
  Sha256::digest(passphrase.as_bytes()).into()
}

#[derive(Clone)]
pub struct SummaryCipher {
  cipher: Aes256Gcm,
}

impl SummaryCipher {
  pub fn new(passphrase: &str) -> Self {
    let key = derive_key(passphrase);
    Self {
      cipher: Aes256Gcm::new(Key::<Aes256Gcm>::from_slice(&key)),
    }
  }

  pub fn encrypt(&self, plaintext: &str) -> Result<String, CipherError> {
    let nonce = Aes256Gcm::generate_nonce(&mut OsRng);
    let sealed = self
      .cipher
      .encrypt(&nonce, plaintext.as_bytes())
      .map_err(|_| CipherError)?;

    let mut blob = Vec::with_capacity(NONCE_LENGTH + sealed.len());
    blob.extend_from_slice(&nonce);
    blob.extend_from_slice(&sealed);
    Ok(STANDARD.encode(blob))
  }

  pub fn decrypt(&self, encoded: &str) -> Result<String, DecryptionError> {
    let blob = STANDARD
      .decode(encoded)
      .map_err(|_| DecryptionError::Encoding)?;
    if blob.len() < NONCE_LENGTH + TAG_LENGTH {
      return Err(DecryptionError::TooShort);
    }

    let (nonce, sealed) = blob.split_at(NONCE_LENGTH);
    let plain = self
      .cipher
      .decrypt(Nonce::from_slice(nonce), sealed)
      .map_err(|_| DecryptionError::Authentication)?;
    String::from_utf8(plain).map_err(|_| DecryptionError::Utf8)
  }
}

impl std::fmt::Debug for SummaryCipher {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("SummaryCipher").finish_non_exhaustive()
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn round_trips_text() {
    let cipher = SummaryCipher::new("passphrase");
    for text in ["", "fix the boiler", "ünïcødé ✓", &"x".repeat(2500)] {
      let blob = cipher.encrypt(text).unwrap();
      assert_eq!(cipher.decrypt(&blob).unwrap(), text);
    }
  }

  #[test]
  fn encryption_is_not_deterministic() {
    let cipher = SummaryCipher::new("passphrase");
    let a = cipher.encrypt("same summary").unwrap();
    let b = cipher.encrypt("same summary").unwrap();
    assert_ne!(a, b);
  }

  #[test]
  fn wrong_key_fails_authentication() {
    let blob = SummaryCipher::new("one").encrypt("secret").unwrap();
    assert_eq!(
      SummaryCipher::new("two").decrypt(&blob),
      Err(DecryptionError::Authentication)
    );
  }

  #[test]
  fn tampered_blob_fails_authentication() {
    let cipher = SummaryCipher::new("passphrase");
    let mut blob = STANDARD.decode(cipher.encrypt("secret").unwrap()).unwrap();
    let last = blob.len() - 1;
    blob[last] ^= 0x01;
    assert_eq!(
      cipher.decrypt(&STANDARD.encode(blob)),
      Err(DecryptionError::Authentication)
    );
  }

  #[test]
  fn short_and_undecodable_blobs_are_typed_errors() {
    let cipher = SummaryCipher::new("passphrase");
    assert_eq!(cipher.decrypt("AAAA"), Err(DecryptionError::TooShort));
    assert_eq!(cipher.decrypt(""), Err(DecryptionError::TooShort));
    assert_eq!(cipher.decrypt("not base64!"), Err(DecryptionError::Encoding));
  }

  #[test]
  fn derived_key_is_stable() {
    assert_eq!(derive_key("k"), derive_key("k"));
    assert_ne!(derive_key("k"), derive_key("K"));
  }
}
