//! Password hashing with argon2id.

use argon2::{
  Argon2, PasswordHash, PasswordHasher, PasswordVerifier,
  password_hash::{self, SaltString},
};
use rand_core::OsRng;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PasswordError {
  #[error("incorrect password")]
  Mismatch,

  /// The stored hash could not be parsed; a data-integrity problem rather
  /// than a failed login.
  #[error("stored password hash is corrupt")]
  Corrupt,

  #[error("failed to hash password: {0}")]
  Hash(String),
}

/// Hash `password` with a fresh random salt into a PHC string.
pub fn hash(password: &str) -> Result<String, PasswordError> {
  let salt = SaltString::generate(&mut OsRng);
  let hash = Argon2::default()
    .hash_password(password.as_bytes(), &salt)
    .map_err(|e| PasswordError::Hash(e.to_string()))?;
  Ok(hash.to_string())
}

pub fn verify(hash: &str, password: &str) -> Result<(), PasswordError> {
  let parsed = PasswordHash::new(hash).map_err(|_| PasswordError::Corrupt)?;
  match Argon2::default().verify_password(password.as_bytes(), &parsed) {
    Ok(()) => Ok(()),
    Err(password_hash::Error::Password) => Err(PasswordError::Mismatch),
    Err(_) => Err(PasswordError::Corrupt),
  }
}
