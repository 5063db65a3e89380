//! Error types for `taskgate-core`.

use thiserror::Error;

use crate::{
  cipher::{CipherError, DecryptionError},
  password::PasswordError,
  rbac::Forbidden,
  token::{AuthError, SigningError},
};

/// A per-field validation failure. The `Display` text is what clients see.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ValidationError {
  #[error("required name")]
  RequiredName,

  #[error("required email")]
  RequiredEmail,

  #[error("invalid email")]
  InvalidEmail,

  #[error("required password")]
  RequiredPassword,

  #[error("required role")]
  RequiredRole,

  #[error("invalid role")]
  InvalidRole,

  #[error("required summary")]
  RequiredSummary,

  #[error("required user")]
  RequiredUser,
}

#[derive(Debug, Error)]
pub enum Error {
  #[error(transparent)]
  Auth(#[from] AuthError),

  #[error(transparent)]
  Signing(#[from] SigningError),

  #[error(transparent)]
  Forbidden(#[from] Forbidden),

  #[error(transparent)]
  Validation(#[from] ValidationError),

  #[error(transparent)]
  Cipher(#[from] CipherError),

  #[error(transparent)]
  Decryption(#[from] DecryptionError),

  #[error(transparent)]
  Password(#[from] PasswordError),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
