//! API error type and [`axum::response::IntoResponse`] implementation.

use axum::{
  extract::rejection::{JsonRejection, PathRejection},
  http::StatusCode,
  response::{IntoResponse, Response},
};
use taskgate_core::{
  ValidationError,
  cipher::DecryptionError,
  password::PasswordError,
  rbac::Forbidden,
  store::{StoreError, StoreErrorKind, UniqueField},
  token::AuthError,
};
use thiserror::Error;

use crate::response::envelope;

/// An error returned by an API handler.
#[derive(Debug, Error)]
pub enum ApiError {
  /// Missing, unreadable or rejected bearer token.
  #[error("Unauthorized")]
  Unauthorized,

  #[error("user not authorized")]
  Forbidden,

  #[error(transparent)]
  Validation(#[from] ValidationError),

  #[error("{0}")]
  BadRequest(String),

  #[error("{} already taken", field_name(.0))]
  Conflict(UniqueField),

  #[error("incorrect details")]
  IncorrectDetails,

  #[error("incorrect password")]
  IncorrectPassword,

  #[error("{0} not found")]
  NotFound(&'static str),

  #[error("failed to send a notification")]
  Notification,

  #[error("request timed out")]
  Timeout,

  /// Data-integrity and crypto failures. The detail is logged, not returned.
  #[error("internal error: {0}")]
  Internal(String),

  #[error("store error: {0}")]
  Store(#[source] Box<dyn std::error::Error + Send + Sync>),
}

fn field_name(field: &UniqueField) -> &'static str {
  match field {
    UniqueField::Name => "name",
    UniqueField::Email => "email",
  }
}

impl ApiError {
  /// Classify a store failure, preferring the backend's typed kind.
  pub fn from_store<E: StoreError>(e: E) -> Self {
    match e.kind() {
      StoreErrorKind::Conflict(field) => Self::Conflict(field),
      StoreErrorKind::MissingReference => Self::NotFound("user"),
      StoreErrorKind::Other => Self::from_message(Box::new(e)),
    }
  }

  /// Fallback for backends whose errors are not typed: sniff the text.
  fn from_message(e: Box<dyn std::error::Error + Send + Sync>) -> Self {
    let message = e.to_string();
    if message.contains("name") {
      Self::Conflict(UniqueField::Name)
    } else if message.contains("email") {
      Self::Conflict(UniqueField::Email)
    } else if message.contains("hashedPassword") || message.contains("password_hash") {
      Self::IncorrectPassword
    } else {
      Self::Store(e)
    }
  }

  pub fn status(&self) -> StatusCode {
    match self {
      Self::Unauthorized | Self::Forbidden => StatusCode::UNAUTHORIZED,
      Self::Validation(_)
      | Self::Conflict(_)
      | Self::IncorrectDetails
      | Self::IncorrectPassword => StatusCode::UNPROCESSABLE_ENTITY,
      Self::BadRequest(_) => StatusCode::BAD_REQUEST,
      Self::NotFound(_) => StatusCode::NOT_FOUND,
      Self::Timeout => StatusCode::GATEWAY_TIMEOUT,
      Self::Notification | Self::Internal(_) | Self::Store(_) => {
        StatusCode::INTERNAL_SERVER_ERROR
      }
    }
  }

  /// The detail string placed in the envelope's `data` field.
  fn detail(&self) -> String {
    match self {
      Self::Internal(_) => "internal server error".to_string(),
      Self::Store(_) => "incorrect details".to_string(),
      other => other.to_string(),
    }
  }
}

impl IntoResponse for ApiError {
  fn into_response(self) -> Response {
    let status = self.status();
    match &self {
      Self::Internal(_) | Self::Store(_) => tracing::error!(error = %self, "request failed"),
      Self::Notification => tracing::warn!("notification could not be published"),
      _ => {}
    }
    envelope(status, "error", self.detail())
  }
}

// ─── Conversions ─────────────────────────────────────────────────────────────

impl From<AuthError> for ApiError {
  fn from(e: AuthError) -> Self {
    tracing::debug!(error = %e, "token rejected");
    Self::Unauthorized
  }
}

impl From<Forbidden> for ApiError {
  fn from(_: Forbidden) -> Self {
    tracing::warn!("authorization denied");
    Self::Forbidden
  }
}

impl From<DecryptionError> for ApiError {
  fn from(e: DecryptionError) -> Self { Self::Internal(e.to_string()) }
}

impl From<PasswordError> for ApiError {
  fn from(e: PasswordError) -> Self {
    match e {
      PasswordError::Mismatch => Self::IncorrectPassword,
      other => Self::Internal(other.to_string()),
    }
  }
}

impl From<taskgate_core::Error> for ApiError {
  fn from(e: taskgate_core::Error) -> Self {
    use taskgate_core::Error as Core;
    match e {
      Core::Auth(e) => e.into(),
      Core::Forbidden(e) => e.into(),
      Core::Validation(e) => e.into(),
      Core::Decryption(e) => e.into(),
      Core::Password(e) => e.into(),
      Core::Signing(e) => Self::Internal(e.to_string()),
      Core::Cipher(e) => Self::Internal(e.to_string()),
    }
  }
}

impl From<JsonRejection> for ApiError {
  fn from(rejection: JsonRejection) -> Self {
    Self::BadRequest(rejection.body_text())
  }
}

impl From<PathRejection> for ApiError {
  fn from(rejection: PathRejection) -> Self {
    Self::BadRequest(rejection.body_text())
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[derive(Debug, Error)]
  #[error("{0}")]
  struct Untyped(&'static str);

  impl StoreError for Untyped {
    fn kind(&self) -> StoreErrorKind { StoreErrorKind::Other }
  }

  #[derive(Debug, Error)]
  #[error("constraint")]
  struct Typed(StoreErrorKind);

  impl StoreError for Typed {
    fn kind(&self) -> StoreErrorKind { self.0 }
  }

  #[test]
  fn typed_store_errors_win() {
    let e = ApiError::from_store(Typed(StoreErrorKind::Conflict(UniqueField::Email)));
    assert!(matches!(e, ApiError::Conflict(UniqueField::Email)));
    assert_eq!(e.to_string(), "email already taken");

    let e = ApiError::from_store(Typed(StoreErrorKind::MissingReference));
    assert_eq!(e.status(), StatusCode::NOT_FOUND);
  }

  #[test]
  fn untyped_store_errors_are_sniffed() {
    let e = ApiError::from_store(Untyped("duplicate key value: name"));
    assert!(matches!(e, ApiError::Conflict(UniqueField::Name)));

    let e = ApiError::from_store(Untyped("duplicate key: name and email"));
    assert!(matches!(e, ApiError::Conflict(UniqueField::Name)));

    let e = ApiError::from_store(Untyped("duplicate key: email"));
    assert!(matches!(e, ApiError::Conflict(UniqueField::Email)));

    let e = ApiError::from_store(Untyped("hashedPassword mismatch"));
    assert!(matches!(e, ApiError::IncorrectPassword));

    let e = ApiError::from_store(Untyped("disk I/O failure"));
    assert_eq!(e.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(e.detail(), "incorrect details");
  }

  #[test]
  fn authorization_failures_share_401() {
    assert_eq!(ApiError::from(AuthError::Expired).status(), StatusCode::UNAUTHORIZED);
    assert_eq!(ApiError::from(Forbidden).status(), StatusCode::UNAUTHORIZED);
    assert_eq!(ApiError::Forbidden.detail(), "user not authorized");
  }

  #[test]
  fn internal_details_are_not_exposed() {
    let e = ApiError::from(DecryptionError::Authentication);
    assert_eq!(e.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(e.detail(), "internal server error");
  }
}
