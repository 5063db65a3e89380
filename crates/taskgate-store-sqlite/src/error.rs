//! Error type for `taskgate-store-sqlite`.

use rusqlite::ffi;
use taskgate_core::store::{StoreError, StoreErrorKind, UniqueField};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("database error: {0}")]
  Database(#[from] tokio_rusqlite::Error),

  #[error("date/time parse error: {0}")]
  DateParse(String),

  /// A stored column held a value the domain types cannot represent.
  #[error("invalid stored value: {0}")]
  Decode(String),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

impl Error {
  fn sqlite_failure(&self) -> Option<(&ffi::Error, Option<&str>)> {
    match self {
      Self::Database(tokio_rusqlite::Error::Rusqlite(
        rusqlite::Error::SqliteFailure(code, message),
      )) => Some((code, message.as_deref())),
      _ => None,
    }
  }
}

impl StoreError for Error {
  fn kind(&self) -> StoreErrorKind {
    let Some((code, message)) = self.sqlite_failure() else {
      return StoreErrorKind::Other;
    };

    // SQLite reports unique violations as "UNIQUE constraint failed: users.email".
    match code.extended_code {
      ffi::SQLITE_CONSTRAINT_UNIQUE => match message {
        Some(m) if m.contains("users.name") => {
          StoreErrorKind::Conflict(UniqueField::Name)
        }
        Some(m) if m.contains("users.email") => {
          StoreErrorKind::Conflict(UniqueField::Email)
        }
        _ => StoreErrorKind::Other,
      },
      ffi::SQLITE_CONSTRAINT_FOREIGNKEY => StoreErrorKind::MissingReference,
      _ => StoreErrorKind::Other,
    }
  }
}
