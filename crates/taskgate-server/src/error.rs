//! Error type for `taskgate-server`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("configuration error: {0}")]
  Config(#[from] config::ConfigError),

  #[error("{0} must not be empty")]
  MissingSecret(&'static str),

  #[error(transparent)]
  Core(#[from] taskgate_core::Error),

  #[error("store error: {0}")]
  Store(#[source] Box<dyn std::error::Error + Send + Sync>),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
