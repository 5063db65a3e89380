//! Runtime configuration, read from an optional TOML file layered under
//! `TASKGATE_*` environment variables.

use std::{
  path::{Path, PathBuf},
  time::Duration,
};

use config::builder::{ConfigBuilder, DefaultState};
use serde::Deserialize;

use crate::{Error, Result};

pub const ENV_PREFIX: &str = "TASKGATE";

/// Server configuration. Secrets have no defaults.
#[derive(Deserialize, Clone)]
pub struct ServerConfig {
  #[serde(default = "default_host")]
  pub host:                 String,
  #[serde(default = "default_port")]
  pub port:                 u16,
  #[serde(default = "default_store_path")]
  pub store_path:           PathBuf,
  /// HMAC secret for bearer tokens.
  pub api_secret:           String,
  /// Passphrase the summary cipher key is derived from.
  pub encryption_key:       String,
  #[serde(default = "default_request_timeout_secs")]
  pub request_timeout_secs: u64,
  #[serde(default = "default_queue_capacity")]
  pub queue_capacity:       usize,
}

fn default_host() -> String { "0.0.0.0".to_string() }
fn default_port() -> u16 { 8080 }
fn default_store_path() -> PathBuf { PathBuf::from("taskgate.db") }
fn default_request_timeout_secs() -> u64 { 10 }
fn default_queue_capacity() -> usize { 1024 }

impl ServerConfig {
  /// Read `path` (if present), then apply environment overrides.
  pub fn load(path: &Path) -> Result<Self> {
    let builder = config::Config::builder()
      .add_source(config::File::from(path.to_path_buf()).required(false))
      .add_source(config::Environment::with_prefix(ENV_PREFIX).try_parsing(true));
    Self::from_builder(builder)
  }

  fn from_builder(builder: ConfigBuilder<DefaultState>) -> Result<Self> {
    let cfg: Self = builder.build()?.try_deserialize()?;
    if cfg.api_secret.is_empty() {
      return Err(Error::MissingSecret("api_secret"));
    }
    if cfg.encryption_key.is_empty() {
      return Err(Error::MissingSecret("encryption_key"));
    }
    Ok(cfg)
  }

  pub fn address(&self) -> String { format!("{}:{}", self.host, self.port) }

  pub fn request_timeout(&self) -> Duration {
    Duration::from_secs(self.request_timeout_secs)
  }

  /// The store path with a leading `~` expanded to the home directory.
  pub fn store_path(&self) -> PathBuf { expand_tilde(&self.store_path) }
}

impl std::fmt::Debug for ServerConfig {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("ServerConfig")
      .field("host", &self.host)
      .field("port", &self.port)
      .field("store_path", &self.store_path)
      .field("request_timeout_secs", &self.request_timeout_secs)
      .field("queue_capacity", &self.queue_capacity)
      .finish_non_exhaustive()
  }
}

/// Expand a leading `~` to the user's home directory.
fn expand_tilde(path: &Path) -> PathBuf {
  let s = path.to_string_lossy();
  if let Some(rest) = s.strip_prefix("~/")
    && let Ok(home) = std::env::var("HOME")
  {
    return PathBuf::from(home).join(rest);
  }
  path.to_path_buf()
}

#[cfg(test)]
mod tests {
  use config::{File, FileFormat};

  use super::*;

  fn from_toml(toml: &str) -> Result<ServerConfig> {
    ServerConfig::from_builder(
      config::Config::builder().add_source(File::from_str(toml, FileFormat::Toml)),
    )
  }

  #[test]
  fn defaults_fill_everything_but_secrets() {
    let cfg = from_toml(
      r#"
      api_secret     = "s3cret"
      encryption_key = "passphrase"
      "#,
    )
    .unwrap();
    assert_eq!(cfg.address(), "0.0.0.0:8080");
    assert_eq!(cfg.request_timeout(), Duration::from_secs(10));
    assert_eq!(cfg.queue_capacity, 1024);
    assert_eq!(cfg.store_path, PathBuf::from("taskgate.db"));
  }

  #[test]
  fn explicit_values_override_defaults() {
    let cfg = from_toml(
      r#"
      host                 = "127.0.0.1"
      port                 = 9000
      store_path           = "/var/lib/taskgate.db"
      api_secret           = "s3cret"
      encryption_key       = "passphrase"
      request_timeout_secs = 3
      "#,
    )
    .unwrap();
    assert_eq!(cfg.address(), "127.0.0.1:9000");
    assert_eq!(cfg.request_timeout(), Duration::from_secs(3));
  }

  #[test]
  fn secrets_are_required() {
    assert!(matches!(
      from_toml(r#"encryption_key = "k""#),
      Err(Error::Config(_))
    ));
    assert!(matches!(
      from_toml(
        r#"
        api_secret     = ""
        encryption_key = "k"
        "#
      ),
      Err(Error::MissingSecret("api_secret"))
    ));
  }

  #[test]
  fn debug_output_hides_secrets() {
    let cfg = from_toml(
      r#"
      api_secret     = "do-not-print"
      encryption_key = "nor-this"
      "#,
    )
    .unwrap();
    let shown = format!("{cfg:?}");
    assert!(!shown.contains("do-not-print"));
    assert!(!shown.contains("nor-this"));
  }

  #[test]
  fn tilde_expands_to_home() {
    let expanded = expand_tilde(Path::new("~/data/taskgate.db"));
    if let Ok(home) = std::env::var("HOME") {
      assert_eq!(expanded, PathBuf::from(home).join("data/taskgate.db"));
    }
    assert_eq!(expand_tilde(Path::new("/abs.db")), PathBuf::from("/abs.db"));
  }
}
