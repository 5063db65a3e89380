//! Encoding and decoding helpers between Rust domain types and the plain
//! representations stored in SQLite columns.
//!
//! Timestamps are stored as RFC 3339 strings, roles as their bitmask integer
//! and ids as SQLite integers.

use chrono::{DateTime, Utc};
use taskgate_core::{Role, task::Task, user::User};

use crate::{Error, Result};

pub const USER_COLUMNS: &str =
  "id, name, email, password_hash, role, created_at, updated_at";

pub const TASK_COLUMNS: &str = "id, summary, user_id, created_at, updated_at";

// ─── DateTime<Utc> ───────────────────────────────────────────────────────────

pub fn encode_dt(dt: DateTime<Utc>) -> String { dt.to_rfc3339() }

pub fn decode_dt(s: &str) -> Result<DateTime<Utc>> {
  DateTime::parse_from_rfc3339(s)
    .map(|dt| dt.with_timezone(&Utc))
    .map_err(|e| Error::DateParse(e.to_string()))
}

// ─── Ids and roles ───────────────────────────────────────────────────────────

pub fn decode_user_id(raw: i64) -> Result<u32> {
  u32::try_from(raw).map_err(|_| Error::Decode(format!("user id {raw}")))
}

pub fn decode_task_id(raw: i64) -> Result<u64> {
  u64::try_from(raw).map_err(|_| Error::Decode(format!("task id {raw}")))
}

pub fn decode_role(raw: i64) -> Result<Role> {
  u32::try_from(raw)
    .ok()
    .and_then(Role::from_bits)
    .ok_or_else(|| Error::Decode(format!("role {raw}")))
}

// ─── Row types ───────────────────────────────────────────────────────────────

/// A `users` row as read from SQLite, before decoding.
pub struct RawUser {
  pub id:            i64,
  pub name:          String,
  pub email:         String,
  pub password_hash: String,
  pub role:          i64,
  pub created_at:    String,
  pub updated_at:    String,
}

impl RawUser {
  /// Column order follows [`USER_COLUMNS`].
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      id:            row.get(0)?,
      name:          row.get(1)?,
      email:         row.get(2)?,
      password_hash: row.get(3)?,
      role:          row.get(4)?,
      created_at:    row.get(5)?,
      updated_at:    row.get(6)?,
    })
  }

  pub fn into_user(self) -> Result<User> {
    Ok(User {
      id:            decode_user_id(self.id)?,
      name:          self.name,
      email:         self.email,
      password_hash: self.password_hash,
      role:          decode_role(self.role)?,
      created_at:    decode_dt(&self.created_at)?,
      updated_at:    decode_dt(&self.updated_at)?,
    })
  }
}

/// A `tasks` row as read from SQLite. The summary is still ciphertext.
pub struct RawTask {
  pub id:         i64,
  pub summary:    String,
  pub user_id:    i64,
  pub created_at: String,
  pub updated_at: String,
}

impl RawTask {
  /// Column order follows [`TASK_COLUMNS`].
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      id:         row.get(0)?,
      summary:    row.get(1)?,
      user_id:    row.get(2)?,
      created_at: row.get(3)?,
      updated_at: row.get(4)?,
    })
  }

  pub fn into_task(self) -> Result<Task> {
    Ok(Task {
      id:         decode_task_id(self.id)?,
      summary:    self.summary,
      user_id:    decode_user_id(self.user_id)?,
      created_at: decode_dt(&self.created_at)?,
      updated_at: decode_dt(&self.updated_at)?,
    })
  }
}
