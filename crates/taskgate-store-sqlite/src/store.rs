//! [`SqliteStore`], the SQLite implementation of [`DataStore`].

use std::path::Path;

use chrono::Utc;
use rusqlite::OptionalExtension as _;

use taskgate_core::{
  store::{DataStore, TaskQuery},
  task::{NewTask, Task, TaskChanges},
  user::{NewUser, User, UserChanges},
};

use crate::{
  Result,
  encode::{RawTask, RawUser, TASK_COLUMNS, USER_COLUMNS, encode_dt},
  schema::SCHEMA,
};

// ─── Store ───────────────────────────────────────────────────────────────────

/// A Taskgate store backed by a single SQLite file.
///
/// Cloning is cheap; the inner connection is reference-counted.
#[derive(Clone)]
pub struct SqliteStore {
  conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open an in-memory store for tests.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(())
  }
}

/// Task ids beyond `i64::MAX` cannot exist in SQLite.
fn task_key(id: u64) -> Option<i64> { i64::try_from(id).ok() }

fn select_user(
  conn: &rusqlite::Connection,
  id: i64,
) -> rusqlite::Result<Option<RawUser>> {
  conn
    .query_row(
      &format!("SELECT {USER_COLUMNS} FROM users WHERE id = ?1"),
      rusqlite::params![id],
      RawUser::from_row,
    )
    .optional()
}

fn select_task(
  conn: &rusqlite::Connection,
  id: i64,
) -> rusqlite::Result<Option<RawTask>> {
  conn
    .query_row(
      &format!("SELECT {TASK_COLUMNS} FROM tasks WHERE id = ?1"),
      rusqlite::params![id],
      RawTask::from_row,
    )
    .optional()
}

// ─── DataStore impl ──────────────────────────────────────────────────────────

impl DataStore for SqliteStore {
  type Error = crate::Error;

  // ── Users ─────────────────────────────────────────────────────────────────

  async fn add_user(&self, user: NewUser) -> Result<User> {
    let now = Utc::now();
    let at_str = encode_dt(now);
    let role = i64::from(user.role.bits());
    let NewUser {
      name,
      email,
      password_hash,
      ..
    } = user;

    let raw: RawUser = self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO users (name, email, password_hash, role, created_at, updated_at)
           VALUES (?1, ?2, ?3, ?4, ?5, ?5)",
          rusqlite::params![name, email, password_hash, role, at_str],
        )?;
        let id = conn.last_insert_rowid();
        Ok(RawUser {
          id,
          name,
          email,
          password_hash,
          role,
          created_at: at_str.clone(),
          updated_at: at_str,
        })
      })
      .await?;

    raw.into_user()
  }

  async fn get_user(&self, id: u32) -> Result<Option<User>> {
    let raw = self
      .conn
      .call(move |conn| Ok(select_user(conn, i64::from(id))?))
      .await?;

    raw.map(RawUser::into_user).transpose()
  }

  async fn find_user_by_email(&self, email: &str) -> Result<Option<User>> {
    let email = email.to_owned();

    let raw: Option<RawUser> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              &format!("SELECT {USER_COLUMNS} FROM users WHERE email = ?1"),
              rusqlite::params![email],
              RawUser::from_row,
            )
            .optional()?,
        )
      })
      .await?;

    raw.map(RawUser::into_user).transpose()
  }

  async fn list_users(&self, limit: usize) -> Result<Vec<User>> {
    let limit_val = i64::try_from(limit).unwrap_or(i64::MAX);

    let raws: Vec<RawUser> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(&format!(
          "SELECT {USER_COLUMNS} FROM users ORDER BY id LIMIT ?1"
        ))?;
        let rows = stmt
          .query_map(rusqlite::params![limit_val], RawUser::from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawUser::into_user).collect()
  }

  async fn count_users(&self) -> Result<u64> {
    let count: i64 = self
      .conn
      .call(|conn| {
        Ok(conn.query_row("SELECT COUNT(*) FROM users", [], |r| r.get(0))?)
      })
      .await?;
    Ok(u64::try_from(count).unwrap_or(0))
  }

  async fn update_user(
    &self,
    id: u32,
    changes: UserChanges,
  ) -> Result<Option<User>> {
    let at_str = encode_dt(Utc::now());
    let role = changes.role.map(|r| i64::from(r.bits()));
    let UserChanges {
      name,
      email,
      password_hash,
      ..
    } = changes;

    let raw = self
      .conn
      .call(move |conn| {
        let changed = conn.execute(
          "UPDATE users
           SET name = ?1, email = ?2, password_hash = ?3,
               role = COALESCE(?4, role), updated_at = ?5
           WHERE id = ?6",
          rusqlite::params![name, email, password_hash, role, at_str, i64::from(id)],
        )?;
        if changed == 0 {
          return Ok(None);
        }
        Ok(select_user(conn, i64::from(id))?)
      })
      .await?;

    raw.map(RawUser::into_user).transpose()
  }

  async fn delete_user(&self, id: u32) -> Result<u64> {
    let removed = self
      .conn
      .call(move |conn| {
        Ok(conn.execute(
          "DELETE FROM users WHERE id = ?1",
          rusqlite::params![i64::from(id)],
        )?)
      })
      .await?;
    Ok(removed as u64)
  }

  // ── Tasks ─────────────────────────────────────────────────────────────────

  async fn add_task(&self, task: NewTask) -> Result<Task> {
    let at_str = encode_dt(Utc::now());
    let NewTask { summary, user_id } = task;
    let owner = i64::from(user_id);

    let raw: RawTask = self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO tasks (summary, user_id, created_at, updated_at)
           VALUES (?1, ?2, ?3, ?3)",
          rusqlite::params![summary, owner, at_str],
        )?;
        Ok(RawTask {
          id: conn.last_insert_rowid(),
          summary,
          user_id: owner,
          created_at: at_str.clone(),
          updated_at: at_str,
        })
      })
      .await?;

    raw.into_task()
  }

  async fn get_task(&self, id: u64) -> Result<Option<Task>> {
    let Some(key) = task_key(id) else {
      return Ok(None);
    };

    let raw = self
      .conn
      .call(move |conn| Ok(select_task(conn, key)?))
      .await?;

    raw.map(RawTask::into_task).transpose()
  }

  async fn list_tasks(&self, query: &TaskQuery) -> Result<Vec<Task>> {
    let owner = query.owner.map(i64::from);
    let limit_val = i64::try_from(query.limit()).unwrap_or(i64::MAX);

    let raws: Vec<RawTask> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(&format!(
          "SELECT {TASK_COLUMNS} FROM tasks
           WHERE (?1 IS NULL OR user_id = ?1)
           ORDER BY id
           LIMIT ?2"
        ))?;
        let rows = stmt
          .query_map(rusqlite::params![owner, limit_val], RawTask::from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawTask::into_task).collect()
  }

  async fn update_task(
    &self,
    id: u64,
    changes: TaskChanges,
  ) -> Result<Option<Task>> {
    let Some(key) = task_key(id) else {
      return Ok(None);
    };
    let at_str = encode_dt(Utc::now());
    let owner = changes.user_id.map(i64::from);
    let summary = changes.summary;

    let raw = self
      .conn
      .call(move |conn| {
        let changed = conn.execute(
          "UPDATE tasks
           SET summary = ?1, user_id = COALESCE(?2, user_id), updated_at = ?3
           WHERE id = ?4",
          rusqlite::params![summary, owner, at_str, key],
        )?;
        if changed == 0 {
          return Ok(None);
        }
        Ok(select_task(conn, key)?)
      })
      .await?;

    raw.map(RawTask::into_task).transpose()
  }

  async fn delete_task(&self, id: u64) -> Result<u64> {
    let Some(key) = task_key(id) else {
      return Ok(0);
    };

    let removed = self
      .conn
      .call(move |conn| {
        Ok(conn.execute("DELETE FROM tasks WHERE id = ?1", rusqlite::params![key])?)
      })
      .await?;
    Ok(removed as u64)
  }
}
