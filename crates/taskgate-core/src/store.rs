//! The `DataStore` trait and supporting query types.
//!
//! The trait is implemented by storage backends (e.g. `taskgate-store-sqlite`).
//! The HTTP layer depends on this abstraction, not on any concrete backend.

use std::future::Future;

use crate::{
  rbac::TaskScope,
  task::{NewTask, Task, TaskChanges},
  user::{NewUser, User, UserChanges},
};

/// Row cap applied to listings when the caller does not set one.
pub const DEFAULT_LIST_LIMIT: usize = 100;

// ─── Errors ──────────────────────────────────────────────────────────────────

/// A unique column on the user table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UniqueField {
  Name,
  Email,
}

/// Backend-independent classification of a store failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreErrorKind {
  /// A unique constraint was violated.
  Conflict(UniqueField),
  /// A foreign key named a row that does not exist.
  MissingReference,
  Other,
}

/// Implemented by every backend's error type so callers can react to
/// constraint violations without knowing the backend.
pub trait StoreError: std::error::Error + Send + Sync + 'static {
  fn kind(&self) -> StoreErrorKind;
}

// ─── Query type ──────────────────────────────────────────────────────────────

/// Parameters for [`DataStore::list_tasks`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskQuery {
  /// Restrict to tasks owned by this user.
  pub owner: Option<u32>,
  pub limit: Option<usize>,
}

impl TaskQuery {
  pub fn for_scope(scope: TaskScope) -> Self {
    match scope {
      TaskScope::All => Self::default(),
      TaskScope::OwnedBy(id) => Self {
        owner: Some(id),
        ..Self::default()
      },
    }
  }

  pub fn limit(&self) -> usize { self.limit.unwrap_or(DEFAULT_LIST_LIMIT) }
}

// ─── Trait ───────────────────────────────────────────────────────────────────

/// Abstraction over a Taskgate persistence backend.
///
/// Lookups return `None` and deletes return `0` when the row does not exist;
/// errors are reserved for backend failures and constraint violations.
///
/// All methods return `Send` futures so the trait can be used in
/// multi-threaded async runtimes (e.g. tokio with `axum`).
pub trait DataStore: Send + Sync {
  type Error: StoreError;

  // ── Users ─────────────────────────────────────────────────────────────

  /// Persist a new user. Timestamps and the id are assigned by the store.
  fn add_user(
    &self,
    user: NewUser,
  ) -> impl Future<Output = Result<User, Self::Error>> + Send + '_;

  fn get_user(
    &self,
    id: u32,
  ) -> impl Future<Output = Result<Option<User>, Self::Error>> + Send + '_;

  fn find_user_by_email<'a>(
    &'a self,
    email: &'a str,
  ) -> impl Future<Output = Result<Option<User>, Self::Error>> + Send + 'a;

  fn list_users(
    &self,
    limit: usize,
  ) -> impl Future<Output = Result<Vec<User>, Self::Error>> + Send + '_;

  fn count_users(
    &self,
  ) -> impl Future<Output = Result<u64, Self::Error>> + Send + '_;

  /// Replace a user's fields and bump `updated_at`.
  fn update_user(
    &self,
    id: u32,
    changes: UserChanges,
  ) -> impl Future<Output = Result<Option<User>, Self::Error>> + Send + '_;

  /// Delete a user and, by cascade, every task it owns. Returns the number
  /// of user rows removed.
  fn delete_user(
    &self,
    id: u32,
  ) -> impl Future<Output = Result<u64, Self::Error>> + Send + '_;

  // ── Tasks ─────────────────────────────────────────────────────────────

  fn add_task(
    &self,
    task: NewTask,
  ) -> impl Future<Output = Result<Task, Self::Error>> + Send + '_;

  fn get_task(
    &self,
    id: u64,
  ) -> impl Future<Output = Result<Option<Task>, Self::Error>> + Send + '_;

  fn list_tasks<'a>(
    &'a self,
    query: &'a TaskQuery,
  ) -> impl Future<Output = Result<Vec<Task>, Self::Error>> + Send + 'a;

  fn update_task(
    &self,
    id: u64,
    changes: TaskChanges,
  ) -> impl Future<Output = Result<Option<Task>, Self::Error>> + Send + '_;

  fn delete_task(
    &self,
    id: u64,
  ) -> impl Future<Output = Result<u64, Self::Error>> + Send + '_;
}
