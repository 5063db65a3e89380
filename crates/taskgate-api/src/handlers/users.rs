//! Handlers for `/users` endpoints.
//!
//! | Method   | Path          | Who |
//! |----------|---------------|-----|
//! | `POST`   | `/users`      | managers |
//! | `GET`    | `/users`      | managers |
//! | `GET`    | `/users/{id}` | managers, or the user itself |
//! | `PUT`    | `/users/{id}` | managers, or the user itself |
//! | `DELETE` | `/users/{id}` | managers, or the user itself |

use axum::{extract::State, http::StatusCode};
use taskgate_core::{
  rbac,
  store::{DEFAULT_LIST_LIMIT, DataStore},
  user::{Action, User, UserInput},
};

use crate::{
  AppState,
  auth::Caller,
  error::ApiError,
  extract::{Id, Payload},
  response::Success,
};

// ─── Create ───────────────────────────────────────────────────────────────────

/// `POST /users`
pub async fn create<S>(
  State(state): State<AppState<S>>,
  caller: Caller,
  Payload(mut input): Payload<UserInput>,
) -> Result<Success<User>, ApiError>
where
  S: DataStore + Clone + Send + Sync + 'static,
{
  rbac::require_manager(&caller.0)?;

  input.prepare();
  input.validate(Action::Create)?;
  let new_user = input.into_new_user()?;

  let user = state.bounded(state.store.add_user(new_user)).await?;
  tracing::info!(user_id = user.id, created_by = caller.id(), "user created");
  Ok(Success::created(user))
}

// ─── List ─────────────────────────────────────────────────────────────────────

/// `GET /users`
pub async fn list<S>(
  State(state): State<AppState<S>>,
  caller: Caller,
) -> Result<Success<Vec<User>>, ApiError>
where
  S: DataStore + Clone + Send + Sync + 'static,
{
  rbac::require_manager(&caller.0)?;
  let users = state
    .bounded(state.store.list_users(DEFAULT_LIST_LIMIT))
    .await?;
  Ok(Success::ok(users))
}

// ─── Get one ──────────────────────────────────────────────────────────────────

/// `GET /users/{id}`
pub async fn get_one<S>(
  State(state): State<AppState<S>>,
  caller: Caller,
  Id(id): Id<u32>,
) -> Result<Success<User>, ApiError>
where
  S: DataStore + Clone + Send + Sync + 'static,
{
  rbac::authorize_owned(&caller.0, id)?;
  let user = state
    .bounded(state.store.get_user(id))
    .await?
    .ok_or(ApiError::NotFound("user"))?;
  Ok(Success::ok(user))
}

// ─── Update ───────────────────────────────────────────────────────────────────

/// `PUT /users/{id}`: replaces name, email and password. The role is only
/// changed when a manager asks.
pub async fn update<S>(
  State(state): State<AppState<S>>,
  caller: Caller,
  Id(id): Id<u32>,
  Payload(mut input): Payload<UserInput>,
) -> Result<Success<User>, ApiError>
where
  S: DataStore + Clone + Send + Sync + 'static,
{
  rbac::authorize_owned(&caller.0, id)?;

  input.prepare();
  input.validate(Action::Update)?;
  let changes = input.into_changes(caller.is_manager())?;

  let user = state
    .bounded(state.store.update_user(id, changes))
    .await?
    .ok_or(ApiError::NotFound("user"))?;
  Ok(Success::ok(user))
}

// ─── Delete ───────────────────────────────────────────────────────────────────

/// `DELETE /users/{id}`
pub async fn delete<S>(
  State(state): State<AppState<S>>,
  caller: Caller,
  Id(id): Id<u32>,
) -> Result<StatusCode, ApiError>
where
  S: DataStore + Clone + Send + Sync + 'static,
{
  rbac::authorize_owned(&caller.0, id)?;
  match state.bounded(state.store.delete_user(id)).await? {
    0 => Err(ApiError::NotFound("user")),
    _ => {
      tracing::info!(user_id = id, deleted_by = caller.id(), "user deleted");
      Ok(StatusCode::NO_CONTENT)
    }
  }
}
