//! Handlers for `/tasks` endpoints.
//!
//! Summaries are encrypted on the way in and decrypted on the way out; the
//! store only ever sees ciphertext.

use axum::{extract::State, http::StatusCode};
use taskgate_core::{
  cipher::DecryptionError,
  rbac,
  store::{DataStore, TaskQuery},
  task::{Task, TaskInput},
};

use crate::{
  AppState,
  auth::Caller,
  error::ApiError,
  extract::{Id, Payload},
  response::Success,
};

/// Load a task and check the caller may touch it.
async fn load_owned<S>(
  state: &AppState<S>,
  caller: &Caller,
  id: u64,
) -> Result<Task, ApiError>
where
  S: DataStore + Clone + Send + Sync + 'static,
{
  let task = state
    .bounded(state.store.get_task(id))
    .await?
    .ok_or(ApiError::NotFound("task"))?;
  rbac::authorize_owned(&caller.0, task.user_id)?;
  Ok(task)
}

/// `POST /tasks`: the owner must be the caller.
pub async fn create<S>(
  State(state): State<AppState<S>>,
  caller: Caller,
  Payload(input): Payload<TaskInput>,
) -> Result<Success<Task>, ApiError>
where
  S: DataStore + Clone + Send + Sync + 'static,
{
  let new_task = input.prepare(&state.cipher)?;
  rbac::authorize_task_create(&caller.0, new_task.user_id)?;

  let task = state.bounded(state.store.add_task(new_task)).await?;
  Ok(Success::created(task.open(&state.cipher)?))
}

/// `GET /tasks`: managers see every task, technicians their own.
pub async fn list<S>(
  State(state): State<AppState<S>>,
  caller: Caller,
) -> Result<Success<Vec<Task>>, ApiError>
where
  S: DataStore + Clone + Send + Sync + 'static,
{
  let query = TaskQuery::for_scope(rbac::task_scope(&caller.0)?);
  let tasks = state.bounded(state.store.list_tasks(&query)).await?;

  let tasks = tasks
    .into_iter()
    .map(|task| task.open(&state.cipher))
    .collect::<Result<Vec<_>, DecryptionError>>()?;
  Ok(Success::ok(tasks))
}

/// `GET /tasks/{id}`
pub async fn get_one<S>(
  State(state): State<AppState<S>>,
  caller: Caller,
  Id(id): Id<u64>,
) -> Result<Success<Task>, ApiError>
where
  S: DataStore + Clone + Send + Sync + 'static,
{
  let task = load_owned(&state, &caller, id).await?;
  Ok(Success::ok(task.open(&state.cipher)?))
}

/// `PUT /tasks/{id}`: replaces the summary; `user_id` optionally reassigns.
pub async fn update<S>(
  State(state): State<AppState<S>>,
  caller: Caller,
  Id(id): Id<u64>,
  Payload(input): Payload<TaskInput>,
) -> Result<Success<Task>, ApiError>
where
  S: DataStore + Clone + Send + Sync + 'static,
{
  load_owned(&state, &caller, id).await?;

  let changes = input.prepare_changes(&state.cipher)?;
  if let Some(new_owner) = changes.user_id {
    rbac::authorize_reassign(&caller.0, new_owner)?;
  }

  let task = state
    .bounded(state.store.update_task(id, changes))
    .await?
    .ok_or(ApiError::NotFound("task"))?;
  Ok(Success::ok(task.open(&state.cipher)?))
}

/// `DELETE /tasks/{id}`
pub async fn delete<S>(
  State(state): State<AppState<S>>,
  caller: Caller,
  Id(id): Id<u64>,
) -> Result<StatusCode, ApiError>
where
  S: DataStore + Clone + Send + Sync + 'static,
{
  load_owned(&state, &caller, id).await?;
  match state.bounded(state.store.delete_task(id)).await? {
    0 => Err(ApiError::NotFound("task")),
    _ => Ok(StatusCode::NO_CONTENT),
  }
}
