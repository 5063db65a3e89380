//! `POST /login`: exchange an email and password for a bearer token.

use axum::extract::State;
use taskgate_core::{
  password,
  store::DataStore,
  user::{Action, UserInput},
};

use crate::{AppState, error::ApiError, extract::Payload, response::Success};

pub async fn handler<S>(
  State(state): State<AppState<S>>,
  Payload(mut input): Payload<UserInput>,
) -> Result<Success<String>, ApiError>
where
  S: DataStore + Clone + Send + Sync + 'static,
{
  input.prepare();
  input.validate(Action::Login)?;

  let user = state
    .bounded(state.store.find_user_by_email(&input.email))
    .await?
    .ok_or(ApiError::IncorrectDetails)?;

  password::verify(&user.password_hash, &input.password)?;

  let token = state
    .tokens
    .issue(user.id, user.role)
    .map_err(|e| ApiError::Internal(e.to_string()))?;

  tracing::info!(user_id = user.id, role = %user.role, "login succeeded");
  Ok(Success::ok(token))
}
