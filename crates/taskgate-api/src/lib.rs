//! JSON REST API for Taskgate.
//!
//! Exposes an axum [`Router`] backed by any [`DataStore`]. Callers log in at
//! `/login`, then present the returned token as `Authorization: Bearer
//! <token>` on every other route. Role checks live in
//! [`taskgate_core::rbac`]; this crate only wires them to HTTP.
//!
//! # Mounting
//!
//! ```rust,ignore
//! let app = taskgate_api::api_router(state);
//! axum::serve(listener, app).await?;
//! ```

pub mod auth;
pub mod error;
pub mod extract;
pub mod handlers;
pub mod response;

use std::{future::Future, sync::Arc, time::Duration};

use axum::{
  Router,
  routing::{get, post},
};
use taskgate_core::{
  cipher::SummaryCipher, notify::Publisher, store::DataStore,
  token::TokenService,
};
use tower_http::trace::TraceLayer;

pub use error::ApiError;

use handlers::{home, login, tasks, users};

/// Deadline applied to every store call unless configured otherwise.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

// ─── Application state ────────────────────────────────────────────────────────

/// Shared state threaded through all axum handlers. Everything here is
/// immutable after startup.
#[derive(Clone)]
pub struct AppState<S: DataStore> {
  pub store:           Arc<S>,
  pub tokens:          Arc<TokenService>,
  pub cipher:          Arc<SummaryCipher>,
  pub publisher:       Arc<dyn Publisher>,
  pub request_timeout: Duration,
}

impl<S: DataStore> AppState<S> {
  /// Run a store operation under the request deadline.
  pub async fn bounded<T>(
    &self,
    op: impl Future<Output = Result<T, S::Error>>,
  ) -> Result<T, ApiError> {
    match tokio::time::timeout(self.request_timeout, op).await {
      Ok(result) => result.map_err(ApiError::from_store),
      Err(_) => {
        tracing::warn!(timeout = ?self.request_timeout, "store call timed out");
        Err(ApiError::Timeout)
      }
    }
  }
}

// ─── Router ───────────────────────────────────────────────────────────────────

/// Build the API router for `state`.
pub fn api_router<S>(state: AppState<S>) -> Router
where
  S: DataStore + Clone + Send + Sync + 'static,
{
  Router::new()
    .route("/", get(home::handler))
    .route("/login", post(login::handler::<S>))
    // Users
    .route("/users", post(users::create::<S>).get(users::list::<S>))
    .route(
      "/users/{id}",
      get(users::get_one::<S>)
        .put(users::update::<S>)
        .delete(users::delete::<S>),
    )
    // Tasks
    .route("/tasks", post(tasks::create::<S>).get(tasks::list::<S>))
    .route(
      "/tasks/{id}",
      get(tasks::get_one::<S>)
        .put(tasks::update::<S>)
        .delete(tasks::delete::<S>),
    )
    .layer(TraceLayer::new_for_http())
    .with_state(state)
}

// ─── Integration tests ────────────────────────────────────────────────────────
