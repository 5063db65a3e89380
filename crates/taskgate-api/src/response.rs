//! The `{status, message, data}` envelope every endpoint answers with.

use axum::{
  Json,
  http::StatusCode,
  response::{IntoResponse, Response},
};
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct Envelope<T> {
  pub status:  u16,
  /// `"success"` or `"error"`.
  pub message: &'static str,
  pub data:    T,
}

pub fn envelope<T: Serialize>(
  status: StatusCode,
  message: &'static str,
  data: T,
) -> Response {
  let body = Envelope {
    status: status.as_u16(),
    message,
    data,
  };
  (status, Json(body)).into_response()
}

/// A successful response carrying `data`.
pub struct Success<T> {
  status: StatusCode,
  data:   T,
}

impl<T> Success<T> {
  pub fn ok(data: T) -> Self {
    Self {
      status: StatusCode::OK,
      data,
    }
  }

  pub fn created(data: T) -> Self {
    Self {
      status: StatusCode::CREATED,
      data,
    }
  }
}

impl<T: Serialize> IntoResponse for Success<T> {
  fn into_response(self) -> Response {
    envelope(self.status, "success", self.data)
  }
}
