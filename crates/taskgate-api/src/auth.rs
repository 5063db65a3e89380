//! Bearer-token extraction and the authenticated [`Caller`] extractor.

use axum::{
  extract::FromRequestParts,
  http::{HeaderMap, header::AUTHORIZATION, request::Parts},
};
use taskgate_core::{
  Role,
  notify::Notification,
  store::DataStore,
  token::{Claims, TokenService},
};

use crate::{AppState, error::ApiError};

/// The token from an `Authorization` header of exactly two space-separated
/// segments, e.g. `Bearer <token>`.
pub fn try_extract(headers: &HeaderMap) -> Option<&str> {
  let value = headers.get(AUTHORIZATION)?.to_str().ok()?;
  let mut segments = value.split(' ');
  match (segments.next(), segments.next(), segments.next()) {
    (Some(_), Some(token), None) => Some(token),
    _ => None,
  }
}

/// [`try_extract`], with absence collapsed to an empty string.
pub fn extract_token(headers: &HeaderMap) -> String {
  try_extract(headers).unwrap_or_default().to_owned()
}

/// Fail-closed role check over a request's headers.
pub fn has_role(headers: &HeaderMap, tokens: &TokenService, role: Role) -> bool {
  try_extract(headers).is_some_and(|token| tokens.has_role(token, role))
}

/// The validated identity behind a request.
///
/// Extracting a `Caller` also announces technician activity on the
/// notification queue; if that fails the request is aborted.
#[derive(Debug, Clone)]
pub struct Caller(pub Claims);

impl Caller {
  pub fn id(&self) -> u32 { self.0.user_id }

  pub fn is_manager(&self) -> bool { self.0.has_role(Role::Manager) }
}

impl<S> FromRequestParts<AppState<S>> for Caller
where
  S: DataStore + Clone + Send + Sync + 'static,
{
  type Rejection = ApiError;

  async fn from_request_parts(
    parts: &mut Parts,
    state: &AppState<S>,
  ) -> Result<Self, Self::Rejection> {
    let token = try_extract(&parts.headers).ok_or(ApiError::Unauthorized)?;
    let claims = state.tokens.validate(token)?;

    if claims.has_role(Role::Technician) {
      let notification =
        Notification::new(claims.user_id, parts.method.as_str(), parts.uri.to_string());
      notification.send(state.publisher.as_ref()).map_err(|e| {
        tracing::warn!(user_id = claims.user_id, error = %e, "notification failed");
        ApiError::Notification
      })?;
    }

    Ok(Caller(claims))
  }
}

#[cfg(test)]
mod tests {
  use axum::http::HeaderValue;

  use super::*;

  fn headers(value: &str) -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(AUTHORIZATION, HeaderValue::from_str(value).unwrap());
    headers
  }

  #[test]
  fn bearer_token_is_second_segment() {
    assert_eq!(try_extract(&headers("Bearer abc.def.ghi")), Some("abc.def.ghi"));
    assert_eq!(extract_token(&headers("Bearer abc")), "abc");
  }

  #[test]
  fn wrong_segment_counts_yield_nothing() {
    assert_eq!(try_extract(&HeaderMap::new()), None);
    assert_eq!(try_extract(&headers("abc")), None);
    assert_eq!(try_extract(&headers("Bearer a b")), None);
    assert_eq!(extract_token(&headers("Bearer  abc")), "");
  }

  #[test]
  fn header_role_check_fails_closed() {
    let tokens = TokenService::new("header-secret").unwrap();
    let token = tokens.issue(4, Role::Technician).unwrap();
    let with = headers(&format!("Bearer {token}"));

    assert!(has_role(&with, &tokens, Role::Technician));
    assert!(!has_role(&with, &tokens, Role::Manager));
    assert!(!has_role(&HeaderMap::new(), &tokens, Role::Technician));
  }
}
