//! Body and path extractors whose rejections use the API envelope.

use axum::extract::{FromRequest, FromRequestParts, Path};
use axum::Json;

use crate::error::ApiError;

/// A JSON request body. Malformed bodies answer `400`.
#[derive(Debug, FromRequest)]
#[from_request(via(Json), rejection(ApiError))]
pub struct Payload<T>(pub T);

/// A typed path parameter. Unparseable ids answer `400`.
#[derive(Debug, FromRequestParts)]
#[from_request(via(Path), rejection(ApiError))]
pub struct Id<T>(pub T);
