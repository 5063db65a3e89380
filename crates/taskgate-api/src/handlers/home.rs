use axum::Json;
use serde_json::{Value, json};

/// `GET /`
pub async fn handler() -> Json<Value> {
  Json(json!({ "success": true, "message": "Welcome To This API" }))
}
