pub mod products;

use axum::{http::StatusCode, Json};
use serde_json::json;

pub async fn welcome() -> Json<serde_json::Value> {
    Json(json!({ "message": "Welcome to KAKA TRAC" }))
}

pub async fn health() -> (StatusCode, Json<serde_json::Value>) {
    (StatusCode::OK, Json(json!({ "status": "ok", "service": "inventory-service" })))
}
