//! Liveness and readiness probes. The service holds no state, so it is ready
//! as soon as it is listening.

use axum::Json;
use serde_json::{json, Value};

pub async fn health() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "service": env!("CARGO_PKG_NAME"),
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

pub async fn ready() -> Json<Value> {
    Json(json!({"status": "ready"}))
}
