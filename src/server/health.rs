//! Health check endpoint for liveness probes.
//!
//! Returns 200 unconditionally once the process is serving. Intended for
//! load balancers and orchestration liveness probes; no authentication.

use axum::http::StatusCode;
use axum::Json;
use chrono::Utc;
use serde_json::{json, Value};

/// Health check handler.
///
/// # Example
///
/// ```ignore
/// GET /health HTTP/1.1
///
/// HTTP/1.1 200 OK
/// Content-Type: application/json
///
/// {"status":"ok","timestamp":"2026-01-01T00:00:00+00:00"}
/// ```
pub async fn health_handler() -> (StatusCode, Json<Value>) {
    (
        StatusCode::OK,
        Json(json!({
            "status": "ok",
            "timestamp": Utc::now().to_rfc3339(),
        })),
    )
}
