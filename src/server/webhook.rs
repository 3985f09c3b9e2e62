//! Webhook endpoint handler.
//!
//! Accepts GitHub webhook deliveries and runs them through the pipeline:
//! signature verification first (reject before any parsing), then envelope
//! parsing, then supervised dispatch to the routed handler. The response
//! status is honest about the handler's fate so GitHub can apply its own
//! redelivery policy.

use axum::body::Bytes;
use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use thiserror::Error;
use tracing::{debug, warn};

use super::AppState;
use crate::dispatch::DispatchOutcome;
use crate::webhooks::{parse_envelope, verify_delivery, ParseError, SignatureCheck};

/// Header name for the GitHub signature.
pub const HEADER_SIGNATURE: &str = "x-hub-signature-256";

/// Terminal rejections raised before any handler is involved.
#[derive(Debug, Error)]
pub enum WebhookError {
    /// The delivery failed signature verification.
    #[error("{}", .0.reason())]
    Unauthenticated(SignatureCheck),

    /// The delivery authenticated but could not be parsed.
    #[error(transparent)]
    Parse(#[from] ParseError),
}

impl IntoResponse for WebhookError {
    fn into_response(self) -> Response {
        let status = match &self {
            WebhookError::Unauthenticated(_) => StatusCode::UNAUTHORIZED,
            WebhookError::Parse(_) => StatusCode::BAD_REQUEST,
        };
        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}

/// Webhook handler.
///
/// # Request
///
/// - Method: POST
/// - Headers:
///   - `X-Hub-Signature-256`: HMAC-SHA256 signature of the body (required)
///   - `X-GitHub-Event`: event type (required)
///   - `X-GitHub-Delivery`: opaque delivery ID (recommended)
/// - Body: raw JSON payload
///
/// # Response
///
/// - 200 OK: delivery accepted (handled, or no handler registered)
/// - 400 Bad Request: missing event header or undecodable JSON body
/// - 401 Unauthorized: missing, malformed, or mismatched signature
/// - 500 Internal Server Error: the handler failed, timed out, or panicked
pub async fn webhook_handler(
    State(app_state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Response, WebhookError> {
    // Authenticate before parsing: nothing in the body is trusted until the
    // signature over the exact raw bytes checks out.
    let signature_header = headers
        .get(HEADER_SIGNATURE)
        .and_then(|v| v.to_str().ok());
    let check = verify_delivery(app_state.webhook_secret(), &body, signature_header);
    if !check.is_valid() {
        // Reason code only; never any signature material
        warn!(reason = check.reason(), "rejected webhook delivery");
        return Err(WebhookError::Unauthenticated(check));
    }

    let envelope = parse_envelope(&headers, &body)?;

    debug!(
        event_type = %envelope.event_type,
        delivery_id = %envelope.delivery_id,
        action = envelope.action.as_deref().unwrap_or(""),
        "webhook delivery authenticated"
    );

    let outcome = app_state.supervisor().dispatch(envelope).await;

    let response = match outcome {
        DispatchOutcome::Completed => (
            StatusCode::OK,
            Json(json!({ "message": "delivery processed" })),
        ),
        DispatchOutcome::Unregistered => (
            StatusCode::OK,
            Json(json!({ "message": "accepted; no handler registered for event type" })),
        ),
        DispatchOutcome::Failed(err) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({ "error": err.to_string() })),
        ),
        DispatchOutcome::TimedOut(budget) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({
                "error": format!("handler exceeded its {}s budget", budget.as_secs())
            })),
        ),
        DispatchOutcome::Panicked(_) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({ "error": "handler panicked" })),
        ),
    };

    Ok(response.into_response())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unauthenticated_maps_to_401() {
        let response =
            WebhookError::Unauthenticated(SignatureCheck::MissingHeader).into_response();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

        let response = WebhookError::Unauthenticated(SignatureCheck::Mismatch).into_response();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[test]
    fn parse_failure_maps_to_400() {
        let parse_err = serde_json::from_slice::<serde_json::Value>(b"nope").unwrap_err();
        let response = WebhookError::Parse(ParseError::Json(parse_err)).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
