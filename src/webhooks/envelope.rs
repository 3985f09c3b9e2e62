//! Webhook delivery envelope parsing.
//!
//! This module turns a raw delivery (headers + body bytes) into an
//! [`EventEnvelope`]: the uniform, routable representation every handler
//! consumes.
//!
//! # Parsing Strategy
//!
//! 1. The event type comes from the `X-GitHub-Event` header, never from the
//!    body: the body's schema varies per event type and is not trusted for
//!    routing before it has been decoded.
//! 2. The delivery ID comes from `X-GitHub-Delivery`; a missing ID degrades
//!    log correlation but never fails the request (it is not part of the
//!    trust boundary).
//! 3. The body is decoded as a JSON document; malformed JSON is a
//!    [`ParseError`], distinct from a signature failure.
//! 4. The sub-action is the body's top-level `"action"` string. Event types
//!    without one (e.g. `push`) simply have no action; absence is a valid,
//!    first-class routing case, not an error.

use axum::http::HeaderMap;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::types::{DeliveryId, RepoId};

/// Header carrying the event type (e.g. "push", "pull_request").
pub const HEADER_EVENT: &str = "x-github-event";
/// Header carrying the opaque delivery ID.
pub const HEADER_DELIVERY: &str = "x-github-delivery";

/// Error type for envelope parsing failures.
///
/// All variants are client/protocol errors and surface as HTTP 400.
#[derive(Debug, Error)]
pub enum ParseError {
    /// The `X-GitHub-Event` header is absent or empty.
    #[error("missing required header: {0}")]
    MissingEventHeader(&'static str),

    /// A header was present but not valid UTF-8.
    #[error("header {0} is not valid UTF-8")]
    InvalidHeader(&'static str),

    /// JSON deserialization of the body failed.
    #[error("invalid JSON body: {0}")]
    Json(#[from] serde_json::Error),
}

/// The parsed, structured representation of one webhook delivery.
///
/// An envelope is built once per physical HTTP delivery and handed to at
/// most one handler. It is never shared across deliveries and carries no
/// cross-request state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventEnvelope {
    /// The event type from the `X-GitHub-Event` header. Always non-empty.
    pub event_type: String,

    /// The sub-action from the body's `"action"` field, when the event type
    /// carries one. `None` for action-less events such as `push`.
    pub action: Option<String>,

    /// The delivery ID, or [`DeliveryId::unknown`] when the header was
    /// absent.
    pub delivery_id: DeliveryId,

    /// The decoded event payload. Schema is event-type-specific; handlers
    /// deserialize the parts they need.
    pub payload: serde_json::Value,
}

impl EventEnvelope {
    /// Extracts the repository this delivery concerns, if the payload names
    /// one.
    ///
    /// Most event payloads carry a `repository` object with `owner.login`
    /// and `name`. Used for log correlation; absence is tolerated.
    pub fn repository(&self) -> Option<RepoId> {
        let repository = self.payload.get("repository")?;

        let owner = repository
            .get("owner")
            .and_then(|o| o.get("login"))
            .and_then(|l| l.as_str());
        let name = repository.get("name").and_then(|n| n.as_str());

        match (owner, name) {
            (Some(owner), Some(name)) => Some(RepoId::new(owner, name)),
            _ => repository
                .get("full_name")
                .and_then(|f| f.as_str())
                .and_then(|full| {
                    let (owner, name) = full.split_once('/')?;
                    Some(RepoId::new(owner, name))
                }),
        }
    }

    /// The login of the user whose activity produced this event, if present.
    pub fn sender(&self) -> Option<&str> {
        self.payload.get("sender")?.get("login")?.as_str()
    }
}

/// Parses a raw delivery into an [`EventEnvelope`].
///
/// Header lookup is case-insensitive (axum's `HeaderMap` guarantees this).
/// The caller is expected to have verified the signature already; parsing
/// performs no authentication.
pub fn parse_envelope(headers: &HeaderMap, body: &[u8]) -> Result<EventEnvelope, ParseError> {
    let event_type = match headers.get(HEADER_EVENT) {
        None => return Err(ParseError::MissingEventHeader(HEADER_EVENT)),
        Some(value) => value
            .to_str()
            .map_err(|_| ParseError::InvalidHeader(HEADER_EVENT))?,
    };
    if event_type.is_empty() {
        return Err(ParseError::MissingEventHeader(HEADER_EVENT));
    }

    let delivery_id = headers
        .get(HEADER_DELIVERY)
        .and_then(|v| v.to_str().ok())
        .map(DeliveryId::new)
        .unwrap_or_else(DeliveryId::unknown);

    let payload: serde_json::Value = serde_json::from_slice(body)?;

    let action = payload
        .get("action")
        .and_then(|a| a.as_str())
        .map(String::from);

    Ok(EventEnvelope {
        event_type: event_type.to_string(),
        action,
        delivery_id,
        payload,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;
    use serde_json::json;

    fn headers(event: Option<&str>, delivery: Option<&str>) -> HeaderMap {
        let mut map = HeaderMap::new();
        if let Some(event) = event {
            map.insert(HEADER_EVENT, HeaderValue::from_str(event).unwrap());
        }
        if let Some(delivery) = delivery {
            map.insert(HEADER_DELIVERY, HeaderValue::from_str(delivery).unwrap());
        }
        map
    }

    #[test]
    fn parses_action_bearing_event() {
        let body = json!({
            "action": "opened",
            "pull_request": { "number": 42 },
            "repository": { "owner": { "login": "octocat" }, "name": "hello-world" }
        });

        let envelope = parse_envelope(
            &headers(Some("pull_request"), Some("d-1")),
            body.to_string().as_bytes(),
        )
        .unwrap();

        assert_eq!(envelope.event_type, "pull_request");
        assert_eq!(envelope.action.as_deref(), Some("opened"));
        assert_eq!(envelope.delivery_id, DeliveryId::new("d-1"));
        assert_eq!(envelope.payload["pull_request"]["number"], 42);
    }

    #[test]
    fn push_event_has_no_action() {
        let body = json!({
            "ref": "refs/heads/main",
            "commits": [],
            "repository": { "owner": { "login": "o" }, "name": "r" }
        });

        let envelope = parse_envelope(
            &headers(Some("push"), Some("d-2")),
            body.to_string().as_bytes(),
        )
        .unwrap();

        // Absent action stays absent; no default is invented
        assert_eq!(envelope.action, None);
    }

    #[test]
    fn non_string_action_is_ignored() {
        let body = json!({ "action": 7 });

        let envelope =
            parse_envelope(&headers(Some("issues"), None), body.to_string().as_bytes()).unwrap();

        assert_eq!(envelope.action, None);
    }

    #[test]
    fn missing_delivery_header_uses_sentinel() {
        let envelope = parse_envelope(&headers(Some("push"), None), b"{}").unwrap();

        assert!(envelope.delivery_id.is_unknown());
    }

    #[test]
    fn missing_event_header_is_error() {
        let result = parse_envelope(&headers(None, Some("d-3")), b"{}");
        assert!(matches!(result, Err(ParseError::MissingEventHeader(_))));
    }

    #[test]
    fn empty_event_header_is_error() {
        let result = parse_envelope(&headers(Some(""), None), b"{}");
        assert!(matches!(result, Err(ParseError::MissingEventHeader(_))));
    }

    #[test]
    fn malformed_json_is_error() {
        let result = parse_envelope(&headers(Some("push"), None), b"not valid json");
        assert!(matches!(result, Err(ParseError::Json(_))));
    }

    #[test]
    fn repository_from_owner_and_name() {
        let body = json!({
            "repository": { "owner": { "login": "octocat" }, "name": "hello-world" }
        });
        let envelope = parse_envelope(&headers(Some("push"), None), body.to_string().as_bytes())
            .unwrap();

        assert_eq!(
            envelope.repository(),
            Some(RepoId::new("octocat", "hello-world"))
        );
    }

    #[test]
    fn repository_falls_back_to_full_name() {
        let body = json!({ "repository": { "full_name": "o/r" } });
        let envelope = parse_envelope(&headers(Some("push"), None), body.to_string().as_bytes())
            .unwrap();

        assert_eq!(envelope.repository(), Some(RepoId::new("o", "r")));
    }

    #[test]
    fn repository_absent_is_none() {
        let envelope = parse_envelope(&headers(Some("ping"), None), b"{}").unwrap();
        assert_eq!(envelope.repository(), None);
    }

    #[test]
    fn sender_login() {
        let body = json!({ "sender": { "login": "octocat" } });
        let envelope = parse_envelope(&headers(Some("push"), None), body.to_string().as_bytes())
            .unwrap();

        assert_eq!(envelope.sender(), Some("octocat"));
    }

    mod properties {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            /// Event type, action, and delivery id survive parsing exactly as
            /// present in the input; nothing is defaulted or rewritten.
            #[test]
            fn roundtrip_preserves_routing_fields(
                event in "[a-z][a-z_]{0,30}",
                action in proptest::option::of("[a-z][a-z_]{0,20}"),
                delivery in proptest::option::of("[0-9a-f-]{1,36}"),
            ) {
                let body = match &action {
                    Some(a) => json!({ "action": a }),
                    None => json!({}),
                };

                let envelope = parse_envelope(
                    &headers(Some(&event), delivery.as_deref()),
                    body.to_string().as_bytes(),
                )
                .unwrap();

                prop_assert_eq!(&envelope.event_type, &event);
                prop_assert_eq!(envelope.action, action);
                match delivery {
                    Some(d) => prop_assert_eq!(envelope.delivery_id, DeliveryId::new(d)),
                    None => prop_assert!(envelope.delivery_id.is_unknown()),
                }
            }

            /// Envelopes serialize and deserialize without loss.
            #[test]
            fn envelope_serde_roundtrip(
                event in "[a-z][a-z_]{0,30}",
                delivery in "[0-9a-f-]{1,36}",
            ) {
                let envelope = EventEnvelope {
                    event_type: event,
                    action: Some("opened".to_string()),
                    delivery_id: DeliveryId::new(delivery),
                    payload: json!({ "number": 1 }),
                };

                let encoded = serde_json::to_string(&envelope).unwrap();
                let decoded: EventEnvelope = serde_json::from_str(&encoded).unwrap();
                prop_assert_eq!(envelope, decoded);
            }
        }
    }
}
