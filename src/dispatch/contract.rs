//! The handler contract.
//!
//! Every domain handler implements [`EventHandler`] and is invoked
//! polymorphically by the supervisor. The contract is deliberately narrow:
//! the core guarantees that the full envelope is delivered intact, exactly
//! once per physical HTTP delivery; everything else (branching on the
//! action, reading payload sub-fields, talking to the GitHub API) is the
//! handler's own business.
//!
//! Deliveries are at-least-once: GitHub may redeliver the same event, and
//! the core performs no deduplication. A handler whose side effects must be
//! idempotent implements its own suppression (see [`crate::dedupe`]).

use async_trait::async_trait;
use thiserror::Error;

use crate::github::ApiError;
use crate::webhooks::EventEnvelope;

/// Errors a handler can surface to the supervisor.
///
/// Any of these is isolated per delivery: it is logged with full context and
/// reflected as a 500 response, and never affects other deliveries.
#[derive(Debug, Error)]
pub enum HandlerError {
    /// An outbound GitHub API call failed.
    #[error(transparent)]
    Api(#[from] ApiError),

    /// The payload is structurally valid JSON but is missing a field this
    /// handler requires.
    #[error("payload is missing required field: {0}")]
    MissingField(&'static str),

    /// The payload's shape did not match what this event type delivers.
    #[error("malformed payload for {event_type}: {source}")]
    Payload {
        event_type: &'static str,
        #[source]
        source: serde_json::Error,
    },
}

/// A domain handler for one webhook event type.
///
/// Implementations must be cheap to construct and safe to share: one
/// instance serves all concurrent deliveries of its event type, with no
/// interior mutability on the hot path.
#[async_trait]
pub trait EventHandler: Send + Sync {
    /// The event type this handler reacts to (e.g. `"push"`). Used as the
    /// routing key when the handler is registered.
    fn event_type(&self) -> &'static str;

    /// Processes one delivery.
    ///
    /// May perform outbound API calls and may fail; the supervisor isolates
    /// failures. Must not block indefinitely; the supervisor enforces a
    /// deadline regardless.
    async fn handle(&self, envelope: &EventEnvelope) -> Result<(), HandlerError>;
}
