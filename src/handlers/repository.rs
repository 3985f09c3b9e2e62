//! Handler for `repository` webhook events.
//!
//! Repository lifecycle changes (created, deleted, archived, renamed, ...)
//! are recorded in the log stream; nothing calls out.

use async_trait::async_trait;
use tracing::info;

use crate::dispatch::{EventHandler, HandlerError};
use crate::webhooks::EventEnvelope;

use super::require_repository;

/// Reacts to `repository` events.
pub struct RepositoryHandler;

impl RepositoryHandler {
    pub fn new() -> Self {
        RepositoryHandler
    }
}

impl Default for RepositoryHandler {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl EventHandler for RepositoryHandler {
    fn event_type(&self) -> &'static str {
        "repository"
    }

    async fn handle(&self, envelope: &EventEnvelope) -> Result<(), HandlerError> {
        let repo = require_repository(envelope)?;
        let action = envelope.action.as_deref().unwrap_or("<none>");
        let sender = envelope.sender().unwrap_or("<unknown>");

        info!(repo = %repo, action = %action, sender = %sender, "repository lifecycle event");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::DeliveryId;
    use serde_json::json;

    #[tokio::test]
    async fn lifecycle_event_is_logged_and_accepted() {
        let envelope = EventEnvelope {
            event_type: "repository".to_string(),
            action: Some("renamed".to_string()),
            delivery_id: DeliveryId::new("d-repo"),
            payload: json!({
                "action": "renamed",
                "repository": { "owner": { "login": "o" }, "name": "r" },
                "sender": { "login": "admin" }
            }),
        };

        RepositoryHandler::new().handle(&envelope).await.unwrap();
    }

    #[tokio::test]
    async fn missing_repository_is_reported() {
        let envelope = EventEnvelope {
            event_type: "repository".to_string(),
            action: Some("created".to_string()),
            delivery_id: DeliveryId::new("d"),
            payload: json!({ "action": "created" }),
        };

        let err = RepositoryHandler::new().handle(&envelope).await.unwrap_err();
        assert!(matches!(err, HandlerError::MissingField("repository")));
    }
}
