//! Handler for `release` webhook events.
//!
//! On `published`, records release metrics: the new tag and, when the API is
//! available, the number of commits since the previous release tag.

use std::sync::Arc;

use async_trait::async_trait;
use serde::Deserialize;
use tracing::{debug, info};

use crate::dispatch::{EventHandler, HandlerError};
use crate::github::GitHubClient;
use crate::webhooks::EventEnvelope;

use super::{decode_payload, require_repository};

/// Reacts to `release` events.
pub struct ReleaseHandler {
    github: Arc<GitHubClient>,
}

impl ReleaseHandler {
    pub fn new(github: Arc<GitHubClient>) -> Self {
        ReleaseHandler { github }
    }
}

#[derive(Debug, Deserialize)]
struct ReleasePayload {
    release: ReleaseInfo,
}

#[derive(Debug, Deserialize)]
struct ReleaseInfo {
    tag_name: String,
    #[serde(default)]
    prerelease: bool,
}

#[async_trait]
impl EventHandler for ReleaseHandler {
    fn event_type(&self) -> &'static str {
        "release"
    }

    async fn handle(&self, envelope: &EventEnvelope) -> Result<(), HandlerError> {
        let repo = require_repository(envelope)?;
        let payload: ReleasePayload = decode_payload("release", envelope)?;
        let tag = &payload.release.tag_name;
        let action = envelope.action.as_deref().unwrap_or("");

        if action != "published" {
            debug!(repo = %repo, tag = %tag, action = %action, "release event ignored");
            return Ok(());
        }

        if !self.github.is_enabled() {
            info!(
                repo = %repo,
                tag = %tag,
                prerelease = payload.release.prerelease,
                "release published (no API credential; commit metrics unavailable)"
            );
            return Ok(());
        }

        // The newest listed tag is the one this event announces; the one
        // after it is the previous release.
        let tags = self.github.list_release_tags(&repo).await?;
        let previous = tags.iter().find(|t| *t != tag);

        let commits = match previous {
            Some(previous) => self.github.commits_between(&repo, previous, tag).await?,
            None => None,
        };

        match (previous, commits) {
            (Some(previous), Some(commits)) => info!(
                repo = %repo,
                tag = %tag,
                previous = %previous,
                commits,
                prerelease = payload.release.prerelease,
                "release published"
            ),
            _ => info!(
                repo = %repo,
                tag = %tag,
                prerelease = payload.release.prerelease,
                "release published (first release or comparison unavailable)"
            ),
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::DeliveryId;
    use serde_json::json;

    fn release_envelope(action: &str, tag: &str) -> EventEnvelope {
        EventEnvelope {
            event_type: "release".to_string(),
            action: Some(action.to_string()),
            delivery_id: DeliveryId::new("d-rel"),
            payload: json!({
                "action": action,
                "release": { "tag_name": tag, "prerelease": false },
                "repository": { "owner": { "login": "o" }, "name": "r" }
            }),
        }
    }

    fn handler() -> ReleaseHandler {
        ReleaseHandler::new(Arc::new(GitHubClient::unauthenticated()))
    }

    #[tokio::test]
    async fn published_without_credential_logs_and_succeeds() {
        handler()
            .handle(&release_envelope("published", "v1.2.0"))
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn non_published_actions_are_ignored() {
        for action in ["created", "edited", "deleted", "prereleased"] {
            handler()
                .handle(&release_envelope(action, "v1.2.0"))
                .await
                .unwrap();
        }
    }

    #[tokio::test]
    async fn missing_release_object_is_a_payload_error() {
        let envelope = EventEnvelope {
            event_type: "release".to_string(),
            action: Some("published".to_string()),
            delivery_id: DeliveryId::new("d"),
            payload: json!({
                "action": "published",
                "repository": { "owner": { "login": "o" }, "name": "r" }
            }),
        };

        let err = handler().handle(&envelope).await.unwrap_err();
        assert!(matches!(
            err,
            HandlerError::Payload { event_type: "release", .. }
        ));
    }
}
