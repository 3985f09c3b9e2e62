//! Handler for `issues` webhook events.
//!
//! New issues get a triage label and a short welcome so reporters know the
//! issue landed somewhere. Other actions are acknowledged without effect.

use std::sync::Arc;

use async_trait::async_trait;
use serde::Deserialize;
use tracing::{debug, info};

use crate::dispatch::{EventHandler, HandlerError};
use crate::github::GitHubClient;
use crate::types::IssueNumber;
use crate::webhooks::EventEnvelope;

use super::{decode_payload, require_repository};

/// Label applied to every newly opened issue.
const TRIAGE_LABEL: &str = "needs-triage";

/// Reacts to `issues` events.
pub struct IssuesHandler {
    github: Arc<GitHubClient>,
}

impl IssuesHandler {
    pub fn new(github: Arc<GitHubClient>) -> Self {
        IssuesHandler { github }
    }
}

#[derive(Debug, Deserialize)]
struct IssuesPayload {
    issue: IssueInfo,
}

#[derive(Debug, Deserialize)]
struct IssueInfo {
    number: u64,
    user: Option<Reporter>,
}

#[derive(Debug, Deserialize)]
struct Reporter {
    login: String,
}

fn welcome_text(reporter: &str) -> String {
    format!(
        "Thanks for the report, @{}! This issue has been queued for triage.",
        reporter
    )
}

#[async_trait]
impl EventHandler for IssuesHandler {
    fn event_type(&self) -> &'static str {
        "issues"
    }

    async fn handle(&self, envelope: &EventEnvelope) -> Result<(), HandlerError> {
        let repo = require_repository(envelope)?;
        let payload: IssuesPayload = decode_payload("issues", envelope)?;
        let issue = IssueNumber(payload.issue.number);
        let action = envelope.action.as_deref().unwrap_or("");

        if action != "opened" {
            debug!(repo = %repo, issue = %issue, action = %action, "issues event ignored");
            return Ok(());
        }

        if !self.github.is_enabled() {
            debug!(repo = %repo, issue = %issue, "no API credential; skipping triage label and welcome");
            return Ok(());
        }

        self.github
            .add_labels(&repo, issue, &[TRIAGE_LABEL.to_string()])
            .await?;

        let reporter = payload
            .issue
            .user
            .as_ref()
            .map(|u| u.login.as_str())
            .unwrap_or("there");
        self.github
            .create_comment(&repo, issue, &welcome_text(reporter))
            .await?;

        info!(repo = %repo, issue = %issue, reporter = %reporter, "new issue triaged");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::DeliveryId;
    use serde_json::json;

    fn issues_envelope(action: &str) -> EventEnvelope {
        EventEnvelope {
            event_type: "issues".to_string(),
            action: Some(action.to_string()),
            delivery_id: DeliveryId::new("d-issue"),
            payload: json!({
                "action": action,
                "issue": { "number": 9, "user": { "login": "reporter" } },
                "repository": { "owner": { "login": "o" }, "name": "r" }
            }),
        }
    }

    fn handler() -> IssuesHandler {
        IssuesHandler::new(Arc::new(GitHubClient::unauthenticated()))
    }

    #[tokio::test]
    async fn opened_without_credential_is_a_noop() {
        handler().handle(&issues_envelope("opened")).await.unwrap();
    }

    #[tokio::test]
    async fn other_actions_are_ignored() {
        for action in ["closed", "edited", "reopened", "assigned"] {
            handler().handle(&issues_envelope(action)).await.unwrap();
        }
    }

    #[tokio::test]
    async fn missing_issue_object_is_a_payload_error() {
        let envelope = EventEnvelope {
            event_type: "issues".to_string(),
            action: Some("opened".to_string()),
            delivery_id: DeliveryId::new("d"),
            payload: json!({
                "action": "opened",
                "repository": { "owner": { "login": "o" }, "name": "r" }
            }),
        };

        let err = handler().handle(&envelope).await.unwrap_err();
        assert!(matches!(
            err,
            HandlerError::Payload { event_type: "issues", .. }
        ));
    }

    #[test]
    fn welcome_text_mentions_the_reporter() {
        assert!(welcome_text("someone").contains("@someone"));
    }
}
