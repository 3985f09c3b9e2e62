//! Handler for `pull_request` webhook events.
//!
//! Applies path-derived area labels whenever the PR's file set changes
//! (opened, new commits, marked ready), and welcomes the author when the PR
//! is opened. Other actions are acknowledged without effect.

use std::sync::Arc;

use async_trait::async_trait;
use serde::Deserialize;
use tracing::{debug, info};

use crate::dispatch::{EventHandler, HandlerError};
use crate::github::GitHubClient;
use crate::types::PrNumber;
use crate::webhooks::EventEnvelope;

use super::labels::labels_for_paths;
use super::{decode_payload, require_repository};

/// Reacts to `pull_request` events.
pub struct PullRequestHandler {
    github: Arc<GitHubClient>,
}

impl PullRequestHandler {
    pub fn new(github: Arc<GitHubClient>) -> Self {
        PullRequestHandler { github }
    }
}

#[derive(Debug, Deserialize)]
struct PullRequestPayload {
    pull_request: PullRequestInfo,
}

#[derive(Debug, Deserialize)]
struct PullRequestInfo {
    number: u64,
    user: Option<Author>,
    #[serde(default)]
    draft: bool,
}

#[derive(Debug, Deserialize)]
struct Author {
    login: String,
}

fn welcome_text(author: &str) -> String {
    format!(
        "Thanks for the pull request, @{}! A maintainer will take a look soon. \
         Area labels have been applied automatically from the files you changed.",
        author
    )
}

#[async_trait]
impl EventHandler for PullRequestHandler {
    fn event_type(&self) -> &'static str {
        "pull_request"
    }

    async fn handle(&self, envelope: &EventEnvelope) -> Result<(), HandlerError> {
        let repo = require_repository(envelope)?;
        let payload: PullRequestPayload = decode_payload("pull_request", envelope)?;
        let pr = PrNumber(payload.pull_request.number);
        let action = envelope.action.as_deref().unwrap_or("");

        debug!(repo = %repo, pr = %pr, action = %action, "pull_request received");

        let relabel = matches!(action, "opened" | "synchronize" | "ready_for_review");
        if !relabel {
            return Ok(());
        }

        if !self.github.is_enabled() {
            debug!(repo = %repo, pr = %pr, "no API credential; skipping labels and welcome");
            return Ok(());
        }

        let files = self.github.list_changed_files(&repo, pr).await?;
        let labels = labels_for_paths(files.iter().map(String::as_str));
        if !labels.is_empty() {
            self.github.add_labels(&repo, pr.into(), &labels).await?;
            info!(repo = %repo, pr = %pr, labels = ?labels, "area labels applied");
        }

        if action == "opened" && !payload.pull_request.draft {
            let author = payload
                .pull_request
                .user
                .as_ref()
                .map(|u| u.login.as_str())
                .unwrap_or("there");
            self.github
                .create_comment(&repo, pr.into(), &welcome_text(author))
                .await?;
            info!(repo = %repo, pr = %pr, "welcome comment posted");
        }

        Ok(())
    }
}
