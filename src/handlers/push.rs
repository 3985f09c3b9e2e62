//! Handler for `push` webhook events.
//!
//! Push events carry no `action`; the handler summarizes the push and, when
//! the commits touch a dependency manifest, dispatches the repository's
//! dependency-audit workflow so the change gets a fresh audit run.

use std::sync::Arc;

use async_trait::async_trait;
use serde::Deserialize;
use tracing::{debug, info};

use crate::dispatch::{EventHandler, HandlerError};
use crate::github::GitHubClient;
use crate::webhooks::EventEnvelope;

use super::{decode_payload, require_repository};

/// Workflow file dispatched when a push touches dependency manifests.
const AUDIT_WORKFLOW: &str = "dependency-audit.yml";

/// Reacts to `push` events.
pub struct PushHandler {
    github: Arc<GitHubClient>,
}

impl PushHandler {
    pub fn new(github: Arc<GitHubClient>) -> Self {
        PushHandler { github }
    }
}

#[derive(Debug, Deserialize)]
struct PushPayload {
    #[serde(rename = "ref")]
    git_ref: String,
    #[serde(default)]
    commits: Vec<PushCommit>,
    pusher: Option<Pusher>,
}

#[derive(Debug, Deserialize)]
struct PushCommit {
    id: String,
    #[serde(default)]
    added: Vec<String>,
    #[serde(default)]
    modified: Vec<String>,
    #[serde(default)]
    removed: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct Pusher {
    name: Option<String>,
}

impl PushPayload {
    /// All file paths touched across the pushed commits.
    fn touched_paths(&self) -> impl Iterator<Item = &str> {
        self.commits.iter().flat_map(|c| {
            c.added
                .iter()
                .chain(c.modified.iter())
                .chain(c.removed.iter())
                .map(String::as_str)
        })
    }

    /// The branch name, when the ref is a branch push (not a tag).
    fn branch(&self) -> Option<&str> {
        self.git_ref.strip_prefix("refs/heads/")
    }
}

#[async_trait]
impl EventHandler for PushHandler {
    fn event_type(&self) -> &'static str {
        "push"
    }

    async fn handle(&self, envelope: &EventEnvelope) -> Result<(), HandlerError> {
        let repo = require_repository(envelope)?;
        let push: PushPayload = decode_payload("push", envelope)?;

        info!(
            repo = %repo,
            git_ref = %push.git_ref,
            commits = push.commits.len(),
            pusher = push
                .pusher
                .as_ref()
                .and_then(|p| p.name.as_deref())
                .unwrap_or("<unknown>"),
            head = push.commits.last().map(|c| c.id.as_str()).unwrap_or(""),
            "push received"
        );

        let manifests_touched = push
            .touched_paths()
            .any(super::labels::is_dependency_manifest);
        if !manifests_touched {
            return Ok(());
        }

        let Some(branch) = push.branch() else {
            debug!(repo = %repo, git_ref = %push.git_ref, "manifest change on non-branch ref; skipping audit");
            return Ok(());
        };

        if !self.github.is_enabled() {
            debug!(
                repo = %repo,
                branch = %branch,
                "no API credential; skipping dependency-audit dispatch"
            );
            return Ok(());
        }

        self.github
            .dispatch_workflow(&repo, AUDIT_WORKFLOW, branch)
            .await?;
        info!(repo = %repo, branch = %branch, workflow = AUDIT_WORKFLOW, "dependency-audit workflow dispatched");

        Ok(())
    }
}
