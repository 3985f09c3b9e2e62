//! Handler for `workflow_run` webhook events.
//!
//! Bookkeeps CI outcomes: completed runs are logged with their conclusion,
//! and failures on the repository's default branch are raised to warn so
//! they stand out in the log stream.
//!
//! GitHub redelivers webhooks on its own schedule, and a double-counted
//! completion would skew the bookkeeping, so this handler suppresses
//! duplicates with a [`SeenSet`] keyed by run ID, attempt, and conclusion.

use async_trait::async_trait;
use serde::Deserialize;
use tracing::{debug, info, warn};

use crate::dedupe::SeenSet;
use crate::dispatch::{EventHandler, HandlerError};
use crate::types::RunId;
use crate::webhooks::EventEnvelope;

use super::{decode_payload, require_repository};

/// Reacts to `workflow_run` events.
pub struct WorkflowRunHandler {
    seen: SeenSet,
}

impl WorkflowRunHandler {
    pub fn new() -> Self {
        WorkflowRunHandler {
            seen: SeenSet::default(),
        }
    }
}

impl Default for WorkflowRunHandler {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Deserialize)]
struct WorkflowRunPayload {
    workflow_run: WorkflowRunInfo,
    repository: RepositoryInfo,
}

#[derive(Debug, Deserialize)]
struct WorkflowRunInfo {
    id: u64,
    name: Option<String>,
    head_branch: Option<String>,
    conclusion: Option<String>,
    #[serde(default = "default_attempt")]
    run_attempt: u64,
}

fn default_attempt() -> u64 {
    1
}

#[derive(Debug, Deserialize)]
struct RepositoryInfo {
    default_branch: Option<String>,
}

#[async_trait]
impl EventHandler for WorkflowRunHandler {
    fn event_type(&self) -> &'static str {
        "workflow_run"
    }

    async fn handle(&self, envelope: &EventEnvelope) -> Result<(), HandlerError> {
        let repo = require_repository(envelope)?;
        let payload: WorkflowRunPayload = decode_payload("workflow_run", envelope)?;
        let run = RunId(payload.workflow_run.id);
        let action = envelope.action.as_deref().unwrap_or("");

        if action != "completed" {
            debug!(repo = %repo, run = %run, action = %action, "workflow_run event ignored");
            return Ok(());
        }

        let conclusion = payload
            .workflow_run
            .conclusion
            .as_deref()
            .unwrap_or("unknown");

        let key = format!(
            "workflow_run:{}:{}:{}",
            run, payload.workflow_run.run_attempt, conclusion
        );
        if self.seen.check_and_mark(&key) {
            debug!(repo = %repo, run = %run, "duplicate workflow_run completion suppressed");
            return Ok(());
        }

        let branch = payload.workflow_run.head_branch.as_deref().unwrap_or("");
        let name = payload.workflow_run.name.as_deref().unwrap_or("<unnamed>");
        let on_default_branch = payload
            .repository
            .default_branch
            .as_deref()
            .is_some_and(|default| default == branch);

        if conclusion == "failure" && on_default_branch {
            warn!(
                repo = %repo,
                run = %run,
                workflow = %name,
                branch = %branch,
                attempt = payload.workflow_run.run_attempt,
                "workflow failed on the default branch"
            );
        } else {
            info!(
                repo = %repo,
                run = %run,
                workflow = %name,
                branch = %branch,
                conclusion = %conclusion,
                "workflow run completed"
            );
        }

        Ok(())
    }
}
