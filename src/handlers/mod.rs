//! Domain handlers for GitHub webhook events.
//!
//! Each handler implements [`crate::dispatch::EventHandler`] for one event
//! type and carries the automation policy for it. The dispatch core treats
//! them uniformly; everything event-specific (which actions matter, which
//! payload fields to read, which API calls to make) lives here.
//!
//! # Event Types
//!
//! | Event | Handler | Policy |
//! |-------|---------|--------|
//! | `push` | [`PushHandler`] | push summary, dependency-audit dispatch |
//! | `pull_request` | [`PullRequestHandler`] | area labels, welcome comment |
//! | `release` | [`ReleaseHandler`] | release metrics |
//! | `workflow_run` | [`WorkflowRunHandler`] | CI bookkeeping with dedup |
//! | `issues` | [`IssuesHandler`] | triage label, welcome comment |
//! | `repository` | [`RepositoryHandler`] | lifecycle logging |
//!
//! Handlers that call the GitHub API check the injected capability first and
//! skip with a log line when no credential is configured; a missing token
//! degrades the service to observe-only mode, it never fails deliveries.

pub mod issues;
pub mod labels;
pub mod pull_request;
pub mod push;
pub mod release;
pub mod repository;
pub mod workflow_run;

use std::sync::Arc;

use serde::de::DeserializeOwned;

use crate::dispatch::{HandlerError, HandlerRegistry};
use crate::github::GitHubClient;
use crate::types::RepoId;
use crate::webhooks::EventEnvelope;

pub use issues::IssuesHandler;
pub use pull_request::PullRequestHandler;
pub use push::PushHandler;
pub use release::ReleaseHandler;
pub use repository::RepositoryHandler;
pub use workflow_run::WorkflowRunHandler;

/// Builds the production registry: all six handlers, sharing one API
/// capability.
///
/// Constructed once in `main` and moved into the supervisor; tests build
/// their own registries with spy handlers instead.
pub fn default_registry(github: Arc<GitHubClient>) -> HandlerRegistry {
    HandlerRegistry::new()
        .register(Arc::new(PushHandler::new(Arc::clone(&github))))
        .register(Arc::new(PullRequestHandler::new(Arc::clone(&github))))
        .register(Arc::new(ReleaseHandler::new(Arc::clone(&github))))
        .register(Arc::new(WorkflowRunHandler::new()))
        .register(Arc::new(IssuesHandler::new(github)))
        .register(Arc::new(RepositoryHandler::new()))
}

/// Deserializes the envelope payload into a handler's view of it.
fn decode_payload<T: DeserializeOwned>(
    event_type: &'static str,
    envelope: &EventEnvelope,
) -> Result<T, HandlerError> {
    serde_json::from_value(envelope.payload.clone())
        .map_err(|source| HandlerError::Payload { event_type, source })
}

/// Extracts the repository every handler needs for context.
fn require_repository(envelope: &EventEnvelope) -> Result<RepoId, HandlerError> {
    envelope
        .repository()
        .ok_or(HandlerError::MissingField("repository"))
}
