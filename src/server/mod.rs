//! HTTP server for the webhook service.
//!
//! This module implements the network-facing surface:
//!
//! - `POST /webhook` - accepts GitHub webhook deliveries: verifies the
//!   signature, parses the envelope, dispatches to the routed handler, and
//!   answers with the delivery's real fate
//! - `GET /health` - liveness probe
//!
//! Each delivery is handled concurrently and independently; the shared
//! [`AppState`] holds only immutable data (the secret and the supervisor
//! with its registry), so no delivery can block the acceptance of another.

use std::sync::Arc;

pub mod health;
pub mod webhook;

pub use health::health_handler;
pub use webhook::webhook_handler;

use crate::dispatch::Supervisor;

/// Shared application state, passed to handlers via Axum's `State`
/// extractor.
///
/// Cloning is cheap (one `Arc`); contents are immutable after construction.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    /// Webhook secret for HMAC-SHA256 signature verification.
    webhook_secret: Vec<u8>,

    /// The dispatch supervisor wrapping the immutable handler registry.
    supervisor: Supervisor,
}

impl AppState {
    /// Creates a new `AppState` from the signature secret and a supervisor.
    pub fn new(webhook_secret: impl Into<Vec<u8>>, supervisor: Supervisor) -> Self {
        AppState {
            inner: Arc::new(AppStateInner {
                webhook_secret: webhook_secret.into(),
                supervisor,
            }),
        }
    }

    /// Returns the webhook secret.
    pub fn webhook_secret(&self) -> &[u8] {
        &self.inner.webhook_secret
    }

    /// Returns the dispatch supervisor.
    pub fn supervisor(&self) -> &Supervisor {
        &self.inner.supervisor
    }
}

/// Builds the axum Router with all endpoints.
pub fn build_router(app_state: AppState) -> axum::Router {
    use axum::routing::{get, post};

    axum::Router::new()
        .route("/webhook", post(webhook_handler))
        .route("/health", get(health_handler))
        .with_state(app_state)
}
