//! Dispatch supervision: the single point where one bad handler is
//! prevented from taking down unrelated deliveries.
//!
//! The supervisor routes an envelope through the registry and runs the
//! selected handler on its own spawned task, so that:
//!
//! - a handler error is caught and reported, never propagated;
//! - a handler panic is contained in the task and surfaces as an outcome;
//! - a handler that exceeds the per-delivery budget is abandoned and
//!   aborted, bounding resource usage under a slow or hanging downstream
//!   API.
//!
//! Nothing here retries: the outcome shapes the HTTP response, and the
//! sending platform applies its own redelivery policy upstream.

use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinError;
use tracing::{debug, error, warn};

use crate::webhooks::EventEnvelope;

use super::contract::HandlerError;
use super::registry::HandlerRegistry;

/// Default per-delivery handler budget.
pub const DEFAULT_HANDLER_BUDGET: Duration = Duration::from_secs(30);

/// The terminal state of one delivery's dispatch.
///
/// Produced per delivery, used only to shape the HTTP response and the log
/// line; never persisted.
#[derive(Debug)]
pub enum DispatchOutcome {
    /// The routed handler ran to completion.
    Completed,

    /// No handler is registered for the event type. Not an error: the
    /// webhook configuration may be broader than this service's interests.
    Unregistered,

    /// The handler returned an error. Isolated to this delivery.
    Failed(HandlerError),

    /// The handler exceeded the per-delivery budget and was aborted.
    TimedOut(Duration),

    /// The handler panicked; the panic was contained in its task.
    Panicked(String),
}

impl DispatchOutcome {
    /// Returns true if the delivery should be acknowledged with a 2xx.
    pub fn is_accepted(&self) -> bool {
        matches!(self, DispatchOutcome::Completed | DispatchOutcome::Unregistered)
    }
}

/// Invokes handlers with failure isolation and a deadline.
///
/// Holds the immutable registry; safe to share across all concurrent
/// deliveries without synchronization.
#[derive(Clone)]
pub struct Supervisor {
    registry: Arc<HandlerRegistry>,
    budget: Duration,
}

impl Supervisor {
    /// Creates a supervisor over an explicitly constructed registry.
    pub fn new(registry: HandlerRegistry, budget: Duration) -> Self {
        Supervisor {
            registry: Arc::new(registry),
            budget,
        }
    }

    /// Creates a supervisor with the default handler budget.
    pub fn with_default_budget(registry: HandlerRegistry) -> Self {
        Self::new(registry, DEFAULT_HANDLER_BUDGET)
    }

    /// Returns the registry, for startup logging.
    pub fn registry(&self) -> &HandlerRegistry {
        &self.registry
    }

    /// Dispatches one envelope to its handler and reports the outcome.
    ///
    /// The handler runs on a spawned task: its panics and its running time
    /// are both contained here. Signature and parse failures never reach
    /// this point; every envelope handed in is authenticated and
    /// structurally valid.
    pub async fn dispatch(&self, envelope: EventEnvelope) -> DispatchOutcome {
        let Some(handler) = self.registry.route(&envelope.event_type) else {
            debug!(
                event_type = %envelope.event_type,
                delivery_id = %envelope.delivery_id,
                "no handler registered for event type; accepting as no-op"
            );
            return DispatchOutcome::Unregistered;
        };

        let handler = Arc::clone(handler);
        let envelope = Arc::new(envelope);
        let repo_label = envelope
            .repository()
            .map(|r| r.to_string())
            .unwrap_or_default();

        let task_envelope = Arc::clone(&envelope);
        let mut task = tokio::spawn(async move { handler.handle(&task_envelope).await });

        let outcome = match tokio::time::timeout(self.budget, &mut task).await {
            Err(_elapsed) => {
                task.abort();
                DispatchOutcome::TimedOut(self.budget)
            }
            Ok(Ok(Ok(()))) => DispatchOutcome::Completed,
            Ok(Ok(Err(handler_err))) => DispatchOutcome::Failed(handler_err),
            Ok(Err(join_err)) => DispatchOutcome::Panicked(panic_message(join_err)),
        };

        match &outcome {
            DispatchOutcome::Completed => {
                debug!(
                    event_type = %envelope.event_type,
                    delivery_id = %envelope.delivery_id,
                    "handler completed"
                );
            }
            DispatchOutcome::Failed(err) => {
                error!(
                    event_type = %envelope.event_type,
                    delivery_id = %envelope.delivery_id,
                    repo = %repo_label,
                    error = %err,
                    "handler failed"
                );
            }
            DispatchOutcome::TimedOut(budget) => {
                warn!(
                    event_type = %envelope.event_type,
                    delivery_id = %envelope.delivery_id,
                    repo = %repo_label,
                    budget_secs = budget.as_secs(),
                    "handler exceeded its budget and was aborted"
                );
            }
            DispatchOutcome::Panicked(message) => {
                error!(
                    event_type = %envelope.event_type,
                    delivery_id = %envelope.delivery_id,
                    repo = %repo_label,
                    panic = %message,
                    "handler panicked"
                );
            }
            DispatchOutcome::Unregistered => unreachable!("handled before spawning"),
        }

        outcome
    }
}

impl std::fmt::Debug for Supervisor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Supervisor")
            .field("registry", &self.registry)
            .field("budget", &self.budget)
            .finish()
    }
}

/// Extracts a printable message from a joined handler task that did not
/// return normally.
fn panic_message(err: JoinError) -> String {
    if err.is_panic() {
        let payload = err.into_panic();
        if let Some(s) = payload.downcast_ref::<&str>() {
            (*s).to_string()
        } else if let Some(s) = payload.downcast_ref::<String>() {
            s.clone()
        } else {
            "opaque panic payload".to_string()
        }
    } else {
        "handler task was cancelled".to_string()
    }
}
