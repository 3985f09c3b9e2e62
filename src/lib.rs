//! repo-steward - a GitHub webhook service for repository automation.
//!
//! The service authenticates signed webhook deliveries, parses them into a
//! uniform envelope, routes each to a per-event-type handler through an
//! immutable registry, and supervises handler execution with failure
//! isolation, a per-delivery deadline, and panic containment.

pub mod config;
pub mod dedupe;
pub mod dispatch;
pub mod github;
pub mod handlers;
pub mod server;
pub mod types;
pub mod webhooks;
