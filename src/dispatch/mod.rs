//! Event routing and dispatch supervision.
//!
//! This module is the mechanism half of the service:
//!
//! - [`EventHandler`]: the uniform contract every domain handler implements
//! - [`HandlerRegistry`]: the immutable event-type to handler table, built
//!   once at startup and shared read-only by all deliveries
//! - [`Supervisor`]: invokes the routed handler with failure isolation, a
//!   per-delivery deadline, and panic containment, producing a
//!   [`DispatchOutcome`] that shapes the HTTP response
//!
//! The policy half (what each handler actually does) lives in
//! [`crate::handlers`].

pub mod contract;
pub mod registry;
pub mod supervisor;

pub use contract::{EventHandler, HandlerError};
pub use registry::HandlerRegistry;
pub use supervisor::{DispatchOutcome, Supervisor, DEFAULT_HANDLER_BUDGET};
