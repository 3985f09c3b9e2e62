//! Outbound GitHub REST API surface.
//!
//! The dispatch core never touches this module; only handlers do, through
//! the injected [`GitHubClient`] capability.

pub mod client;
pub mod error;

pub use client::GitHubClient;
pub use error::ApiError;
