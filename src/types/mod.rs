//! Core domain types shared across the service.

pub mod ids;

pub use ids::{DeliveryId, IssueNumber, PrNumber, RepoId, RunId};
