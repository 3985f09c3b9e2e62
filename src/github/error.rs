//! GitHub API error type.
//!
//! The service never retries upstream calls: an error is reported once per
//! delivery and GitHub's own redelivery policy applies from the outside. The
//! error type therefore stays flat, with no transient/permanent taxonomy.

use thiserror::Error;

/// A failed outbound call to the GitHub REST API.
#[derive(Debug, Error)]
pub enum ApiError {
    /// A handler called an API operation without checking availability
    /// first. Handlers are expected to guard on `GitHubClient::is_enabled`
    /// and skip with a log line instead.
    #[error("no GitHub API credential is configured")]
    NotConfigured,

    /// The underlying request failed (HTTP error, auth rejection, network).
    #[error("GitHub API call failed: {context}")]
    Request {
        /// Which operation was attempted, for the delivery log line.
        context: &'static str,
        #[source]
        source: octocrab::Error,
    },
}

impl ApiError {
    /// Wraps an octocrab error with the name of the failed operation.
    pub fn request(context: &'static str, source: octocrab::Error) -> Self {
        ApiError::Request { context, source }
    }
}
