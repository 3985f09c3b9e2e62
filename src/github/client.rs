//! Octocrab client wrapper with optional credentials.
//!
//! Handlers receive this capability at construction. When no token is
//! configured the client is the "without API" variant: `is_enabled` returns
//! false and every operation fails with [`ApiError::NotConfigured`] instead
//! of calling out. Handlers guard on `is_enabled` and skip API-dependent
//! steps with a log line, so a missing credential degrades the service to
//! observe-only mode rather than failing deliveries.
//!
//! The client is built once at startup and shared read-only by all in-flight
//! deliveries; octocrab handles its own connection reuse internally.

use octocrab::Octocrab;

use crate::types::{IssueNumber, PrNumber, RepoId};

use super::error::ApiError;

/// A GitHub REST API client that may or may not hold a credential.
#[derive(Clone)]
pub struct GitHubClient {
    inner: Option<Octocrab>,
}

impl GitHubClient {
    /// Creates a client authenticated with a personal access token.
    pub fn from_token(token: impl Into<String>) -> Result<Self, octocrab::Error> {
        let client = Octocrab::builder().personal_token(token.into()).build()?;
        Ok(GitHubClient {
            inner: Some(client),
        })
    }

    /// Creates the no-credential variant. Every operation is a no-op
    /// failure; handlers are expected to check [`Self::is_enabled`] first.
    pub fn unauthenticated() -> Self {
        GitHubClient { inner: None }
    }

    /// Returns true if outbound API calls are possible.
    pub fn is_enabled(&self) -> bool {
        self.inner.is_some()
    }

    fn api(&self) -> Result<&Octocrab, ApiError> {
        self.inner.as_ref().ok_or(ApiError::NotConfigured)
    }

    /// Lists the file paths changed by a pull request.
    pub async fn list_changed_files(
        &self,
        repo: &RepoId,
        pr: PrNumber,
    ) -> Result<Vec<String>, ApiError> {
        let page = self
            .api()?
            .pulls(&repo.owner, &repo.repo)
            .list_files(pr.0)
            .await
            .map_err(|e| ApiError::request("list pull request files", e))?;

        Ok(page.items.into_iter().map(|f| f.filename).collect())
    }

    /// Adds labels to an issue or pull request.
    pub async fn add_labels(
        &self,
        repo: &RepoId,
        issue: IssueNumber,
        labels: &[String],
    ) -> Result<(), ApiError> {
        self.api()?
            .issues(&repo.owner, &repo.repo)
            .add_labels(issue.0, labels)
            .await
            .map_err(|e| ApiError::request("add labels", e))?;
        Ok(())
    }

    /// Posts a comment on an issue or pull request conversation.
    pub async fn create_comment(
        &self,
        repo: &RepoId,
        issue: IssueNumber,
        body: &str,
    ) -> Result<(), ApiError> {
        self.api()?
            .issues(&repo.owner, &repo.repo)
            .create_comment(issue.0, body)
            .await
            .map_err(|e| ApiError::request("create comment", e))?;
        Ok(())
    }

    /// Triggers a `workflow_dispatch` event for a workflow file on a ref.
    pub async fn dispatch_workflow(
        &self,
        repo: &RepoId,
        workflow_file: &str,
        git_ref: &str,
    ) -> Result<(), ApiError> {
        self.api()?
            .actions()
            .create_workflow_dispatch(&repo.owner, &repo.repo, workflow_file, git_ref)
            .send()
            .await
            .map_err(|e| ApiError::request("dispatch workflow", e))?;
        Ok(())
    }

    /// Lists the most recent release tag names, newest first.
    pub async fn list_release_tags(&self, repo: &RepoId) -> Result<Vec<String>, ApiError> {
        let page = self
            .api()?
            .repos(&repo.owner, &repo.repo)
            .releases()
            .list()
            .per_page(10)
            .send()
            .await
            .map_err(|e| ApiError::request("list releases", e))?;

        Ok(page.items.into_iter().map(|r| r.tag_name).collect())
    }

    /// Counts the commits between two refs (`base...head`).
    ///
    /// Uses the raw compare route so the result does not depend on model
    /// types beyond the one field we read.
    pub async fn commits_between(
        &self,
        repo: &RepoId,
        base: &str,
        head: &str,
    ) -> Result<Option<u64>, ApiError> {
        let route = format!(
            "/repos/{}/{}/compare/{}...{}",
            repo.owner, repo.repo, base, head
        );
        let comparison: serde_json::Value = self
            .api()?
            .get(route, None::<&()>)
            .await
            .map_err(|e| ApiError::request("compare commits", e))?;

        Ok(comparison.get("total_commits").and_then(|c| c.as_u64()))
    }
}

impl std::fmt::Debug for GitHubClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GitHubClient")
            .field("enabled", &self.is_enabled())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unauthenticated_client_is_disabled() {
        let client = GitHubClient::unauthenticated();
        assert!(!client.is_enabled());
    }

    #[tokio::test]
    async fn disabled_client_fails_without_network() {
        let client = GitHubClient::unauthenticated();
        let repo = RepoId::new("octocat", "hello-world");

        let result = client.list_changed_files(&repo, PrNumber(1)).await;
        assert!(matches!(result, Err(ApiError::NotConfigured)));

        let result = client
            .add_labels(&repo, IssueNumber(1), &["bug".to_string()])
            .await;
        assert!(matches!(result, Err(ApiError::NotConfigured)));

        let result = client.commits_between(&repo, "v1", "v2").await;
        assert!(matches!(result, Err(ApiError::NotConfigured)));
    }

    #[test]
    fn debug_never_exposes_credentials() {
        let client = GitHubClient::unauthenticated();
        let rendered = format!("{:?}", client);
        assert!(rendered.contains("enabled"));
    }
}
