//! Newtype wrappers for domain identifiers.
//!
//! These types prevent accidental mixing of different ID types (e.g., using a
//! workflow run ID where an issue number is expected) and make the code more
//! self-documenting.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A GitHub webhook delivery ID.
///
/// Assigned by GitHub per physical delivery attempt. The same ID may show up
/// again when GitHub redelivers a webhook, so it is a correlation key for
/// logging and handler-level dedup, not a uniqueness guarantee.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DeliveryId(pub String);

impl DeliveryId {
    pub fn new(s: impl Into<String>) -> Self {
        DeliveryId(s.into())
    }

    /// Sentinel ID for deliveries that arrived without an
    /// `X-GitHub-Delivery` header. Log correlation is degraded but the
    /// delivery is still processed.
    pub fn unknown() -> Self {
        DeliveryId(String::new())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns true if this is the sentinel for a missing delivery header.
    pub fn is_unknown(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for DeliveryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            write!(f, "<no-delivery-id>")
        } else {
            write!(f, "{}", self.0)
        }
    }
}

impl From<String> for DeliveryId {
    fn from(s: String) -> Self {
        DeliveryId(s)
    }
}

/// A repository identifier (owner/repo format).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RepoId {
    pub owner: String,
    pub repo: String,
}

impl RepoId {
    pub fn new(owner: impl Into<String>, repo: impl Into<String>) -> Self {
        RepoId {
            owner: owner.into(),
            repo: repo.into(),
        }
    }
}

impl fmt::Display for RepoId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.owner, self.repo)
    }
}

/// A pull request number within a repository.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PrNumber(pub u64);

impl fmt::Display for PrNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

impl From<u64> for PrNumber {
    fn from(n: u64) -> Self {
        PrNumber(n)
    }
}

/// An issue number within a repository.
///
/// GitHub's issues API addresses pull requests too (labels and conversation
/// comments live on the issue side), so a `PrNumber` converts into this.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct IssueNumber(pub u64);

impl fmt::Display for IssueNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

impl From<u64> for IssueNumber {
    fn from(n: u64) -> Self {
        IssueNumber(n)
    }
}

impl From<PrNumber> for IssueNumber {
    fn from(pr: PrNumber) -> Self {
        IssueNumber(pr.0)
    }
}

/// A workflow run ID.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RunId(pub u64);

impl fmt::Display for RunId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for RunId {
    fn from(n: u64) -> Self {
        RunId(n)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    mod delivery_id {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn serde_roundtrip(s in "[0-9a-f]{8}-[0-9a-f]{4}-[0-9a-f]{4}-[0-9a-f]{4}-[0-9a-f]{12}") {
                let id = DeliveryId::new(&s);
                let json = serde_json::to_string(&id).unwrap();
                let parsed: DeliveryId = serde_json::from_str(&json).unwrap();
                prop_assert_eq!(id, parsed);
            }

            #[test]
            fn nonempty_is_not_unknown(s in "[0-9a-f]{1,36}") {
                prop_assert!(!DeliveryId::new(&s).is_unknown());
            }
        }

        #[test]
        fn unknown_sentinel() {
            let id = DeliveryId::unknown();
            assert!(id.is_unknown());
            assert_eq!(format!("{}", id), "<no-delivery-id>");
        }
    }

    mod repo_id {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn serde_roundtrip(
                owner in "[a-zA-Z][a-zA-Z0-9-]{0,38}",
                repo in "[a-zA-Z][a-zA-Z0-9_-]{0,99}"
            ) {
                let id = RepoId::new(&owner, &repo);
                let json = serde_json::to_string(&id).unwrap();
                let parsed: RepoId = serde_json::from_str(&json).unwrap();
                prop_assert_eq!(id, parsed);
            }

            #[test]
            fn display_format(
                owner in "[a-zA-Z][a-zA-Z0-9-]{0,38}",
                repo in "[a-zA-Z][a-zA-Z0-9_-]{0,99}"
            ) {
                let id = RepoId::new(&owner, &repo);
                prop_assert_eq!(format!("{}", id), format!("{}/{}", owner, repo));
            }
        }
    }

    mod numbers {
        use super::*;

        #[test]
        fn pr_number_display() {
            assert_eq!(format!("{}", PrNumber(42)), "#42");
        }

        #[test]
        fn pr_converts_to_issue_number() {
            let issue: IssueNumber = PrNumber(7).into();
            assert_eq!(issue, IssueNumber(7));
        }

        #[test]
        fn serde_is_transparent() {
            assert_eq!(serde_json::to_string(&PrNumber(5)).unwrap(), "5");
            assert_eq!(serde_json::to_string(&IssueNumber(6)).unwrap(), "6");
            assert_eq!(serde_json::to_string(&RunId(7)).unwrap(), "7");
        }
    }
}
