//! Handler-level duplicate suppression.
//!
//! The dispatch core is at-least-once: GitHub may redeliver an event (same
//! or different delivery ID), and the router forwards every authenticated
//! delivery. A handler whose side effects must not be repeated keeps its own
//! [`SeenSet`], keyed by whatever identifies the logical event for that
//! handler (e.g. a workflow run ID plus its conclusion).
//!
//! Keys expire after a TTL so the set stays bounded; GitHub's redelivery
//! window is far shorter than the default 24 hours.

use std::collections::HashMap;
use std::sync::Mutex;

use chrono::{DateTime, Duration, Utc};

/// Default TTL for seen keys.
pub const DEFAULT_SEEN_TTL_HOURS: i64 = 24;

/// A TTL-bounded set of already-processed logical event keys.
///
/// Interior mutability via a plain mutex: the lock is held only for the map
/// operation, never across an await point.
#[derive(Debug)]
pub struct SeenSet {
    ttl: Duration,
    inner: Mutex<HashMap<String, DateTime<Utc>>>,
}

impl SeenSet {
    /// Creates a set whose keys expire after `ttl_hours`.
    pub fn new(ttl_hours: i64) -> Self {
        SeenSet {
            ttl: Duration::hours(ttl_hours),
            inner: Mutex::new(HashMap::new()),
        }
    }

    /// Returns true if `key` was already marked within the TTL; otherwise
    /// marks it now and returns false.
    ///
    /// Expired keys are pruned on the way through, so the set never grows
    /// beyond the events of one TTL window.
    pub fn check_and_mark(&self, key: &str) -> bool {
        let now = Utc::now();
        let cutoff = now - self.ttl;

        let mut seen = self.inner.lock().expect("seen-set mutex poisoned");
        seen.retain(|_, marked_at| *marked_at > cutoff);

        if seen.contains_key(key) {
            true
        } else {
            seen.insert(key.to_string(), now);
            false
        }
    }

    /// Number of live (unexpired) keys.
    pub fn len(&self) -> usize {
        self.inner.lock().expect("seen-set mutex poisoned").len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for SeenSet {
    fn default() -> Self {
        SeenSet::new(DEFAULT_SEEN_TTL_HOURS)
    }
}
