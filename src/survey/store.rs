//! In-memory identity store.

use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use std::sync::Arc;

use crate::observability::metrics;
use crate::survey::identity::Identity;
use crate::survey::machine::Outcome;

/// Thread-safe map of username -> survey identity.
///
/// Cloning is cheap and every clone sees the same map. Updates for one
/// username hold that entry's shard lock for the whole read-modify-write,
/// so overlapping submissions for the same user never lose an update.
#[derive(Debug, Clone, Default)]
pub struct IdentityStore {
    inner: Arc<DashMap<String, Identity>>,
}

impl IdentityStore {
    /// Create a new empty store.
    pub fn new() -> Self {
        Self {
            inner: Arc::new(DashMap::new()),
        }
    }

    /// Snapshot of the identity for `username`, if it has signed in.
    pub fn get(&self, username: &str) -> Option<Identity> {
        self.inner.get(username).map(|r| r.value().clone())
    }

    /// Whether `username` has signed in.
    pub fn contains(&self, username: &str) -> bool {
        self.inner.contains_key(username)
    }

    /// Insert a fresh identity unless one already exists.
    ///
    /// Returns `true` when a new identity was created. An existing identity
    /// keeps its progress.
    pub fn create_if_absent(&self, username: &str) -> bool {
        let created = match self.inner.entry(username.to_string()) {
            Entry::Occupied(_) => false,
            Entry::Vacant(slot) => {
                slot.insert(Identity::new());
                true
            }
        };

        if created {
            metrics::record_identity_count(self.inner.len());
            tracing::info!(username = %username, "Identity created");
        }
        created
    }

    /// Run `f` against the identity for `username` under its entry lock.
    pub fn update<R>(&self, username: &str, f: impl FnOnce(&mut Identity) -> R) -> Option<R> {
        self.inner.get_mut(username).map(|mut r| f(r.value_mut()))
    }

    /// Feed one survey input to `username`'s identity.
    ///
    /// Returns the outcome and the resulting step, or `None` for an unknown
    /// username.
    pub fn submit(&self, username: &str, input: &str) -> Option<(Outcome, u32)> {
        let (outcome, step) = self.update(username, |identity| {
            let outcome = identity.submit(input);
            (outcome, identity.step)
        })?;

        metrics::record_transition(outcome);
        if outcome == Outcome::Advanced && step == 5 {
            metrics::record_survey_completed();
        }
        tracing::debug!(username = %username, outcome = %outcome, step, "Survey input applied");
        Some((outcome, step))
    }

    /// Number of known identities.
    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_username_is_absent() {
        let store = IdentityStore::new();
        assert!(store.get("alice").is_none());
        assert!(store.submit("alice", "start survey").is_none());
        assert!(store.is_empty());
    }

    #[test]
    fn create_starts_blank() {
        let store = IdentityStore::new();
        assert!(store.create_if_absent("alice"));

        let identity = store.get("alice").unwrap();
        assert_eq!(identity, Identity::new());
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn create_is_idempotent() {
        let store = IdentityStore::new();
        store.create_if_absent("alice");
        store.submit("alice", "start survey");
        store.submit("alice", "Alice");

        assert!(!store.create_if_absent("alice"));
        let identity = store.get("alice").unwrap();
        assert_eq!(identity.step, 3);
        assert_eq!(identity.name, "Alice");
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn usernames_are_case_sensitive() {
        let store = IdentityStore::new();
        store.create_if_absent("alice");
        assert!(store.create_if_absent("Alice"));
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn clones_share_state() {
        let store = IdentityStore::new();
        let other = store.clone();
        store.create_if_absent("alice");

        assert_eq!(other.submit("alice", "start survey"), Some((Outcome::Advanced, 2)));
        assert_eq!(store.get("alice").unwrap().step, 2);
    }

    #[test]
    fn concurrent_submissions_are_not_lost() {
        let store = IdentityStore::new();
        store.create_if_absent("alice");

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let store = store.clone();
                std::thread::spawn(move || {
                    for _ in 0..25 {
                        store.submit("alice", "wrong");
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        let identity = store.get("alice").unwrap();
        assert_eq!(identity.step, 1);
        assert_eq!(identity.transcript.matches("\nwrong\n").count(), 200);
    }
}
