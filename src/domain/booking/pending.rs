//! Pending optimistic mutations, at most one per key.

use std::collections::HashMap;
use std::fmt::Debug;
use std::hash::Hash;

use crate::domain::foundation::{DomainError, ErrorCode, Timestamp};

/// One optimistic write that has been applied locally but not yet confirmed.
#[derive(Debug, Clone, PartialEq)]
pub struct PendingMutation<K, V> {
    pub key: K,
    pub previous_value: V,
    pub applied_value: V,
    pub started_at: Timestamp,
}

/// Registry of in-flight optimistic mutations.
///
/// A second mutation for a key that already has one in flight is refused
/// rather than queued, so optimistic deltas never compound.
#[derive(Debug)]
pub struct PendingMutations<K, V> {
    entries: HashMap<K, PendingMutation<K, V>>,
}

impl<K, V> PendingMutations<K, V>
where
    K: Eq + Hash + Clone + Debug,
{
    pub fn new() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }

    /// Registers a mutation, refusing if the key is already pending.
    pub fn begin(&mut self, key: K, previous_value: V, applied_value: V) -> Result<(), DomainError> {
        if self.entries.contains_key(&key) {
            return Err(DomainError::new(
                ErrorCode::MutationInFlight,
                "Another change for this item is still in progress",
            )
            .with_detail("key", format!("{key:?}")));
        }
        self.entries.insert(
            key.clone(),
            PendingMutation {
                key,
                previous_value,
                applied_value,
                started_at: Timestamp::now(),
            },
        );
        Ok(())
    }

    /// Removes and returns the pending entry, on success and failure alike.
    pub fn finish(&mut self, key: &K) -> Option<PendingMutation<K, V>> {
        self.entries.remove(key)
    }

    pub fn get(&self, key: &K) -> Option<&PendingMutation<K, V>> {
        self.entries.get(key)
    }

    pub fn is_pending(&self, key: &K) -> bool {
        self.entries.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<K, V> Default for PendingMutations<K, V>
where
    K: Eq + Hash + Clone + Debug,
{
    fn default() -> Self {
        Self::new()
    }
}
