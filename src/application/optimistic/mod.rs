//! Optimistic mutations - apply locally, confirm with the server, and roll
//! back plus refetch on refusal.
//!
//! At most one mutation per key is in flight; a second request for the
//! same key is refused rather than queued. In-flight writes are never
//! cancelled: their completion applies to whatever state exists then.

mod seat_adjuster;
mod ticket_canceller;

pub use seat_adjuster::SeatAdjuster;
pub use ticket_canceller::TicketCanceller;

use std::fmt::{Debug, Display};
use std::hash::Hash;
use std::sync::{Mutex, MutexGuard, PoisonError};

use thiserror::Error;

use crate::domain::booking::PendingMutations;
use crate::ports::ApiError;

/// User-visible failures of an optimistic write.
#[derive(Debug, Error)]
pub enum MutationError {
    /// Another write for the same record has not completed yet.
    #[error("a change for {0} is already in progress")]
    InFlight(String),

    /// The record is not loaded in the view.
    #[error("{0} is not loaded")]
    UnknownRecord(String),

    /// The server refused or could not be reached; local state was rolled
    /// back.
    #[error("{message}")]
    Rejected {
        message: String,
        #[source]
        source: ApiError,
    },
}

impl MutationError {
    pub fn rejected(source: ApiError) -> Self {
        MutationError::Rejected {
            message: source.user_message(),
            source,
        }
    }

    /// Message suitable for an inline error next to the control.
    pub fn user_message(&self) -> String {
        self.to_string()
    }
}

/// Registry of pending optimistic writes keyed by record.
pub struct OptimisticController<K, V> {
    pending: Mutex<PendingMutations<K, V>>,
}

impl<K, V> OptimisticController<K, V>
where
    K: Eq + Hash + Clone + Debug + Display,
{
    pub fn new() -> Self {
        Self {
            pending: Mutex::new(PendingMutations::new()),
        }
    }

    /// Registers a write for `key`. The returned guard releases the key
    /// when dropped, whichever way the write ends.
    pub fn begin(
        &self,
        key: K,
        previous: V,
        applied: V,
    ) -> Result<PendingGuard<'_, K, V>, MutationError> {
        self.lock()
            .begin(key.clone(), previous, applied)
            .map_err(|_| MutationError::InFlight(key.to_string()))?;
        Ok(PendingGuard {
            controller: self,
            key,
        })
    }

    pub fn is_pending(&self, key: &K) -> bool {
        self.lock().is_pending(key)
    }

    pub fn pending_count(&self) -> usize {
        self.lock().len()
    }

    fn lock(&self) -> MutexGuard<'_, PendingMutations<K, V>> {
        self.pending.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl<K, V> Default for OptimisticController<K, V>
where
    K: Eq + Hash + Clone + Debug + Display,
{
    fn default() -> Self {
        Self::new()
    }
}

/// Keeps a key pending for as long as it lives.
pub struct PendingGuard<'a, K, V>
where
    K: Eq + Hash + Clone + Debug + Display,
{
    controller: &'a OptimisticController<K, V>,
    key: K,
}

impl<K, V> PendingGuard<'_, K, V>
where
    K: Eq + Hash + Clone + Debug + Display,
{
    /// The value the record had before the optimistic write.
    pub fn previous(&self) -> Option<V>
    where
        V: Clone,
    {
        self.controller
            .lock()
            .get(&self.key)
            .map(|p| p.previous_value.clone())
    }
}

impl<K, V> Drop for PendingGuard<'_, K, V>
where
    K: Eq + Hash + Clone + Debug + Display,
{
    fn drop(&mut self) {
        self.controller.lock().finish(&self.key);
    }
}
