//! EventReconciler - keeps the notification list and unread counter
//! consistent across push deliveries, user actions and server polling.
//!
//! Incremental updates give immediate feedback; the periodic count refresh
//! is authoritative and always overwrites them.

use std::sync::{Arc, Mutex, PoisonError, Weak};
use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{self, MissedTickBehavior};

use crate::domain::foundation::NotificationId;
use crate::domain::notifications::{InboxChange, Notification, NotificationInbox};
use crate::domain::realtime::PushMessage;
use crate::ports::{ApiError, NotificationApi};

/// Owner of the locally held notifications.
///
/// All state lives in one [`NotificationInbox`] behind a short-held lock;
/// the lock is never held across an `.await`. Counter changes are
/// published on a watch channel for views.
pub struct EventReconciler {
    inbox: Mutex<NotificationInbox>,
    unread_tx: watch::Sender<u32>,
    api: Arc<dyn NotificationApi>,
}

impl EventReconciler {
    pub fn new(api: Arc<dyn NotificationApi>, capacity: usize) -> Self {
        let (unread_tx, _) = watch::channel(0);
        Self {
            inbox: Mutex::new(NotificationInbox::new(capacity)),
            unread_tx,
            api,
        }
    }

    // === Push and local events ===

    pub fn apply_new_notification(&self, notification: Notification) -> InboxChange {
        let id = notification.id;
        let change = self.with_inbox(|inbox| inbox.apply_new(notification));
        if !change.is_applied() {
            tracing::debug!(notification_id = %id, "Duplicate notification ignored");
        }
        change
    }

    pub fn apply_read_receipt(&self, id: NotificationId) -> InboxChange {
        self.with_inbox(|inbox| inbox.apply_read_receipt(id))
    }

    pub fn apply_mark_all_read(&self) -> InboxChange {
        self.with_inbox(NotificationInbox::apply_mark_all_read)
    }

    /// Routes a decoded push message. Messages for other consumers are
    /// reported as unchanged.
    pub fn apply_push(&self, message: PushMessage) -> InboxChange {
        match message {
            PushMessage::Notification(n) => self.apply_new_notification(n),
            PushMessage::NotificationRead { id } => self.apply_read_receipt(id),
            PushMessage::NotificationMarkAll => self.apply_mark_all_read(),
            PushMessage::FlightSeats(_) => InboxChange::Unchanged,
        }
    }

    // === Server reconciliation ===

    /// Overwrites the counter with the server's count. Failures are logged
    /// and leave the counter as it was; returns the new count on success.
    pub async fn refresh_counter_from_server(&self) -> Option<u32> {
        match self.api.unread_count().await {
            Ok(count) => {
                let unread = self.with_inbox(|inbox| {
                    inbox.overwrite_unread(count);
                    inbox.unread()
                });
                tracing::trace!(unread, "Unread counter refreshed");
                Some(unread)
            }
            Err(e) => {
                tracing::debug!(error = %e, "Unread count refresh failed");
                None
            }
        }
    }

    /// Replaces the list with the server's and recomputes the counter from
    /// it. Returns the number of notifications now held.
    pub async fn refresh_list(&self) -> Result<usize, ApiError> {
        let notifications = self.api.list().await?;
        let held = self.with_inbox(|inbox| {
            inbox.replace_all(notifications);
            inbox.len()
        });
        tracing::debug!(held, "Notification list refreshed");
        Ok(held)
    }

    /// Starts the fixed-interval counter refresh. The first refresh runs
    /// immediately; the task stops when the handle is dropped.
    pub fn spawn_counter_poll(self: &Arc<Self>, period: Duration) -> PollHandle {
        let reconciler: Weak<Self> = Arc::downgrade(self);
        let handle = tokio::spawn(async move {
            let mut interval = time::interval(period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                interval.tick().await;
                let Some(reconciler) = reconciler.upgrade() else {
                    break;
                };
                reconciler.refresh_counter_from_server().await;
            }
        });
        PollHandle { handle }
    }

    // === User actions ===

    /// Marks one notification read on the server, then locally.
    ///
    /// On failure local state is untouched and the error is returned.
    pub async fn mark_read(&self, id: NotificationId) -> Result<InboxChange, ApiError> {
        self.api.mark_read(id).await?;
        Ok(self.apply_read_receipt(id))
    }

    /// Marks everything read on the server, then locally.
    pub async fn mark_all_read(&self) -> Result<InboxChange, ApiError> {
        self.api.mark_all_read().await?;
        Ok(self.apply_mark_all_read())
    }

    // === Read access ===

    /// Held notifications, newest first.
    pub fn snapshot(&self) -> Vec<Notification> {
        self.lock().items()
    }

    pub fn unread_count(&self) -> u32 {
        self.lock().unread()
    }

    pub fn get(&self, id: NotificationId) -> Option<Notification> {
        self.lock().get(id).cloned()
    }

    /// Receiver that observes every counter change.
    pub fn subscribe_unread(&self) -> watch::Receiver<u32> {
        self.unread_tx.subscribe()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, NotificationInbox> {
        self.inbox.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn with_inbox<R>(&self, f: impl FnOnce(&mut NotificationInbox) -> R) -> R {
        let (result, unread) = {
            let mut inbox = self.lock();
            let result = f(&mut inbox);
            (result, inbox.unread())
        };
        self.unread_tx.send_if_modified(|current| {
            if *current == unread {
                return false;
            }
            *current = unread;
            true
        });
        result
    }
}

/// Handle to the counter poll task. Dropping it stops the poll.
#[derive(Debug)]
pub struct PollHandle {
    handle: JoinHandle<()>,
}

impl PollHandle {
    pub fn stop(self) {
        self.handle.abort();
    }

    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }
}

impl Drop for PollHandle {
    fn drop(&mut self) {
        self.handle.abort();
    }
}
