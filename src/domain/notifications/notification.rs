//! Notification record as delivered by push and by the list endpoint.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{NotificationId, Timestamp};

/// A user-facing notification.
///
/// The server owns retention; the client only ever flips `read`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    pub id: NotificationId,
    #[serde(rename = "type")]
    pub kind: String,
    pub message: String,
    pub created_at: Timestamp,
    #[serde(default)]
    pub read: bool,
}

impl Notification {
    /// Marks the notification read; returns true if it was unread.
    pub fn mark_read(&mut self) -> bool {
        let was_unread = !self.read;
        self.read = true;
        was_unread
    }
}
