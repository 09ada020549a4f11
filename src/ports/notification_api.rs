//! NotificationApi port - the server's notification endpoints.

use async_trait::async_trait;

use super::ApiError;
use crate::domain::foundation::NotificationId;
use crate::domain::notifications::Notification;

/// Port for reading and acknowledging the signed-in user's notifications.
#[async_trait]
pub trait NotificationApi: Send + Sync {
    /// Full list, newest first.
    async fn list(&self) -> Result<Vec<Notification>, ApiError>;

    /// Authoritative unread count. Returned as the server sent it; callers
    /// clamp.
    async fn unread_count(&self) -> Result<i64, ApiError>;

    async fn mark_read(&self, id: NotificationId) -> Result<(), ApiError>;

    async fn mark_all_read(&self) -> Result<(), ApiError>;
}
