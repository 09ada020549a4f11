//! NotificationApi over REST.

use async_trait::async_trait;

use serde::de::IgnoredAny;

use super::dto::UnreadCountDto;
use super::RestClient;
use crate::domain::foundation::NotificationId;
use crate::domain::notifications::Notification;
use crate::ports::{ApiError, NotificationApi};

#[async_trait]
impl NotificationApi for RestClient {
    async fn list(&self) -> Result<Vec<Notification>, ApiError> {
        self.get_json("/notifications/", &[]).await
    }

    async fn unread_count(&self) -> Result<i64, ApiError> {
        let dto: UnreadCountDto = self.get_json("/notifications/unread-count", &[]).await?;
        Ok(dto.unread)
    }

    async fn mark_read(&self, id: NotificationId) -> Result<(), ApiError> {
        let _: IgnoredAny = self
            .post_json(&format!("/notifications/{id}/read"), &[])
            .await?;
        Ok(())
    }

    async fn mark_all_read(&self) -> Result<(), ApiError> {
        let _: IgnoredAny = self.post_json("/notifications/mark-all-read", &[]).await?;
        Ok(())
    }
}
