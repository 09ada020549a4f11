//! Mock NotificationApi.

use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use super::lock;
use crate::domain::foundation::NotificationId;
use crate::domain::notifications::Notification;
use crate::ports::{ApiError, NotificationApi};

/// In-memory notification server.
///
/// # Example
///
/// ```ignore
/// let api = MockNotificationApi::new().with_notifications(vec![n1, n2]);
/// api.fail_next(ApiError::network("down"));
/// assert!(api.unread_count().await.is_err());
/// ```
#[derive(Debug, Clone, Default)]
pub struct MockNotificationApi {
    notifications: Arc<Mutex<Vec<Notification>>>,
    unread_override: Arc<Mutex<Option<i64>>>,
    errors: Arc<Mutex<VecDeque<ApiError>>>,
    calls: Arc<Mutex<Vec<&'static str>>>,
}

impl MockNotificationApi {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_notifications(self, notifications: Vec<Notification>) -> Self {
        self.set_notifications(notifications);
        self
    }

    pub fn set_notifications(&self, notifications: Vec<Notification>) {
        *lock(&self.notifications) = notifications;
    }

    /// Makes `unread_count` report `count` regardless of the list.
    pub fn set_unread(&self, count: i64) {
        *lock(&self.unread_override) = Some(count);
    }

    /// Queues an error for the next call, whichever operation it is.
    pub fn fail_next(&self, error: ApiError) {
        lock(&self.errors).push_back(error);
    }

    pub fn calls(&self) -> Vec<&'static str> {
        lock(&self.calls).clone()
    }

    pub fn call_count(&self, op: &str) -> usize {
        lock(&self.calls).iter().filter(|c| **c == op).count()
    }

    fn begin(&self, op: &'static str) -> Result<(), ApiError> {
        lock(&self.calls).push(op);
        match lock(&self.errors).pop_front() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl NotificationApi for MockNotificationApi {
    async fn list(&self) -> Result<Vec<Notification>, ApiError> {
        self.begin("list")?;
        Ok(lock(&self.notifications).clone())
    }

    async fn unread_count(&self) -> Result<i64, ApiError> {
        self.begin("unread_count")?;
        if let Some(count) = *lock(&self.unread_override) {
            return Ok(count);
        }
        Ok(lock(&self.notifications).iter().filter(|n| !n.read).count() as i64)
    }

    async fn mark_read(&self, id: NotificationId) -> Result<(), ApiError> {
        self.begin("mark_read")?;
        let mut notifications = lock(&self.notifications);
        let notification = notifications
            .iter_mut()
            .find(|n| n.id == id)
            .ok_or_else(|| ApiError::NotFound("Not found".to_string()))?;
        notification.read = true;
        Ok(())
    }

    async fn mark_all_read(&self) -> Result<(), ApiError> {
        self.begin("mark_all_read")?;
        for notification in lock(&self.notifications).iter_mut() {
            notification.read = true;
        }
        Ok(())
    }
}
