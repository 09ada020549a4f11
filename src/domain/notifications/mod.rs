//! Notifications - list and unread counter state.

mod counter;
mod inbox;
mod notification;

pub use counter::UnreadCounter;
pub use inbox::{InboxChange, NotificationInbox, DEFAULT_INBOX_CAPACITY};
pub use notification::Notification;
