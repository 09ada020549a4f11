//! Notification inbox - the reconciled list + counter pair.
//!
//! Pure state with no I/O. Every operation is idempotent or clamped so the
//! inbox converges no matter how push deliveries, user actions and server
//! refreshes interleave.

use std::collections::{HashSet, VecDeque};

use super::{Notification, UnreadCounter};
use crate::domain::foundation::NotificationId;

/// Default number of notifications held locally.
///
/// Matches the page size of the list endpoint, so a full refresh is never
/// truncated on arrival.
pub const DEFAULT_INBOX_CAPACITY: usize = 200;

/// How many held-capacities worth of ids are remembered for deduplication
/// after the notifications themselves have been truncated away.
const SEEN_IDS_PER_SLOT: usize = 4;

/// Outcome of applying an event to the inbox.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InboxChange {
    /// State changed.
    Applied,
    /// The event was already reflected; nothing changed.
    Unchanged,
}

impl InboxChange {
    pub fn is_applied(&self) -> bool {
        matches!(self, InboxChange::Applied)
    }
}

/// Locally held notifications, newest first, plus the unread counter.
#[derive(Debug, Clone)]
pub struct NotificationInbox {
    items: VecDeque<Notification>,
    unread: UnreadCounter,
    capacity: usize,
    seen: SeenIds,
}

impl NotificationInbox {
    /// Creates an empty inbox bounded to `capacity` items (minimum 1).
    pub fn new(capacity: usize) -> Self {
        Self {
            items: VecDeque::new(),
            unread: UnreadCounter::default(),
            capacity: capacity.max(1),
            seen: SeenIds::new(capacity.max(1).saturating_mul(SEEN_IDS_PER_SLOT)),
        }
    }

    pub fn unread(&self) -> u32 {
        self.unread.value()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn get(&self, id: NotificationId) -> Option<&Notification> {
        self.items.iter().find(|n| n.id == id)
    }

    /// Returns a copy of the held notifications, newest first.
    pub fn items(&self) -> Vec<Notification> {
        self.items.iter().cloned().collect()
    }

    /// Applies a pushed notification.
    ///
    /// Duplicate ids are ignored, including ids whose notification has
    /// already been truncated away. New items are prepended; items beyond
    /// the capacity are dropped from the tail. The counter is only
    /// incremented for unread items, and is not touched by truncation: the
    /// dropped tail still exists server-side and the next count refresh
    /// accounts for it.
    pub fn apply_new(&mut self, notification: Notification) -> InboxChange {
        if self.get(notification.id).is_some() || !self.seen.insert(notification.id) {
            return InboxChange::Unchanged;
        }
        let unread = !notification.read;
        self.items.push_front(notification);
        self.items.truncate(self.capacity);
        if unread {
            self.unread.increment();
        }
        InboxChange::Applied
    }

    /// Marks one notification read if it is held and unread.
    pub fn apply_read_receipt(&mut self, id: NotificationId) -> InboxChange {
        match self.items.iter_mut().find(|n| n.id == id) {
            Some(n) => {
                if n.mark_read() {
                    self.unread.decrement();
                    InboxChange::Applied
                } else {
                    InboxChange::Unchanged
                }
            }
            None => InboxChange::Unchanged,
        }
    }

    /// Marks everything read and zeroes the counter.
    pub fn apply_mark_all_read(&mut self) -> InboxChange {
        let mut changed = self.unread.value() != 0;
        for n in self.items.iter_mut() {
            changed |= n.mark_read();
        }
        self.unread.reset();
        if changed {
            InboxChange::Applied
        } else {
            InboxChange::Unchanged
        }
    }

    /// Replaces the list wholesale and recomputes the counter from it.
    ///
    /// The counter reflects every unread item in the fetched list, including
    /// those past the capacity that are not kept locally.
    pub fn replace_all(&mut self, notifications: Vec<Notification>) {
        let mut items: VecDeque<Notification> = VecDeque::with_capacity(notifications.len());
        for n in notifications {
            if !items.iter().any(|held| held.id == n.id) {
                self.seen.insert(n.id);
                items.push_back(n);
            }
        }
        let unread = items.iter().filter(|n| !n.read).count();
        items.truncate(self.capacity);
        self.items = items;
        self.unread.overwrite(i64::try_from(unread).unwrap_or(i64::MAX));
    }

    /// Overwrites the counter with the authoritative server count.
    pub fn overwrite_unread(&mut self, server_count: i64) -> InboxChange {
        let before = self.unread;
        self.unread.overwrite(server_count);
        if before == self.unread {
            InboxChange::Unchanged
        } else {
            InboxChange::Applied
        }
    }
}

/// Bounded, insertion-ordered set of notification ids already applied.
#[derive(Debug, Clone)]
struct SeenIds {
    ids: HashSet<NotificationId>,
    order: VecDeque<NotificationId>,
    limit: usize,
}

impl SeenIds {
    fn new(limit: usize) -> Self {
        Self {
            ids: HashSet::new(),
            order: VecDeque::new(),
            limit: limit.max(1),
        }
    }

    /// Records `id`; returns false if it was already recorded.
    fn insert(&mut self, id: NotificationId) -> bool {
        if !self.ids.insert(id) {
            return false;
        }
        self.order.push_back(id);
        while self.order.len() > self.limit {
            if let Some(oldest) = self.order.pop_front() {
                self.ids.remove(&oldest);
            }
        }
        true
    }
}

impl Default for NotificationInbox {
    fn default() -> Self {
        Self::new(DEFAULT_INBOX_CAPACITY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::Timestamp;
    use proptest::prelude::*;

    fn notification(id: i64, read: bool) -> Notification {
        Notification {
            id: NotificationId::new(id),
            kind: "flight_update".to_string(),
            message: format!("notification {id}"),
            created_at: Timestamp::now(),
            read,
        }
    }

    #[test]
    fn duplicate_push_is_ignored() {
        let mut inbox = NotificationInbox::default();

        assert!(inbox.apply_new(notification(5, false)).is_applied());
        assert_eq!(inbox.apply_new(notification(5, false)), InboxChange::Unchanged);

        assert_eq!(inbox.len(), 1);
        assert_eq!(inbox.unread(), 1);
    }

    #[test]
    fn read_push_does_not_increment() {
        let mut inbox = NotificationInbox::default();
        inbox.apply_new(notification(1, true));
        assert_eq!(inbox.unread(), 0);
        assert_eq!(inbox.len(), 1);
    }

    #[test]
    fn new_items_are_prepended() {
        let mut inbox = NotificationInbox::default();
        inbox.apply_new(notification(1, false));
        inbox.apply_new(notification(2, false));

        let ids: Vec<i64> = inbox.items().iter().map(|n| n.id.value()).collect();
        assert_eq!(ids, vec![2, 1]);
    }

    #[test]
    fn capacity_drops_oldest() {
        let mut inbox = NotificationInbox::new(2);
        inbox.apply_new(notification(1, false));
        inbox.apply_new(notification(2, false));
        inbox.apply_new(notification(3, false));

        let ids: Vec<i64> = inbox.items().iter().map(|n| n.id.value()).collect();
        assert_eq!(ids, vec![3, 2]);
        assert_eq!(inbox.unread(), 3);
    }

    #[test]
    fn read_receipt_marks_and_decrements_once() {
        let mut inbox = NotificationInbox::default();
        inbox.apply_new(notification(5, false));

        assert!(inbox.apply_read_receipt(NotificationId::new(5)).is_applied());
        assert_eq!(inbox.apply_read_receipt(NotificationId::new(5)), InboxChange::Unchanged);

        assert_eq!(inbox.unread(), 0);
        assert!(inbox.get(NotificationId::new(5)).unwrap().read);
    }

    #[test]
    fn read_receipt_for_unknown_id_is_noop() {
        let mut inbox = NotificationInbox::default();
        inbox.overwrite_unread(4);

        assert_eq!(inbox.apply_read_receipt(NotificationId::new(99)), InboxChange::Unchanged);
        assert_eq!(inbox.unread(), 4);
    }

    #[test]
    fn mark_all_read_zeroes_counter_even_with_unloaded_items() {
        let mut inbox = NotificationInbox::default();
        inbox.overwrite_unread(7);
        inbox.apply_new(notification(1, false));

        assert!(inbox.apply_mark_all_read().is_applied());
        assert_eq!(inbox.unread(), 0);
        assert!(inbox.items().iter().all(|n| n.read));
        assert_eq!(inbox.apply_mark_all_read(), InboxChange::Unchanged);
    }

    #[test]
    fn replace_all_recomputes_counter() {
        let mut inbox = NotificationInbox::default();
        for id in 0..5 {
            inbox.apply_new(notification(id, false));
        }
        assert_eq!(inbox.unread(), 5);

        inbox.replace_all(vec![notification(10, false), notification(11, true)]);

        assert_eq!(inbox.len(), 2);
        assert_eq!(inbox.unread(), 1);
    }

    #[test]
    fn replace_all_counts_unread_beyond_capacity() {
        let mut inbox = NotificationInbox::new(2);

        inbox.replace_all(vec![
            notification(5, false),
            notification(4, false),
            notification(3, true),
            notification(2, false),
        ]);

        let ids: Vec<i64> = inbox.items().iter().map(|n| n.id.value()).collect();
        assert_eq!(ids, vec![5, 4]);
        assert_eq!(inbox.unread(), 3);
    }

    #[test]
    fn replayed_push_after_truncation_is_ignored() {
        let mut inbox = NotificationInbox::new(2);
        inbox.apply_new(notification(1, false));
        inbox.apply_new(notification(2, false));
        inbox.apply_new(notification(3, false));
        assert!(inbox.get(NotificationId::new(1)).is_none());

        assert_eq!(inbox.apply_new(notification(1, false)), InboxChange::Unchanged);

        assert_eq!(inbox.unread(), 3);
        assert_eq!(inbox.len(), 2);
    }

    #[test]
    fn seen_ids_are_bounded() {
        let mut seen = SeenIds::new(2);
        assert!(seen.insert(NotificationId::new(1)));
        assert!(seen.insert(NotificationId::new(2)));
        assert!(!seen.insert(NotificationId::new(1)));
        assert!(seen.insert(NotificationId::new(3)));

        // 1 was evicted as the oldest entry.
        assert!(seen.insert(NotificationId::new(1)));
    }

    #[test]
    fn read_receipt_for_already_read_item_is_noop() {
        let mut inbox = NotificationInbox::default();
        inbox.apply_new(notification(1, true));
        inbox.overwrite_unread(2);

        assert_eq!(inbox.apply_read_receipt(NotificationId::new(1)), InboxChange::Unchanged);
        assert_eq!(inbox.unread(), 2);
    }

    #[test]
    fn replace_all_collapses_duplicate_ids() {
        let mut inbox = NotificationInbox::default();
        inbox.replace_all(vec![notification(1, false), notification(1, false)]);
        assert_eq!(inbox.len(), 1);
        assert_eq!(inbox.unread(), 1);
    }

    #[test]
    fn overwrite_wins_over_incremental_state() {
        let mut inbox = NotificationInbox::default();
        inbox.apply_new(notification(1, false));
        inbox.apply_new(notification(2, false));

        inbox.overwrite_unread(0);
        assert_eq!(inbox.unread(), 0);
    }

    #[derive(Debug, Clone)]
    enum Op {
        Push(i64, bool),
        Read(i64),
        MarkAll,
        Refresh(Vec<(i64, bool)>),
    }

    fn op_strategy() -> impl Strategy<Value = Op> {
        prop_oneof![
            (0i64..20, any::<bool>()).prop_map(|(id, read)| Op::Push(id, read)),
            (0i64..20).prop_map(Op::Read),
            Just(Op::MarkAll),
            proptest::collection::vec((0i64..20, any::<bool>()), 0..10).prop_map(Op::Refresh),
        ]
    }

    proptest! {
        #[test]
        fn refresh_converges_regardless_of_history(
            history in proptest::collection::vec(op_strategy(), 0..60),
            fetched in proptest::collection::vec((0i64..20, any::<bool>()), 0..15),
        ) {
            let mut inbox = NotificationInbox::new(8);
            for op in history {
                match op {
                    Op::Push(id, read) => { inbox.apply_new(notification(id, read)); }
                    Op::Read(id) => { inbox.apply_read_receipt(NotificationId::new(id)); }
                    Op::MarkAll => { inbox.apply_mark_all_read(); }
                    Op::Refresh(list) => {
                        inbox.replace_all(list.into_iter().map(|(id, r)| notification(id, r)).collect());
                    }
                }
            }

            let mut ids = HashSet::new();
            let expected = fetched
                .iter()
                .filter(|(id, _)| ids.insert(*id))
                .filter(|(_, read)| !read)
                .count() as u32;

            inbox.replace_all(fetched.into_iter().map(|(id, r)| notification(id, r)).collect());

            prop_assert_eq!(inbox.unread(), expected);
            prop_assert!(inbox.len() <= inbox.capacity());
        }

        #[test]
        fn duplicate_push_never_changes_state(id in 0i64..50, read in any::<bool>()) {
            let mut inbox = NotificationInbox::default();
            inbox.apply_new(notification(id, read));
            let (len, unread) = (inbox.len(), inbox.unread());

            inbox.apply_new(notification(id, read));
            prop_assert_eq!(inbox.len(), len);
            prop_assert_eq!(inbox.unread(), unread);
        }
    }
}
