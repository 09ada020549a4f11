//! Unread counter value object.

use serde::Serialize;

/// Non-negative unread count.
///
/// Incremental updates give low-latency feedback between server refreshes;
/// `overwrite` is the authoritative path and always wins.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct UnreadCounter(u32);

impl UnreadCounter {
    pub fn new(value: u32) -> Self {
        Self(value)
    }

    pub fn value(&self) -> u32 {
        self.0
    }

    pub fn increment(&mut self) {
        self.0 = self.0.saturating_add(1);
    }

    /// Decrements by one, clamped at zero.
    pub fn decrement(&mut self) {
        self.0 = self.0.saturating_sub(1);
    }

    pub fn reset(&mut self) {
        self.0 = 0;
    }

    /// Replaces the value with a server-reported count.
    ///
    /// Negative counts from a misbehaving server clamp to zero.
    pub fn overwrite(&mut self, server_count: i64) {
        self.0 = u32::try_from(server_count.max(0)).unwrap_or(u32::MAX);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn decrement_at_zero_stays_zero() {
        let mut counter = UnreadCounter::default();
        counter.decrement();
        assert_eq!(counter.value(), 0);
    }

    #[test]
    fn overwrite_clamps_negative_server_value() {
        let mut counter = UnreadCounter::new(3);
        counter.overwrite(-4);
        assert_eq!(counter.value(), 0);
    }

    #[test]
    fn overwrite_replaces_incremental_value() {
        let mut counter = UnreadCounter::new(9);
        counter.overwrite(2);
        assert_eq!(counter.value(), 2);
    }

    proptest! {
        #[test]
        fn never_underflows(ops in proptest::collection::vec(any::<bool>(), 0..200)) {
            let mut counter = UnreadCounter::default();
            let mut model: i64 = 0;
            for inc in ops {
                if inc {
                    counter.increment();
                    model += 1;
                } else {
                    counter.decrement();
                    model = (model - 1).max(0);
                }
                prop_assert_eq!(i64::from(counter.value()), model);
            }
        }
    }
}
