//! Cursor store
//!
//! Holds, per active subscription, the last-seen cursor value. A `None`
//! lookup means no poll has completed yet and the caller should issue an
//! initial full fetch instead of an incremental one.

use dashmap::DashMap;

use liveshop_core::{Cursor, SubscriptionId};

/// In-memory cursor store, scoped to the lifetime of its subscriptions.
///
/// Uses `DashMap` so independent subscriptions (e.g. two open chat panels)
/// can be polled concurrently without a shared lock.
#[derive(Default)]
pub struct CursorStore {
    cursors: DashMap<SubscriptionId, Cursor>,
}

impl CursorStore {
    /// Create an empty cursor store
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Last-seen cursor for a subscription, or `None` before the first
    /// completed poll
    pub fn get(&self, subscription: &SubscriptionId) -> Option<Cursor> {
        self.cursors.get(subscription).map(|c| *c)
    }

    /// Overwrite the cursor unconditionally.
    ///
    /// Callers guarantee monotonicity by always passing the newest observed
    /// value; `Cursor::advance_to` makes that cheap to uphold.
    pub fn set(&self, subscription: SubscriptionId, cursor: Cursor) {
        self.cursors.insert(subscription, cursor);
    }

    /// Discard a subscription's cursor when the subscription is destroyed
    pub fn remove(&self, subscription: &SubscriptionId) {
        self.cursors.remove(subscription);
    }

    /// Number of tracked subscriptions
    pub fn len(&self) -> usize {
        self.cursors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cursors.is_empty()
    }
}

impl std::fmt::Debug for CursorStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CursorStore")
            .field("subscriptions", &self.cursors.len())
            .finish()
    }
}
