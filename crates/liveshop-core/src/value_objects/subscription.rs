//! Subscription identity
//!
//! A subscription is a live interest in an external resource's changes:
//! either a chat room's message log or a payment's status. Each subscription
//! owns its own cursor and attempt state; nothing is shared across
//! subscriptions.

use serde::{Deserialize, Serialize};

use super::{PaymentId, RoomId};

/// What kind of resource a subscription polls
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SubscriptionKind {
    Chat,
    Payment,
}

impl std::fmt::Display for SubscriptionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Chat => write!(f, "chat"),
            Self::Payment => write!(f, "payment"),
        }
    }
}

/// Identifies one polled resource
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SubscriptionId {
    kind: SubscriptionKind,
    key: String,
}

impl SubscriptionId {
    /// Subscription for a chat room
    #[must_use]
    pub fn chat(room: &RoomId) -> Self {
        Self {
            kind: SubscriptionKind::Chat,
            key: room.as_str().to_string(),
        }
    }

    /// Subscription for a payment's status
    #[must_use]
    pub fn payment(payment: &PaymentId) -> Self {
        Self {
            kind: SubscriptionKind::Payment,
            key: payment.as_str().to_string(),
        }
    }

    #[inline]
    #[must_use]
    pub fn kind(&self) -> SubscriptionKind {
        self.kind
    }

    #[inline]
    #[must_use]
    pub fn key(&self) -> &str {
        &self.key
    }
}

impl std::fmt::Display for SubscriptionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.kind, self.key)
    }
}
