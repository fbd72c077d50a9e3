//! Collaborator port definitions
//!
//! Contracts with the external services behind the polling engine. The
//! engine never sees transport details; implementations map their failures
//! into the `SyncError` taxonomy before returning.

use async_trait::async_trait;

use crate::entities::{ChatMessage, OrderRecord, PaymentRequest};
use crate::error::SyncResult;
use crate::value_objects::{Cursor, PaymentId, RoomId};

// ============================================================================
// Chat
// ============================================================================

/// One page of chat messages returned by a fetch
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ChatPage {
    /// Fetched items. Descending by `created_at` for an initial fetch
    /// (`since = None`), ascending for an incremental one.
    pub items: Vec<ChatMessage>,
    /// Server-reported cursor covering this page, when provided
    pub last_cursor: Option<Cursor>,
}

impl ChatPage {
    /// Page with no items
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// Chat fetch and send collaborator
#[async_trait]
pub trait ChatStore: Send + Sync {
    /// Fetch messages for a room.
    ///
    /// `since = None` returns the most recent `limit` items in descending
    /// order (initial load). `since = Some(c)` returns items with
    /// `created_at > c` in ascending order, capped at `limit`.
    async fn fetch(&self, room: &RoomId, since: Option<Cursor>, limit: usize)
        -> SyncResult<ChatPage>;

    /// Send a message; returns the persisted item for optimistic append
    async fn send(&self, room: &RoomId, author: &str, body: &str) -> SyncResult<ChatMessage>;
}

// ============================================================================
// Payment
// ============================================================================

/// Status vocabulary of the payment provider.
///
/// Anything outside the known set arrives as `Other` and is treated as
/// "still pending" by the terminal-state detector. Implementations map
/// their wire format into this enum.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PaymentStatus {
    Pending,
    Completed { tx_id: String },
    Failed { reason: String },
    Other(String),
}

impl PaymentStatus {
    /// Check if the provider considers this payment settled, either way
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed { .. } | Self::Failed { .. })
    }
}

/// Payment initiation and status collaborator
#[async_trait]
pub trait PaymentGateway: Send + Sync {
    /// Initiate a payment. One-shot: never retried, and a failure here
    /// means status polling never starts.
    async fn initiate(&self, request: &PaymentRequest) -> SyncResult<PaymentId>;

    /// Fetch the current status of a payment
    async fn status(&self, id: &PaymentId) -> SyncResult<PaymentStatus>;
}

// ============================================================================
// Orders
// ============================================================================

/// Order persistence collaborator.
///
/// Invoked exactly once after a `completed` status. A failure here is
/// reported but never rolls back the payment, which is already final.
#[async_trait]
pub trait OrderSink: Send + Sync {
    async fn record(&self, order: OrderRecord) -> SyncResult<()>;
}
