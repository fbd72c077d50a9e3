//! Fake collaborators for end-to-end tests
//!
//! In-memory stand-ins for the chat backend, payment provider, and order
//! persistence endpoint, with scripted failures and controllable latency.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicU32, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use parking_lot::Mutex;
use uuid::Uuid;

use liveshop_core::{
    ChatMessage, ChatPage, ChatStore, Cursor, MessageKind, OrderRecord, OrderSink, PaymentGateway,
    PaymentId, PaymentRequest, PaymentStatus, RoomId, SyncError, SyncResult,
};

// ============================================================================
// Chat backend
// ============================================================================

/// In-memory chat backend implementing the fetch contract of the real one:
/// no `since` returns the most recent `limit` items descending, `since`
/// returns items strictly after it ascending.
pub struct FakeChatBackend {
    rooms: Mutex<HashMap<String, Vec<ChatMessage>>>,
    fetch_count: AtomicUsize,
    fetch_delay: Mutex<Duration>,
    fail_next_fetch: AtomicBool,
    fail_sends: AtomicBool,
}

impl FakeChatBackend {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            rooms: Mutex::new(HashMap::new()),
            fetch_count: AtomicUsize::new(0),
            fetch_delay: Mutex::new(Duration::ZERO),
            fail_next_fetch: AtomicBool::new(false),
            fail_sends: AtomicBool::new(false),
        })
    }

    /// Pre-populate a room's history
    pub fn seed(&self, room: &str, messages: Vec<ChatMessage>) {
        let mut rooms = self.rooms.lock();
        let log = rooms.entry(room.to_string()).or_default();
        log.extend(messages);
        log.sort_by(|a, b| a.created_at.cmp(&b.created_at));
    }

    /// Append a message server-side (another viewer talking)
    pub fn push(&self, message: ChatMessage) {
        let room = message.room_id.as_str().to_string();
        self.seed(&room, vec![message]);
    }

    /// Number of fetches served so far
    pub fn fetch_count(&self) -> usize {
        self.fetch_count.load(Ordering::SeqCst)
    }

    /// Make every fetch take this long
    pub fn set_fetch_delay(&self, delay: Duration) {
        *self.fetch_delay.lock() = delay;
    }

    /// Fail the next fetch with a transient error
    pub fn fail_next_fetch(&self) {
        self.fail_next_fetch.store(true, Ordering::SeqCst);
    }

    /// Reject all sends until re-enabled
    pub fn set_fail_sends(&self, fail: bool) {
        self.fail_sends.store(fail, Ordering::SeqCst);
    }
}

#[async_trait]
impl ChatStore for FakeChatBackend {
    async fn fetch(
        &self,
        room: &RoomId,
        since: Option<Cursor>,
        limit: usize,
    ) -> SyncResult<ChatPage> {
        self.fetch_count.fetch_add(1, Ordering::SeqCst);

        let delay = *self.fetch_delay.lock();
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }

        if self.fail_next_fetch.swap(false, Ordering::SeqCst) {
            return Err(SyncError::transient("injected fetch failure"));
        }

        let rooms = self.rooms.lock();
        let log = rooms.get(room.as_str()).cloned().unwrap_or_default();

        let items = match since {
            // Most recent `limit` items, newest first
            None => log.iter().rev().take(limit).cloned().collect(),
            // Strictly newer than the cursor, oldest first
            Some(cursor) => log
                .iter()
                .filter(|m| m.created_at > cursor.instant())
                .take(limit)
                .cloned()
                .collect(),
        };

        Ok(ChatPage { items, last_cursor: None })
    }

    async fn send(&self, room: &RoomId, author: &str, body: &str) -> SyncResult<ChatMessage> {
        if self.fail_sends.load(Ordering::SeqCst) {
            return Err(SyncError::SendFailed("injected send failure".to_string()));
        }

        let message = ChatMessage {
            id: Uuid::new_v4(),
            room_id: room.clone(),
            author: author.to_string(),
            body: body.to_string(),
            kind: MessageKind::Message,
            created_at: Utc::now(),
        };

        self.rooms
            .lock()
            .entry(room.as_str().to_string())
            .or_default()
            .push(message.clone());

        Ok(message)
    }
}

// ============================================================================
// Payment provider
// ============================================================================

/// Payment provider that replays a scripted status sequence, repeating the
/// final entry forever
pub struct FakePaymentProvider {
    statuses: Mutex<Vec<SyncResult<PaymentStatus>>>,
    initiate_error: Mutex<Option<SyncError>>,
    status_calls: AtomicU32,
    next_payment: AtomicU32,
}

impl FakePaymentProvider {
    pub fn new(statuses: Vec<SyncResult<PaymentStatus>>) -> Arc<Self> {
        Arc::new(Self {
            statuses: Mutex::new(statuses),
            initiate_error: Mutex::new(None),
            status_calls: AtomicU32::new(0),
            next_payment: AtomicU32::new(1),
        })
    }

    /// Always pending
    pub fn pending_forever() -> Arc<Self> {
        Self::new(vec![Ok(PaymentStatus::Pending)])
    }

    /// Pending `n` times, then completed with the given transaction id
    pub fn completing_after(n: usize, tx_id: &str) -> Arc<Self> {
        let mut statuses: Vec<SyncResult<PaymentStatus>> =
            std::iter::repeat_with(|| Ok(PaymentStatus::Pending)).take(n).collect();
        statuses.push(Ok(PaymentStatus::Completed { tx_id: tx_id.to_string() }));
        Self::new(statuses)
    }

    pub fn reject_initiation(&self, reason: &str) {
        *self.initiate_error.lock() = Some(SyncError::InitiationFailed(reason.to_string()));
    }

    /// Number of status fetches served so far
    pub fn status_calls(&self) -> u32 {
        self.status_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl PaymentGateway for FakePaymentProvider {
    async fn initiate(&self, _request: &PaymentRequest) -> SyncResult<PaymentId> {
        if let Some(err) = self.initiate_error.lock().take() {
            return Err(err);
        }
        let n = self.next_payment.fetch_add(1, Ordering::SeqCst);
        Ok(PaymentId::new(format!("pay_{n}")))
    }

    async fn status(&self, _id: &PaymentId) -> SyncResult<PaymentStatus> {
        self.status_calls.fetch_add(1, Ordering::SeqCst);
        let mut statuses = self.statuses.lock();
        if statuses.len() > 1 {
            statuses.remove(0)
        } else {
            statuses
                .first()
                .cloned()
                .unwrap_or(Ok(PaymentStatus::Pending))
        }
    }
}

// ============================================================================
// Order sink
// ============================================================================

/// Order sink recording everything it is handed
pub struct MemoryOrderSink {
    orders: Mutex<Vec<OrderRecord>>,
    fail: AtomicBool,
}

impl MemoryOrderSink {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            orders: Mutex::new(Vec::new()),
            fail: AtomicBool::new(false),
        })
    }

    pub fn set_fail(&self, fail: bool) {
        self.fail.store(fail, Ordering::SeqCst);
    }

    pub fn orders(&self) -> Vec<OrderRecord> {
        self.orders.lock().clone()
    }
}

#[async_trait]
impl OrderSink for MemoryOrderSink {
    async fn record(&self, order: OrderRecord) -> SyncResult<()> {
        if self.fail.load(Ordering::SeqCst) {
            return Err(SyncError::transient("orders endpoint unavailable"));
        }
        self.orders.lock().push(order);
        Ok(())
    }
}
