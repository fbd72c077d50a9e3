//! End-to-end scenario tests for the polling synchronization engine
//!
//! All timing-sensitive tests run under paused tokio time, so a "120 second"
//! payment timeout completes instantly and deterministically.
//!
//! Run with: cargo test -p integration-tests --test sync_tests

use std::sync::Arc;
use std::time::Duration;

use integration_tests::{
    at, message_at, payment_request, FakeChatBackend, FakePaymentProvider, MemoryOrderSink,
};
use liveshop_common::SyncConfig;
use liveshop_core::{Cursor, PaymentStatus, RoomId, SyncError};
use liveshop_sync::{ChatSession, CursorStore, PaymentFlow};

fn config() -> SyncConfig {
    SyncConfig::default()
}

fn open_session(backend: &Arc<FakeChatBackend>, room: &str) -> (ChatSession, Arc<CursorStore>) {
    let cursors = Arc::new(CursorStore::new());
    let session = ChatSession::open(
        backend.clone(),
        cursors.clone(),
        RoomId::new(room),
        &config(),
    );
    (session, cursors)
}

// ============================================================================
// Chat scenarios
// ============================================================================

#[tokio::test(start_paused = true)]
async fn test_initial_load_reverses_descending_history() {
    let backend = FakeChatBackend::new();
    backend.seed(
        "room-1",
        vec![
            message_at("room-1", 10, "first"),
            message_at("room-1", 20, "second"),
            message_at("room-1", 30, "third"),
        ],
    );

    let (session, cursors) = open_session(&backend, "room-1");
    tokio::time::sleep(Duration::from_millis(50)).await;

    let log = session.messages();
    assert_eq!(log.len(), 3);
    assert_eq!(log[0].body, "first");
    assert_eq!(log[2].body, "third");
    assert!(log.windows(2).all(|w| w[0].created_at <= w[1].created_at));

    let sub = liveshop_core::SubscriptionId::chat(&RoomId::new("room-1"));
    assert_eq!(cursors.get(&sub), Some(Cursor::at(at(30))));

    session.close();
}

#[tokio::test(start_paused = true)]
async fn test_send_and_poll_interleave() {
    // Initial fetch returns one item; a user send is appended directly; the
    // next poll (since = sent time) returns nothing and changes nothing.
    let backend = FakeChatBackend::new();
    backend.seed("room-1", vec![message_at("room-1", 10, "hello")]);

    let (session, _cursors) = open_session(&backend, "room-1");
    tokio::time::sleep(Duration::from_millis(50)).await;
    assert_eq!(session.len(), 1);

    let sent = session.send("buyer-1", "does it ship today?").await.unwrap();
    assert_eq!(session.len(), 2);
    assert_eq!(session.messages()[1].id, sent.id);

    // Two more poll intervals: the log must not change or duplicate
    tokio::time::sleep(Duration::from_secs(7)).await;
    let log = session.messages();
    assert_eq!(log.len(), 2);
    assert_eq!(log.iter().filter(|m| m.id == sent.id).count(), 1);

    session.close();
}

#[tokio::test(start_paused = true)]
async fn test_other_viewers_messages_arrive_on_next_poll() {
    let backend = FakeChatBackend::new();
    backend.seed("room-1", vec![message_at("room-1", 10, "hi")]);

    let (session, _) = open_session(&backend, "room-1");
    tokio::time::sleep(Duration::from_millis(50)).await;
    assert_eq!(session.len(), 1);

    // Another viewer talks after the cursor
    backend.push(message_at("room-1", 40, "price?"));
    backend.push(message_at("room-1", 50, "sold!"));

    tokio::time::sleep(Duration::from_secs(3)).await;
    let log = session.messages();
    assert_eq!(log.len(), 3);
    assert_eq!(log[2].body, "sold!");

    session.close();
}

#[tokio::test(start_paused = true)]
async fn test_transient_fetch_error_recovers_silently() {
    let backend = FakeChatBackend::new();
    backend.seed("room-1", vec![message_at("room-1", 10, "hi")]);
    backend.fail_next_fetch();

    let (session, _) = open_session(&backend, "room-1");

    tokio::time::sleep(Duration::from_millis(50)).await;
    assert!(session.is_empty());
    assert!(session.is_active());

    // Next tick retries and succeeds
    tokio::time::sleep(Duration::from_secs(3)).await;
    assert_eq!(session.len(), 1);

    session.close();
}

#[tokio::test(start_paused = true)]
async fn test_send_failure_leaves_log_untouched() {
    let backend = FakeChatBackend::new();
    backend.set_fail_sends(true);

    let (session, _) = open_session(&backend, "room-1");
    tokio::time::sleep(Duration::from_millis(50)).await;

    let err = session.send("buyer-1", "hello").await.unwrap_err();
    assert!(matches!(err, SyncError::SendFailed(_)));
    assert!(session.is_empty());

    session.close();
}

#[tokio::test(start_paused = true)]
async fn test_no_overlapping_fetches_with_slow_backend() {
    let backend = FakeChatBackend::new();
    // Each fetch outlasts three 3s intervals
    backend.set_fetch_delay(Duration::from_secs(10));

    let (session, _) = open_session(&backend, "room-1");

    tokio::time::sleep(Duration::from_secs(30)).await;
    session.close();
    tokio::time::sleep(Duration::from_secs(15)).await;

    // Serialized fetches: ~3 in 30s, nowhere near the 10 a bursty
    // scheduler would have issued
    assert!(backend.fetch_count() <= 4, "fetches = {}", backend.fetch_count());
}

#[tokio::test(start_paused = true)]
async fn test_closing_mid_fetch_discards_late_result() {
    let backend = FakeChatBackend::new();
    backend.seed(
        "room-1",
        vec![
            message_at("room-1", 10, "a"),
            message_at("room-1", 20, "b"),
            message_at("room-1", 30, "c"),
        ],
    );
    backend.set_fetch_delay(Duration::from_millis(500));

    let (session, cursors) = open_session(&backend, "room-1");
    tokio::time::sleep(Duration::from_millis(600)).await;
    assert_eq!(session.len(), 3);

    // New items the in-flight fetch at t=3s will return
    backend.push(message_at("room-1", 40, "d"));
    backend.push(message_at("room-1", 50, "e"));

    // Close while that fetch is in flight
    tokio::time::sleep(Duration::from_millis(2600)).await;
    session.close();

    // Let the late response resolve; the destroyed panel must not change
    tokio::time::sleep(Duration::from_secs(2)).await;
    assert_eq!(session.len(), 3);
    assert!(!session.is_active());
    assert!(cursors.is_empty());
}

#[tokio::test(start_paused = true)]
async fn test_two_panels_poll_independently() {
    let backend = FakeChatBackend::new();
    backend.seed("room-a", vec![message_at("room-a", 10, "a1")]);
    backend.seed(
        "room-b",
        vec![message_at("room-b", 10, "b1"), message_at("room-b", 20, "b2")],
    );

    let cursors = Arc::new(CursorStore::new());
    let a = ChatSession::open(backend.clone(), cursors.clone(), RoomId::new("room-a"), &config());
    let b = ChatSession::open(backend.clone(), cursors.clone(), RoomId::new("room-b"), &config());

    tokio::time::sleep(Duration::from_millis(50)).await;
    assert_eq!(a.len(), 1);
    assert_eq!(b.len(), 2);
    assert_eq!(cursors.len(), 2);

    // Closing one panel leaves the other polling
    a.close();
    backend.push(message_at("room-b", 30, "b3"));
    tokio::time::sleep(Duration::from_secs(3)).await;

    assert_eq!(a.len(), 1);
    assert_eq!(b.len(), 3);
    assert_eq!(cursors.len(), 1);

    b.close();
}

// ============================================================================
// Payment scenarios
// ============================================================================

#[tokio::test(start_paused = true)]
async fn test_payment_confirms_after_pending_attempts() -> anyhow::Result<()> {
    // Attempts 1-3 pending, attempt 4 completed: exactly 4 fetches, never a 5th
    let provider = FakePaymentProvider::completing_after(3, "abc");
    let sink = MemoryOrderSink::new();
    let flow = PaymentFlow::new(provider.clone(), sink.clone(), config());

    let receipt = flow.execute(payment_request()).await?;

    assert_eq!(receipt.tx_id, "abc");
    assert!(receipt.order_recorded);
    assert_eq!(provider.status_calls(), 4);

    tokio::time::sleep(Duration::from_secs(20)).await;
    assert_eq!(provider.status_calls(), 4);

    let orders = sink.orders();
    assert_eq!(orders.len(), 1);
    assert_eq!(orders[0].tx_id, "abc");
    assert_eq!(orders[0].amount_cents, 4900);
    Ok(())
}

#[tokio::test(start_paused = true)]
async fn test_payment_timeout_at_attempt_ceiling() {
    let provider = FakePaymentProvider::pending_forever();
    let sink = MemoryOrderSink::new();
    let flow = PaymentFlow::new(provider.clone(), sink.clone(), config());

    let started = tokio::time::Instant::now();
    let err = flow.execute(payment_request()).await.unwrap_err();

    assert_eq!(err, SyncError::VerificationTimedOut { attempts: 60 });
    // 60 attempts at 2s cadence trip the ceiling at the ~120s mark
    assert_eq!(started.elapsed(), Duration::from_secs(120));
    // The 61st fetch never fires
    assert_eq!(provider.status_calls(), 60);
    assert!(sink.orders().is_empty());
}

#[tokio::test(start_paused = true)]
async fn test_payment_declined_by_provider() {
    let provider = FakePaymentProvider::new(vec![
        Ok(PaymentStatus::Pending),
        Ok(PaymentStatus::Failed { reason: "insufficient funds".to_string() }),
    ]);
    let sink = MemoryOrderSink::new();
    let flow = PaymentFlow::new(provider.clone(), sink.clone(), config());

    let err = flow.execute(payment_request()).await.unwrap_err();
    assert_eq!(err, SyncError::Declined { reason: "insufficient funds".to_string() });
    assert_eq!(provider.status_calls(), 2);
    assert!(sink.orders().is_empty());
}

#[tokio::test(start_paused = true)]
async fn test_initiation_failure_never_polls() {
    let provider = FakePaymentProvider::pending_forever();
    provider.reject_initiation("wallet rejected the transaction");
    let sink = MemoryOrderSink::new();
    let flow = PaymentFlow::new(provider.clone(), sink.clone(), config());

    let err = flow.execute(payment_request()).await.unwrap_err();
    assert!(matches!(err, SyncError::InitiationFailed(_)));
    assert_eq!(provider.status_calls(), 0);
}

#[tokio::test(start_paused = true)]
async fn test_abandoned_checkout_stops_polling() {
    let provider = FakePaymentProvider::pending_forever();
    let sink = MemoryOrderSink::new();
    let flow = PaymentFlow::new(provider.clone(), sink.clone(), config());

    let pending = flow.begin(payment_request()).await.unwrap();
    tokio::time::sleep(Duration::from_secs(5)).await;
    pending.cancel();
    let polled = provider.status_calls();

    let err = pending.outcome().await.unwrap_err();
    assert_eq!(err, SyncError::Detached);

    tokio::time::sleep(Duration::from_secs(30)).await;
    assert_eq!(provider.status_calls(), polled);
}

#[tokio::test(start_paused = true)]
async fn test_completed_payment_survives_order_sink_outage() {
    let provider = FakePaymentProvider::completing_after(1, "tx_final");
    let sink = MemoryOrderSink::new();
    sink.set_fail(true);
    let flow = PaymentFlow::new(provider.clone(), sink.clone(), config());

    let receipt = flow.execute(payment_request()).await.unwrap();
    assert_eq!(receipt.tx_id, "tx_final");
    assert!(!receipt.order_recorded);
    assert!(sink.orders().is_empty());
}
