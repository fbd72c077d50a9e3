//! Chat session
//!
//! One live chat panel: a subscription that polls the chat collaborator at
//! a fixed interval, merges new items into an owned ordered log, and
//! supports optimistic sends. Transient fetch failures are silent; polling
//! never times out while the session is open.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::RwLock;
use tokio::sync::watch;
use tracing::{debug, info};

use liveshop_common::SyncConfig;
use liveshop_core::{ChatMessage, ChatStore, RoomId, SubscriptionId, SyncError, SyncResult};

use crate::cursor::CursorStore;
use crate::merge;
use crate::scheduler::{PollHandle, PollScheduler, PollState, PollTask, TickOutcome};

/// State shared between a session handle and its poll task
struct ChatShared {
    log: RwLock<Vec<ChatMessage>>,
    /// Flipped to false on close, before the scheduler is signalled.
    /// A fetch resolving after that point is discarded.
    active: AtomicBool,
    /// Bumped on every log change so UI layers can await updates
    revision: watch::Sender<u64>,
}

impl ChatShared {
    fn bump_revision(&self) {
        self.revision.send_modify(|r| *r += 1);
    }
}

/// A viewer's live interest in one chat room.
///
/// Owns its cursor and log exclusively; two sessions never share state, so
/// multiple open panels are safe by construction.
pub struct ChatSession {
    room: RoomId,
    subscription: SubscriptionId,
    shared: Arc<ChatShared>,
    cursors: Arc<CursorStore>,
    store: Arc<dyn ChatStore>,
    handle: PollHandle,
}

impl ChatSession {
    /// Open a session and start polling. The first fetch (no cursor) loads
    /// the most recent page immediately.
    pub fn open(
        store: Arc<dyn ChatStore>,
        cursors: Arc<CursorStore>,
        room: RoomId,
        config: &SyncConfig,
    ) -> Self {
        let subscription = SubscriptionId::chat(&room);
        let (revision, _) = watch::channel(0);

        let shared = Arc::new(ChatShared {
            log: RwLock::new(Vec::new()),
            active: AtomicBool::new(true),
            revision,
        });

        let task = ChatPollTask {
            store: store.clone(),
            cursors: cursors.clone(),
            shared: shared.clone(),
            subscription: subscription.clone(),
            room: room.clone(),
            initial_page_size: config.initial_page_size,
            incremental_page_size: config.incremental_page_size,
        };

        let handle =
            PollScheduler::new(config.chat_interval()).spawn(subscription.clone(), task);

        info!(room = %room, "Chat session opened");

        Self {
            room,
            subscription,
            shared,
            cursors,
            store,
            handle,
        }
    }

    /// The room this session follows
    #[must_use]
    pub fn room(&self) -> &RoomId {
        &self.room
    }

    /// Snapshot of the current log, ascending by `created_at`
    pub fn messages(&self) -> Vec<ChatMessage> {
        self.shared.log.read().clone()
    }

    /// Number of items currently in the log
    pub fn len(&self) -> usize {
        self.shared.log.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.shared.log.read().is_empty()
    }

    /// Receiver that changes whenever the log does
    pub fn updates(&self) -> watch::Receiver<u64> {
        self.shared.revision.subscribe()
    }

    /// Whether the session still polls
    pub fn is_active(&self) -> bool {
        self.shared.active.load(Ordering::SeqCst)
    }

    /// Scheduler state, for diagnostics
    pub fn poll_state(&self) -> PollState {
        self.handle.state()
    }

    /// Send a message and append it optimistically.
    ///
    /// On failure nothing is appended and the error surfaces to the caller;
    /// there is no automatic retry. On success the cursor advances so the
    /// next poll does not re-request the item, and a poll that still returns
    /// it is reconciled by id.
    pub async fn send(&self, author: &str, body: &str) -> SyncResult<ChatMessage> {
        if !self.is_active() {
            return Err(SyncError::Detached);
        }

        let sent = self.store.send(&self.room, author, body).await?;

        if !self.is_active() {
            // Closed while the send was in flight; the server kept the
            // message but this panel is gone.
            return Ok(sent);
        }

        {
            let mut log = self.shared.log.write();
            if !log.iter().any(|m| m.id == sent.id) {
                log.push(sent.clone());
            }
        }

        // Only advance an existing cursor: before the first poll completes
        // the initial full fetch must still happen, and it will reconcile
        // this item by id.
        if let Some(cursor) = self.cursors.get(&self.subscription) {
            self.cursors
                .set(self.subscription.clone(), cursor.advance_to(sent.created_at));
        }

        self.shared.bump_revision();
        debug!(room = %self.room, message_id = %sent.id, "Message sent and appended");

        Ok(sent)
    }

    /// Close the session. Synchronous: no further fetch will be scheduled
    /// and an in-flight fetch's result is discarded. The cursor entry is
    /// dropped with the subscription.
    pub fn close(&self) {
        self.shared.active.store(false, Ordering::SeqCst);
        self.handle.stop();
        self.cursors.remove(&self.subscription);
        info!(room = %self.room, "Chat session closed");
    }
}

impl Drop for ChatSession {
    fn drop(&mut self) {
        if self.is_active() {
            self.close();
        }
    }
}

/// Poll task: fetch since the cursor, merge, advance
struct ChatPollTask {
    store: Arc<dyn ChatStore>,
    cursors: Arc<CursorStore>,
    shared: Arc<ChatShared>,
    subscription: SubscriptionId,
    room: RoomId,
    initial_page_size: usize,
    incremental_page_size: usize,
}

#[async_trait]
impl PollTask for ChatPollTask {
    async fn tick(&mut self, _attempt: u32) -> TickOutcome {
        let since = self.cursors.get(&self.subscription);
        let limit = if since.is_none() {
            self.initial_page_size
        } else {
            self.incremental_page_size
        };

        let page = match self.store.fetch(&self.room, since, limit).await {
            Ok(page) => page,
            Err(e) => {
                // Transient: logged, ignored, retried on the next tick
                debug!(room = %self.room, error = %e, "Chat fetch failed, retrying next tick");
                return TickOutcome::Continue;
            }
        };

        // The session may have closed while the fetch was in flight
        if !self.shared.active.load(Ordering::SeqCst) {
            return TickOutcome::Stop;
        }

        // An empty fetch never changes the cursor, even when the server
        // reports one: trusting a too-far-ahead cursor would skip messages
        if page.is_empty() {
            return TickOutcome::Continue;
        }

        let merged = {
            let mut log = self.shared.log.write();
            if since.is_none() {
                merge::merge_initial(&mut log, page.items)
            } else {
                merge::merge_incremental(&mut log, page.items, since)
            }
        };

        if let Some(cursor) = merge::max_cursor(merged, page.last_cursor) {
            self.cursors.set(self.subscription.clone(), cursor);
        }

        self.shared.bump_revision();
        TickOutcome::Continue
    }
}
