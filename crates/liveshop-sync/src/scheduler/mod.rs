//! Poll scheduler
//!
//! Drives periodic fetches for one subscription and enforces the
//! non-overlap invariant structurally: each subscription gets exactly one
//! tokio task, ticks run to completion before the next one is considered,
//! and a tick that outlasts the interval skips the missed slots instead of
//! bursting. States: idle -> polling -> stopped, with stopped terminal.

use std::sync::atomic::{AtomicBool, AtomicU8, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::{self, MissedTickBehavior};
use tracing::{debug, trace};

use liveshop_core::SubscriptionId;

/// What a tick tells the scheduler to do next
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// Schedule the next tick
    Continue,
    /// Terminal outcome observed; stop polling permanently
    Stop,
}

/// Why a poll loop stopped
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    /// The subscriber detached (explicit unsubscribe or dropped handle)
    Detached,
    /// A tick reported a terminal outcome
    Completed,
    /// The attempt ceiling was reached before any terminal outcome
    Exhausted,
}

/// Lifecycle state of a poll loop
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollState {
    Idle,
    Polling,
    Stopped,
}

const STATE_IDLE: u8 = 0;
const STATE_POLLING: u8 = 1;
const STATE_STOPPED: u8 = 2;

/// One fetch-and-apply cycle for a subscription.
///
/// `attempt` starts at 1 and increments once per issued tick. A tick that
/// hits a transient error should log it and return `Continue`; the
/// scheduler never inspects errors itself.
#[async_trait]
pub trait PollTask: Send + 'static {
    async fn tick(&mut self, attempt: u32) -> TickOutcome;
}

/// Fixed-interval poll scheduler for a single subscription
#[derive(Debug, Clone)]
pub struct PollScheduler {
    interval: Duration,
    max_attempts: Option<u32>,
}

impl PollScheduler {
    /// Scheduler with no attempt ceiling (chat: polls while subscribed)
    #[must_use]
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            max_attempts: None,
        }
    }

    /// Enforce a hard ceiling on issued ticks (payment: 60 attempts).
    /// The tick after the ceiling never fires a fetch; the loop stops with
    /// `StopReason::Exhausted` instead.
    #[must_use]
    pub fn with_attempt_ceiling(mut self, max_attempts: u32) -> Self {
        self.max_attempts = Some(max_attempts);
        self
    }

    /// Spawn the poll loop. The first tick fires immediately (initial
    /// fetch), subsequent ticks at the fixed interval.
    pub fn spawn<T: PollTask>(self, subscription: SubscriptionId, task: T) -> PollHandle {
        let active = Arc::new(AtomicBool::new(true));
        let state = Arc::new(AtomicU8::new(STATE_IDLE));
        let (shutdown_tx, shutdown_rx) = mpsc::channel(1);

        let join = tokio::spawn(run_loop(
            task,
            self.interval,
            self.max_attempts,
            subscription.clone(),
            active.clone(),
            state.clone(),
            shutdown_rx,
        ));

        PollHandle {
            subscription,
            active,
            state,
            shutdown_tx,
            join,
        }
    }
}

async fn run_loop<T: PollTask>(
    mut task: T,
    interval: Duration,
    max_attempts: Option<u32>,
    subscription: SubscriptionId,
    active: Arc<AtomicBool>,
    state: Arc<AtomicU8>,
    mut shutdown_rx: mpsc::Receiver<()>,
) -> StopReason {
    let mut ticker = time::interval(interval);
    // A tick still in flight at the next scheduled instant skips that slot
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

    let mut attempt: u32 = 0;
    state.store(STATE_POLLING, Ordering::SeqCst);

    let reason = loop {
        tokio::select! {
            biased;

            _ = shutdown_rx.recv() => {
                debug!(subscription = %subscription, "Poll loop detached");
                break StopReason::Detached;
            }

            _ = ticker.tick() => {
                // Stop may have been requested while the previous tick ran
                if !active.load(Ordering::SeqCst) {
                    debug!(subscription = %subscription, "Poll loop detached");
                    break StopReason::Detached;
                }

                if let Some(max) = max_attempts {
                    if attempt >= max {
                        debug!(
                            subscription = %subscription,
                            attempts = attempt,
                            "Attempt ceiling reached, stopping without a fetch"
                        );
                        break StopReason::Exhausted;
                    }
                }

                attempt += 1;
                trace!(subscription = %subscription, attempt, "Poll tick");

                match task.tick(attempt).await {
                    TickOutcome::Continue => {}
                    TickOutcome::Stop => {
                        debug!(
                            subscription = %subscription,
                            attempts = attempt,
                            "Terminal outcome observed, polling halted"
                        );
                        break StopReason::Completed;
                    }
                }
            }
        }
    };

    active.store(false, Ordering::SeqCst);
    state.store(STATE_STOPPED, Ordering::SeqCst);
    reason
}

/// Handle to a running poll loop.
///
/// `stop` is synchronous: it flips the shared active flag before signalling
/// the loop, so an in-flight fetch is allowed to complete but its result is
/// discarded by whoever checks `is_active`. Dropping the handle also stops
/// the loop.
pub struct PollHandle {
    subscription: SubscriptionId,
    active: Arc<AtomicBool>,
    state: Arc<AtomicU8>,
    shutdown_tx: mpsc::Sender<()>,
    join: JoinHandle<StopReason>,
}

impl PollHandle {
    /// The subscription this loop polls
    #[must_use]
    pub fn subscription(&self) -> &SubscriptionId {
        &self.subscription
    }

    /// Request the loop to stop. Idempotent, never blocks.
    pub fn stop(&self) {
        self.active.store(false, Ordering::SeqCst);
        // Full channel means a shutdown is already queued
        let _ = self.shutdown_tx.try_send(());
    }

    /// Whether the loop is still issuing (or willing to issue) fetches
    pub fn is_active(&self) -> bool {
        self.active.load(Ordering::SeqCst)
    }

    /// Current lifecycle state
    pub fn state(&self) -> PollState {
        match self.state.load(Ordering::SeqCst) {
            STATE_POLLING => PollState::Polling,
            STATE_STOPPED => PollState::Stopped,
            _ => PollState::Idle,
        }
    }

    /// Wait for the loop to finish and learn why it stopped
    pub async fn stopped(mut self) -> StopReason {
        (&mut self.join).await.unwrap_or(StopReason::Detached)
    }
}

impl Drop for PollHandle {
    fn drop(&mut self) {
        self.active.store(false, Ordering::SeqCst);
        let _ = self.shutdown_tx.try_send(());
    }
}

impl std::fmt::Debug for PollHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PollHandle")
            .field("subscription", &self.subscription)
            .field("state", &self.state())
            .finish()
    }
}
