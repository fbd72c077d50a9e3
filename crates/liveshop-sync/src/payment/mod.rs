//! Payment confirmation flow
//!
//! Initiates a payment with the provider, then polls its status at a fixed
//! interval until a terminal outcome or the attempt ceiling. A completed
//! payment is recorded with the order persistence collaborator exactly once;
//! a sink failure is reported but never rolls back the payment.

pub mod detector;

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::oneshot;
use tracing::{debug, info, instrument, warn};

use liveshop_common::SyncConfig;
use liveshop_core::{
    OrderRecord, OrderSink, PaymentGateway, PaymentId, PaymentRequest, SubscriptionId, SyncError,
    SyncResult,
};

use crate::scheduler::{PollHandle, PollScheduler, PollTask, StopReason, TickOutcome};

use detector::Verdict;

/// Successful checkout result
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaymentReceipt {
    pub payment_id: PaymentId,
    /// Transaction identifier reported by the provider
    pub tx_id: String,
    /// Whether the order persistence collaborator accepted the record.
    /// `false` means the purchase is final but recording it failed.
    pub order_recorded: bool,
}

/// Runs checkout confirmations against a payment gateway and order sink
pub struct PaymentFlow {
    gateway: Arc<dyn PaymentGateway>,
    orders: Arc<dyn OrderSink>,
    config: SyncConfig,
}

impl PaymentFlow {
    pub fn new(
        gateway: Arc<dyn PaymentGateway>,
        orders: Arc<dyn OrderSink>,
        config: SyncConfig,
    ) -> Self {
        Self {
            gateway,
            orders,
            config,
        }
    }

    /// Initiate a payment and start status polling.
    ///
    /// Initiation is one-shot: a failure here surfaces immediately as
    /// `InitiationFailed` and no polling ever starts.
    #[instrument(skip(self, request), fields(product = %request.product_id))]
    pub async fn begin(&self, request: PaymentRequest) -> SyncResult<PendingPayment> {
        let payment_id = match self.gateway.initiate(&request).await {
            Ok(id) => id,
            Err(SyncError::InitiationFailed(msg)) => {
                return Err(SyncError::InitiationFailed(msg));
            }
            Err(other) => {
                return Err(SyncError::InitiationFailed(other.to_string()));
            }
        };

        info!(payment_id = %payment_id, "Payment initiated, polling for confirmation");

        let subscription = SubscriptionId::payment(&payment_id);
        let (verdict_tx, verdict_rx) = oneshot::channel();

        let task = PaymentPollTask {
            gateway: self.gateway.clone(),
            payment_id: payment_id.clone(),
            verdict_tx: Some(verdict_tx),
        };

        let handle = PollScheduler::new(self.config.payment_interval())
            .with_attempt_ceiling(self.config.max_payment_attempts)
            .spawn(subscription, task);

        Ok(PendingPayment {
            request,
            payment_id,
            handle,
            verdict_rx,
            orders: self.orders.clone(),
            max_attempts: self.config.max_payment_attempts,
        })
    }

    /// Initiate and wait for the terminal outcome in one call
    pub async fn execute(&self, request: PaymentRequest) -> SyncResult<PaymentReceipt> {
        self.begin(request).await?.outcome().await
    }
}

/// A payment whose confirmation is still being polled.
///
/// Owns the subscription's attempt state exclusively. Cancelling stops
/// polling; a status response already in flight is discarded.
pub struct PendingPayment {
    request: PaymentRequest,
    payment_id: PaymentId,
    handle: PollHandle,
    verdict_rx: oneshot::Receiver<Verdict>,
    orders: Arc<dyn OrderSink>,
    max_attempts: u32,
}

impl PendingPayment {
    #[must_use]
    pub fn payment_id(&self) -> &PaymentId {
        &self.payment_id
    }

    /// Abandon the checkout. No further status fetch will be issued.
    pub fn cancel(&self) {
        self.handle.stop();
    }

    /// Wait for the terminal outcome.
    ///
    /// - provider `completed` => `Ok(receipt)` after recording the order
    /// - provider `failed` => `Err(Declined)`, retried only by the user
    /// - attempt ceiling reached => `Err(VerificationTimedOut)`
    /// - cancelled => `Err(Detached)`
    pub async fn outcome(self) -> SyncResult<PaymentReceipt> {
        let reason = self.handle.stopped().await;

        match reason {
            StopReason::Detached => Err(SyncError::Detached),
            StopReason::Exhausted => Err(SyncError::VerificationTimedOut {
                attempts: self.max_attempts,
            }),
            StopReason::Completed => {
                let verdict = self
                    .verdict_rx
                    .await
                    .map_err(|_| SyncError::Internal("poll task dropped its verdict".to_string()))?;

                match verdict {
                    Verdict::Success { tx_id } => {
                        let order =
                            OrderRecord::completed(&self.request, self.payment_id.clone(), &tx_id);

                        // The payment is already final; a sink failure is
                        // reported, never rolled back or re-polled.
                        let order_recorded = match self.orders.record(order).await {
                            Ok(()) => true,
                            Err(e) => {
                                warn!(
                                    payment_id = %self.payment_id,
                                    error = %e,
                                    "Payment completed but order persistence failed"
                                );
                                false
                            }
                        };

                        info!(payment_id = %self.payment_id, tx_id = %tx_id, "Payment confirmed");

                        Ok(PaymentReceipt {
                            payment_id: self.payment_id,
                            tx_id,
                            order_recorded,
                        })
                    }
                    Verdict::Failure { reason } => Err(SyncError::Declined { reason }),
                    Verdict::Continue => {
                        Err(SyncError::Internal("non-terminal verdict after stop".to_string()))
                    }
                }
            }
        }
    }
}

/// Poll task: fetch status, classify, stop on terminal
struct PaymentPollTask {
    gateway: Arc<dyn PaymentGateway>,
    payment_id: PaymentId,
    verdict_tx: Option<oneshot::Sender<Verdict>>,
}

#[async_trait]
impl PollTask for PaymentPollTask {
    async fn tick(&mut self, attempt: u32) -> TickOutcome {
        let status = match self.gateway.status(&self.payment_id).await {
            Ok(status) => status,
            Err(e) => {
                // Transient: counts as an attempt, retried next tick up to
                // the ceiling
                debug!(
                    payment_id = %self.payment_id,
                    attempt,
                    error = %e,
                    "Status fetch failed, retrying next tick"
                );
                return TickOutcome::Continue;
            }
        };

        let verdict = detector::classify(&status);
        if verdict.is_terminal() {
            if let Some(tx) = self.verdict_tx.take() {
                let _ = tx.send(verdict);
            }
            TickOutcome::Stop
        } else {
            TickOutcome::Continue
        }
    }
}
