//! Terminal-state detector
//!
//! Classifies a fetched payment status into continue/stop. Timeout is not
//! decided here: the scheduler's attempt ceiling handles it, and the flow
//! reports it as a distinct failure kind.

use liveshop_core::PaymentStatus;

/// What to do after observing a payment status
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verdict {
    /// Still pending (or unrecognized vocabulary): schedule the next poll
    Continue,
    /// Terminal success: stop polling, carry the transaction id
    Success { tx_id: String },
    /// Terminal failure reported by the provider: stop polling
    Failure { reason: String },
}

impl Verdict {
    /// Check if polling should stop
    pub fn is_terminal(&self) -> bool {
        !matches!(self, Self::Continue)
    }
}

/// Classify a provider status
pub fn classify(status: &PaymentStatus) -> Verdict {
    match status {
        PaymentStatus::Completed { tx_id } => Verdict::Success { tx_id: tx_id.clone() },
        PaymentStatus::Failed { reason } => Verdict::Failure { reason: reason.clone() },
        // Unrecognized values are treated like pending, not like failure
        PaymentStatus::Pending | PaymentStatus::Other(_) => Verdict::Continue,
    }
}
