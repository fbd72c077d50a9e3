//! Sync error taxonomy
//!
//! All collaborator errors are converted into one of these categories at the
//! boundary of the polling engine. Raw transport errors never propagate to
//! the caller directly.

use thiserror::Error;

/// Result type for engine and collaborator operations
pub type SyncResult<T> = Result<T, SyncError>;

/// Errors produced by the polling engine and its collaborators
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SyncError {
    // =========================================================================
    // Transient (recovered locally, retried on the next tick)
    // =========================================================================
    #[error("Transient fetch error: {0}")]
    TransientFetch(String),

    // =========================================================================
    // Chat send (optimistic append rolled back, no automatic retry)
    // =========================================================================
    #[error("Failed to send message: {0}")]
    SendFailed(String),

    // =========================================================================
    // Payment terminal outcomes
    // =========================================================================
    #[error("Payment initiation failed: {0}")]
    InitiationFailed(String),

    #[error("Payment declined: {reason}")]
    Declined { reason: String },

    #[error("verification timed out after {attempts} attempts")]
    VerificationTimedOut { attempts: u32 },

    // =========================================================================
    // Lifecycle
    // =========================================================================
    #[error("Subscription detached before completion")]
    Detached,

    #[error("Internal error: {0}")]
    Internal(String),
}

impl SyncError {
    /// Transient fetch error from any message-producing source
    pub fn transient(msg: impl Into<String>) -> Self {
        Self::TransientFetch(msg.into())
    }

    /// Get an error code string for UI surfaces
    pub fn code(&self) -> &'static str {
        match self {
            Self::TransientFetch(_) => "TRANSIENT_FETCH",
            Self::SendFailed(_) => "SEND_FAILED",
            Self::InitiationFailed(_) => "INITIATION_FAILED",
            Self::Declined { .. } => "PAYMENT_DECLINED",
            Self::VerificationTimedOut { .. } => "VERIFICATION_TIMEOUT",
            Self::Detached => "DETACHED",
            Self::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// Check if this error is recovered locally by the next poll tick
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::TransientFetch(_))
    }

    /// Check if this error permanently ends a payment flow
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            Self::InitiationFailed(_)
                | Self::Declined { .. }
                | Self::VerificationTimedOut { .. }
                | Self::Detached
        )
    }
}
