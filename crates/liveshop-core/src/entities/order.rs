//! Order and payment entities

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::value_objects::PaymentId;

/// What the buyer asks the payment provider to do.
///
/// Initiation is one-shot: a failed initiate terminates the checkout flow
/// immediately and no status polling ever starts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentRequest {
    /// Amount in the smallest currency unit
    pub amount_cents: i64,
    /// Seller wallet address or account
    pub recipient: String,
    /// Product being purchased
    pub product_id: String,
    /// Buyer identity for the order record
    pub buyer: String,
}

/// Purchase record handed to the order persistence collaborator after a
/// payment reaches `completed`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderRecord {
    pub payment_id: PaymentId,
    /// Transaction identifier reported by the provider
    pub tx_id: String,
    pub amount_cents: i64,
    pub product_id: String,
    pub buyer: String,
    pub recorded_at: DateTime<Utc>,
}

impl OrderRecord {
    /// Build the record for a completed payment
    pub fn completed(request: &PaymentRequest, payment_id: PaymentId, tx_id: impl Into<String>) -> Self {
        Self {
            payment_id,
            tx_id: tx_id.into(),
            amount_cents: request.amount_cents,
            product_id: request.product_id.clone(),
            buyer: request.buyer.clone(),
            recorded_at: Utc::now(),
        }
    }
}
