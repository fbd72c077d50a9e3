//! HTTP implementation of the order persistence collaborator

use async_trait::async_trait;
use reqwest::Client;
use tracing::instrument;

use liveshop_core::{OrderRecord, OrderSink, SyncError, SyncResult};

/// Order persistence over `POST /orders`.
///
/// Invoked once per completed payment; a failure here is reported by the
/// caller but never retried or rolled back.
#[derive(Debug, Clone)]
pub struct HttpOrderSink {
    base_url: String,
    client: Client,
}

impl HttpOrderSink {
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            client: Client::new(),
        }
    }

    #[must_use]
    pub fn with_client(base_url: impl Into<String>, client: Client) -> Self {
        Self {
            base_url: base_url.into(),
            client,
        }
    }
}

#[async_trait]
impl OrderSink for HttpOrderSink {
    #[instrument(skip(self, order), fields(payment_id = %order.payment_id))]
    async fn record(&self, order: OrderRecord) -> SyncResult<()> {
        let response = self
            .client
            .post(format!("{}/orders", self.base_url))
            .json(&order)
            .send()
            .await
            .map_err(|e| SyncError::transient(e.to_string()))?;

        if !response.status().is_success() {
            return Err(SyncError::transient(format!(
                "unexpected status {}",
                response.status()
            )));
        }

        Ok(())
    }
}
