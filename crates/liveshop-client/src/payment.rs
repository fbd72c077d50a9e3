//! HTTP implementation of the payment provider collaborator

use async_trait::async_trait;
use reqwest::Client;
use tracing::instrument;

use liveshop_core::{
    PaymentGateway, PaymentId, PaymentRequest, PaymentStatus, SyncError, SyncResult,
};

use crate::dto::{
    PaymentInitiateRequest, PaymentInitiateResponse, PaymentMetadata, PaymentStatusResponse,
};
use crate::error::{map_fetch_error, map_fetch_status, map_initiate_error};

/// Payment provider over `POST /payments` and `GET /payments/status`
#[derive(Debug, Clone)]
pub struct HttpPaymentGateway {
    base_url: String,
    client: Client,
}

impl HttpPaymentGateway {
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
impl PaymentGateway for HttpPaymentGateway {
    #[instrument(skip(self, request), fields(product = %request.product_id))]
    async fn initiate(&self, request: &PaymentRequest) -> SyncResult<PaymentId> {
        let body = PaymentInitiateRequest {
            amount: request.amount_cents,
            recipient: request.recipient.clone(),
            metadata: PaymentMetadata {
                product_id: request.product_id.clone(),
                buyer: request.buyer.clone(),
            },
        };

        let response = self
            .client
            .post(format!("{}/payments", self.base_url))
            .json(&body)
            .send()
            .await
            .map_err(|e| map_initiate_error(&e))?;

        if !response.status().is_success() {
            return Err(SyncError::InitiationFailed(format!(
                "unexpected status {}",
                response.status()
            )));
        }

        let body: PaymentInitiateResponse =
            response.json().await.map_err(|e| map_initiate_error(&e))?;

        Ok(PaymentId::new(body.payment_id))
    }

    #[instrument(skip(self), fields(payment_id = %id))]
    async fn status(&self, id: &PaymentId) -> SyncResult<PaymentStatus> {
        let response = self
            .client
            .get(format!("{}/payments/status", self.base_url))
            .query(&[("paymentId", id.as_str())])
            .send()
            .await
            .map_err(|e| map_fetch_error(&e))?;

        if !response.status().is_success() {
            return Err(map_fetch_status(response.status()));
        }

        let body: PaymentStatusResponse =
            response.json().await.map_err(|e| map_fetch_error(&e))?;

        Ok(PaymentStatus::from(body))
    }
}
