use serde::Deserialize;
use serde_json::{json, Value};
use tracing::info;

use shared_config::AppConfig;
use shared_database::BackendClient;

use crate::catalog::{plan_by_key, token_pack_by_key};
use crate::models::{BillingError, CheckoutMode, CheckoutSession};

#[derive(Debug, Deserialize)]
struct PaymentsEnvelope {
    payments: Vec<Value>,
}

/// Checkout and subscription mutations via the payments backend. The
/// hosted redirect itself is the caller's concern; this service only
/// produces session ids.
pub struct CheckoutService {
    backend: BackendClient,
}

impl CheckoutService {
    pub fn new(config: &AppConfig) -> Self {
        Self::with_base_url(&config.payments_backend_url)
    }

    pub fn with_base_url(base_url: &str) -> Self {
        Self {
            backend: BackendClient::new(base_url),
        }
    }

    pub async fn create_checkout_session(
        &self,
        price_id: &str,
        client_id: &str,
        mode: CheckoutMode,
    ) -> Result<CheckoutSession, BillingError> {
        info!(
            "Creating {} checkout session for client {}",
            mode, client_id
        );

        self.backend
            .post(
                "/api/create-checkout-session",
                json!({
                    "priceId": price_id,
                    "clientId": client_id,
                    "mode": mode.as_str(),
                }),
            )
            .await
            .map_err(|e| BillingError::PaymentBackendError(e.to_string()))
    }

    /// Checkout for a plan upgrade. The free plan has nothing to buy.
    pub async fn subscription_checkout(
        &self,
        plan_key: &str,
        client_id: &str,
    ) -> Result<CheckoutSession, BillingError> {
        let plan = plan_by_key(plan_key)
            .ok_or_else(|| BillingError::ValidationError(format!("Unknown plan: {}", plan_key)))?;

        let price_id = plan.price_id.ok_or_else(|| {
            BillingError::ValidationError("The free plan has no checkout".to_string())
        })?;

        self.create_checkout_session(price_id, client_id, CheckoutMode::Subscription)
            .await
    }

    pub async fn token_checkout(
        &self,
        pack_key: &str,
        client_id: &str,
    ) -> Result<CheckoutSession, BillingError> {
        let pack = token_pack_by_key(pack_key).ok_or_else(|| {
            BillingError::ValidationError(format!("Unknown token pack: {}", pack_key))
        })?;

        self.create_checkout_session(pack.price_id, client_id, CheckoutMode::Payment)
            .await
    }

    pub async fn cancel_subscription(&self, subscription_id: &str) -> Result<Value, BillingError> {
        self.backend
            .post(
                "/api/cancel-subscription",
                json!({ "subscriptionId": subscription_id }),
            )
            .await
            .map_err(|e| BillingError::PaymentBackendError(e.to_string()))
    }

    pub async fn update_subscription(
        &self,
        subscription_id: &str,
        new_price_id: &str,
    ) -> Result<Value, BillingError> {
        self.backend
            .post(
                "/api/update-subscription",
                json!({
                    "subscriptionId": subscription_id,
                    "newPriceId": new_price_id,
                }),
            )
            .await
            .map_err(|e| BillingError::PaymentBackendError(e.to_string()))
    }

    pub async fn payment_history(&self, client_id: &str) -> Result<Vec<Value>, BillingError> {
        let envelope: PaymentsEnvelope = self
            .backend
            .get("/api/payment-history", &[("clientId", client_id.to_string())])
            .await
            .map_err(|e| BillingError::PaymentBackendError(e.to_string()))?;

        Ok(envelope.payments)
    }
}
