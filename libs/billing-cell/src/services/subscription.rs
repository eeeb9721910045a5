use std::sync::Arc;

use serde_json::json;
use tracing::{debug, info};

use shared_config::AppConfig;
use shared_database::SupabaseClient;

use crate::models::{BillingError, Subscription, TokenConsumption};

pub const DEFAULT_FREE_TOKENS: i64 = 10_000;

/// Token estimate per character of assistant input.
const TOKENS_PER_CHAR: f64 = 1.2;

/// Subscription state and token accounting against Supabase.
pub struct SubscriptionService {
    supabase: Arc<SupabaseClient>,
}

impl SubscriptionService {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            supabase: Arc::new(SupabaseClient::new(config)),
        }
    }

    pub fn with_client(supabase: Arc<SupabaseClient>) -> Self {
        Self { supabase }
    }

    /// The client's subscription row. A client with no row yet gets the
    /// default free subscription created and returned.
    pub async fn current(
        &self,
        client_id: &str,
        auth_token: Option<&str>,
    ) -> Result<Subscription, BillingError> {
        let path = format!("/rest/v1/subscriptions?client_id=eq.{}", client_id);

        let existing: Option<Subscription> = self
            .supabase
            .select_single(&path, auth_token)
            .await
            .map_err(|e| BillingError::DatabaseError(e.to_string()))?;

        if let Some(subscription) = existing {
            return Ok(subscription);
        }

        info!("No subscription for client {}, creating free plan", client_id);

        let subscription = self
            .supabase
            .insert_returning(
                "/rest/v1/subscriptions",
                auth_token,
                json!({
                    "client_id": client_id,
                    "plan": "Free",
                    "status": "active",
                    "tokens_remaining": DEFAULT_FREE_TOKENS,
                }),
            )
            .await
            .map_err(|e| BillingError::DatabaseError(e.to_string()))?;

        Ok(subscription)
    }

    /// Debit the estimated token cost of a message. Fails without
    /// touching the balance when it would go negative.
    pub async fn consume_tokens(
        &self,
        client_id: &str,
        message_length: usize,
        auth_token: Option<&str>,
    ) -> Result<TokenConsumption, BillingError> {
        let estimated = (message_length as f64 * TOKENS_PER_CHAR).ceil() as i64;
        debug!(
            "Consuming ~{} tokens for client {} (message length {})",
            estimated, client_id, message_length
        );

        let path = format!("/rest/v1/subscriptions?client_id=eq.{}", client_id);

        let subscription: Subscription = self
            .supabase
            .select_single(&path, auth_token)
            .await
            .map_err(|e| BillingError::DatabaseError(e.to_string()))?
            .ok_or(BillingError::SubscriptionNotFound)?;

        if subscription.tokens_remaining < estimated {
            return Err(BillingError::InsufficientTokens);
        }

        let tokens_remaining = subscription.tokens_remaining - estimated;

        self.supabase
            .update(
                &path,
                auth_token,
                json!({ "tokens_remaining": tokens_remaining }),
            )
            .await
            .map_err(|e| BillingError::DatabaseError(e.to_string()))?;

        Ok(TokenConsumption {
            tokens_used: estimated,
            tokens_remaining,
        })
    }
}
