use axum::{
    routing::{get, post},
    Router,
};

use crate::handlers::{self, BillingState};

pub fn billing_routes(state: BillingState) -> Router {
    Router::new()
        .route("/plans", get(handlers::get_plans))
        .route("/token-packs", get(handlers::get_token_packs))
        .route("/subscription", get(handlers::get_subscription))
        .route("/subscription/consume", post(handlers::consume_tokens))
        .route("/subscription/cancel", post(handlers::cancel_subscription))
        .route("/subscription/update", post(handlers::update_subscription))
        .route("/checkout/subscription", post(handlers::checkout_subscription))
        .route("/checkout/tokens", post(handlers::checkout_tokens))
        .route("/payments", get(handlers::get_payment_history))
        .with_state(state)
}
