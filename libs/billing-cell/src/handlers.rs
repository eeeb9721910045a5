use std::sync::Arc;

use axum::{
    extract::{Query, State},
    Json,
};
use axum_extra::TypedHeader;
use headers::{authorization::Bearer, Authorization};
use serde::Deserialize;
use serde_json::{json, Value};

use shared_models::error::AppError;

use crate::catalog::{token_usage_percentage, PLANS, TOKEN_PACKS};
use crate::models::BillingError;
use crate::services::checkout::CheckoutService;
use crate::services::subscription::SubscriptionService;

#[derive(Clone)]
pub struct BillingState {
    pub subscriptions: Arc<SubscriptionService>,
    pub checkout: Arc<CheckoutService>,
}

#[derive(Debug, Deserialize)]
pub struct ClientQuery {
    #[serde(rename = "clientId")]
    pub client_id: String,
}

#[derive(Debug, Deserialize)]
pub struct ConsumeTokensRequest {
    #[serde(rename = "clientId")]
    pub client_id: String,
    #[serde(rename = "messageLength")]
    pub message_length: usize,
}

#[derive(Debug, Deserialize)]
pub struct PlanCheckoutRequest {
    #[serde(rename = "clientId")]
    pub client_id: String,
    pub plan: String,
}

#[derive(Debug, Deserialize)]
pub struct TokenCheckoutRequest {
    #[serde(rename = "clientId")]
    pub client_id: String,
    pub pack: String,
}

#[derive(Debug, Deserialize)]
pub struct CancelSubscriptionRequest {
    #[serde(rename = "subscriptionId")]
    pub subscription_id: String,
}

#[derive(Debug, Deserialize)]
pub struct UpdateSubscriptionRequest {
    #[serde(rename = "subscriptionId")]
    pub subscription_id: String,
    pub plan: String,
}

fn map_error(e: BillingError) -> AppError {
    match e {
        BillingError::InsufficientTokens => AppError::BadRequest("Insufficient tokens".to_string()),
        BillingError::SubscriptionNotFound => {
            AppError::NotFound("Subscription not found".to_string())
        }
        BillingError::ValidationError(msg) => AppError::BadRequest(msg),
        BillingError::DatabaseError(msg) => AppError::Database(msg),
        BillingError::PaymentBackendError(msg) => AppError::ExternalService(msg),
    }
}

#[axum::debug_handler]
pub async fn get_plans() -> Json<Value> {
    Json(json!({ "plans": PLANS }))
}

#[axum::debug_handler]
pub async fn get_token_packs() -> Json<Value> {
    Json(json!({ "token_packs": TOKEN_PACKS }))
}

/// Current subscription plus derived token usage. Creates the default
/// free subscription on first sight of a client.
#[axum::debug_handler]
pub async fn get_subscription(
    State(state): State<BillingState>,
    auth: Option<TypedHeader<Authorization<Bearer>>>,
    Query(query): Query<ClientQuery>,
) -> Result<Json<Value>, AppError> {
    let token = auth.as_ref().map(|TypedHeader(a)| a.token());

    let subscription = state
        .subscriptions
        .current(&query.client_id, token)
        .await
        .map_err(map_error)?;

    let usage = token_usage_percentage(&subscription.plan, subscription.tokens_remaining);

    Ok(Json(json!({
        "subscription": subscription,
        "token_usage_percentage": usage,
    })))
}

#[axum::debug_handler]
pub async fn consume_tokens(
    State(state): State<BillingState>,
    auth: Option<TypedHeader<Authorization<Bearer>>>,
    Json(request): Json<ConsumeTokensRequest>,
) -> Result<Json<Value>, AppError> {
    let token = auth.as_ref().map(|TypedHeader(a)| a.token());

    let consumption = state
        .subscriptions
        .consume_tokens(&request.client_id, request.message_length, token)
        .await
        .map_err(map_error)?;

    Ok(Json(json!({
        "tokens_used": consumption.tokens_used,
        "tokens_remaining": consumption.tokens_remaining,
    })))
}

#[axum::debug_handler]
pub async fn checkout_subscription(
    State(state): State<BillingState>,
    Json(request): Json<PlanCheckoutRequest>,
) -> Result<Json<Value>, AppError> {
    let session = state
        .checkout
        .subscription_checkout(&request.plan, &request.client_id)
        .await
        .map_err(map_error)?;

    Ok(Json(json!({ "sessionId": session.session_id })))
}

#[axum::debug_handler]
pub async fn checkout_tokens(
    State(state): State<BillingState>,
    Json(request): Json<TokenCheckoutRequest>,
) -> Result<Json<Value>, AppError> {
    let session = state
        .checkout
        .token_checkout(&request.pack, &request.client_id)
        .await
        .map_err(map_error)?;

    Ok(Json(json!({ "sessionId": session.session_id })))
}

#[axum::debug_handler]
pub async fn cancel_subscription(
    State(state): State<BillingState>,
    Json(request): Json<CancelSubscriptionRequest>,
) -> Result<Json<Value>, AppError> {
    let result = state
        .checkout
        .cancel_subscription(&request.subscription_id)
        .await
        .map_err(map_error)?;

    Ok(Json(result))
}

/// Move an active subscription to another paid plan.
#[axum::debug_handler]
pub async fn update_subscription(
    State(state): State<BillingState>,
    Json(request): Json<UpdateSubscriptionRequest>,
) -> Result<Json<Value>, AppError> {
    let plan = crate::catalog::plan_by_key(&request.plan)
        .ok_or_else(|| AppError::BadRequest(format!("Unknown plan: {}", request.plan)))?;

    let price_id = plan
        .price_id
        .ok_or_else(|| AppError::BadRequest("Cannot update to the free plan".to_string()))?;

    let result = state
        .checkout
        .update_subscription(&request.subscription_id, price_id)
        .await
        .map_err(map_error)?;

    Ok(Json(result))
}

#[axum::debug_handler]
pub async fn get_payment_history(
    State(state): State<BillingState>,
    Query(query): Query<ClientQuery>,
) -> Result<Json<Value>, AppError> {
    let payments = state
        .checkout
        .payment_history(&query.client_id)
        .await
        .map_err(map_error)?;

    Ok(Json(json!({ "payments": payments })))
}
