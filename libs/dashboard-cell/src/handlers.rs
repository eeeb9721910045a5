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

use crate::models::DashboardError;
use crate::services::stats::StatsService;

#[derive(Clone)]
pub struct DashboardState {
    pub stats: Arc<StatsService>,
}

#[derive(Debug, Deserialize)]
pub struct ClientQuery {
    #[serde(rename = "clientId")]
    pub client_id: String,
}

/// Dashboard activity counters. A bearer token, when present, is
/// forwarded to Supabase unvalidated.
#[axum::debug_handler]
pub async fn get_stats(
    State(state): State<DashboardState>,
    auth: Option<TypedHeader<Authorization<Bearer>>>,
    Query(query): Query<ClientQuery>,
) -> Result<Json<Value>, AppError> {
    let token = auth.as_ref().map(|TypedHeader(a)| a.token());

    let stats = state
        .stats
        .dashboard_stats(&query.client_id, token)
        .await
        .map_err(|e| match e {
            DashboardError::DatabaseError(msg) => AppError::Database(msg),
        })?;

    Ok(Json(json!({ "stats": stats })))
}
