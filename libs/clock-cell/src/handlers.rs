use std::sync::Arc;

use axum::{extract::State, Json};
use serde_json::{json, Value};

use crate::services::resolver::ClockService;

/// Current resolved reference clock. Mirrors the NNIA real-time response
/// shape, extended with provenance for diagnostics.
#[axum::debug_handler]
pub async fn get_time(State(clock): State<Arc<ClockService>>) -> Json<Value> {
    let resolved = clock.resolve().await;

    Json(json!({
        "success": true,
        "date": resolved.instant.to_rfc3339(),
        "source": resolved.source.label(),
        "provider": resolved.source.provider(),
        "timezone": resolved.timezone,
    }))
}
