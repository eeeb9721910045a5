use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::Deserialize;
use serde_json::{json, Value};
use uuid::Uuid;

use shared_models::error::AppError;

use crate::models::{NewNotification, NotificationError, NotificationsSnapshot};
use crate::services::client::NniaNotificationsClient;

#[derive(Clone)]
pub struct NotificationState {
    pub client: Arc<NniaNotificationsClient>,
}

#[derive(Debug, Deserialize)]
pub struct ClientQuery {
    #[serde(rename = "clientId")]
    pub client_id: String,
}

fn map_error(e: NotificationError) -> AppError {
    match e {
        NotificationError::NotFound => AppError::NotFound("Notification not found".to_string()),
        NotificationError::ApiError(msg) => AppError::ExternalService(msg),
    }
}

/// Notification list plus the unread count the dashboard badge shows.
#[axum::debug_handler]
pub async fn list_notifications(
    State(state): State<NotificationState>,
    Query(query): Query<ClientQuery>,
) -> Result<Json<Value>, AppError> {
    let notifications = state
        .client
        .fetch_notifications(&query.client_id)
        .await
        .map_err(map_error)?;

    let snapshot = NotificationsSnapshot::from_list(notifications);

    Ok(Json(json!({
        "notifications": snapshot.notifications,
        "unread_count": snapshot.unread_count,
    })))
}

#[axum::debug_handler]
pub async fn create_notification(
    State(state): State<NotificationState>,
    Json(request): Json<NewNotification>,
) -> Result<Json<Value>, AppError> {
    let notification = state
        .client
        .create_notification(&request)
        .await
        .map_err(map_error)?;

    Ok(Json(json!({ "notification": notification })))
}

#[axum::debug_handler]
pub async fn mark_notification_read(
    State(state): State<NotificationState>,
    Path(notification_id): Path<Uuid>,
) -> Result<Json<Value>, AppError> {
    let notification = state
        .client
        .mark_read(notification_id)
        .await
        .map_err(map_error)?;

    Ok(Json(json!({ "notification": notification })))
}
