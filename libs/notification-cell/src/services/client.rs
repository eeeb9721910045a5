use serde_json::json;
use tracing::debug;
use uuid::Uuid;

use shared_config::AppConfig;
use shared_database::BackendClient;

use crate::models::{
    NewNotification, Notification, NotificationEnvelope, NotificationError,
    NotificationsEnvelope,
};

/// Client for the NNIA notifications endpoints.
pub struct NniaNotificationsClient {
    backend: BackendClient,
}

impl NniaNotificationsClient {
    pub fn new(config: &AppConfig) -> Self {
        Self::with_base_url(&config.nnia_api_url)
    }

    pub fn with_base_url(base_url: &str) -> Self {
        Self {
            backend: BackendClient::new(base_url),
        }
    }

    pub async fn fetch_notifications(
        &self,
        client_id: &str,
    ) -> Result<Vec<Notification>, NotificationError> {
        debug!("Fetching notifications for client {}", client_id);

        let envelope: NotificationsEnvelope = self
            .backend
            .get("/nnia/notifications", &[("clientId", client_id.to_string())])
            .await
            .map_err(|e| NotificationError::ApiError(e.to_string()))?;

        Ok(envelope.notifications)
    }

    pub async fn create_notification(
        &self,
        request: &NewNotification,
    ) -> Result<Notification, NotificationError> {
        let body = json!({
            "client_id": request.client_id,
            "type": request.notification_type,
            "title": request.title,
            "message": request.message,
        });

        let envelope: NotificationEnvelope = self
            .backend
            .post("/nnia/notifications", body)
            .await
            .map_err(|e| NotificationError::ApiError(e.to_string()))?;

        Ok(envelope.notification)
    }

    pub async fn mark_read(&self, notification_id: Uuid) -> Result<Notification, NotificationError> {
        let envelope: NotificationEnvelope = self
            .backend
            .post(
                &format!("/nnia/notifications/{}/read", notification_id),
                json!({}),
            )
            .await
            .map_err(|e| NotificationError::ApiError(e.to_string()))?;

        Ok(envelope.notification)
    }
}
