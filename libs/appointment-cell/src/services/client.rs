use serde_json::json;
use tracing::debug;
use uuid::Uuid;

use shared_config::AppConfig;
use shared_database::BackendClient;

use crate::models::{
    Appointment, AppointmentEnvelope, AppointmentError, AppointmentsEnvelope,
    AvailabilityEnvelope, DeleteEnvelope, NewAppointment, SaveAvailabilityRequest,
    UpdateAppointmentRequest,
};

/// Client for the NNIA appointments and availability endpoints.
pub struct NniaAppointmentsClient {
    backend: BackendClient,
}

impl NniaAppointmentsClient {
    pub fn new(config: &AppConfig) -> Self {
        Self::with_base_url(&config.nnia_api_url)
    }

    pub fn with_base_url(base_url: &str) -> Self {
        Self {
            backend: BackendClient::new(base_url),
        }
    }

    pub async fn fetch_appointments(
        &self,
        client_id: &str,
    ) -> Result<Vec<Appointment>, AppointmentError> {
        debug!("Fetching appointments for client {}", client_id);

        let envelope: AppointmentsEnvelope = self
            .backend
            .get("/nnia/appointments", &[("clientId", client_id.to_string())])
            .await
            .map_err(|e| AppointmentError::ApiError(e.to_string()))?;

        Ok(envelope.appointments)
    }

    pub async fn create_appointment(
        &self,
        request: &NewAppointment,
    ) -> Result<Appointment, AppointmentError> {
        let body = serde_json::to_value(request)
            .map_err(|e| AppointmentError::ValidationError(e.to_string()))?;

        let envelope: AppointmentEnvelope = self
            .backend
            .post("/nnia/appointments", body)
            .await
            .map_err(|e| AppointmentError::ApiError(e.to_string()))?;

        Ok(envelope.appointment)
    }

    pub async fn update_appointment(
        &self,
        appointment_id: Uuid,
        updates: &UpdateAppointmentRequest,
    ) -> Result<Appointment, AppointmentError> {
        let body = serde_json::to_value(updates)
            .map_err(|e| AppointmentError::ValidationError(e.to_string()))?;

        let envelope: AppointmentEnvelope = self
            .backend
            .put(&format!("/nnia/appointments/{}", appointment_id), body)
            .await
            .map_err(|e| AppointmentError::ApiError(e.to_string()))?;

        Ok(envelope.appointment)
    }

    pub async fn delete_appointment(
        &self,
        appointment_id: Uuid,
    ) -> Result<bool, AppointmentError> {
        let envelope: DeleteEnvelope = self
            .backend
            .delete(&format!("/nnia/appointments/{}", appointment_id))
            .await
            .map_err(|e| AppointmentError::ApiError(e.to_string()))?;

        Ok(envelope.success)
    }

    pub async fn fetch_availability(
        &self,
        client_id: &str,
    ) -> Result<serde_json::Value, AppointmentError> {
        let envelope: AvailabilityEnvelope = self
            .backend
            .get("/nnia/availability", &[("clientId", client_id.to_string())])
            .await
            .map_err(|e| AppointmentError::ApiError(e.to_string()))?;

        Ok(envelope.availability)
    }

    pub async fn save_availability(
        &self,
        request: &SaveAvailabilityRequest,
    ) -> Result<serde_json::Value, AppointmentError> {
        let body = json!({
            "clientId": request.client_id,
            "days": request.days,
            "hours": request.hours,
            "types": request.types,
        });

        let envelope: AvailabilityEnvelope = self
            .backend
            .post("/nnia/availability", body)
            .await
            .map_err(|e| AppointmentError::ApiError(e.to_string()))?;

        Ok(envelope.availability)
    }
}
