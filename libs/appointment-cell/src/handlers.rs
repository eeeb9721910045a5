// libs/appointment-cell/src/handlers.rs
use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::Deserialize;
use serde_json::{json, Value};
use tokio::sync::watch;
use uuid::Uuid;

use clock_cell::ClockService;
use shared_models::error::AppError;

use crate::models::{
    Appointment, AppointmentError, NewAppointment, SaveAvailabilityRequest,
    UpdateAppointmentRequest,
};
use crate::services::client::NniaAppointmentsClient;
use crate::services::filter::upcoming_appointments;
use crate::services::refresh::PREVIEW_LIMIT;

#[derive(Clone)]
pub struct AppointmentState {
    pub clock: Arc<ClockService>,
    pub client: Arc<NniaAppointmentsClient>,
    /// Latest value of the background preview feed, when one is running.
    pub live: Option<watch::Receiver<Vec<Appointment>>>,
}

#[derive(Debug, Deserialize)]
pub struct ClientQuery {
    #[serde(rename = "clientId")]
    pub client_id: String,
}

#[derive(Debug, Deserialize)]
pub struct UpcomingQuery {
    #[serde(rename = "clientId")]
    pub client_id: String,
    pub limit: Option<usize>,
}

fn map_error(e: AppointmentError) -> AppError {
    match e {
        AppointmentError::NotFound => AppError::NotFound("Appointment not found".to_string()),
        AppointmentError::ValidationError(msg) => AppError::BadRequest(msg),
        AppointmentError::ApiError(msg) => AppError::ExternalService(msg),
    }
}

/// Full appointment list for a client, as served by the NNIA backend.
#[axum::debug_handler]
pub async fn list_appointments(
    State(state): State<AppointmentState>,
    Query(query): Query<ClientQuery>,
) -> Result<Json<Value>, AppError> {
    let appointments = state
        .client
        .fetch_appointments(&query.client_id)
        .await
        .map_err(map_error)?;

    Ok(Json(json!({ "appointments": appointments })))
}

/// Fresh "next pending appointments" preview: resolve the reference clock
/// (cached), fetch the list, filter.
#[axum::debug_handler]
pub async fn get_upcoming(
    State(state): State<AppointmentState>,
    Query(query): Query<UpcomingQuery>,
) -> Result<Json<Value>, AppError> {
    let limit = query.limit.unwrap_or(PREVIEW_LIMIT);
    if limit == 0 {
        return Err(AppError::BadRequest("limit must be positive".to_string()));
    }

    let reference = state.clock.resolve().await;
    let appointments = state
        .client
        .fetch_appointments(&query.client_id)
        .await
        .map_err(map_error)?;

    let preview = upcoming_appointments(&appointments, reference.instant, limit);

    Ok(Json(json!({
        "appointments": preview,
        "reference": {
            "date": reference.instant.to_rfc3339(),
            "source": reference.source.label(),
        },
    })))
}

/// Latest value of the background feed. Available only when the server
/// was started with a default client configured.
#[axum::debug_handler]
pub async fn get_upcoming_live(
    State(state): State<AppointmentState>,
) -> Result<Json<Value>, AppError> {
    let live = state
        .live
        .as_ref()
        .ok_or_else(|| AppError::NotFound("Live appointment preview is not enabled".to_string()))?;

    let preview = live.borrow().clone();
    Ok(Json(json!({ "appointments": preview })))
}

#[axum::debug_handler]
pub async fn create_appointment(
    State(state): State<AppointmentState>,
    Json(request): Json<NewAppointment>,
) -> Result<Json<Value>, AppError> {
    let appointment = state
        .client
        .create_appointment(&request)
        .await
        .map_err(map_error)?;

    Ok(Json(json!({ "appointment": appointment })))
}

#[axum::debug_handler]
pub async fn update_appointment(
    State(state): State<AppointmentState>,
    Path(appointment_id): Path<Uuid>,
    Json(request): Json<UpdateAppointmentRequest>,
) -> Result<Json<Value>, AppError> {
    let appointment = state
        .client
        .update_appointment(appointment_id, &request)
        .await
        .map_err(map_error)?;

    Ok(Json(json!({ "appointment": appointment })))
}

#[axum::debug_handler]
pub async fn delete_appointment(
    State(state): State<AppointmentState>,
    Path(appointment_id): Path<Uuid>,
) -> Result<Json<Value>, AppError> {
    let success = state
        .client
        .delete_appointment(appointment_id)
        .await
        .map_err(map_error)?;

    Ok(Json(json!({ "success": success })))
}

#[axum::debug_handler]
pub async fn get_availability(
    State(state): State<AppointmentState>,
    Query(query): Query<ClientQuery>,
) -> Result<Json<Value>, AppError> {
    let availability = state
        .client
        .fetch_availability(&query.client_id)
        .await
        .map_err(map_error)?;

    Ok(Json(json!({ "availability": availability })))
}

#[axum::debug_handler]
pub async fn save_availability(
    State(state): State<AppointmentState>,
    Json(request): Json<SaveAvailabilityRequest>,
) -> Result<Json<Value>, AppError> {
    let availability = state
        .client
        .save_availability(&request)
        .await
        .map_err(map_error)?;

    Ok(Json(json!({ "availability": availability })))
}
