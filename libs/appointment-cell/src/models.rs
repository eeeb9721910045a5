// libs/appointment-cell/src/models.rs
use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum AppointmentStatus {
    Pending,
    Confirmed,
    Cancelled,
    Completed,
}

impl fmt::Display for AppointmentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppointmentStatus::Pending => write!(f, "pending"),
            AppointmentStatus::Confirmed => write!(f, "confirmed"),
            AppointmentStatus::Cancelled => write!(f, "cancelled"),
            AppointmentStatus::Completed => write!(f, "completed"),
        }
    }
}

/// Appointment record as served by the NNIA backend. `date` and `time`
/// stay strings on the wire; a record that cannot be placed on the
/// timeline is handled by the filter, not by deserialization.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Appointment {
    pub id: Uuid,
    pub client_id: Option<Uuid>,
    pub name: String,
    pub email: String,
    #[serde(rename = "type", alias = "service_name")]
    pub appointment_type: Option<String>,
    pub origin: Option<String>,
    pub date: String,
    pub time: String,
    #[serde(default)]
    pub status: Option<AppointmentStatus>,
    pub created_at: Option<DateTime<Utc>>,
}

impl Appointment {
    /// A record with no status at all counts as pending.
    pub fn is_pending(&self) -> bool {
        matches!(self.status, None | Some(AppointmentStatus::Pending))
    }

    /// Combined `date` + `time` as an instant, interpreted as UTC.
    /// `None` when either part fails to parse.
    pub fn scheduled_instant(&self) -> Option<DateTime<Utc>> {
        let date = NaiveDate::parse_from_str(&self.date, "%Y-%m-%d").ok()?;
        let time = NaiveTime::parse_from_str(&self.time, "%H:%M:%S")
            .or_else(|_| NaiveTime::parse_from_str(&self.time, "%H:%M"))
            .ok()?;
        Some(date.and_time(time).and_utc())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewAppointment {
    pub client_id: Uuid,
    pub name: String,
    pub email: String,
    #[serde(rename = "type")]
    pub appointment_type: Option<String>,
    pub origin: Option<String>,
    pub date: String,
    pub time: String,
    pub status: Option<AppointmentStatus>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct UpdateAppointmentRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub appointment_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<AppointmentStatus>,
}

/// Weekly availability grid. The dashboard edits it as a whole; this
/// crate treats the day/hour/type structure as opaque.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SaveAvailabilityRequest {
    #[serde(rename = "clientId")]
    pub client_id: Uuid,
    pub days: serde_json::Value,
    pub hours: serde_json::Value,
    pub types: serde_json::Value,
}

// Response envelopes used by the NNIA backend.

#[derive(Debug, Deserialize)]
pub struct AppointmentsEnvelope {
    pub appointments: Vec<Appointment>,
}

#[derive(Debug, Deserialize)]
pub struct AppointmentEnvelope {
    pub appointment: Appointment,
}

#[derive(Debug, Deserialize)]
pub struct DeleteEnvelope {
    pub success: bool,
}

#[derive(Debug, Deserialize)]
pub struct AvailabilityEnvelope {
    pub availability: serde_json::Value,
}

#[derive(Debug, Clone, thiserror::Error)]
pub enum AppointmentError {
    #[error("Appointment not found")]
    NotFound,

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Appointments API error: {0}")]
    ApiError(String),
}
