// libs/appointment-cell/src/router.rs
use axum::{
    routing::{get, put},
    Router,
};

use crate::handlers::{self, AppointmentState};

pub fn appointment_routes(state: AppointmentState) -> Router {
    Router::new()
        .route(
            "/",
            get(handlers::list_appointments).post(handlers::create_appointment),
        )
        .route("/upcoming", get(handlers::get_upcoming))
        .route("/upcoming/live", get(handlers::get_upcoming_live))
        .route(
            "/availability",
            get(handlers::get_availability).post(handlers::save_availability),
        )
        .route(
            "/{appointment_id}",
            put(handlers::update_appointment).delete(handlers::delete_appointment),
        )
        .with_state(state)
}
