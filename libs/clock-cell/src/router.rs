use std::sync::Arc;

use axum::{routing::get, Router};

use crate::handlers;
use crate::services::resolver::ClockService;

pub fn clock_routes(clock: Arc<ClockService>) -> Router {
    Router::new()
        .route("/", get(handlers::get_time))
        .with_state(clock)
}
