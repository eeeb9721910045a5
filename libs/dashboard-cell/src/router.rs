use axum::{routing::get, Router};

use crate::handlers::{self, DashboardState};

pub fn dashboard_routes(state: DashboardState) -> Router {
    Router::new()
        .route("/stats", get(handlers::get_stats))
        .with_state(state)
}
