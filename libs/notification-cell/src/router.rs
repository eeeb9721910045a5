use axum::{
    routing::{get, post},
    Router,
};

use crate::handlers::{self, NotificationState};

pub fn notification_routes(state: NotificationState) -> Router {
    Router::new()
        .route(
            "/",
            get(handlers::list_notifications).post(handlers::create_notification),
        )
        .route(
            "/{notification_id}/read",
            post(handlers::mark_notification_read),
        )
        .with_state(state)
}
