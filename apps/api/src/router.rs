use std::sync::Arc;

use axum::{routing::get, Router};

use appointment_cell::{appointment_routes, AppointmentState};
use billing_cell::{billing_routes, BillingState};
use clock_cell::{clock_routes, ClockService};
use dashboard_cell::{dashboard_routes, DashboardState};
use notification_cell::{notification_routes, NotificationState};

pub struct ApiContext {
    pub clock: Arc<ClockService>,
    pub appointments: AppointmentState,
    pub notifications: NotificationState,
    pub dashboard: DashboardState,
    pub billing: BillingState,
}

pub fn create_router(ctx: ApiContext) -> Router {
    Router::new()
        .route("/", get(|| async { "NNIA dashboard API is running!" }))
        .nest("/time", clock_routes(ctx.clock))
        .nest("/appointments", appointment_routes(ctx.appointments))
        .nest("/notifications", notification_routes(ctx.notifications))
        .nest("/dashboard", dashboard_routes(ctx.dashboard))
        .nest("/billing", billing_routes(ctx.billing))
}
