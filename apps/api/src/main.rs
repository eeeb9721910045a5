use std::net::SocketAddr;
use std::sync::Arc;

use dotenv::dotenv;
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::{self, TraceLayer};
use tracing::{info, Level};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod router;

use appointment_cell::{AppointmentState, NniaAppointmentsClient, UpcomingFeed};
use billing_cell::{BillingState, CheckoutService, SubscriptionService};
use clock_cell::ClockService;
use dashboard_cell::{DashboardState, StatsService};
use notification_cell::{NniaNotificationsClient, NotificationState};
use shared_config::AppConfig;

use router::ApiContext;

#[tokio::main]
async fn main() {
    // Loading Env Vars
    dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info,tower_http=debug".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting NNIA dashboard API server");

    // Load configuration
    let config = AppConfig::from_env();

    // Shared services; one clock so the resolution cache is process-wide
    let clock = Arc::new(ClockService::new(&config));
    let appointments_client = Arc::new(NniaAppointmentsClient::new(&config));
    let notifications_client = Arc::new(NniaNotificationsClient::new(&config));

    // Background preview feed for the configured default client
    let feed_handle = match config.default_client_id.as_deref() {
        Some(client_id) => {
            let feed = UpcomingFeed::new(
                Arc::clone(&clock),
                Arc::clone(&appointments_client),
                client_id,
            );
            Some(feed.start().await)
        }
        None => None,
    };
    let live = feed_handle.as_ref().map(|handle| handle.subscribe());

    // Set up CORS
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let ctx = ApiContext {
        clock: Arc::clone(&clock),
        appointments: AppointmentState {
            clock,
            client: appointments_client,
            live,
        },
        notifications: NotificationState {
            client: notifications_client,
        },
        dashboard: DashboardState {
            stats: Arc::new(StatsService::new(&config)),
        },
        billing: BillingState {
            subscriptions: Arc::new(SubscriptionService::new(&config)),
            checkout: Arc::new(CheckoutService::new(&config)),
        },
    };

    // Build the application router
    let app = router::create_router(ctx)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(trace::DefaultMakeSpan::new().level(Level::INFO))
                .on_response(trace::DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(cors);

    // Run the server
    let addr = SocketAddr::from(([0, 0, 0, 0], 3000));
    info!("Listening on {}", addr);

    let listener = TcpListener::bind(addr).await.unwrap();
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .unwrap();

    // The feed timer must not outlive the server
    if let Some(handle) = feed_handle {
        info!("Stopping upcoming-appointments feed");
        handle.stop().await;
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
    }
}
