// libs/dashboard-cell/tests/stats_test.rs

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use tower::ServiceExt;
use wiremock::matchers::{method, path, query_param, query_param_is_missing};
use wiremock::{Mock, MockServer, ResponseTemplate};

use dashboard_cell::handlers::DashboardState;
use dashboard_cell::router::dashboard_routes;
use dashboard_cell::services::stats::{resolution_rate, StatsService};
use shared_config::AppConfig;
use shared_database::SupabaseClient;

fn test_config(supabase_url: &str) -> AppConfig {
    AppConfig {
        nnia_api_url: "http://localhost:3001".to_string(),
        payments_backend_url: String::new(),
        supabase_url: supabase_url.to_string(),
        supabase_anon_key: "test_anon_key".to_string(),
        default_client_id: None,
    }
}

fn count_response(total: i64) -> ResponseTemplate {
    ResponseTemplate::new(200).insert_header("content-range", format!("0-0/{}", total).as_str())
}

async fn mount_counts(server: &MockServer) {
    Mock::given(method("HEAD"))
        .and(path("/rest/v1/messages"))
        .and(query_param("client_id", "eq.client-1"))
        .respond_with(count_response(42))
        .mount(server)
        .await;

    Mock::given(method("HEAD"))
        .and(path("/rest/v1/tickets"))
        .and(query_param("client_id", "eq.client-1"))
        .and(query_param_is_missing("status"))
        .respond_with(count_response(8))
        .mount(server)
        .await;

    Mock::given(method("HEAD"))
        .and(path("/rest/v1/tickets"))
        .and(query_param("status", "eq.open"))
        .respond_with(count_response(2))
        .mount(server)
        .await;

    Mock::given(method("HEAD"))
        .and(path("/rest/v1/tickets"))
        .and(query_param("status", "eq.closed"))
        .respond_with(count_response(6))
        .mount(server)
        .await;
}

#[test]
fn resolution_rate_is_zero_without_tickets() {
    assert_eq!(resolution_rate(0, 0), 0);
}

#[test]
fn resolution_rate_rounds_the_closed_share() {
    assert_eq!(resolution_rate(3, 4), 75);
    assert_eq!(resolution_rate(1, 3), 33);
    assert_eq!(resolution_rate(2, 3), 67);
    assert_eq!(resolution_rate(4, 4), 100);
}

#[tokio::test]
async fn aggregates_counts_from_supabase() {
    let server = MockServer::start().await;
    mount_counts(&server).await;

    let config = test_config(&server.uri());
    let service = StatsService::with_client(Arc::new(SupabaseClient::new(&config)));

    let stats = service.dashboard_stats("client-1", None).await.unwrap();

    assert_eq!(stats.total_conversations, 42);
    assert_eq!(stats.total_tickets, 8);
    assert_eq!(stats.open_tickets, 2);
    assert_eq!(stats.closed_tickets, 6);
    assert_eq!(stats.total_customers, 0);
    assert_eq!(stats.resolution_rate, 75);
}

#[tokio::test]
async fn stats_route_returns_the_aggregate() {
    let server = MockServer::start().await;
    mount_counts(&server).await;

    let config = test_config(&server.uri());
    let state = DashboardState {
        stats: Arc::new(StatsService::new(&config)),
    };

    let app = dashboard_routes(state);

    let request = Request::builder()
        .method("GET")
        .uri("/stats?clientId=client-1")
        .body(Body::empty())
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let json: serde_json::Value = serde_json::from_slice(&body).unwrap();

    assert_eq!(json["stats"]["total_conversations"], 42);
    assert_eq!(json["stats"]["resolution_rate"], 75);
}

#[tokio::test]
async fn database_failure_maps_to_internal_error() {
    let server = MockServer::start().await;

    Mock::given(method("HEAD"))
        .and(path("/rest/v1/messages"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let config = test_config(&server.uri());
    let state = DashboardState {
        stats: Arc::new(StatsService::new(&config)),
    };

    let app = dashboard_routes(state);

    let request = Request::builder()
        .method("GET")
        .uri("/stats?clientId=client-1")
        .body(Body::empty())
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
}
