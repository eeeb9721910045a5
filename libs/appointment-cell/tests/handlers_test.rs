// libs/appointment-cell/tests/handlers_test.rs
//
// Route-level tests with the NNIA backend mocked.

use std::sync::Arc;
use std::time::Duration;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use tokio::sync::watch;
use tower::ServiceExt;
use wiremock::matchers::{body_partial_json, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use appointment_cell::handlers::AppointmentState;
use appointment_cell::models::Appointment;
use appointment_cell::router::appointment_routes;
use appointment_cell::services::client::NniaAppointmentsClient;
use clock_cell::ClockService;

const CACHE_TTL: Duration = Duration::from_secs(300);

fn appointment_json(name: &str, date: &str, time: &str, status: &str) -> serde_json::Value {
    serde_json::json!({
        "id": uuid::Uuid::new_v4(),
        "name": name,
        "email": format!("{}@example.com", name),
        "type": "consultation",
        "date": date,
        "time": time,
        "status": status
    })
}

async fn setup_state(server: &MockServer) -> AppointmentState {
    Mock::given(method("GET"))
        .and(path("/nnia/real-time"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "success": true,
            "date": "2024-01-10T00:00:00Z"
        })))
        .mount(server)
        .await;

    AppointmentState {
        clock: Arc::new(ClockService::with_providers(vec![], &server.uri(), CACHE_TTL)),
        client: Arc::new(NniaAppointmentsClient::with_base_url(&server.uri())),
        live: None,
    }
}

#[tokio::test]
async fn upcoming_endpoint_filters_and_sorts() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/nnia/appointments"))
        .and(query_param("clientId", "client-1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "appointments": [
                appointment_json("later", "2024-01-12", "09:00", "pending"),
                appointment_json("past", "2024-01-09", "09:00", "pending"),
                appointment_json("soon", "2024-01-10", "09:00", "pending"),
                appointment_json("done", "2024-01-15", "09:00", "completed"),
            ]
        })))
        .mount(&server)
        .await;

    let app = appointment_routes(setup_state(&server).await);

    let request = Request::builder()
        .method("GET")
        .uri("/upcoming?clientId=client-1&limit=2")
        .body(Body::empty())
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let json: serde_json::Value = serde_json::from_slice(&body).unwrap();

    let names: Vec<&str> = json["appointments"]
        .as_array()
        .unwrap()
        .iter()
        .map(|a| a["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["soon", "later"]);
    assert_eq!(json["reference"]["source"], "backend_fallback");
}

#[tokio::test]
async fn upcoming_rejects_zero_limit() {
    let server = MockServer::start().await;
    let app = appointment_routes(setup_state(&server).await);

    let request = Request::builder()
        .method("GET")
        .uri("/upcoming?clientId=client-1&limit=0")
        .body(Body::empty())
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn live_preview_is_404_when_not_enabled() {
    let server = MockServer::start().await;
    let app = appointment_routes(setup_state(&server).await);

    let request = Request::builder()
        .method("GET")
        .uri("/upcoming/live")
        .body(Body::empty())
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn live_preview_serves_the_latest_feed_value() {
    let server = MockServer::start().await;
    let mut state = setup_state(&server).await;

    let preview: Vec<Appointment> = serde_json::from_value(serde_json::json!([
        appointment_json("live", "2024-01-12", "10:00", "pending")
    ]))
    .unwrap();
    let (tx, rx) = watch::channel(preview);
    state.live = Some(rx);

    let app = appointment_routes(state);

    let request = Request::builder()
        .method("GET")
        .uri("/upcoming/live")
        .body(Body::empty())
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(json["appointments"][0]["name"], "live");

    drop(tx);
}

#[tokio::test]
async fn create_proxies_to_the_backend() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/nnia/appointments"))
        .and(body_partial_json(serde_json::json!({ "name": "ana" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "appointment": appointment_json("ana", "2024-02-01", "10:00", "pending")
        })))
        .expect(1)
        .mount(&server)
        .await;

    let app = appointment_routes(setup_state(&server).await);

    let payload = serde_json::json!({
        "client_id": uuid::Uuid::new_v4(),
        "name": "ana",
        "email": "ana@example.com",
        "type": "consultation",
        "date": "2024-02-01",
        "time": "10:00"
    });

    let request = Request::builder()
        .method("POST")
        .uri("/")
        .header("content-type", "application/json")
        .body(Body::from(payload.to_string()))
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(json["appointment"]["name"], "ana");
}

#[tokio::test]
async fn backend_failure_maps_to_bad_gateway() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/nnia/appointments"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let app = appointment_routes(setup_state(&server).await);

    let request = Request::builder()
        .method("GET")
        .uri("/?clientId=client-1")
        .body(Body::empty())
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
}
