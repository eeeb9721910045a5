// libs/clock-cell/tests/resolver_test.rs
//
// Fallback-chain and cache behavior of the clock resolver, with every
// remote collaborator mocked.

use std::time::Duration;

use assert_matches::assert_matches;
use chrono::{TimeZone, Utc};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use clock_cell::{ClockProvenance, ClockService, ResponseShape, TimeProvider};

const CACHE_TTL: Duration = Duration::from_secs(300);

fn provider(server: &MockServer, name: &str, route: &str, shape: ResponseShape) -> TimeProvider {
    TimeProvider::new(name, &format!("{}{}", server.uri(), route), shape)
}

#[tokio::test]
async fn first_provider_wins() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/worldtime"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "utc_datetime": "2024-01-10T12:00:00+00:00",
            "timezone": "UTC"
        })))
        .mount(&server)
        .await;

    let service = ClockService::with_providers(
        vec![provider(&server, "worldtimeapi", "/worldtime", ResponseShape::UtcDatetime)],
        &server.uri(),
        CACHE_TTL,
    );

    let clock = service.resolve().await;

    assert_eq!(clock.instant, Utc.with_ymd_and_hms(2024, 1, 10, 12, 0, 0).unwrap());
    assert_matches!(
        clock.source,
        ClockProvenance::RemoteTimeService { ref provider } if provider == "worldtimeapi"
    );
    assert_eq!(clock.timezone, "UTC");
}

#[tokio::test]
async fn failed_provider_falls_through_to_next() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/broken"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/timeapi"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "dateTime": "2024-01-10T12:34:56.789",
            "timeZone": "UTC"
        })))
        .mount(&server)
        .await;

    let service = ClockService::with_providers(
        vec![
            provider(&server, "worldtimeapi", "/broken", ResponseShape::UtcDatetime),
            provider(&server, "timeapi.io", "/timeapi", ResponseShape::DateTime),
        ],
        &server.uri(),
        CACHE_TTL,
    );

    let clock = service.resolve().await;

    assert_matches!(
        clock.source,
        ClockProvenance::RemoteTimeService { ref provider } if provider == "timeapi.io"
    );
    assert_eq!(
        clock.instant,
        Utc.with_ymd_and_hms(2024, 1, 10, 12, 34, 56).unwrap() + chrono::Duration::milliseconds(789)
    );
}

#[tokio::test]
async fn unparsable_payload_counts_as_failure() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/garbage"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "utc_datetime": "not-a-date"
        })))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/timezonedb"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "formatted": "2024-01-10 09:30:00",
            "zoneName": "UTC"
        })))
        .mount(&server)
        .await;

    let service = ClockService::with_providers(
        vec![
            provider(&server, "worldtimeapi", "/garbage", ResponseShape::UtcDatetime),
            provider(&server, "timezonedb", "/timezonedb", ResponseShape::Formatted),
        ],
        &server.uri(),
        CACHE_TTL,
    );

    let clock = service.resolve().await;

    assert_matches!(
        clock.source,
        ClockProvenance::RemoteTimeService { ref provider } if provider == "timezonedb"
    );
    assert_eq!(clock.instant, Utc.with_ymd_and_hms(2024, 1, 10, 9, 30, 0).unwrap());
}

#[tokio::test]
async fn exhausted_providers_use_backend_fallback() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/broken"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/nnia/real-time"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "success": true,
            "date": "2024-01-10T12:00:00Z"
        })))
        .mount(&server)
        .await;

    let service = ClockService::with_providers(
        vec![provider(&server, "worldtimeapi", "/broken", ResponseShape::UtcDatetime)],
        &server.uri(),
        CACHE_TTL,
    );

    let clock = service.resolve().await;

    assert_eq!(clock.source, ClockProvenance::BackendFallback);
    assert_eq!(clock.instant, Utc.with_ymd_and_hms(2024, 1, 10, 12, 0, 0).unwrap());
}

#[tokio::test]
async fn backend_failure_report_is_not_accepted() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/nnia/real-time"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "success": false,
            "date": null
        })))
        .mount(&server)
        .await;

    let service = ClockService::with_providers(vec![], &server.uri(), CACHE_TTL);

    let before = Utc::now();
    let clock = service.resolve().await;
    let after = Utc::now();

    assert_eq!(clock.source, ClockProvenance::LocalClock);
    assert!(clock.instant >= before && clock.instant <= after);
}

#[tokio::test]
async fn total_exhaustion_falls_back_to_local_clock() {
    // No mocks mounted at all: providers and backend both 404.
    let server = MockServer::start().await;

    let service = ClockService::with_providers(
        vec![provider(&server, "worldtimeapi", "/missing", ResponseShape::UtcDatetime)],
        &server.uri(),
        CACHE_TTL,
    );

    let before = Utc::now();
    let clock = service.resolve().await;
    let after = Utc::now();

    assert_eq!(clock.source, ClockProvenance::LocalClock);
    assert!(clock.instant >= before && clock.instant <= after);
}

#[tokio::test]
async fn cached_resolution_issues_no_new_requests() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/worldtime"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "utc_datetime": "2024-01-10T12:00:00+00:00",
            "timezone": "UTC"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let service = ClockService::with_providers(
        vec![provider(&server, "worldtimeapi", "/worldtime", ResponseShape::UtcDatetime)],
        &server.uri(),
        CACHE_TTL,
    );

    let first = service.resolve().await;
    let second = service.resolve().await;

    assert_eq!(first, second);
}

#[tokio::test]
async fn local_fallback_is_not_cached() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/broken"))
        .respond_with(ResponseTemplate::new(500))
        .expect(2)
        .mount(&server)
        .await;

    let service = ClockService::with_providers(
        vec![provider(&server, "worldtimeapi", "/broken", ResponseShape::UtcDatetime)],
        &server.uri(),
        CACHE_TTL,
    );

    let first = service.resolve().await;
    let second = service.resolve().await;

    // Both resolutions walked the chain again.
    assert_eq!(first.source, ClockProvenance::LocalClock);
    assert_eq!(second.source, ClockProvenance::LocalClock);
}

#[tokio::test]
async fn expired_cache_is_refreshed() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/worldtime"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "utc_datetime": "2024-01-10T12:00:00+00:00",
            "timezone": "UTC"
        })))
        .expect(2)
        .mount(&server)
        .await;

    let service = ClockService::with_providers(
        vec![provider(&server, "worldtimeapi", "/worldtime", ResponseShape::UtcDatetime)],
        &server.uri(),
        Duration::from_millis(50),
    );

    service.resolve().await;
    tokio::time::sleep(Duration::from_millis(80)).await;
    service.resolve().await;
}

#[tokio::test]
async fn clear_cache_forces_re_resolution() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/worldtime"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "utc_datetime": "2024-01-10T12:00:00+00:00",
            "timezone": "UTC"
        })))
        .expect(2)
        .mount(&server)
        .await;

    let service = ClockService::with_providers(
        vec![provider(&server, "worldtimeapi", "/worldtime", ResponseShape::UtcDatetime)],
        &server.uri(),
        CACHE_TTL,
    );

    service.resolve().await;
    service.clear_cache().await;
    service.resolve().await;
}
