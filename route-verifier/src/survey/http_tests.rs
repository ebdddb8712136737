//! Survey tests against a stub gateway.

use std::collections::BTreeSet;
use std::time::Duration;

use axum::{
    Json, Router,
    http::StatusCode,
    routing::{get, post},
};
use chrono::NaiveDate;
use serde_json::{Value, json};
use tempfile::tempdir;

use super::*;
use crate::domain::{ServiceClass, StationPair};
use crate::test_support::{refused_base_url, spawn_stub};
use crate::ts::{TicketClient, TicketClientConfig, TripQuery, TsError};

const HIGH_SPEED_PATH: &str = "/api/v1/travelservice/trips/left";
const NORMAL_PATH: &str = "/api/v1/travel2service/trips/left";
const ROUTES_PATH: &str = "/api/v1/routeservice/routes";

fn date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 10, 25).unwrap()
}

fn pair(a: &str, b: &str) -> StationPair {
    StationPair::new(a.into(), b.into())
}

fn client(base_url: &str) -> TicketClient {
    TicketClient::new(TicketClientConfig::new(base_url)).unwrap()
}

#[tokio::test]
async fn probe_sends_query_body() {
    let app = Router::new().route(
        HIGH_SPEED_PATH,
        post(|Json(query): Json<TripQuery>| async move {
            assert_eq!(query.start_place, "shanghai");
            assert_eq!(query.end_place, "suzhou");
            assert_eq!(query.departure_time, "2026-10-25");
            Json(json!({"status": 1, "data": [{"tripId": "G1234"}, {"tripId": "D1345"}]}))
        }),
    );
    let base_url = spawn_stub(app).await;

    let outcome = client(&base_url)
        .probe(&pair("shanghai", "suzhou"), date(), ServiceClass::HighSpeed)
        .await;

    assert_eq!(outcome, ProbeOutcome::HasTrips(2));
}

#[tokio::test]
async fn high_speed_only_pair_over_http() {
    let app = Router::new()
        .route(
            HIGH_SPEED_PATH,
            post(|| async { Json(json!([{"tripId": "G1234"}])) }),
        )
        .route(NORMAL_PATH, post(|| async { Json(json!([])) }));
    let base_url = spawn_stub(app).await;
    let client = client(&base_url);

    let pairs = BTreeSet::from([pair("shanghai", "suzhou")]);
    let result = Surveyor::new(&client).survey(&pairs, date()).await;

    assert!(result.tables.contains(ServiceClass::HighSpeed, "shanghai", "suzhou"));
    assert!(result.tables.normal.is_empty());
    assert_eq!(result.stats.failures(), 0);
}

#[tokio::test]
async fn refused_connections_yield_empty_tables() {
    let client = client(&refused_base_url().await);

    let pairs = BTreeSet::from([pair("shanghai", "suzhou"), pair("suzhou", "nanjing")]);
    let result = Surveyor::new(&client).survey(&pairs, date()).await;

    assert_eq!(result.tables, RouteTables::new());
    assert_eq!(result.stats.transport_errors, 4);
}

#[tokio::test]
async fn slow_service_times_out() {
    let app = Router::new().route(
        NORMAL_PATH,
        post(|| async {
            tokio::time::sleep(Duration::from_secs(5)).await;
            Json(json!([{"tripId": "Z1235"}]))
        }),
    );
    let base_url = spawn_stub(app).await;
    let client =
        TicketClient::new(TicketClientConfig::new(&base_url).with_trip_timeout(1)).unwrap();

    let outcome = client
        .probe(&pair("xuzhou", "beijing"), date(), ServiceClass::Normal)
        .await;

    assert_eq!(outcome, ProbeOutcome::Timeout);
}

#[tokio::test]
async fn error_status_is_not_served() {
    let app = Router::new().route(
        HIGH_SPEED_PATH,
        post(|| async { (StatusCode::INTERNAL_SERVER_ERROR, Json(json!([{"tripId": "G1"}]))) }),
    );
    let base_url = spawn_stub(app).await;

    let outcome = client(&base_url)
        .probe(&pair("a", "b"), date(), ServiceClass::HighSpeed)
        .await;

    assert_eq!(outcome, ProbeOutcome::Non200(500));
}

#[tokio::test]
async fn fetch_routes_accepts_bare_and_wrapped_lists() {
    let bare = spawn_stub(Router::new().route(
        ROUTES_PATH,
        get(|| async { Json(json!([{"stations": ["a", "b"]}])) }),
    ))
    .await;
    let wrapped = spawn_stub(Router::new().route(
        ROUTES_PATH,
        get(|| async { Json(json!({"status": 1, "data": [{"id": "r1"}, {"id": "r2"}]})) }),
    ))
    .await;

    assert_eq!(client(&bare).fetch_routes().await.unwrap().len(), 1);
    assert_eq!(client(&wrapped).fetch_routes().await.unwrap().len(), 2);
}

#[tokio::test]
async fn fetch_routes_rejects_error_status_and_bad_shape() {
    let forbidden = spawn_stub(Router::new().route(
        ROUTES_PATH,
        get(|| async { (StatusCode::FORBIDDEN, "denied") }),
    ))
    .await;
    let scalar = spawn_stub(Router::new().route(
        ROUTES_PATH,
        get(|| async { Json(json!({"data": "nope"})) }),
    ))
    .await;

    let err = client(&forbidden).fetch_routes().await.unwrap_err();
    assert!(matches!(err, TsError::Api { status: 403, .. }));

    let err = client(&scalar).fetch_routes().await.unwrap_err();
    assert!(matches!(err, TsError::UnexpectedShape(_)));
}

#[tokio::test]
async fn verify_routes_end_to_end() {
    let app = Router::new()
        .route(
            ROUTES_PATH,
            get(|| async {
                Json(json!({
                    "status": 1,
                    "data": [
                        {"id": "r1", "stations": [{"name": "a"}, {"name": "b"}, {"name": "c"}]},
                        {"id": "r2", "startStation": "c", "endStation": "d"},
                        {"id": "r3", "stations": []}
                    ]
                }))
            }),
        )
        .route(
            HIGH_SPEED_PATH,
            post(|| async { Json(json!([{"tripId": "G1234"}])) }),
        )
        .route(
            NORMAL_PATH,
            post(|| async { Json(json!({"status": 0, "msg": "No Trip"})) }),
        );
    let base_url = spawn_stub(app).await;

    let dir = tempdir().unwrap();
    let output = dir.path().join("routes_config_output.py");
    let config = SurveyConfig::default().with_output_path(&output);
    let today = NaiveDate::from_ymd_opt(2026, 10, 18).unwrap();

    let report = verify_routes(&client(&base_url), &config, today)
        .await
        .unwrap();

    assert_eq!(report.routes, 3);
    assert_eq!(report.date, date());
    assert_eq!(report.count(ServiceClass::HighSpeed), 4);
    assert_eq!(report.count(ServiceClass::Normal), 0);
    assert_eq!(report.stats.probes, 8);

    let high_speed: Vec<(String, Vec<String>)> = report
        .tables
        .high_speed
        .iter()
        .map(|(origin, dests)| {
            (
                origin.to_string(),
                dests.keys().map(|d| d.to_string()).collect(),
            )
        })
        .collect();
    assert_eq!(
        high_speed,
        vec![
            ("a".to_string(), vec!["b".to_string(), "c".to_string()]),
            ("b".to_string(), vec!["c".to_string()]),
            ("c".to_string(), vec!["d".to_string()]),
        ]
    );

    let written = std::fs::read_to_string(&output).unwrap();
    assert_eq!(written, report.config_text);
    assert!(written.contains("    # no normal routes found\n"));
}

#[tokio::test]
async fn verify_routes_stops_on_empty_route_list() {
    let app = Router::new().route(ROUTES_PATH, get(|| async { Json(Value::Array(Vec::new())) }));
    let base_url = spawn_stub(app).await;

    let dir = tempdir().unwrap();
    let output = dir.path().join("routes.py");
    let config = SurveyConfig::default().with_output_path(&output);
    let today = NaiveDate::from_ymd_opt(2026, 10, 18).unwrap();

    let err = verify_routes(&client(&base_url), &config, today)
        .await
        .unwrap_err();

    assert!(matches!(err, SurveyError::NoRoutes));
    assert!(!output.exists());
}

#[tokio::test]
async fn verify_routes_fails_when_gateway_unreachable() {
    let dir = tempdir().unwrap();
    let config = SurveyConfig::default().with_output_path(dir.path().join("routes.py"));
    let today = NaiveDate::from_ymd_opt(2026, 10, 18).unwrap();

    let err = verify_routes(&client(&refused_base_url().await), &config, today)
        .await
        .unwrap_err();

    assert!(matches!(err, SurveyError::RouteFetch(TsError::Http(_))));
}
