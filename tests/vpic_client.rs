//! VpicClient against a local stand-in for the vPIC API

mod common;

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde_json::json;

use vin_cache::{
    config::DecoderConfig,
    errors::SourceError,
    export::ParquetExporter,
    repositories::VehicleRepository,
    services::LookupService,
    sources::{VinDecoder, VpicClient},
};

use common::*;

const NO_RESULTS_VIN: &str = "NORESULTS00000000";
const GARBAGE_VIN: &str = "GARBAGEBODY000000";
const SERVER_ERROR_VIN: &str = "SERVERERROR000000";

async fn decode_vin_values(
    Path(vin): Path<String>,
    Query(params): Query<HashMap<String, String>>,
    State(hits): State<Arc<AtomicUsize>>,
) -> Response {
    hits.fetch_add(1, Ordering::SeqCst);

    if params.get("format").map(String::as_str) != Some("json") {
        return StatusCode::NOT_ACCEPTABLE.into_response();
    }

    match vin.as_str() {
        ACCORD_VIN => Json(json!({
            "Count": 1,
            "Message": "Results returned successfully",
            "SearchCriteria": format!("VIN:{}", vin),
            "Results": [{
                "ErrorCode": "0",
                "ErrorText": "0 - VIN decoded clean. Check Digit (9th position) is correct",
                "Make": "HONDA",
                "Model": "Accord",
                "ModelYear": "2003",
                "BodyClass": "Coupe",
                "Doors": "2"
            }]
        }))
        .into_response(),
        BAD_CHECK_DIGIT_VIN => Json(json!({
            "Results": [{
                "ErrorCode": "1",
                "ErrorText": CHECK_DIGIT_ERROR,
                "Make": "",
                "Model": "",
                "ModelYear": "",
                "BodyClass": ""
            }]
        }))
        .into_response(),
        NO_RESULTS_VIN => Json(json!({ "Results": [] })).into_response(),
        GARBAGE_VIN => "<html>maintenance</html>".into_response(),
        SERVER_ERROR_VIN => StatusCode::INTERNAL_SERVER_ERROR.into_response(),
        _ => StatusCode::NOT_FOUND.into_response(),
    }
}

async fn spawn_upstream() -> (String, Arc<AtomicUsize>) {
    let hits = Arc::new(AtomicUsize::new(0));
    let app = Router::new()
        .route(
            "/api/vehicles/decodevinvalues/:vin",
            get(decode_vin_values),
        )
        .with_state(hits.clone());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    (format!("http://{}/", addr), hits)
}

fn client(base_url: &str) -> VpicClient {
    VpicClient::new(&DecoderConfig {
        base_url: base_url.to_string(),
        user_agent: "vin-cache-test".to_string(),
    })
}

#[tokio::test]
async fn test_decode_clean_vin() {
    let (base_url, hits) = spawn_upstream().await;

    let vehicle = client(&base_url).decode(ACCORD_VIN).await.unwrap();
    assert_eq!(vehicle, accord());
    assert_eq!(hits.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_decode_rejected_vin_carries_error_text() {
    let (base_url, _) = spawn_upstream().await;

    match client(&base_url).decode(BAD_CHECK_DIGIT_VIN).await {
        Err(SourceError::InvalidVin { message }) => assert_eq!(message, CHECK_DIGIT_ERROR),
        other => panic!("expected InvalidVin, got {:?}", other),
    }
}

#[tokio::test]
async fn test_decode_malformed_responses_are_upstream_errors() {
    let (base_url, _) = spawn_upstream().await;
    let client = client(&base_url);

    assert!(matches!(
        client.decode(NO_RESULTS_VIN).await,
        Err(SourceError::ParseError { .. })
    ));
    assert!(matches!(
        client.decode(GARBAGE_VIN).await,
        Err(SourceError::ParseError { .. })
    ));
    assert!(matches!(
        client.decode(SERVER_ERROR_VIN).await,
        Err(SourceError::Status { status: 500, .. })
    ));
}

#[tokio::test]
async fn test_decode_unreachable_upstream_is_http_error() {
    // Bind then drop to get a port nobody is listening on
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let result = client(&format!("http://{}", addr)).decode(ACCORD_VIN).await;
    assert!(matches!(result, Err(SourceError::Http(_))));
}

#[tokio::test]
async fn test_second_lookup_does_not_reach_upstream() {
    let (base_url, hits) = spawn_upstream().await;
    let dir = tempfile::tempdir().unwrap();
    let (config, database) = test_database(&dir).await;

    let service = LookupService::new(
        VehicleRepository::new(database.pool()),
        Arc::new(client(&base_url)),
        ParquetExporter::new(&config.storage),
    );

    let first = service.lookup(ACCORD_VIN).await.unwrap();
    assert!(!first.cached);

    let second = service.lookup(ACCORD_VIN).await.unwrap();
    assert!(second.cached);
    assert_eq!(first.vehicle, second.vehicle);

    assert_eq!(hits.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_rejected_vin_is_not_cached() {
    let (base_url, hits) = spawn_upstream().await;
    let dir = tempfile::tempdir().unwrap();
    let (config, database) = test_database(&dir).await;
    let repository = VehicleRepository::new(database.pool());

    let service = LookupService::new(
        repository.clone(),
        Arc::new(client(&base_url)),
        ParquetExporter::new(&config.storage),
    );

    let err = service.lookup(BAD_CHECK_DIGIT_VIN).await.unwrap_err();
    assert!(err.is_client_error());
    assert_eq!(err.detail(), CHECK_DIGIT_ERROR);
    assert_eq!(repository.count().await.unwrap(), 0);

    // Rejections are not cached, so the upstream is asked again
    service.lookup(BAD_CHECK_DIGIT_VIN).await.unwrap_err();
    assert_eq!(hits.load(Ordering::SeqCst), 2);
}
