//! Endpoint-level tests: handlers driven through a static in-memory dataset,
//! asserting the exact bodies and the legacy plain-text contracts.

use std::sync::Arc;

use chrono::{TimeDelta, Utc};
use http::StatusCode;
use http_body_util::BodyExt;
use serde_json::{Value, json};

use iss_tracker::response::Response;
use iss_tracker::{AppState, EphemerisDocument, StaticProvider, routes};

const EPOCH_FORMAT: &str = "%Y-%jT%H:%M:%S%.3fZ";

fn state_vector(epoch: &str, velocity: (&str, &str, &str)) -> Value {
    json!({
        "EPOCH": epoch,
        "X": { "#text": "-4945.2", "@units": "km" },
        "Y": { "#text": "-3625.9", "@units": "km" },
        "Z": { "#text": "-2944.7", "@units": "km" },
        "X_DOT": { "#text": velocity.0, "@units": "km/s" },
        "Y_DOT": { "#text": velocity.1, "@units": "km/s" },
        "Z_DOT": { "#text": velocity.2, "@units": "km/s" }
    })
}

fn document(state_vectors: Vec<Value>) -> EphemerisDocument {
    serde_json::from_value(json!({
        "ndm": { "oem": {
            "header": { "CREATION_DATE": "2024-057T02:00:00.000Z", "ORIGINATOR": "NASA" },
            "body": { "segment": {
                "metadata": { "OBJECT_NAME": "ISS", "REF_FRAME": "EME2000" },
                "data": {
                    "COMMENT": ["Units are km and km/s", "TRAJECTORY EVENT SUMMARY"],
                    "stateVector": state_vectors
                }
            } }
        } }
    }))
    .unwrap()
}

fn app(doc: EphemerisDocument) -> AppState {
    AppState::new(Arc::new(StaticProvider::new(doc)))
}

fn four_epochs() -> AppState {
    app(document(
        (0..4)
            .map(|i| state_vector(&format!("2024-057T{:02}:00:00.000Z", i * 4), ("1", "2", "2")))
            .collect(),
    ))
}

async fn body_text(response: Response) -> String {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    String::from_utf8(bytes.to_vec()).unwrap()
}

async fn body_json(response: Response) -> Value {
    serde_json::from_str(&body_text(response).await).unwrap()
}

#[tokio::test]
async fn comment_header_metadata_are_projections() {
    let state = four_epochs();

    let comment = body_json(routes::comment(&state)).await;
    assert_eq!(comment, json!(["Units are km and km/s", "TRAJECTORY EVENT SUMMARY"]));

    let header = body_json(routes::header(&state)).await;
    assert_eq!(header["ORIGINATOR"], "NASA");

    let metadata = body_json(routes::metadata(&state)).await;
    assert_eq!(metadata["OBJECT_NAME"], "ISS");
}

#[tokio::test]
async fn epochs_default_page_is_whole_dataset() {
    let state = four_epochs();
    let records = body_json(routes::epochs(&state, None)).await;
    assert_eq!(records.as_array().unwrap().len(), 4);
}

#[tokio::test]
async fn epochs_limit_two_returns_first_two_in_order() {
    let state = four_epochs();
    let records = body_json(routes::epochs(&state, Some("limit=2&offset=0"))).await;
    let records = records.as_array().unwrap();
    assert_eq!(records.len(), 2);
    assert_eq!(records[0]["EPOCH"], "2024-057T00:00:00.000Z");
    assert_eq!(records[1]["EPOCH"], "2024-057T04:00:00.000Z");
}

#[tokio::test]
async fn epochs_offset_past_end_is_empty_not_an_error() {
    let state = four_epochs();
    let response = routes::epochs(&state, Some("offset=4"));
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await, json!([]));
}

#[tokio::test]
async fn epochs_invalid_parameter_is_legacy_plain_text() {
    let state = four_epochs();
    for raw in ["limit=abc", "offset=-1", "limit=2.5"] {
        let response = routes::epochs(&state, Some(raw));
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            body_text(response).await,
            "Invalid limit or offset parameter; must be an integer."
        );
    }
}

#[tokio::test]
async fn epoch_lookup_by_key_and_miss() {
    let state = four_epochs();

    let hit = body_json(routes::epoch_by_key(&state, "2024-057T08:00:00.000Z")).await;
    assert_eq!(hit["EPOCH"], "2024-057T08:00:00.000Z");
    assert_eq!(hit["X"]["#text"], "-4945.2");

    let miss = routes::epoch_by_key(&state, "1999-001T00:00:00.000Z");
    assert_eq!(miss.status(), StatusCode::OK);
    assert_eq!(body_text(miss).await, "Epoch not found.");
}

#[tokio::test]
async fn epoch_lookup_is_idempotent() {
    let state = four_epochs();
    let first = body_text(routes::epoch_by_key(&state, "2024-057T04:00:00.000Z")).await;
    let second = body_text(routes::epoch_by_key(&state, "2024-057T04:00:00.000Z")).await;
    assert_eq!(first, second);
}

#[tokio::test]
async fn epoch_speed_computes_magnitude() {
    let state = app(document(vec![state_vector(
        "2024-057T00:00:00.000Z",
        ("3", "4", "0"),
    )]));

    let speed = body_json(routes::epoch_speed(&state, "2024-057T00:00:00.000Z")).await;
    assert_eq!(speed, json!({ "EPOCH": "2024-057T00:00:00.000Z", "Speed (km/s)": 5.0 }));

    let miss = routes::epoch_speed(&state, "2024-058T00:00:00.000Z");
    assert_eq!(body_text(miss).await, "Epoch not found.");
}

#[tokio::test]
async fn now_returns_nearest_record_with_speed() {
    // One epoch a minute ago, one six hours out; /now must pick the near one.
    let near = (Utc::now() - TimeDelta::minutes(1)).format(EPOCH_FORMAT).to_string();
    let far = (Utc::now() + TimeDelta::hours(6)).format(EPOCH_FORMAT).to_string();
    let state = app(document(vec![
        state_vector(&near, ("3", "4", "0")),
        state_vector(&far, ("1", "2", "2")),
    ]));

    let now = body_json(routes::now(&state)).await;
    assert_eq!(now["EPOCH"], near.as_str());
    assert_eq!(now["Speed (km/s)"], 5.0);
    // The full record comes back, not just the speed.
    assert_eq!(now["X_DOT"]["#text"], "3");
}

#[tokio::test]
async fn now_on_empty_dataset_is_fatal() {
    let state = app(document(vec![]));
    let response = routes::now(&state);
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
}

#[tokio::test]
async fn malformed_document_surfaces_as_500() {
    let doc: EphemerisDocument = serde_json::from_value(json!({ "ndm": { "oem": {} } })).unwrap();
    let state = app(doc);
    for response in [
        routes::comment(&state),
        routes::header(&state),
        routes::metadata(&state),
        routes::epochs(&state, None),
    ] {
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
