//! Contract and determinism tests for the engine endpoints.
//!
//! - Field names are camelCase
//! - The same request twice yields identical bytes

use axum::http::StatusCode;
use capsim::api::{self, AppState};
use capsim::Config;
use serde_json::{json, Value};
use tower::util::ServiceExt;

async fn post_bytes(uri: &str, body: &Value) -> (StatusCode, Vec<u8>) {
    let app = api::create_router(AppState::new(Config::default()));
    let req = axum::http::Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(axum::body::Body::from(body.to_string()))
        .unwrap();
    let res = app.oneshot(req).await.unwrap();
    let status = res.status();
    let bytes = axum::body::to_bytes(res.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, bytes.to_vec())
}

fn plan() -> Value {
    json!({
        "company": { "name": "Acme", "foundedDate": "2019-06-01", "currentDate": "2024-06-01" },
        "founders": [
            { "id": "ada", "name": "Ada", "equity": 55, "vestingStart": "2019-06-01", "cliffMonths": 12, "vestingMonths": 48 },
            { "id": "grace", "name": "Grace", "equity": 45, "vestingStart": "2019-06-01", "cliffMonths": 0, "vestingMonths": 48 }
        ],
        "rounds": [
            { "id": "b", "date": "2023-02-01", "roundType": "series-b", "preMoneyValuation": 60000000,
              "investment": 15000000, "leadInvestors": ["Growth"], "liquidationPreference": 1, "participating": true },
            { "id": "a", "date": "2021-04-01", "roundType": "series-a", "preMoneyValuation": 16000000,
              "investment": 4000000, "leadInvestors": ["Fund", "Angel"], "liquidationPreference": 1.5, "participating": false }
        ],
        "employees": [
            { "id": "lin", "name": "Lin", "role": "Engineer", "optionsGranted": 250000,
              "grantDate": "2021-09-01", "cliffMonths": 12, "vestingMonths": 48 }
        ],
        "optionPool": { "sizePercent": 12, "allocated": 250000 },
        "scenarios": [ { "id": "exit", "name": "Exit", "exitValuation": 120000000 } ]
    })
}

fn assert_camel_case_keys(value: &Value) {
    match value {
        Value::Object(map) => {
            for (key, child) in map {
                assert!(!key.contains('_'), "snake_case key in response: {}", key);
                assert_camel_case_keys(child);
            }
        }
        Value::Array(items) => items.iter().for_each(assert_camel_case_keys),
        _ => {}
    }
}

#[tokio::test]
async fn test_ownership_is_deterministic_and_camel_case() {
    let body = json!({
        "founders": plan()["founders"],
        "rounds": plan()["rounds"],
        "employees": plan()["employees"],
        "asOf": "2024-06-01"
    });
    let (s1, b1) = post_bytes("/v1/ownership", &body).await;
    let (s2, b2) = post_bytes("/v1/ownership", &body).await;
    assert_eq!(s1, StatusCode::OK);
    assert_eq!(s2, StatusCode::OK);
    assert_eq!(b1, b2);
    assert_camel_case_keys(&serde_json::from_slice(&b1).unwrap());
}

#[tokio::test]
async fn test_waterfall_is_deterministic_and_camel_case() {
    let body = json!({ "plan": plan(), "scenarioId": "exit", "exitDate": "2025-01-01" });
    let (s1, b1) = post_bytes("/v1/waterfall", &body).await;
    let (_, b2) = post_bytes("/v1/waterfall", &body).await;
    assert_eq!(s1, StatusCode::OK);
    assert_eq!(b1, b2);

    let value: Value = serde_json::from_slice(&b1).unwrap();
    assert_camel_case_keys(&value);
    let exit = value["exitValuation"].as_f64().unwrap();
    let distributed = value["totalDistributed"].as_f64().unwrap();
    assert!(distributed <= exit + 1e-6);
}

#[tokio::test]
async fn test_warnings_and_share_codes_are_deterministic() {
    let (_, w1) = post_bytes("/v1/warnings", &plan()).await;
    let (_, w2) = post_bytes("/v1/warnings", &plan()).await;
    assert_eq!(w1, w2);
    assert_camel_case_keys(&serde_json::from_slice(&w1).unwrap());

    let (_, c1) = post_bytes("/v1/share/encode", &plan()).await;
    let (_, c2) = post_bytes("/v1/share/encode", &plan()).await;
    assert_eq!(c1, c2);
}
