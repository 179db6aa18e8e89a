use axum::http::StatusCode;
use capsim::api::{self, AppState};
use capsim::Config;
use serde_json::{json, Value};
use tower::util::ServiceExt;

fn test_app() -> axum::Router {
    api::create_router(AppState::new(Config::default()))
}

async fn post_json(app: axum::Router, uri: &str, body: Value) -> (StatusCode, Value) {
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
    let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, value)
}

fn sample_plan() -> Value {
    json!({
        "company": {
            "name": "Acme",
            "foundedDate": "2020-01-01",
            "currentDate": "2024-01-01"
        },
        "founders": [
            {
                "id": "ada",
                "name": "Ada",
                "equity": 100,
                "vestingStart": "2020-01-01",
                "cliffMonths": 12,
                "vestingMonths": 48
            }
        ],
        "rounds": [
            {
                "id": "seed",
                "date": "2021-01-01",
                "roundType": "seed",
                "preMoneyValuation": 8000000,
                "investment": 2000000,
                "leadInvestors": ["Fund"],
                "liquidationPreference": 1,
                "participating": false
            }
        ],
        "scenarios": [
            { "id": "base", "name": "Base", "exitValuation": 5000000 }
        ]
    })
}

#[tokio::test]
async fn test_health_and_ready() {
    let req = axum::http::Request::builder()
        .uri("/health")
        .body(axum::body::Body::empty())
        .unwrap();
    let res = test_app().oneshot(req).await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);

    let req = axum::http::Request::builder()
        .uri("/ready")
        .body(axum::body::Body::empty())
        .unwrap();
    let res = test_app().oneshot(req).await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_dilution_endpoint_uses_camel_case() {
    let (status, body) = post_json(
        test_app(),
        "/v1/dilution",
        json!({ "preMoney": 8000000, "investment": 2000000, "sharesBefore": 10000000 }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["newShares"], 2_500_000);
    assert_eq!(body["totalSharesAfter"], 12_500_000);
    assert_eq!(body["dilutionPercentage"].as_f64(), Some(20.0));
    assert_eq!(body["pricePerShare"].as_f64(), Some(0.8));
}

#[tokio::test]
async fn test_vesting_endpoint_defaults_schedule() {
    let (status, body) = post_json(
        test_app(),
        "/v1/vesting",
        json!({ "grantDate": "2022-01-01", "asOf": "2022-07-01", "totalShares": 1000000 }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["vestedShares"], 0);
    assert_eq!(body["cliffRemaining"], 6);
    assert_eq!(body["schedule"][0]["kind"], "cliff");
}

#[tokio::test]
async fn test_ownership_endpoint() {
    let plan = sample_plan();
    let (status, body) = post_json(
        test_app(),
        "/v1/ownership",
        json!({
            "founders": plan["founders"],
            "rounds": plan["rounds"],
            "asOf": "2024-01-01"
        }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["capTable"]["totalShares"], 12_500_000);
    let investor = &body["capTable"]["stakeholders"][1];
    assert_eq!(investor["type"], "investor");
    assert_eq!(investor["roundId"], "seed");
    assert_eq!(body["summary"]["totalRounds"], 1);
    assert_eq!(body["timeline"].as_array().map(|t| t.len()), Some(1));
}

#[tokio::test]
async fn test_waterfall_endpoint_by_scenario() {
    let (status, body) = post_json(
        test_app(),
        "/v1/waterfall",
        json!({ "plan": sample_plan(), "scenarioId": "base", "exitDate": "2024-01-01" }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["exitValuation"].as_f64(), Some(5_000_000.0));
    assert_eq!(body["totalDistributed"].as_f64(), Some(5_000_000.0));
    assert_eq!(body["breakevenValuation"].as_f64(), Some(2_000_000.0));
    assert_eq!(body["distribution"][0]["stage"], "liquidation-preference");
    assert_eq!(body["returns"][0]["stakeholder"], "Fund");
    assert_eq!(body["returns"][0]["moic"].as_f64(), Some(1.0));
}

#[tokio::test]
async fn test_waterfall_endpoint_errors() {
    let (status, body) = post_json(
        test_app(),
        "/v1/waterfall",
        json!({ "plan": sample_plan(), "scenarioId": "missing" }),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(body["error"].as_str().unwrap().contains("missing"));

    let body = json!({ "plan": sample_plan() });
    let (status, _) = post_json(test_app(), "/v1/waterfall", body).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_warnings_endpoint() {
    let mut plan = sample_plan();
    plan["rounds"][0]["liquidationPreference"] = json!(3);
    let (status, body) = post_json(test_app(), "/v1/warnings", plan).await;
    assert_eq!(status, StatusCode::OK);
    let warnings = body["warnings"].as_array().unwrap();
    assert!(warnings
        .iter()
        .any(|w| w["source"] == "round-0" && w["severity"] == "high"));
}

#[tokio::test]
async fn test_share_encode_then_decode() {
    let (status, encoded) = post_json(test_app(), "/v1/share/encode", sample_plan()).await;
    assert_eq!(status, StatusCode::OK);
    let code = encoded["code"].as_str().unwrap().to_string();

    let (status, decoded) =
        post_json(test_app(), "/v1/share/decode", json!({ "code": code })).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(decoded["plan"]["company"]["name"], "Acme");
    assert_eq!(decoded["fingerprint"].as_str().map(|f| f.len()), Some(64));
}

#[tokio::test]
async fn test_share_decode_rejects_bad_codes() {
    let (status, body) =
        post_json(test_app(), "/v1/share/decode", json!({ "code": "not hex" })).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].is_string());

    let config = Config {
        max_share_code_len: 4,
        ..Config::default()
    };
    let app = api::create_router(AppState::new(config));
    let (status, _) = post_json(app, "/v1/share/decode", json!({ "code": "0011223344" })).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_malformed_json_is_rejected() {
    let req = axum::http::Request::builder()
        .method("POST")
        .uri("/v1/dilution")
        .header("content-type", "application/json")
        .body(axum::body::Body::from("{not json"))
        .unwrap();
    let res = test_app().oneshot(req).await.unwrap();
    assert!(res.status().is_client_error());
}

#[tokio::test]
async fn test_dilution_endpoint_saturates_huge_rounds() {
    let (status, body) = post_json(
        test_app(),
        "/v1/dilution",
        json!({ "preMoney": 1, "investment": 100000000000000i64, "sharesBefore": 10000000 }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["newShares"], i64::MAX);
    assert_eq!(body["totalSharesAfter"], i64::MAX);
}

#[tokio::test]
async fn test_vesting_endpoint_rejects_unbounded_schedule() {
    let (status, body) = post_json(
        test_app(),
        "/v1/vesting",
        json!({
            "grantDate": "2022-01-01",
            "asOf": "2022-07-01",
            "totalShares": 1000,
            "vestingMonths": u32::MAX
        }),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("vestingMonths"));
}

#[tokio::test]
async fn test_round_limit_applies_to_plan_endpoints() {
    let config = Config {
        max_rounds: 1,
        ..Config::default()
    };
    let app = api::create_router(AppState::new(config));

    let mut plan = sample_plan();
    let mut second = plan["rounds"][0].clone();
    second["id"] = json!("series-a");
    second["date"] = json!("2022-06-01");
    plan["rounds"].as_array_mut().unwrap().push(second);

    let (status, body) = post_json(
        app.clone(),
        "/v1/waterfall",
        json!({ "plan": plan.clone(), "exitValuation": 1000000 }),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("limit of 1"));

    let (status, _) = post_json(app.clone(), "/v1/warnings", plan.clone()).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = post_json(
        app.clone(),
        "/v1/ownership",
        json!({ "rounds": plan["rounds"], "asOf": "2024-01-01" }),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = post_json(app, "/v1/warnings", sample_plan()).await;
    assert_eq!(status, StatusCode::OK);
}
