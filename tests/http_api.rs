use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use http_body_util::BodyExt;
use serde_json::{Value, json};
use tower::ServiceExt;

use demand_api::app::context::ServiceContext;
use demand_api::features::{LabelEncoder, Scaler};
use demand_api::io::Dataset;
use demand_api::models::ModelArtifact;
use demand_api::predict::PredictionService;
use demand_api::server::router;

const MODEL_JSON: &str = r#"{
    "kind": "linear",
    "feature_names": [
        "Temperature (°C)", "Humidity (%)", "Wind Speed (km/h)", "Rain (mm)",
        "Public Holiday_No", "Public Holiday_Yes",
        "Seasonal Factor_Summer", "Seasonal Factor_Winter",
        "Day of Week_Monday", "Day of Week_Sunday"
    ],
    "intercept": 5000.0,
    "coefficients": [100.0, 10.0, -5.0, -20.0, 0.0, -300.0, 400.0, 250.0, 50.0, -150.0]
}"#;

const SCALER_JSON: &str = r#"{
    "kind": "standard",
    "mean": [20.0, 50.0, 10.0, 2.0],
    "scale": [5.0, 10.0, 5.0, 2.0]
}"#;

/// Every day of January and February 2024, load = 4000 + day-of-year index.
fn dataset_csv() -> String {
    let mut csv = String::from("Date,Time,Historical Demand (MW)\n");
    let mut day = chrono::NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
    let mut i = 0;
    while day < chrono::NaiveDate::from_ymd_opt(2024, 3, 1).unwrap() {
        csv.push_str(&format!("{},00:00,{}\n", day.format("%Y-%m-%d"), 4000 + i));
        day = day.succ_opt().unwrap();
        i += 1;
    }
    csv
}

fn app() -> axum::Router {
    let model = ModelArtifact::from_json_str(MODEL_JSON).unwrap().into_predictor();
    let scaler = Scaler::from_json_str(SCALER_JSON).unwrap();
    let ctx = ServiceContext {
        prediction: PredictionService::new(model, scaler),
        dataset: Dataset::from_reader(dataset_csv().as_bytes()).unwrap(),
        label_encoder: Some(LabelEncoder::from_json_str(r#"{"classes":["Summer","Winter"]}"#).unwrap()),
        dataset_year: 2024,
    };
    router(Arc::new(ctx))
}

async fn send(req: Request<Body>) -> (StatusCode, Value) {
    let resp = app().oneshot(req).await.unwrap();
    let status = resp.status();
    let bytes = resp.into_body().collect().await.unwrap().to_bytes();
    (status, serde_json::from_slice(&bytes).unwrap())
}

async fn get(uri: &str) -> (StatusCode, Value) {
    send(Request::get(uri).body(Body::empty()).unwrap()).await
}

async fn post_predict(body: &str) -> (StatusCode, Value) {
    let req = Request::post("/predict")
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    send(req).await
}

#[tokio::test]
async fn predict_example_record() {
    let body = json!({
        "Temperature (°C)": 25,
        "Humidity (%)": 60,
        "Wind Speed (km/h)": 10,
        "Rain (mm)": 0,
        "Public Holiday": "No",
        "Seasonal Factor": "Summer",
        "Day of Week": "Monday"
    });
    let (status, json) = post_predict(&body.to_string()).await;
    assert_eq!(status, StatusCode::OK);
    // 5000 + 100*1 + 10*1 - 5*0 - 20*(-1) + 400 + 50
    let prediction = json["prediction"].as_f64().unwrap();
    assert!((prediction - 5580.0).abs() < 1e-9, "got {prediction}");
}

#[tokio::test]
async fn predict_errors_still_answer_200() {
    let (status, json) = post_predict("{not json").await;
    assert_eq!(status, StatusCode::OK);
    assert!(json["error"].as_str().unwrap().contains("Malformed JSON"));

    let (status, json) = post_predict(r#"{"Rain (mm)": "heavy"}"#).await;
    assert_eq!(status, StatusCode::OK);
    assert!(json["error"].as_str().unwrap().contains("Rain (mm)"));
}

#[tokio::test]
async fn oversized_predict_body_is_a_json_error() {
    let body = format!(r#"{{"pad": "{}"}}"#, "x".repeat(3 * 1024 * 1024));
    let (status, json) = post_predict(&body).await;
    assert_eq!(status, StatusCode::OK);
    assert!(json["error"].as_str().unwrap().contains("request body"));
}

#[tokio::test]
async fn year_returns_whole_dataset() {
    let (status, json) = get("/api/load-data?filter=year").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json.as_array().unwrap().len(), 60);
    assert_eq!(json[0], json!({"date": "2024-01-01", "load": 4000.0}));

    let (_, default) = get("/api/load-data").await;
    assert_eq!(default, json);
}

#[tokio::test]
async fn repeated_parameter_uses_first_value() {
    let (status, json) = get("/api/load-data?filter=year&filter=month").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json.as_array().unwrap().len(), 60);

    let (status, json) = get("/api/load-data/weekly?month=2024-02&month=bogus").await;
    assert_eq!(status, StatusCode::OK);
    assert!(!json.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn month_filter_uses_prefix() {
    let (status, json) = get("/api/load-data?filter=month&month=02").await;
    assert_eq!(status, StatusCode::OK);
    let rows = json.as_array().unwrap();
    assert_eq!(rows.len(), 29);
    assert!(rows.iter().all(|r| r["date"].as_str().unwrap().starts_with("2024-02")));

    let (_, json) = get("/api/load-data?filter=month&month=2").await;
    assert!(json.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn week_filter_is_inclusive() {
    let (status, json) = get("/api/load-data?filter=week&start_date=2024-01-01").await;
    assert_eq!(status, StatusCode::OK);
    let dates: Vec<&str> = json
        .as_array()
        .unwrap()
        .iter()
        .map(|r| r["date"].as_str().unwrap())
        .collect();
    assert_eq!(
        dates,
        vec!["2024-01-01", "2024-01-02", "2024-01-03", "2024-01-04", "2024-01-05", "2024-01-06", "2024-01-07"]
    );
}

#[tokio::test]
async fn unknown_filter_is_400() {
    let (status, json) = get("/api/load-data?filter=bogus").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json, json!({"error": "Invalid filter type"}));
}

#[tokio::test]
async fn bad_start_date_is_500() {
    let (status, json) = get("/api/load-data?filter=week&start_date=tomorrow").await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(json["error"].as_str().unwrap().contains("Invalid date"));
}

#[tokio::test]
async fn summaries() {
    let (status, json) = get("/api/load-data/monthly").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json[0]["month"], "2024-01");
    assert_eq!(json[0]["avg_load"], 4015.0);
    assert_eq!(json[1]["month"], "2024-02");

    let (status, json) = get("/api/load-data/weekly?month=2024-02").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json.as_array().unwrap().len(), 5);
    assert_eq!(json[4]["week"], "Week 5");

    let (status, _) = get("/api/load-data/weekly?month=Feb").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (_, json) = get("/api/load-data/stats").await;
    assert_eq!(json["n_records"], 60);
    assert_eq!(json["first_date"], "2024-01-01");
    assert_eq!(json["last_date"], "2024-02-29");
}

#[tokio::test]
async fn readiness_reports_resources() {
    let (status, json) = get("/health/ready").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["model"]["kind"], "linear");
    assert_eq!(json["model"]["features"], 10);
    assert_eq!(json["dataset"]["records"], 60);
    assert_eq!(json["label_encoder_classes"], 2);

    let (status, json) = get("/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["status"], "alive");
}
