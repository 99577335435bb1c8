use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use tower::util::ServiceExt;

use omnibus_api::{app, state::AuthConfig, AppState};
use omnibus_roster::LogNotifier;
use omnibus_store::DbClient;

const SECRET: &str = "test-secret";

async fn test_app() -> Router {
    let db = DbClient::new("sqlite::memory:").await.unwrap();
    db.migrate().await.unwrap();
    omnibus_api::auth::ensure_bootstrap_admin(&db, "admin", "driver-pass")
        .await
        .unwrap();

    let state = AppState::new(
        db,
        Arc::new(LogNotifier),
        AuthConfig {
            secret: SECRET.into(),
            expiration: 3600,
        },
    );
    app(state)
}

async fn call(
    app: &Router,
    method: &str,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header("authorization", format!("Bearer {token}"));
    }
    let request = match body {
        Some(body) => builder
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
}

async fn login(app: &Router) -> String {
    let (status, body) = call(
        app,
        "POST",
        "/v1/auth/login",
        None,
        Some(json!({ "username": "admin", "password": "driver-pass" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    body["token"].as_str().unwrap().to_string()
}

#[tokio::test]
async fn test_authentication_boundary() {
    let app = test_app().await;

    // Wrong password
    let (status, _) = call(
        &app,
        "POST",
        "/v1/auth/login",
        None,
        Some(json!({ "username": "admin", "password": "nope" })),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    // Protected route without and with a garbage token
    let (status, _) = call(&app, "GET", "/v1/trips", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    let (status, _) = call(&app, "GET", "/v1/trips", Some("not-a-jwt"), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    // Valid signature but the wrong role
    let guest = jsonwebtoken::encode(
        &jsonwebtoken::Header::default(),
        &json!({ "sub": "guest", "role": "GUEST", "exp": 4102444800u64 }),
        &jsonwebtoken::EncodingKey::from_secret(SECRET.as_bytes()),
    )
    .unwrap();
    let (status, _) = call(&app, "GET", "/v1/trips", Some(&guest), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    // And the real token works.
    let token = login(&app).await;
    let (status, body) = call(&app, "GET", "/v1/trips", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!([]));
}

#[tokio::test]
async fn test_trip_payment_dashboard_flow() {
    let app = test_app().await;
    let token = login(&app).await;
    let token = Some(token.as_str());

    // Adding a rider before any trip is active reports the precondition.
    let (status, body) = call(
        &app,
        "POST",
        "/v1/riders",
        token,
        Some(json!({ "rider": { "name": "Rider A" }, "seats": 2 })),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert!(body["hint"].as_str().unwrap().contains("activate"));

    // Create and activate the trip from the worked scenario.
    let (status, trip) = call(
        &app,
        "POST",
        "/v1/trips",
        token,
        Some(json!({
            "name": "lake charter",
            "start_date": "2026-06-01",
            "end_date": "2026-06-03",
            "cost_of_rental": 100_000,
            "cost_per_seat": 10_000,
            "total_seats": 10,
        })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let trip_id = trip["id"].as_i64().unwrap();

    let (status, trip) = call(
        &app,
        "POST",
        &format!("/v1/trips/{trip_id}/activate"),
        token,
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(trip["is_active"], json!(true));

    // Rider A takes two seats.
    let (status, created) = call(
        &app,
        "POST",
        "/v1/riders",
        token,
        Some(json!({ "rider": { "name": "Rider A" }, "seats": 2 })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(created["reservation"]["balance"], json!(20_000));
    let rider_id = created["rider"]["id"].as_i64().unwrap();

    // A payment of 150.00 lands on the active trip.
    let (status, payment) = call(
        &app,
        "POST",
        "/v1/payments",
        token,
        Some(json!({ "rider_id": rider_id, "paid_on": "2026-05-20", "amount": 15_000 })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(payment["trip_id"].as_i64().unwrap(), trip_id);

    // The dashboard reflects it immediately.
    let (status, view) = call(&app, "GET", "/v1/dashboard", token, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(view["riders"][0]["collected"], json!(15_000));
    assert_eq!(view["riders"][0]["remaining_balance"], json!(5_000));
    assert_eq!(view["totals"]["total_collected"], json!(15_000));
    assert_eq!(view["totals"]["remaining_funds"], json!(85_000));
    assert_eq!(view["totals"]["reserved_seats"], json!(2));
    assert_eq!(view["totals"]["remaining_seats"], json!(8));

    // Simple delete is guarded while payments exist; the cascade works.
    let (status, _) = call(
        &app,
        "DELETE",
        &format!("/v1/riders/{rider_id}"),
        token,
        None,
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (status, _) = call(
        &app,
        "DELETE",
        &format!("/v1/riders/{rider_id}/cascade"),
        token,
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, _) = call(&app, "GET", &format!("/v1/riders/{rider_id}"), token, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_batch_add_and_validation_errors() {
    let app = test_app().await;
    let token = login(&app).await;
    let token = Some(token.as_str());

    // Unparseable dates are rejected up front.
    let (status, body) = call(
        &app,
        "POST",
        "/v1/trips",
        token,
        Some(json!({
            "name": "bad dates",
            "start_date": "June 1st",
            "end_date": "2026-06-03",
            "cost_of_rental": 0,
            "cost_per_seat": 0,
            "total_seats": 1,
        })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("start_date"));

    let (_, trip) = call(
        &app,
        "POST",
        "/v1/trips",
        token,
        Some(json!({
            "name": "charter",
            "start_date": "2026-06-01",
            "end_date": "2026-06-03",
            "cost_of_rental": 50_000,
            "cost_per_seat": 5_000,
            "total_seats": 20,
        })),
    )
    .await;
    let trip_id = trip["id"].as_i64().unwrap();
    call(
        &app,
        "POST",
        &format!("/v1/trips/{trip_id}/activate"),
        token,
        None,
    )
    .await;

    let (_, created) = call(
        &app,
        "POST",
        "/v1/riders",
        token,
        Some(json!({ "rider": { "name": "Lin" }, "seats": 1 })),
    )
    .await;
    let rider_id = created["rider"]["id"].as_i64().unwrap();

    // Batch add: the duplicate and the unknown rider are reported, the
    // batch itself succeeds.
    let (status, report) = call(
        &app,
        "POST",
        &format!("/v1/trips/{trip_id}/riders"),
        token,
        Some(json!([
            { "rider_id": rider_id, "seats": 2 },
            { "rider_id": 9999, "seats": 1 },
        ])),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(report["added"].as_array().unwrap().len(), 0);
    assert_eq!(report["skipped"].as_array().unwrap().len(), 2);
}
