#![allow(clippy::unwrap_used, clippy::expect_used)]

//! End-to-end tests of the HTTP surface against a stubbed resolver.

mod common;

use std::sync::atomic::Ordering;

use axum::http::StatusCode;

use common::{StubResolver, body_bytes, body_json, create_router, create_service, get, post_json};

#[tokio::test]
async fn health_returns_ok() {
    let router = create_router(create_service(StubResolver::with_distance(100.0)));

    let response = get(&router, "/health").await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["ok"], true);
}

#[tokio::test]
async fn manual_calc_creates_record_and_serves_receipt() {
    let router = create_router(create_service(StubResolver::with_distance(100.0)));

    let response = post_json(
        &router,
        "/api/calc",
        r#"{"mode":"bus","distance_km":500.0}"#,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    let calc_id = json["calc_id"].as_str().unwrap();
    assert!(calc_id.starts_with("ET-"));
    assert_eq!(json["pdf_url"], format!("/api/receipt/{calc_id}.pdf"));

    let record = &json["record"];
    assert_eq!(record["provider"], "manual");
    assert_eq!(record["inputs"]["origin"], serde_json::Value::Null);
    assert_eq!(record["inputs"]["distance_km"], 500.0);
    assert_eq!(record["inputs"]["mode_label"], "Bus");
    assert_eq!(record["results"]["emission_kg"], 44.5);
    assert_eq!(record["results"]["car_emission_kg"], 60.0);
    assert_eq!(record["results"]["delta_vs_car_kg"], -15.5);
    assert_eq!(record["results"]["vs_car_pct"], 74.17);
    assert_eq!(record["results"]["credits_needed"], 0.0445);
    assert_eq!(record["results"]["cost_base_brl"], 2.0);
    assert_eq!(record["factors"]["kg_per_km"]["bus"], 0.089);
    assert_eq!(record["factors_version"], "2025.12.26");

    // The receipt must be derivable from the stored record alone.
    let response = get(&router, &format!("/api/receipt/{calc_id}.pdf")).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers()["content-type"].to_str().unwrap(),
        "application/pdf"
    );
    let disposition = response.headers()["content-disposition"].to_str().unwrap().to_owned();
    assert_eq!(
        disposition,
        format!("inline; filename=\"ECOTRIP_{calc_id}.pdf\"")
    );
    let bytes = body_bytes(response).await;
    assert!(bytes.starts_with(b"%PDF"));
}

#[tokio::test]
async fn routed_calc_resolves_both_endpoints_first() {
    let resolver = StubResolver::with_distance(300.25);
    let router = create_router(create_service(resolver.clone()));

    let response = post_json(
        &router,
        "/api/calc",
        r#"{"origin":"Curitiba","destination":"Florianopolis","mode":"car"}"#,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["record"]["provider"], "stub");
    assert_eq!(json["record"]["inputs"]["origin"], "Curitiba");
    assert_eq!(json["record"]["inputs"]["distance_km"], 300.25);
    assert_eq!(resolver.geocode_calls.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn legacy_transport_alias_is_accepted() {
    let router = create_router(create_service(StubResolver::with_distance(100.0)));

    let response = post_json(
        &router,
        "/api/calc",
        r#"{"transport":"bike","distance_km":12.0}"#,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["record"]["inputs"]["mode"], "bike");
    assert_eq!(json["record"]["results"]["emission_kg"], 0.0);
}

#[tokio::test]
async fn unknown_mode_is_rejected_before_any_lookup() {
    let resolver = StubResolver::with_distance(100.0);
    let router = create_router(create_service(resolver.clone()));

    let response = post_json(
        &router,
        "/api/calc",
        r#"{"origin":"Curitiba","destination":"Florianopolis","mode":"rocket"}"#,
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let json = body_json(response).await;
    assert_eq!(json["error"], "Unknown transport mode: rocket");
    assert_eq!(resolver.geocode_calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn routed_calc_requires_both_places() {
    let router = create_router(create_service(StubResolver::with_distance(100.0)));

    let response = post_json(&router, "/api/calc", r#"{"origin":"Curitiba","mode":"car"}"#).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let json = body_json(response).await;
    assert_eq!(json["error"], "Both origin and destination are required.");
}

#[tokio::test]
async fn manual_distance_zero_is_rejected() {
    let router = create_router(create_service(StubResolver::with_distance(100.0)));

    let response = post_json(&router, "/api/calc", r#"{"mode":"bus","distance_km":0.0}"#).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let json = body_json(response).await;
    assert_eq!(json["error"], "distance_km must be greater than zero.");
}

#[tokio::test]
async fn distance_ceiling_is_inclusive() {
    let router = create_router(create_service(StubResolver::with_distance(100.0)));

    let response = post_json(
        &router,
        "/api/calc",
        r#"{"mode":"car","distance_km":6000.00}"#,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let response = post_json(
        &router,
        "/api/calc",
        r#"{"mode":"car","distance_km":6000.01}"#,
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let json = body_json(response).await;
    assert!(json["error"].as_str().unwrap().contains("6000.01 km"));
}

#[tokio::test]
async fn routed_distance_above_ceiling_is_rejected() {
    let router = create_router(create_service(StubResolver::with_distance(6400.0)));

    let response = post_json(
        &router,
        "/api/distance",
        r#"{"origin":"Lisbon","destination":"Moscow"}"#,
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn distance_endpoint_rounds_to_two_decimals() {
    let router = create_router(create_service(StubResolver::with_distance(123.456)));

    let response = post_json(
        &router,
        "/api/distance",
        r#"{"origin":"Curitiba","destination":"Florianopolis"}"#,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["distance_km"], 123.46);
}

#[tokio::test]
async fn short_suggest_query_returns_empty_without_lookup() {
    let resolver = StubResolver::with_distance(100.0);
    let router = create_router(create_service(resolver.clone()));

    let response = get(&router, "/api/suggest?q=cu").await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["suggestions"].as_array().unwrap().len(), 0);
    assert_eq!(resolver.suggest_calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn suggest_forwards_longer_queries() {
    let resolver = StubResolver::with_distance(100.0);
    let router = create_router(create_service(resolver.clone()));

    let response = get(&router, "/api/suggest?q=curitiba").await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    let suggestions = json["suggestions"].as_array().unwrap();
    assert_eq!(suggestions.len(), 1);
    assert_eq!(suggestions[0]["label"], "Curitiba, PR, Brazil");
    assert_eq!(resolver.suggest_calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn unknown_receipt_id_is_plain_text_404() {
    let router = create_router(create_service(StubResolver::with_distance(100.0)));

    let response = get(&router, "/api/receipt/UNKNOWN123.pdf").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let bytes = body_bytes(response).await;
    assert_eq!(String::from_utf8(bytes).unwrap(), "Receipt not found.");
}

#[tokio::test]
async fn receipt_without_pdf_suffix_is_404() {
    let router = create_router(create_service(StubResolver::with_distance(100.0)));

    let response = get(&router, "/api/receipt/ET-ABCDEF123456").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn rendering_the_same_receipt_twice_is_stable() {
    let router = create_router(create_service(StubResolver::with_distance(100.0)));

    let response = post_json(
        &router,
        "/api/calc",
        r#"{"mode":"truck","distance_km":850.5}"#,
    )
    .await;
    let json = body_json(response).await;
    let pdf_url = json["pdf_url"].as_str().unwrap().to_owned();

    let first = body_bytes(get(&router, &pdf_url).await).await;
    let second = body_bytes(get(&router, &pdf_url).await).await;
    let first_text = pdf_extract::extract_text_from_mem(&first).unwrap();
    let second_text = pdf_extract::extract_text_from_mem(&second).unwrap();
    assert_eq!(first_text, second_text);
    assert!(first_text.contains("850.50 km"));
}

#[tokio::test]
async fn openapi_document_is_served() {
    let router = create_router(create_service(StubResolver::with_distance(100.0)));

    let response = get(&router, "/api/openapi.json").await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert!(json["paths"]["/api/calc"].is_object());
    assert!(json["paths"]["/api/receipt/{file}"].is_object());
}
