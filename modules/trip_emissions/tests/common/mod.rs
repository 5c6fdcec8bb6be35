#![allow(clippy::unwrap_used, clippy::expect_used)]

//! Common test utilities for trip_emissions integration tests

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use axum::Router;
use axum::body::Body;
use axum::http::{Request, Response};
use tower::ServiceExt as _;

use trip_emissions::api::rest::routes::register_routes;
use trip_emissions::domain::{
    Coordinates, DomainError, EmissionsService, PlaceSuggestion, RouteResolver, ServiceLimits,
};
use trip_emissions::domain::factors::EmissionFactors;
use trip_emissions::infra::{InMemoryCalcRepository, PdfReceiptRenderer};

/// Resolver double: fixed coordinates, a configurable route distance and
/// call counters, so tests can assert which paths touch the network.
pub struct StubResolver {
    pub distance_km: f64,
    pub suggestions: Vec<PlaceSuggestion>,
    pub geocode_calls: AtomicUsize,
    pub suggest_calls: AtomicUsize,
}

impl StubResolver {
    pub fn with_distance(distance_km: f64) -> Arc<Self> {
        Arc::new(Self {
            distance_km,
            suggestions: vec![PlaceSuggestion {
                label: "Curitiba, PR, Brazil".to_owned(),
                lon: -49.27,
                lat: -25.43,
            }],
            geocode_calls: AtomicUsize::new(0),
            suggest_calls: AtomicUsize::new(0),
        })
    }
}

#[async_trait]
impl RouteResolver for StubResolver {
    fn provider_name(&self) -> &'static str {
        "stub"
    }

    async fn suggest(
        &self,
        _text: &str,
        limit: usize,
    ) -> Result<Vec<PlaceSuggestion>, DomainError> {
        self.suggest_calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.suggestions.iter().take(limit).cloned().collect())
    }

    async fn geocode(&self, _place: &str) -> Result<Coordinates, DomainError> {
        self.geocode_calls.fetch_add(1, Ordering::SeqCst);
        Ok(Coordinates {
            lon: -49.27,
            lat: -25.43,
        })
    }

    async fn route_distance_km(
        &self,
        _origin: Coordinates,
        _destination: Coordinates,
        _profile: &str,
    ) -> Result<f64, DomainError> {
        Ok(self.distance_km)
    }
}

pub fn create_service(resolver: Arc<StubResolver>) -> Arc<EmissionsService> {
    Arc::new(EmissionsService::new(
        resolver,
        Arc::new(InMemoryCalcRepository::new()),
        Arc::new(PdfReceiptRenderer),
        EmissionFactors::default(),
        ServiceLimits::default(),
    ))
}

pub fn create_router(service: Arc<EmissionsService>) -> Router {
    register_routes(Router::new(), service)
}

pub async fn get(router: &Router, uri: &str) -> Response<Body> {
    let request = Request::builder()
        .method("GET")
        .uri(uri)
        .body(Body::empty())
        .unwrap();
    router.clone().oneshot(request).await.unwrap()
}

pub async fn post_json(router: &Router, uri: &str, body: &str) -> Response<Body> {
    let request = Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_owned()))
        .unwrap();
    router.clone().oneshot(request).await.unwrap()
}

pub async fn body_bytes(response: Response<Body>) -> Vec<u8> {
    axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap()
        .to_vec()
}

pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    serde_json::from_slice(&body_bytes(response).await).unwrap()
}
