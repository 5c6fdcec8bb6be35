use std::sync::Arc;

use axum::routing::{get, post};
use axum::{Extension, Json, Router};
use utoipa::OpenApi;

use crate::api::rest::handlers;
use crate::domain::service::EmissionsService;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "EcoTrip API",
        description = "Trip CO2 calculation, carbon credit pricing and receipts"
    ),
    paths(
        handlers::health,
        handlers::suggest,
        handlers::distance,
        handlers::calc,
        handlers::receipt,
    ),
    components(schemas(
        crate::api::rest::dto::HealthDto,
        crate::api::rest::dto::SuggestionDto,
        crate::api::rest::dto::SuggestResponse,
        crate::api::rest::dto::DistanceRequest,
        crate::api::rest::dto::DistanceResponse,
        crate::api::rest::dto::CalcRequest,
        crate::api::rest::dto::CalcResponse,
        crate::api::rest::dto::CalcInputsDto,
        crate::api::rest::dto::CalcResultsDto,
        crate::api::rest::dto::CreditPriceDto,
        crate::api::rest::dto::FactorsSnapshotDto,
        crate::api::rest::dto::CalculationRecordDto,
        crate::api::rest::error::ErrorBody,
    ))
)]
struct ApiDoc;

/// Mounts the module's routes and attaches the shared service.
///
/// Method/path pairs are part of the deployed contract and must not drift.
pub fn register_routes(router: Router, service: Arc<EmissionsService>) -> Router {
    router
        .route("/health", get(handlers::health))
        .route("/api/suggest", get(handlers::suggest))
        .route("/api/distance", post(handlers::distance))
        .route("/api/calc", post(handlers::calc))
        .route("/api/receipt/{file}", get(handlers::receipt))
        .route(
            "/api/openapi.json",
            get(|| async { Json(ApiDoc::openapi()) }),
        )
        .layer(Extension(service))
}
