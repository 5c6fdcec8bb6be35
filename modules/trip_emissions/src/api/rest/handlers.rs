use std::sync::Arc;

use axum::Json;
use axum::extract::{Extension, Path, Query};
use axum::response::{IntoResponse, Response};
use http::{StatusCode, header};

use crate::api::rest::dto::{
    CalcRequest, CalcResponse, DistanceRequest, DistanceResponse, HealthDto, SuggestQuery,
    SuggestResponse,
};
use crate::api::rest::error::{ApiError, ErrorBody, client_message, status_for};
use crate::domain::error::DomainError;
use crate::domain::service::{CalcCommand, EmissionsService};

/// Filename prefix for downloaded receipts.
const RECEIPT_FILE_PREFIX: &str = "ECOTRIP";

#[utoipa::path(
    get,
    path = "/health",
    tag = "Health",
    responses((status = 200, body = HealthDto, description = "Service is up"))
)]
pub async fn health() -> Json<HealthDto> {
    Json(HealthDto { ok: true })
}

#[utoipa::path(
    get,
    path = "/api/suggest",
    tag = "Trips",
    params(("q" = String, Query, description = "Partial place name")),
    responses(
        (status = 200, body = SuggestResponse, description = "Autocomplete suggestions"),
        (status = 502, body = ErrorBody, description = "Geocoder unavailable")
    )
)]
pub async fn suggest(
    Extension(svc): Extension<Arc<EmissionsService>>,
    Query(query): Query<SuggestQuery>,
) -> Result<Json<SuggestResponse>, ApiError> {
    let suggestions = svc.suggest(&query.q).await?;
    Ok(Json(suggestions.into()))
}

#[utoipa::path(
    post,
    path = "/api/distance",
    tag = "Trips",
    request_body = DistanceRequest,
    responses(
        (status = 200, body = DistanceResponse, description = "Routed distance in km"),
        (status = 400, body = ErrorBody, description = "Invalid or unroutable places"),
        (status = 502, body = ErrorBody, description = "Routing provider unavailable")
    )
)]
pub async fn distance(
    Extension(svc): Extension<Arc<EmissionsService>>,
    Json(req): Json<DistanceRequest>,
) -> Result<Json<DistanceResponse>, ApiError> {
    let distance_km = svc
        .route_distance(&req.origin, &req.destination, req.profile.as_deref())
        .await?;
    Ok(Json(DistanceResponse { distance_km }))
}

#[utoipa::path(
    post,
    path = "/api/calc",
    tag = "Trips",
    request_body = CalcRequest,
    responses(
        (status = 200, body = CalcResponse, description = "Stored calculation"),
        (status = 400, body = ErrorBody, description = "Invalid request"),
        (status = 502, body = ErrorBody, description = "Routing provider unavailable")
    )
)]
pub async fn calc(
    Extension(svc): Extension<Arc<EmissionsService>>,
    Json(req): Json<CalcRequest>,
) -> Result<Json<CalcResponse>, ApiError> {
    let record = svc
        .calculate(CalcCommand {
            origin: req.origin,
            destination: req.destination,
            distance_km: req.distance_km,
            mode: req.mode,
        })
        .await?;

    Ok(Json(CalcResponse {
        calc_id: record.id.clone(),
        pdf_url: format!("/api/receipt/{}.pdf", record.id),
        record: record.into(),
    }))
}

#[utoipa::path(
    get,
    path = "/api/receipt/{file}",
    tag = "Trips",
    params(("file" = String, Path, description = "Receipt file name, `<calc_id>.pdf`")),
    responses(
        (status = 200, description = "Receipt document (application/pdf)"),
        (status = 404, description = "Unknown calculation id")
    )
)]
pub async fn receipt(
    Extension(svc): Extension<Arc<EmissionsService>>,
    Path(file): Path<String>,
) -> Response {
    // The route carries the `.pdf` suffix inside the parameter segment.
    let Some(id) = file.strip_suffix(".pdf") else {
        return not_found_text();
    };

    match svc.render_receipt(id) {
        Ok(bytes) => (
            [
                (header::CONTENT_TYPE, mime::APPLICATION_PDF.to_string()),
                (
                    header::CONTENT_DISPOSITION,
                    format!("inline; filename=\"{RECEIPT_FILE_PREFIX}_{id}.pdf\""),
                ),
            ],
            bytes,
        )
            .into_response(),
        Err(DomainError::NotFound(_)) => not_found_text(),
        Err(e) => {
            let status = status_for(&e);
            tracing::error!(status = %status, error = %e, "receipt rendering failed");
            (status, client_message(&e)).into_response()
        }
    }
}

fn not_found_text() -> Response {
    (StatusCode::NOT_FOUND, "Receipt not found.").into_response()
}
