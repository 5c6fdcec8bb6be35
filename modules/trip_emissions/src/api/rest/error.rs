//! REST error mapping for the trip emissions module.

use axum::Json;
use axum::response::{IntoResponse, Response};
use http::StatusCode;
use serde::Serialize;
use utoipa::ToSchema;

use crate::domain::error::DomainError;

/// Wire shape of every error response.
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorBody {
    pub error: String,
}

/// Wrapper that turns a domain error into an HTTP response at the boundary.
#[derive(Debug)]
pub struct ApiError(pub DomainError);

impl From<DomainError> for ApiError {
    fn from(e: DomainError) -> Self {
        Self(e)
    }
}

/// Status mapping for the domain taxonomy. User-correctable failures are
/// 400-class; provider trouble is a gateway problem, not the caller's.
#[must_use]
pub fn status_for(e: &DomainError) -> StatusCode {
    match e {
        DomainError::Validation(_)
        | DomainError::InvalidMode(_)
        | DomainError::GeocodeNotFound(_)
        | DomainError::RouteUnavailable(_)
        | DomainError::DistanceOutOfRange { .. } => StatusCode::BAD_REQUEST,
        DomainError::NotFound(_) => StatusCode::NOT_FOUND,
        DomainError::Upstream(_) => StatusCode::BAD_GATEWAY,
        DomainError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

/// Caller-visible message. Internal failures get a fixed text; everything
/// else in the taxonomy is already safe to show.
#[must_use]
pub fn client_message(e: &DomainError) -> String {
    match e {
        DomainError::Internal(inner) => {
            tracing::error!(error = ?inner, "internal error in trip_emissions");
            "An internal error occurred.".to_owned()
        }
        other => other.to_string(),
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = status_for(&self.0);
        if status.is_server_error() {
            tracing::error!(status = %status, error = %self.0, "request failed");
        } else {
            tracing::debug!(status = %status, error = %self.0, "request rejected");
        }
        let body = ErrorBody {
            error: client_message(&self.0),
        };
        (status, Json(body)).into_response()
    }
}
