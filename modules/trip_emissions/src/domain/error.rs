//! Domain error taxonomy for the trip emissions module.

use thiserror::Error;

/// Domain-level errors. `Display` output is safe to show to a caller;
/// anything provider-specific is normalized into a readable message before
/// it reaches this type.
#[derive(Error, Debug)]
pub enum DomainError {
    /// A request field is missing or malformed.
    #[error("{0}")]
    Validation(String),

    /// The requested transport mode is not in the factor table.
    #[error("Unknown transport mode: {0}")]
    InvalidMode(String),

    /// A place name resolved to zero geocoding results.
    #[error("Could not locate place: {0}")]
    GeocodeNotFound(String),

    /// The routing response carried no usable distance.
    #[error("Route distance unavailable: {0}")]
    RouteUnavailable(String),

    /// The resolved or manual distance exceeds the practical ceiling.
    #[error("Distance {km:.2} km exceeds the practical limit of {max_km:.2} km; check that origin and destination are cities, not states or countries")]
    DistanceOutOfRange { km: f64, max_km: f64 },

    /// No stored calculation under the given id.
    #[error("Calculation not found: {0}")]
    NotFound(String),

    /// The routing provider could not be used: missing credential, auth
    /// rejection, rate limiting, transport failure or timeout.
    #[error("Routing provider unavailable: {0}")]
    Upstream(String),

    /// An internal error occurred.
    #[error("Internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl DomainError {
    /// Creates a `Validation` error.
    #[must_use]
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// Creates an `InvalidMode` error.
    #[must_use]
    pub fn invalid_mode(mode: impl Into<String>) -> Self {
        Self::InvalidMode(mode.into())
    }

    /// Creates a `GeocodeNotFound` error.
    #[must_use]
    pub fn geocode_not_found(place: impl Into<String>) -> Self {
        Self::GeocodeNotFound(place.into())
    }

    /// Creates a `RouteUnavailable` error.
    #[must_use]
    pub fn route_unavailable(message: impl Into<String>) -> Self {
        Self::RouteUnavailable(message.into())
    }

    /// Creates a `NotFound` error.
    #[must_use]
    pub fn not_found(id: impl Into<String>) -> Self {
        Self::NotFound(id.into())
    }

    /// Creates an `Upstream` error.
    #[must_use]
    pub fn upstream(message: impl Into<String>) -> Self {
        Self::Upstream(message.into())
    }

    /// Creates an `Internal` error from a plain message.
    #[must_use]
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(anyhow::anyhow!(message.into()))
    }
}
