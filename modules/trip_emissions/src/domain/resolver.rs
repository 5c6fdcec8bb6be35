//! Route resolution abstraction over an external geocoding/routing provider.

use async_trait::async_trait;

use crate::domain::error::DomainError;
use crate::domain::model::{Coordinates, PlaceSuggestion};

/// Converts place names into coordinates and travel distances.
///
/// Implementations talk to an external provider and normalize its error
/// payloads into the domain taxonomy; provider-specific shapes never leak
/// to callers.
#[async_trait]
pub trait RouteResolver: Send + Sync {
    /// Label stored in records created from this resolver's distances.
    fn provider_name(&self) -> &'static str;

    /// Autocomplete suggestions for a partial place name.
    ///
    /// # Errors
    ///
    /// Returns `Upstream` when the provider cannot be used.
    async fn suggest(
        &self,
        text: &str,
        limit: usize,
    ) -> Result<Vec<PlaceSuggestion>, DomainError>;

    /// Resolves a place name to a single coordinate pair.
    ///
    /// # Errors
    ///
    /// Returns `GeocodeNotFound` when the name resolves to zero results and
    /// `Upstream` when the provider cannot be used.
    async fn geocode(&self, place: &str) -> Result<Coordinates, DomainError>;

    /// Distance in kilometers of a route between two coordinates.
    ///
    /// # Errors
    ///
    /// Returns `RouteUnavailable` when the response carries no usable
    /// distance and `Upstream` when the provider cannot be used.
    async fn route_distance_km(
        &self,
        origin: Coordinates,
        destination: Coordinates,
        profile: &str,
    ) -> Result<f64, DomainError>;
}
