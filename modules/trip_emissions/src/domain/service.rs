//! Orchestration of resolution, calculation, storage and rendering.

use std::sync::Arc;

use tracing::{debug, info, instrument};

use crate::domain::emission::{self, round2};
use crate::domain::error::DomainError;
use crate::domain::factors::EmissionFactors;
use crate::domain::model::{
    CalcInputs, CalculationRecord, NewCalculation, PlaceSuggestion,
};
use crate::domain::renderer::ReceiptRenderer;
use crate::domain::repo::CalcRepository;
use crate::domain::resolver::RouteResolver;

/// Provider label recorded for manually supplied distances.
const MANUAL_PROVIDER: &str = "manual";

/// Queries shorter than this return no suggestions instead of hitting the
/// geocoder.
const MIN_SUGGEST_QUERY_LEN: usize = 3;

/// Operational limits for the service.
#[derive(Debug, Clone)]
pub struct ServiceLimits {
    /// Sanity ceiling for routed and manual distances, in km. Guards against
    /// country-level geocoding mistakes, not a hard domain limit.
    pub max_route_km: f64,
    /// Maximum number of autocomplete suggestions returned.
    pub suggest_limit: usize,
    /// Routing profile used when a request does not name one.
    pub default_profile: String,
}

impl Default for ServiceLimits {
    fn default() -> Self {
        Self {
            max_route_km: 6000.0,
            suggest_limit: 6,
            default_profile: "driving-car".to_owned(),
        }
    }
}

/// A calculation request after DTO decoding.
#[derive(Debug, Clone)]
pub struct CalcCommand {
    pub origin: Option<String>,
    pub destination: Option<String>,
    pub distance_km: Option<f64>,
    pub mode: String,
}

/// The trip emissions service.
pub struct EmissionsService {
    resolver: Arc<dyn RouteResolver>,
    repo: Arc<dyn CalcRepository>,
    renderer: Arc<dyn ReceiptRenderer>,
    factors: EmissionFactors,
    limits: ServiceLimits,
}

impl EmissionsService {
    #[must_use]
    pub fn new(
        resolver: Arc<dyn RouteResolver>,
        repo: Arc<dyn CalcRepository>,
        renderer: Arc<dyn ReceiptRenderer>,
        factors: EmissionFactors,
        limits: ServiceLimits,
    ) -> Self {
        Self {
            resolver,
            repo,
            renderer,
            factors,
            limits,
        }
    }

    /// Autocomplete suggestions for a partial place name.
    ///
    /// Queries shorter than three characters short-circuit to an empty list
    /// without touching the resolver.
    ///
    /// # Errors
    ///
    /// Propagates resolver errors for queries that do reach the provider.
    #[instrument(skip(self))]
    pub async fn suggest(&self, query: &str) -> Result<Vec<PlaceSuggestion>, DomainError> {
        let query = query.trim();
        if query.chars().count() < MIN_SUGGEST_QUERY_LEN {
            debug!("suggest query below minimum length, returning empty list");
            return Ok(Vec::new());
        }
        self.resolver.suggest(query, self.limits.suggest_limit).await
    }

    /// Resolves a routed distance between two place names, in km rounded to
    /// two decimals.
    ///
    /// The two geocode lookups run concurrently; the route request waits for
    /// both.
    ///
    /// # Errors
    ///
    /// `Validation` for missing fields or a malformed profile,
    /// `GeocodeNotFound`/`RouteUnavailable`/`Upstream` from the resolver,
    /// `DistanceOutOfRange` above the ceiling.
    #[instrument(skip(self))]
    pub async fn route_distance(
        &self,
        origin: &str,
        destination: &str,
        profile: Option<&str>,
    ) -> Result<f64, DomainError> {
        let origin = origin.trim();
        let destination = destination.trim();
        if origin.is_empty() || destination.is_empty() {
            return Err(DomainError::validation(
                "Both origin and destination are required.",
            ));
        }

        let profile = profile
            .map(str::trim)
            .filter(|p| !p.is_empty())
            .unwrap_or(&self.limits.default_profile);
        validate_profile(profile)?;

        let (from, to) = tokio::try_join!(
            self.resolver.geocode(origin),
            self.resolver.geocode(destination)
        )?;

        let km = self
            .resolver
            .route_distance_km(from, to, profile)
            .await?;
        let km = round2(km);
        self.check_ceiling(km)?;
        debug!(%origin, %destination, km, "route resolved");
        Ok(km)
    }

    /// Runs a full calculation and persists the record.
    ///
    /// The transport mode is validated before any network call. A manual
    /// distance skips resolution entirely but flows through the same
    /// persistence pipeline, so a receipt is always obtainable.
    ///
    /// # Errors
    ///
    /// `InvalidMode` for unknown modes, `Validation` for missing or
    /// non-positive inputs, plus everything `route_distance` can return.
    #[instrument(skip(self), fields(mode = %cmd.mode))]
    pub async fn calculate(&self, cmd: CalcCommand) -> Result<CalculationRecord, DomainError> {
        let mode = cmd.mode.trim().to_owned();
        if !self.factors.contains_mode(&mode) {
            return Err(DomainError::invalid_mode(mode));
        }

        let origin = cmd.origin.as_deref().map(str::trim).filter(|s| !s.is_empty());
        let destination = cmd
            .destination
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty());

        let (provider, distance_km) = match cmd.distance_km {
            Some(raw) => {
                if !raw.is_finite() {
                    return Err(DomainError::validation(
                        "distance_km must be a finite number.",
                    ));
                }
                let km = round2(raw);
                if km <= 0.0 {
                    return Err(DomainError::validation(
                        "distance_km must be greater than zero.",
                    ));
                }
                self.check_ceiling(km)?;
                (MANUAL_PROVIDER.to_owned(), km)
            }
            None => {
                let (origin, destination) = match (origin, destination) {
                    (Some(o), Some(d)) => (o, d),
                    _ => {
                        return Err(DomainError::validation(
                            "Both origin and destination are required.",
                        ));
                    }
                };
                let km = self.route_distance(origin, destination, None).await?;
                (self.resolver.provider_name().to_owned(), km)
            }
        };

        let results = emission::compute(&mode, distance_km, &self.factors)?;
        let inputs = CalcInputs {
            origin: origin.map(ToOwned::to_owned),
            destination: destination.map(ToOwned::to_owned),
            distance_km,
            mode_label: self.factors.label_for(&mode),
            mode,
        };

        let record = self.repo.create(NewCalculation {
            provider,
            inputs,
            results,
            factors: self.factors.snapshot(),
            factors_version: self.factors.version.clone(),
        })?;
        info!(id = %record.id, provider = %record.provider, km = record.inputs.distance_km, "calculation stored");
        Ok(record)
    }

    /// Fetches a stored record.
    ///
    /// # Errors
    ///
    /// `NotFound` for unknown ids.
    pub fn record(&self, id: &str) -> Result<CalculationRecord, DomainError> {
        self.repo.get(id)
    }

    /// Regenerates the receipt document for a stored record.
    ///
    /// Reads only the record itself; the live factor tables play no part.
    ///
    /// # Errors
    ///
    /// `NotFound` for unknown ids, `Internal` when rendering fails.
    #[instrument(skip(self))]
    pub fn render_receipt(&self, id: &str) -> Result<Vec<u8>, DomainError> {
        let record = self.repo.get(id)?;
        self.renderer.render(&record)
    }

    fn check_ceiling(&self, km: f64) -> Result<(), DomainError> {
        if km > self.limits.max_route_km {
            return Err(DomainError::DistanceOutOfRange {
                km,
                max_km: self.limits.max_route_km,
            });
        }
        Ok(())
    }
}

/// Routing profiles are interpolated into the provider URL path, so only a
/// conservative character set is allowed through.
fn validate_profile(profile: &str) -> Result<(), DomainError> {
    let ok = !profile.is_empty()
        && profile
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-');
    if ok {
        Ok(())
    } else {
        Err(DomainError::validation("Invalid routing profile."))
    }
}
