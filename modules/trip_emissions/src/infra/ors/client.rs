//! OpenRouteService geocoding/routing client.
//!
//! All provider error payloads are normalized into the domain taxonomy
//! here; callers never see ORS response shapes.

use std::time::Duration;

use async_trait::async_trait;
use http::StatusCode;
use secrecy::{ExposeSecret, SecretString};
use serde_json::{Value, json};
use tracing::{debug, error, instrument};
use url::Url;

use crate::config::OrsConfig;
use crate::domain::error::DomainError;
use crate::domain::model::{Coordinates, PlaceSuggestion};
use crate::domain::resolver::RouteResolver;

/// Provider label stored in records built from routed distances.
const PROVIDER_NAME: &str = "ORS";

/// OpenRouteService client over a pooled `reqwest` connection.
pub struct OrsClient {
    http: reqwest::Client,
    base_url: Url,
    api_key: Option<SecretString>,
    boundary_country: Option<String>,
}

impl OrsClient {
    /// Builds a client from configuration.
    ///
    /// A missing API key is not an error here: the process must come up and
    /// answer health checks; only calls that reach the provider fail.
    ///
    /// # Errors
    ///
    /// Returns an error when the base URL is unparseable or the HTTP client
    /// cannot be constructed.
    pub fn new(cfg: &OrsConfig) -> anyhow::Result<Self> {
        let base_url = Url::parse(&cfg.base_url)?;
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(cfg.timeout_secs))
            .build()?;
        Ok(Self {
            http,
            base_url,
            api_key: cfg.api_key.clone(),
            boundary_country: cfg.boundary_country.clone(),
        })
    }

    fn credential(&self) -> Result<&str, DomainError> {
        self.api_key
            .as_ref()
            .map(ExposeSecret::expose_secret)
            .ok_or_else(|| DomainError::upstream("routing credential is not configured"))
    }

    fn endpoint(&self, path: &str) -> Result<Url, DomainError> {
        self.base_url
            .join(path)
            .map_err(|e| DomainError::internal(format!("bad endpoint '{path}': {e}")))
    }

    fn geocode_url(&self, path: &str, text: &str, size: usize) -> Result<Url, DomainError> {
        let mut url = self.endpoint(path)?;
        url.query_pairs_mut()
            .append_pair("text", text)
            .append_pair("size", &size.to_string());
        if let Some(country) = &self.boundary_country {
            url.query_pairs_mut().append_pair("boundary.country", country);
        }
        Ok(url)
    }

    async fn get_json(&self, url: Url) -> Result<Value, DomainError> {
        let key = self.credential()?;
        let response = self
            .http
            .get(url)
            .header(http::header::ACCEPT, "application/json")
            .header(http::header::AUTHORIZATION, key)
            .send()
            .await
            .map_err(transport_error)?;
        decode_response(response).await
    }

    async fn post_json(&self, url: Url, body: &Value) -> Result<Value, DomainError> {
        let key = self.credential()?;
        let response = self
            .http
            .post(url)
            .header(http::header::ACCEPT, "application/json")
            .header(http::header::AUTHORIZATION, key)
            .json(body)
            .send()
            .await
            .map_err(transport_error)?;
        decode_response(response).await
    }
}

#[async_trait]
impl RouteResolver for OrsClient {
    fn provider_name(&self) -> &'static str {
        PROVIDER_NAME
    }

    #[instrument(skip(self))]
    async fn suggest(
        &self,
        text: &str,
        limit: usize,
    ) -> Result<Vec<PlaceSuggestion>, DomainError> {
        let url = self.geocode_url("geocode/autocomplete", text, limit)?;
        let body = self.get_json(url).await?;

        let features = body
            .get("features")
            .and_then(Value::as_array)
            .map(Vec::as_slice)
            .unwrap_or_default();

        let suggestions: Vec<PlaceSuggestion> = features
            .iter()
            .filter_map(|feature| {
                let label = feature
                    .pointer("/properties/label")
                    .and_then(Value::as_str)
                    .map(str::trim)
                    .filter(|l| !l.is_empty())?;
                let coords = feature_coordinates(feature)?;
                Some(PlaceSuggestion {
                    label: label.to_owned(),
                    lon: coords.lon,
                    lat: coords.lat,
                })
            })
            .take(limit)
            .collect();

        debug!(count = suggestions.len(), "autocomplete resolved");
        Ok(suggestions)
    }

    #[instrument(skip(self))]
    async fn geocode(&self, place: &str) -> Result<Coordinates, DomainError> {
        let url = self.geocode_url("geocode/search", place, 1)?;
        let body = self.get_json(url).await?;

        body.pointer("/features/0")
            .and_then(feature_coordinates)
            .ok_or_else(|| DomainError::geocode_not_found(place))
    }

    #[instrument(skip(self))]
    async fn route_distance_km(
        &self,
        origin: Coordinates,
        destination: Coordinates,
        profile: &str,
    ) -> Result<f64, DomainError> {
        let url = self.endpoint(&format!("v2/directions/{profile}/json"))?;
        let body = json!({
            "coordinates": [
                [origin.lon, origin.lat],
                [destination.lon, destination.lat],
            ],
        });
        let data = self.post_json(url, &body).await?;

        let meters = extract_route_meters(&data).ok_or_else(|| {
            error!("routing response carried no distance field");
            DomainError::route_unavailable("the provider returned no distance for this route")
        })?;
        if !meters.is_finite() || meters <= 0.0 {
            error!(meters, "routing response carried an unusable distance");
            return Err(DomainError::route_unavailable(
                "the provider returned an unusable distance for this route",
            ));
        }
        Ok(meters / 1000.0)
    }
}

/// Pulls the total route distance in meters out of a directions response.
///
/// Precedence over the known ORS response shapes, checked in order:
/// 1. `routes[0].summary.distance`
/// 2. `routes[0].segments[0].distance`
pub(crate) fn extract_route_meters(body: &Value) -> Option<f64> {
    body.pointer("/routes/0/summary/distance")
        .or_else(|| body.pointer("/routes/0/segments/0/distance"))
        .and_then(Value::as_f64)
}

fn feature_coordinates(feature: &Value) -> Option<Coordinates> {
    let coords = feature.pointer("/geometry/coordinates")?;
    Some(Coordinates {
        lon: coords.get(0)?.as_f64()?,
        lat: coords.get(1)?.as_f64()?,
    })
}

fn transport_error(e: reqwest::Error) -> DomainError {
    if e.is_timeout() {
        error!(error = %e, "ORS request timed out");
        DomainError::upstream("the routing provider did not answer in time")
    } else {
        error!(error = %e, "ORS request failed in transport");
        DomainError::upstream("the routing provider could not be reached")
    }
}

async fn decode_response(response: reqwest::Response) -> Result<Value, DomainError> {
    let status = response.status();
    let body: Value = response.json().await.unwrap_or(Value::Null);
    if !status.is_success() {
        // Payload details stay in the log; the caller gets a safe message.
        let detail = provider_error_message(&body);
        error!(
            %status,
            payload = %body,
            detail = detail.as_deref().unwrap_or("-"),
            "ORS request rejected"
        );
        return Err(normalize_upstream_error(status));
    }
    Ok(body)
}

/// Collapses provider failures into the domain taxonomy. Messages are
/// fixed per failure class; payload text never reaches the caller.
fn normalize_upstream_error(status: StatusCode) -> DomainError {
    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
            DomainError::upstream("the routing credential was rejected")
        }
        StatusCode::TOO_MANY_REQUESTS => {
            DomainError::upstream("the routing provider rate limit was reached")
        }
        _ => DomainError::upstream(format!("the routing provider failed ({status})")),
    }
}

/// Best-effort human-readable message from the known ORS error shapes,
/// in precedence order: `error.message`, then `error` as a string, then
/// `message`. Logged, never surfaced to clients.
fn provider_error_message(body: &Value) -> Option<String> {
    body.pointer("/error/message")
        .and_then(Value::as_str)
        .or_else(|| body.get("error").and_then(Value::as_str))
        .or_else(|| body.get("message").and_then(Value::as_str))
        .map(ToOwned::to_owned)
}
