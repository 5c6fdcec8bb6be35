use secrecy::SecretString;
use serde::{Deserialize, Serialize};

use crate::domain::factors::EmissionFactors;

/// Configuration for the `trip_emissions` module
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TripEmissionsConfig {
    #[serde(default)]
    pub ors: OrsConfig,
    #[serde(default)]
    pub calculation: CalculationConfig,
}

/// OpenRouteService connection settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct OrsConfig {
    /// API credential. Requests that need the provider fail with an
    /// upstream error while this is unset; the process itself starts fine.
    /// Never serialized back out.
    #[serde(default, skip_serializing)]
    pub api_key: Option<SecretString>,
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    /// Restricts geocoding to one country (ISO alpha-2); unset searches
    /// worldwide.
    #[serde(default = "default_boundary_country")]
    pub boundary_country: Option<String>,
}

impl Default for OrsConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: default_base_url(),
            timeout_secs: default_timeout_secs(),
            boundary_country: default_boundary_country(),
        }
    }
}

/// Calculation limits and the active factor tables.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CalculationConfig {
    #[serde(default = "default_max_route_km")]
    pub max_route_km: f64,
    #[serde(default = "default_suggest_limit")]
    pub suggest_limit: usize,
    #[serde(default = "default_profile")]
    pub default_profile: String,
    #[serde(default)]
    pub factors: EmissionFactors,
}

impl Default for CalculationConfig {
    fn default() -> Self {
        Self {
            max_route_km: default_max_route_km(),
            suggest_limit: default_suggest_limit(),
            default_profile: default_profile(),
            factors: EmissionFactors::default(),
        }
    }
}

fn default_base_url() -> String {
    "https://api.openrouteservice.org".to_owned()
}

fn default_timeout_secs() -> u64 {
    10
}

fn default_boundary_country() -> Option<String> {
    Some("BR".to_owned())
}

fn default_max_route_km() -> f64 {
    6000.0
}

fn default_suggest_limit() -> usize {
    6
}

fn default_profile() -> String {
    "driving-car".to_owned()
}
