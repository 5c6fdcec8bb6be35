//! Layered application configuration.
//!
//! Precedence, lowest first: serde defaults, YAML file, `ECOTRIP__*`
//! environment (with `__` as the nesting separator), then the plain
//! deployment variables the original hosting setup used (`ORS_API_KEY`,
//! `ALLOWED_ORIGINS`, `PORT`), then CLI overrides applied by `main`.

use std::path::Path;

use figment::Figment;
use figment::providers::{Env, Format, Serialized, Yaml};
use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use trip_emissions::config::TripEmissionsConfig;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub cors: CorsConfig,
    #[serde(default)]
    pub emissions: TripEmissionsConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ServerConfig {
    #[serde(default = "default_bind_addr")]
    pub bind_addr: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: default_bind_addr(),
            port: default_port(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CorsConfig {
    /// Origins allowed to call the API cross-origin. `*` allows any.
    #[serde(default = "default_allowed_origins")]
    pub allowed_origins: Vec<String>,
    #[serde(default = "default_allowed_methods")]
    pub allowed_methods: Vec<String>,
    #[serde(default = "default_allowed_headers")]
    pub allowed_headers: Vec<String>,
    #[serde(default = "default_max_age_seconds")]
    pub max_age_seconds: u64,
}

impl Default for CorsConfig {
    fn default() -> Self {
        Self {
            allowed_origins: default_allowed_origins(),
            allowed_methods: default_allowed_methods(),
            allowed_headers: default_allowed_headers(),
            max_age_seconds: default_max_age_seconds(),
        }
    }
}

impl AppConfig {
    /// Loads the layered configuration.
    ///
    /// # Errors
    ///
    /// Returns an error when the YAML file or the environment cannot be
    /// parsed into the expected shape.
    pub fn load(config_path: Option<&Path>) -> anyhow::Result<Self> {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));
        if let Some(path) = config_path {
            figment = figment.merge(Yaml::file(path));
        }
        figment = figment.merge(Env::prefixed("ECOTRIP__").split("__"));

        let mut config: Self = figment.extract()?;
        config.apply_plain_env();
        Ok(config)
    }

    /// Compatibility overrides from the flat deployment variables.
    fn apply_plain_env(&mut self) {
        if let Ok(key) = std::env::var("ORS_API_KEY") {
            let key = key.trim().to_owned();
            if !key.is_empty() {
                self.emissions.ors.api_key = Some(SecretString::from(key));
            }
        }
        if let Ok(raw) = std::env::var("ALLOWED_ORIGINS") {
            let origins: Vec<String> = raw
                .split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(ToOwned::to_owned)
                .collect();
            if !origins.is_empty() {
                self.cors.allowed_origins = origins;
            }
        }
        if let Ok(port) = std::env::var("PORT") {
            if let Ok(port) = port.trim().parse() {
                self.server.port = port;
            }
        }
    }
}

fn default_bind_addr() -> String {
    "0.0.0.0".to_owned()
}

fn default_port() -> u16 {
    3000
}

fn default_allowed_origins() -> Vec<String> {
    vec![
        "http://localhost:3000".to_owned(),
        "http://127.0.0.1:3000".to_owned(),
    ]
}

fn default_allowed_methods() -> Vec<String> {
    vec!["GET".to_owned(), "POST".to_owned(), "OPTIONS".to_owned()]
}

fn default_allowed_headers() -> Vec<String> {
    vec!["content-type".to_owned(), "accept".to_owned()]
}

fn default_max_age_seconds() -> u64 {
    3600
}
