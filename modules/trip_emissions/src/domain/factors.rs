//! Emission factor and credit price tables.
//!
//! The tables are immutable configuration loaded once at process start and
//! passed explicitly to the emission model. Every created record takes a
//! snapshot copy, never a live reference.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::domain::error::DomainError;

/// The mode every calculation is compared against.
pub const BASELINE_MODE: &str = "car";

/// Credit pricing in BRL per credit (1 credit = 1000 kg CO2).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CreditPrice {
    pub base: f64,
    pub min: f64,
    pub max: f64,
}

impl Default for CreditPrice {
    fn default() -> Self {
        Self {
            base: 45.0,
            min: 25.0,
            max: 85.0,
        }
    }
}

/// The active factor configuration: emission factors per transport mode,
/// display labels, credit pricing and a version label for the whole set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EmissionFactors {
    /// kg CO2 emitted per km, per transport mode key.
    #[serde(default = "default_kg_per_km")]
    pub kg_per_km: BTreeMap<String, f64>,
    /// Human-readable labels per mode key. Missing entries fall back to the key.
    #[serde(default = "default_labels")]
    pub labels: BTreeMap<String, String>,
    #[serde(default)]
    pub credit_price: CreditPrice,
    /// Version label stored verbatim in every record created from this set.
    #[serde(default = "default_version")]
    pub version: String,
}

impl Default for EmissionFactors {
    fn default() -> Self {
        Self {
            kg_per_km: default_kg_per_km(),
            labels: default_labels(),
            credit_price: CreditPrice::default(),
            version: default_version(),
        }
    }
}

impl EmissionFactors {
    /// Checks the table set is usable before the service starts.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Validation` when the baseline mode is missing,
    /// a factor is negative or non-finite, the price range is inverted, or
    /// the version label is empty.
    pub fn validate(&self) -> Result<(), DomainError> {
        if !self.kg_per_km.contains_key(BASELINE_MODE) {
            return Err(DomainError::validation(format!(
                "factor table must contain the '{BASELINE_MODE}' baseline mode"
            )));
        }
        for (mode, factor) in &self.kg_per_km {
            if !factor.is_finite() || *factor < 0.0 {
                return Err(DomainError::validation(format!(
                    "emission factor for '{mode}' must be a non-negative number"
                )));
            }
        }
        let p = &self.credit_price;
        if ![p.base, p.min, p.max].iter().all(|v| v.is_finite() && *v >= 0.0) {
            return Err(DomainError::validation(
                "credit prices must be non-negative numbers",
            ));
        }
        if p.min > p.max {
            return Err(DomainError::validation(
                "credit price range is inverted (min > max)",
            ));
        }
        if self.version.trim().is_empty() {
            return Err(DomainError::validation("factors version must not be empty"));
        }
        Ok(())
    }

    #[must_use]
    pub fn contains_mode(&self, mode: &str) -> bool {
        self.kg_per_km.contains_key(mode)
    }

    #[must_use]
    pub fn label_for(&self, mode: &str) -> String {
        self.labels
            .get(mode)
            .cloned()
            .unwrap_or_else(|| mode.to_owned())
    }

    /// Copy of the tables as stored inside a record.
    #[must_use]
    pub fn snapshot(&self) -> FactorsSnapshot {
        FactorsSnapshot {
            kg_per_km: self.kg_per_km.clone(),
            credit_price: self.credit_price.clone(),
        }
    }
}

/// The exact tables captured inside a record at creation time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FactorsSnapshot {
    pub kg_per_km: BTreeMap<String, f64>,
    pub credit_price: CreditPrice,
}

fn default_kg_per_km() -> BTreeMap<String, f64> {
    BTreeMap::from([
        ("bike".to_owned(), 0.0),
        ("bus".to_owned(), 0.089),
        ("car".to_owned(), 0.12),
        ("truck".to_owned(), 0.96),
    ])
}

fn default_labels() -> BTreeMap<String, String> {
    BTreeMap::from([
        ("bike".to_owned(), "Bicycle".to_owned()),
        ("bus".to_owned(), "Bus".to_owned()),
        ("car".to_owned(), "Car".to_owned()),
        ("truck".to_owned(), "Truck".to_owned()),
    ])
}

fn default_version() -> String {
    "2025.12.26".to_owned()
}
