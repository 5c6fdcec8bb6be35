//! Domain model for trip emission calculations.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::factors::FactorsSnapshot;

/// A WGS84 coordinate pair as returned by the geocoder.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub lon: f64,
    pub lat: f64,
}

/// A single autocomplete suggestion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlaceSuggestion {
    pub label: String,
    pub lon: f64,
    pub lat: f64,
}

/// Inputs a calculation was made from.
///
/// `origin`/`destination` are absent when the distance was supplied manually.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalcInputs {
    pub origin: Option<String>,
    pub destination: Option<String>,
    pub distance_km: f64,
    pub mode: String,
    pub mode_label: String,
}

/// Derived figures, computed once at creation time and never recomputed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalcResults {
    pub emission_kg: f64,
    pub car_emission_kg: f64,
    pub delta_vs_car_kg: f64,
    pub vs_car_pct: f64,
    pub credits_needed: f64,
    pub cost_base_brl: f64,
    pub cost_min_brl: f64,
    pub cost_max_brl: f64,
}

/// A finished calculation as handed to the store.
///
/// The store assigns the id and creation timestamp.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewCalculation {
    pub provider: String,
    pub inputs: CalcInputs,
    pub results: CalcResults,
    pub factors: FactorsSnapshot,
    pub factors_version: String,
}

/// A stored calculation.
///
/// Immutable after creation: the factors snapshot is a copy of the tables in
/// effect at creation time, so a receipt can be regenerated from this record
/// alone even after the live configuration changes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalculationRecord {
    pub id: String,
    pub created_at: DateTime<Utc>,
    pub provider: String,
    pub inputs: CalcInputs,
    pub results: CalcResults,
    pub factors: FactorsSnapshot,
    pub factors_version: String,
}
