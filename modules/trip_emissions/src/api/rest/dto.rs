use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::model::{
    CalcInputs, CalcResults, CalculationRecord, PlaceSuggestion,
};
use crate::domain::factors::{CreditPrice, FactorsSnapshot};

#[derive(Debug, Serialize, ToSchema)]
pub struct HealthDto {
    pub ok: bool,
}

#[derive(Debug, Deserialize)]
pub struct SuggestQuery {
    #[serde(default)]
    pub q: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct SuggestionDto {
    pub label: String,
    pub lon: f64,
    pub lat: f64,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct SuggestResponse {
    pub suggestions: Vec<SuggestionDto>,
}

impl From<Vec<PlaceSuggestion>> for SuggestResponse {
    fn from(suggestions: Vec<PlaceSuggestion>) -> Self {
        Self {
            suggestions: suggestions
                .into_iter()
                .map(|s| SuggestionDto {
                    label: s.label,
                    lon: s.lon,
                    lat: s.lat,
                })
                .collect(),
        }
    }
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub struct DistanceRequest {
    pub origin: String,
    pub destination: String,
    #[serde(default)]
    pub profile: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct DistanceResponse {
    pub distance_km: f64,
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub struct CalcRequest {
    #[serde(default)]
    pub origin: Option<String>,
    #[serde(default)]
    pub destination: Option<String>,
    /// Transport mode key. `transport` is accepted as a legacy alias.
    #[serde(alias = "transport")]
    pub mode: String,
    /// Manual distance in km; when present, route resolution is skipped.
    #[serde(default)]
    pub distance_km: Option<f64>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CalcResponse {
    pub calc_id: String,
    pub pdf_url: String,
    pub record: CalculationRecordDto,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CalcInputsDto {
    pub origin: Option<String>,
    pub destination: Option<String>,
    pub distance_km: f64,
    pub mode: String,
    pub mode_label: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CalcResultsDto {
    pub emission_kg: f64,
    pub car_emission_kg: f64,
    pub delta_vs_car_kg: f64,
    pub vs_car_pct: f64,
    pub credits_needed: f64,
    pub cost_base_brl: f64,
    pub cost_min_brl: f64,
    pub cost_max_brl: f64,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CreditPriceDto {
    pub base: f64,
    pub min: f64,
    pub max: f64,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct FactorsSnapshotDto {
    pub kg_per_km: BTreeMap<String, f64>,
    pub credit_price: CreditPriceDto,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CalculationRecordDto {
    pub calc_id: String,
    pub created_at: DateTime<Utc>,
    pub provider: String,
    pub inputs: CalcInputsDto,
    pub results: CalcResultsDto,
    pub factors: FactorsSnapshotDto,
    pub factors_version: String,
}

impl From<CalcInputs> for CalcInputsDto {
    fn from(inputs: CalcInputs) -> Self {
        Self {
            origin: inputs.origin,
            destination: inputs.destination,
            distance_km: inputs.distance_km,
            mode: inputs.mode,
            mode_label: inputs.mode_label,
        }
    }
}

impl From<CalcResults> for CalcResultsDto {
    fn from(results: CalcResults) -> Self {
        Self {
            emission_kg: results.emission_kg,
            car_emission_kg: results.car_emission_kg,
            delta_vs_car_kg: results.delta_vs_car_kg,
            vs_car_pct: results.vs_car_pct,
            credits_needed: results.credits_needed,
            cost_base_brl: results.cost_base_brl,
            cost_min_brl: results.cost_min_brl,
            cost_max_brl: results.cost_max_brl,
        }
    }
}

impl From<CreditPrice> for CreditPriceDto {
    fn from(price: CreditPrice) -> Self {
        Self {
            base: price.base,
            min: price.min,
            max: price.max,
        }
    }
}

impl From<FactorsSnapshot> for FactorsSnapshotDto {
    fn from(snapshot: FactorsSnapshot) -> Self {
        Self {
            kg_per_km: snapshot.kg_per_km,
            credit_price: snapshot.credit_price.into(),
        }
    }
}

impl From<CalculationRecord> for CalculationRecordDto {
    fn from(record: CalculationRecord) -> Self {
        Self {
            calc_id: record.id,
            created_at: record.created_at,
            provider: record.provider,
            inputs: record.inputs.into(),
            results: record.results.into(),
            factors: record.factors.into(),
            factors_version: record.factors_version,
        }
    }
}
