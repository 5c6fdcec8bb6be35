//! The emission model: pure arithmetic over a distance and a factor table.

use crate::domain::error::DomainError;
use crate::domain::factors::{BASELINE_MODE, EmissionFactors};
use crate::domain::model::CalcResults;

/// Kilograms of CO2 per carbon credit.
const KG_PER_CREDIT: f64 = 1000.0;

/// Rounds to two decimals, the stored precision for mass, currency and
/// percentage figures.
#[must_use]
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Rounds to four decimals, the stored precision for credit counts.
#[must_use]
pub fn round4(value: f64) -> f64 {
    (value * 10_000.0).round() / 10_000.0
}

/// Computes the full result set for a mode and distance.
///
/// Deterministic and side-effect free. Intermediate values stay unrounded;
/// each output is rounded exactly once to its stored precision.
///
/// # Errors
///
/// Returns `DomainError::InvalidMode` when `mode` is not a key of the factor
/// table.
pub fn compute(
    mode: &str,
    distance_km: f64,
    factors: &EmissionFactors,
) -> Result<CalcResults, DomainError> {
    let factor = factors
        .kg_per_km
        .get(mode)
        .copied()
        .ok_or_else(|| DomainError::invalid_mode(mode))?;
    let car_factor = factors
        .kg_per_km
        .get(BASELINE_MODE)
        .copied()
        .ok_or_else(|| DomainError::invalid_mode(BASELINE_MODE))?;

    let emission = distance_km * factor;
    let car_emission = distance_km * car_factor;
    let delta = emission - car_emission;
    // Defined as 0 when the baseline is zero, never NaN or infinity.
    let vs_pct = if car_emission > 0.0 {
        emission / car_emission * 100.0
    } else {
        0.0
    };

    let credits = emission / KG_PER_CREDIT;
    let price = &factors.credit_price;

    Ok(CalcResults {
        emission_kg: round2(emission),
        car_emission_kg: round2(car_emission),
        delta_vs_car_kg: round2(delta),
        vs_car_pct: round2(vs_pct),
        credits_needed: round4(credits),
        cost_base_brl: round2(credits * price.base),
        cost_min_brl: round2(credits * price.min),
        cost_max_brl: round2(credits * price.max),
    })
}
