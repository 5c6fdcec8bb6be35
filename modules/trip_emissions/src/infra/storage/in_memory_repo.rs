//! In-memory calculation record store.

use std::collections::HashMap;

use chrono::Utc;
use parking_lot::RwLock;
use rand::Rng;

use crate::domain::error::DomainError;
use crate::domain::model::{CalculationRecord, NewCalculation};
use crate::domain::repo::CalcRepository;

/// Prefix of every externally visible calculation id.
const ID_PREFIX: &str = "ET-";

/// Random bytes behind each id; 48 bits keeps collisions negligible for a
/// process-lifetime store while staying short enough for a filename.
const ID_RANDOM_BYTES: usize = 6;

/// In-memory repository for calculation records.
///
/// The only mutation is insert-under-fresh-key, so a plain `RwLock` around
/// the map is enough: concurrent `create` calls never race on the same
/// entry, and `get` hands out clones of immutable records. State lives for
/// the process lifetime and is lost on restart.
#[derive(Default)]
pub struct InMemoryCalcRepository {
    records: RwLock<HashMap<String, CalculationRecord>>,
}

impl InMemoryCalcRepository {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.records.read().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.read().is_empty()
    }
}

/// Generates an opaque, URL-safe id from CSPRNG material.
///
/// Ids are exposed externally, so they must not be guessable or enumerable;
/// a sequential counter would not do.
fn new_calc_id() -> String {
    let bytes: [u8; ID_RANDOM_BYTES] = rand::rng().random();
    format!("{ID_PREFIX}{}", hex::encode_upper(bytes))
}

impl CalcRepository for InMemoryCalcRepository {
    fn create(&self, calc: NewCalculation) -> Result<CalculationRecord, DomainError> {
        let mut records = self.records.write();

        // Re-draw on the (vanishingly unlikely) collision instead of
        // clobbering an existing record.
        let id = loop {
            let candidate = new_calc_id();
            if !records.contains_key(&candidate) {
                break candidate;
            }
        };

        let record = CalculationRecord {
            id: id.clone(),
            created_at: Utc::now(),
            provider: calc.provider,
            inputs: calc.inputs,
            results: calc.results,
            factors: calc.factors,
            factors_version: calc.factors_version,
        };
        records.insert(id, record.clone());
        Ok(record)
    }

    fn get(&self, id: &str) -> Result<CalculationRecord, DomainError> {
        self.records
            .read()
            .get(id)
            .cloned()
            .ok_or_else(|| DomainError::not_found(id))
    }
}
