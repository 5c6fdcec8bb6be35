//! Calculation record store abstraction.

use crate::domain::error::DomainError;
use crate::domain::model::{CalculationRecord, NewCalculation};

/// Storage for calculation records.
///
/// `create` is the only mutator; records are never updated in place. The
/// store assigns the id and creation timestamp, so callers cannot pick or
/// reuse keys. Deployments may swap the in-memory implementation for a
/// persistent one without touching handlers or the renderer.
pub trait CalcRepository: Send + Sync {
    /// Stores a finished calculation under a freshly generated id and
    /// returns the full record.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Internal` when the backing store rejects the
    /// insert.
    fn create(&self, calc: NewCalculation) -> Result<CalculationRecord, DomainError>;

    /// Fetches a record by id.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::NotFound` for an unknown id.
    fn get(&self, id: &str) -> Result<CalculationRecord, DomainError>;
}
