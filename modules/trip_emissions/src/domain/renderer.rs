//! Receipt rendering abstraction.

use crate::domain::error::DomainError;
use crate::domain::model::CalculationRecord;

/// Renders a stored calculation into a displayable document.
///
/// Implementations must be pure functions of the record: same record in,
/// same document out, reading only the fields captured at creation time.
pub trait ReceiptRenderer: Send + Sync {
    /// Renders the record into document bytes.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Internal` when document assembly fails.
    fn render(&self, record: &CalculationRecord) -> Result<Vec<u8>, DomainError>;
}
