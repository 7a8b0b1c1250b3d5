use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use uuid::Uuid;

/// A persisted calculation owned by a single user.
///
/// Invariant: `result` is the output of applying `operation` to `(a, b)` at
/// the time of the last successful write.
#[derive(Debug, Clone, PartialEq)]
pub struct Calculation {
    pub id: Uuid,
    pub user_id: Uuid,
    pub a: Decimal,
    pub b: Decimal,
    /// Canonical uppercase operation name.
    pub operation: String,
    pub result: Decimal,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Inputs for creating a calculation; the result is computed, never supplied.
#[derive(Debug, Clone)]
pub struct NewCalculation {
    pub a: Decimal,
    pub b: Decimal,
    pub operation: String,
}

/// Partial update. Absent fields keep their stored values; the result is
/// recomputed whenever any field is present.
#[derive(Debug, Clone, Default)]
pub struct CalculationPatch {
    pub a: Option<Decimal>,
    pub b: Option<Decimal>,
    pub operation: Option<String>,
}

impl CalculationPatch {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.a.is_none() && self.b.is_none() && self.operation.is_none()
    }
}
