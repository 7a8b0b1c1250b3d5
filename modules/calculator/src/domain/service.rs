use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, instrument};
use uuid::Uuid;

use super::error::DomainError;
use super::evaluator::Evaluator;
use super::model::{Calculation, CalculationPatch, NewCalculation};
use super::repo::CalculationsRepository;

/// Calculation record service: creation, ownership-scoped reads, partial
/// updates with result recomputation, and deletion.
pub struct CalculationService {
    repo: Arc<dyn CalculationsRepository>,
    evaluator: Arc<Evaluator>,
}

impl CalculationService {
    pub fn new(repo: Arc<dyn CalculationsRepository>, evaluator: Arc<Evaluator>) -> Self {
        Self { repo, evaluator }
    }

    /// Validate the operation name, compute the result, persist the record.
    #[instrument(skip(self, new), fields(user_id = %owner))]
    pub async fn create(
        &self,
        owner: Uuid,
        new: NewCalculation,
    ) -> Result<Calculation, DomainError> {
        let operation = self.evaluator.canonicalize(&new.operation)?.to_owned();
        let result = self.evaluator.evaluate(new.a, new.b, &new.operation)?;

        let now = Utc::now();
        let calculation = Calculation {
            id: Uuid::new_v4(),
            user_id: owner,
            a: new.a,
            b: new.b,
            operation,
            result,
            created_at: now,
            updated_at: now,
        };
        self.repo.insert(&calculation).await?;

        debug!(id = %calculation.id, "calculation created");
        Ok(calculation)
    }

    #[instrument(skip(self), fields(calculation_id = %id))]
    pub async fn get(&self, owner: Uuid, id: Uuid) -> Result<Calculation, DomainError> {
        let calculation = self
            .repo
            .find_by_id(id)
            .await?
            .ok_or(DomainError::NotFound)?;
        Self::check_owner(&calculation, owner)?;
        Ok(calculation)
    }

    #[instrument(skip(self), fields(user_id = %owner))]
    pub async fn list(&self, owner: Uuid) -> Result<Vec<Calculation>, DomainError> {
        Ok(self.repo.list_by_owner(owner).await?)
    }

    /// Apply a partial update. The result is recomputed through the same
    /// evaluator as the stateless endpoint whenever `a`, `b` or the
    /// operation changes, so the record never goes stale relative to its own
    /// fields.
    #[instrument(skip(self, patch), fields(calculation_id = %id))]
    pub async fn update(
        &self,
        owner: Uuid,
        id: Uuid,
        patch: CalculationPatch,
    ) -> Result<Calculation, DomainError> {
        let mut calculation = self
            .repo
            .find_by_id(id)
            .await?
            .ok_or(DomainError::NotFound)?;
        Self::check_owner(&calculation, owner)?;

        if patch.is_empty() {
            return Ok(calculation);
        }

        if let Some(a) = patch.a {
            calculation.a = a;
        }
        if let Some(b) = patch.b {
            calculation.b = b;
        }
        if let Some(ref operation) = patch.operation {
            calculation.operation = self.evaluator.canonicalize(operation)?.to_owned();
        }

        calculation.result =
            self.evaluator
                .evaluate(calculation.a, calculation.b, &calculation.operation)?;
        calculation.updated_at = Utc::now();

        self.repo.update(&calculation).await?;

        debug!(id = %calculation.id, "calculation updated");
        Ok(calculation)
    }

    #[instrument(skip(self), fields(calculation_id = %id))]
    pub async fn delete(&self, owner: Uuid, id: Uuid) -> Result<(), DomainError> {
        let calculation = self
            .repo
            .find_by_id(id)
            .await?
            .ok_or(DomainError::NotFound)?;
        Self::check_owner(&calculation, owner)?;

        self.repo.delete(id).await?;

        debug!(id = %id, "calculation deleted");
        Ok(())
    }

    /// Ownership is exclusive: any caller other than the record's owner is
    /// rejected.
    fn check_owner(calculation: &Calculation, owner: Uuid) -> Result<(), DomainError> {
        if calculation.user_id != owner {
            return Err(DomainError::Forbidden);
        }
        Ok(())
    }
}
