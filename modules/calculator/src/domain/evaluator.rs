//! The single entry point composing registry resolution and operation
//! execution.

use rust_decimal::Decimal;

use super::op::EvalError;
use super::registry::OperationRegistry;

/// Resolves an operation by name and applies it to two operands.
///
/// Both the stateless calculate endpoint and the persisted record flows go
/// through [`Evaluator::evaluate`], so name normalization happens exactly
/// once, here, and behavior is identical regardless of caller. Stateless per
/// call; the registry table is the only state and it is never mutated after
/// construction.
pub struct Evaluator {
    registry: OperationRegistry,
}

impl Evaluator {
    #[must_use]
    pub fn new(registry: OperationRegistry) -> Self {
        Self { registry }
    }

    #[must_use]
    pub fn with_builtins() -> Self {
        Self::new(OperationRegistry::with_builtins())
    }

    #[must_use]
    pub fn registry(&self) -> &OperationRegistry {
        &self.registry
    }

    /// Evaluate `operation_name` over `(a, b)`.
    ///
    /// Results are normalized (trailing zeros stripped) so `12.500` and
    /// `12.5` do not leak as distinct representations of one value.
    ///
    /// # Errors
    /// Propagates [`EvalError::UnknownOperation`] from resolution and
    /// [`EvalError::InvalidOperands`] from the operation, both unchanged.
    pub fn evaluate(
        &self,
        a: Decimal,
        b: Decimal,
        operation_name: &str,
    ) -> Result<Decimal, EvalError> {
        let op = self.registry.resolve(operation_name)?;
        Ok(op.apply(a, b)?.normalize())
    }

    /// The canonical spelling of `operation_name`, for storage and echo.
    ///
    /// # Errors
    /// [`EvalError::UnknownOperation`] when the name does not resolve.
    pub fn canonicalize(&self, operation_name: &str) -> Result<&'static str, EvalError> {
        Ok(self.registry.resolve(operation_name)?.canonical_name())
    }
}
