//! Calculator module: the operation dispatch core (registry + operation set +
//! evaluator) and the persisted calculation records built on top of it.

pub mod api;
pub mod domain;
pub mod infra;

pub use domain::evaluator::Evaluator;
pub use domain::op::{EvalError, Operation};
pub use domain::registry::OperationRegistry;
pub use domain::service::CalculationService;
