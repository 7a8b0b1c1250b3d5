use api_problem::{Problem, bad_request, forbidden, internal_error, not_found};

use crate::domain::error::DomainError;
use crate::domain::op::EvalError;

/// Map a domain error to an RFC 9457 problem.
///
/// Eval errors are deterministic client-input problems and surface their
/// message verbatim; database details are withheld.
pub fn domain_error_to_problem(e: &DomainError) -> Problem {
    match e {
        DomainError::NotFound => not_found("Calculation not found"),
        DomainError::Forbidden => forbidden("Not allowed"),
        DomainError::Eval(eval) => eval_error_to_problem(eval),
        DomainError::Database(err) => {
            tracing::error!(error = ?err, "database error");
            internal_error("An internal database error occurred")
        }
    }
}

pub fn eval_error_to_problem(e: &EvalError) -> Problem {
    bad_request(e.to_string())
}

impl From<DomainError> for Problem {
    fn from(e: DomainError) -> Self {
        domain_error_to_problem(&e)
    }
}
