use api_problem::{
    Problem, ValidationViolation, conflict, internal_error, not_found, unauthorized, unprocessable,
};

use crate::domain::error::DomainError;

pub fn domain_error_to_problem(e: &DomainError) -> Problem {
    match e {
        DomainError::AlreadyRegistered => conflict("Username or email already exists"),
        DomainError::InvalidCredentials => unauthorized("Invalid credentials"),
        DomainError::NotFound => not_found("User not found"),
        DomainError::Validation { field, message } => {
            unprocessable("Input validation failed").with_errors(vec![ValidationViolation {
                field: field.clone(),
                message: message.clone(),
            }])
        }
        DomainError::Internal(err) => {
            tracing::error!(error = ?err, "internal error");
            internal_error("An internal error occurred")
        }
    }
}

impl From<DomainError> for Problem {
    fn from(e: DomainError) -> Self {
        domain_error_to_problem(&e)
    }
}
