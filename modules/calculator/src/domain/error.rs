use super::op::EvalError;

#[derive(Debug, thiserror::Error)]
pub enum DomainError {
    #[error("Calculation not found")]
    NotFound,

    #[error("Not allowed")]
    Forbidden,

    #[error(transparent)]
    Eval(#[from] EvalError),

    #[error("Database error: {0}")]
    Database(#[from] anyhow::Error),
}
