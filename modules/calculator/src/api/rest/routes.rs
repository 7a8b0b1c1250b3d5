use std::sync::Arc;

use axum::routing::{get, post};
use axum::{Extension, Router};

use crate::domain::evaluator::Evaluator;
use crate::domain::service::CalculationService;

use super::handlers;

/// Mount the calculator routes. The evaluator and service are shared,
/// read-only extensions; auth happens per-handler via the token extractor.
pub fn router(service: Arc<CalculationService>, evaluator: Arc<Evaluator>) -> Router {
    Router::new()
        .route(
            "/calculator/v1/calculate/{operation}",
            get(handlers::calculate),
        )
        .route("/calculator/v1/operations", get(handlers::list_operations))
        .route(
            "/calculations/v1/calculations",
            post(handlers::create_calculation).get(handlers::list_calculations),
        )
        .route(
            "/calculations/v1/calculations/{id}",
            get(handlers::get_calculation)
                .patch(handlers::update_calculation)
                .delete(handlers::delete_calculation),
        )
        .layer(Extension(service))
        .layer(Extension(evaluator))
}
