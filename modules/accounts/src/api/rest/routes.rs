use std::sync::Arc;

use axum::routing::{get, post};
use axum::{Extension, Router};

use crate::domain::service::AccountService;

use super::handlers;

/// Mount the account routes. The token codec extension is shared with every
/// authenticated route in the application and is layered by the server.
pub fn router(service: Arc<AccountService>) -> Router {
    Router::new()
        .route("/accounts/v1/register", post(handlers::register))
        .route("/accounts/v1/login", post(handlers::login))
        .route("/accounts/v1/me", get(handlers::me))
        .layer(Extension(service))
}
