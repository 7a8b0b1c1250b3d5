use std::sync::Arc;

use accounts::AccountService;
use accounts::infra::password::Argon2PasswordHasher;
use accounts::infra::storage::sea_orm_repo::SeaOrmUsersRepository;
use anyhow::Context as _;
use auth_token::TokenCodec;
use axum::routing::get;
use axum::{Extension, Json, Router};
use calculator::infra::storage::sea_orm_repo::SeaOrmCalculationsRepository;
use calculator::{CalculationService, Evaluator};
use sea_orm::{Database, DatabaseConnection};
use sea_orm_migration::MigratorTrait as _;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

use crate::config::AppConfig;
use crate::openapi::ApiDoc;

/// Connect to the configured database and bring both modules' schemas up.
///
/// # Errors
/// Fails when the DSN is unreachable or a migration cannot be applied.
pub async fn connect_and_migrate(dsn: &str) -> anyhow::Result<DatabaseConnection> {
    let db = Database::connect(dsn)
        .await
        .with_context(|| format!("failed to connect to database: {dsn}"))?;

    accounts::infra::storage::migrations::Migrator::up(&db, None)
        .await
        .context("accounts migrations failed")?;
    calculator::infra::storage::migrations::Migrator::up(&db, None)
        .await
        .context("calculator migrations failed")?;

    Ok(db)
}

/// Assemble the full application router.
///
/// The evaluator's registry is built here, once, and shared read-only with
/// every handler; the token codec extension serves all authenticated routes.
pub fn build_router(db: &DatabaseConnection, config: &AppConfig) -> Router {
    let codec = Arc::new(TokenCodec::new(
        &config.auth.secret,
        chrono::Duration::minutes(config.auth.token_ttl_minutes),
    ));

    let evaluator = Arc::new(Evaluator::with_builtins());

    let account_service = Arc::new(AccountService::new(
        Arc::new(SeaOrmUsersRepository::new(db.clone())),
        Arc::new(Argon2PasswordHasher),
    ));
    let calculation_service = Arc::new(CalculationService::new(
        Arc::new(SeaOrmCalculationsRepository::new(db.clone())),
        Arc::clone(&evaluator),
    ));

    Router::new()
        .merge(accounts::api::rest::routes::router(account_service))
        .merge(calculator::api::rest::routes::router(
            calculation_service,
            evaluator,
        ))
        .route("/healthz", get(healthz))
        .route("/openapi.json", get(openapi_json))
        .layer(Extension(codec))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}

async fn healthz() -> &'static str {
    "ok"
}

async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    use utoipa::OpenApi as _;
    Json(ApiDoc::openapi())
}

/// Run the server until ctrl-c.
///
/// # Errors
/// Fails on bind errors, database errors, or a failed serve loop.
pub async fn run(config: AppConfig) -> anyhow::Result<()> {
    if config.is_default_secret() {
        warn!("auth.secret is the built-in development secret; set ABACUS__AUTH__SECRET");
    }

    let db = connect_and_migrate(&config.database.dsn).await?;
    let app = build_router(&db, &config);

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;

    info!(addr = %addr, "abacus-server listening");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    info!("abacus-server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "failed to listen for shutdown signal");
    }
}
