use std::sync::Arc;

use api_problem::Problem;
use auth_token::AuthUser;
use axum::Json;
use axum::extract::{Extension, Path, Query};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use uuid::Uuid;

use crate::domain::evaluator::Evaluator;
use crate::domain::service::CalculationService;

use super::dto::{
    CalculateQuery, CalculateResponse, CalculationDto, CreateCalculationRequest,
    OperationsResponse, PatchCalculationRequest,
};
use super::error::eval_error_to_problem;

/// Stateless evaluation: resolve the operation and apply it, persisting
/// nothing.
#[utoipa::path(
    get,
    path = "/calculator/v1/calculate/{operation}",
    tag = "Calculator",
    params(
        ("operation" = String, Path, description = "Operation name, case-insensitive"),
        CalculateQuery,
    ),
    responses(
        (status = 200, description = "Evaluation result", body = CalculateResponse),
        (status = 400, description = "Unknown operation or invalid operands", body = Problem),
    ),
)]
pub async fn calculate(
    Path(operation): Path<String>,
    Query(query): Query<CalculateQuery>,
    Extension(evaluator): Extension<Arc<Evaluator>>,
) -> Result<Json<CalculateResponse>, Problem> {
    let result = evaluator
        .evaluate(query.a, query.b, &operation)
        .map_err(|e| eval_error_to_problem(&e))?;
    Ok(Json(CalculateResponse { result }))
}

/// Enumerate the registered operation names.
#[utoipa::path(
    get,
    path = "/calculator/v1/operations",
    tag = "Calculator",
    responses(
        (status = 200, description = "Sorted canonical operation names", body = OperationsResponse),
    ),
)]
pub async fn list_operations(
    Extension(evaluator): Extension<Arc<Evaluator>>,
) -> Json<OperationsResponse> {
    let operations = evaluator
        .registry()
        .names()
        .into_iter()
        .map(str::to_owned)
        .collect();
    Json(OperationsResponse { operations })
}

#[utoipa::path(
    post,
    path = "/calculations/v1/calculations",
    tag = "Calculations",
    request_body = CreateCalculationRequest,
    responses(
        (status = 201, description = "Calculation created", body = CalculationDto),
        (status = 400, description = "Unknown operation or invalid operands", body = Problem),
        (status = 401, description = "Missing or invalid token", body = Problem),
    ),
    security(("bearer_token" = [])),
)]
pub async fn create_calculation(
    user: AuthUser,
    Extension(svc): Extension<Arc<CalculationService>>,
    Json(req): Json<CreateCalculationRequest>,
) -> Result<impl IntoResponse, Problem> {
    let created = svc.create(user.user_id, req.into()).await?;
    let dto: CalculationDto = created.into();
    Ok((StatusCode::CREATED, Json(dto)))
}

#[utoipa::path(
    get,
    path = "/calculations/v1/calculations",
    tag = "Calculations",
    responses(
        (status = 200, description = "The caller's calculations", body = [CalculationDto]),
        (status = 401, description = "Missing or invalid token", body = Problem),
    ),
    security(("bearer_token" = [])),
)]
pub async fn list_calculations(
    user: AuthUser,
    Extension(svc): Extension<Arc<CalculationService>>,
) -> Result<Json<Vec<CalculationDto>>, Problem> {
    let listed = svc.list(user.user_id).await?;
    Ok(Json(listed.into_iter().map(Into::into).collect()))
}

#[utoipa::path(
    get,
    path = "/calculations/v1/calculations/{id}",
    tag = "Calculations",
    params(("id" = Uuid, Path, description = "Calculation id")),
    responses(
        (status = 200, description = "The calculation", body = CalculationDto),
        (status = 403, description = "Not the record's owner", body = Problem),
        (status = 404, description = "No such calculation", body = Problem),
    ),
    security(("bearer_token" = [])),
)]
pub async fn get_calculation(
    user: AuthUser,
    Path(id): Path<Uuid>,
    Extension(svc): Extension<Arc<CalculationService>>,
) -> Result<Json<CalculationDto>, Problem> {
    let calculation = svc.get(user.user_id, id).await?;
    Ok(Json(calculation.into()))
}

/// Partial update; the result is recomputed whenever `a`, `b` or the
/// operation changes.
#[utoipa::path(
    patch,
    path = "/calculations/v1/calculations/{id}",
    tag = "Calculations",
    params(("id" = Uuid, Path, description = "Calculation id")),
    request_body = PatchCalculationRequest,
    responses(
        (status = 200, description = "Calculation updated", body = CalculationDto),
        (status = 400, description = "Unknown operation or invalid operands", body = Problem),
        (status = 403, description = "Not the record's owner", body = Problem),
        (status = 404, description = "No such calculation", body = Problem),
    ),
    security(("bearer_token" = [])),
)]
pub async fn update_calculation(
    user: AuthUser,
    Path(id): Path<Uuid>,
    Extension(svc): Extension<Arc<CalculationService>>,
    Json(req): Json<PatchCalculationRequest>,
) -> Result<Json<CalculationDto>, Problem> {
    let updated = svc.update(user.user_id, id, req.into()).await?;
    Ok(Json(updated.into()))
}

#[utoipa::path(
    delete,
    path = "/calculations/v1/calculations/{id}",
    tag = "Calculations",
    params(("id" = Uuid, Path, description = "Calculation id")),
    responses(
        (status = 204, description = "Calculation deleted"),
        (status = 403, description = "Not the record's owner", body = Problem),
        (status = 404, description = "No such calculation", body = Problem),
    ),
    security(("bearer_token" = [])),
)]
pub async fn delete_calculation(
    user: AuthUser,
    Path(id): Path<Uuid>,
    Extension(svc): Extension<Arc<CalculationService>>,
) -> Result<StatusCode, Problem> {
    svc.delete(user.user_id, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::Calculation;
    use crate::domain::repo::CalculationsRepository;
    use async_trait::async_trait;
    use axum::Router;
    use axum::body::Body;
    use axum::http::Request;
    use axum::routing::{get, post};
    use chrono::Utc;
    use rust_decimal::Decimal;
    use serde_json::Value;
    use std::collections::HashMap;
    use std::sync::Mutex;
    use tower::ServiceExt as _;

    #[derive(Default)]
    struct InMemoryRepository {
        rows: Mutex<HashMap<Uuid, Calculation>>,
    }

    #[async_trait]
    impl CalculationsRepository for InMemoryRepository {
        async fn insert(&self, calculation: &Calculation) -> anyhow::Result<()> {
            self.rows
                .lock()
                .unwrap()
                .insert(calculation.id, calculation.clone());
            Ok(())
        }

        async fn find_by_id(&self, id: Uuid) -> anyhow::Result<Option<Calculation>> {
            Ok(self.rows.lock().unwrap().get(&id).cloned())
        }

        async fn list_by_owner(&self, user_id: Uuid) -> anyhow::Result<Vec<Calculation>> {
            Ok(self
                .rows
                .lock()
                .unwrap()
                .values()
                .filter(|c| c.user_id == user_id)
                .cloned()
                .collect())
        }

        async fn update(&self, calculation: &Calculation) -> anyhow::Result<()> {
            self.rows
                .lock()
                .unwrap()
                .insert(calculation.id, calculation.clone());
            Ok(())
        }

        async fn delete(&self, id: Uuid) -> anyhow::Result<()> {
            self.rows.lock().unwrap().remove(&id);
            Ok(())
        }
    }

    fn dec(s: &str) -> Decimal {
        s.parse().unwrap()
    }

    fn seeded_calculation(user_id: Uuid) -> Calculation {
        let now = Utc::now();
        Calculation {
            id: Uuid::new_v4(),
            user_id,
            a: dec("10"),
            b: dec("5"),
            operation: "ADD".to_owned(),
            result: dec("15"),
            created_at: now,
            updated_at: now,
        }
    }

    fn test_router(repo: Arc<InMemoryRepository>, caller: AuthUser) -> Router {
        let evaluator = Arc::new(Evaluator::with_builtins());
        let service = Arc::new(CalculationService::new(repo, Arc::clone(&evaluator)));
        Router::new()
            .route("/calculator/v1/calculate/{operation}", get(calculate))
            .route("/calculator/v1/operations", get(list_operations))
            .route(
                "/calculations/v1/calculations",
                post(create_calculation).get(list_calculations),
            )
            .route(
                "/calculations/v1/calculations/{id}",
                get(get_calculation)
                    .patch(update_calculation)
                    .delete(delete_calculation),
            )
            .layer(Extension(service))
            .layer(Extension(evaluator))
            .layer(Extension(caller))
    }

    fn caller() -> AuthUser {
        AuthUser {
            user_id: Uuid::new_v4(),
            username: "alice".to_owned(),
        }
    }

    async fn body_json(response: axum::response::Response) -> Value {
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&body).unwrap()
    }

    #[tokio::test]
    async fn calculate_returns_result() {
        let app = test_router(Arc::new(InMemoryRepository::default()), caller());

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/calculator/v1/calculate/divide?a=12&b=4")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        assert_eq!(json["result"], "3");
    }

    #[tokio::test]
    async fn calculate_maps_eval_errors_to_bad_request() {
        let app = test_router(Arc::new(InMemoryRepository::default()), caller());

        let response = app
            .clone()
            .oneshot(
                Request::builder()
                    .uri("/calculator/v1/calculate/divide?a=5&b=0")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let json = body_json(response).await;
        assert_eq!(json["detail"], "Division by zero");

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/calculator/v1/calculate/frobnicate?a=1&b=2")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let json = body_json(response).await;
        assert_eq!(json["detail"], "Unknown operation: frobnicate");
    }

    #[tokio::test]
    async fn operations_lists_canonical_names() {
        let app = test_router(Arc::new(InMemoryRepository::default()), caller());

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/calculator/v1/operations")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        let names = json["operations"].as_array().unwrap();
        assert_eq!(names.len(), 10);
        assert_eq!(names[0], "ABSOLUTEDIFFERENCE");
    }

    #[tokio::test]
    async fn create_returns_201_with_computed_result() {
        let app = test_router(Arc::new(InMemoryRepository::default()), caller());

        let response = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/calculations/v1/calculations")
                    .header("content-type", "application/json")
                    .body(Body::from(r#"{"a":"5","b":"3","type":"add"}"#))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::CREATED);
        let json = body_json(response).await;
        assert_eq!(json["type"], "ADD");
        assert_eq!(json["result"], "8");
    }

    #[tokio::test]
    async fn get_is_forbidden_for_other_owners() {
        let repo = Arc::new(InMemoryRepository::default());
        let foreign = seeded_calculation(Uuid::new_v4());
        repo.insert(&foreign).await.unwrap();
        let app = test_router(repo, caller());

        let response = app
            .oneshot(
                Request::builder()
                    .uri(format!("/calculations/v1/calculations/{}", foreign.id))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn patch_recomputes_and_missing_record_is_404() {
        let user = caller();
        let repo = Arc::new(InMemoryRepository::default());
        let mine = seeded_calculation(user.user_id);
        repo.insert(&mine).await.unwrap();
        let app = test_router(repo, user);

        let response = app
            .clone()
            .oneshot(
                Request::builder()
                    .method("PATCH")
                    .uri(format!("/calculations/v1/calculations/{}", mine.id))
                    .header("content-type", "application/json")
                    .body(Body::from(r#"{"b":"20"}"#))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        assert_eq!(json["a"], "10");
        assert_eq!(json["type"], "ADD");
        assert_eq!(json["result"], "30");

        let response = app
            .oneshot(
                Request::builder()
                    .method("PATCH")
                    .uri(format!("/calculations/v1/calculations/{}", Uuid::new_v4()))
                    .header("content-type", "application/json")
                    .body(Body::from(r#"{"b":"20"}"#))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn delete_returns_204() {
        let user = caller();
        let repo = Arc::new(InMemoryRepository::default());
        let mine = seeded_calculation(user.user_id);
        repo.insert(&mine).await.unwrap();
        let app = test_router(Arc::clone(&repo), user);

        let response = app
            .oneshot(
                Request::builder()
                    .method("DELETE")
                    .uri(format!("/calculations/v1/calculations/{}", mine.id))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NO_CONTENT);
        assert!(repo.find_by_id(mine.id).await.unwrap().is_none());
    }
}
