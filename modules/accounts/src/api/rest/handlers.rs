use std::sync::Arc;

use api_problem::{Problem, internal_error};
use auth_token::{AuthUser, TokenCodec};
use axum::Json;
use axum::extract::Extension;
use axum::http::StatusCode;
use axum::response::IntoResponse;

use crate::domain::service::AccountService;

use super::dto::{LoginRequest, RegisterRequest, TokenDto, UserDto};

#[utoipa::path(
    post,
    path = "/accounts/v1/register",
    tag = "Accounts",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "User registered", body = UserDto),
        (status = 409, description = "Username or email already exists", body = Problem),
        (status = 422, description = "Invalid registration fields", body = Problem),
    ),
)]
pub async fn register(
    Extension(svc): Extension<Arc<AccountService>>,
    Json(req): Json<RegisterRequest>,
) -> Result<impl IntoResponse, Problem> {
    let user = svc.register(req.into()).await?;
    let dto: UserDto = user.into();
    Ok((StatusCode::CREATED, Json(dto)))
}

#[utoipa::path(
    post,
    path = "/accounts/v1/login",
    tag = "Accounts",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Access token issued", body = TokenDto),
        (status = 401, description = "Invalid credentials", body = Problem),
    ),
)]
pub async fn login(
    Extension(svc): Extension<Arc<AccountService>>,
    Extension(codec): Extension<Arc<TokenCodec>>,
    Json(req): Json<LoginRequest>,
) -> Result<Json<TokenDto>, Problem> {
    let user = svc.authenticate(req.into()).await?;
    let access_token = codec.issue(user.id, &user.username).map_err(|e| {
        tracing::error!(error = %e, "token signing failed");
        internal_error("Could not issue access token")
    })?;
    Ok(Json(TokenDto {
        access_token,
        token_type: "bearer".to_owned(),
    }))
}

#[utoipa::path(
    get,
    path = "/accounts/v1/me",
    tag = "Accounts",
    responses(
        (status = 200, description = "The authenticated user", body = UserDto),
        (status = 401, description = "Missing or invalid token", body = Problem),
    ),
    security(("bearer_token" = [])),
)]
pub async fn me(
    user: AuthUser,
    Extension(svc): Extension<Arc<AccountService>>,
) -> Result<Json<UserDto>, Problem> {
    let user = svc.get(user.user_id).await?;
    Ok(Json(user.into()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::User;
    use crate::domain::password::PasswordHasher;
    use crate::domain::repo::UsersRepository;
    use async_trait::async_trait;
    use axum::Router;
    use axum::body::Body;
    use axum::http::Request;
    use axum::routing::{get, post};
    use chrono::Duration;
    use secrecy::SecretString;
    use serde_json::Value;
    use std::collections::HashMap;
    use std::sync::Mutex;
    use tower::ServiceExt as _;
    use uuid::Uuid;

    #[derive(Default)]
    struct InMemoryRepository {
        rows: Mutex<HashMap<Uuid, User>>,
    }

    #[async_trait]
    impl UsersRepository for InMemoryRepository {
        async fn insert(&self, user: &User) -> anyhow::Result<()> {
            self.rows.lock().unwrap().insert(user.id, user.clone());
            Ok(())
        }

        async fn find_by_id(&self, id: Uuid) -> anyhow::Result<Option<User>> {
            Ok(self.rows.lock().unwrap().get(&id).cloned())
        }

        async fn find_by_username(&self, username: &str) -> anyhow::Result<Option<User>> {
            Ok(self
                .rows
                .lock()
                .unwrap()
                .values()
                .find(|u| u.username == username)
                .cloned())
        }

        async fn find_by_username_or_email(
            &self,
            username: &str,
            email: &str,
        ) -> anyhow::Result<Option<User>> {
            Ok(self
                .rows
                .lock()
                .unwrap()
                .values()
                .find(|u| u.username == username || u.email == email)
                .cloned())
        }
    }

    struct PlainHasher;

    impl PasswordHasher for PlainHasher {
        fn hash(&self, plain: &str) -> anyhow::Result<String> {
            Ok(format!("plain:{plain}"))
        }

        fn verify(&self, plain: &str, hash: &str) -> bool {
            hash == format!("plain:{plain}")
        }
    }

    fn test_router() -> Router {
        let service = Arc::new(AccountService::new(
            Arc::new(InMemoryRepository::default()),
            Arc::new(PlainHasher),
        ));
        let codec = Arc::new(TokenCodec::new(
            &SecretString::from("handler-test-secret".to_owned()),
            Duration::seconds(600),
        ));
        Router::new()
            .route("/accounts/v1/register", post(register))
            .route("/accounts/v1/login", post(login))
            .route("/accounts/v1/me", get(me))
            .layer(Extension(service))
            .layer(Extension(codec))
    }

    fn json_request(uri: &str, body: &str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_owned()))
            .unwrap()
    }

    async fn body_json(response: axum::response::Response) -> Value {
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&body).unwrap()
    }

    const ALICE: &str =
        r#"{"username":"alice","email":"alice@example.com","password":"TestPass123"}"#;

    #[tokio::test]
    async fn register_login_me_flow() {
        let app = test_router();

        let response = app
            .clone()
            .oneshot(json_request("/accounts/v1/register", ALICE))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);
        let json = body_json(response).await;
        assert_eq!(json["username"], "alice");
        assert!(json.get("password_hash").is_none());

        let response = app
            .clone()
            .oneshot(json_request(
                "/accounts/v1/login",
                r#"{"username":"alice","password":"TestPass123"}"#,
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        assert_eq!(json["token_type"], "bearer");
        let token = json["access_token"].as_str().unwrap().to_owned();

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/accounts/v1/me")
                    .header("Authorization", format!("Bearer {token}"))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        assert_eq!(json["email"], "alice@example.com");
    }

    #[tokio::test]
    async fn duplicate_registration_conflicts() {
        let app = test_router();

        let response = app
            .clone()
            .oneshot(json_request("/accounts/v1/register", ALICE))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);

        let response = app
            .oneshot(json_request("/accounts/v1/register", ALICE))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CONFLICT);
        let json = body_json(response).await;
        assert_eq!(json["detail"], "Username or email already exists");
    }

    #[tokio::test]
    async fn wrong_password_is_unauthorized() {
        let app = test_router();

        app.clone()
            .oneshot(json_request("/accounts/v1/register", ALICE))
            .await
            .unwrap();

        let response = app
            .oneshot(json_request(
                "/accounts/v1/login",
                r#"{"username":"alice","password":"WrongPass"}"#,
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn invalid_email_is_unprocessable() {
        let app = test_router();

        let response = app
            .oneshot(json_request(
                "/accounts/v1/register",
                r#"{"username":"alice","email":"nope","password":"TestPass123"}"#,
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
        let json = body_json(response).await;
        assert_eq!(json["errors"][0]["field"], "email");
    }

    #[tokio::test]
    async fn me_without_token_is_unauthorized() {
        let app = test_router();

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/accounts/v1/me")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }
}
