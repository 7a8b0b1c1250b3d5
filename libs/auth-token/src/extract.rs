use std::sync::Arc;

use api_problem::{Problem, unauthorized};
use axum::extract::FromRequestParts;
use axum::http::header;
use axum::http::request::Parts;
use uuid::Uuid;

use crate::codec::{AuthTokenError, TokenCodec};

/// The authenticated caller, extracted from the `Authorization` header.
///
/// Handler tests may bypass token validation by inserting an `AuthUser`
/// extension directly; the extractor prefers it when present.
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub user_id: Uuid,
    pub username: String,
}

fn bearer_token(parts: &Parts) -> Option<&str> {
    let value = parts.headers.get(header::AUTHORIZATION)?.to_str().ok()?;
    let token = value.strip_prefix("Bearer ").unwrap_or(value).trim();
    if token.is_empty() { None } else { Some(token) }
}

impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = Problem;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        if let Some(user) = parts.extensions.get::<AuthUser>() {
            return Ok(user.clone());
        }

        let codec = parts
            .extensions
            .get::<Arc<TokenCodec>>()
            .cloned()
            .ok_or_else(|| unauthorized("Authentication is not configured"))?;

        let token = bearer_token(parts)
            .ok_or_else(|| unauthorized("Missing Authorization header"))?;

        let claims = codec.verify(token).map_err(|e| match e {
            AuthTokenError::Expired => unauthorized("Token has expired"),
            _ => unauthorized("Invalid access token"),
        })?;

        Ok(Self {
            user_id: claims.sub,
            username: claims.username,
        })
    }
}
