use chrono::{Duration, Utc};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, thiserror::Error)]
pub enum AuthTokenError {
    #[error("Token has expired")]
    Expired,

    #[error("Invalid token")]
    Invalid,

    #[error("Token signing failed: {0}")]
    Signing(#[from] jsonwebtoken::errors::Error),
}

/// Claims carried by an abacus access token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Owning user id.
    pub sub: Uuid,
    /// Username at issue time, for log context only.
    pub username: String,
    /// Issued-at, seconds since epoch.
    pub iat: i64,
    /// Expiry, seconds since epoch.
    pub exp: i64,
}

/// Signs and validates HS256 access tokens.
///
/// Built once at startup from the configured secret and shared behind an
/// `Arc` by the router.
pub struct TokenCodec {
    encoding: EncodingKey,
    decoding: DecodingKey,
    ttl: Duration,
}

impl TokenCodec {
    pub fn new(secret: &SecretString, ttl: Duration) -> Self {
        let bytes = secret.expose_secret().as_bytes();
        Self {
            encoding: EncodingKey::from_secret(bytes),
            decoding: DecodingKey::from_secret(bytes),
            ttl,
        }
    }

    /// Issue a token for the given user.
    ///
    /// # Errors
    /// Returns [`AuthTokenError::Signing`] if serialization of the claims
    /// fails, which only happens on key misconfiguration.
    pub fn issue(&self, user_id: Uuid, username: &str) -> Result<String, AuthTokenError> {
        let now = Utc::now();
        let claims = Claims {
            sub: user_id,
            username: username.to_owned(),
            iat: now.timestamp(),
            exp: (now + self.ttl).timestamp(),
        };
        Ok(encode(&Header::default(), &claims, &self.encoding)?)
    }

    /// Validate a token and return its claims.
    ///
    /// # Errors
    /// [`AuthTokenError::Expired`] for expired tokens, [`AuthTokenError::Invalid`]
    /// for anything else that fails signature or shape validation.
    pub fn verify(&self, token: &str) -> Result<Claims, AuthTokenError> {
        let validation = Validation::default();
        match decode::<Claims>(token, &self.decoding, &validation) {
            Ok(data) => Ok(data.claims),
            Err(e) => match e.kind() {
                jsonwebtoken::errors::ErrorKind::ExpiredSignature => Err(AuthTokenError::Expired),
                _ => {
                    tracing::debug!(error = %e, "token validation failed");
                    Err(AuthTokenError::Invalid)
                }
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn codec(ttl_secs: i64) -> TokenCodec {
        TokenCodec::new(
            &SecretString::from("test-secret-not-for-production".to_owned()),
            Duration::seconds(ttl_secs),
        )
    }

    #[test]
    fn issue_then_verify_round_trips_claims() {
        let codec = codec(3600);
        let user_id = Uuid::new_v4();

        let token = codec.issue(user_id, "alice").unwrap();
        let claims = codec.verify(&token).unwrap();

        assert_eq!(claims.sub, user_id);
        assert_eq!(claims.username, "alice");
        assert!(claims.exp > claims.iat);
    }

    #[test]
    fn expired_token_is_rejected() {
        let codec = codec(-120);
        let token = codec.issue(Uuid::new_v4(), "alice").unwrap();

        assert!(matches!(
            codec.verify(&token),
            Err(AuthTokenError::Expired)
        ));
    }

    #[test]
    fn token_signed_with_other_secret_is_rejected() {
        let other = TokenCodec::new(
            &SecretString::from("a-different-secret".to_owned()),
            Duration::seconds(3600),
        );
        let token = other.issue(Uuid::new_v4(), "mallory").unwrap();

        assert!(matches!(
            codec(3600).verify(&token),
            Err(AuthTokenError::Invalid)
        ));
    }

    #[test]
    fn garbage_is_rejected() {
        assert!(matches!(
            codec(3600).verify("not.a.token"),
            Err(AuthTokenError::Invalid)
        ));
    }
}
