use axum::{
    async_trait,
    extract::{FromRef, FromRequestParts},
    http::{header::AUTHORIZATION, request::Parts},
};
use tracing::warn;

use super::jwt::{AuthError, TokenKeys};
use crate::error::AppError;

/// The caller's identity, resolved from the bearer token.
///
/// Handlers take this as an argument and pass `email` down as the owner of
/// every store call. Owners never come from the request body or query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthUser {
    pub email: String,
}

/// Pulls the token out of an `Authorization: Bearer <token>` value.
pub fn bearer_token(header: &str) -> Option<&str> {
    let (scheme, token) = header.trim().split_once(' ')?;
    let token = token.trim();
    (scheme.eq_ignore_ascii_case("bearer") && !token.is_empty()).then_some(token)
}

/// Resolves a raw credential to an identity. Every failure collapses into
/// `Unauthenticated`; the specific reason is only logged.
pub fn authenticate(keys: &TokenKeys, credential: Option<&str>) -> Result<AuthUser, AppError> {
    let Some(token) = credential else {
        warn!("missing bearer token");
        return Err(AppError::Unauthenticated);
    };
    match keys.verify(token) {
        Ok(claims) => Ok(AuthUser { email: claims.sub }),
        Err(reason) => {
            match reason {
                AuthError::Expired => warn!("expired token"),
                AuthError::BadSignature => warn!("token signature mismatch"),
                AuthError::Malformed => warn!("malformed token"),
                AuthError::InvalidClaims => warn!("token claims rejected"),
            }
            Err(AppError::Unauthenticated)
        }
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
    TokenKeys: FromRef<S>,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let keys = TokenKeys::from_ref(state);
        let credential = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .and_then(bearer_token);
        authenticate(&keys, credential)
    }
}
