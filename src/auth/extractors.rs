use std::convert::Infallible;

use axum::{
    async_trait,
    extract::{FromRef, FromRequestParts},
    http::{header, request::Parts, HeaderMap},
};
use tower_cookies::Cookie;
use tracing::{debug, Span};

use super::{claims::Identity, jwt::JwtKeys};
use crate::error::AppError;

/// Name of the cookie carrying the auth token.
pub const TOKEN_COOKIE: &str = "token";

/// Finds a raw token: the `token` cookie wins over an `Authorization: Bearer` header.
pub fn token_from_headers(headers: &HeaderMap) -> Option<String> {
    let from_cookie = headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .flat_map(Cookie::split_parse)
        .filter_map(Result::ok)
        .find(|c| c.name() == TOKEN_COOKIE && !c.value().is_empty())
        .map(|c| c.value().to_string());
    if from_cookie.is_some() {
        return from_cookie;
    }

    let auth = headers
        .get(header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok())?;
    let (scheme, token) = auth.split_once(' ')?;
    let token = token.trim();
    if scheme.eq_ignore_ascii_case("bearer") && !token.is_empty() {
        Some(token.to_string())
    } else {
        None
    }
}

/// Resolves the caller's identity, or `None` when no valid token is present.
pub fn identity_from_headers(headers: &HeaderMap, keys: &JwtKeys) -> Option<Identity> {
    let token = token_from_headers(headers)?;
    match keys.verify(&token) {
        Ok(identity) => Some(identity),
        Err(e) => {
            debug!(error = %e, "rejected token");
            None
        }
    }
}

/// The caller's identity if a valid token was supplied. Never rejects.
pub struct MaybeAuthUser(pub Option<Identity>);

#[async_trait]
impl<S> FromRequestParts<S> for MaybeAuthUser
where
    S: Send + Sync,
    JwtKeys: FromRef<S>,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let keys = JwtKeys::from_ref(state);
        Ok(MaybeAuthUser(identity_from_headers(&parts.headers, &keys)))
    }
}

/// Extracts and validates the token, rejecting with 401 when absent or invalid.
pub struct AuthUser(pub Identity);

#[async_trait]
impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
    JwtKeys: FromRef<S>,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let MaybeAuthUser(identity) = MaybeAuthUser::from_request_parts(parts, state)
            .await
            .unwrap_or(MaybeAuthUser(None));
        let identity = identity.ok_or_else(AppError::unauthorized)?;
        Span::current().record("user_id", tracing::field::display(identity.user_id));
        Ok(AuthUser(identity))
    }
}
