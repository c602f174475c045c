use axum::{
    async_trait,
    extract::{FromRequestParts, Request, State},
    http::{request::Parts, HeaderMap},
    middleware::Next,
    response::Response,
};
use tracing::{debug, warn};
use uuid::Uuid;

use super::jwt::JwtKeys;
use crate::{error::ApiError, state::AppState};

pub const AUTH_HEADER: &str = "x-auth-token";

/// Caller identity placed in the request extensions by [`require_auth`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuthUser(pub Uuid);

/// Reads and verifies the bearer token. Never touches the store.
pub fn authenticate(keys: &JwtKeys, headers: &HeaderMap) -> Result<AuthUser, ApiError> {
    let token = headers
        .get(AUTH_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .ok_or(ApiError::MissingToken)?;

    let claims = keys.verify(token).map_err(|e| {
        warn!(error = %e, "invalid or expired token");
        ApiError::InvalidToken
    })?;

    Ok(AuthUser(claims.user.id))
}

/// Gate for protected routers, attached with `route_layer`.
pub async fn require_auth(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let user = authenticate(&state.keys, req.headers())?;
    debug!(user_id = %user.0, "request authenticated");
    req.extensions_mut().insert(user);
    Ok(next.run(req).await)
}

#[async_trait]
impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<AuthUser>()
            .copied()
            .ok_or(ApiError::MissingToken)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::JwtConfig;
    use axum::http::HeaderValue;

    fn keys() -> JwtKeys {
        JwtKeys::new(&JwtConfig {
            secret: "gate-secret".into(),
            ttl_seconds: 3600,
        })
    }

    #[test]
    fn missing_header_is_missing_token() {
        let err = authenticate(&keys(), &HeaderMap::new()).unwrap_err();
        assert!(matches!(err, ApiError::MissingToken));
    }

    #[test]
    fn blank_header_is_missing_token() {
        let mut headers = HeaderMap::new();
        headers.insert(AUTH_HEADER, HeaderValue::from_static("  "));
        assert!(matches!(
            authenticate(&keys(), &headers),
            Err(ApiError::MissingToken)
        ));
    }

    #[test]
    fn valid_token_yields_identity() {
        let keys = keys();
        let user_id = Uuid::new_v4();
        let mut headers = HeaderMap::new();
        headers.insert(
            AUTH_HEADER,
            HeaderValue::from_str(&keys.issue(user_id).unwrap()).unwrap(),
        );
        assert_eq!(authenticate(&keys, &headers).unwrap(), AuthUser(user_id));
    }

    #[test]
    fn authorization_bearer_header_is_not_consulted() {
        let keys = keys();
        let mut headers = HeaderMap::new();
        let value = format!("Bearer {}", keys.issue(Uuid::new_v4()).unwrap());
        headers.insert(
            axum::http::header::AUTHORIZATION,
            HeaderValue::from_str(&value).unwrap(),
        );
        assert!(matches!(
            authenticate(&keys, &headers),
            Err(ApiError::MissingToken)
        ));
    }

    #[test]
    fn bad_token_is_invalid_token() {
        let mut headers = HeaderMap::new();
        headers.insert(AUTH_HEADER, HeaderValue::from_static("abc.def.ghi"));
        assert!(matches!(
            authenticate(&keys(), &headers),
            Err(ApiError::InvalidToken)
        ));
    }
}
