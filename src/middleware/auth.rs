//! Session authentication for page routes.

use std::convert::Infallible;

use axum::{
    extract::{FromRequestParts, Request, State},
    http::{header, request::Parts, HeaderMap, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
};
use axum_extra::extract::cookie::CookieJar;

use crate::errors::AppError;
use crate::models::user::Principal;
use crate::services::auth as auth_service;
use crate::services::session;
use crate::AppState;

/// Cookie holding the session token.
pub const AUTH_COOKIE: &str = "auth_token";

/// Message flashed when authentication fails.
pub const UNAUTHORIZED_MESSAGE: &str = "unauthorized";

/// Principal attached by [`require_principal`], if any.
///
/// Never rejects; handlers decide what a missing principal means.
#[derive(Debug, Clone)]
pub struct MaybePrincipal(pub Option<Principal>);

impl<S: Send + Sync> FromRequestParts<S> for MaybePrincipal {
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(MaybePrincipal(parts.extensions.get::<Principal>().cloned()))
    }
}

/// Middleware: resolve the session token to a principal and attach it.
///
/// Requests without a valid session are sent to the configured error target
/// with an `unauthorized` flash message.
pub async fn require_principal(
    State(state): State<AppState>,
    jar: CookieJar,
    mut request: Request,
    next: Next,
) -> Response {
    match authenticate(&state, request.headers(), &jar).await {
        Ok(principal) => {
            request.extensions_mut().insert(principal);
            next.run(request).await
        }
        Err(err) => {
            tracing::warn!(
                path = %request.uri().path(),
                error = %err,
                "Authentication failed"
            );
            let jar = session::flash_error(jar, UNAUTHORIZED_MESSAGE, &state.config.cookie_path());
            (
                StatusCode::FOUND,
                jar,
                [(header::LOCATION, state.config.error_redirect_target.clone())],
            )
                .into_response()
        }
    }
}

async fn authenticate(
    state: &AppState,
    headers: &HeaderMap,
    jar: &CookieJar,
) -> Result<Principal, AppError> {
    let token = bearer_token(headers)
        .or_else(|| jar.get(AUTH_COOKIE).map(|c| c.value().to_string()))
        .ok_or(AppError::Unauthorized)?;

    let claims = auth_service::validate_token(&token, &state.config.jwt_secret)?;
    let user_id = claims.user_id()?;

    state
        .principals
        .find_principal(user_id)
        .await?
        .ok_or(AppError::Unauthorized)
}

fn bearer_token(headers: &HeaderMap) -> Option<String> {
    headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(|t| t.trim().to_string())
        .filter(|t| !t.is_empty())
}

#[cfg(test)]
mod tests {
    use axum::http::HeaderValue;

    use super::*;

    #[test]
    fn bearer_token_extraction() {
        let mut headers = HeaderMap::new();
        assert_eq!(bearer_token(&headers), None);

        headers.insert(header::AUTHORIZATION, HeaderValue::from_static("Basic abc"));
        assert_eq!(bearer_token(&headers), None);

        headers.insert(header::AUTHORIZATION, HeaderValue::from_static("Bearer abc.def"));
        assert_eq!(bearer_token(&headers).as_deref(), Some("abc.def"));

        headers.insert(header::AUTHORIZATION, HeaderValue::from_static("Bearer "));
        assert_eq!(bearer_token(&headers), None);
    }
}
