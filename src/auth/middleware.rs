//! Authentication middleware for Axum

use axum::{
    extract::{FromRequestParts, Request, State},
    http::request::Parts,
    middleware::Next,
    response::{IntoResponse, Response},
};
use axum_extra::extract::cookie::CookieJar;
use tracing::debug;

use super::AUTH_COOKIE_NAME;
use crate::error::AuthError;
use crate::routes::AppState;

/// User attached to a request once the session token has been checked
#[derive(Debug, Clone)]
pub struct AuthUser(pub keycard_user::User);

/// Resolve the session cookie of a request to a user
///
/// Runs extract, verify and resolve in that order and stops at the first failure.
pub async fn authenticate(state: &AppState, jar: &CookieJar) -> Result<AuthUser, AuthError> {
    let token = jar
        .get(AUTH_COOKIE_NAME)
        .map(|cookie| cookie.value())
        .filter(|value| !value.is_empty())
        .ok_or(AuthError::MissingToken)?;

    let claims = state.keys.verify(token)?;

    let Some(user) = state.users.find_by_id(&claims.user_id).await? else {
        debug!(user_id = %claims.user_id, "Session token refers to a missing user");
        return Err(AuthError::UserNotFound);
    };

    Ok(AuthUser(user))
}

/// Route layer guarding protected handlers
///
/// On success the user is inserted into the request extensions before the
/// next handler runs. On failure the chain stops with the gate's error response.
pub async fn protect_route(
    State(state): State<AppState>,
    jar: CookieJar,
    mut request: Request,
    next: Next,
) -> Response {
    match authenticate(&state, &jar).await {
        Ok(user) => {
            debug!(user_id = %user.0.id, "User authenticated");
            request.extensions_mut().insert(user);

            next.run(request).await
        }
        Err(e) => e.into_response(),
    }
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AuthError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        // Already resolved by protect_route
        if let Some(user) = parts.extensions.get::<AuthUser>() {
            return Ok(user.clone());
        }

        let jar = CookieJar::from_headers(&parts.headers);

        authenticate(state, &jar).await
    }
}
