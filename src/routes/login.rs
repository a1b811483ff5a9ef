use std::sync::LazyLock;

use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
};
use axum_extra::extract::cookie::CookieJar;
use keycard_user::{
    User,
    password::{hash_password, verify_password},
};
use serde::Deserialize;
use serde_json::{Value, json};

use crate::error::AppError;
use crate::routes::AppState;

#[derive(Deserialize)]
pub struct ActionInput {
    pub email: String,
    pub password: String,
}

// Verified against on unknown emails so both misses cost one argon2 run
static DUMMY_HASH: LazyLock<Option<String>> =
    LazyLock::new(|| hash_password("keycard-unknown-user").ok());

/// POST /auth/login - check credentials and start a session
pub async fn action(
    State(state): State<AppState>,
    jar: CookieJar,
    input: Result<Json<ActionInput>, JsonRejection>,
) -> Result<(CookieJar, Json<User>), AppError> {
    let Json(input) = input.map_err(|e| AppError::InvalidInput(e.body_text()))?;

    let Some(login) = state.users.find_login_by_email(&input.email).await? else {
        if let Some(hash) = DUMMY_HASH.as_ref() {
            let _ = verify_password(&input.password, hash);
        }

        tracing::debug!("Login attempt for unknown email");
        return Err(AppError::InvalidCredentials);
    };

    if !verify_password(&input.password, &login.password)? {
        tracing::debug!(user_id = %login.id, "Login attempt with wrong password");
        return Err(AppError::InvalidCredentials);
    }

    let (jar, _token) = state.keys.issue(&login.id, jar)?;

    tracing::info!(user_id = %login.id, "User logged in");

    Ok((jar, Json(login.into())))
}

/// POST /auth/logout - drop the session cookie
pub async fn logout(State(state): State<AppState>, jar: CookieJar) -> (CookieJar, Json<Value>) {
    (
        state.keys.clear(jar),
        Json(json!({ "message": "Logged out successfully" })),
    )
}
