use axum::Json;
use keycard_user::User;

use crate::auth::AuthUser;

/// GET /auth/me - the user attached by the auth gate
pub async fn page(AuthUser(user): AuthUser) -> Json<User> {
    Json(user)
}
