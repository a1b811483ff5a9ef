use std::sync::Arc;

use axum::{
    Router, middleware,
    routing::{get, post},
};
use keycard_user::UserStore;
use sqlx::SqlitePool;

use crate::auth::{SessionKeys, protect_route};

mod health;
mod login;
mod me;

#[derive(Clone)]
pub struct AppState {
    pub keys: Arc<SessionKeys>,
    pub users: Arc<dyn UserStore>,
    pub pool: SqlitePool,
}

pub fn router(app_state: AppState) -> Router {
    let protected = Router::new()
        .route("/auth/me", get(me::page))
        .route_layer(middleware::from_fn_with_state(
            app_state.clone(),
            protect_route,
        ));

    Router::new()
        // Health check endpoints (no auth required)
        .route("/health", get(health::health))
        .route("/ready", get(health::ready))
        .with_state(app_state.pool.clone())
        .route("/auth/login", post(login::action))
        .route("/auth/logout", post(login::logout))
        .merge(protected)
        .with_state(app_state)
}
