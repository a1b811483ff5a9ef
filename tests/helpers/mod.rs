#![allow(dead_code)]

use std::sync::Arc;

use axum::{
    Router,
    body::Body,
    http::{Request, Response},
};
use http_body_util::BodyExt;
use keycard::{AppState, auth::SessionKeys};
use keycard_user::{SqliteUserStore, User};
use serde_json::Value;
use sqlx::SqlitePool;

pub const TEST_SECRET: &str = "test_secret_key_minimum_32_characters_long";

pub struct TestApp {
    pub router: Router,
    pub keys: Arc<SessionKeys>,
    pub store: SqliteUserStore,
    pub pool: SqlitePool,
}

impl TestApp {
    pub async fn create_user(&self, email: &str, password: &str) -> User {
        self.store.create(email, password).await.unwrap()
    }

    /// Token for `user_id` signed with the application's key
    pub fn token_for(&self, user_id: &str) -> String {
        let (_, token) = self
            .keys
            .issue(user_id, axum_extra::extract::cookie::CookieJar::new())
            .unwrap();

        token
    }
}

/// Set up an app in production mode backed by an in-memory database
pub async fn create_test_app() -> TestApp {
    create_test_app_with_mode(false).await
}

pub async fn create_test_app_with_mode(development: bool) -> TestApp {
    let pool = keycard::db::create_pool("sqlite::memory:", 1).await.unwrap();
    keycard_db::migrate(&pool).await.unwrap();

    let keys = Arc::new(
        SessionKeys::new(TEST_SECRET, time::Duration::days(7), !development).unwrap(),
    );
    let store = SqliteUserStore::new(pool.clone());

    let router = keycard::router(AppState {
        keys: keys.clone(),
        users: Arc::new(store.clone()),
        pool: pool.clone(),
    });

    TestApp {
        router,
        keys,
        store,
        pool,
    }
}

pub fn get_with_cookie(uri: &str, cookie: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method("GET").uri(uri);
    if let Some(cookie) = cookie {
        builder = builder.header("cookie", cookie);
    }

    builder.body(Body::empty()).unwrap()
}

pub fn post_json(uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

pub async fn body_json(response: Response<Body>) -> Value {
    let body = response.into_body().collect().await.unwrap().to_bytes();

    serde_json::from_slice(&body).unwrap()
}

pub fn set_cookie(response: &Response<Body>) -> String {
    response
        .headers()
        .get("set-cookie")
        .unwrap()
        .to_str()
        .unwrap()
        .to_owned()
}
