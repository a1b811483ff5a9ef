use std::{path::PathBuf, str::FromStr};

use keycard_user::{SqliteUserStore, User};
use sqlx::{SqlitePool, sqlite::SqliteConnectOptions};

pub struct TestState {
    pub pool: SqlitePool,
    pub store: SqliteUserStore,
}

pub async fn setup_test_state(path: PathBuf) -> anyhow::Result<TestState> {
    let opts = SqliteConnectOptions::from_str(&format!("sqlite:{}", path.to_str().unwrap()))?
        .create_if_missing(true);
    let pool = SqlitePool::connect_with(opts).await?;
    keycard_db::migrate(&pool).await?;

    Ok(TestState {
        store: SqliteUserStore::new(pool.clone()),
        pool,
    })
}

#[allow(dead_code)]
pub async fn create_user(state: &TestState, email: &str) -> anyhow::Result<User> {
    Ok(state.store.create(email, "my_password").await?)
}
