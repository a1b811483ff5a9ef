use keycard::config::Config;
use keycard_user::{SqliteUserStore, UserError};

pub async fn create(config: Config, email: String, password: String) -> anyhow::Result<()> {
    let pool = keycard::db::create_pool(&config.database.url, 1).await?;
    let store = SqliteUserStore::new(pool.clone());

    match store.create(&email, &password).await {
        Ok(user) => tracing::info!(user_id = %user.id, "{} created", user.email),
        Err(UserError::EmailAlreadyExists) => tracing::error!("user {email} already exists"),
        Err(e) => return Err(e.into()),
    }

    pool.close().await;

    Ok(())
}
