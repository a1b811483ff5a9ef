use keycard::config::Config;

pub async fn migrate(config: Config) -> anyhow::Result<()> {
    tracing::info!("Running database migrations...");

    let pool = keycard::db::create_pool(&config.database.url, 1).await?;
    keycard_db::migrate(&pool).await?;
    pool.close().await;

    tracing::info!("Migrations completed successfully");

    Ok(())
}
