use sqlx::SqlitePool;
use sqlx_migrator::{Info, Migrate, Migrator, Plan, vec_box};

mod m0_1;
pub mod table;

pub fn migrator() -> Result<Migrator<sqlx::Sqlite>, sqlx_migrator::Error> {
    let mut migrator = Migrator::default();
    migrator.add_migrations(vec_box![m0_1::Migration])?;

    Ok(migrator)
}

/// Apply every pending migration on the given pool
pub async fn migrate(pool: &SqlitePool) -> anyhow::Result<()> {
    let mut conn = pool.acquire().await?;
    migrator()?.run(&mut *conn, &Plan::apply_all()).await?;

    Ok(())
}
