use anyhow::Result;
use energy_client::db::schema;
use ingest_service::{config::AppConfig, observability};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use std::str::FromStr;

#[tokio::main]
async fn main() -> Result<()> {
    observability::init_tracing();

    let cfg = AppConfig::load()?;

    let options = SqliteConnectOptions::from_str(&cfg.database.uri)?.create_if_missing(true);
    let pool = SqlitePoolOptions::new()
        .max_connections(cfg.database.max_connections)
        .connect_with(options)
        .await?;

    schema::create_schema(&pool).await?;
    tracing::info!(uri = %cfg.database.uri, "schema created");

    Ok(())
}
