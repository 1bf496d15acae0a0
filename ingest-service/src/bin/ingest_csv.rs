use anyhow::{bail, Result};
use energy_client::db::{generation_sources, meters};
use ingest_service::{
    config::AppConfig,
    observability,
    pipeline::{IngestKind, Ingestor},
};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use std::{env, path::Path, str::FromStr};

#[tokio::main]
async fn main() -> Result<()> {
    observability::init_tracing();

    let args: Vec<String> = env::args().collect();
    if args.len() < 4 {
        bail!("usage: ingest_csv <load|generation> <target_id> <csv_path>");
    }
    let kind: IngestKind = args[1].parse().map_err(|e: String| anyhow::anyhow!(e))?;
    let target_id: i64 = args[2].parse()?;
    let path = Path::new(&args[3]);

    let cfg = AppConfig::load()?;

    let options = SqliteConnectOptions::from_str(&cfg.database.uri)?.create_if_missing(true);
    let pool = SqlitePoolOptions::new()
        .max_connections(cfg.database.max_connections)
        .connect_with(options)
        .await?;

    // Targets are registered separately (see register_target); an unknown id
    // is refused before the file is read.
    match kind {
        IngestKind::Load => {
            if meters::by_id(&pool, target_id).await?.is_none() {
                bail!("no meter with id {target_id}");
            }
        }
        IngestKind::Generation => {
            if generation_sources::by_id(&pool, target_id).await?.is_none() {
                bail!("no generation source with id {target_id}");
            }
        }
    }

    let ingestor = Ingestor::new(pool, cfg.ingest.batch_size);
    let rows = ingestor.ingest_path(kind, target_id, path).await?;
    tracing::info!(rows, path = %path.display(), "ingest complete");

    Ok(())
}
