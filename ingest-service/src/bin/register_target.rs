use anyhow::{bail, Result};
use energy_client::db::{generation_sources, meters};
use ingest_service::{config::AppConfig, observability};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use std::{env, str::FromStr};

/// Resolve-or-create an upload target. This is the explicit first step of an
/// upload: get (or mint) the id here, then run `ingest_csv` against it.
#[tokio::main]
async fn main() -> Result<()> {
    observability::init_tracing();

    let args: Vec<String> = env::args().collect();
    if args.len() < 3 {
        bail!("usage: register_target <meter|source> <name> [type]");
    }

    let cfg = AppConfig::load()?;

    let options = SqliteConnectOptions::from_str(&cfg.database.uri)?.create_if_missing(true);
    let pool = SqlitePoolOptions::new()
        .max_connections(cfg.database.max_connections)
        .connect_with(options)
        .await?;

    match args[1].as_str() {
        "meter" => {
            let meter = meters::resolve_or_create(&pool, &args[2]).await?;
            tracing::info!(id = meter.id, name = %meter.name, "meter resolved");
            println!("{}", meter.id);
        }
        "source" => {
            let kind = args.get(3).map(String::as_str);
            let source = generation_sources::resolve_or_create(&pool, &args[2], kind).await?;
            tracing::info!(id = source.id, name = %source.name, "generation source resolved");
            println!("{}", source.id);
        }
        other => bail!("unknown target kind '{other}', expected meter|source"),
    }

    Ok(())
}
