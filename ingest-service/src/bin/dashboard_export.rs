use anyhow::{bail, Context, Result};
use energy_client::dashboard;
use ingest_service::{config::AppConfig, observability};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use std::{env, str::FromStr};

fn parse_ids(arg: &str) -> Result<Vec<i64>> {
    if arg == "-" {
        return Ok(Vec::new());
    }
    arg.split(',')
        .map(|part| {
            part.trim()
                .parse::<i64>()
                .with_context(|| format!("invalid id '{part}'"))
        })
        .collect()
}

/// Print the chart-ready monthly-hour averages as JSON. Ids are
/// comma-separated; pass `-` for an empty set.
#[tokio::main]
async fn main() -> Result<()> {
    observability::init_tracing();

    let args: Vec<String> = env::args().collect();
    if args.len() < 3 {
        bail!("usage: dashboard_export <meter_ids|-> <source_ids|->");
    }
    let meter_ids = parse_ids(&args[1])?;
    let source_ids = parse_ids(&args[2])?;

    let cfg = AppConfig::load()?;

    let options = SqliteConnectOptions::from_str(&cfg.database.uri)?;
    let pool = SqlitePoolOptions::new()
        .max_connections(cfg.database.max_connections)
        .connect_with(options)
        .await?;

    let data = dashboard::dashboard_data(&pool, &meter_ids, &source_ids).await?;
    println!("{}", serde_json::to_string_pretty(&data)?);

    Ok(())
}
