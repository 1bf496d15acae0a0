use serde::Deserialize;
use std::fs;

#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    pub uri: String,
    pub max_connections: u32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct IngestConfig {
    /// Rows per multi-row INSERT statement. All chunks of one upload still
    /// share a single transaction.
    pub batch_size: usize,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub database: DatabaseConfig,
    pub ingest: IngestConfig,
}

impl AppConfig {
    pub fn load() -> anyhow::Result<Self> {
        use std::env;

        let path = env::var("REPORTING_CONFIG").unwrap_or_else(|_| "reporting-config.toml".to_string());
        let contents = fs::read_to_string(&path)?;
        let cfg: AppConfig = toml::from_str(&contents)?;
        Ok(cfg)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_full_config() {
        let cfg: AppConfig = toml::from_str(
            r#"
            [database]
            uri = "sqlite://energy.db"
            max_connections = 5

            [ingest]
            batch_size = 250
            "#,
        )
        .unwrap();

        assert_eq!(cfg.database.max_connections, 5);
        assert_eq!(cfg.ingest.batch_size, 250);
    }
}
