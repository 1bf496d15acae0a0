use std::{fs::File, io::Read, path::Path};

use sqlx::SqlitePool;
use time::PrimitiveDateTime;

use crate::{
    sinks::{GenerationDataSink, LoadDataSink},
    sources::HourlyCsvSource,
    transform,
};

/// Which data-point table an upload targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IngestKind {
    Load,
    Generation,
}

impl std::str::FromStr for IngestKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "load" => Ok(Self::Load),
            "generation" => Ok(Self::Generation),
            other => Err(format!("unknown ingest kind '{other}', expected load|generation")),
        }
    }
}

/// A validated, staged hourly reading, not yet bound to a target row.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HourlyReading {
    pub timestamp: PrimitiveDateTime,
    pub value_mw: f64,
}

#[derive(Debug, thiserror::Error)]
pub enum IngestError {
    #[error("row {row}: expected 2 columns, found {found}")]
    MalformedRow { row: usize, found: usize },
    #[error("row {row}: {reason}")]
    InvalidValue { row: usize, reason: String },
    #[error("duplicate reading for this target, batch rolled back")]
    DuplicateData,
    #[error("csv read error: {0}")]
    Csv(#[from] csv::Error),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("database error: {0}")]
    Db(#[from] sqlx::Error),
}

/// Runs one upload end to end: parse, validate, commit.
///
/// Validation is fail-fast per row and happens before any database work;
/// persistence is all-or-nothing per upload. On any failure zero rows are
/// persisted and the source file can be re-uploaded unchanged once fixed.
pub struct Ingestor {
    pool: SqlitePool,
    batch_size: usize,
}

impl Ingestor {
    pub fn new(pool: SqlitePool, batch_size: usize) -> Self {
        Self { pool, batch_size }
    }

    /// Ingest a two-column CSV byte stream for one target. Returns the number
    /// of rows committed.
    pub async fn ingest<R: Read>(
        &self,
        kind: IngestKind,
        target_id: i64,
        reader: R,
    ) -> Result<u64, IngestError> {
        // Blocking CSV read; the whole upload is parsed and validated before
        // any database round-trip.
        let rows = HourlyCsvSource::new(reader).rows()?;
        let readings = transform::validate_batch(&rows)?;

        let committed = match kind {
            IngestKind::Load => {
                LoadDataSink::new(self.pool.clone(), self.batch_size)
                    .insert(target_id, &readings)
                    .await?
            }
            IngestKind::Generation => {
                GenerationDataSink::new(self.pool.clone(), self.batch_size)
                    .insert(target_id, &readings)
                    .await?
            }
        };

        tracing::info!(rows = committed, ?kind, target_id, "ingest batch committed");
        Ok(committed)
    }

    pub async fn ingest_path(
        &self,
        kind: IngestKind,
        target_id: i64,
        path: &Path,
    ) -> Result<u64, IngestError> {
        let file = File::open(path)?;
        self.ingest(kind, target_id, file).await
    }
}
