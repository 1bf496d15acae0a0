use sqlx::{QueryBuilder, Sqlite, SqlitePool};

use crate::pipeline::{HourlyReading, IngestError};
use crate::sinks::map_insert_error;

/// Writes staged generation readings for one source, same contract as the
/// load sink: one transaction per upload, duplicates roll everything back.
pub struct GenerationDataSink {
    pool: SqlitePool,
    batch_size: usize,
}

impl GenerationDataSink {
    pub fn new(pool: SqlitePool, batch_size: usize) -> Self {
        Self { pool, batch_size }
    }

    pub async fn insert(
        &self,
        source_id: i64,
        readings: &[HourlyReading],
    ) -> Result<u64, IngestError> {
        if readings.is_empty() {
            return Ok(0);
        }

        let mut tx = self.pool.begin().await?;
        for chunk in readings.chunks(self.batch_size.max(1)) {
            let mut builder = QueryBuilder::<Sqlite>::new(
                "INSERT INTO generation_data (timestamp, generation_mw, source_id) ",
            );
            builder.push_values(chunk, |mut b, reading| {
                b.push_bind(reading.timestamp)
                    .push_bind(reading.value_mw)
                    .push_bind(source_id);
            });

            if let Err(e) = builder.build().execute(&mut *tx).await {
                return Err(map_insert_error(e));
            }
        }
        tx.commit().await?;

        let counter = metrics::counter!("generation_rows_ingested_total");
        counter.increment(readings.len() as u64);

        Ok(readings.len() as u64)
    }
}
