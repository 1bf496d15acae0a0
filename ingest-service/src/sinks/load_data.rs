use sqlx::{QueryBuilder, Sqlite, SqlitePool};

use crate::pipeline::{HourlyReading, IngestError};
use crate::sinks::map_insert_error;

/// Writes staged load readings for one meter. The whole upload shares a
/// single transaction; `batch_size` only bounds rows per INSERT statement.
pub struct LoadDataSink {
    pool: SqlitePool,
    batch_size: usize,
}

impl LoadDataSink {
    pub fn new(pool: SqlitePool, batch_size: usize) -> Self {
        Self { pool, batch_size }
    }

    /// Insert the batch in file order, all-or-nothing. A duplicate
    /// `(timestamp, meter_id)` pair anywhere in the batch rolls everything
    /// back and reports `DuplicateData`.
    pub async fn insert(
        &self,
        meter_id: i64,
        readings: &[HourlyReading],
    ) -> Result<u64, IngestError> {
        if readings.is_empty() {
            return Ok(0);
        }

        let mut tx = self.pool.begin().await?;
        for chunk in readings.chunks(self.batch_size.max(1)) {
            let mut builder = QueryBuilder::<Sqlite>::new(
                "INSERT INTO load_data (timestamp, load_mw, meter_id) ",
            );
            builder.push_values(chunk, |mut b, reading| {
                b.push_bind(reading.timestamp)
                    .push_bind(reading.value_mw)
                    .push_bind(meter_id);
            });

            if let Err(e) = builder.build().execute(&mut *tx).await {
                // Dropping the transaction rolls the earlier chunks back too.
                return Err(map_insert_error(e));
            }
        }
        tx.commit().await?;

        let counter = metrics::counter!("load_rows_ingested_total");
        counter.increment(readings.len() as u64);

        Ok(readings.len() as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use energy_client::db::{meters, schema};
    use sqlx::sqlite::SqlitePoolOptions;
    use time::macros::datetime;

    async fn pool() -> SqlitePool {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await
            .unwrap();
        schema::create_schema(&pool).await.unwrap();
        pool
    }

    async fn row_count(pool: &SqlitePool) -> i64 {
        sqlx::query_scalar("SELECT COUNT(*) FROM load_data")
            .fetch_one(pool)
            .await
            .unwrap()
    }

    fn readings(n: u8) -> Vec<HourlyReading> {
        (0..n)
            .map(|h| HourlyReading {
                timestamp: datetime!(2024-07-01 00:00:00) + time::Duration::hours(h as i64),
                value_mw: f64::from(h),
            })
            .collect()
    }

    #[tokio::test]
    async fn persists_one_row_per_reading() {
        let pool = pool().await;
        let meter = meters::insert(&pool, "m", None).await.unwrap();
        let sink = LoadDataSink::new(pool.clone(), 250);

        let committed = sink.insert(meter.id, &readings(3)).await.unwrap();
        assert_eq!(committed, 3);
        assert_eq!(row_count(&pool).await, 3);

        // Values and timestamps survive the round trip.
        let stored: Vec<(time::PrimitiveDateTime, f64)> = sqlx::query_as(
            "SELECT timestamp, load_mw FROM load_data ORDER BY timestamp",
        )
        .fetch_all(&pool)
        .await
        .unwrap();
        assert_eq!(stored[1].0, datetime!(2024-07-01 01:00:00));
        assert_eq!(stored[1].1, 1.0);
    }

    #[tokio::test]
    async fn duplicate_against_existing_rows_rolls_back() {
        let pool = pool().await;
        let meter = meters::insert(&pool, "m", None).await.unwrap();
        let sink = LoadDataSink::new(pool.clone(), 250);

        sink.insert(meter.id, &readings(2)).await.unwrap();

        // Overlaps on the second hour only; still nothing new may land.
        let three = readings(3);
        let err = sink.insert(meter.id, &three[1..]).await.unwrap_err();
        assert!(matches!(err, IngestError::DuplicateData));
        assert_eq!(row_count(&pool).await, 2);
    }

    #[tokio::test]
    async fn duplicate_within_the_batch_rolls_back() {
        let pool = pool().await;
        let meter = meters::insert(&pool, "m", None).await.unwrap();
        let sink = LoadDataSink::new(pool.clone(), 250);

        let mut batch = readings(2);
        batch.push(batch[0]);

        let err = sink.insert(meter.id, &batch).await.unwrap_err();
        assert!(matches!(err, IngestError::DuplicateData));
        assert_eq!(row_count(&pool).await, 0);
    }

    #[tokio::test]
    async fn rollback_spans_chunk_boundaries() {
        let pool = pool().await;
        let meter = meters::insert(&pool, "m", None).await.unwrap();
        // Tiny chunks: 5 readings become 3 INSERT statements.
        let sink = LoadDataSink::new(pool.clone(), 2);

        let mut batch = readings(5);
        batch.push(batch[0]); // duplicate lands in the last chunk

        let err = sink.insert(meter.id, &batch).await.unwrap_err();
        assert!(matches!(err, IngestError::DuplicateData));
        assert_eq!(row_count(&pool).await, 0);
    }

    #[tokio::test]
    async fn same_timestamp_on_another_meter_is_fine() {
        let pool = pool().await;
        let a = meters::insert(&pool, "a", None).await.unwrap();
        let b = meters::insert(&pool, "b", None).await.unwrap();
        let sink = LoadDataSink::new(pool.clone(), 250);

        sink.insert(a.id, &readings(1)).await.unwrap();
        sink.insert(b.id, &readings(1)).await.unwrap();
        assert_eq!(row_count(&pool).await, 2);
    }

    #[tokio::test]
    async fn empty_batch_is_a_no_op() {
        let pool = pool().await;
        let meter = meters::insert(&pool, "m", None).await.unwrap();
        let sink = LoadDataSink::new(pool.clone(), 250);

        assert_eq!(sink.insert(meter.id, &[]).await.unwrap(), 0);
        assert_eq!(row_count(&pool).await, 0);
    }
}
