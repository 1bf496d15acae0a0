//! Query façade for the chart dashboard: selects the requested meters and
//! generation sources, runs the monthly-hour aggregation and shapes the result
//! into the nested mapping the chart code consumes.

use std::collections::BTreeMap;
use std::fmt;

use anyhow::Result;
use serde::Serialize;
use sqlx::SqlitePool;

use crate::db::{generation_queries, load_queries};

/// Aggregation key: calendar month (01-12) plus hour of day (00-23), year and
/// day-of-month ignored. The `"MM-HH"` string form exists only at the
/// serialization boundary; consumers must treat it as opaque.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct HourBucket {
    pub month: u8,
    pub hour: u8,
}

impl HourBucket {
    pub fn new(month: u8, hour: u8) -> Self {
        Self { month, hour }
    }
}

impl fmt::Display for HourBucket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}-{:02}", self.month, self.hour)
    }
}

/// Chart-ready aggregates. Load pools every requested meter into one series;
/// generation keeps one series per source name inside each bucket.
#[derive(Debug, Default, Serialize)]
pub struct DashboardData {
    pub load: BTreeMap<String, f64>,
    pub generation: BTreeMap<String, BTreeMap<String, f64>>,
}

/// Fetch the monthly-hour averages for the given meter and source id sets.
/// Empty id sets short-circuit to empty mappings without touching the
/// database.
pub async fn dashboard_data(
    pool: &SqlitePool,
    meter_ids: &[i64],
    source_ids: &[i64],
) -> Result<DashboardData> {
    let mut data = DashboardData::default();

    if !meter_ids.is_empty() {
        for row in load_queries::monthly_hour_averages(pool, meter_ids).await? {
            let bucket = HourBucket::new(row.month, row.hour);
            data.load.insert(bucket.to_string(), row.avg_mw);
        }
    }

    if !source_ids.is_empty() {
        for row in generation_queries::monthly_hour_averages(pool, source_ids).await? {
            let bucket = HourBucket::new(row.month, row.hour);
            data.generation
                .entry(bucket.to_string())
                .or_default()
                .insert(row.source_name, row.avg_mw);
        }
    }

    Ok(data)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{generation_sources, meters, schema};
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

    #[test]
    fn bucket_labels_are_zero_padded() {
        assert_eq!(HourBucket::new(7, 14).to_string(), "07-14");
        assert_eq!(HourBucket::new(12, 0).to_string(), "12-00");
    }

    #[tokio::test]
    async fn empty_id_sets_return_empty_mappings() {
        let pool = pool().await;
        let data = dashboard_data(&pool, &[], &[]).await.unwrap();
        assert!(data.load.is_empty());
        assert!(data.generation.is_empty());
    }

    #[tokio::test]
    async fn load_series_is_pooled_and_generation_stays_per_source() {
        let pool = pool().await;
        let meter = meters::insert(&pool, "m", None).await.unwrap();
        let solar = generation_sources::insert(&pool, "Solar", Some("solar"))
            .await
            .unwrap();
        let wind = generation_sources::insert(&pool, "Wind", Some("wind"))
            .await
            .unwrap();

        for (ts, mw) in [
            (datetime!(2022-07-01 14:00:00), 10.0),
            (datetime!(2023-07-02 14:00:00), 20.0),
            (datetime!(2024-07-03 14:00:00), 30.0),
        ] {
            sqlx::query("INSERT INTO load_data (timestamp, load_mw, meter_id) VALUES (?, ?, ?)")
                .bind(ts)
                .bind(mw)
                .bind(meter.id)
                .execute(&pool)
                .await
                .unwrap();
        }
        for (source_id, mw) in [(solar.id, 5.0), (wind.id, 8.0)] {
            sqlx::query(
                "INSERT INTO generation_data (timestamp, generation_mw, source_id) VALUES (?, ?, ?)",
            )
            .bind(datetime!(2024-07-01 14:00:00))
            .bind(mw)
            .bind(source_id)
            .execute(&pool)
            .await
            .unwrap();
        }

        let data = dashboard_data(&pool, &[meter.id], &[solar.id, wind.id])
            .await
            .unwrap();

        assert_eq!(data.load.len(), 1);
        assert_eq!(data.load["07-14"], 20.0);

        let bucket = &data.generation["07-14"];
        assert_eq!(bucket["Solar"], 5.0);
        assert_eq!(bucket["Wind"], 8.0);

        let json = serde_json::to_value(&data).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "load": { "07-14": 20.0 },
                "generation": { "07-14": { "Solar": 5.0, "Wind": 8.0 } },
            })
        );
    }
}
