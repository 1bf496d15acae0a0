use anyhow::Result;
use sqlx::{QueryBuilder, Sqlite, SqlitePool};

/// Mean load for one `(month-of-year, hour-of-day)` bucket, pooled across all
/// requested meters. Buckets with no contributing rows are absent.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct MonthlyHourAvg {
    pub month: u8,
    pub hour: u8,
    pub avg_mw: f64,
}

/// Mean load keyed by hour-of-year, `(day_of_year - 1) * 24 + hour_of_day`.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct HourOfYearAvg {
    pub hour_of_year: u16,
    pub avg_mw: f64,
}

/// Calendar year of the most recent load reading, across all meters.
/// `None` when the table is empty.
pub async fn latest_year(pool: &SqlitePool) -> Result<Option<i32>> {
    let year: Option<i32> =
        sqlx::query_scalar("SELECT CAST(strftime('%Y', MAX(timestamp)) AS INTEGER) FROM load_data")
            .fetch_one(pool)
            .await?;

    Ok(year)
}

// The reporting window is the three calendar years ending at the latest
// reading, applied as a year-string lower bound: everything from the start of
// `latest_year - 2` onwards.
fn window_floor(latest_year: i32) -> String {
    format!("{:04}", latest_year - 2)
}

/// Average load per `(month, hour)` bucket over the trailing 3-year window,
/// pooled across the given meters. Ordered by month, then hour.
pub async fn monthly_hour_averages(
    pool: &SqlitePool,
    meter_ids: &[i64],
) -> Result<Vec<MonthlyHourAvg>> {
    if meter_ids.is_empty() {
        return Ok(Vec::new());
    }
    let Some(year) = latest_year(pool).await? else {
        return Ok(Vec::new());
    };

    let mut builder = QueryBuilder::<Sqlite>::new(
        "SELECT CAST(strftime('%m', timestamp) AS INTEGER) AS month, \
                CAST(strftime('%H', timestamp) AS INTEGER) AS hour, \
                AVG(load_mw) AS avg_mw \
         FROM load_data \
         WHERE strftime('%Y', timestamp) >= ",
    );
    builder.push_bind(window_floor(year));
    builder.push(" AND meter_id IN (");
    let mut ids = builder.separated(", ");
    for id in meter_ids {
        ids.push_bind(*id);
    }
    ids.push_unseparated(") ");
    builder.push("GROUP BY month, hour ORDER BY month, hour");

    let rows = builder
        .build_query_as::<MonthlyHourAvg>()
        .fetch_all(pool)
        .await?;

    Ok(rows)
}

/// Average load per hour-of-year bucket over the same trailing window.
#[deprecated(note = "superseded by monthly_hour_averages; kept for old dashboard exports")]
pub async fn hour_of_year_averages(
    pool: &SqlitePool,
    meter_ids: &[i64],
) -> Result<Vec<HourOfYearAvg>> {
    if meter_ids.is_empty() {
        return Ok(Vec::new());
    }
    let Some(year) = latest_year(pool).await? else {
        return Ok(Vec::new());
    };

    let mut builder = QueryBuilder::<Sqlite>::new(
        "SELECT (CAST(strftime('%j', timestamp) AS INTEGER) - 1) * 24 \
                + CAST(strftime('%H', timestamp) AS INTEGER) AS hour_of_year, \
                AVG(load_mw) AS avg_mw \
         FROM load_data \
         WHERE strftime('%Y', timestamp) >= ",
    );
    builder.push_bind(window_floor(year));
    builder.push(" AND meter_id IN (");
    let mut ids = builder.separated(", ");
    for id in meter_ids {
        ids.push_bind(*id);
    }
    ids.push_unseparated(") ");
    builder.push("GROUP BY hour_of_year ORDER BY hour_of_year");

    let rows = builder
        .build_query_as::<HourOfYearAvg>()
        .fetch_all(pool)
        .await?;

    Ok(rows)
}
