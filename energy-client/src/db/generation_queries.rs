use anyhow::Result;
use sqlx::{QueryBuilder, Sqlite, SqlitePool};

/// Mean generation for one `(month, hour)` bucket of one source. Unlike load,
/// generation keeps a distinct series per source name.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct SourceMonthlyHourAvg {
    pub source_name: String,
    pub month: u8,
    pub hour: u8,
    pub avg_mw: f64,
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct SourceHourOfYearAvg {
    pub source_name: String,
    pub hour_of_year: u16,
    pub avg_mw: f64,
}

/// Calendar year of the most recent generation reading, across all sources.
pub async fn latest_year(pool: &SqlitePool) -> Result<Option<i32>> {
    let year: Option<i32> = sqlx::query_scalar(
        "SELECT CAST(strftime('%Y', MAX(timestamp)) AS INTEGER) FROM generation_data",
    )
    .fetch_one(pool)
    .await?;

    Ok(year)
}

fn window_floor(latest_year: i32) -> String {
    format!("{:04}", latest_year - 2)
}

/// Average generation per `(source, month, hour)` over the trailing 3-year
/// window. One series per source; ordered by month, then hour.
pub async fn monthly_hour_averages(
    pool: &SqlitePool,
    source_ids: &[i64],
) -> Result<Vec<SourceMonthlyHourAvg>> {
    if source_ids.is_empty() {
        return Ok(Vec::new());
    }
    let Some(year) = latest_year(pool).await? else {
        return Ok(Vec::new());
    };

    let mut builder = QueryBuilder::<Sqlite>::new(
        "SELECT gs.name AS source_name, \
                CAST(strftime('%m', gd.timestamp) AS INTEGER) AS month, \
                CAST(strftime('%H', gd.timestamp) AS INTEGER) AS hour, \
                AVG(gd.generation_mw) AS avg_mw \
         FROM generation_data gd \
         JOIN generation_sources gs ON gs.id = gd.source_id \
         WHERE strftime('%Y', gd.timestamp) >= ",
    );
    builder.push_bind(window_floor(year));
    builder.push(" AND gd.source_id IN (");
    let mut ids = builder.separated(", ");
    for id in source_ids {
        ids.push_bind(*id);
    }
    ids.push_unseparated(") ");
    builder.push("GROUP BY gs.name, month, hour ORDER BY month, hour");

    let rows = builder
        .build_query_as::<SourceMonthlyHourAvg>()
        .fetch_all(pool)
        .await?;

    Ok(rows)
}

/// Average generation per `(source, hour_of_year)` over the same window.
#[deprecated(note = "superseded by monthly_hour_averages; kept for old dashboard exports")]
pub async fn hour_of_year_averages(
    pool: &SqlitePool,
    source_ids: &[i64],
) -> Result<Vec<SourceHourOfYearAvg>> {
    if source_ids.is_empty() {
        return Ok(Vec::new());
    }
    let Some(year) = latest_year(pool).await? else {
        return Ok(Vec::new());
    };

    let mut builder = QueryBuilder::<Sqlite>::new(
        "SELECT gs.name AS source_name, \
                (CAST(strftime('%j', gd.timestamp) AS INTEGER) - 1) * 24 \
                + CAST(strftime('%H', gd.timestamp) AS INTEGER) AS hour_of_year, \
                AVG(gd.generation_mw) AS avg_mw \
         FROM generation_data gd \
         JOIN generation_sources gs ON gs.id = gd.source_id \
         WHERE strftime('%Y', gd.timestamp) >= ",
    );
    builder.push_bind(window_floor(year));
    builder.push(" AND gd.source_id IN (");
    let mut ids = builder.separated(", ");
    for id in source_ids {
        ids.push_bind(*id);
    }
    ids.push_unseparated(") ");
    builder.push("GROUP BY gs.name, hour_of_year ORDER BY hour_of_year");

    let rows = builder
        .build_query_as::<SourceHourOfYearAvg>()
        .fetch_all(pool)
        .await?;

    Ok(rows)
}
