use anyhow::Result;
use sqlx::SqlitePool;

use crate::domain::Meter;

pub async fn insert(pool: &SqlitePool, name: &str, building_id: Option<i64>) -> Result<Meter> {
    let result = sqlx::query("INSERT INTO meters (name, building_id) VALUES (?, ?)")
        .bind(name)
        .bind(building_id)
        .execute(pool)
        .await?;

    Ok(Meter {
        id: result.last_insert_rowid(),
        name: name.to_string(),
        building_id,
    })
}

pub async fn by_id(pool: &SqlitePool, id: i64) -> Result<Option<Meter>> {
    let meter = sqlx::query_as::<_, Meter>("SELECT id, name, building_id FROM meters WHERE id = ?")
        .bind(id)
        .fetch_optional(pool)
        .await?;

    Ok(meter)
}

pub async fn by_name(pool: &SqlitePool, name: &str) -> Result<Option<Meter>> {
    let meter =
        sqlx::query_as::<_, Meter>("SELECT id, name, building_id FROM meters WHERE name = ?")
            .bind(name)
            .fetch_optional(pool)
            .await?;

    Ok(meter)
}

/// Resolve a meter by name, creating it (unattached to any building) when no
/// meter with that name exists. First half of the two-step upload flow; the
/// returned id is what ingestion runs against.
pub async fn resolve_or_create(pool: &SqlitePool, name: &str) -> Result<Meter> {
    if let Some(meter) = by_name(pool, name).await? {
        return Ok(meter);
    }
    insert(pool, name, None).await
}

pub async fn list(pool: &SqlitePool) -> Result<Vec<Meter>> {
    let meters =
        sqlx::query_as::<_, Meter>("SELECT id, name, building_id FROM meters ORDER BY name")
            .fetch_all(pool)
            .await?;

    Ok(meters)
}
