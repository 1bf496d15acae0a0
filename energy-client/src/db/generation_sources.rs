use anyhow::Result;
use sqlx::SqlitePool;

use crate::domain::GenerationSource;

pub async fn insert(pool: &SqlitePool, name: &str, kind: Option<&str>) -> Result<GenerationSource> {
    let result = sqlx::query("INSERT INTO generation_sources (name, type) VALUES (?, ?)")
        .bind(name)
        .bind(kind)
        .execute(pool)
        .await?;

    Ok(GenerationSource {
        id: result.last_insert_rowid(),
        name: name.to_string(),
        kind: kind.map(str::to_string),
    })
}

pub async fn by_id(pool: &SqlitePool, id: i64) -> Result<Option<GenerationSource>> {
    let source = sqlx::query_as::<_, GenerationSource>(
        "SELECT id, name, type FROM generation_sources WHERE id = ?",
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;

    Ok(source)
}

pub async fn by_name(pool: &SqlitePool, name: &str) -> Result<Option<GenerationSource>> {
    let source = sqlx::query_as::<_, GenerationSource>(
        "SELECT id, name, type FROM generation_sources WHERE name = ?",
    )
    .bind(name)
    .fetch_optional(pool)
    .await?;

    Ok(source)
}

/// Resolve a source by name, creating it with the given type tag when new.
/// An existing source wins as-is; its type tag is not updated.
pub async fn resolve_or_create(
    pool: &SqlitePool,
    name: &str,
    kind: Option<&str>,
) -> Result<GenerationSource> {
    if let Some(source) = by_name(pool, name).await? {
        return Ok(source);
    }
    insert(pool, name, kind).await
}

pub async fn list(pool: &SqlitePool) -> Result<Vec<GenerationSource>> {
    let sources = sqlx::query_as::<_, GenerationSource>(
        "SELECT id, name, type FROM generation_sources ORDER BY name",
    )
    .fetch_all(pool)
    .await?;

    Ok(sources)
}
