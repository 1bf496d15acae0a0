use anyhow::Result;
use sqlx::SqlitePool;

/// DDL for the full store: three hierarchy tables, two target catalogs and two
/// append-only data-point tables. The UNIQUE pairs are what turns a duplicate
/// upload into a constraint violation instead of a silent overwrite.
const TABLES: &[&str] = &[
    "CREATE TABLE IF NOT EXISTS customers (
        id   INTEGER PRIMARY KEY AUTOINCREMENT,
        name TEXT NOT NULL
    )",
    "CREATE TABLE IF NOT EXISTS facilities (
        id          INTEGER PRIMARY KEY AUTOINCREMENT,
        name        TEXT NOT NULL,
        customer_id INTEGER REFERENCES customers (id)
    )",
    "CREATE TABLE IF NOT EXISTS buildings (
        id          INTEGER PRIMARY KEY AUTOINCREMENT,
        name        TEXT NOT NULL,
        facility_id INTEGER REFERENCES facilities (id)
    )",
    "CREATE TABLE IF NOT EXISTS meters (
        id          INTEGER PRIMARY KEY AUTOINCREMENT,
        name        TEXT NOT NULL,
        building_id INTEGER REFERENCES buildings (id)
    )",
    "CREATE TABLE IF NOT EXISTS load_data (
        id        INTEGER PRIMARY KEY AUTOINCREMENT,
        timestamp TEXT NOT NULL,
        load_mw   REAL NOT NULL,
        meter_id  INTEGER NOT NULL REFERENCES meters (id),
        UNIQUE (timestamp, meter_id)
    )",
    "CREATE TABLE IF NOT EXISTS generation_sources (
        id   INTEGER PRIMARY KEY AUTOINCREMENT,
        name TEXT NOT NULL,
        type TEXT
    )",
    "CREATE TABLE IF NOT EXISTS generation_data (
        id            INTEGER PRIMARY KEY AUTOINCREMENT,
        timestamp     TEXT NOT NULL,
        generation_mw REAL NOT NULL,
        source_id     INTEGER NOT NULL REFERENCES generation_sources (id),
        UNIQUE (timestamp, source_id)
    )",
];

/// Create all tables if they do not exist yet. Idempotent; there is no
/// migration tooling, the schema is fixed.
pub async fn create_schema(pool: &SqlitePool) -> Result<()> {
    for ddl in TABLES {
        sqlx::query(ddl).execute(pool).await?;
    }
    Ok(())
}
