use time::PrimitiveDateTime;

/// A named generation asset (solar farm, wind farm, ...). Standalone catalog
/// entry, no parent hierarchy.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct GenerationSource {
    pub id: i64,
    pub name: String,
    #[sqlx(rename = "type")]
    pub kind: Option<String>,
}

/// One hourly generation reading. `(timestamp, source_id)` is unique.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct GenerationDataPoint {
    pub id: i64,
    pub timestamp: PrimitiveDateTime,
    pub generation_mw: f64,
    pub source_id: i64,
}
