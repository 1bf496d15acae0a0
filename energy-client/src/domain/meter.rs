use time::PrimitiveDateTime;

/// A load-measurement point. `building_id` is optional: meters can exist
/// before they are attached to the building hierarchy.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct Meter {
    pub id: i64,
    pub name: String,
    pub building_id: Option<i64>,
}

/// One hourly load reading. `(timestamp, meter_id)` is unique.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct LoadDataPoint {
    pub id: i64,
    pub timestamp: PrimitiveDateTime,
    pub load_mw: f64,
    pub meter_id: i64,
}
