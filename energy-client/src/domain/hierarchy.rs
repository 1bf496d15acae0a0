//! Reference-data entities: customer -> facility -> building -> meter.
//! Consumed by the reference-data screens, created rarely.

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct Customer {
    pub id: i64,
    pub name: String,
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct Facility {
    pub id: i64,
    pub name: String,
    pub customer_id: Option<i64>,
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct Building {
    pub id: i64,
    pub name: String,
    pub facility_id: Option<i64>,
}
