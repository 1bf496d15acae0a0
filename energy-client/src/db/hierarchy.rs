//! Repositories for the customer/facility/building reference tables. These are
//! edited from the excluded reference-data screens, so only insert and list
//! are needed here.

use anyhow::Result;
use sqlx::SqlitePool;

use crate::domain::{Building, Customer, Facility};

pub async fn insert_customer(pool: &SqlitePool, name: &str) -> Result<Customer> {
    let result = sqlx::query("INSERT INTO customers (name) VALUES (?)")
        .bind(name)
        .execute(pool)
        .await?;

    Ok(Customer {
        id: result.last_insert_rowid(),
        name: name.to_string(),
    })
}

pub async fn list_customers(pool: &SqlitePool) -> Result<Vec<Customer>> {
    let customers =
        sqlx::query_as::<_, Customer>("SELECT id, name FROM customers ORDER BY name")
            .fetch_all(pool)
            .await?;

    Ok(customers)
}

pub async fn insert_facility(
    pool: &SqlitePool,
    name: &str,
    customer_id: Option<i64>,
) -> Result<Facility> {
    let result = sqlx::query("INSERT INTO facilities (name, customer_id) VALUES (?, ?)")
        .bind(name)
        .bind(customer_id)
        .execute(pool)
        .await?;

    Ok(Facility {
        id: result.last_insert_rowid(),
        name: name.to_string(),
        customer_id,
    })
}

pub async fn list_facilities(pool: &SqlitePool) -> Result<Vec<Facility>> {
    let facilities = sqlx::query_as::<_, Facility>(
        "SELECT id, name, customer_id FROM facilities ORDER BY name",
    )
    .fetch_all(pool)
    .await?;

    Ok(facilities)
}

pub async fn insert_building(
    pool: &SqlitePool,
    name: &str,
    facility_id: Option<i64>,
) -> Result<Building> {
    let result = sqlx::query("INSERT INTO buildings (name, facility_id) VALUES (?, ?)")
        .bind(name)
        .bind(facility_id)
        .execute(pool)
        .await?;

    Ok(Building {
        id: result.last_insert_rowid(),
        name: name.to_string(),
        facility_id,
    })
}

pub async fn list_buildings(pool: &SqlitePool) -> Result<Vec<Building>> {
    let buildings = sqlx::query_as::<_, Building>(
        "SELECT id, name, facility_id FROM buildings ORDER BY name",
    )
    .fetch_all(pool)
    .await?;

    Ok(buildings)
}
