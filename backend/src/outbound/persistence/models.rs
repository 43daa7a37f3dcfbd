//! Internal Diesel row structs for database operations.
//!
//! These types never leave the persistence layer.

use chrono::{DateTime, Utc};
use diesel::prelude::*;
use uuid::Uuid;

use super::schema::{car_shares, trips, users};

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct UserRow {
    pub id: Uuid,
    pub display_name: String,
    pub is_anonymous: bool,
    pub is_linked: bool,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = users)]
pub(crate) struct NewUserRow<'a> {
    pub id: Uuid,
    pub display_name: &'a str,
    pub is_anonymous: bool,
    pub is_linked: bool,
}

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = car_shares)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct CarShareRow {
    pub id: Uuid,
    pub name: String,
    pub metres: i64,
    pub admin_ids: Vec<Uuid>,
    pub trip_ids: Vec<Uuid>,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = car_shares)]
pub(crate) struct NewCarShareRow<'a> {
    pub id: Uuid,
    pub name: &'a str,
    pub metres: i64,
    pub admin_ids: Vec<Uuid>,
    pub trip_ids: Vec<Uuid>,
}

/// Full replacement of a car-share's mutable columns.
#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = car_shares)]
pub(crate) struct CarShareUpdate<'a> {
    pub name: &'a str,
    pub metres: i64,
    pub admin_ids: Vec<Uuid>,
    pub trip_ids: Vec<Uuid>,
}

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = trips)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct TripRow {
    pub id: Uuid,
    pub car_share_id: Option<Uuid>,
    pub driver_id: Option<Uuid>,
    pub passenger_ids: Vec<Uuid>,
    pub metres: i64,
    pub recorded_at: DateTime<Utc>,
    pub scores: serde_json::Value,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = trips)]
pub(crate) struct NewTripRow<'a> {
    pub id: Uuid,
    pub car_share_id: Option<Uuid>,
    pub driver_id: Option<Uuid>,
    pub passenger_ids: Vec<Uuid>,
    pub metres: i64,
    pub recorded_at: DateTime<Utc>,
    pub scores: &'a serde_json::Value,
}

/// Full replacement of a trip's mutable columns. `recorded_at` never changes.
#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = trips)]
#[diesel(treat_none_as_null = true)]
pub(crate) struct TripUpdate<'a> {
    pub car_share_id: Option<Uuid>,
    pub driver_id: Option<Uuid>,
    pub passenger_ids: Vec<Uuid>,
    pub metres: i64,
    pub scores: &'a serde_json::Value,
}
