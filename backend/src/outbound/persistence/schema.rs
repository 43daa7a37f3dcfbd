//! Diesel table definitions for the PostgreSQL schema.
//!
//! Must match `backend/migrations` exactly. Cross-collection references are
//! plain UUID columns without foreign keys.

diesel::table! {
    /// Registered users.
    users (id) {
        id -> Uuid,
        display_name -> Varchar,
        is_anonymous -> Bool,
        is_linked -> Bool,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// Car-share groups. `trip_ids` is kept in step with `trips.car_share_id`
    /// by the domain, not by the database.
    car_shares (id) {
        id -> Uuid,
        name -> Text,
        metres -> Int8,
        admin_ids -> Array<Uuid>,
        trip_ids -> Array<Uuid>,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// Recorded trips with their cumulative score snapshot.
    trips (id) {
        id -> Uuid,
        car_share_id -> Nullable<Uuid>,
        driver_id -> Nullable<Uuid>,
        passenger_ids -> Array<Uuid>,
        metres -> Int8,
        recorded_at -> Timestamptz,
        /// JSON object keyed by user id, see `domain::Scores`.
        scores -> Jsonb,
    }
}

diesel::allow_tables_to_appear_in_same_query!(users, car_shares, trips);
