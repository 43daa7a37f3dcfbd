//! PostgreSQL-backed `TripRepository` implementation using Diesel ORM.
//!
//! Scores are stored as a JSONB object keyed by user id. The latest-trip
//! query is served by the `(car_share_id, recorded_at DESC, id DESC)` index.
//! Distances above `i64::MAX` never reach this adapter; the engine rejects
//! them first.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use uuid::Uuid;

use crate::domain::ports::{TripRepository, TripRepositoryError};
use crate::domain::{CarShareId, Scores, Trip, TripDraft, TripId, UserId};

use super::diesel_error_mapping::{map_diesel_error, map_pool_error};
use super::models::{NewTripRow, TripRow, TripUpdate};
use super::pool::{DbPool, PoolError};
use super::schema::trips;

/// Diesel-backed implementation of the trip repository port.
#[derive(Clone)]
pub struct DieselTripRepository {
    pool: DbPool,
}

impl DieselTripRepository {
    /// Build a repository over a connection pool.
    #[must_use]
    pub const fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn pool_error(error: PoolError) -> TripRepositoryError {
    map_pool_error(error, TripRepositoryError::connection)
}

fn diesel_error(error: diesel::result::Error) -> TripRepositoryError {
    map_diesel_error(
        error,
        TripRepositoryError::query,
        TripRepositoryError::connection,
    )
}

/// Column values shared by inserts and updates.
struct TripColumns {
    car_share_id: Option<Uuid>,
    driver_id: Option<Uuid>,
    passenger_ids: Vec<Uuid>,
    metres: i64,
    scores: serde_json::Value,
}

impl TripColumns {
    fn from_trip(trip: &Trip) -> Result<Self, TripRepositoryError> {
        let metres = i64::try_from(trip.metres()).map_err(|_| {
            TripRepositoryError::query(format!(
                "trip {} metres exceed the storable range",
                trip.id()
            ))
        })?;
        let scores = serde_json::to_value(trip.scores()).map_err(|err| {
            TripRepositoryError::query(format!("serialise scores for trip {}: {err}", trip.id()))
        })?;
        Ok(Self {
            car_share_id: trip.car_share_id().map(|id| *id.as_uuid()),
            driver_id: trip.driver_id().map(|id| *id.as_uuid()),
            passenger_ids: trip.passenger_ids().iter().map(|id| *id.as_uuid()).collect(),
            metres,
            scores,
        })
    }
}

fn row_to_trip(row: TripRow) -> Result<Trip, TripRepositoryError> {
    let TripRow {
        id,
        car_share_id,
        driver_id,
        passenger_ids,
        metres: stored_metres,
        recorded_at,
        scores: stored_scores,
    } = row;

    let metres = u64::try_from(stored_metres)
        .map_err(|_| TripRepositoryError::query(format!("stored trip {id} has negative metres")))?;
    let scores: Scores = serde_json::from_value(stored_scores)
        .map_err(|err| TripRepositoryError::query(format!("decode scores for trip {id}: {err}")))?;

    let draft = TripDraft {
        car_share_id: car_share_id.map(CarShareId::from_uuid),
        driver_id: driver_id.map(UserId::from_uuid),
        passenger_ids: passenger_ids.into_iter().map(UserId::from_uuid).collect(),
        metres,
    };
    Ok(Trip::new(TripId::from_uuid(id), recorded_at, draft).with_scores(scores))
}

#[async_trait]
impl TripRepository for DieselTripRepository {
    async fn find_by_id(&self, id: &TripId) -> Result<Option<Trip>, TripRepositoryError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;

        let row = trips::table
            .filter(trips::id.eq(id.as_uuid()))
            .select(TripRow::as_select())
            .first::<TripRow>(&mut conn)
            .await
            .optional()
            .map_err(diesel_error)?;

        row.map(row_to_trip).transpose()
    }

    async fn list(
        &self,
        car_share_id: Option<CarShareId>,
    ) -> Result<Vec<Trip>, TripRepositoryError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;

        let mut query = trips::table
            .order((trips::recorded_at.asc(), trips::id.asc()))
            .select(TripRow::as_select())
            .into_boxed();
        if let Some(share) = car_share_id {
            query = query.filter(trips::car_share_id.eq(*share.as_uuid()));
        }
        let rows: Vec<TripRow> = query
            .load::<TripRow>(&mut conn)
            .await
            .map_err(diesel_error)?;

        rows.into_iter().map(row_to_trip).collect()
    }

    async fn find_latest_for_car_share(
        &self,
        car_share_id: &CarShareId,
        excluding: Option<TripId>,
    ) -> Result<Option<Trip>, TripRepositoryError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;

        let mut query = trips::table
            .filter(trips::car_share_id.eq(*car_share_id.as_uuid()))
            .order((trips::recorded_at.desc(), trips::id.desc()))
            .select(TripRow::as_select())
            .into_boxed();
        if let Some(excluded) = excluding {
            query = query.filter(trips::id.ne(*excluded.as_uuid()));
        }
        let row = query
            .first::<TripRow>(&mut conn)
            .await
            .optional()
            .map_err(diesel_error)?;

        row.map(row_to_trip).transpose()
    }

    async fn insert(&self, trip: &Trip) -> Result<(), TripRepositoryError> {
        let columns = TripColumns::from_trip(trip)?;
        let row = NewTripRow {
            id: *trip.id().as_uuid(),
            car_share_id: columns.car_share_id,
            driver_id: columns.driver_id,
            passenger_ids: columns.passenger_ids,
            metres: columns.metres,
            recorded_at: trip.timestamp(),
            scores: &columns.scores,
        };
        let mut conn = self.pool.get().await.map_err(pool_error)?;

        diesel::insert_into(trips::table)
            .values(&row)
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(diesel_error)
    }

    async fn update(&self, trip: &Trip) -> Result<(), TripRepositoryError> {
        let columns = TripColumns::from_trip(trip)?;
        let changes = TripUpdate {
            car_share_id: columns.car_share_id,
            driver_id: columns.driver_id,
            passenger_ids: columns.passenger_ids,
            metres: columns.metres,
            scores: &columns.scores,
        };
        let mut conn = self.pool.get().await.map_err(pool_error)?;

        let updated = diesel::update(trips::table.filter(trips::id.eq(trip.id().as_uuid())))
            .set(&changes)
            .execute(&mut conn)
            .await
            .map_err(diesel_error)?;

        if updated == 0 {
            return Err(TripRepositoryError::missing(*trip.id()));
        }
        Ok(())
    }

    async fn delete(&self, id: &TripId) -> Result<(), TripRepositoryError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;

        let deleted = diesel::delete(trips::table.filter(trips::id.eq(id.as_uuid())))
            .execute(&mut conn)
            .await
            .map_err(diesel_error)?;

        if deleted == 0 {
            return Err(TripRepositoryError::missing(*id));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Score;
    use chrono::Utc;
    use rstest::rstest;

    fn row(scores: serde_json::Value, metres: i64) -> TripRow {
        TripRow {
            id: Uuid::new_v4(),
            car_share_id: None,
            driver_id: None,
            passenger_ids: Vec::new(),
            metres,
            recorded_at: Utc::now(),
            scores,
        }
    }

    #[rstest]
    fn rows_decode_scores() {
        let user = UserId::random();
        let stored = row(
            serde_json::json!({ user.to_string(): { "driverMetres": 5, "passengerMetres": 1 } }),
            5,
        );
        let trip = row_to_trip(stored).expect("decodes");
        assert_eq!(
            trip.scores().get(&user),
            Some(&Score {
                driver_metres: 5,
                passenger_metres: 1
            })
        );
    }

    #[rstest]
    fn negative_metres_are_rejected() {
        let err = row_to_trip(row(serde_json::json!({}), -1)).expect_err("negative");
        assert!(matches!(err, TripRepositoryError::Query { .. }));
    }

    #[rstest]
    fn malformed_scores_are_rejected() {
        let err = row_to_trip(row(serde_json::json!({ "nope": 1 }), 1)).expect_err("bad scores");
        assert!(matches!(err, TripRepositoryError::Query { .. }));
    }
}
