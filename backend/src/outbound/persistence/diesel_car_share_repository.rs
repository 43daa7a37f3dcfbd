//! PostgreSQL-backed `CarShareRepository` implementation using Diesel ORM.
//!
//! `update` replaces the whole row, trip list included. Concurrent updates
//! are last-write-wins.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use uuid::Uuid;

use crate::domain::ports::{CarShareRepository, CarShareRepositoryError};
use crate::domain::{CarShare, CarShareDraft, CarShareId, TripId, UserId};

use super::diesel_error_mapping::{map_diesel_error, map_pool_error};
use super::models::{CarShareRow, CarShareUpdate, NewCarShareRow};
use super::pool::{DbPool, PoolError};
use super::schema::car_shares;

/// Diesel-backed implementation of the car-share repository port.
#[derive(Clone)]
pub struct DieselCarShareRepository {
    pool: DbPool,
}

impl DieselCarShareRepository {
    /// Build a repository over a connection pool.
    #[must_use]
    pub const fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn pool_error(error: PoolError) -> CarShareRepositoryError {
    map_pool_error(error, CarShareRepositoryError::connection)
}

fn diesel_error(error: diesel::result::Error) -> CarShareRepositoryError {
    map_diesel_error(
        error,
        CarShareRepositoryError::query,
        CarShareRepositoryError::connection,
    )
}

fn metres_column(car_share: &CarShare) -> Result<i64, CarShareRepositoryError> {
    i64::try_from(car_share.metres()).map_err(|_| {
        CarShareRepositoryError::query(format!(
            "car-share {} metres exceed the storable range",
            car_share.id()
        ))
    })
}

fn admin_column(car_share: &CarShare) -> Vec<Uuid> {
    car_share.admin_ids().iter().map(|id| *id.as_uuid()).collect()
}

fn trip_column(car_share: &CarShare) -> Vec<Uuid> {
    car_share.trip_ids().iter().map(|id| *id.as_uuid()).collect()
}

fn row_to_car_share(row: CarShareRow) -> Result<CarShare, CarShareRepositoryError> {
    let CarShareRow {
        id,
        name,
        metres: stored_metres,
        admin_ids,
        trip_ids,
    } = row;
    let metres = u64::try_from(stored_metres)
        .map_err(|_| CarShareRepositoryError::query(format!("stored car-share {id} has negative metres")))?;

    CarShare::new(CarShareDraft {
        id: CarShareId::from_uuid(id),
        name,
        metres,
        admin_ids: admin_ids.into_iter().map(UserId::from_uuid).collect(),
        trip_ids: trip_ids.into_iter().map(TripId::from_uuid).collect(),
    })
    .map_err(|err| CarShareRepositoryError::query(format!("stored car-share {id}: {err}")))
}

#[async_trait]
impl CarShareRepository for DieselCarShareRepository {
    async fn find_by_id(
        &self,
        id: &CarShareId,
    ) -> Result<Option<CarShare>, CarShareRepositoryError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;

        let row = car_shares::table
            .filter(car_shares::id.eq(id.as_uuid()))
            .select(CarShareRow::as_select())
            .first::<CarShareRow>(&mut conn)
            .await
            .optional()
            .map_err(diesel_error)?;

        row.map(row_to_car_share).transpose()
    }

    async fn list(&self) -> Result<Vec<CarShare>, CarShareRepositoryError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;

        let rows: Vec<CarShareRow> = car_shares::table
            .order(car_shares::id.asc())
            .select(CarShareRow::as_select())
            .load(&mut conn)
            .await
            .map_err(diesel_error)?;

        rows.into_iter().map(row_to_car_share).collect()
    }

    async fn insert(&self, car_share: &CarShare) -> Result<(), CarShareRepositoryError> {
        let row = NewCarShareRow {
            id: *car_share.id().as_uuid(),
            name: car_share.name(),
            metres: metres_column(car_share)?,
            admin_ids: admin_column(car_share),
            trip_ids: trip_column(car_share),
        };
        let mut conn = self.pool.get().await.map_err(pool_error)?;

        diesel::insert_into(car_shares::table)
            .values(&row)
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(diesel_error)
    }

    async fn update(&self, car_share: &CarShare) -> Result<(), CarShareRepositoryError> {
        let changes = CarShareUpdate {
            name: car_share.name(),
            metres: metres_column(car_share)?,
            admin_ids: admin_column(car_share),
            trip_ids: trip_column(car_share),
        };
        let mut conn = self.pool.get().await.map_err(pool_error)?;

        let updated = diesel::update(car_shares::table.filter(car_shares::id.eq(car_share.id().as_uuid())))
            .set(&changes)
            .execute(&mut conn)
            .await
            .map_err(diesel_error)?;

        if updated == 0 {
            return Err(CarShareRepositoryError::missing(*car_share.id()));
        }
        Ok(())
    }
}
