//! In-process store implementing every repository port.
//!
//! Each collection sits behind its own `RwLock`; guards are dropped before
//! any await point. Records are cloned in and out so callers never share
//! state with the store. Used when no database URL is configured and by the
//! behaviour tests.

use std::collections::HashMap;
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use async_trait::async_trait;

use crate::domain::ports::{
    CarShareRepository, CarShareRepositoryError, TripRepository, TripRepositoryError,
    UserRepository, UserRepositoryError,
};
use crate::domain::{CarShare, CarShareId, Trip, TripId, User, UserId};

const POISONED: &str = "in-memory collection lock poisoned";

/// Process-local store for users, car-shares, and trips.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    users: RwLock<HashMap<UserId, User>>,
    car_shares: RwLock<HashMap<CarShareId, CarShare>>,
    trips: RwLock<HashMap<TripId, Trip>>,
}

impl InMemoryStore {
    /// Empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

fn read<T, E>(
    lock: &RwLock<T>,
    map_err: fn(&'static str) -> E,
) -> Result<RwLockReadGuard<'_, T>, E> {
    lock.read().map_err(|_: PoisonError<_>| map_err(POISONED))
}

fn write<T, E>(
    lock: &RwLock<T>,
    map_err: fn(&'static str) -> E,
) -> Result<RwLockWriteGuard<'_, T>, E> {
    lock.write().map_err(|_: PoisonError<_>| map_err(POISONED))
}

fn user_err(message: &'static str) -> UserRepositoryError {
    UserRepositoryError::query(message)
}

fn car_share_err(message: &'static str) -> CarShareRepositoryError {
    CarShareRepositoryError::query(message)
}

fn trip_err(message: &'static str) -> TripRepositoryError {
    TripRepositoryError::query(message)
}

fn chronological(trips: &mut [Trip]) {
    trips.sort_by(|a, b| {
        a.timestamp()
            .cmp(&b.timestamp())
            .then_with(|| a.id().cmp(b.id()))
    });
}

#[async_trait]
impl UserRepository for InMemoryStore {
    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserRepositoryError> {
        Ok(read(&self.users, user_err)?.get(id).cloned())
    }

    async fn list(&self) -> Result<Vec<User>, UserRepositoryError> {
        let mut users: Vec<User> = read(&self.users, user_err)?.values().cloned().collect();
        users.sort_by(|a, b| a.id().cmp(b.id()));
        Ok(users)
    }

    async fn insert(&self, user: &User) -> Result<(), UserRepositoryError> {
        let mut users = write(&self.users, user_err)?;
        if users.contains_key(user.id()) {
            return Err(UserRepositoryError::query(format!(
                "user {} already exists",
                user.id()
            )));
        }
        users.insert(*user.id(), user.clone());
        Ok(())
    }
}

#[async_trait]
impl CarShareRepository for InMemoryStore {
    async fn find_by_id(
        &self,
        id: &CarShareId,
    ) -> Result<Option<CarShare>, CarShareRepositoryError> {
        Ok(read(&self.car_shares, car_share_err)?.get(id).cloned())
    }

    async fn list(&self) -> Result<Vec<CarShare>, CarShareRepositoryError> {
        let mut shares: Vec<CarShare> = read(&self.car_shares, car_share_err)?
            .values()
            .cloned()
            .collect();
        shares.sort_by(|a, b| a.id().cmp(b.id()));
        Ok(shares)
    }

    async fn insert(&self, car_share: &CarShare) -> Result<(), CarShareRepositoryError> {
        let mut shares = write(&self.car_shares, car_share_err)?;
        if shares.contains_key(car_share.id()) {
            return Err(CarShareRepositoryError::query(format!(
                "car-share {} already exists",
                car_share.id()
            )));
        }
        shares.insert(*car_share.id(), car_share.clone());
        Ok(())
    }

    async fn update(&self, car_share: &CarShare) -> Result<(), CarShareRepositoryError> {
        let mut shares = write(&self.car_shares, car_share_err)?;
        let stored = shares
            .get_mut(car_share.id())
            .ok_or_else(|| CarShareRepositoryError::missing(*car_share.id()))?;
        *stored = car_share.clone();
        Ok(())
    }
}

#[async_trait]
impl TripRepository for InMemoryStore {
    async fn find_by_id(&self, id: &TripId) -> Result<Option<Trip>, TripRepositoryError> {
        Ok(read(&self.trips, trip_err)?.get(id).cloned())
    }

    async fn list(
        &self,
        car_share_id: Option<CarShareId>,
    ) -> Result<Vec<Trip>, TripRepositoryError> {
        let mut trips: Vec<Trip> = read(&self.trips, trip_err)?
            .values()
            .filter(|trip| car_share_id.is_none() || trip.car_share_id() == car_share_id.as_ref())
            .cloned()
            .collect();
        chronological(&mut trips);
        Ok(trips)
    }

    async fn find_latest_for_car_share(
        &self,
        car_share_id: &CarShareId,
        excluding: Option<TripId>,
    ) -> Result<Option<Trip>, TripRepositoryError> {
        let trips = read(&self.trips, trip_err)?;
        Ok(trips
            .values()
            .filter(|trip| trip.car_share_id() == Some(car_share_id))
            .filter(|trip| excluding.as_ref() != Some(trip.id()))
            .max_by(|a, b| {
                a.timestamp()
                    .cmp(&b.timestamp())
                    .then_with(|| a.id().cmp(b.id()))
            })
            .cloned())
    }

    async fn insert(&self, trip: &Trip) -> Result<(), TripRepositoryError> {
        let mut trips = write(&self.trips, trip_err)?;
        if trips.contains_key(trip.id()) {
            return Err(TripRepositoryError::query(format!(
                "trip {} already exists",
                trip.id()
            )));
        }
        trips.insert(*trip.id(), trip.clone());
        Ok(())
    }

    async fn update(&self, trip: &Trip) -> Result<(), TripRepositoryError> {
        let mut trips = write(&self.trips, trip_err)?;
        let stored = trips
            .get_mut(trip.id())
            .ok_or_else(|| TripRepositoryError::missing(*trip.id()))?;
        *stored = trip.clone();
        Ok(())
    }

    async fn delete(&self, id: &TripId) -> Result<(), TripRepositoryError> {
        write(&self.trips, trip_err)?
            .remove(id)
            .map(|_| ())
            .ok_or_else(|| TripRepositoryError::missing(*id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{CarShareDraft, TripDraft};
    use chrono::{Duration, Utc};
    use rstest::{fixture, rstest};
    use std::collections::BTreeSet;

    #[fixture]
    fn store() -> InMemoryStore {
        InMemoryStore::new()
    }

    fn trip_at(car_share_id: Option<CarShareId>, minutes: i64) -> Trip {
        Trip::new(
            TripId::random(),
            Utc::now() + Duration::minutes(minutes),
            TripDraft {
                car_share_id,
                ..TripDraft::default()
            },
        )
    }

    #[rstest]
    #[tokio::test]
    async fn latest_trip_ignores_other_car_shares_and_the_excluded_id(store: InMemoryStore) {
        let share = CarShareId::random();
        let older = trip_at(Some(share), 0);
        let newer = trip_at(Some(share), 5);
        let elsewhere = trip_at(Some(CarShareId::random()), 10);
        for trip in [&older, &newer, &elsewhere] {
            TripRepository::insert(&store, trip).await.expect("insert");
        }

        let latest = store
            .find_latest_for_car_share(&share, None)
            .await
            .expect("query");
        assert_eq!(latest.as_ref().map(Trip::id), Some(newer.id()));

        let predecessor = store
            .find_latest_for_car_share(&share, Some(*newer.id()))
            .await
            .expect("query");
        assert_eq!(predecessor.as_ref().map(Trip::id), Some(older.id()));
    }

    #[rstest]
    #[tokio::test]
    async fn equal_timestamps_resolve_to_the_highest_id(store: InMemoryStore) {
        let share = CarShareId::random();
        let stamp = Utc::now();
        let trips: Vec<Trip> = (0..4)
            .map(|_| {
                Trip::new(
                    TripId::random(),
                    stamp,
                    TripDraft {
                        car_share_id: Some(share),
                        ..TripDraft::default()
                    },
                )
            })
            .collect();
        for trip in &trips {
            TripRepository::insert(&store, trip).await.expect("insert");
        }

        let highest = trips.iter().map(Trip::id).max().copied();
        let latest = store
            .find_latest_for_car_share(&share, None)
            .await
            .expect("query");
        assert_eq!(latest.as_ref().map(Trip::id).copied(), highest);
    }

    #[rstest]
    #[tokio::test]
    async fn list_filters_and_orders_by_timestamp(store: InMemoryStore) {
        let share = CarShareId::random();
        let late = trip_at(Some(share), 9);
        let early = trip_at(Some(share), 1);
        let loose = trip_at(None, 5);
        for trip in [&late, &early, &loose] {
            TripRepository::insert(&store, trip).await.expect("insert");
        }

        let scoped = TripRepository::list(&store, Some(share)).await.expect("list");
        let ids: Vec<_> = scoped.iter().map(|t| *t.id()).collect();
        assert_eq!(ids, vec![*early.id(), *late.id()]);

        let all = TripRepository::list(&store, None).await.expect("list");
        assert_eq!(all.len(), 3);
    }

    #[rstest]
    #[tokio::test]
    async fn updating_missing_records_reports_missing(store: InMemoryStore) {
        let trip = trip_at(None, 0);
        let err = TripRepository::update(&store, &trip)
            .await
            .expect_err("absent");
        assert_eq!(err, TripRepositoryError::missing(*trip.id()));

        let share = CarShare::new(CarShareDraft {
            id: CarShareId::random(),
            name: "Gone".to_owned(),
            metres: 1,
            admin_ids: BTreeSet::new(),
            trip_ids: Vec::new(),
        })
        .expect("valid car-share");
        let err = CarShareRepository::update(&store, &share)
            .await
            .expect_err("absent");
        assert_eq!(err, CarShareRepositoryError::missing(*share.id()));
    }

    #[rstest]
    #[tokio::test]
    async fn delete_removes_the_trip_once(store: InMemoryStore) {
        let trip = trip_at(None, 0);
        TripRepository::insert(&store, &trip).await.expect("insert");

        store.delete(trip.id()).await.expect("first delete");
        let err = store.delete(trip.id()).await.expect_err("second delete");
        assert_eq!(err, TripRepositoryError::missing(*trip.id()));
    }

    #[rstest]
    #[tokio::test]
    async fn duplicate_inserts_are_rejected(store: InMemoryStore) {
        let trip = trip_at(None, 0);
        TripRepository::insert(&store, &trip).await.expect("insert");
        let err = TripRepository::insert(&store, &trip)
            .await
            .expect_err("duplicate");
        assert!(matches!(err, TripRepositoryError::Query { .. }));
    }
}
