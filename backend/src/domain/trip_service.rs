//! Trip lifecycle orchestration.
//!
//! Every create and update first rejects distances no store can hold, then
//! runs the same pipeline: fetch the car-share's latest other trip, accrue
//! scores from it, validate participants, bind the trip to its car-share,
//! persist the trip, then resolve participants for the response. Anything that fails before the trip write aborts the request.
//! Population happens after the write and only ever degrades the response.

use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use tracing::{info, warn};

use super::binding::{CarShareBinder, ensure_assignable};
use super::participants::ParticipantValidator;
use super::ports::{
    CarShareRepository, TripCommand, TripParticipants, TripQuery, TripRepository, TripView,
    TripWrite, UserRepository,
};
use super::{CarShareId, Scores, Trip, TripDraft, TripError, TripId, User, UserId, accrue};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum WriteMode {
    Insert,
    Update,
}

/// Domain service implementing [`TripCommand`] and [`TripQuery`].
pub struct TripService<U, C, T> {
    users: Arc<U>,
    trips: Arc<T>,
    validator: ParticipantValidator<U>,
    binder: CarShareBinder<C>,
    clock: Arc<dyn Clock>,
}

impl<U, C, T> TripService<U, C, T>
where
    U: UserRepository,
    C: CarShareRepository,
    T: TripRepository,
{
    /// Build the service over its three stores and the clock that stamps
    /// new trips.
    #[must_use]
    pub fn new(users: Arc<U>, car_shares: Arc<C>, trips: Arc<T>, clock: Arc<dyn Clock>) -> Self {
        Self {
            validator: ParticipantValidator::new(Arc::clone(&users)),
            binder: CarShareBinder::new(car_shares),
            users,
            trips,
            clock,
        }
    }

    async fn find_trip(&self, id: &TripId) -> Result<Trip, TripError> {
        self.trips
            .find_by_id(id)
            .await
            .map_err(|err| TripError::trip_store("find trip", err))?
            .ok_or(TripError::TripNotFound { id: *id })
    }

    /// Scores of the car-share's latest trip other than `trip` itself.
    async fn predecessor_scores(&self, trip: &Trip) -> Result<Scores, TripError> {
        let Some(car_share_id) = trip.car_share_id() else {
            return Ok(Scores::new());
        };
        let latest = self
            .trips
            .find_latest_for_car_share(car_share_id, Some(*trip.id()))
            .await
            .map_err(|err| TripError::trip_store("fetch latest trip", err))?;
        Ok(latest.map(|prior| prior.scores().clone()).unwrap_or_default())
    }

    async fn write(&self, unscored: Trip, mode: WriteMode) -> Result<TripWrite, TripError> {
        let prior = self.predecessor_scores(&unscored).await?;
        let scores = accrue(&prior, &unscored);
        let trip = unscored.with_scores(scores);

        self.validator
            .validate(trip.driver_id(), trip.passenger_ids())
            .await?;

        if let Some(target) = trip.car_share_id() {
            self.binder.bind(&trip, target).await?;
        }

        match mode {
            WriteMode::Insert => self
                .trips
                .insert(&trip)
                .await
                .map_err(|err| TripError::trip_store("insert trip", err))?,
            WriteMode::Update => self
                .trips
                .update(&trip)
                .await
                .map_err(|err| TripError::trip_store("update trip", err))?,
        }
        info!(
            trip_id = %trip.id(),
            car_share_id = ?trip.car_share_id().map(ToString::to_string),
            metres = trip.metres(),
            ?mode,
            "trip committed"
        );

        let participants = self.populate(&trip).await;
        if let Err(err) = &participants {
            warn!(trip_id = %trip.id(), error = %err, "failed to populate trip participants");
        }
        Ok(TripWrite { trip, participants })
    }

    async fn find_user(&self, id: &UserId, operation: &'static str) -> Result<User, TripError> {
        self.users
            .find_by_id(id)
            .await
            .map_err(|err| TripError::user_store(operation, err))?
            .ok_or(TripError::UserNotFound { id: *id })
    }

    async fn populate(&self, trip: &Trip) -> Result<TripParticipants, TripError> {
        let mut driver = None;
        if let Some(id) = trip.driver_id() {
            driver = Some(self.find_user(id, "populate driver").await?);
        }
        let mut passengers = Vec::with_capacity(trip.passenger_ids().len());
        for id in trip.passenger_ids() {
            passengers.push(self.find_user(id, "populate passenger").await?);
        }
        Ok(TripParticipants { driver, passengers })
    }
}

#[async_trait]
impl<U, C, T> TripCommand for TripService<U, C, T>
where
    U: UserRepository,
    C: CarShareRepository,
    T: TripRepository,
{
    async fn create_trip(&self, draft: TripDraft) -> Result<TripWrite, TripError> {
        draft.ensure_storable()?;
        let trip = Trip::new(TripId::random(), self.clock.utc(), draft);
        self.write(trip, WriteMode::Insert).await
    }

    async fn update_trip(&self, id: TripId, draft: TripDraft) -> Result<TripWrite, TripError> {
        draft.ensure_storable()?;
        let persisted = self.find_trip(&id).await?;
        if let Some(target) = draft.car_share_id.as_ref() {
            ensure_assignable(&persisted, target)?;
        }

        let car_share_id = persisted.car_share_id().copied().or(draft.car_share_id);
        let trip = Trip::new(
            *persisted.id(),
            persisted.timestamp(),
            TripDraft {
                car_share_id,
                ..draft
            },
        );
        self.write(trip, WriteMode::Update).await
    }

    async fn delete_trip(&self, id: TripId) -> Result<(), TripError> {
        let trip = self.find_trip(&id).await?;
        self.trips
            .delete(&id)
            .await
            .map_err(|err| TripError::trip_store("delete trip", err))?;
        info!(trip_id = %id, "trip deleted");
        self.binder.unbind(&trip).await
    }
}

#[async_trait]
impl<U, C, T> TripQuery for TripService<U, C, T>
where
    U: UserRepository,
    C: CarShareRepository,
    T: TripRepository,
{
    async fn get_trip(&self, id: TripId) -> Result<TripView, TripError> {
        let trip = self.find_trip(&id).await?;
        let participants = self.populate(&trip).await?;
        Ok(TripView { trip, participants })
    }

    async fn list_trips(&self, car_share_id: Option<CarShareId>) -> Result<Vec<Trip>, TripError> {
        self.trips
            .list(car_share_id)
            .await
            .map_err(|err| TripError::trip_store("list trips", err))
    }
}

#[cfg(test)]
#[path = "trip_service_tests.rs"]
mod tests;
