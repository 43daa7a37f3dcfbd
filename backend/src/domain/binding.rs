//! Keeps car-share trip lists in step with trip ownership.
//!
//! Trips and car-shares live in separate collections with no shared
//! transaction. The binder writes the car-share side only; the caller
//! persists the trip's own `car_share_id` afterwards.

use std::sync::Arc;

use tracing::warn;

use super::ports::CarShareRepository;
use super::{CarShare, CarShareId, Trip, TripError};

/// Reject moving `trip` to a car-share other than the one it belongs to.
///
/// # Errors
///
/// Returns [`TripError::AlreadyAssigned`] when `trip` already names a
/// different car-share.
pub fn ensure_assignable(trip: &Trip, target: &CarShareId) -> Result<(), TripError> {
    match trip.car_share_id() {
        Some(current) if current != target => Err(TripError::AlreadyAssigned {
            trip_id: *trip.id(),
            current: *current,
            requested: *target,
        }),
        _ => Ok(()),
    }
}

/// Binds trips to car-shares through the car-share repository.
pub struct CarShareBinder<C> {
    car_shares: Arc<C>,
}

impl<C> CarShareBinder<C>
where
    C: CarShareRepository,
{
    /// Build a binder over the car-share store.
    #[must_use]
    pub const fn new(car_shares: Arc<C>) -> Self {
        Self { car_shares }
    }

    /// Record `trip` in the trip list of `target`.
    ///
    /// Returns the car-share as stored after the call. Binding a trip that is
    /// already listed performs no write.
    pub async fn bind(&self, trip: &Trip, target: &CarShareId) -> Result<CarShare, TripError> {
        ensure_assignable(trip, target)?;

        let mut car_share = self
            .car_shares
            .find_by_id(target)
            .await
            .map_err(|err| TripError::car_share_store("find car-share", err))?
            .ok_or(TripError::CarShareNotFound { id: *target })?;

        if car_share.attach_trip(*trip.id()) {
            self.car_shares
                .update(&car_share)
                .await
                .map_err(|err| TripError::car_share_store("update car-share", err))?;
        }
        Ok(car_share)
    }

    /// Remove `trip` from its car-share's trip list.
    ///
    /// A car-share that has disappeared is logged and otherwise ignored.
    pub async fn unbind(&self, trip: &Trip) -> Result<(), TripError> {
        let Some(car_share_id) = trip.car_share_id() else {
            return Ok(());
        };

        let found = self
            .car_shares
            .find_by_id(car_share_id)
            .await
            .map_err(|err| TripError::car_share_store("find car-share", err))?;
        let Some(mut car_share) = found else {
            warn!(trip_id = %trip.id(), car_share_id = %car_share_id, "car-share missing while unbinding trip");
            return Ok(());
        };

        if !car_share.detach_trip(trip.id()) {
            return Ok(());
        }
        match self.car_shares.update(&car_share).await {
            Ok(()) => Ok(()),
            Err(err) => match TripError::car_share_store("update car-share", err) {
                TripError::CarShareNotFound { id } => {
                    warn!(trip_id = %trip.id(), car_share_id = %id, "car-share deleted while unbinding trip");
                    Ok(())
                }
                other => Err(other),
            },
        }
    }
}
