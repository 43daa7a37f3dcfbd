//! Port abstraction for trip persistence.

use async_trait::async_trait;

use crate::domain::{CarShareId, Trip, TripId};

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by trip repository adapters.
    pub enum TripRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } => "trip repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "trip repository query failed: {message}",
        /// An update or delete targeted a trip that no longer exists.
        Missing { id: TripId } => "trip {id} does not exist",
    }
}

/// Port for reading and writing trips.
///
/// Trips are ordered by timestamp, ties broken by id, whenever an adapter
/// returns more than one.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TripRepository: Send + Sync {
    /// Fetch a trip by identifier.
    async fn find_by_id(&self, id: &TripId) -> Result<Option<Trip>, TripRepositoryError>;

    /// List trips, optionally restricted to one car-share, oldest first.
    async fn list(
        &self,
        car_share_id: Option<CarShareId>,
    ) -> Result<Vec<Trip>, TripRepositoryError>;

    /// Fetch the most recent trip owned by `car_share_id`, ignoring the trip
    /// named by `excluding`.
    ///
    /// Recency is the trip timestamp. Trips sharing a timestamp are ordered
    /// by id, which is random, so among equal timestamps the one returned is
    /// not necessarily the one recorded last, and a trip chained from it can
    /// miss a contribution. Timestamps carry microsecond precision, which
    /// makes such ties rare with a real clock.
    async fn find_latest_for_car_share(
        &self,
        car_share_id: &CarShareId,
        excluding: Option<TripId>,
    ) -> Result<Option<Trip>, TripRepositoryError>;

    /// Store a new trip.
    async fn insert(&self, trip: &Trip) -> Result<(), TripRepositoryError>;

    /// Replace an existing trip. [`TripRepositoryError::Missing`] if absent.
    async fn update(&self, trip: &Trip) -> Result<(), TripRepositoryError>;

    /// Remove a trip. [`TripRepositoryError::Missing`] if absent.
    async fn delete(&self, id: &TripId) -> Result<(), TripRepositoryError>;
}
