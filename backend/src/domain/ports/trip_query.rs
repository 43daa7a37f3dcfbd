//! Driving port for trip reads.

use async_trait::async_trait;

use crate::domain::{CarShareId, Trip, TripError, TripId};

use super::TripParticipants;

/// A trip with its participants resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TripView {
    /// Stored trip.
    pub trip: Trip,
    /// Resolved driver and passengers.
    pub participants: TripParticipants,
}

/// Driving port for reading trips.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TripQuery: Send + Sync {
    /// Fetch one trip and resolve its participants.
    async fn get_trip(&self, id: TripId) -> Result<TripView, TripError>;

    /// List trips oldest first, optionally for one car-share.
    async fn list_trips(&self, car_share_id: Option<CarShareId>) -> Result<Vec<Trip>, TripError>;
}
