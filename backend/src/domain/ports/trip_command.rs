//! Driving port for trip mutations.

use async_trait::async_trait;

use crate::domain::{Trip, TripDraft, TripError, TripId, User};

/// Resolved user records for a trip's driver and passengers.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TripParticipants {
    /// Driver record, when the trip names one.
    pub driver: Option<User>,
    /// Passenger records in trip order.
    pub passengers: Vec<User>,
}

/// Outcome of a committed create or update.
///
/// The trip is always the persisted record. `participants` carries the
/// population result separately because a lookup failure after the write
/// must not hide the fact that the write happened.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TripWrite {
    /// Trip as persisted, scores included.
    pub trip: Trip,
    /// Participant lookup result; an error here never undoes the write.
    pub participants: Result<TripParticipants, TripError>,
}

/// Driving port for creating, rewriting, and deleting trips.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TripCommand: Send + Sync {
    /// Record a new trip, scoring it against its car-share's latest trip.
    async fn create_trip(&self, draft: TripDraft) -> Result<TripWrite, TripError>;

    /// Rewrite an existing trip. A missing car-share id in `draft` keeps the
    /// persisted one.
    async fn update_trip(&self, id: TripId, draft: TripDraft) -> Result<TripWrite, TripError>;

    /// Delete a trip and detach it from its car-share.
    async fn delete_trip(&self, id: TripId) -> Result<(), TripError>;
}
